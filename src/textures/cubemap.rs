use rayon::prelude::*;
use log::debug;
use crate::core::spectrum::RGBSpectrum;
use crate::core::geometry::vector::Vector3f;
use crate::core::geometry::geometry::Frame;
use crate::core::texture::Texture;
use crate::core::pbrt::{Float, PI, clamp, lerp};

stat_counter!("IBL/Cube map texels baked", ncube_texels);

pub fn init_stats() {
    ncube_texels::init();
}

pub const NFACES: usize = 6;

/// Direction through face coordinates `(s, t)` in [0, 1]. Faces are ordered
/// +X, -X, +Y, -Y, +Z, -Z; t grows downwards on the side faces.
pub fn face_direction(face: usize, s: Float, t: Float) -> Vector3f {
    let u = 2.0 * s - 1.0;
    let v = 2.0 * t - 1.0;

    let d = match face {
        0 => Vector3f::new(1.0, -v, -u),
        1 => Vector3f::new(-1.0, -v, u),
        2 => Vector3f::new(u, 1.0, v),
        3 => Vector3f::new(u, -1.0, -v),
        4 => Vector3f::new(u, -v, 1.0),
        _ => Vector3f::new(-u, -v, -1.0)
    };

    d.normalize()
}

/// Inverse of [`face_direction`].
pub fn direction_to_face(d: &Vector3f) -> (usize, Float, Float) {
    let (ax, ay, az) = (d.x.abs(), d.y.abs(), d.z.abs());

    let (face, ma, u, v) = if ax >= ay && ax >= az {
        if d.x > 0.0 {
            (0, ax, -d.z, -d.y)
        } else {
            (1, ax, d.z, -d.y)
        }
    } else if ay >= az {
        if d.y > 0.0 {
            (2, ay, d.x, d.z)
        } else {
            (3, ay, d.x, -d.z)
        }
    } else if d.z > 0.0 {
        (4, az, d.x, -d.y)
    } else {
        (5, az, -d.x, -d.y)
    };

    if ma == 0.0 { return (face, 0.5, 0.5); }

    (face, 0.5 * (u / ma + 1.0), 0.5 * (v / ma + 1.0))
}

#[derive(Debug, Clone)]
pub struct CubeLevel {
    pub size    : usize,
    pub faces   : Vec<Vec<RGBSpectrum>>
}

impl CubeLevel {
    fn texel(&self, face: usize, x: isize, y: isize) -> RGBSpectrum {
        let n = self.size as isize;
        let x = clamp(x, 0, n - 1) as usize;
        let y = clamp(y, 0, n - 1) as usize;

        self.faces[face][y * self.size + x]
    }

    /// Bilinear lookup clamped to the face edges.
    fn bilerp(&self, face: usize, s: Float, t: Float) -> RGBSpectrum {
        let x = s * self.size as Float - 0.5;
        let y = t * self.size as Float - 0.5;
        let (x0, y0) = (x.floor(), y.floor());
        let (dx, dy) = (x - x0, y - y0);
        let (x0, y0) = (x0 as isize, y0 as isize);

        self.texel(face, x0, y0) * ((1.0 - dx) * (1.0 - dy)) +
        self.texel(face, x0 + 1, y0) * (dx * (1.0 - dy)) +
        self.texel(face, x0, y0 + 1) * ((1.0 - dx) * dy) +
        self.texel(face, x0 + 1, y0 + 1) * (dx * dy)
    }
}

#[derive(Debug, Clone)]
pub struct CubeMap {
    pub levels: Vec<CubeLevel>
}

impl CubeMap {
    /// Level 0 of `size` texels per edge, each texel set to `f` of the
    /// direction through its centre.
    pub fn from_fn<F>(size: usize, f: F) -> Self
    where F: Fn(&Vector3f) -> RGBSpectrum + Sync + Send
    {
        Self { levels: vec![Self::bake_level(size, &f)] }
    }

    pub(crate) fn bake_level<F>(size: usize, f: &F) -> CubeLevel
    where F: Fn(&Vector3f) -> RGBSpectrum + Sync + Send
    {
        let size = size.max(1);
        let inv = 1.0 / size as Float;

        let faces = (0..NFACES)
            .map(|face| {
                let mut texels = vec![RGBSpectrum::default(); size * size];

                texels
                    .par_chunks_mut(size)
                    .enumerate()
                    .for_each(|(y, row)| {
                        for (x, p) in row.iter_mut().enumerate() {
                            let d = face_direction(face, (x as Float + 0.5) * inv, (y as Float + 0.5) * inv);
                            *p = f(&d);
                        }
                    });

                texels
            })
            .collect::<Vec<_>>();

        ncube_texels::add((NFACES * size * size) as u64);

        CubeLevel { size, faces }
    }

    /// Resample an equirectangular texture, expressed in `frame`, to a cube map.
    pub fn from_texture(texture: &Texture, size: usize, frame: &Frame) -> Self {
        debug!("Converting equirectangular texture to {} cube map", size);
        // One cube face covers a quarter of the equirectangular width
        let width = 1.0 / (4.0 * size.max(1) as Float);

        Self::from_fn(size, |d| texture.lookup_direction(d, frame, width))
    }

    /// Box filter level 0 down to 1x1, replacing any existing mips.
    pub fn generate_mips(&mut self) {
        self.levels.truncate(1);

        while self.levels[self.levels.len() - 1].size > 1 {
            let prev = &self.levels[self.levels.len() - 1];
            let size = prev.size / 2;

            let faces = prev.faces
                .par_iter()
                .map(|src| {
                    let mut dst = vec![RGBSpectrum::default(); size * size];

                    for y in 0..size {
                        for x in 0..size {
                            let i = 2 * y * prev.size + 2 * x;
                            dst[y * size + x] =
                                (src[i] + src[i + 1] + src[i + prev.size] + src[i + prev.size + 1]) * 0.25;
                        }
                    }

                    dst
                })
                .collect::<Vec<_>>();

            self.levels.push(CubeLevel { size, faces });
        }
    }

    pub fn size(&self) -> usize { self.levels[0].size }
    pub fn nlevels(&self) -> usize { self.levels.len() }

    pub fn texel(&self, level: usize, face: usize, x: usize, y: usize) -> RGBSpectrum {
        let l = &self.levels[level];

        l.faces[face][y * l.size + x]
    }

    pub fn lookup(&self, dir: &Vector3f) -> RGBSpectrum {
        self.lookup_level(0, dir)
    }

    pub fn lookup_level(&self, level: usize, dir: &Vector3f) -> RGBSpectrum {
        let (face, s, t) = direction_to_face(dir);

        self.levels[level.min(self.levels.len() - 1)].bilerp(face, s, t)
    }

    /// Trilinear lookup at a fractional level.
    pub fn lookup_lod(&self, dir: &Vector3f, lod: Float) -> RGBSpectrum {
        let max = (self.levels.len() - 1) as Float;
        let lod = clamp(lod, 0.0, max);
        let l0 = lod.floor();
        let delta = lod - l0;

        if delta == 0.0 {
            return self.lookup_level(l0 as usize, dir);
        }

        lerp(
            delta,
            self.lookup_level(l0 as usize, dir),
            self.lookup_level(l0 as usize + 1, dir))
    }

    /// Mean of the level 0 texels.
    pub fn average(&self) -> RGBSpectrum {
        let l = &self.levels[0];
        let n = (NFACES * l.size * l.size) as Float;

        l.faces
            .par_iter()
            .map(|f| f.iter().fold(RGBSpectrum::default(), |a, b| a + *b))
            .reduce(RGBSpectrum::default, |a, b| a + b) / n
    }

    /// Average solid angle of one texel at `level`.
    pub fn texel_solid_angle(&self, level: usize) -> Float {
        let n = self.levels[level.min(self.levels.len() - 1)].size as Float;

        4.0 * PI / (NFACES as Float * n * n)
    }
}
