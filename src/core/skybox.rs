use std::sync::{Arc, OnceLock};
use crate::core::texture::Texture;
use crate::core::spectrum::Spectrum;
use crate::core::geometry::vector::Vector3f;
use crate::core::geometry::point::{Point2f, Point3f};
use crate::core::geometry::geometry::{Frame, equirect_coords};
use crate::core::pbrt::{Float, DISPLAY_GAMMA, INV_PI};
use crate::textures::cubemap::CubeMap;

pub const DEFAULT_SKYBOX_CUBE_SIZE: usize = 512;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Projection {
    Cube,
    Sphere,
    /// Top half of the texture holds the left eye
    StereoSphere,
    Floor
}

/// Background drawn behind all actors from a texture.
#[derive(Debug, Clone)]
pub struct Skybox {
    texture                     : Arc<Texture>,
    pub projection              : Projection,
    /// Plane `a x + b y + c z + d = 0`; its normal is the up direction
    pub floor_plane             : [Float; 4],
    pub floor_right             : Vector3f,
    pub floor_tex_coord_scale   : (Float, Float),
    pub gamma_correct           : bool,
    pub visibility              : bool,
    cube                        : OnceLock<Arc<CubeMap>>
}

impl Skybox {
    pub fn new(texture: Arc<Texture>) -> Self {
        Self {
            texture,
            projection: Projection::Cube,
            floor_plane: [0.0, 1.0, 0.0, 0.0],
            floor_right: Vector3f::new(1.0, 0.0, 0.0),
            floor_tex_coord_scale: (1.0, 1.0),
            gamma_correct: false,
            visibility: true,
            cube: OnceLock::new()
        }
    }

    pub fn texture(&self) -> &Arc<Texture> { &self.texture }

    pub fn set_texture(&mut self, texture: Arc<Texture>) {
        self.texture = texture;
        self.cube = OnceLock::new();
    }

    pub fn set_floor_right(&mut self, x: Float, y: Float, z: Float) {
        self.floor_right = Vector3f::new(x, y, z);
    }

    pub fn set_floor_plane(&mut self, a: Float, b: Float, c: Float, d: Float) {
        self.floor_plane = [a, b, c, d];
    }

    pub fn up(&self) -> Vector3f {
        Vector3f::new(self.floor_plane[0], self.floor_plane[1], self.floor_plane[2])
    }

    /// Basis of the texture: floor normal as up, `floor_right` as right.
    pub fn frame(&self) -> Frame {
        Frame::from_up_right(&self.up(), &self.floor_right)
    }

    /// Use an already converted cube map instead of building one.
    pub fn share_cube_map(&self, cube: Arc<CubeMap>) {
        let _ = self.cube.set(cube);
    }

    fn cube(&self) -> &Arc<CubeMap> {
        self.cube.get_or_init(|| {
            Arc::new(CubeMap::from_texture(&self.texture, DEFAULT_SKYBOX_CUBE_SIZE, &self.frame()))
        })
    }

    /// Color seen along `dir` from `eye`; `width` is the pixel footprint in
    /// radians. Returns `None` where the floor projection misses the plane.
    pub fn color(&self, eye: &Point3f, dir: &Vector3f, width: Float) -> Option<Spectrum> {
        let frame = self.frame();
        let tex_width = width * 0.5 * INV_PI;

        let c = match self.projection {
            Projection::Cube => self.cube().lookup(dir),
            Projection::Sphere => self.texture.lookup_direction(dir, &frame, tex_width),
            Projection::StereoSphere => {
                let (s, t) = equirect_coords(&frame.to_local(dir));

                self.texture.lookup(&Point2f::new(s, 0.5 * t), tex_width)
            }
            Projection::Floor => {
                let n = self.up();
                let denom = n.dot(dir);

                if denom.abs() < 1.0e-8 { return None; }

                let t = -(n.dot(&Vector3f::from(*eye)) + self.floor_plane[3]) / denom;

                if t <= 0.0 { return None; }

                let hit = Vector3f::from(*eye + *dir * t);
                let s = hit.dot(&frame.right) * self.floor_tex_coord_scale.0;
                let t2 = hit.dot(&frame.front) * self.floor_tex_coord_scale.1;
                // Tile in both directions
                let st = Point2f::new(s - s.floor(), t2 - t2.floor());

                self.texture.lookup(&st, tex_width * t)
            }
        };

        if self.gamma_correct {
            Some(c.powf(1.0 / DISPLAY_GAMMA))
        } else {
            Some(c)
        }
    }
}
