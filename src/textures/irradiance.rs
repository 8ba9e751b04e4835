use log::{info, warn};
use crate::core::geometry::vector::{Vector3f, vec3_coordinate_system};
use crate::core::spectrum::RGBSpectrum;
use crate::core::pbrt::{Float, PI, PI_OVER2, clamp, log2};
use crate::textures::cubemap::CubeMap;

pub const DEFAULT_IRRADIANCE_STEP: Float = 0.025;
pub const DEFAULT_IRRADIANCE_SIZE: usize = 256;

const MIN_STEP: Float = 0.001;

/// Diffuse irradiance cube map, integrated over a regular (theta, phi) grid.
#[derive(Debug, Clone)]
pub struct IrradianceTexture {
    irradiance_step : Float,
    irradiance_size : usize,
    map             : Option<CubeMap>
}

impl Default for IrradianceTexture {
    fn default() -> Self {
        Self {
            irradiance_step: DEFAULT_IRRADIANCE_STEP,
            irradiance_size: DEFAULT_IRRADIANCE_SIZE,
            map: None
        }
    }
}

impl IrradianceTexture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn irradiance_step(&self) -> Float { self.irradiance_step }

    /// Angular step in radians, clamped to [0.001, pi/2].
    pub fn set_irradiance_step(&mut self, step: Float) {
        let s = clamp(step, MIN_STEP, PI_OVER2);

        if s != step {
            warn!("Irradiance step {} clamped to {}", step, s);
        }

        if s != self.irradiance_step {
            self.irradiance_step = s;
            self.map = None;
        }
    }

    pub fn irradiance_size(&self) -> usize { self.irradiance_size }

    pub fn set_irradiance_size(&mut self, size: usize) {
        let size = size.max(1);

        if size != self.irradiance_size {
            self.irradiance_size = size;
            self.map = None;
        }
    }

    pub fn is_baked(&self) -> bool { self.map.is_some() }

    pub fn map(&self) -> Option<&CubeMap> { self.map.as_ref() }

    pub fn invalidate(&mut self) {
        self.map = None;
    }

    /// Integrate the environment (with mips) into a new irradiance map.
    pub fn bake(&mut self, env: &CubeMap) {
        let step = self.irradiance_step;
        let size = self.irradiance_size;

        // Hemisphere grid in tangent space, with the cos * sin weight folded in
        let mut grid = Vec::new();
        let mut phi: Float = 0.0;

        while phi < 2.0 * PI {
            let mut theta: Float = 0.0;

            while theta < PI_OVER2 {
                let (st, ct) = theta.sin_cos();
                let dir = Vector3f::new(st * phi.cos(), st * phi.sin(), ct);
                grid.push((dir, ct * st));
                theta += step;
            }

            phi += step;
        }

        let nsamples = grid.len() as Float;
        // Fetch from the mip whose texels cover about one grid cell
        let lod = (0.5 * log2(step * step / env.texel_solid_angle(0))).max(0.0);

        info!("Baking irradiance map: size {}, step {}, {} samples per texel, source lod {:.2}",
              size, step, grid.len(), lod);

        let level = CubeMap::bake_level(size, &|n: &Vector3f| {
            let mut t = Vector3f::default();
            let mut b = Vector3f::default();
            vec3_coordinate_system(n, &mut t, &mut b);

            let sum = grid
                .iter()
                .fold(RGBSpectrum::default(), |acc, (d, w)| {
                    let wi = t * d.x + b * d.y + *n * d.z;

                    acc + env.lookup_lod(&wi, lod) * *w
                });

            sum * (PI / nsamples)
        });

        self.map = Some(CubeMap { levels: vec![level] });
    }

    pub fn lookup(&self, n: &Vector3f) -> RGBSpectrum {
        match self.map {
            Some(ref m) => m.lookup(n),
            None => RGBSpectrum::default()
        }
    }
}
