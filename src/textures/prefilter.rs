use log::{info, debug, warn};
use crate::core::geometry::vector::{Vector3f, vec3_coordinate_system};
use crate::core::spectrum::RGBSpectrum;
use crate::core::pbrt::{Float, clamp, log2, start_progress};
use crate::core::sampling::{hammersley, importance_sample_ggx};
use crate::core::microfacet::{ggx_d, roughness_to_alpha};
use crate::textures::cubemap::{CubeMap, CubeLevel};

pub const DEFAULT_PREFILTER_SIZE: usize = 128;
pub const DEFAULT_PREFILTER_LEVELS: usize = 5;
pub const DEFAULT_PREFILTER_SAMPLES: usize = 1024;

/// One importance sample in tangent space with N = V = +z.
struct PrefilterSample {
    l       : Vector3f,
    n_dot_l : Float,
    lod     : Float
}

/// Specular environment map convolved with GGX, one mip level per roughness.
#[derive(Debug, Clone)]
pub struct PrefilterTexture {
    prefilter_size      : usize,
    prefilter_levels    : usize,
    prefilter_samples   : usize,
    map                 : Option<CubeMap>
}

impl Default for PrefilterTexture {
    fn default() -> Self {
        Self {
            prefilter_size: DEFAULT_PREFILTER_SIZE,
            prefilter_levels: DEFAULT_PREFILTER_LEVELS,
            prefilter_samples: DEFAULT_PREFILTER_SAMPLES,
            map: None
        }
    }
}

impl PrefilterTexture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefilter_size(&self) -> usize { self.prefilter_size }

    pub fn set_prefilter_size(&mut self, size: usize) {
        let size = size.max(1);

        if size != self.prefilter_size {
            self.prefilter_size = size;
            self.map = None;
        }
    }

    pub fn prefilter_levels(&self) -> usize { self.prefilter_levels }

    pub fn set_prefilter_levels(&mut self, levels: usize) {
        let levels = levels.max(1);

        if levels != self.prefilter_levels {
            self.prefilter_levels = levels;
            self.map = None;
        }
    }

    pub fn prefilter_samples(&self) -> usize { self.prefilter_samples }

    pub fn set_prefilter_samples(&mut self, samples: usize) {
        let samples = samples.max(1);

        if samples != self.prefilter_samples {
            self.prefilter_samples = samples;
            self.map = None;
        }
    }

    pub fn is_baked(&self) -> bool { self.map.is_some() }

    pub fn map(&self) -> Option<&CubeMap> { self.map.as_ref() }

    pub fn invalidate(&mut self) {
        self.map = None;
    }

    /// Levels actually produced: no more than the size allows down to 1x1.
    pub fn effective_levels(&self) -> usize {
        let max = 1 + (self.prefilter_size.max(1) as Float).log2().floor() as usize;

        self.prefilter_levels.min(max)
    }

    fn level_roughness(level: usize, nlevels: usize) -> Float {
        if nlevels <= 1 { 0.0 } else { level as Float / (nlevels - 1) as Float }
    }

    fn samples_for(&self, roughness: Float, source_texel: Float) -> Vec<PrefilterSample> {
        let n = self.prefilter_samples as u32;
        let alpha = roughness_to_alpha(roughness);
        let v = Vector3f::new(0.0, 0.0, 1.0);

        (0..n)
            .filter_map(|i| {
                let h = importance_sample_ggx(&hammersley(i, n), alpha);
                let l = v.reflect(&h);
                let n_dot_l = l.z;

                if n_dot_l <= 0.0 { return None; }

                // N = V so n.h equals v.h and the pdf reduces to D / 4
                let n_dot_h = h.z.max(0.0);
                let pdf = ggx_d(n_dot_h, alpha) * 0.25 + 1.0e-4;
                let sample_solid_angle = 1.0 / (n as Float * pdf);
                let lod = (0.5 * log2(sample_solid_angle / source_texel) + 1.0).max(0.0);

                Some(PrefilterSample { l, n_dot_l, lod })
            })
            .collect()
    }

    /// Convolve the environment (with mips) into a new prefiltered map.
    pub fn bake(&mut self, env: &CubeMap) {
        let nlevels = self.effective_levels();

        if nlevels < self.prefilter_levels {
            warn!("Prefilter levels clamped from {} to {} for size {}",
                  self.prefilter_levels, nlevels, self.prefilter_size);
        }

        info!("Baking prefiltered map: size {}, {} levels, {} samples",
              self.prefilter_size, nlevels, self.prefilter_samples);

        let pb = start_progress(nlevels as u64, "prefilter");
        let source_texel = env.texel_solid_angle(0);
        let mut levels: Vec<CubeLevel> = Vec::with_capacity(nlevels);

        for level in 0..nlevels {
            let size = (self.prefilter_size >> level).max(1);
            let roughness = Self::level_roughness(level, nlevels);

            let baked = if level == 0 {
                CubeMap::bake_level(size, &|r: &Vector3f| env.lookup(r))
            } else {
                let samples = self.samples_for(roughness, source_texel);
                debug!("Prefilter level {} roughness {:.2}: {} usable samples",
                       level, roughness, samples.len());

                CubeMap::bake_level(size, &|n: &Vector3f| {
                    let mut t = Vector3f::default();
                    let mut b = Vector3f::default();
                    vec3_coordinate_system(n, &mut t, &mut b);

                    let mut color = RGBSpectrum::default();
                    let mut weight: Float = 0.0;

                    for s in &samples {
                        let l = t * s.l.x + b * s.l.y + *n * s.l.z;
                        color += env.lookup_lod(&l, s.lod) * s.n_dot_l;
                        weight += s.n_dot_l;
                    }

                    if weight > 0.0 { color / weight } else { env.lookup(n) }
                })
            };

            levels.push(baked);
            pb.inc(1);
        }

        pb.finish_and_clear();
        self.map = Some(CubeMap { levels });
    }

    /// Specular radiance along `r` for a surface of the given roughness.
    pub fn lookup(&self, r: &Vector3f, roughness: Float) -> RGBSpectrum {
        match self.map {
            Some(ref m) => {
                let lod = clamp(roughness, 0.0, 1.0) * (m.nlevels() - 1) as Float;

                m.lookup_lod(r, lod)
            }
            None => RGBSpectrum::default()
        }
    }
}
