use log::info;
use rayon::prelude::*;
use crate::core::geometry::vector::Vector3f;
use crate::core::pbrt::{Float, clamp};
use crate::core::sampling::{hammersley, importance_sample_ggx};
use crate::core::microfacet::{roughness_to_alpha, smith_g_ibl};

pub const DEFAULT_LUT_SIZE: usize = 1024;
pub const DEFAULT_LUT_SAMPLES: usize = 512;

/// Split-sum scale and bias `(A, B)` indexed by `(n.v, roughness)`, so that the
/// specular term is `prefiltered * (F0 * A + B)`.
#[derive(Debug, Clone)]
pub struct BrdfLut {
    lut_size    : usize,
    lut_samples : usize,
    table       : Vec<[Float; 2]>
}

impl Default for BrdfLut {
    fn default() -> Self {
        Self::new(DEFAULT_LUT_SIZE, DEFAULT_LUT_SAMPLES)
    }
}

impl BrdfLut {
    pub fn new(lut_size: usize, lut_samples: usize) -> Self {
        let lut_size = lut_size.max(2);
        let lut_samples = lut_samples.max(1);
        info!("Integrating BRDF lookup table {} X {} with {} samples", lut_size, lut_size, lut_samples);

        let mut table = vec![[0.0; 2]; lut_size * lut_size];

        table
            .par_chunks_mut(lut_size)
            .enumerate()
            .for_each(|(j, row)| {
                let roughness = (j as Float + 0.5) / lut_size as Float;

                for (i, ab) in row.iter_mut().enumerate() {
                    let n_dot_v = (i as Float + 0.5) / lut_size as Float;
                    *ab = integrate_brdf(n_dot_v, roughness, lut_samples);
                }
            });

        Self { lut_size, lut_samples, table }
    }

    pub fn lut_size(&self) -> usize { self.lut_size }
    pub fn lut_samples(&self) -> usize { self.lut_samples }

    fn at(&self, i: isize, j: isize) -> [Float; 2] {
        let n = self.lut_size as isize;
        let i = clamp(i, 0, n - 1) as usize;
        let j = clamp(j, 0, n - 1) as usize;

        self.table[j * self.lut_size + i]
    }

    /// Bilinear lookup clamped to the table edges.
    pub fn lookup(&self, n_dot_v: Float, roughness: Float) -> (Float, Float) {
        let x = clamp(n_dot_v, 0.0, 1.0) * self.lut_size as Float - 0.5;
        let y = clamp(roughness, 0.0, 1.0) * self.lut_size as Float - 0.5;
        let (x0, y0) = (x.floor(), y.floor());
        let (dx, dy) = (x - x0, y - y0);
        let (x0, y0) = (x0 as isize, y0 as isize);

        let mut out = [0.0; 2];

        for (c, o) in out.iter_mut().enumerate() {
            *o =
                self.at(x0, y0)[c] * (1.0 - dx) * (1.0 - dy) +
                self.at(x0 + 1, y0)[c] * dx * (1.0 - dy) +
                self.at(x0, y0 + 1)[c] * (1.0 - dx) * dy +
                self.at(x0 + 1, y0 + 1)[c] * dx * dy;
        }

        (out[0], out[1])
    }
}

/// Integrate the GGX specular lobe against `(1 - Fc, Fc)` for one table entry.
pub fn integrate_brdf(n_dot_v: Float, roughness: Float, nsamples: usize) -> [Float; 2] {
    let n_dot_v = n_dot_v.max(1.0e-4);
    let alpha = roughness_to_alpha(roughness);
    let v = Vector3f::new((1.0 - n_dot_v * n_dot_v).max(0.0).sqrt(), 0.0, n_dot_v);
    let n = nsamples as u32;

    let mut a: Float = 0.0;
    let mut b: Float = 0.0;

    for i in 0..n {
        let h = importance_sample_ggx(&hammersley(i, n), alpha);
        let l = v.reflect(&h);

        let n_dot_l = l.z.max(0.0);
        let n_dot_h = h.z.max(0.0);
        let v_dot_h = v.dot(&h).max(0.0);

        if n_dot_l > 0.0 && n_dot_h > 0.0 {
            let g = smith_g_ibl(n_dot_v, n_dot_l, alpha);
            let g_vis = g * v_dot_h / (n_dot_h * n_dot_v);
            let fc = (1.0 - v_dot_h).powi(5);

            a += (1.0 - fc) * g_vis;
            b += fc * g_vis;
        }
    }

    [a / n as Float, b / n as Float]
}
