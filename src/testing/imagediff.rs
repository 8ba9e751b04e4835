use anyhow::{Result, anyhow};
use image::{Rgb, RgbImage};
use log::debug;
use rayon::prelude::*;
use crate::core::pbrt::Float;

/// Outcome of comparing a test image against a baseline.
#[derive(Debug, Clone)]
pub struct DiffResult {
    /// Mean normalised per-pixel distance in [0, 1]
    pub error       : Float,
    /// Failing pixels in grey by distance, tolerated differences in blue
    pub diff_image  : RgbImage,
    pub bad_pixels  : usize
}

#[derive(Debug, Copy, Clone)]
pub struct ImageDifference {
    /// Distances at or below this (normalised) value count as zero
    pub threshold_per_pixel : Float,
    /// Compare against the best match in the 3x3 neighbourhood
    pub allow_shift         : bool
}

impl Default for ImageDifference {
    fn default() -> Self {
        Self { threshold_per_pixel: 16.0 / 255.0, allow_shift: true }
    }
}

fn channel_distance(a: &Rgb<u8>, b: &Rgb<u8>) -> u8 {
    a.0.iter()
        .zip(b.0.iter())
        .map(|(x, y)| (*x as i16 - *y as i16).unsigned_abs() as u8)
        .max()
        .unwrap_or(0)
}

impl ImageDifference {
    pub fn new(threshold_per_pixel: Float, allow_shift: bool) -> Self {
        Self { threshold_per_pixel, allow_shift }
    }

    fn pixel_distance(&self, test: &RgbImage, valid: &RgbImage, x: u32, y: u32) -> u8 {
        let p = test.get_pixel(x, y);

        if !self.allow_shift {
            return channel_distance(p, valid.get_pixel(x, y));
        }

        let (w, h) = valid.dimensions();
        let mut best = u8::MAX;

        for vy in y.saturating_sub(1)..=(y + 1).min(h - 1) {
            for vx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                best = best.min(channel_distance(p, valid.get_pixel(vx, vy)));
                if best == 0 { return 0; }
            }
        }

        best
    }

    pub fn compare(&self, test: &RgbImage, valid: &RgbImage) -> Result<DiffResult> {
        if test.dimensions() != valid.dimensions() {
            return Err(anyhow!(
                "Image sizes differ: test is {} X {}, baseline is {} X {}",
                test.width(), test.height(), valid.width(), valid.height()));
        }

        let (w, h) = test.dimensions();
        let npixels = w as usize * h as usize;

        if npixels == 0 {
            return Ok(DiffResult { error: 0.0, diff_image: RgbImage::new(w, h), bad_pixels: 0 });
        }

        let distances: Vec<u8> = (0..npixels)
            .into_par_iter()
            .map(|i| self.pixel_distance(test, valid, (i % w as usize) as u32, (i / w as usize) as u32))
            .collect();

        let mut diff_image = RgbImage::new(w, h);
        let mut total = 0.0_f64;
        let mut bad_pixels = 0;

        for (i, d) in distances.iter().enumerate() {
            let nd = *d as Float / 255.0;
            let (x, y) = ((i % w as usize) as u32, (i / w as usize) as u32);

            if nd > self.threshold_per_pixel {
                total += nd as f64;
                bad_pixels += 1;
                diff_image.put_pixel(x, y, Rgb([*d, *d, *d]));
            } else if *d > 0 {
                diff_image.put_pixel(x, y, Rgb([0, 0, *d]));
            }
        }

        let error = (total / npixels as f64) as Float;
        debug!("Image difference {} with {} pixels over threshold", error, bad_pixels);

        Ok(DiffResult { error, diff_image, bad_pixels })
    }
}
