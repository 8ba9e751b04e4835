use crate::core::geometry::point::Point2i;
use crate::core::geometry::bounds::Bounds2i;
use crate::core::spectrum::Spectrum;
use crate::core::pbrt::{Float, to_byte};
use crate::core::imageio::write_image;
use crate::core::fileutil::has_extension_ci;
use log::info;
use anyhow::{Result, Context};
use image::RgbImage;
use std::path::Path;

/// Frame buffer of display ready colors, row 0 at the top.
#[derive(Debug, Clone)]
pub struct Film {
    pub resolution  : Point2i,
    pixels          : Vec<Spectrum>
}

impl Film {
    pub fn new(resolution: &Point2i) -> Self {
        let n = (resolution.x.max(0) * resolution.y.max(0)) as usize;

        Self { resolution: *resolution, pixels: vec![Spectrum::default(); n] }
    }

    pub fn width(&self) -> usize { self.resolution.x as usize }
    pub fn height(&self) -> usize { self.resolution.y as usize }

    pub fn bounds(&self) -> Bounds2i {
        Bounds2i::from_points(&Point2i::new(0, 0), &self.resolution)
    }

    pub fn clear(&mut self, color: &Spectrum) {
        for p in self.pixels.iter_mut() { *p = *color; }
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, c: &Spectrum) {
        let w = self.width();
        self.pixels[y * w + x] = *c;
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Spectrum {
        self.pixels[y * self.width() + x]
    }

    /// Mutable rows `y0..y1` as one slice.
    pub fn rows_mut(&mut self, y0: usize, y1: usize) -> &mut [Spectrum] {
        let w = self.width();

        &mut self.pixels[y0 * w..y1 * w]
    }

    pub fn pixels(&self) -> &[Spectrum] { &self.pixels }

    pub fn to_rgb8(&self) -> RgbImage {
        let (w, h) = (self.width() as u32, self.height() as u32);

        RgbImage::from_fn(w, h, |x, y| {
            let c = self.get_pixel(x as usize, y as usize);

            image::Rgb([to_byte(c[0]), to_byte(c[1]), to_byte(c[2])])
        })
    }

    pub fn to_rgb_float(&self) -> Vec<Float> {
        self.pixels.iter().flat_map(|p| p.to_rgb().to_vec()).collect()
    }

    /// 8-bit formats store the display values as is; float formats store them
    /// unquantized.
    pub fn write_image<P: AsRef<Path>>(&self, name: P) -> Result<()> {
        let name = name.as_ref();
        info!("Writing image {} with bounds {}", name.display(), self.bounds());

        if has_extension_ci(name, "png") || has_extension_ci(name, "tga") {
            self.to_rgb8()
                .save(name)
                .with_context(|| format!("Error writing image \"{}\"", name.display()))
        } else {
            write_image(name, &self.to_rgb_float(), &self.resolution)
        }
    }
}
