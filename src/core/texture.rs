use std::sync::{Arc, OnceLock};
use std::sync::atomic::{AtomicU64, Ordering};
use log::debug;
use rayon::prelude::*;
use crate::core::imageio::{Image, ScalarType};
use crate::core::mipmap::{MIPMap, ImageWrap};
use crate::core::spectrum::RGBSpectrum;
use crate::core::geometry::point::{Point2f, Point2i};
use crate::core::geometry::vector::Vector3f;
use crate::core::geometry::geometry::{Frame, equirect_coords};
use crate::core::pbrt::{Float, inverse_gamma_correct};

stat_counter!("Texture/Texture lookups", ntexture_lookups);

pub fn init_stats() {
    ntexture_lookups::init();
}

static NEXT_MTIME: AtomicU64 = AtomicU64::new(1);

/// Monotonic modification stamp shared by all scene objects that caches key on.
pub fn next_mtime() -> u64 {
    NEXT_MTIME.fetch_add(1, Ordering::Relaxed)
}

/// How stored values become colors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ColorMode {
    /// Direct for 8-bit input, mapped otherwise
    Default,
    /// Luminance through a grayscale ramp over the image's range
    MapScalars,
    /// Stored values are colors
    DirectScalars
}

impl Default for ColorMode {
    fn default() -> Self { ColorMode::Default }
}

#[derive(Debug)]
pub struct Texture {
    input                   : Option<Arc<Image>>,
    color_mode              : ColorMode,
    mipmap                  : bool,
    interpolate             : bool,
    repeat                  : bool,
    edge_clamp              : bool,
    use_srgb_color_space    : bool,
    pyramid                 : OnceLock<MIPMap<RGBSpectrum>>,
    mtime                   : u64
}

impl Default for Texture {
    fn default() -> Self {
        Self {
            input: None,
            color_mode: ColorMode::Default,
            mipmap: false,
            interpolate: false,
            repeat: true,
            edge_clamp: false,
            use_srgb_color_space: false,
            pyramid: OnceLock::new(),
            mtime: next_mtime()
        }
    }
}

impl Clone for Texture {
    fn clone(&self) -> Self {
        Self {
            input: self.input.clone(),
            color_mode: self.color_mode,
            mipmap: self.mipmap,
            interpolate: self.interpolate,
            repeat: self.repeat,
            edge_clamp: self.edge_clamp,
            use_srgb_color_space: self.use_srgb_color_space,
            pyramid: OnceLock::new(),
            mtime: next_mtime()
        }
    }
}

impl Texture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_image(image: Arc<Image>) -> Self {
        let mut t = Self::default();
        t.set_input_data(image);

        t
    }

    fn modified(&mut self) {
        self.pyramid = OnceLock::new();
        self.mtime = next_mtime();
    }

    pub fn set_input_data(&mut self, image: Arc<Image>) {
        self.input = Some(image);
        self.modified();
    }

    pub fn input(&self) -> Option<&Arc<Image>> { self.input.as_ref() }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.color_mode = mode;
        self.modified();
    }

    pub fn color_mode(&self) -> ColorMode { self.color_mode }

    pub fn set_mipmap(&mut self, on: bool) {
        self.mipmap = on;
        self.modified();
    }

    pub fn mipmap(&self) -> bool { self.mipmap }

    pub fn set_interpolate(&mut self, on: bool) {
        self.interpolate = on;
        self.modified();
    }

    pub fn interpolate(&self) -> bool { self.interpolate }

    pub fn set_repeat(&mut self, on: bool) {
        self.repeat = on;
        self.modified();
    }

    pub fn repeat(&self) -> bool { self.repeat }

    pub fn set_edge_clamp(&mut self, on: bool) {
        self.edge_clamp = on;
        self.modified();
    }

    pub fn edge_clamp(&self) -> bool { self.edge_clamp }

    pub fn set_use_srgb_color_space(&mut self, on: bool) {
        self.use_srgb_color_space = on;
        self.modified();
    }

    pub fn use_srgb_color_space(&self) -> bool { self.use_srgb_color_space }

    pub fn mtime(&self) -> u64 { self.mtime }

    pub fn resolution(&self) -> Point2i {
        self.input
            .as_ref()
            .map(|i| i.resolution)
            .unwrap_or_else(|| Point2i::new(1, 1))
    }

    fn wrap(&self) -> ImageWrap {
        if self.edge_clamp {
            ImageWrap::Clamp
        } else if self.repeat {
            ImageWrap::Repeat
        } else {
            ImageWrap::Black
        }
    }

    /// Colors of the input after color mode and color space conversion.
    fn processed_colors(&self, image: &Image) -> Vec<RGBSpectrum> {
        let direct = match self.color_mode {
            ColorMode::DirectScalars => true,
            ColorMode::MapScalars    => false,
            ColorMode::Default       => image.scalar_type == ScalarType::UnsignedChar
        };
        let srgb = self.use_srgb_color_space;

        if direct {
            return image.pixels
                .par_iter()
                .map(|p| if srgb { p.map(inverse_gamma_correct) } else { *p })
                .collect();
        }

        let (lo, hi) = image.luminance_range();
        let range = if hi > lo { hi - lo } else { 1.0 };

        image.pixels
            .par_iter()
            .map(|p| {
                let g = ((p.y() - lo) / range).max(0.0).min(1.0);
                let g = if srgb { inverse_gamma_correct(g) } else { g };

                RGBSpectrum::new(g)
            })
            .collect()
    }

    fn pyramid(&self) -> &MIPMap<RGBSpectrum> {
        self.pyramid.get_or_init(|| {
            let wrap = self.wrap();
            // Rows never wrap so that lookups near the poles stay at the poles.
            let wrap_t = if wrap == ImageWrap::Repeat { ImageWrap::Clamp } else { wrap };

            match self.input {
                Some(ref image) => {
                    debug!("Preparing texture {} X {}", image.resolution.x, image.resolution.y);
                    let colors = self.processed_colors(image);

                    MIPMap::new(&image.resolution, &colors, wrap, wrap_t)
                }
                None => MIPMap::new(&Point2i::new(1, 1), &[RGBSpectrum::default()], wrap, wrap_t)
            }
        })
    }

    pub fn levels(&self) -> usize {
        self.pyramid().levels()
    }

    /// Filtered lookup; `width` is the filter footprint in [0, 1] texture space
    /// and only matters when mipmapping is on.
    pub fn lookup(&self, st: &Point2f, width: Float) -> RGBSpectrum {
        ntexture_lookups::inc();
        let pyramid = self.pyramid();

        match (self.mipmap, self.interpolate) {
            (true, true)   => pyramid.lookup(st, width),
            (true, false)  => {
                let level = (pyramid.levels() - 1) as Float + width.max(1.0e-8).log2();
                let level = level.round().max(0.0) as usize;

                pyramid.nearest(level, st)
            },
            (false, true)  => pyramid.bilerp(0, st),
            (false, false) => pyramid.nearest(0, st)
        }
    }

    /// Lookup at an explicit fractional pyramid level.
    pub fn lookup_level(&self, st: &Point2f, level: Float) -> RGBSpectrum {
        ntexture_lookups::inc();
        let pyramid = self.pyramid();

        if self.interpolate {
            pyramid.lookup_level(st, level)
        } else {
            pyramid.nearest(level.round().max(0.0) as usize, st)
        }
    }

    /// Equirectangular lookup of a world direction expressed in `frame`.
    pub fn lookup_direction(&self, dir: &Vector3f, frame: &Frame, width: Float) -> RGBSpectrum {
        let (s, t) = equirect_coords(&frame.to_local(dir));

        self.lookup(&Point2f::new(s, t), width)
    }
}
