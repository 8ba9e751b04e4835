use log::debug;
use crate::core::pbrt::{Float, mod_, clamp, lerp};
use crate::core::geometry::point::{Point2i, Point2f};
use ndarray::prelude::*;
use ndarray::Zip;
use std::ops::{Add, Mul};

stat_counter!("Texture/Trilinear lookups", ntrilerp_lookups);
stat_counter!("Texture/Bilinear lookups", nbilerp_lookups);
stat_memory_counter!("Memory/Texture MIP maps", mipmap_memory);

pub fn init_stats() {
    ntrilerp_lookups::init();
    nbilerp_lookups::init();
    mipmap_memory::init();
}

#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Copy, Clone)]
pub enum ImageWrap { Repeat, Black, Clamp }

pub trait Texel: num::Zero + Copy + Send + Sync + Add<Output=Self> + Mul<Float, Output=Self> {}

impl<T> Texel for T where T: num::Zero + Copy + Send + Sync + Add<Output=T> + Mul<Float, Output=T> {}

#[derive(Debug, Clone)]
pub struct MIPMap<T: Texel> {
    pyramid : Vec<Array2<T>>,
    wrap_s  : ImageWrap,
    wrap_t  : ImageWrap,
    black   : T
}

impl<T: Texel> MIPMap<T> {
    /// `data` is row major with `res.x` texels per row. Each level halves the
    /// previous one with a 2x2 box filter down to a single texel.
    pub fn new(res: &Point2i, data: &[T], wrap_s: ImageWrap, wrap_t: ImageWrap) -> Self {
        let (w, h) = (res.x.max(1) as usize, res.y.max(1) as usize);
        assert!(data.len() >= w * h);

        let base = Array2::from_shape_fn((h, w), |(t, s)| data[t * w + s]);
        let nlevels = 1 + (w.max(h) as Float).log2().floor() as usize;

        let mut mipmap = Self {
            pyramid: Vec::with_capacity(nlevels),
            wrap_s,
            wrap_t,
            black: T::zero()
        };
        mipmap.pyramid.push(base);

        for i in 1..nlevels {
            let prev = &mipmap.pyramid[i - 1];
            let sres = std::cmp::max(1, prev.ncols() / 2);
            let tres = std::cmp::max(1, prev.nrows() / 2);
            let mut d = Array2::<T>::zeros((tres, sres));

            Zip::indexed(&mut d).par_for_each(|(t, s), p| {
                let (si, ti) = (s as isize, t as isize);
                *p =
                    (mipmap.texel(i - 1, 2 * si, 2 * ti) +
                     mipmap.texel(i - 1, 2 * si + 1, 2 * ti) +
                     mipmap.texel(i - 1, 2 * si, 2 * ti + 1) +
                     mipmap.texel(i - 1, 2 * si + 1, 2 * ti + 1)) *
                    0.25;
            });

            mipmap.pyramid.push(d);
        }

        mipmap_memory::add((4 * w as u64 * h as u64 * std::mem::size_of::<T>() as u64) / 3);
        debug!("Built MIPMap {} X {} with {} levels", w, h, mipmap.levels());

        mipmap
    }

    pub fn width(&self) -> usize { self.pyramid[0].ncols() }
    pub fn height(&self) -> usize { self.pyramid[0].nrows() }
    pub fn levels(&self) -> usize { self.pyramid.len() }

    pub fn texel(&self, level: usize, s: isize, t: isize) -> T {
        let l = &self.pyramid[level];
        let (w, h) = (l.ncols() as isize, l.nrows() as isize);

        let s = match self.wrap_s {
            ImageWrap::Repeat => mod_(s, w),
            ImageWrap::Clamp  => clamp(s, 0, w - 1),
            ImageWrap::Black  => {
                if s < 0 || s >= w { return self.black; }
                s
            }
        };
        let t = match self.wrap_t {
            ImageWrap::Repeat => mod_(t, h),
            ImageWrap::Clamp  => clamp(t, 0, h - 1),
            ImageWrap::Black  => {
                if t < 0 || t >= h { return self.black; }
                t
            }
        };

        l[[t as usize, s as usize]]
    }

    pub fn nearest(&self, level: usize, st: &Point2f) -> T {
        let level = level.min(self.levels() - 1);
        let l = &self.pyramid[level];
        let s = (st[0] * l.ncols() as Float).floor() as isize;
        let t = (st[1] * l.nrows() as Float).floor() as isize;

        self.texel(level, s, t)
    }

    pub fn bilerp(&self, level: usize, st: &Point2f) -> T {
        nbilerp_lookups::inc();
        let level = level.min(self.levels() - 1);
        let l = &self.pyramid[level];
        let s = st[0] * l.ncols() as Float - 0.5;
        let t = st[1] * l.nrows() as Float - 0.5;
        let (s0, t0) = (s.floor() as isize, t.floor() as isize);
        let (ds, dt) = (s - s0 as Float, t - t0 as Float);

        self.texel(level, s0, t0) * ((1.0 - ds) * (1.0 - dt)) +
        self.texel(level, s0, t0 + 1) * ((1.0 - ds) * dt) +
        self.texel(level, s0 + 1, t0) * (ds * (1.0 - dt)) +
        self.texel(level, s0 + 1, t0 + 1) * (ds * dt)
    }

    /// Trilinear lookup with the level chosen from a filter width in [0, 1]
    /// texture space.
    pub fn lookup(&self, st: &Point2f, width: Float) -> T {
        let level = (self.levels() - 1) as Float + width.max(1.0e-8).log2();

        self.lookup_level(st, level)
    }

    /// Trilinear lookup at a fractional pyramid level.
    pub fn lookup_level(&self, st: &Point2f, level: Float) -> T {
        ntrilerp_lookups::inc();

        if level <= 0.0 {
            self.bilerp(0, st)
        } else if level >= (self.levels() - 1) as Float {
            self.bilerp(self.levels() - 1, st)
        } else {
            let ilevel = level.floor();
            let delta = level - ilevel;

            lerp(
                delta,
                self.bilerp(ilevel as usize, st),
                self.bilerp(ilevel as usize + 1, st))
        }
    }
}
