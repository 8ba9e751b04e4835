use std::ops::{Sub, Add, Mul};

use num::{One, Zero};
use std::sync::{Arc, Weak};
use std::path::PathBuf;
use lazy_static::lazy_static;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use parking_lot::RwLock;

lazy_static! {
    static ref PB: RwLock<Option<Weak<ProgressBar>>> = RwLock::new(None);
}

pub fn set_progress_bar(pb: Option<Weak<ProgressBar>>) {
    *PB.write() = pb;
}

pub fn get_progress_bar() -> Option<Arc<ProgressBar>> {
    PB.read().as_ref()?.upgrade()
}

static QUIET: AtomicBool = AtomicBool::new(false);

pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

/// Progress bar for a long running step, registered as the global bar so
/// log output is printed above it. Hidden when running quiet.
pub fn start_progress(len: u64, message: &str) -> Arc<ProgressBar> {
    let pb = if QUIET.load(Ordering::Relaxed) {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(len)
    };

    pb.set_style(ProgressStyle::default_bar()
        .template("{msg:>12} [{elapsed_precise}] [{wide_bar}] {percent}% ({eta})"));
    pb.set_message(message);

    let pb = Arc::new(pb);
    set_progress_bar(Some(Arc::downgrade(&pb)));

    pb
}

pub type Float = f32;

pub const PI                : Float = 3.14159265358979323846;
pub const PI_OVER2          : Float = 1.57079632679489661923;
pub const INV_PI            : Float = 0.31830988618379067154;

/// Gamma used by the fragment output of the PBR shading path.
pub const DISPLAY_GAMMA     : Float = 2.2;

#[derive(Clone)]
pub struct Options {
    pub nthreads        : usize,
    pub quick_render    : bool,
    pub quiet           : bool,
    pub interactive     : bool,
    pub image_file      : Option<PathBuf>
}

impl Options {
    pub fn new() -> Self {
        Self {
            nthreads: 0,
            quick_render: false,
            quiet: false,
            interactive: false,
            image_file: None
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

pub fn log2(x: Float) -> Float {
    let inv_log2 = 1.442695040888963387004650940071;

    x.ln() * inv_log2
}

pub fn lerp<T, S>(t: S, x: T, y: T) -> T
    where
        S: Copy + num::One + Sub<S, Output=S>,
        T: Add<T, Output=T> + Mul<S, Output=T>
{
    let one: S = One::one();

    x * (one - t) + y * t
}

#[inline(always)]
pub fn radians(deg: Float) -> Float {
    (PI / 180.0) as Float * deg
}

pub fn clamp<T>(val: T, low: T, high: T) -> T
where T: PartialOrd
{
    if val < low {
        low
    } else if val > high {
        high
    } else {
        val
    }
}

pub fn gamma_correct(value: Float) -> Float {
    if value <= 0.0031308 {
        return 12.92 * value;
    }

    1.055 * value.powf(1.0 / 2.4) - 0.055
}

pub fn inverse_gamma_correct(value: Float) -> Float {
    if value <= 0.04045 { return value * 1.0 / 12.92 }

    ((value + 0.055) * 1.0 / 1.055).powf(2.4)
}

/// Quantize a display value in [0, 1] to 8 bits.
pub fn to_byte(value: Float) -> u8 {
    clamp(255.0 * value + 0.5, 0.0, 255.0) as u8
}

pub fn mod_<T>(a: T, b: T) -> T
where
    T: Copy + Zero + PartialOrd + num::Num
{
    let result = a - (a / b) * b;

    match result < Zero::zero() {
        true => result + b,
        _ => result
    }
}
