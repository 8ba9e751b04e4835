use crate::core::pbrt::{Float, clamp, inverse_gamma_correct};
use num::Zero;
use std::ops::{Add, AddAssign, Sub, Mul, MulAssign, Div, DivAssign, Index, IndexMut};
use std::fmt::{Display, Result, Formatter};

pub type Spectrum = RGBSpectrum;

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct RGBSpectrum {
    c: [Float; 3]
}

impl RGBSpectrum {
    pub fn new(v: Float) -> Self {
        Self { c: [v; 3] }
    }

    pub fn rgb(r: Float, g: Float, b: Float) -> Self {
        Self { c: [r, g, b] }
    }

    pub fn to_rgb(&self) -> [Float; 3] {
        self.c
    }

    pub fn y(&self) -> Float {
        let y_weight = [0.212671, 0.715160, 0.072169];

        y_weight[0] * self.c[0] + y_weight[1] * self.c[1] + y_weight[2] * self.c[2]
    }

    pub fn is_black(&self) -> bool {
        self.c.iter().all(|v| *v == 0.0)
    }

    pub fn clamps(&self, low: Float, high: Float) -> Self {
        Self::rgb(
            clamp(self.c[0], low, high),
            clamp(self.c[1], low, high),
            clamp(self.c[2], low, high))
    }

    pub fn sqrt(&self) -> Self {
        self.map(|v| v.sqrt())
    }

    pub fn powf(&self, e: Float) -> Self {
        self.map(|v| v.max(0.0).powf(e))
    }

    pub fn inverse_gamma_correct(&self) -> Self {
        self.map(inverse_gamma_correct)
    }

    pub fn lerp(t: Float, s1: &Self, s2: &Self) -> Self {
        *s1 * (1.0 - t) + *s2 * t
    }

    /// Per-channel maximum.
    pub fn map_max(&self, s: &Self) -> Self {
        Self::rgb(self.c[0].max(s.c[0]), self.c[1].max(s.c[1]), self.c[2].max(s.c[2]))
    }

    pub fn map<F: Fn(Float) -> Float>(&self, f: F) -> Self {
        Self::rgb(f(self.c[0]), f(self.c[1]), f(self.c[2]))
    }
}

impl Zero for RGBSpectrum {
    fn zero() -> Self {
        RGBSpectrum::default()
    }

    fn is_zero(&self) -> bool {
        self.is_black()
    }
}

impl Add for RGBSpectrum {
    type Output = RGBSpectrum;

    fn add(self, rhs: Self) -> Self {
        Self::rgb(self.c[0] + rhs.c[0], self.c[1] + rhs.c[1], self.c[2] + rhs.c[2])
    }
}

impl AddAssign for RGBSpectrum {
    fn add_assign(&mut self, rhs: Self) {
        for i in 0..3 { self.c[i] += rhs.c[i]; }
    }
}

impl Sub for RGBSpectrum {
    type Output = RGBSpectrum;

    fn sub(self, rhs: Self) -> Self {
        Self::rgb(self.c[0] - rhs.c[0], self.c[1] - rhs.c[1], self.c[2] - rhs.c[2])
    }
}

impl Mul for RGBSpectrum {
    type Output = RGBSpectrum;

    fn mul(self, rhs: Self) -> Self {
        Self::rgb(self.c[0] * rhs.c[0], self.c[1] * rhs.c[1], self.c[2] * rhs.c[2])
    }
}

impl MulAssign for RGBSpectrum {
    fn mul_assign(&mut self, rhs: Self) {
        for i in 0..3 { self.c[i] *= rhs.c[i]; }
    }
}

impl Mul<Float> for RGBSpectrum {
    type Output = RGBSpectrum;

    fn mul(self, rhs: Float) -> Self {
        self.map(|v| v * rhs)
    }
}

impl MulAssign<Float> for RGBSpectrum {
    fn mul_assign(&mut self, rhs: Float) {
        for i in 0..3 { self.c[i] *= rhs; }
    }
}

impl Div<Float> for RGBSpectrum {
    type Output = RGBSpectrum;

    fn div(self, rhs: Float) -> Self {
        assert_ne!(rhs, 0.0);
        let inv = 1.0 / rhs;

        self.map(|v| v * inv)
    }
}

impl DivAssign<Float> for RGBSpectrum {
    fn div_assign(&mut self, rhs: Float) {
        assert_ne!(rhs, 0.0);
        let inv = 1.0 / rhs;

        for i in 0..3 { self.c[i] *= inv; }
    }
}

impl Index<usize> for RGBSpectrum {
    type Output = Float;

    fn index(&self, i: usize) -> &Float {
        &self.c[i]
    }
}

impl IndexMut<usize> for RGBSpectrum {
    fn index_mut(&mut self, i: usize) -> &mut Float {
        &mut self.c[i]
    }
}

impl Display for RGBSpectrum {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "[ {}, {}, {} ]", self.c[0], self.c[1], self.c[2])
    }
}
