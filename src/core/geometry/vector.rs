use num;
use super::point::Point3;
use std::ops::{Add, Mul, AddAssign, MulAssign, SubAssign, Sub, Div, DivAssign, Index, IndexMut, Neg};
use std::fmt::{Display, Result, Formatter};
use crate::core::pbrt::Float;

// Component-wise operator impls shared by vectors and points.

macro_rules! impl_binop {
    ($tr:ident, $f:ident, $op:tt, $lhs:ident, $rhs:ident => $out:ident, $($c:ident),+) => {
        impl<T> $tr<$rhs<T>> for $lhs<T>
        where T: Copy + $tr<T, Output=T>
        {
            type Output = $out<T>;

            fn $f(self, rhs: $rhs<T>) -> $out<T> {
                $out { $($c: self.$c $op rhs.$c),+ }
            }
        }
    }
}

macro_rules! impl_assignop {
    ($tr:ident, $f:ident, $op:tt, $lhs:ident, $rhs:ident, $($c:ident),+) => {
        impl<T: $tr> $tr<$rhs<T>> for $lhs<T> {
            fn $f(&mut self, rhs: $rhs<T>) {
                $(self.$c $op rhs.$c;)+
            }
        }
    }
}

macro_rules! impl_scale {
    ($t:ident, $($c:ident),+) => {
        impl<T> Mul<T> for $t<T>
        where T: Copy + Mul<T, Output=T>
        {
            type Output = $t<T>;

            fn mul(self, s: T) -> $t<T> {
                $t { $($c: self.$c * s),+ }
            }
        }

        impl Div<Float> for $t<Float> {
            type Output = $t<Float>;

            fn div(self, s: Float) -> $t<Float> {
                assert_ne!(0.0 as Float, s);
                let inv = 1.0 as Float / s;

                $t { $($c: self.$c * inv),+ }
            }
        }
    }
}

macro_rules! impl_components {
    ($t:ident, $($i:literal => $c:ident),+) => {
        impl<T> Index<usize> for $t<T> {
            type Output = T;

            fn index(&self, i: usize) -> &T {
                match i {
                    $($i => &self.$c,)+
                    _ => panic!("{} component index out of range: {}", stringify!($t), i)
                }
            }
        }

        impl<T> IndexMut<usize> for $t<T> {
            fn index_mut(&mut self, i: usize) -> &mut T {
                match i {
                    $($i => &mut self.$c,)+
                    _ => panic!("{} component index out of range: {}", stringify!($t), i)
                }
            }
        }

        impl<T: Display> Display for $t<T> {
            fn fmt(&self, f: &mut Formatter<'_>) -> Result {
                let parts = [$(self.$c.to_string()),+];

                write!(f, "[ {} ]", parts.join(", "))
            }
        }
    }
}

macro_rules! impl_convert {
    ($from:ident => $to:ident, $($c:ident),+) => {
        impl<T> From<$from<T>> for $to<T> {
            fn from(v: $from<T>) -> Self {
                $to { $($c: v.$c),+ }
            }
        }
    }
}

pub type Vector3f = Vector3<Float>;

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Vector3<T> {
    pub x: T,
    pub y: T,
    pub z: T
}

impl<T> Vector3<T> {
    pub fn new(x: T, y: T, z: T) -> Vector3<T> {
        Vector3 { x, y, z }
    }

    pub fn dot(&self, v: &Self) -> T
    where T: Copy + Add<T, Output=T> + Mul<T, Output=T>
    {
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    pub fn length_squared(&self) -> T
    where T: Copy + Add<T, Output=T> + Mul<T, Output=T>
    {
        self.dot(self)
    }

    pub fn length(&self) -> T
    where T: num::Float
    {
        self.length_squared().sqrt()
    }
}

impl Vector3f {
    pub fn normalize(&self) -> Self {
        *self / self.length()
    }

    /// Evaluated in double precision; the IBL frames cross nearly parallel
    /// vectors near the poles.
    pub fn cross(&self, v: &Vector3f) -> Vector3f {
        let (ax, ay, az) = (self.x as f64, self.y as f64, self.z as f64);
        let (bx, by, bz) = (v.x as f64, v.y as f64, v.z as f64);

        Vector3f::new(
            (ay * bz - az * by) as Float,
            (az * bx - ax * bz) as Float,
            (ax * by - ay * bx) as Float)
    }

    /// Mirror `self` (pointing away from the surface) about `n`.
    pub fn reflect(&self, n: &Vector3f) -> Vector3f {
        *n * (2.0 * self.dot(n)) - *self
    }

    pub fn lerp(&self, t: Float, v: &Vector3f) -> Vector3f {
        *self * (1.0 - t) + *v * t
    }
}

impl_binop!(Add, add, +, Vector3, Vector3 => Vector3, x, y, z);
impl_binop!(Sub, sub, -, Vector3, Vector3 => Vector3, x, y, z);
impl_assignop!(AddAssign, add_assign, +=, Vector3, Vector3, x, y, z);
impl_assignop!(SubAssign, sub_assign, -=, Vector3, Vector3, x, y, z);
impl_scale!(Vector3, x, y, z);
impl_components!(Vector3, 0 => x, 1 => y, 2 => z);
impl_convert!(Point3 => Vector3, x, y, z);

impl<T> Neg for Vector3<T>
where T: Neg<Output=T>
{
    type Output = Vector3<T>;

    fn neg(self) -> Self {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

impl<T> MulAssign<T> for Vector3<T>
where T: Copy + MulAssign
{
    fn mul_assign(&mut self, s: T) {
        self.x *= s;
        self.y *= s;
        self.z *= s;
    }
}

impl DivAssign<Float> for Vector3f {
    fn div_assign(&mut self, s: Float) {
        *self *= 1.0 / s;
    }
}

/// Build an orthonormal basis around the normalized vector `v1`.
pub fn vec3_coordinate_system(v1: &Vector3f, v2: &mut Vector3f, v3: &mut Vector3f) {
    *v2 = if v1.x.abs() > v1.y.abs() {
        Vector3f::new(-v1.z, 0.0, v1.x) / (v1.x * v1.x + v1.z * v1.z).sqrt()
    } else {
        Vector3f::new(0.0, v1.z, -v1.y) / (v1.y * v1.y + v1.z * v1.z).sqrt()
    };

    *v3 = v1.cross(v2);
}
