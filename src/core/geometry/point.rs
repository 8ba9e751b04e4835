use num;
use crate::core::pbrt::*;
use super::vector::Vector3;
use std::ops::{Add, Mul, AddAssign, Sub, Div, Index, IndexMut};
use std::fmt::{Display, Result, Formatter};

pub type Point2f = Point2<Float>;
pub type Point2i = Point2<isize>;
pub type Point3f = Point3<Float>;

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point2<T> {
    pub x: T,
    pub y: T
}

impl<T> Point2<T> {
    pub fn new(x: T, y: T) -> Point2<T> {
        Point2 { x, y }
    }
}

impl_components!(Point2, 0 => x, 1 => y);

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point3<T> {
    pub x: T,
    pub y: T,
    pub z: T
}

impl<T> Point3<T> {
    pub fn new(x: T, y: T, z: T) -> Point3<T> {
        Point3 { x, y, z }
    }

    pub fn distance(&self, p: &Point3<T>) -> T
    where T: num::Float
    {
        (*self - *p).length()
    }

    pub fn min(&self, p: &Self) -> Self
    where T: num::Float
    {
        Point3::new(self.x.min(p.x), self.y.min(p.y), self.z.min(p.z))
    }

    pub fn max(&self, p: &Self) -> Self
    where T: num::Float
    {
        Point3::new(self.x.max(p.x), self.y.max(p.y), self.z.max(p.z))
    }
}

impl Point3f {
    pub fn lerp(&self, t: Float, p: &Self) -> Self {
        Point3f::new(lerp(t, self.x, p.x), lerp(t, self.y, p.y), lerp(t, self.z, p.z))
    }
}

// Point + Point only appears in weighted sums such as bounds centres.
impl_binop!(Add, add, +, Point3, Point3 => Point3, x, y, z);
impl_binop!(Add, add, +, Point3, Vector3 => Point3, x, y, z);
impl_binop!(Sub, sub, -, Point3, Point3 => Vector3, x, y, z);
impl_binop!(Sub, sub, -, Point3, Vector3 => Point3, x, y, z);
impl_assignop!(AddAssign, add_assign, +=, Point3, Vector3, x, y, z);
impl_scale!(Point3, x, y, z);
impl_components!(Point3, 0 => x, 1 => y, 2 => z);
impl_convert!(Vector3 => Point3, x, y, z);
