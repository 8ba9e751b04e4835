use super::point::{Point2, Point3, Point3f};
use super::vector::Vector3;
use crate::core::pbrt::Float;
use num::{Num, Bounded};
use std::fmt::{Display, Result, Formatter};

pub type Bounds2i = Bounds2<isize>;
pub type Bounds3f = Bounds3<Float>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2<T>
where T: Num
{
    pub p_min: Point2<T>,
    pub p_max: Point2<T>
}

impl<T> Bounds2<T>
where T: Num + Copy + Ord
{
    pub fn from_points(p1: &Point2<T>, p2: &Point2<T>) -> Self {
        Self {
            p_min: Point2::new(std::cmp::min(p1.x, p2.x), std::cmp::min(p1.y, p2.y)),
            p_max: Point2::new(std::cmp::max(p1.x, p2.x), std::cmp::max(p1.y, p2.y))
        }
    }
}

impl<T: Num + Display> Display for Bounds2<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "[ {} - {} ]", self.p_min, self.p_max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds3<T>
where T: Num
{
    pub p_min: Point3<T>,
    pub p_max: Point3<T>
}

impl<T> Default for Bounds3<T>
    where T: Bounded + Num + Copy
{
    fn default() -> Self {
        let min_num = T::min_value();
        let max_num = T::max_value();

        Self {
            p_min: Point3::new(max_num, max_num, max_num),
            p_max: Point3::new(min_num, min_num, min_num)
        }
    }
}

impl Bounds3f {
    pub fn from_point(p: &Point3f) -> Self {
        Self { p_min: *p, p_max: *p }
    }

    pub fn from_points(p1: Point3f, p2: Point3f) -> Self {
        Self { p_min: p1.min(&p2), p_max: p1.max(&p2) }
    }

    /// True when nothing was ever added to the bounds.
    pub fn is_empty(&self) -> bool {
        self.p_min.x > self.p_max.x || self.p_min.y > self.p_max.y || self.p_min.z > self.p_max.z
    }

    pub fn corner(&self, c: usize) -> Point3f {
        Point3f::new(
            if c & 1 == 0 { self.p_min.x } else { self.p_max.x },
            if c & 2 == 0 { self.p_min.y } else { self.p_max.y },
            if c & 4 == 0 { self.p_min.z } else { self.p_max.z })
    }

    pub fn diagonal(&self) -> Vector3<Float> {
        self.p_max - self.p_min
    }

    pub fn centre(&self) -> Point3f {
        (self.p_min + self.p_max) / 2.0
    }

    pub fn union_point(&self, p: &Point3f) -> Self {
        Self { p_min: self.p_min.min(p), p_max: self.p_max.max(p) }
    }

    pub fn union_bounds(&self, b: &Self) -> Self {
        if b.is_empty() { return *self; }
        if self.is_empty() { return *b; }

        Self { p_min: self.p_min.min(&b.p_min), p_max: self.p_max.max(&b.p_max) }
    }

    pub fn inside(&self, p: &Point3f) -> bool {
        p.x >= self.p_min.x && p.x <= self.p_max.x &&
        p.y >= self.p_min.y && p.y <= self.p_max.y &&
        p.z >= self.p_min.z && p.z <= self.p_max.z
    }
}

impl Display for Bounds3f {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "[ {} - {} ]", self.p_min, self.p_max)
    }
}
