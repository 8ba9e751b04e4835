use crate::core::geometry::vector::{Vector3f, vec3_coordinate_system};
use crate::core::pbrt::*;

/// Orthonormal basis a direction is expressed in before an equirectangular
/// lookup: `right` maps to x, `up` to y and `front` to z.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    pub right   : Vector3f,
    pub up      : Vector3f,
    pub front   : Vector3f
}

impl Frame {
    /// Build a frame from an up and right vector. `right` is re-orthogonalized
    /// against `up`; `front = right x up`.
    pub fn from_up_right(up: &Vector3f, right: &Vector3f) -> Self {
        let up = up.normalize();
        let mut right = *right - up * right.dot(&up);

        if right.length_squared() < 1.0e-12 {
            let mut v2 = Vector3f::default();
            let mut v3 = Vector3f::default();
            vec3_coordinate_system(&up, &mut v2, &mut v3);
            right = v2;
        }

        let right = right.normalize();
        let front = right.cross(&up);

        Self { right, up, front }
    }

    pub fn to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.right), v.dot(&self.up), v.dot(&self.front))
    }

    pub fn from_local(&self, v: &Vector3f) -> Vector3f {
        self.right * v.x + self.up * v.y + self.front * v.z
    }
}

impl Default for Frame {
    fn default() -> Self {
        Frame::from_up_right(&Vector3f::new(0.0, 1.0, 0.0), &Vector3f::new(1.0, 0.0, 0.0))
    }
}

/// Map a local direction to equirectangular (s, t) coordinates with t = 0 at
/// the top image row.
pub fn equirect_coords(local: &Vector3f) -> (Float, Float) {
    let u = 0.5 * local.x.atan2(local.z) * INV_PI + 0.5;
    let horizontal = (local.x * local.x + local.z * local.z).sqrt();
    let v = local.y.atan2(horizontal) * INV_PI + 0.5;

    (u, 1.0 - v)
}

/// Inverse of [`equirect_coords`].
pub fn equirect_direction(s: Float, t: Float) -> Vector3f {
    let azimuth = (s - 0.5) * 2.0 * PI;
    let elevation = (0.5 - t) * PI;
    let cos_el = elevation.cos();

    Vector3f::new(cos_el * azimuth.sin(), elevation.sin(), cos_el * azimuth.cos())
}
