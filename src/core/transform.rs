use nalgebra::Matrix4;
use crate::core::pbrt::*;
use crate::core::geometry::vector::Vector3f;
use crate::core::geometry::point::Point3f;
use crate::core::geometry::bounds::Bounds3f;
use std::ops::Mul;
use log::error;

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Transform {
    pub m       : Matrix4<Float>,
    pub m_inv   : Matrix4<Float>
}

impl Default for Transform {
    fn default() -> Self {
        Transform {
            m: Matrix4::identity(),
            m_inv: Matrix4::identity()
        }
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_matrix(m: &Matrix4<Float>) -> Self {
        let m_inv = match m.try_inverse() {
            Some(inv) => inv,
            None => {
                error!("Singular matrix in Transform::from_matrix");
                Matrix4::from_element(Float::NAN)
            }
        };

        Self { m: *m, m_inv }
    }

    pub fn from_matrices(m: &Matrix4<Float>, m_inv: &Matrix4<Float>) -> Self {
        Self { m: *m, m_inv: *m_inv }
    }

    pub fn inverse(t: &Transform) -> Self {
        Self { m: t.m_inv, m_inv: t.m }
    }

    pub fn translate(delta: &Vector3f) -> Self {
        let m = Matrix4::new(
            1.0, 0.0, 0.0, delta.x,
            0.0, 1.0, 0.0, delta.y,
            0.0, 0.0, 1.0, delta.z,
            0.0, 0.0, 0.0, 1.0);

        let m_inv = Matrix4::new(
            1.0, 0.0, 0.0, -delta.x,
            0.0, 1.0, 0.0, -delta.y,
            0.0, 0.0, 1.0, -delta.z,
            0.0, 0.0, 0.0, 1.0);

        Self { m, m_inv }
    }

    pub fn scale(x: Float, y: Float, z: Float) -> Self {
        let m = Matrix4::new(
            x, 0.0, 0.0, 0.0,
            0.0, y, 0.0, 0.0,
            0.0, 0.0, z, 0.0,
            0.0, 0.0, 0.0, 1.0);

        let m_inv = Matrix4::new(
            1.0 / x, 0.0, 0.0, 0.0,
            0.0, 1.0 / y, 0.0, 0.0,
            0.0, 0.0, 1.0 / z, 0.0,
            0.0, 0.0, 0.0, 1.0);

        Self { m, m_inv }
    }

    /// Right-handed world to camera transform; the camera looks down -z.
    pub fn look_at(pos: &Point3f, look: &Point3f, up: &Vector3f) -> Self {
        let dir = (*look - *pos).normalize();

        if up.normalize().cross(&dir).length() == 0.0 {
            error!(
                "\"up\" vector ({}, {}, {}) and viewing direction ({}, {}, {}) \
                passed to look_at are pointing in the same direction. Using \
                the identity transformation.", up.x, up.y, up.z, dir.x, dir.y, dir.z);

            return Transform::default();
        }

        let right = dir.cross(&up.normalize()).normalize();
        let new_up = right.cross(&dir);

        let world_to_camera = Matrix4::new(
            right.x, right.y, right.z, -right.dot(&Vector3f::from(*pos)),
            new_up.x, new_up.y, new_up.z, -new_up.dot(&Vector3f::from(*pos)),
            -dir.x, -dir.y, -dir.z, dir.dot(&Vector3f::from(*pos)),
            0.0, 0.0, 0.0, 1.0);

        Transform::from_matrix(&world_to_camera)
    }

    /// OpenGL style projection: camera space to clip space, depth in [-1, 1].
    pub fn perspective(fov: Float, aspect: Float, n: Float, f: Float) -> Self {
        let cot = 1.0 / (radians(fov) / 2.0).tan();
        let m = Matrix4::new(
            cot / aspect, 0.0, 0.0, 0.0,
            0.0, cot, 0.0, 0.0,
            0.0, 0.0, (f + n) / (n - f), 2.0 * f * n / (n - f),
            0.0, 0.0, -1.0, 0.0);

        Transform::from_matrix(&m)
    }

    pub fn transform_point(&self, p: &Point3f) -> Point3f {
        let [x, y, z, w] = self.transform_point_homogeneous(p);

        if w == 1.0 {
            Point3f::new(x, y, z)
        } else {
            Point3f::new(x, y, z) / w
        }
    }

    pub fn transform_point_homogeneous(&self, p: &Point3f) -> [Float; 4] {
        let m = &self.m;

        [
            m[(0, 0)] * p.x + m[(0, 1)] * p.y + m[(0, 2)] * p.z + m[(0, 3)],
            m[(1, 0)] * p.x + m[(1, 1)] * p.y + m[(1, 2)] * p.z + m[(1, 3)],
            m[(2, 0)] * p.x + m[(2, 1)] * p.y + m[(2, 2)] * p.z + m[(2, 3)],
            m[(3, 0)] * p.x + m[(3, 1)] * p.y + m[(3, 2)] * p.z + m[(3, 3)]
        ]
    }

    /// Normals transform with the inverse transpose.
    pub fn transform_normal(&self, n: &Vector3f) -> Vector3f {
        let mi = &self.m_inv;

        Vector3f::new(
            mi[(0, 0)] * n.x + mi[(1, 0)] * n.y + mi[(2, 0)] * n.z,
            mi[(0, 1)] * n.x + mi[(1, 1)] * n.y + mi[(2, 1)] * n.z,
            mi[(0, 2)] * n.x + mi[(1, 2)] * n.y + mi[(2, 2)] * n.z)
    }

    pub fn transform_bounds(&self, b: &Bounds3f) -> Bounds3f {
        if b.is_empty() { return *b; }

        (0..8).fold(Bounds3f::default(), |acc, c| {
            acc.union_point(&self.transform_point(&b.corner(c)))
        })
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, t2: Transform) -> Self::Output {
        Transform::from_matrices(&(self.m * t2.m), &(t2.m_inv * self.m_inv))
    }
}
