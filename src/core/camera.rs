use log::debug;
use crate::core::pbrt::{Float, radians};
use crate::core::geometry::point::Point3f;
use crate::core::geometry::vector::Vector3f;
use crate::core::geometry::bounds::Bounds3f;
use crate::core::transform::Transform;

/// Perspective camera looking from `position` at `focal_point`.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position        : Point3f,
    pub focal_point     : Point3f,
    pub view_up         : Vector3f,
    /// Vertical field of view in degrees
    pub view_angle      : Float,
    pub clipping_range  : (Float, Float)
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Point3f::new(0.0, 0.0, 1.0),
            focal_point: Point3f::new(0.0, 0.0, 0.0),
            view_up: Vector3f::new(0.0, 1.0, 0.0),
            view_angle: 30.0,
            clipping_range: (0.01, 1000.01)
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn distance(&self) -> Float {
        self.position.distance(&self.focal_point)
    }

    /// Unit vector from the position to the focal point.
    pub fn direction_of_projection(&self) -> Vector3f {
        (self.focal_point - self.position).normalize()
    }

    /// Unit vector pointing from the focal point back to the camera.
    pub fn view_plane_normal(&self) -> Vector3f {
        -self.direction_of_projection()
    }

    /// Centre the camera on `bounds` so the bounding sphere fills the view
    /// angle, keeping the current view direction.
    pub fn reset(&mut self, bounds: &Bounds3f) {
        let vn = self.view_plane_normal();

        if bounds.is_empty() {
            debug!("Resetting camera with empty bounds");
            return;
        }

        let centre = bounds.centre();
        let d = bounds.diagonal();
        let mut radius = 0.5 * d.length();

        if radius == 0.0 { radius = 1.0; }

        let distance = radius / (radians(self.view_angle) * 0.5).sin();

        // Pick a new up vector if it is parallel to the view direction
        if self.view_up.normalize().cross(&vn).length() < 1.0e-3 {
            self.view_up = Vector3f::new(-vn.y, vn.z, vn.x);
        }

        self.focal_point = centre;
        self.position = centre + vn * distance;
        self.orthogonalize_view_up();
        self.reset_clipping_range(bounds);

        debug!("Camera reset: position {} focal point {} distance {}",
               self.position, self.focal_point, distance);
    }

    /// Fit near and far planes around `bounds`.
    pub fn reset_clipping_range(&mut self, bounds: &Bounds3f) {
        if bounds.is_empty() { return; }

        let dop = self.direction_of_projection();
        let (mut near, mut far) = (Float::INFINITY, Float::NEG_INFINITY);

        for c in 0..8 {
            let z = (bounds.corner(c) - self.position).dot(&dop);
            near = near.min(z);
            far = far.max(z);
        }

        // Pad the range slightly and keep the near plane in front of the eye
        let pad = 0.01 * (far - near).max(1.0e-3);
        far += pad;
        near = (near - pad).max(0.001 * far);

        self.clipping_range = (near, far);
    }

    /// Rotate the position about the view up vector centred at the focal point.
    pub fn azimuth(&mut self, angle: Float) {
        let up = self.view_up.normalize();
        let offset = self.position - self.focal_point;

        self.position = self.focal_point + rotate(&offset, &up, angle);
    }

    /// Rotate the position about the cross product of the view plane normal
    /// and the view up vector.
    pub fn elevation(&mut self, angle: Float) {
        let axis = self.view_up.cross(&self.view_plane_normal()).normalize();
        let offset = self.position - self.focal_point;
        let rotated = rotate(&offset, &axis, -angle);

        // Stop short of the poles
        if rotated.normalize().cross(&self.view_up.normalize()).length() < 1.0e-3 { return; }

        self.position = self.focal_point + rotated;
    }

    /// Move the position toward (`factor > 1`) or away from the focal point.
    pub fn dolly(&mut self, factor: Float) {
        if factor <= 0.0 { return; }

        let d = self.distance() / factor;
        self.position = self.focal_point - self.direction_of_projection() * d;
    }

    /// Narrow (`factor > 1`) or widen the view angle.
    pub fn zoom(&mut self, factor: Float) {
        if factor <= 0.0 { return; }

        self.view_angle = (self.view_angle / factor).max(0.00000001).min(179.0);
    }

    /// Shift both the position and the focal point by `delta`.
    pub fn pan(&mut self, delta: &Vector3f) {
        self.position += *delta;
        self.focal_point += *delta;
    }

    pub fn orthogonalize_view_up(&mut self) {
        let dop = self.direction_of_projection();
        let right = dop.cross(&self.view_up);

        if right.length() == 0.0 { return; }

        self.view_up = right.normalize().cross(&dop).normalize();
    }

    /// World to camera (eye) space.
    pub fn view_transform(&self) -> Transform {
        Transform::look_at(&self.position, &self.focal_point, &self.view_up)
    }

    /// Camera to clip space for a viewport of the given aspect ratio.
    pub fn projection_transform(&self, aspect: Float) -> Transform {
        Transform::perspective(self.view_angle, aspect, self.clipping_range.0, self.clipping_range.1)
    }
}

/// Rodrigues rotation of `v` about the unit `axis` by `angle` degrees.
fn rotate(v: &Vector3f, axis: &Vector3f, angle: Float) -> Vector3f {
    let (s, c) = radians(angle).sin_cos();

    *v * c + axis.cross(v) * s + *axis * (axis.dot(v) * (1.0 - c))
}
