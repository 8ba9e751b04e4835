use crate::core::pbrt::Float;
use crate::core::spectrum::Spectrum;
use crate::core::geometry::point::Point3f;
use crate::core::geometry::vector::Vector3f;
use crate::core::camera::Camera;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LightKind {
    /// Placed at the camera and pointing at its focal point
    Headlight,
    /// Fixed in world space
    SceneLight
}

/// Directional light shining from `position` toward `focal_point`.
#[derive(Debug, Clone)]
pub struct Light {
    pub kind        : LightKind,
    pub position    : Point3f,
    pub focal_point : Point3f,
    pub color       : Spectrum,
    pub intensity   : Float,
    pub switch      : bool
}

impl Light {
    pub fn headlight() -> Self {
        Self {
            kind: LightKind::Headlight,
            position: Point3f::new(0.0, 0.0, 1.0),
            focal_point: Point3f::new(0.0, 0.0, 0.0),
            color: Spectrum::new(1.0),
            intensity: 1.0,
            switch: true
        }
    }

    pub fn scene_light(position: Point3f, focal_point: Point3f) -> Self {
        Self {
            kind: LightKind::SceneLight,
            position,
            focal_point,
            ..Self::headlight()
        }
    }

    /// Follow the camera when this is a headlight.
    pub fn update(&mut self, camera: &Camera) {
        if self.kind == LightKind::Headlight {
            self.position = camera.position;
            self.focal_point = camera.focal_point;
        }
    }

    /// Unit vector from a lit surface toward the light.
    pub fn direction_to_light(&self) -> Vector3f {
        let d = self.position - self.focal_point;

        if d.length_squared() == 0.0 { Vector3f::new(0.0, 0.0, 1.0) } else { d.normalize() }
    }

    pub fn radiance(&self) -> Spectrum {
        self.color * self.intensity
    }
}
