use std::sync::Arc;
use crate::core::polydata::PolyData;
use crate::core::property::Property;
use crate::core::skybox::Skybox;
use crate::core::transform::Transform;
use crate::core::geometry::vector::Vector3f;
use crate::core::geometry::bounds::Bounds3f;
use crate::core::pbrt::Float;

/// Maps a mesh to renderable geometry; shared between actors.
#[derive(Debug, Clone)]
pub struct PolyDataMapper {
    input: Arc<PolyData>
}

impl PolyDataMapper {
    pub fn new(input: Arc<PolyData>) -> Self {
        Self { input }
    }

    pub fn input(&self) -> &Arc<PolyData> { &self.input }

    pub fn bounds(&self) -> Bounds3f {
        self.input.bounds()
    }
}

#[derive(Debug, Clone)]
pub struct Actor {
    pub position    : Vector3f,
    pub scale       : Vector3f,
    pub mapper      : Arc<PolyDataMapper>,
    pub property    : Property,
    pub visibility  : bool
}

impl Actor {
    pub fn new(mapper: Arc<PolyDataMapper>) -> Self {
        Self {
            position: Vector3f::default(),
            scale: Vector3f::new(1.0, 1.0, 1.0),
            mapper,
            property: Property::default(),
            visibility: true
        }
    }

    pub fn set_position(&mut self, x: Float, y: Float, z: Float) {
        self.position = Vector3f::new(x, y, z);
    }

    /// Model to world transform.
    pub fn matrix(&self) -> Transform {
        Transform::translate(&self.position) * Transform::scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn bounds(&self) -> Bounds3f {
        self.matrix().transform_bounds(&self.mapper.bounds())
    }
}

/// Anything a renderer draws.
#[derive(Debug, Clone)]
pub enum Prop {
    Actor(Actor),
    Skybox(Skybox)
}

impl Prop {
    pub fn visibility(&self) -> bool {
        match self {
            Prop::Actor(a) => a.visibility,
            Prop::Skybox(s) => s.visibility
        }
    }

    /// Skyboxes contribute no bounds.
    pub fn bounds(&self) -> Option<Bounds3f> {
        match self {
            Prop::Actor(a) => Some(a.bounds()),
            Prop::Skybox(_) => None
        }
    }
}

impl From<Actor> for Prop {
    fn from(a: Actor) -> Self { Prop::Actor(a) }
}

impl From<Skybox> for Prop {
    fn from(s: Skybox) -> Self { Prop::Skybox(s) }
}
