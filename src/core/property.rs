use crate::core::pbrt::{Float, clamp};
use crate::core::spectrum::Spectrum;

/// Shading model used for an actor's surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Interpolation {
    Flat,
    Gouraud,
    Phong,
    PBR
}

/// Surface appearance of an actor.
#[derive(Debug, Clone)]
pub struct Property {
    pub color           : Spectrum,
    pub ambient         : Float,
    pub diffuse         : Float,
    pub specular        : Float,
    pub specular_power  : Float,
    pub interpolation   : Interpolation,
    metallic            : Float,
    roughness           : Float,
    base_ior            : Float
}

impl Default for Property {
    fn default() -> Self {
        Self {
            color: Spectrum::new(1.0),
            ambient: 0.0,
            diffuse: 1.0,
            specular: 0.0,
            specular_power: 1.0,
            interpolation: Interpolation::Gouraud,
            metallic: 0.0,
            roughness: 0.5,
            base_ior: 1.5
        }
    }
}

impl Property {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_interpolation_to_pbr(&mut self) {
        self.interpolation = Interpolation::PBR;
    }

    pub fn metallic(&self) -> Float { self.metallic }

    pub fn set_metallic(&mut self, m: Float) {
        self.metallic = clamp(m, 0.0, 1.0);
    }

    pub fn roughness(&self) -> Float { self.roughness }

    pub fn set_roughness(&mut self, r: Float) {
        self.roughness = clamp(r, 0.0, 1.0);
    }

    pub fn base_ior(&self) -> Float { self.base_ior }

    pub fn set_base_ior(&mut self, ior: Float) {
        self.base_ior = ior.max(1.0);
    }
}
