#[macro_use]
pub mod stats;
pub mod pbrt;
pub mod geometry;
pub mod transform;
pub mod spectrum;
pub mod fileutil;
pub mod imageio;
pub mod mipmap;
pub mod sampling;
pub mod microfacet;
pub mod texture;
pub mod polydata;
pub mod property;
pub mod actor;
pub mod skybox;
pub mod camera;
pub mod light;
pub mod raster;
pub mod renderer;
pub mod film;
pub mod renderwindow;
pub mod interactor;
