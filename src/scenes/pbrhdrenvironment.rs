use std::path::Path;
use std::sync::Arc;
use anyhow::{Result, Context, anyhow};
use log::info;
use crate::core::pbrt::Float;
use crate::core::imageio::{ImageReader, ImageReaderFactory};
use crate::core::texture::{Texture, ColorMode};
use crate::core::skybox::{Skybox, Projection};
use crate::core::actor::{Actor, PolyDataMapper};
use crate::core::renderer::{Renderer, DEFAULT_ENVIRONMENT_CUBE_MAP_SIZE};
use crate::core::renderwindow::RenderWindow;
use crate::shapes::sphere::SphereSource;
use crate::textures::irradiance::DEFAULT_IRRADIANCE_SIZE;
use crate::textures::prefilter::DEFAULT_PREFILTER_LEVELS;
use crate::textures::brdflut::{DEFAULT_LUT_SIZE, DEFAULT_LUT_SAMPLES};

/// Number of spheres per row.
pub const NCOLUMNS: usize = 6;

/// Sizes and sample counts of the scene and its light bakes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneSettings {
    pub window_size                 : usize,
    pub irradiance_step             : Float,
    pub irradiance_size             : usize,
    pub prefilter_samples           : usize,
    pub prefilter_size              : usize,
    pub prefilter_levels            : usize,
    pub sphere_resolution           : usize,
    pub environment_cube_map_size   : usize,
    pub lut_size                    : usize,
    pub lut_samples                 : usize
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            window_size: 600,
            irradiance_step: 0.3,
            irradiance_size: DEFAULT_IRRADIANCE_SIZE,
            prefilter_samples: 64,
            prefilter_size: 1024,
            prefilter_levels: DEFAULT_PREFILTER_LEVELS,
            sphere_resolution: 75,
            environment_cube_map_size: DEFAULT_ENVIRONMENT_CUBE_MAP_SIZE,
            lut_size: DEFAULT_LUT_SIZE,
            lut_samples: DEFAULT_LUT_SAMPLES
        }
    }
}

impl SceneSettings {
    /// Same scene with every bake size and sample count divided by 4.
    pub fn quick() -> Self {
        let d = Self::default();

        Self {
            irradiance_size: (d.irradiance_size / 4).max(8),
            prefilter_samples: (d.prefilter_samples / 4).max(4),
            prefilter_size: (d.prefilter_size / 4).max(8),
            environment_cube_map_size: (d.environment_cube_map_size / 4).max(8),
            lut_size: (d.lut_size / 4).max(8),
            lut_samples: (d.lut_samples / 4).max(4),
            ..d
        }
    }
}

/// Decode `path` with the reader the factory selects and wrap it in a texture
/// sampled with direct scalars, mipmapping and bilinear interpolation.
pub fn load_environment_texture<P: AsRef<Path>>(path: P) -> Result<Arc<Texture>> {
    let path = path.as_ref();
    let reader = ImageReaderFactory::create_image_reader(path)
        .ok_or_else(|| anyhow!("Error reading file {}", path.display()))?;

    info!("Reading \"{}\" with the {} reader", path.display(), reader.description());

    let image = reader
        .read(path)
        .with_context(|| format!("Error reading file {}", path.display()))?;

    let mut texture = Texture::from_image(Arc::new(image));
    texture.set_color_mode(ColorMode::DirectScalars);
    texture.set_mipmap(true);
    texture.set_interpolate(true);

    Ok(Arc::new(texture))
}

/// Two rows of spheres lit by `texture`: metallic at `y = 0`, dielectric at
/// `y = 2`, roughness growing with `x`. The texture is also the background.
pub fn build(texture: Arc<Texture>, settings: &SceneSettings) -> RenderWindow {
    let mut renderer = Renderer::new();

    {
        let irradiance = renderer.env_map_irradiance_mut();
        irradiance.set_irradiance_step(settings.irradiance_step);
        irradiance.set_irradiance_size(settings.irradiance_size);
    }

    {
        let prefilter = renderer.env_map_prefiltered_mut();
        prefilter.set_prefilter_samples(settings.prefilter_samples);
        prefilter.set_prefilter_size(settings.prefilter_size);
        prefilter.set_prefilter_levels(settings.prefilter_levels);
    }

    renderer.set_environment_cube_map_size(settings.environment_cube_map_size);
    renderer.set_lookup_table_size(settings.lut_size, settings.lut_samples);
    renderer.set_use_image_based_lighting(true);
    renderer.set_environment_texture(texture.clone());

    let mut skybox = Skybox::new(texture);
    skybox.set_floor_right(0.0, 0.0, 1.0);
    skybox.projection = Projection::Sphere;
    renderer.add_actor(skybox);

    let mut sphere = SphereSource::new();
    sphere.set_theta_resolution(settings.sphere_resolution);
    sphere.set_phi_resolution(settings.sphere_resolution);
    let mapper = Arc::new(PolyDataMapper::new(Arc::new(sphere.output())));

    for &(y, metallic) in [(0.0, 1.0), (2.0, 0.0)].iter() {
        for i in 0..NCOLUMNS {
            let mut actor = Actor::new(mapper.clone());
            actor.set_position(i as Float, y, 0.0);
            actor.property.set_interpolation_to_pbr();
            actor.property.set_metallic(metallic);
            actor.property.set_roughness(i as Float / 5.0);
            renderer.add_actor(actor);
        }
    }

    let mut window = RenderWindow::new();
    window.set_size(settings.window_size, settings.window_size);
    window.add_renderer(renderer);

    window
}
