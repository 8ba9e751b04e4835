use std::sync::Arc;
use log::{info, debug, warn};
use rayon::prelude::*;
use crate::core::actor::{Prop, Actor};
use crate::core::camera::Camera;
use crate::core::light::Light;
use crate::core::film::Film;
use crate::core::texture::Texture;
use crate::core::spectrum::Spectrum;
use crate::core::property::{Property, Interpolation};
use crate::core::raster::{rasterize, MeshInstance, Fragment};
use crate::core::geometry::vector::Vector3f;
use crate::core::geometry::point::Point3f;
use crate::core::geometry::bounds::Bounds3f;
use crate::core::geometry::geometry::Frame;
use crate::core::microfacet::{
    ggx_d, roughness_to_alpha, visibility_smith_correlated,
    fresnel_schlick, fresnel_schlick_roughness, f0_from_ior};
use crate::core::pbrt::{Float, INV_PI, DISPLAY_GAMMA, radians, clamp};
use crate::textures::cubemap::CubeMap;
use crate::textures::irradiance::IrradianceTexture;
use crate::textures::prefilter::PrefilterTexture;
use crate::textures::brdflut::{BrdfLut, DEFAULT_LUT_SIZE, DEFAULT_LUT_SAMPLES};

stat_counter!("Renderer/Fragments shaded", nshaded);
stat_counter!("Renderer/Background pixels", nbackground);
stat_counter!("Renderer/IBL bakes", nbakes);

pub fn init_stats() {
    nshaded::init();
    nbackground::init();
    nbakes::init();
}

pub const DEFAULT_ENVIRONMENT_CUBE_MAP_SIZE: usize = 512;

/// What the cached environment cube map was built from.
#[derive(Debug, Clone, PartialEq)]
struct EnvironmentKey {
    texture     : usize,
    mtime       : u64,
    frame       : Frame,
    size        : usize
}

/// Draws props into a rectangular part of a film.
#[derive(Debug, Clone)]
pub struct Renderer {
    props                       : Vec<Prop>,
    pub background              : Spectrum,
    camera                      : Camera,
    camera_initialized          : bool,
    lights                      : Vec<Light>,
    pub automatic_light_creation: bool,
    pub two_sided_lighting      : bool,
    use_image_based_lighting    : bool,
    environment_texture         : Option<Arc<Texture>>,
    environment_up              : Vector3f,
    environment_right           : Vector3f,
    env_map_irradiance          : IrradianceTexture,
    env_map_prefiltered         : PrefilterTexture,
    env_map_lookup_table        : Option<Arc<BrdfLut>>,
    lut_size                    : usize,
    lut_samples                 : usize,
    environment_cube_map_size   : usize,
    environment_cube            : Option<Arc<CubeMap>>,
    environment_key             : Option<EnvironmentKey>,
    /// Normalized (xmin, ymin, xmax, ymax), origin at the bottom left
    pub viewport                : [Float; 4]
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            props: Vec::new(),
            background: Spectrum::default(),
            camera: Camera::default(),
            camera_initialized: false,
            lights: Vec::new(),
            automatic_light_creation: true,
            two_sided_lighting: true,
            use_image_based_lighting: false,
            environment_texture: None,
            environment_up: Vector3f::new(0.0, 1.0, 0.0),
            environment_right: Vector3f::new(1.0, 0.0, 0.0),
            env_map_irradiance: IrradianceTexture::default(),
            env_map_prefiltered: PrefilterTexture::default(),
            env_map_lookup_table: None,
            lut_size: DEFAULT_LUT_SIZE,
            lut_samples: DEFAULT_LUT_SAMPLES,
            environment_cube_map_size: DEFAULT_ENVIRONMENT_CUBE_MAP_SIZE,
            environment_cube: None,
            environment_key: None,
            viewport: [0.0, 0.0, 1.0, 1.0]
        }
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_actor<P: Into<Prop>>(&mut self, prop: P) {
        self.props.push(prop.into());
    }

    pub fn props(&self) -> &[Prop] { &self.props }

    pub fn actors(&self) -> impl Iterator<Item=&Actor> {
        self.props.iter().filter_map(|p| match p {
            Prop::Actor(a) => Some(a),
            _ => None
        })
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn lights(&self) -> &[Light] { &self.lights }

    pub fn active_camera(&self) -> &Camera { &self.camera }

    /// Marks the camera as user controlled so the first render keeps it.
    pub fn active_camera_mut(&mut self) -> &mut Camera {
        self.camera_initialized = true;
        &mut self.camera
    }

    pub fn set_active_camera(&mut self, camera: Camera) {
        self.camera = camera;
        self.camera_initialized = true;
    }

    /// Union of the bounds of all visible props that have bounds.
    pub fn compute_visible_prop_bounds(&self) -> Bounds3f {
        self.props
            .iter()
            .filter(|p| p.visibility())
            .filter_map(|p| p.bounds())
            .fold(Bounds3f::default(), |acc, b| acc.union_bounds(&b))
    }

    pub fn reset_camera(&mut self) {
        let bounds = self.compute_visible_prop_bounds();

        if bounds.is_empty() {
            warn!("Cannot reset camera: no visible props");
        } else {
            self.camera.reset(&bounds);
        }

        self.camera_initialized = true;
    }

    pub fn use_image_based_lighting(&self) -> bool { self.use_image_based_lighting }

    pub fn set_use_image_based_lighting(&mut self, on: bool) {
        self.use_image_based_lighting = on;
    }

    pub fn environment_texture(&self) -> Option<&Arc<Texture>> { self.environment_texture.as_ref() }

    pub fn set_environment_texture(&mut self, texture: Arc<Texture>) {
        self.environment_texture = Some(texture);
    }

    pub fn set_environment_up(&mut self, x: Float, y: Float, z: Float) {
        self.environment_up = Vector3f::new(x, y, z);
    }

    pub fn set_environment_right(&mut self, x: Float, y: Float, z: Float) {
        self.environment_right = Vector3f::new(x, y, z);
    }

    pub fn environment_frame(&self) -> Frame {
        Frame::from_up_right(&self.environment_up, &self.environment_right)
    }

    pub fn env_map_irradiance(&self) -> &IrradianceTexture { &self.env_map_irradiance }
    pub fn env_map_irradiance_mut(&mut self) -> &mut IrradianceTexture { &mut self.env_map_irradiance }

    pub fn env_map_prefiltered(&self) -> &PrefilterTexture { &self.env_map_prefiltered }
    pub fn env_map_prefiltered_mut(&mut self) -> &mut PrefilterTexture { &mut self.env_map_prefiltered }

    pub fn env_map_lookup_table(&self) -> Option<&Arc<BrdfLut>> { self.env_map_lookup_table.as_ref() }

    pub fn set_lookup_table_size(&mut self, size: usize, samples: usize) {
        self.lut_size = size.max(2);
        self.lut_samples = samples.max(1);
    }

    pub fn set_environment_cube_map_size(&mut self, size: usize) {
        self.environment_cube_map_size = size.max(1);
    }

    pub fn environment_cube(&self) -> Option<&Arc<CubeMap>> { self.environment_cube.as_ref() }

    /// Bring the environment cube map, irradiance, prefiltered map and BRDF
    /// table up to date with the current texture and parameters.
    pub fn update_image_based_lighting(&mut self) {
        let texture = match self.environment_texture {
            Some(ref t) if self.use_image_based_lighting => t.clone(),
            _ => return
        };

        let key = EnvironmentKey {
            texture: Arc::as_ptr(&texture) as usize,
            mtime: texture.mtime(),
            frame: self.environment_frame(),
            size: self.environment_cube_map_size
        };

        if self.environment_key.as_ref() != Some(&key) || self.environment_cube.is_none() {
            info!("Converting environment texture to {} cube map", key.size);
            let mut cube = CubeMap::from_texture(&texture, key.size, &key.frame);
            cube.generate_mips();

            self.environment_cube = Some(Arc::new(cube));
            self.environment_key = Some(key);
            self.env_map_irradiance.invalidate();
            self.env_map_prefiltered.invalidate();
            nbakes::inc();
        }

        if let Some(ref cube) = self.environment_cube {
            if !self.env_map_irradiance.is_baked() {
                self.env_map_irradiance.bake(cube);
            }

            if !self.env_map_prefiltered.is_baked() {
                self.env_map_prefiltered.bake(cube);
            }
        }

        let stale_lut = match self.env_map_lookup_table {
            Some(ref lut) => lut.lut_size() != self.lut_size || lut.lut_samples() != self.lut_samples,
            None => true
        };

        if stale_lut {
            self.env_map_lookup_table = Some(Arc::new(BrdfLut::new(self.lut_size, self.lut_samples)));
        }
    }

    fn ibl_ready(&self) -> bool {
        self.use_image_based_lighting &&
            self.env_map_irradiance.is_baked() &&
            self.env_map_prefiltered.is_baked() &&
            self.env_map_lookup_table.is_some()
    }

    /// Draw into the film rectangle covered by the viewport.
    pub fn render(&mut self, film: &mut Film) {
        let (fw, fh) = (film.width(), film.height());
        let x0 = (self.viewport[0] * fw as Float).round() as usize;
        let x1 = ((self.viewport[2] * fw as Float).round() as usize).min(fw);
        let y0 = (((1.0 - self.viewport[3]) * fh as Float).round() as usize).min(fh);
        let y1 = (((1.0 - self.viewport[1]) * fh as Float).round() as usize).min(fh);

        if x1 <= x0 || y1 <= y0 {
            warn!("Renderer viewport is empty");
            return;
        }

        let (width, height) = (x1 - x0, y1 - y0);
        let bounds = self.compute_visible_prop_bounds();

        if !self.camera_initialized {
            if !bounds.is_empty() { self.camera.reset(&bounds); }
            self.camera_initialized = true;
        }

        self.camera.reset_clipping_range(&bounds);

        if self.lights.is_empty() && self.automatic_light_creation {
            debug!("Creating default headlight");
            self.lights.push(Light::headlight());
        }

        let camera = self.camera.clone();

        for l in self.lights.iter_mut() {
            l.update(&camera);
        }

        self.update_image_based_lighting();
        self.share_skybox_cube_map();

        let aspect = width as Float / height as Float;
        let view_proj = camera.projection_transform(aspect) * camera.view_transform();

        let meshes = self.props
            .iter()
            .enumerate()
            .filter_map(|(i, p)| match p {
                Prop::Actor(a) if a.visibility => Some(MeshInstance {
                    mesh: a.mapper.input().as_ref(),
                    model: a.matrix(),
                    actor: i
                }),
                _ => None
            })
            .collect::<Vec<_>>();

        let gbuffer = rasterize(&meshes, &view_proj, width, height);

        // Camera basis for background rays
        let dop = camera.direction_of_projection();
        let right = dop.cross(&camera.view_up).normalize();
        let up = right.cross(&dop);
        let tan_half = (radians(camera.view_angle) * 0.5).tan();
        let pixel_angle = radians(camera.view_angle) / height as Float;
        let eye = camera.position;
        let skybox = self.props.iter().find_map(|p| match p {
            Prop::Skybox(s) if s.visibility => Some(s),
            _ => None
        });

        let rows = film.rows_mut(y0, y1);

        rows.par_chunks_mut(fw)
            .enumerate()
            .for_each(|(y, row)| {
                for x in 0..width {
                    let c = match gbuffer.get(x, y) {
                        Some(frag) => {
                            nshaded::inc();
                            match self.props[frag.actor] {
                                Prop::Actor(ref a) => self.shade(&a.property, frag, &eye),
                                _ => self.background
                            }
                        }
                        None => {
                            nbackground::inc();
                            let ndc_x = 2.0 * (x as Float + 0.5) / width as Float - 1.0;
                            let ndc_y = 1.0 - 2.0 * (y as Float + 0.5) / height as Float;
                            let dir = (dop + right * (ndc_x * tan_half * aspect) + up * (ndc_y * tan_half)).normalize();

                            skybox
                                .and_then(|s| s.color(&eye, &dir, pixel_angle))
                                .unwrap_or(self.background)
                        }
                    };

                    row[x0 + x] = c.clamps(0.0, 1.0);
                }
            });
    }

    /// Let a cube skybox reuse the environment cube map when both come from
    /// the same texture in the same frame.
    fn share_skybox_cube_map(&self) {
        let (cube, texture) = match (&self.environment_cube, &self.environment_texture) {
            (Some(c), Some(t)) => (c, t),
            _ => return
        };
        let frame = self.environment_frame();

        for p in &self.props {
            if let Prop::Skybox(s) = p {
                if Arc::ptr_eq(s.texture(), texture) && s.frame() == frame {
                    s.share_cube_map(cube.clone());
                }
            }
        }
    }

    fn shading_normal(&self, prop: &Property, frag: &Fragment, v: &Vector3f) -> Vector3f {
        let n = if prop.interpolation == Interpolation::Flat || frag.normal.length_squared() == 0.0 {
            frag.face_normal
        } else {
            frag.normal.normalize()
        };

        if self.two_sided_lighting && n.dot(v) < 0.0 { -n } else { n }
    }

    fn shade(&self, prop: &Property, frag: &Fragment, eye: &Point3f) -> Spectrum {
        let to_eye = *eye - frag.position;
        let v = if to_eye.length_squared() > 0.0 { to_eye.normalize() } else { Vector3f::new(0.0, 0.0, 1.0) };
        let n = self.shading_normal(prop, frag, &v);

        match prop.interpolation {
            Interpolation::PBR => self.shade_pbr(prop, &n, &v),
            _ => self.shade_phong(prop, &n, &v)
        }
    }

    fn shade_pbr(&self, prop: &Property, n: &Vector3f, v: &Vector3f) -> Spectrum {
        let albedo = prop.color.powf(DISPLAY_GAMMA);
        let metallic = prop.metallic();
        let roughness = prop.roughness();
        let alpha = roughness_to_alpha(roughness);
        let f0 = Spectrum::lerp(metallic, &Spectrum::new(f0_from_ior(prop.base_ior())), &albedo);
        let n_dot_v = n.dot(v).max(1.0e-4);

        let mut color = Spectrum::default();

        for light in self.lights.iter().filter(|l| l.switch) {
            let l = light.direction_to_light();
            let n_dot_l = n.dot(&l);

            if n_dot_l <= 0.0 { continue; }

            let h = (*v + l).normalize();
            let n_dot_h = n.dot(&h).max(0.0);
            let v_dot_h = v.dot(&h).max(0.0);

            let f = fresnel_schlick(&f0, v_dot_h);
            let specular = f * (ggx_d(n_dot_h, alpha) * visibility_smith_correlated(n_dot_v, n_dot_l, alpha));
            let kd = (Spectrum::new(1.0) - f) * (1.0 - metallic);
            let diffuse = kd * albedo * INV_PI;

            color += (diffuse + specular) * light.radiance() * n_dot_l;
        }

        if self.ibl_ready() {
            let f = fresnel_schlick_roughness(&f0, n_dot_v, roughness);
            let kd = (Spectrum::new(1.0) - f) * (1.0 - metallic);
            let irradiance = self.env_map_irradiance.lookup(n);
            let r = v.reflect(n);
            let prefiltered = self.env_map_prefiltered.lookup(&r, roughness);
            let (a, b) = self.env_map_lookup_table
                .as_ref()
                .map(|lut| lut.lookup(n_dot_v, roughness))
                .unwrap_or((1.0, 0.0));

            color += kd * irradiance * albedo + prefiltered * (f0 * a + Spectrum::new(b));
        }

        color.powf(1.0 / DISPLAY_GAMMA)
    }

    fn shade_phong(&self, prop: &Property, n: &Vector3f, v: &Vector3f) -> Spectrum {
        let ambient = if self.ibl_ready() {
            self.env_map_irradiance.lookup(n)
        } else {
            Spectrum::new(1.0)
        };

        let mut color = ambient * prop.color * prop.ambient;

        for light in self.lights.iter().filter(|l| l.switch) {
            let l = light.direction_to_light();
            let n_dot_l = n.dot(&l);

            if n_dot_l <= 0.0 { continue; }

            let h = (*v + l).normalize();
            let spec = clamp(n.dot(&h), 0.0, 1.0).powf(prop.specular_power);

            color += (prop.color * (prop.diffuse * n_dot_l) + Spectrum::new(prop.specular * spec)) * light.radiance();
        }

        color
    }
}
