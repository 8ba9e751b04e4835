#[cfg(test)]
mod render {
    use std::path::PathBuf;
    use image::{Rgb, RgbImage};
    use pbr_ibl::core::pbrt::Float;
    use pbr_ibl::core::geometry::point::Point2i;
    use pbr_ibl::core::imageio::write_image;
    use pbr_ibl::core::texture::ColorMode;
    use pbr_ibl::core::actor::Prop;
    use pbr_ibl::core::skybox::Projection;
    use pbr_ibl::core::property::Interpolation;
    use pbr_ibl::scenes::pbrhdrenvironment::{SceneSettings, build, load_environment_texture};
    use pbr_ibl::testing::regression::{Testing, RegressionResult};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pbr_ibl_render_{}_{}", std::process::id(), name))
    }

    /// Bright warm sky over a dark cool ground.
    fn write_environment(name: &str) -> PathBuf {
        let path = temp_path(name);
        let res = Point2i::new(32, 16);
        let mut rgb = Vec::with_capacity(3 * 32 * 16);

        for y in 0..16 {
            for x in 0..32 {
                let sky = y < 8;
                let v = if sky { 4.0 - y as Float * 0.4 } else { 0.2 };
                let tint = x as Float / 31.0;
                rgb.extend_from_slice(&[v, v * (0.5 + 0.5 * tint), if sky { 0.5 * v } else { 0.6 }]);
            }
        }

        write_image(&path, &rgb, &res).expect("environment written");

        path
    }

    fn tiny_settings() -> SceneSettings {
        SceneSettings {
            window_size: 48,
            irradiance_size: 4,
            prefilter_samples: 16,
            prefilter_size: 8,
            prefilter_levels: 3,
            sphere_resolution: 12,
            environment_cube_map_size: 16,
            lut_size: 16,
            lut_samples: 32,
            ..SceneSettings::default()
        }
    }

    #[test]
    fn default_settings() {
        let s = SceneSettings::default();
        assert_eq!(s.window_size, 600);
        assert_eq!(s.irradiance_step, 0.3);
        assert_eq!(s.prefilter_samples, 64);
        assert_eq!(s.prefilter_size, 1024);
        assert_eq!(s.sphere_resolution, 75);
        assert_eq!(s.lut_size, 1024);

        let q = SceneSettings::quick();
        assert_eq!(q.window_size, 600);
        assert_eq!(q.prefilter_size, 256);
        assert_eq!(q.prefilter_samples, 16);
        assert_eq!(q.lut_size, 256);
    }

    #[test]
    fn environment_texture_setup() {
        let path = write_environment("setup.hdr");
        let texture = load_environment_texture(&path);
        std::fs::remove_file(&path).ok();

        let texture = texture.expect("texture");
        assert_eq!(texture.color_mode(), ColorMode::DirectScalars);
        assert!(texture.mipmap());
        assert!(texture.interpolate());
        assert_eq!(texture.resolution(), Point2i::new(32, 16));
    }

    #[test]
    fn environment_texture_errors() {
        assert!(load_environment_texture(temp_path("missing.hdr")).is_err());

        let path = temp_path("garbage.bin");
        std::fs::write(&path, b"garbage, not an image").expect("write");
        let r = load_environment_texture(&path);
        std::fs::remove_file(&path).ok();
        assert!(r.is_err());

        // Right signature, broken body
        let path = temp_path("broken.hdr");
        std::fs::write(&path, b"#?RADIANCE\nFORMAT=32-bit_rle_rgbe\n\n-Y 4 +X").expect("write");
        let r = load_environment_texture(&path);
        std::fs::remove_file(&path).ok();
        assert!(r.is_err());
    }

    #[test]
    fn scene_layout() {
        let path = write_environment("layout.hdr");
        let texture = load_environment_texture(&path).expect("texture");
        std::fs::remove_file(&path).ok();

        let window = build(texture.clone(), &tiny_settings());
        assert_eq!(window.size(), (48, 48));
        assert_eq!(window.renderers().len(), 1);

        let renderer = &window.renderers()[0];
        assert!(renderer.use_image_based_lighting());
        assert_eq!(renderer.env_map_irradiance().irradiance_step(), 0.3);
        assert_eq!(renderer.props().len(), 13);

        match &renderer.props()[0] {
            Prop::Skybox(s) => {
                assert_eq!(s.projection, Projection::Sphere);
                assert_eq!(s.floor_right.z, 1.0);
            }
            _ => panic!("the skybox is added first")
        }

        let actors = renderer.actors().collect::<Vec<_>>();
        assert_eq!(actors.len(), 12);

        for (k, a) in actors.iter().enumerate() {
            let (row, col) = (k / 6, k % 6);
            assert_eq!(a.position.x, col as Float);
            assert_eq!(a.position.y, if row == 0 { 0.0 } else { 2.0 });
            assert_eq!(a.property.metallic(), if row == 0 { 1.0 } else { 0.0 });
            assert_eq!(a.property.roughness(), col as Float / 5.0);
            assert_eq!(a.property.interpolation, Interpolation::PBR);
            assert!(std::sync::Arc::ptr_eq(&a.mapper, &actors[0].mapper));
        }
    }

    fn render_once(path: &PathBuf) -> RgbImage {
        let texture = load_environment_texture(path).expect("texture");
        let mut window = build(texture, &tiny_settings());
        window.render();

        let renderer = &window.renderers()[0];
        assert!(renderer.env_map_irradiance().is_baked());
        assert!(renderer.env_map_prefiltered().is_baked());
        assert!(renderer.env_map_lookup_table().is_some());

        window.capture()
    }

    #[test]
    fn end_to_end_regression() {
        let env = write_environment("e2e.hdr");
        let first = render_once(&env);
        let second = render_once(&env);
        std::fs::remove_file(&env).ok();

        assert_eq!(first.dimensions(), (48, 48));
        assert!(first == second, "rendering is deterministic");

        // Spheres and sky give a non uniform frame
        let p0 = *first.get_pixel(0, 0);
        assert!(first.pixels().any(|p| *p != p0));

        let dir = temp_path("e2e_out");
        std::fs::create_dir_all(&dir).expect("temp dir");
        let valid = dir.join("TestPBRHdrEnvironment.png");
        first.save(&valid).expect("baseline");

        let texture = load_environment_texture(write_environment("e2e_again.hdr")).expect("texture");
        std::fs::remove_file(temp_path("e2e_again.hdr")).ok();
        let mut window = build(texture, &tiny_settings());
        window.render();

        let testing = Testing {
            valid_image: Some(valid.clone()),
            temp_dir: dir.clone(),
            ..Testing::default()
        };
        assert_eq!(testing.regression_test_image(&window), RegressionResult::Passed);

        let perturbed = RgbImage::from_fn(48, 48, |x, y| {
            let p = first.get_pixel(x, y);
            Rgb([255 - p[0], 255 - p[1], 255 - p[2]])
        });
        perturbed.save(&valid).expect("baseline");
        assert_eq!(testing.regression_test_image(&window), RegressionResult::Failed);

        std::fs::remove_dir_all(&dir).ok();
    }
}
