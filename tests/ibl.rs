#[cfg(test)]
mod ibl {
    use std::sync::Arc;
    use pbr_ibl::core::pbrt::Float;
    use pbr_ibl::core::geometry::point::Point2i;
    use pbr_ibl::core::geometry::vector::Vector3f;
    use pbr_ibl::core::geometry::geometry::Frame;
    use pbr_ibl::core::imageio::{Image, ScalarType};
    use pbr_ibl::core::spectrum::RGBSpectrum;
    use pbr_ibl::core::texture::{Texture, ColorMode};
    use pbr_ibl::textures::cubemap::{CubeMap, NFACES, face_direction, direction_to_face};
    use pbr_ibl::textures::irradiance::IrradianceTexture;
    use pbr_ibl::textures::prefilter::PrefilterTexture;
    use pbr_ibl::textures::brdflut::{BrdfLut, integrate_brdf};
    use approx::relative_eq;

    fn environment(width: usize, height: usize, f: impl Fn(usize) -> RGBSpectrum) -> Texture {
        let pixels = (0..height)
            .flat_map(|y| std::iter::repeat(f(y)).take(width))
            .collect::<Vec<_>>();
        let image = Image::new(Point2i::new(width as isize, height as isize), pixels, ScalarType::Float).expect("image");

        let mut texture = Texture::from_image(Arc::new(image));
        texture.set_color_mode(ColorMode::DirectScalars);
        texture.set_mipmap(true);
        texture.set_interpolate(true);

        texture
    }

    fn constant_cube(c: Float, size: usize) -> CubeMap {
        let texture = environment(32, 16, |_| RGBSpectrum::new(c));
        let mut cube = CubeMap::from_texture(&texture, size, &Frame::default());
        cube.generate_mips();

        cube
    }

    fn directions() -> Vec<Vector3f> {
        vec![
            Vector3f::new(0.0, 1.0, 0.0),
            Vector3f::new(0.0, -1.0, 0.0),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.3, -0.2, 0.9).normalize(),
            Vector3f::new(-0.7, 0.7, -0.1).normalize()
        ]
    }

    #[test]
    fn cube_face_round_trip() {
        for face in 0..NFACES {
            for &(s, t) in [(0.5 as Float, 0.5 as Float), (0.2, 0.7), (0.85, 0.15), (0.1, 0.9)].iter() {
                let d = face_direction(face, s, t);
                assert!(relative_eq!(d.length(), 1.0, epsilon = 1.0e-5));

                let (f, s2, t2) = direction_to_face(&d);
                assert_eq!(f, face);
                assert!(relative_eq!(s, s2, epsilon = 1.0e-4));
                assert!(relative_eq!(t, t2, epsilon = 1.0e-4));
            }
        }
    }

    #[test]
    fn cube_from_equirect() {
        // Top half red, bottom half blue
        let texture = environment(16, 8, |y| {
            if y < 4 { RGBSpectrum::rgb(1.0, 0.0, 0.0) } else { RGBSpectrum::rgb(0.0, 0.0, 1.0) }
        });
        let mut cube = CubeMap::from_texture(&texture, 8, &Frame::default());
        cube.generate_mips();

        assert_eq!(cube.size(), 8);
        assert_eq!(cube.nlevels(), 4);

        let up = cube.lookup(&Vector3f::new(0.0, 1.0, 0.0)).to_rgb();
        assert!(up[0] > 0.9 && up[2] < 0.1);

        let down = cube.lookup(&Vector3f::new(0.0, -1.0, 0.0)).to_rgb();
        assert!(down[2] > 0.9 && down[0] < 0.1);

        // The coarsest level is the average of the whole sphere
        let avg = cube.average().to_rgb();
        let last = cube.lookup_level(cube.nlevels() - 1, &Vector3f::new(1.0, 0.0, 0.0)).to_rgb();
        assert!(relative_eq!(avg[0] + avg[2], 1.0, epsilon = 1.0e-3));
        assert!(last[0] > 0.0 && last[2] > 0.0);
    }

    #[test]
    fn constant_average() {
        let cube = constant_cube(0.75, 8);
        let avg = cube.average().to_rgb();

        for c in avg.iter() {
            assert!(relative_eq!(*c, 0.75, epsilon = 1.0e-4));
        }
    }

    #[test]
    fn irradiance_of_constant_environment() {
        let cube = constant_cube(2.0, 8);
        let mut irradiance = IrradianceTexture::new();
        irradiance.set_irradiance_step(0.05);
        irradiance.set_irradiance_size(4);
        assert!(!irradiance.is_baked());

        irradiance.bake(&cube);
        assert!(irradiance.is_baked());

        for d in directions() {
            let e = irradiance.lookup(&d).to_rgb();

            for c in e.iter() {
                assert!(relative_eq!(*c, 2.0, max_relative = 0.05), "irradiance {} along {}", c, d);
            }
        }

        irradiance.invalidate();
        assert!(!irradiance.is_baked());
        assert!(irradiance.lookup(&Vector3f::new(0.0, 0.0, 1.0)).is_black());
    }

    #[test]
    fn irradiance_step_clamped() {
        let mut irradiance = IrradianceTexture::new();

        irradiance.set_irradiance_step(0.3);
        assert_eq!(irradiance.irradiance_step(), 0.3);
        irradiance.set_irradiance_step(10.0);
        assert!(irradiance.irradiance_step() <= std::f32::consts::FRAC_PI_2 + 1.0e-6);
        irradiance.set_irradiance_step(0.0);
        assert!(irradiance.irradiance_step() > 0.0);
    }

    #[test]
    fn prefilter_of_constant_environment() {
        let cube = constant_cube(0.5, 16);
        let mut prefilter = PrefilterTexture::new();
        prefilter.set_prefilter_size(8);
        prefilter.set_prefilter_levels(4);
        prefilter.set_prefilter_samples(64);

        prefilter.bake(&cube);
        let map = prefilter.map().expect("baked");
        assert_eq!(map.nlevels(), 4);
        assert_eq!(map.size(), 8);

        for d in directions() {
            for &roughness in [0.0 as Float, 0.3, 0.6, 1.0].iter() {
                let s = prefilter.lookup(&d, roughness).to_rgb();

                for c in s.iter() {
                    assert!(relative_eq!(*c, 0.5, epsilon = 1.0e-3),
                            "prefiltered {} along {} roughness {}", c, d, roughness);
                }
            }
        }
    }

    #[test]
    fn prefilter_levels_limited_by_size() {
        let mut prefilter = PrefilterTexture::new();
        prefilter.set_prefilter_size(8);
        prefilter.set_prefilter_levels(10);
        assert_eq!(prefilter.effective_levels(), 4);

        prefilter.set_prefilter_levels(2);
        assert_eq!(prefilter.effective_levels(), 2);
    }

    #[test]
    fn brdf_lut_bounds() {
        let lut = BrdfLut::new(16, 64);
        assert_eq!(lut.lut_size(), 16);

        for j in 0..=10 {
            for i in 0..=10 {
                let (a, b) = lut.lookup(i as Float / 10.0, j as Float / 10.0);
                assert!(a >= 0.0 && b >= 0.0);
                assert!(a + b <= 1.0 + 1.0e-2, "A + B = {} at ({}, {})", a + b, i, j);
            }
        }
    }

    #[test]
    fn brdf_smooth_surface() {
        // A smooth surface seen head on reflects everything through the scale term
        let [a, b] = integrate_brdf(0.95, 0.05, 256);
        assert!(a + b > 0.9);
        assert!(b < 0.05);
    }
}
