#[cfg(test)]
mod testing {
    use std::path::PathBuf;
    use image::{Rgb, RgbImage};
    use pbr_ibl::core::renderwindow::RenderWindow;
    use pbr_ibl::testing::imagediff::ImageDifference;
    use pbr_ibl::testing::regression::{Testing, RegressionResult, exit_code};

    fn gradient(w: u32, h: u32, step: u32, offset: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| {
            let v = ((x + offset) * step).min(255) as u8;
            Rgb([v, (y * 10).min(255) as u8, 128])
        })
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pbr_ibl_testing_{}_{}", std::process::id(), name));
        std::fs::create_dir_all(&dir).expect("temp dir");

        dir
    }

    #[test]
    fn identical_images() {
        let a = gradient(16, 8, 8, 0);
        let diff = ImageDifference::default().compare(&a, &a).expect("same size");

        assert_eq!(diff.error, 0.0);
        assert_eq!(diff.bad_pixels, 0);
        assert_eq!(diff.diff_image.dimensions(), (16, 8));
    }

    #[test]
    fn one_pixel_shift() {
        let valid = gradient(6, 4, 40, 0);
        let test = gradient(6, 4, 40, 1);

        let shifted = ImageDifference::default().compare(&test, &valid).expect("same size");
        assert!(shifted.error < 0.05);
        // Only the last column has no matching neighbour
        assert_eq!(shifted.bad_pixels, 4);

        let strict = ImageDifference::new(16.0 / 255.0, false).compare(&test, &valid).expect("same size");
        assert!(strict.error > 0.05);
        assert_eq!(strict.bad_pixels, 24);
    }

    #[test]
    fn small_differences_tolerated() {
        let valid = gradient(8, 8, 8, 0);
        let test = RgbImage::from_fn(8, 8, |x, y| {
            let p = valid.get_pixel(x, y);
            Rgb([p[0].saturating_add(10), p[1], p[2]])
        });

        let diff = ImageDifference::new(16.0 / 255.0, false).compare(&test, &valid).expect("same size");
        assert_eq!(diff.error, 0.0);
        assert_eq!(diff.bad_pixels, 0);
    }

    #[test]
    fn large_change_fails() {
        let valid = gradient(8, 8, 30, 0);
        let test = RgbImage::from_fn(8, 8, |x, y| {
            let p = valid.get_pixel(x, y);
            Rgb([255 - p[0], 255 - p[1], 255 - p[2]])
        });

        let diff = ImageDifference::default().compare(&test, &valid).expect("same size");
        assert!(diff.error > 0.05);
        assert!(diff.bad_pixels > 0);
    }

    #[test]
    fn size_mismatch() {
        let a = gradient(8, 8, 8, 0);
        let b = gradient(8, 9, 8, 0);

        assert!(ImageDifference::default().compare(&a, &b).is_err());
    }

    fn black_window() -> RenderWindow {
        let mut window = RenderWindow::new();
        window.set_size(8, 8);
        window.render();

        window
    }

    #[test]
    fn not_run_without_baseline() {
        let window = black_window();
        let mut testing = Testing::new();
        assert_eq!(testing.regression_test_image(&window), RegressionResult::NotRun);

        testing.interactive = true;
        assert_eq!(testing.regression_test_image(&window), RegressionResult::DoInteractor);
    }

    #[test]
    fn missing_baseline_fails() {
        let dir = temp_dir("missing");
        let window = black_window();
        let testing = Testing {
            valid_image: Some(dir.join("TestMissing.png")),
            temp_dir: dir.clone(),
            ..Testing::default()
        };

        assert_eq!(testing.regression_test_image(&window), RegressionResult::Failed);
        assert!(dir.join("TestMissing.png").exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn baseline_comparison() {
        let dir = temp_dir("baseline");
        let out = temp_dir("baseline_out");
        let window = black_window();
        let valid = dir.join("TestBlack.png");
        RgbImage::new(8, 8).save(&valid).expect("baseline");

        let mut testing = Testing {
            valid_image: Some(valid.clone()),
            temp_dir: out.clone(),
            ..Testing::default()
        };
        assert_eq!(testing.regression_test_image(&window), RegressionResult::Passed);

        testing.interactive = true;
        assert_eq!(testing.regression_test_image(&window), RegressionResult::DoInteractor);
        testing.interactive = false;

        // A white baseline fails and leaves the images behind for inspection
        RgbImage::from_pixel(8, 8, Rgb([255, 255, 255])).save(&valid).expect("baseline");
        assert_eq!(testing.regression_test_image(&window), RegressionResult::Failed);
        assert!(out.join("TestBlack.png").exists());
        assert!(out.join("TestBlack.diff.png").exists());
        assert!(out.join("TestBlack.valid.png").exists());

        // ... unless an alternate baseline matches
        RgbImage::new(8, 8).save(dir.join("TestBlack_1.png")).expect("alternate");
        assert_eq!(testing.regression_test_image(&window), RegressionResult::Passed);

        std::fs::remove_dir_all(&dir).ok();
        std::fs::remove_dir_all(&out).ok();
    }

    #[test]
    fn exit_codes() {
        assert_eq!(exit_code(RegressionResult::Failed), 1);
        assert_eq!(exit_code(RegressionResult::Passed), 0);
        assert_eq!(exit_code(RegressionResult::NotRun), 0);
        assert_eq!(exit_code(RegressionResult::DoInteractor), 0);
        assert_eq!(RegressionResult::DoInteractor as i32, 3);
    }
}
