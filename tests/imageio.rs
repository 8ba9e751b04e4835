#[cfg(test)]
mod imageio {
    use pbr_ibl::core::geometry::point::Point2i;
    use pbr_ibl::core::pbrt::Float;
    use pbr_ibl::core::imageio::{
        write_image, read_image, Image, ImageReader, ImageReaderFactory, ScalarType};
    use approx::abs_diff_eq;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pbr_ibl_imageio_{}_{}", std::process::id(), name))
    }

    fn gradient(res: &Point2i) -> Vec<Float> {
        let mut pixels = vec![0.0; 3 * res.x as usize * res.y as usize];

        for y in 0..res[1] {
            for x in 0..res[0] {
                let offset = 3 * (y * res[0] + x) as usize;
                pixels[offset] = x as Float / (res[0] - 1) as Float;
                pixels[offset + 1] = y as Float / (res[1] - 1) as Float;
                pixels[offset + 2] = 2.5;
            }
        }

        pixels
    }

    fn test_round_trip(fname: &str, tolerance: Float) {
        let path = temp_path(fname);
        let res = Point2i::new(16, 29);
        let pixels = gradient(&res);

        assert!(write_image(&path, &pixels, &res).is_ok());

        let r = read_image(&path);
        std::fs::remove_file(&path).ok();
        let image = r.expect("image read back");
        assert_eq!(image.resolution, res);
        assert_eq!(image.scalar_type, ScalarType::Float);

        for y in 0..res[1] as usize {
            for x in 0..res[0] as usize {
                let rgb = image.get(x, y).to_rgb();

                for c in 0..3 {
                    let wrote = pixels[3 * (y * res[0] as usize + x) + c];
                    assert!(
                        abs_diff_eq!(wrote, rgb[c], epsilon = tolerance * wrote.abs().max(1.0)),
                        "{}: ({}, {}) channel {} wrote {} read {}", fname, x, y, c, wrote, rgb[c]);
                }
            }
        }
    }

    #[test]
    fn pfm_round_trip() {
        test_round_trip("rt.pfm", 1.0e-6);
    }

    #[test]
    fn exr_round_trip() {
        test_round_trip("rt.exr", 1.0e-3);
    }

    #[test]
    fn hdr_round_trip() {
        // RGBE keeps 8 bits of mantissa per channel
        test_round_trip("rt.hdr", 2.5e-2);
    }

    #[test]
    fn png_round_trip() {
        let path = temp_path("rt.png");
        let res = Point2i::new(8, 4);
        let pixels = vec![0.5; 3 * 8 * 4];

        assert!(write_image(&path, &pixels, &res).is_ok());
        let r = read_image(&path);
        std::fs::remove_file(&path).ok();
        let image = r.expect("image read back");

        assert_eq!(image.scalar_type, ScalarType::UnsignedChar);
        // Written gamma corrected
        let v = image.get(3, 2).to_rgb()[0];
        assert!(abs_diff_eq!(v, (0.5 as Float).powf(1.0 / 2.2), epsilon = 0.02));
    }

    #[test]
    fn reader_from_content() {
        let res = Point2i::new(4, 4);
        let pixels = gradient(&res);

        for (written, disguised, description) in [
            ("sniff.hdr", "sniff_hdr.png", "Radiance HDR"),
            ("sniff.exr", "sniff_exr.hdr", "OpenEXR"),
            ("sniff.pfm", "sniff_pfm.exr", "PFM"),
            ("sniff.png", "sniff_png.pfm", "8-bit")
        ].iter() {
            let src = temp_path(written);
            let dst = temp_path(disguised);
            assert!(write_image(&src, &pixels, &res).is_ok());
            std::fs::rename(&src, &dst).expect("rename");

            let reader = ImageReaderFactory::create_image_reader(&dst);
            let decoded = read_image(&dst);
            std::fs::remove_file(&dst).ok();

            let reader = reader.expect("a reader");
            assert_eq!(reader.description(), *description);
            assert_eq!(decoded.expect("decoded").resolution, res);
        }
    }

    #[test]
    fn reader_from_extension() {
        // Too short for any signature, so only the extension can decide
        let path = temp_path("short.hdr");
        std::fs::write(&path, b"#").expect("write");
        let reader = ImageReaderFactory::create_image_reader(&path);
        let decoded = read_image(&path);
        std::fs::remove_file(&path).ok();

        assert_eq!(reader.expect("a reader").description(), "Radiance HDR");
        assert!(decoded.is_err());
    }

    #[test]
    fn no_reader() {
        assert!(ImageReaderFactory::create_image_reader(temp_path("missing.hdr")).is_none());
        assert!(read_image(temp_path("missing.hdr")).is_err());

        let path = temp_path("notes.txt");
        std::fs::write(&path, b"not an image at all").expect("write");
        let reader = ImageReaderFactory::create_image_reader(&path);
        std::fs::remove_file(&path).ok();

        assert!(reader.is_none());
    }

    fn read_bytes(name: &str, bytes: &[u8]) -> anyhow::Result<Image> {
        let path = temp_path(name);
        std::fs::write(&path, bytes).expect("write");
        let r = read_image(&path);
        std::fs::remove_file(&path).ok();

        r
    }

    #[test]
    fn pfm_header_overflow() {
        // 3 * 2^32 * 2^32 samples does not fit in usize
        assert!(read_bytes("overflow.pfm", b"PF\n4294967296 4294967296\n-1\n").is_err());
    }

    #[test]
    fn pfm_header_larger_than_file() {
        let mut bytes = b"PF\n4096 4096\n-1\n".to_vec();
        bytes.extend_from_slice(&[0u8; 64]);
        assert!(read_bytes("truncated.pfm", &bytes).is_err());

        // Exactly one pixel of data is accepted
        let mut bytes = b"PF\n1 1\n-1\n".to_vec();
        for v in [0.5f32, 1.0, 2.0].iter() {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let image = read_bytes("single.pfm", &bytes).expect("one pixel");
        assert_eq!(image.resolution, Point2i::new(1, 1));
        assert!(abs_diff_eq!(image.get(0, 0).to_rgb()[2], 2.0));
    }

    #[test]
    fn empty_images_are_rejected() {
        assert!(read_bytes("empty.pfm", b"PF\n0 0\n-1\n").is_err());
        assert!(read_bytes("empty_row.pfm", b"Pf\n7 0\n-1\n").is_err());

        assert!(Image::new(Point2i::new(0, 0), vec![], ScalarType::Float).is_err());
        assert!(Image::new(Point2i::new(4, 0), vec![], ScalarType::UnsignedChar).is_err());
        // Pixel count must match the resolution
        assert!(Image::new(Point2i::new(2, 2), vec![Default::default(); 3], ScalarType::Float).is_err());
        assert!(Image::new(Point2i::new(2, 2), vec![Default::default(); 4], ScalarType::Float).is_ok());
    }

    #[test]
    fn unsupported_output() {
        let res = Point2i::new(2, 2);
        assert!(write_image(temp_path("out.xyz"), &[0.0; 12], &res).is_err());
    }
}
