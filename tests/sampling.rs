#[cfg(test)]
mod sampling {
    use pbr_ibl::core::pbrt::Float;
    use pbr_ibl::core::sampling::{radical_inverse_vdc, hammersley, importance_sample_ggx};
    use pbr_ibl::core::geometry::point::Point2f;
    use approx::relative_eq;

    #[test]
    fn radical_inverse_test() {
        assert_eq!(radical_inverse_vdc(0), 0.0);
        assert_eq!(radical_inverse_vdc(1), 0.5);
        assert_eq!(radical_inverse_vdc(2), 0.25);
        assert_eq!(radical_inverse_vdc(3), 0.75);
        assert!(radical_inverse_vdc(u32::MAX) < 1.0);
    }

    #[test]
    fn hammersley_in_unit_square() {
        let n = 1024;

        for i in 0..n {
            let p = hammersley(i, n);
            assert!(p.x >= 0.0 && p.x < 1.0);
            assert!(p.y >= 0.0 && p.y < 1.0);
        }
    }

    #[test]
    fn ggx_half_vectors() {
        let n = 256;

        for alpha in [0.01 as Float, 0.25, 1.0].iter() {
            for i in 0..n {
                let h = importance_sample_ggx(&hammersley(i, n), *alpha);
                assert!(relative_eq!(h.length(), 1.0, epsilon = 1.0e-4));
                assert!(h.z >= 0.0);
            }
        }

        // A mirror-like lobe stays close to the normal
        let h = importance_sample_ggx(&Point2f::new(0.3, 0.9), 0.001);
        assert!(h.z > 0.999);
    }
}
