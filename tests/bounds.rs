#[cfg(test)]
mod bounds {
    use pbr_ibl::core::geometry::bounds::{Bounds2i, Bounds3f};
    use pbr_ibl::core::geometry::point::{Point2i, Point3f};

    #[test]
    fn bounds3_union() {
        let a = Bounds3f::from_points(
            Point3f::new(-10.0, -10.0, 5.0),
            Point3f::new(0.0, 20.0, 10.0));
        let b = Bounds3f::default();
        let c = a.union_bounds(&b);
        assert_eq!(a, c);
        assert_eq!(b, b.union_bounds(&b));

        let d = Bounds3f::from_point(&Point3f::new(-15.0, 10.0, 30.0));
        let e = a.union_bounds(&d);
        assert_eq!(Bounds3f::from_points(Point3f::new(-15.0, -10.0, 5.0), Point3f::new(0.0, 20.0, 30.0)), e);
    }

    #[test]
    fn bounds3_empty() {
        assert!(Bounds3f::default().is_empty());
        assert!(!Bounds3f::from_point(&Point3f::new(1.0, 2.0, 3.0)).is_empty());

        let b = Bounds3f::from_points(Point3f::new(0.0, 0.0, 0.0), Point3f::new(2.0, 4.0, 6.0));
        assert_eq!(b.centre(), Point3f::new(1.0, 2.0, 3.0));
        assert!(b.inside(&Point3f::new(1.0, 1.0, 1.0)));
        assert!(!b.inside(&Point3f::new(3.0, 1.0, 1.0)));
    }

    #[test]
    fn bounds2_ordering() {
        let b = Bounds2i::from_points(&Point2i::new(5, 0), &Point2i::new(1, 3));
        assert_eq!(b.p_min, Point2i::new(1, 0));
        assert_eq!(b.p_max, Point2i::new(5, 3));
        assert_eq!(b.to_string(), "[ [ 1, 0 ] - [ 5, 3 ] ]");
    }
}
