#[cfg(test)]
mod camera {
    use std::sync::Arc;
    use pbr_ibl::core::pbrt::{Float, radians};
    use pbr_ibl::core::camera::Camera;
    use pbr_ibl::core::renderer::Renderer;
    use pbr_ibl::core::actor::{Actor, PolyDataMapper};
    use pbr_ibl::core::interactor::{InteractorStyleTrackballCamera, Event, Action, MouseButton};
    use pbr_ibl::core::geometry::bounds::Bounds3f;
    use pbr_ibl::core::geometry::point::Point3f;
    use pbr_ibl::shapes::sphere::SphereSource;
    use approx::relative_eq;

    fn unit_cube() -> Bounds3f {
        Bounds3f::from_points(Point3f::new(-0.5, -0.5, -0.5), Point3f::new(0.5, 0.5, 0.5))
    }

    #[test]
    fn reset_fits_bounds() {
        let mut camera = Camera::new();
        camera.reset(&unit_cube());

        let radius = 0.5 * (3.0 as Float).sqrt();
        let expected = radius / (radians(camera.view_angle) * 0.5).sin();

        assert_eq!(camera.focal_point, Point3f::new(0.0, 0.0, 0.0));
        assert!(relative_eq!(camera.distance(), expected, epsilon = 1.0e-4));
        assert!(relative_eq!(camera.position.z, expected, epsilon = 1.0e-4));

        let (near, far) = camera.clipping_range;
        assert!(near > 0.0 && near < expected - 0.5);
        assert!(far > expected + 0.5);
    }

    #[test]
    fn reset_with_empty_bounds_keeps_camera() {
        let mut camera = Camera::new();
        camera.reset(&Bounds3f::default());

        assert_eq!(camera.position, Point3f::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn azimuth_elevation_keep_distance() {
        let mut camera = Camera::new();
        camera.reset(&unit_cube());
        let d = camera.distance();

        camera.azimuth(90.0);
        assert!(relative_eq!(camera.distance(), d, epsilon = 1.0e-4));
        assert!(relative_eq!(camera.position.x, d, epsilon = 1.0e-3));

        camera.elevation(30.0);
        camera.orthogonalize_view_up();
        assert!(relative_eq!(camera.distance(), d, epsilon = 1.0e-4));
        assert!(camera.view_up.dot(&camera.direction_of_projection()).abs() < 1.0e-4);
    }

    #[test]
    fn dolly_and_zoom() {
        let mut camera = Camera::new();
        camera.dolly(2.0);
        assert!(relative_eq!(camera.distance(), 0.5, epsilon = 1.0e-5));

        camera.dolly(-1.0);
        assert!(relative_eq!(camera.distance(), 0.5, epsilon = 1.0e-5));

        camera.zoom(2.0);
        assert!(relative_eq!(camera.view_angle, 15.0, epsilon = 1.0e-5));
    }

    fn sphere_row() -> Renderer {
        let mapper = Arc::new(PolyDataMapper::new(Arc::new(SphereSource::new().output())));
        let mut renderer = Renderer::new();

        for i in 0..3 {
            let mut actor = Actor::new(mapper.clone());
            actor.set_position(i as Float, 0.0, 0.0);
            renderer.add_actor(actor);
        }

        renderer
    }

    #[test]
    fn renderer_reset_camera() {
        let mut renderer = sphere_row();
        let bounds = renderer.compute_visible_prop_bounds();
        // The tessellated sphere stays inside its nominal radius
        let sphere = SphereSource::new().output().bounds();
        assert!(sphere.p_max.x < 0.5);
        assert!(relative_eq!(bounds.p_min.x, sphere.p_min.x, epsilon = 1.0e-5));
        assert!(relative_eq!(bounds.p_max.x, 2.0 + sphere.p_max.x, epsilon = 1.0e-5));

        renderer.reset_camera();
        let focal = renderer.active_camera().focal_point;
        assert!(relative_eq!(focal.x, 1.0, epsilon = 1.0e-5));
        assert!(relative_eq!(focal.y, 0.0, epsilon = 1.0e-5));
    }

    #[test]
    fn trackball_style() {
        let mut renderer = sphere_row();
        renderer.reset_camera();
        let d = renderer.active_camera().distance();
        let mut style = InteractorStyleTrackballCamera::new();
        let size = (100, 100);

        // Moving without a button does nothing
        assert_eq!(style.handle(&Event::MouseMove { x: 10.0, y: 10.0 }, &mut renderer, size), Action::None);

        let down = Event::MouseDown { button: MouseButton::Left, x: 50.0, y: 50.0 };
        assert_eq!(style.handle(&down, &mut renderer, size), Action::None);

        let before = renderer.active_camera().position;
        assert_eq!(style.handle(&Event::MouseMove { x: 60.0, y: 55.0 }, &mut renderer, size), Action::Render);
        assert!(renderer.active_camera().position != before);
        assert!(relative_eq!(renderer.active_camera().distance(), d, epsilon = 1.0e-3));

        style.handle(&Event::MouseUp { button: MouseButton::Left }, &mut renderer, size);
        assert_eq!(style.handle(&Event::MouseMove { x: 80.0, y: 80.0 }, &mut renderer, size), Action::None);

        assert_eq!(style.handle(&Event::Wheel(1.0), &mut renderer, size), Action::Render);
        assert!(renderer.active_camera().distance() < d);

        assert_eq!(style.handle(&Event::Key('r'), &mut renderer, size), Action::Render);
        assert!(relative_eq!(renderer.active_camera().distance(), d, epsilon = 1.0e-3));

        assert_eq!(style.handle(&Event::Key('x'), &mut renderer, size), Action::None);
        assert_eq!(style.handle(&Event::Key('q'), &mut renderer, size), Action::Exit);
        assert_eq!(style.handle(&Event::Escape, &mut renderer, size), Action::Exit);
    }
}
