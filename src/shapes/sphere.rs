use log::debug;
use crate::core::pbrt::{Float, clamp, radians};
use crate::core::geometry::point::Point3f;
use crate::core::geometry::vector::Vector3f;
use crate::core::polydata::PolyData;

stat_counter!("Scene/Sphere triangles generated", nsphere_triangles);

pub fn init_stats() {
    nsphere_triangles::init();
}

/// Triangulated sphere with poles on the z axis. Angles are in degrees:
/// theta is the longitude in the xy plane, phi the angle from +z.
#[derive(Debug, Clone)]
pub struct SphereSource {
    pub radius          : Float,
    pub center          : Point3f,
    theta_resolution    : usize,
    phi_resolution      : usize,
    pub start_theta     : Float,
    pub end_theta       : Float,
    pub start_phi       : Float,
    pub end_phi         : Float
}

impl Default for SphereSource {
    fn default() -> Self {
        Self {
            radius: 0.5,
            center: Point3f::new(0.0, 0.0, 0.0),
            theta_resolution: 8,
            phi_resolution: 8,
            start_theta: 0.0,
            end_theta: 360.0,
            start_phi: 0.0,
            end_phi: 180.0
        }
    }
}

impl SphereSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_theta_resolution(&mut self, n: usize) {
        self.theta_resolution = n.max(3);
    }

    pub fn theta_resolution(&self) -> usize { self.theta_resolution }

    pub fn set_phi_resolution(&mut self, n: usize) {
        self.phi_resolution = n.max(3);
    }

    pub fn phi_resolution(&self) -> usize { self.phi_resolution }

    pub fn output(&self) -> PolyData {
        let theta_res = self.theta_resolution.max(3);
        let phi_res = self.phi_resolution.max(3);

        let (start_theta, end_theta) = (
            self.start_theta.min(self.end_theta),
            self.start_theta.max(self.end_theta));
        let start_phi = clamp(self.start_phi.min(self.end_phi), 0.0, 180.0);
        let end_phi = clamp(self.start_phi.max(self.end_phi), 0.0, 180.0);

        let full = end_theta - start_theta >= 360.0;
        let ncols = if full { theta_res } else { theta_res + 1 };
        let north = start_phi <= 0.0;
        let south = end_phi >= 180.0;

        let delta_phi = (end_phi - start_phi) / (phi_res - 1) as Float;
        let delta_theta = (end_theta - start_theta) / theta_res as Float;
        let first_ring = if north { 1 } else { 0 };
        let last_ring = if south { phi_res - 1 } else { phi_res };
        let nrings = last_ring - first_ring;

        let mut points = Vec::with_capacity(2 + ncols * nrings);
        let mut normals = Vec::with_capacity(points.capacity());

        let mut add = |n: Vector3f| {
            points.push(self.center + n * self.radius);
            normals.push(n);
        };

        if north { add(Vector3f::new(0.0, 0.0, 1.0)); }
        if south { add(Vector3f::new(0.0, 0.0, -1.0)); }

        let npoles = north as usize + south as usize;

        for i in 0..ncols {
            let theta = radians(start_theta + i as Float * delta_theta);

            for j in first_ring..last_ring {
                let phi = radians(start_phi + j as Float * delta_phi);
                let r = phi.sin();

                add(Vector3f::new(r * theta.cos(), r * theta.sin(), phi.cos()));
            }
        }

        let idx = |col: usize, ring: usize| npoles + col * nrings + ring;
        let mut triangles = Vec::with_capacity(2 * theta_res * phi_res);

        for i in 0..theta_res {
            let next = if full { (i + 1) % ncols } else { i + 1 };

            if nrings == 0 { break; }

            if north {
                triangles.push([0, idx(i, 0), idx(next, 0)]);
            }

            if south {
                let pole = if north { 1 } else { 0 };
                triangles.push([idx(i, nrings - 1), pole, idx(next, nrings - 1)]);
            }

            for r in 0..nrings.saturating_sub(1) {
                let (a, b) = (idx(i, r), idx(i, r + 1));
                let (c, d) = (idx(next, r + 1), idx(next, r));

                triangles.push([a, b, c]);
                triangles.push([a, c, d]);
            }
        }

        // Wind every triangle counter clockwise seen from outside
        for t in triangles.iter_mut() {
            let (p0, p1, p2) = (points[t[0]], points[t[1]], points[t[2]]);
            let n = (p1 - p0).cross(&(p2 - p0));
            let outward = normals[t[0]] + normals[t[1]] + normals[t[2]];

            if n.dot(&outward) < 0.0 { t.swap(1, 2); }
        }

        nsphere_triangles::add(triangles.len() as u64);
        debug!("Sphere source {} X {}: {} points, {} triangles",
               theta_res, phi_res, points.len(), triangles.len());

        PolyData::new(points, normals, triangles)
    }
}
