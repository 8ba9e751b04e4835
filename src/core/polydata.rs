use crate::core::geometry::point::Point3f;
use crate::core::geometry::vector::Vector3f;
use crate::core::geometry::bounds::Bounds3f;

/// Indexed triangle mesh with per point normals.
#[derive(Debug, Clone, Default)]
pub struct PolyData {
    pub points      : Vec<Point3f>,
    pub normals     : Vec<Vector3f>,
    pub triangles   : Vec<[usize; 3]>
}

impl PolyData {
    pub fn new(points: Vec<Point3f>, normals: Vec<Vector3f>, triangles: Vec<[usize; 3]>) -> Self {
        assert!(normals.is_empty() || normals.len() == points.len());

        Self { points, normals, triangles }
    }

    pub fn number_of_points(&self) -> usize { self.points.len() }

    pub fn number_of_triangles(&self) -> usize { self.triangles.len() }

    pub fn has_normals(&self) -> bool { !self.normals.is_empty() }

    pub fn bounds(&self) -> Bounds3f {
        self.points
            .iter()
            .fold(Bounds3f::default(), |b, p| b.union_point(p))
    }

    /// Unit normal of triangle `tri` following its winding.
    pub fn compute_face_normal(&self, tri: usize) -> Vector3f {
        let [i0, i1, i2] = self.triangles[tri];
        let (p0, p1, p2) = (self.points[i0], self.points[i1], self.points[i2]);
        let n = (p1 - p0).cross(&(p2 - p0));
        let l = n.length();

        if l == 0.0 { n } else { n / l }
    }
}
