use rayon::prelude::*;
use log::debug;
use crate::core::pbrt::Float;
use crate::core::geometry::point::Point3f;
use crate::core::geometry::vector::Vector3f;
use crate::core::polydata::PolyData;
use crate::core::transform::Transform;

stat_counter!("Raster/Triangles rasterized", ntriangles);
stat_counter!("Raster/Triangles clipped", nclipped);
stat_counter!("Raster/Fragments written", nfragments);
stat_ratio!("Raster/Pixels covered", ncovered);

pub fn init_stats() {
    ntriangles::init();
    nclipped::init();
    nfragments::init();
    ncovered::init();
}

/// Rows handled by one parallel task.
const BAND_HEIGHT: usize = 16;

/// Nearest surface seen through a pixel.
#[derive(Debug, Copy, Clone)]
pub struct Fragment {
    /// Window depth in [0, 1]
    pub depth       : Float,
    pub position    : Point3f,
    pub normal      : Vector3f,
    pub face_normal : Vector3f,
    pub actor       : usize
}

#[derive(Debug, Clone)]
pub struct GBuffer {
    pub width       : usize,
    pub height      : usize,
    pub fragments   : Vec<Option<Fragment>>
}

impl GBuffer {
    pub fn get(&self, x: usize, y: usize) -> Option<&Fragment> {
        self.fragments[y * self.width + x].as_ref()
    }

    pub fn coverage(&self) -> usize {
        self.fragments.iter().filter(|f| f.is_some()).count()
    }
}

/// A mesh placed in the world.
pub struct MeshInstance<'a> {
    pub mesh    : &'a PolyData,
    pub model   : Transform,
    pub actor   : usize
}

/// Clip space vertex with the attributes interpolated across a triangle.
#[derive(Debug, Copy, Clone)]
struct ClipVertex {
    clip    : [Float; 4],
    world   : Point3f,
    normal  : Vector3f
}

impl ClipVertex {
    fn lerp(&self, t: Float, o: &ClipVertex) -> ClipVertex {
        let mut clip = [0.0; 4];

        for (i, c) in clip.iter_mut().enumerate() {
            *c = self.clip[i] + t * (o.clip[i] - self.clip[i]);
        }

        ClipVertex {
            clip,
            world: self.world.lerp(t, &o.world),
            normal: self.normal.lerp(t, &o.normal)
        }
    }

    /// Signed distance to the near plane, positive inside.
    fn near_distance(&self) -> Float {
        self.clip[2] + self.clip[3]
    }
}

/// Screen space vertex: pixel x, y (row 0 at the top), window depth, 1 / w.
#[derive(Debug, Copy, Clone)]
struct ScreenVertex {
    x       : Float,
    y       : Float,
    z       : Float,
    inv_w   : Float,
    world   : Point3f,
    normal  : Vector3f
}

struct ScreenTriangle {
    v           : [ScreenVertex; 3],
    face_normal : Vector3f,
    actor       : usize,
    ymin        : usize,
    ymax        : usize
}

/// Sutherland-Hodgman against the near plane.
fn clip_near(tri: [ClipVertex; 3]) -> Vec<ClipVertex> {
    if tri.iter().all(|v| v.near_distance() >= 0.0) {
        return tri.to_vec();
    }

    nclipped::inc();
    let mut out = Vec::with_capacity(4);

    for i in 0..3 {
        let a = &tri[i];
        let b = &tri[(i + 1) % 3];
        let (da, db) = (a.near_distance(), b.near_distance());

        if da >= 0.0 { out.push(*a); }

        if (da >= 0.0) != (db >= 0.0) {
            out.push(a.lerp(da / (da - db), b));
        }
    }

    out
}

fn to_screen(v: &ClipVertex, width: usize, height: usize) -> ScreenVertex {
    let inv_w = 1.0 / v.clip[3];
    let (nx, ny, nz) = (v.clip[0] * inv_w, v.clip[1] * inv_w, v.clip[2] * inv_w);

    ScreenVertex {
        x: (nx + 1.0) * 0.5 * width as Float,
        y: (1.0 - ny) * 0.5 * height as Float,
        z: (nz + 1.0) * 0.5,
        inv_w,
        world: v.world,
        normal: v.normal
    }
}

fn edge(a: &ScreenVertex, b: &ScreenVertex, px: Float, py: Float) -> Float {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

/// Top-left fill rule for edges of a positively oriented triangle.
fn is_top_left(a: &ScreenVertex, b: &ScreenVertex) -> bool {
    let (dx, dy) = (b.x - a.x, b.y - a.y);

    (dy == 0.0 && dx > 0.0) || dy < 0.0
}

fn setup_triangles(
    meshes: &[MeshInstance], view_proj: &Transform,
    width: usize, height: usize) -> Vec<ScreenTriangle> {
    meshes
        .par_iter()
        .flat_map_iter(|inst| {
            let mesh = inst.mesh;
            let verts = mesh.points
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    let world = inst.model.transform_point(p);
                    let normal = if mesh.has_normals() {
                        let n = inst.model.transform_normal(&mesh.normals[i]);
                        if n.length_squared() > 0.0 { n.normalize() } else { n }
                    } else {
                        Vector3f::default()
                    };

                    ClipVertex { clip: view_proj.transform_point_homogeneous(&world), world, normal }
                })
                .collect::<Vec<_>>();

            let mut tris = Vec::with_capacity(mesh.triangles.len());

            for (t, idx) in mesh.triangles.iter().enumerate() {
                let face_normal = inst.model.transform_normal(&mesh.compute_face_normal(t));
                let face_normal = if face_normal.length_squared() > 0.0 { face_normal.normalize() } else { face_normal };
                let mut cv = [verts[idx[0]], verts[idx[1]], verts[idx[2]]];

                if !mesh.has_normals() {
                    for v in cv.iter_mut() { v.normal = face_normal; }
                }

                let poly = clip_near(cv);
                if poly.len() < 3 { continue; }

                let sv = poly.iter().map(|v| to_screen(v, width, height)).collect::<Vec<_>>();

                for k in 1..sv.len() - 1 {
                    let v = [sv[0], sv[k], sv[k + 1]];
                    let ymin = v.iter().fold(Float::INFINITY, |m, p| m.min(p.y));
                    let ymax = v.iter().fold(Float::NEG_INFINITY, |m, p| m.max(p.y));
                    let xmin = v.iter().fold(Float::INFINITY, |m, p| m.min(p.x));
                    let xmax = v.iter().fold(Float::NEG_INFINITY, |m, p| m.max(p.x));

                    // Entirely outside the viewport
                    if ymax < 0.0 || xmax < 0.0 || ymin > height as Float || xmin > width as Float {
                        continue;
                    }

                    tris.push(ScreenTriangle {
                        v,
                        face_normal,
                        actor: inst.actor,
                        ymin: ymin.max(0.0).floor() as usize,
                        ymax: (ymax.ceil().max(0.0) as usize).min(height.saturating_sub(1))
                    });
                }
            }

            tris.into_iter()
        })
        .collect()
}

fn raster_triangle(
    tri: &ScreenTriangle, band: &mut [Option<Fragment>],
    y0: usize, y1: usize, width: usize) -> u64 {
    let [mut a, mut b, c] = tri.v;
    let mut area = edge(&a, &b, c.x, c.y);

    if area == 0.0 { return 0; }

    if area < 0.0 {
        std::mem::swap(&mut a, &mut b);
        area = -area;
    }

    let xmin = a.x.min(b.x).min(c.x).max(0.0).floor() as usize;
    let xmax = (a.x.max(b.x).max(c.x).ceil().max(0.0) as usize).min(width.saturating_sub(1));
    let ys = tri.ymin.max(y0);
    let ye = tri.ymax.min(y1 - 1);
    let inv_area = 1.0 / area;

    let tl = [is_top_left(&b, &c), is_top_left(&c, &a), is_top_left(&a, &b)];
    let mut written = 0;

    for y in ys..=ye {
        let py = y as Float + 0.5;

        for x in xmin..=xmax {
            let px = x as Float + 0.5;
            let w = [edge(&b, &c, px, py), edge(&c, &a, px, py), edge(&a, &b, px, py)];

            let inside = w.iter().zip(tl.iter()).all(|(w, tl)| *w > 0.0 || (*w == 0.0 && *tl));
            if !inside { continue; }

            let (l0, l1, l2) = (w[0] * inv_area, w[1] * inv_area, w[2] * inv_area);
            let depth = l0 * a.z + l1 * b.z + l2 * c.z;

            if !(0.0..=1.0).contains(&depth) { continue; }

            let slot = &mut band[(y - y0) * width + x];

            if let Some(f) = slot {
                if f.depth <= depth { continue; }
            }

            // Perspective correct weights
            let (p0, p1, p2) = (l0 * a.inv_w, l1 * b.inv_w, l2 * c.inv_w);
            let inv_sum = 1.0 / (p0 + p1 + p2);
            let (p0, p1, p2) = (p0 * inv_sum, p1 * inv_sum, p2 * inv_sum);

            let position = Point3f::from(
                Vector3f::from(a.world) * p0 + Vector3f::from(b.world) * p1 + Vector3f::from(c.world) * p2);
            let normal = a.normal * p0 + b.normal * p1 + c.normal * p2;

            *slot = Some(Fragment {
                depth,
                position,
                normal,
                face_normal: tri.face_normal,
                actor: tri.actor
            });
            written += 1;
        }
    }

    written
}

/// Draw `meshes` into a `width` x `height` G-buffer with a depth test.
pub fn rasterize(meshes: &[MeshInstance], view_proj: &Transform, width: usize, height: usize) -> GBuffer {
    let mut fragments = vec![None; width * height];

    if width == 0 || height == 0 {
        return GBuffer { width, height, fragments };
    }

    let tris = setup_triangles(meshes, view_proj, width, height);
    ntriangles::add(tris.len() as u64);

    // Bin triangles by the bands they overlap, keeping submission order
    let nbands = (height + BAND_HEIGHT - 1) / BAND_HEIGHT;
    let mut bins: Vec<Vec<usize>> = vec![Vec::new(); nbands];

    for (i, t) in tris.iter().enumerate() {
        for bin in bins.iter_mut().take(t.ymax / BAND_HEIGHT + 1).skip(t.ymin / BAND_HEIGHT) {
            bin.push(i);
        }
    }

    let written: u64 = fragments
        .par_chunks_mut(width * BAND_HEIGHT)
        .enumerate()
        .map(|(b, band)| {
            let y0 = b * BAND_HEIGHT;
            let y1 = (y0 + BAND_HEIGHT).min(height);

            bins[b].iter().map(|i| raster_triangle(&tris[*i], band, y0, y1, width)).sum::<u64>()
        })
        .sum();

    nfragments::add(written);

    let gbuffer = GBuffer { width, height, fragments };
    let covered = gbuffer.coverage();
    ncovered::add(covered as u64, (width * height) as u64);
    debug!("Rasterized {} triangles into {} X {}, {} pixels covered",
           tris.len(), width, height, covered);

    gbuffer
}
