//! Geometry computation methods for surface meshes.
//!
//! - Face normals (Newell's method, valid for non-convex and non-planar polygons)
//! - Area-weighted vertex normals
//! - Inversion of the per-face triangle ranges for picking

use geodraw_core::{Face, TriangleRange};
use glam::Vec3;

use super::{SurfaceMesh, FACE_NORMAL, TRIANGLE_RANGE};
use crate::{Model, NORMAL, POINT};

impl SurfaceMesh {
    /// Returns the position of vertex `v`.
    pub fn position(&self, v: geodraw_core::Vertex) -> Option<Vec3> {
        self.points().and_then(|p| p.get(v.idx()).copied())
    }

    /// Sum of the cross products of consecutive boundary positions.
    ///
    /// Its direction is the polygon normal and its length twice the polygon area.
    fn newell_vector(&self, face: Face) -> Vec3 {
        let Some(points) = self.vprops.get::<Vec3>(POINT) else {
            return Vec3::ZERO;
        };
        self.halfedges_around_face(face)
            .map(|h| {
                let a = points[self.from_vertex(h).idx()];
                let b = points[self.to_vertex(h).idx()];
                Vec3::new(
                    (a.y - b.y) * (a.z + b.z),
                    (a.z - b.z) * (a.x + b.x),
                    (a.x - b.x) * (a.y + b.y),
                )
            })
            .sum()
    }

    /// Computes the unit normal of `face`, or zero for degenerate faces.
    pub fn compute_face_normal(&self, face: Face) -> Vec3 {
        self.newell_vector(face).normalize_or_zero()
    }

    /// Computes the area of `face` projected onto its best-fit plane.
    pub fn face_area(&self, face: Face) -> f32 {
        self.newell_vector(face).length() * 0.5
    }

    /// Computes all face normals into `"f:normal"`.
    pub fn update_face_normals(&mut self) {
        let normals: Vec<Vec3> = self.faces().map(|f| self.compute_face_normal(f)).collect();
        // One value per face, so the size always matches.
        let _ = self.fprops.set(FACE_NORMAL, normals);
    }

    /// Computes all vertex normals into `"v:normal"`.
    ///
    /// Each vertex normal is the area-weighted average of the normals of its
    /// incident faces. Isolated vertices get a zero normal.
    pub fn update_vertex_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.n_vertices()];
        for f in self.faces() {
            let weighted = self.newell_vector(f);
            for v in self.vertices_around_face(f) {
                normals[v.idx()] += weighted;
            }
        }
        for n in &mut normals {
            *n = n.normalize_or_zero();
        }
        log::trace!("updated vertex normals of '{}'", self.name);
        let _ = self.vprops.set(NORMAL, normals);
    }

    /// Returns the per-face triangle ranges written by the last triangle marshal.
    pub fn triangle_ranges(&self) -> Option<&[TriangleRange]> {
        self.fprops.get::<TriangleRange>(TRIANGLE_RANGE)
    }

    /// Maps a triangle of the marshalled triangle stream back to its source face.
    ///
    /// Returns `None` if no triangle ranges exist or `triangle` is outside all of them.
    pub fn face_of_triangle(&self, triangle: usize) -> Option<Face> {
        let ranges = self.triangle_ranges()?;
        let t = i64::try_from(triangle).ok()?;
        // Ranges are laid out in face order, so `last` never decreases.
        let idx = ranges.partition_point(|r| r.last < t);
        ranges
            .get(idx)
            .filter(|r| r.contains(triangle))
            .map(|_| Face::new(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l_shape() -> SurfaceMesh {
        // Non-convex hexagon in the z = 0 plane, counter-clockwise.
        let points = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(2.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        ];
        SurfaceMesh::new("l", points, &[vec![0, 1, 2, 3, 4, 5]]).unwrap()
    }

    #[test]
    fn test_face_normal_of_non_convex_polygon() {
        let mesh = l_shape();
        let n = mesh.compute_face_normal(Face::new(0));
        assert!(n.abs_diff_eq(Vec3::Z, 1e-6));
        assert!((mesh.face_area(Face::new(0)) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_vertex_normals_created() {
        let mut mesh = l_shape();
        assert!(!mesh.has_vertex_property(NORMAL));
        mesh.update_vertex_normals();
        let normals = mesh.vertex_property::<Vec3>(NORMAL).unwrap();
        assert_eq!(normals.len(), 6);
        assert!(normals.iter().all(|n| n.abs_diff_eq(Vec3::Z, 1e-6)));
    }

    #[test]
    fn test_isolated_vertex_normal_is_zero() {
        let mut mesh = l_shape();
        let v = mesh.add_vertex(Vec3::splat(5.0));
        mesh.update_vertex_normals();
        assert_eq!(mesh.vertex_property::<Vec3>(NORMAL).unwrap()[v], Vec3::ZERO);
    }

    #[test]
    fn test_face_normals_property() {
        let mut mesh = l_shape();
        mesh.update_face_normals();
        let normals = mesh.face_property::<Vec3>(FACE_NORMAL).unwrap();
        assert!(normals[Face::new(0)].abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn test_face_of_triangle() {
        let points = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE, Vec3::Z];
        let mut mesh = SurfaceMesh::new(
            "m",
            points,
            &[vec![0, 1, 3, 2], vec![0, 4], vec![2, 3, 4]],
        )
        .unwrap();
        assert!(mesh.face_of_triangle(0).is_none());
        mesh.set_face_property(
            TRIANGLE_RANGE,
            vec![
                TriangleRange::new(0, 1),
                TriangleRange::empty_at(2),
                TriangleRange::new(2, 2),
            ],
        )
        .unwrap();
        assert_eq!(mesh.face_of_triangle(0), Some(Face::new(0)));
        assert_eq!(mesh.face_of_triangle(1), Some(Face::new(0)));
        assert_eq!(mesh.face_of_triangle(2), Some(Face::new(2)));
        assert_eq!(mesh.face_of_triangle(3), None);
    }
}
