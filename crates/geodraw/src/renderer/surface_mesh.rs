use geodraw_core::{settings, Face, GeodrawError, Result, TriangleRange, Vec2, Vec3};
use geodraw_render::{
    Drawable, IndexBuffer, LinesDrawable, NormalBuffer, PointImpostor, PointsDrawable,
    Tessellator, TessellationError, TexcoordBuffer, TrianglesDrawable, WindingRule,
};
use geodraw_structures::surface_mesh::{FACE_COLOR, TRIANGLE_RANGE};
use geodraw_structures::{Model, SurfaceMesh, COLOR, NORMAL, TEXCOORD};

use super::{required_points, UpdateData};

impl UpdateData<PointsDrawable> for SurfaceMesh {
    fn update_data(&mut self, drawable: &mut PointsDrawable) -> Result<()> {
        let points = required_points(self)?;
        let settings = settings();
        drawable.upload_vertices(points);
        drawable.set_default_color(settings.surface_mesh_vertices_color);
        drawable.set_per_vertex_color(false);
        drawable.set_point_size(settings.surface_mesh_vertices_point_size);
        drawable.set_impostor_type(PointImpostor::Sphere);
        Ok(())
    }
}

impl UpdateData<LinesDrawable> for SurfaceMesh {
    fn update_data(&mut self, drawable: &mut LinesDrawable) -> Result<()> {
        let points = required_points(self)?;
        let indices: Vec<u32> = self
            .edges()
            .flat_map(|e| [self.edge_vertex(e, 0), self.edge_vertex(e, 1)])
            .map(|v| v.idx() as u32)
            .collect();
        let settings = settings();
        drawable.upload_vertices(points);
        drawable.upload_indices(indices);
        drawable.set_default_color(settings.surface_mesh_edges_color);
        drawable.set_per_vertex_color(false);
        drawable.set_line_width(settings.surface_mesh_edges_line_width);
        Ok(())
    }
}

impl UpdateData<TrianglesDrawable> for SurfaceMesh {
    /// Triangulates every face.
    ///
    /// With an `f:color` property every face goes through the [`Tessellator`] and
    /// the result is a flat, non-indexed triangle stream carrying the face color
    /// on each corner. Without it, faces are fan-triangulated into an indexed
    /// list over the original vertices; this path assumes convex faces.
    ///
    /// Either way `f:triangle_range` maps each face to the triangles it produced.
    fn update_data(&mut self, drawable: &mut TrianglesDrawable) -> Result<()> {
        required_points(self)?;
        self.get_or_add_face_property(TRIANGLE_RANGE, TriangleRange::default())?;
        if self.vertex_property::<Vec3>(NORMAL).is_none() {
            log::debug!("surface mesh '{}': computing missing vertex normals", self.name());
            self.update_vertex_normals();
        }

        let count = if self.face_property::<Vec3>(FACE_COLOR).is_some() {
            tessellate_faces(self, drawable)?
        } else {
            fan_triangulate(self, drawable)?
        };
        log::debug!(
            "surface mesh '{}': {} faces -> {count} triangles ({})",
            self.name(),
            self.n_faces(),
            if drawable.is_indexed() { "indexed" } else { "flat" }
        );
        Ok(())
    }
}

/// Flat triangle stream with per-face colors. Returns the triangle count.
fn tessellate_faces(mesh: &mut SurfaceMesh, drawable: &mut TrianglesDrawable) -> Result<usize> {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut colors = Vec::new();
    let mut ranges = Vec::with_capacity(mesh.n_faces());
    let mut count = 0;

    let mut tess = Tessellator::new();
    {
        let (Some(points), Some(vertex_normals), Some(face_colors)) = (
            mesh.points(),
            mesh.vertex_property::<Vec3>(NORMAL),
            mesh.face_property::<Vec3>(FACE_COLOR),
        ) else {
            return Err(GeodrawError::MissingProperty {
                name: NORMAL.to_string(),
                model: mesh.type_name(),
            });
        };

        for f in mesh.faces() {
            if let Err(err) = tessellate_face(mesh, f, points, &vertex_normals, &mut tess) {
                tessellation_failed(f, &err)?;
                ranges.push(TriangleRange::empty_at(count));
                continue;
            }
            let color = face_colors[f];
            for tri in tess.triangles() {
                for &id in tri {
                    let payload = tess.vertex(id);
                    positions.push(vec3_at(payload, 0));
                    normals.push(vec3_at(payload, 3));
                    colors.push(color);
                }
            }
            ranges.push(TriangleRange::from_count(count, tess.num_triangles()));
            count += tess.num_triangles();
        }
    }

    mesh.set_face_property(TRIANGLE_RANGE, ranges)?;
    drawable.upload_vertices(positions);
    drawable.upload_normals(normals);
    drawable.upload_colors(colors);
    drawable.upload_texcoords(Vec::new());
    drawable.set_per_vertex_color(true);
    drawable.release_index_buffer();
    Ok(count)
}

/// Runs one face through the tessellator with `[position, normal]` payloads.
fn tessellate_face(
    mesh: &SurfaceMesh,
    face: Face,
    points: &[Vec3],
    normals: &[Vec3],
    tess: &mut Tessellator,
) -> std::result::Result<(), TessellationError> {
    tess.reset();
    tess.begin_polygon(mesh.compute_face_normal(face))?;
    tess.set_winding_rule(WindingRule::NonZero);
    tess.begin_contour()?;
    for h in mesh.halfedges_around_face(face) {
        let v = mesh.to_vertex(h).idx();
        let (p, n) = (points[v], normals[v]);
        tess.add_vertex(&[p.x, p.y, p.z, n.x, n.y, n.z])?;
    }
    tess.end_contour()?;
    tess.end_polygon()
}

#[cfg(not(feature = "strict-tessellation"))]
fn tessellation_failed(face: Face, err: &TessellationError) -> Result<()> {
    log::warn!("skipping face {face}: {err}");
    Ok(())
}

#[cfg(feature = "strict-tessellation")]
fn tessellation_failed(face: Face, err: &TessellationError) -> Result<()> {
    Err(GeodrawError::Tessellation {
        face: face.idx(),
        reason: err.to_string(),
    })
}

fn vec3_at(payload: &[f64], offset: usize) -> Vec3 {
    Vec3::new(
        payload[offset] as f32,
        payload[offset + 1] as f32,
        payload[offset + 2] as f32,
    )
}

/// Indexed fan triangulation over the mesh vertices. Returns the triangle count.
fn fan_triangulate(mesh: &mut SurfaceMesh, drawable: &mut TrianglesDrawable) -> Result<usize> {
    let points = required_points(mesh)?;
    let normals = mesh
        .vertex_property::<Vec3>(NORMAL)
        .map_or_else(Vec::new, |n| n.to_vec());
    let colors = mesh.vertex_property::<Vec3>(COLOR).map(|c| c.to_vec());
    let texcoords = mesh
        .vertex_property::<Vec2>(TEXCOORD)
        .map_or_else(Vec::new, |t| t.to_vec());

    let mut indices = Vec::new();
    let mut ranges = Vec::with_capacity(mesh.n_faces());
    let mut count = 0;
    for f in mesh.faces() {
        let h0 = mesh.face_halfedge(f);
        let apex = mesh.to_vertex(h0).idx() as u32;
        let mut num = 0;
        let mut cur = mesh.next_halfedge(mesh.next_halfedge(h0));
        while cur != h0 {
            indices.extend([
                apex,
                mesh.from_vertex(cur).idx() as u32,
                mesh.to_vertex(cur).idx() as u32,
            ]);
            num += 1;
            cur = mesh.next_halfedge(cur);
        }
        ranges.push(TriangleRange::from_count(count, num));
        count += num;
    }
    mesh.set_face_property(TRIANGLE_RANGE, ranges)?;

    drawable.upload_vertices(points);
    if let Some(colors) = colors {
        drawable.upload_colors(colors);
        drawable.set_per_vertex_color(true);
    } else {
        drawable.upload_colors(Vec::new());
        drawable.set_per_vertex_color(false);
    }
    drawable.upload_texcoords(texcoords);
    drawable.upload_normals(normals);
    drawable.upload_indices(indices);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> SurfaceMesh {
        let points = vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y];
        SurfaceMesh::new("quad", points, &[vec![0, 1, 2, 3]]).unwrap()
    }

    #[test]
    fn test_points_use_settings() {
        let mut mesh = quad();
        let mut d = PointsDrawable::new("vertices");
        mesh.update_data(&mut d).unwrap();
        assert_eq!(d.num_vertices(), 4);
        assert_eq!(d.impostor_type(), PointImpostor::Sphere);
        assert_eq!(d.point_size(), settings().surface_mesh_vertices_point_size);
        assert!(!d.per_vertex_color());
    }

    #[test]
    fn test_lines_cover_every_edge() {
        let mut mesh = quad();
        let mut d = LinesDrawable::new("edges");
        mesh.update_data(&mut d).unwrap();
        let indices = d.indices().unwrap();
        assert_eq!(indices.len(), 8);
        let mut pairs: Vec<(u32, u32)> = indices
            .chunks_exact(2)
            .map(|p| (p[0].min(p[1]), p[0].max(p[1])))
            .collect();
        pairs.sort_unstable();
        assert_eq!(pairs, vec![(0, 1), (0, 3), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_normals_are_created_once() {
        let mut mesh = quad();
        mesh.set_vertex_property(NORMAL, vec![Vec3::X; 4]).unwrap();
        let mut d = TrianglesDrawable::new("faces");
        mesh.update_data(&mut d).unwrap();
        // Existing normals are kept as they are.
        assert_eq!(d.normals(), &[Vec3::X; 4]);
    }

    #[test]
    fn test_fan_carries_vertex_attributes() {
        let mut mesh = quad();
        mesh.set_vertex_property(COLOR, vec![Vec3::Y; 4]).unwrap();
        mesh.set_vertex_property(TEXCOORD, vec![Vec2::ONE; 4]).unwrap();
        let mut d = TrianglesDrawable::new("faces");
        mesh.update_data(&mut d).unwrap();
        assert!(d.per_vertex_color());
        assert_eq!(d.colors().len(), 4);
        assert_eq!(d.texcoords().len(), 4);
        assert!(d.buffers().validate().is_ok());
    }

    #[test]
    fn test_tessellated_non_convex_face() {
        let points = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(2.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        ];
        let mut mesh = SurfaceMesh::new("l", points, &[vec![0, 1, 2, 3, 4, 5]]).unwrap();
        mesh.add_face_property(FACE_COLOR, Vec3::X).unwrap();
        let mut d = TrianglesDrawable::new("faces");
        mesh.update_data(&mut d).unwrap();
        assert_eq!(d.num_triangles(), 4);
        assert!(d.normals().iter().all(|n| n.abs_diff_eq(Vec3::Z, 1e-6)));
        let area: f32 = d
            .vertices()
            .chunks_exact(3)
            .map(|t| (t[1] - t[0]).cross(t[2] - t[0]).z * 0.5)
            .sum();
        assert!((area - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_switching_paths_keeps_buffers_consistent() {
        let mut mesh = quad();
        mesh.set_vertex_property(TEXCOORD, vec![Vec2::ZERO; 4]).unwrap();
        let mut d = TrianglesDrawable::new("faces");
        mesh.update_data(&mut d).unwrap();
        mesh.add_face_property(FACE_COLOR, Vec3::X).unwrap();
        mesh.update_data(&mut d).unwrap();
        assert!(d.buffers().validate().is_ok());
        assert!(mesh.remove_face_property(FACE_COLOR));
        mesh.update_data(&mut d).unwrap();
        assert!(d.buffers().validate().is_ok());
        assert!(!d.per_vertex_color());
    }
}
