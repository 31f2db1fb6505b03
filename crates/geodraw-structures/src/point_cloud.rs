//! Point cloud model.

use geodraw_core::{PropertyContainer, Vertex};
use glam::Vec3;

use crate::{Model, POINT};

/// A set of vertices carrying named per-vertex properties.
#[derive(Debug, Clone)]
pub struct PointCloud {
    name: String,
    vprops: PropertyContainer,
}

impl PointCloud {
    /// Creates a point cloud holding `points` in `"v:point"`.
    pub fn new(name: impl Into<String>, points: Vec<Vec3>) -> Self {
        let mut vprops = PropertyContainer::new();
        vprops.resize(points.len());
        // The container was sized to the points, so this cannot fail.
        let _ = vprops.set(POINT, points);
        Self {
            name: name.into(),
            vprops,
        }
    }

    /// Appends a vertex at `position`. Other properties get their default value.
    pub fn add_vertex(&mut self, position: Vec3) -> Vertex {
        self.vprops.push();
        let v = Vertex::new(self.vprops.len() - 1);
        if let Ok(points) = self.vprops.get_or_add(POINT, Vec3::ZERO) {
            points[v.idx()] = position;
        }
        v
    }

    /// Iterates over all vertices.
    pub fn vertices(&self) -> impl Iterator<Item = Vertex> {
        (0..self.vprops.len()).map(Vertex::new)
    }

    /// Returns the position of `v`.
    pub fn position(&self, v: Vertex) -> Option<Vec3> {
        self.points().and_then(|p| p.get(v.idx()).copied())
    }

    property_accessors! {
        Vertex, vprops,
        get: vertex_property,
        get_mut: vertex_property_mut,
        add: add_vertex_property,
        get_or_add: get_or_add_vertex_property,
        set: set_vertex_property,
        remove: remove_vertex_property,
        has: has_vertex_property,
        container: vertex_properties,
    }
}

impl Model for PointCloud {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        "PointCloud"
    }

    fn vertex_properties(&self) -> &PropertyContainer {
        &self.vprops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stores_points() {
        let pc = PointCloud::new("pc", vec![Vec3::ZERO, Vec3::X]);
        assert_eq!(pc.n_vertices(), 2);
        assert_eq!(pc.points().unwrap(), &[Vec3::ZERO, Vec3::X]);
        assert_eq!(pc.vertices().count(), 2);
    }

    #[test]
    fn test_add_vertex_extends_properties() {
        let mut pc = PointCloud::new("pc", vec![Vec3::ZERO]);
        pc.add_vertex_property("v:primitive_type", -1_i32).unwrap();
        let v = pc.add_vertex(Vec3::Y);
        assert_eq!(v.idx(), 1);
        assert_eq!(pc.position(v), Some(Vec3::Y));
        let types = pc.vertex_property::<i32>("v:primitive_type").unwrap();
        assert_eq!(types[v], -1);
    }

    #[test]
    fn test_bounding_box() {
        let pc = PointCloud::new("pc", vec![Vec3::new(1.0, -2.0, 0.5), Vec3::new(-1.0, 3.0, 0.0)]);
        let (min, max) = pc.bounding_box().unwrap();
        assert_eq!(min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(max, Vec3::new(1.0, 3.0, 0.5));
        assert!(PointCloud::new("empty", Vec::new()).bounding_box().is_none());
    }

    #[test]
    fn test_removed_points_are_absent() {
        let mut pc = PointCloud::new("pc", vec![Vec3::ZERO]);
        assert!(pc.remove_vertex_property(POINT));
        assert!(pc.points().is_none());
    }
}
