//! Geometric models for geodraw.
//!
//! - [`PointCloud`] - a set of vertices with per-vertex properties
//! - [`SurfaceMesh`] - a polygonal halfedge mesh with vertex, halfedge, edge and face properties
//! - [`Graph`] - vertices connected by directed edges
//!
//! All models store their data in named property containers. The vertex position
//! property `"v:point"` is created on construction.

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

#[macro_use]
mod property_macros;

pub mod graph;
pub mod point_cloud;
pub mod surface_mesh;

pub use graph::Graph;
pub use point_cloud::PointCloud;
pub use surface_mesh::SurfaceMesh;

use geodraw_core::PropertyContainer;
use glam::Vec3;

/// Name of the vertex position property.
pub const POINT: &str = "v:point";
/// Name of the vertex normal property.
pub const NORMAL: &str = "v:normal";
/// Name of the per-vertex color property.
pub const COLOR: &str = "v:color";
/// Name of the per-vertex texture coordinate property.
pub const TEXCOORD: &str = "v:texcoord";
/// Segment class of a vertex (`i32`, -1 for unknown).
pub const PRIMITIVE_TYPE: &str = "v:primitive_type";
/// Segment instance of a vertex (`i32`).
pub const PRIMITIVE_INDEX: &str = "v:primitive_index";

/// Behaviour shared by every model.
pub trait Model {
    /// Returns the model name.
    fn name(&self) -> &str;

    /// Returns the model kind, used in diagnostics.
    fn type_name(&self) -> &'static str;

    /// Returns the vertex property container.
    fn vertex_properties(&self) -> &PropertyContainer;

    /// Returns the number of vertices.
    fn n_vertices(&self) -> usize {
        self.vertex_properties().len()
    }

    /// Returns the vertex positions, or `None` if `"v:point"` was removed.
    fn points(&self) -> Option<&[Vec3]> {
        self.vertex_properties().get::<Vec3>(POINT)
    }

    /// Returns the axis-aligned bounding box of the vertices.
    fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        let points = self.points()?;
        let first = *points.first()?;
        Some(
            points
                .iter()
                .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
        )
    }
}
