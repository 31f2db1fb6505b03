//! geodraw: marshal geometric models into GPU-ready drawable buffers.
//!
//! A caller hands a model and a drawable to [`update_data`]. The marshaller reads
//! the model's named properties, computes the buffers and uploads them into the
//! drawable. Drawables keep CPU copies and create their `wgpu` buffers lazily on
//! [`Drawable::sync_gpu`].
//!
//! # Quick Start
//!
//! ```
//! use geodraw::*;
//!
//! fn main() -> Result<()> {
//!     let points = vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y];
//!     let mut mesh = SurfaceMesh::new("quad", points, &[vec![0, 1, 2, 3]])?;
//!
//!     let mut faces = TrianglesDrawable::new("faces");
//!     update_data(&mut mesh, &mut faces)?;
//!     assert_eq!(faces.indices(), Some(&[0, 1, 2, 0, 2, 3][..]));
//!     Ok(())
//! }
//! ```
//!
//! # Supported pairs
//!
//! | Model | Drawable |
//! |---|---|
//! | [`PointCloud`] | [`PointsDrawable`] |
//! | [`SurfaceMesh`] | [`PointsDrawable`], [`LinesDrawable`], [`TrianglesDrawable`] |
//! | [`Graph`] | [`PointsDrawable`], [`LinesDrawable`] |
//!
//! # Properties read
//!
//! `v:point` (required), `v:normal`, `v:color`, `v:texcoord`,
//! `v:primitive_type`, `v:primitive_index` and `f:color`. A triangles marshal
//! writes `f:triangle_range` and creates `v:normal` if it is missing.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]

mod renderer;

pub use renderer::{update_data, UpdateData};

// Re-export core types
pub use geodraw_core::{
    random_color, reset_settings, seed_random, settings, with_settings_mut, Edge, Face,
    GeodrawError, Halfedge, Handle, PropertyContainer, PropertyRef, Result, Settings,
    TriangleRange, Vec2, Vec3, Vec4, Vertex,
};

// Re-export models
pub use geodraw_structures::{
    surface_mesh::{FACE_COLOR, FACE_NORMAL, TRIANGLE_RANGE},
    Graph, Model, PointCloud, SurfaceMesh, COLOR, NORMAL, POINT, PRIMITIVE_INDEX,
    PRIMITIVE_TYPE, TEXCOORD,
};

// Re-export drawables
pub use geodraw_render::{
    Drawable, DrawableKind, IndexBuffer, LineImpostor, LinesDrawable, NormalBuffer,
    PointImpostor, PointsDrawable, RenderError, RenderResult, Tessellator, TessellationError,
    TexcoordBuffer, TrianglesDrawable, WindingRule,
};

/// Initializes `env_logger` from the `RUST_LOG` environment variable.
///
/// Does nothing if a logger is already installed.
pub fn init_logging() {
    let _ = env_logger::try_init();
}
