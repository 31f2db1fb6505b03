//! Drawables and GPU buffers for geodraw.
//!
//! This crate provides the render-side half of geodraw:
//! - CPU-side drawable buffers ([`PointsDrawable`], [`LinesDrawable`], [`TrianglesDrawable`])
//! - Lazy upload of those buffers to wgpu ([`Drawable::sync_gpu`])
//! - A polygon [`Tessellator`] with configurable [`WindingRule`]

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Vertex and index counts are bounded by u32 GPU indices
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

pub mod buffer;
pub mod drawable;
pub mod error;
pub mod lines_drawable;
pub mod points_drawable;
pub mod tessellator;
pub mod triangles_drawable;

pub use drawable::{
    Drawable, DrawableBuffers, DrawableKind, GpuBuffers, IndexBuffer, NormalBuffer,
    TexcoordBuffer,
};
pub use error::{RenderError, RenderResult, TessellationError};
pub use lines_drawable::{LineImpostor, LinesDrawable};
pub use points_drawable::{PointImpostor, PointsDrawable};
pub use tessellator::{Tessellator, WindingRule};
pub use triangles_drawable::TrianglesDrawable;
