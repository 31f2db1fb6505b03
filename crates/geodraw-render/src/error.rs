//! Rendering error types.

use thiserror::Error;

/// Errors that can occur when preparing drawable data.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Buffers of a drawable disagree with each other.
    #[error("inconsistent drawable buffers: {0}")]
    InconsistentBuffers(String),

    /// A buffer would exceed the device limits.
    #[error("buffer creation failed: {0}")]
    BufferCreationFailed(String),
}

/// Errors reported by the [`Tessellator`](crate::Tessellator).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TessellationError {
    /// A call arrived in the wrong phase, e.g. a vertex outside a contour.
    #[error("{call} called while {state}")]
    InvalidState {
        call: &'static str,
        state: &'static str,
    },

    /// A vertex payload is too short to hold a position.
    #[error("vertex payload has {0} values, at least 3 are required")]
    PayloadTooShort(usize),

    /// Vertex payloads of one polygon have different strides.
    #[error("vertex payload stride {actual} differs from polygon stride {expected}")]
    StrideMismatch { expected: usize, actual: usize },

    /// A vertex position is NaN or infinite.
    #[error("vertex position is not finite")]
    NonFinite,

    /// The triangulation backend rejected the polygon.
    #[error("triangulation backend failed: {0}")]
    Backend(String),
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
