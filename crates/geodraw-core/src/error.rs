//! Error types for geodraw.

use thiserror::Error;

/// The main error type for geodraw operations.
#[derive(Error, Debug)]
pub enum GeodrawError {
    /// A required property is not present on a model.
    #[error("property '{name}' not found on {model}")]
    MissingProperty { name: String, model: &'static str },

    /// A property with the given name already exists.
    #[error("property '{0}' already exists")]
    PropertyExists(String),

    /// A property exists but stores a different element type.
    #[error("property '{name}' does not store values of type {expected}")]
    PropertyTypeMismatch { name: String, expected: &'static str },

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Invalid mesh or graph connectivity.
    #[error("topology error: {0}")]
    Topology(String),

    /// Polygon tessellation failed.
    #[error("tessellation failed for face {face}: {reason}")]
    Tessellation { face: usize, reason: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for geodraw operations.
pub type Result<T> = std::result::Result<T, GeodrawError>;
