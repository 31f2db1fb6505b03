//! Core abstractions for geodraw.
//!
//! This crate provides the building blocks shared by the model and render crates:
//! - Typed element handles ([`Vertex`], [`Halfedge`], [`Edge`], [`Face`])
//! - Named, typed property containers keyed by handle
//! - The per-face [`TriangleRange`] produced by triangle marshalling
//! - Global rendering [`Settings`] and the random color source

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Accessors return Self or plain values which don't need must_use
#![allow(clippy::must_use_candidate)]
// Handles are u32-backed; element counts never exceed u32
#![allow(clippy::cast_possible_truncation)]

pub mod error;
pub mod handle;
pub mod property;
pub mod random;
pub mod settings;
pub mod triangle_range;

pub use error::{GeodrawError, Result};
pub use handle::{Edge, Face, Halfedge, Handle, Vertex};
pub use property::{PropertyContainer, PropertyRef};
pub use random::{random_color, random_color_with, seed_random};
pub use settings::{reset_settings, settings, with_settings_mut, Settings};
pub use triangle_range::TriangleRange;

// Re-export glam types for convenience
pub use glam::{Vec2, Vec3, Vec4};
