//! Marshallers from models to drawables.
//!
//! Each supported (model, drawable) pair implements [`UpdateData`]. A marshal is
//! synchronous and stateless: it reads the model, computes buffers, and uploads
//! them with positions first and indices last.

mod graph;
mod point_cloud;
mod surface_mesh;

use geodraw_core::{GeodrawError, Result, Vec3};
use geodraw_structures::{Model, POINT};

/// Fills a drawable of type `D` from a model.
pub trait UpdateData<D> {
    /// Recomputes every buffer of `drawable` from `self`.
    ///
    /// Models are taken mutably because a triangles marshal writes the per-face
    /// triangle ranges and may cache vertex normals.
    fn update_data(&mut self, drawable: &mut D) -> Result<()>;
}

/// Fills `drawable` from `model`.
///
/// Fails with [`GeodrawError::MissingProperty`] if the model has no `v:point`.
pub fn update_data<M, D>(model: &mut M, drawable: &mut D) -> Result<()>
where
    M: UpdateData<D>,
{
    model.update_data(drawable)
}

/// Returns a copy of the vertex positions.
fn required_points<M: Model>(model: &M) -> Result<Vec<Vec3>> {
    model
        .points()
        .map(<[Vec3]>::to_vec)
        .ok_or_else(|| GeodrawError::MissingProperty {
            name: POINT.to_string(),
            model: model.type_name(),
        })
}
