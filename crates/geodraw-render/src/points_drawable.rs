//! Drawable rendering vertices as points.

use crate::drawable::{Drawable, DrawableBuffers, DrawableKind, NormalBuffer};

/// How each point is rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointImpostor {
    /// Square screen-space points.
    #[default]
    Plain,
    /// Billboards shaded as spheres.
    Sphere,
    /// Oriented disks aligned with the point normal.
    Surfel,
}

/// Points drawable.
#[derive(Debug)]
pub struct PointsDrawable {
    name: String,
    buffers: DrawableBuffers,
    point_size: f32,
    impostor: PointImpostor,
}

impl PointsDrawable {
    /// Creates an empty points drawable.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            buffers: DrawableBuffers::default(),
            point_size: 2.0,
            impostor: PointImpostor::default(),
        }
    }

    /// Gets the point size in pixels.
    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    /// Sets the point size in pixels.
    pub fn set_point_size(&mut self, size: f32) {
        self.point_size = size;
    }

    /// Gets the impostor type.
    pub fn impostor_type(&self) -> PointImpostor {
        self.impostor
    }

    /// Sets the impostor type.
    pub fn set_impostor_type(&mut self, impostor: PointImpostor) {
        self.impostor = impostor;
    }
}

impl Drawable for PointsDrawable {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> DrawableKind {
        DrawableKind::Points
    }

    fn buffers(&self) -> &DrawableBuffers {
        &self.buffers
    }

    fn buffers_mut(&mut self) -> &mut DrawableBuffers {
        &mut self.buffers
    }
}

impl NormalBuffer for PointsDrawable {}
