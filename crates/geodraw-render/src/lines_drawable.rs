//! Drawable rendering indexed line segments.

use crate::drawable::{Drawable, DrawableBuffers, DrawableKind, IndexBuffer};

/// How each segment is rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineImpostor {
    /// Screen-space lines.
    #[default]
    Plain,
    /// Billboards shaded as cylinders.
    Cylinder,
    /// Billboards shaded as cones, pointing from the first to the second vertex.
    Cone,
}

/// Lines drawable. Every pair of indices forms one segment.
#[derive(Debug)]
pub struct LinesDrawable {
    name: String,
    buffers: DrawableBuffers,
    line_width: f32,
    impostor: LineImpostor,
}

impl LinesDrawable {
    /// Creates an empty lines drawable.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            buffers: DrawableBuffers::default(),
            line_width: 1.0,
            impostor: LineImpostor::default(),
        }
    }

    /// Gets the line width in pixels.
    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    /// Sets the line width in pixels.
    pub fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }

    /// Gets the impostor type.
    pub fn impostor_type(&self) -> LineImpostor {
        self.impostor
    }

    /// Sets the impostor type.
    pub fn set_impostor_type(&mut self, impostor: LineImpostor) {
        self.impostor = impostor;
    }

    /// Returns the number of segments.
    pub fn num_segments(&self) -> usize {
        self.indices().map_or(self.num_vertices() / 2, |i| i.len() / 2)
    }
}

impl Drawable for LinesDrawable {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> DrawableKind {
        DrawableKind::Lines
    }

    fn buffers(&self) -> &DrawableBuffers {
        &self.buffers
    }

    fn buffers_mut(&mut self) -> &mut DrawableBuffers {
        &mut self.buffers
    }
}

impl IndexBuffer for LinesDrawable {}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_num_segments() {
        let mut d = LinesDrawable::new("edges");
        d.upload_vertices(vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
        assert_eq!(d.num_segments(), 1);
        d.upload_indices(vec![0, 1, 1, 2, 2, 0]);
        assert_eq!(d.num_segments(), 3);
    }
}
