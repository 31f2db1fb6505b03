//! Drawable rendering triangles, indexed or as a flat stream.

use crate::drawable::{Drawable, DrawableBuffers, DrawableKind, IndexBuffer, NormalBuffer, TexcoordBuffer};

/// Triangles drawable.
///
/// With an index buffer every three indices form a triangle; without one every
/// three consecutive vertices do.
#[derive(Debug)]
pub struct TrianglesDrawable {
    name: String,
    buffers: DrawableBuffers,
    smooth_shading: bool,
}

impl TrianglesDrawable {
    /// Creates an empty triangles drawable.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            buffers: DrawableBuffers::default(),
            smooth_shading: true,
        }
    }

    /// Returns the number of triangles that will be drawn.
    pub fn num_triangles(&self) -> usize {
        self.indices().map_or(self.num_vertices() / 3, |i| i.len() / 3)
    }

    /// Gets whether vertex normals are interpolated.
    pub fn smooth_shading(&self) -> bool {
        self.smooth_shading
    }

    /// Sets whether vertex normals are interpolated.
    pub fn set_smooth_shading(&mut self, smooth: bool) {
        self.smooth_shading = smooth;
    }
}

impl Drawable for TrianglesDrawable {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> DrawableKind {
        DrawableKind::Triangles
    }

    fn buffers(&self) -> &DrawableBuffers {
        &self.buffers
    }

    fn buffers_mut(&mut self) -> &mut DrawableBuffers {
        &mut self.buffers
    }
}

impl NormalBuffer for TrianglesDrawable {}
impl TexcoordBuffer for TrianglesDrawable {}
impl IndexBuffer for TrianglesDrawable {}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_num_triangles_flat_and_indexed() {
        let mut d = TrianglesDrawable::new("faces");
        d.upload_vertices(vec![Vec3::ZERO; 6]);
        assert_eq!(d.num_triangles(), 2);
        d.upload_indices(vec![0, 1, 2]);
        assert_eq!(d.num_triangles(), 1);
        d.release_index_buffer();
        assert_eq!(d.num_triangles(), 2);
    }
}
