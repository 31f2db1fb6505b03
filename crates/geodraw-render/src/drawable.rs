//! Drawable buffer state and the capabilities shared by all drawables.
//!
//! A drawable owns CPU-side copies of everything uploaded to it. The copies are
//! mirrored into `wgpu` buffers on [`Drawable::sync_gpu`], which only does work
//! after an upload changed something.

use std::fmt;

use glam::{Vec2, Vec3};

use crate::buffer::{
    create_attribute_buffer, create_index_buffer, flatten_vec2, largest_buffer_size, pad_vec3,
    rewrite_buffer,
};
use crate::error::{RenderError, RenderResult};

/// Kind of primitive a drawable rasterizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawableKind {
    Points,
    Lines,
    Triangles,
}

/// GPU resources mirroring a drawable's buffers.
pub struct GpuBuffers {
    /// Positions, vec4 with w = 1.
    pub vertex_buffer: wgpu::Buffer,
    /// Normals, vec4 with w = 0.
    pub normal_buffer: Option<wgpu::Buffer>,
    /// Colors, vec4 with a = 1.
    pub color_buffer: Option<wgpu::Buffer>,
    /// Texture coordinates, vec2.
    pub texcoord_buffer: Option<wgpu::Buffer>,
    /// Element indices; `None` means non-indexed drawing.
    pub index_buffer: Option<wgpu::Buffer>,
    /// Number of vertices.
    pub num_vertices: u32,
    /// Number of indices.
    pub num_indices: u32,
}

impl GpuBuffers {
    /// Creates GPU buffers for the current contents of `buffers`.
    ///
    /// Fails if the largest buffer exceeds the device's `max_buffer_size`.
    pub fn new(device: &wgpu::Device, buffers: &DrawableBuffers, label: &str) -> RenderResult<Self> {
        let limit = device.limits().max_buffer_size;
        let largest = largest_buffer_size(
            buffers.vertices.len().max(buffers.normals.len()).max(buffers.colors.len()),
            buffers.texcoords.len(),
            buffers.indices.as_ref().map_or(0, Vec::len),
        );
        if largest > limit {
            return Err(RenderError::BufferCreationFailed(format!(
                "'{label}' needs {largest} bytes, device allows {limit}"
            )));
        }

        let vertex_buffer = create_attribute_buffer(
            device,
            &pad_vec3(&buffers.vertices, 1.0),
            &format!("{label} vertices"),
        );
        let normal_buffer = (!buffers.normals.is_empty()).then(|| {
            create_attribute_buffer(
                device,
                &pad_vec3(&buffers.normals, 0.0),
                &format!("{label} normals"),
            )
        });
        let color_buffer = (!buffers.colors.is_empty()).then(|| {
            create_attribute_buffer(
                device,
                &pad_vec3(&buffers.colors, 1.0),
                &format!("{label} colors"),
            )
        });
        let texcoord_buffer = (!buffers.texcoords.is_empty()).then(|| {
            create_attribute_buffer(
                device,
                &flatten_vec2(&buffers.texcoords),
                &format!("{label} texcoords"),
            )
        });
        let index_buffer = buffers
            .indices
            .as_ref()
            .map(|indices| create_index_buffer(device, indices, &format!("{label} indices")));

        Ok(Self {
            vertex_buffer,
            normal_buffer,
            color_buffer,
            texcoord_buffer,
            index_buffer,
            num_vertices: buffers.vertices.len() as u32,
            num_indices: buffers.indices.as_ref().map_or(0, |i| i.len() as u32),
        })
    }

    /// Returns true if every buffer has the size `buffers` needs, so contents can
    /// be rewritten in place.
    fn fits(&self, buffers: &DrawableBuffers) -> bool {
        let same_presence = self.normal_buffer.is_some() == !buffers.normals.is_empty()
            && self.color_buffer.is_some() == !buffers.colors.is_empty()
            && self.texcoord_buffer.is_some() == !buffers.texcoords.is_empty()
            && self.index_buffer.is_some() == buffers.indices.is_some();
        same_presence
            && self.num_vertices as usize == buffers.vertices.len()
            && self.num_indices as usize == buffers.indices.as_ref().map_or(0, Vec::len)
            && (buffers.normals.is_empty() || buffers.normals.len() == buffers.vertices.len())
            && (buffers.colors.is_empty() || buffers.colors.len() == buffers.vertices.len())
            && (buffers.texcoords.is_empty() || buffers.texcoords.len() == buffers.vertices.len())
    }

    fn write(&self, queue: &wgpu::Queue, buffers: &DrawableBuffers) {
        rewrite_buffer(queue, &self.vertex_buffer, &pad_vec3(&buffers.vertices, 1.0));
        if let Some(buffer) = &self.normal_buffer {
            rewrite_buffer(queue, buffer, &pad_vec3(&buffers.normals, 0.0));
        }
        if let Some(buffer) = &self.color_buffer {
            rewrite_buffer(queue, buffer, &pad_vec3(&buffers.colors, 1.0));
        }
        if let Some(buffer) = &self.texcoord_buffer {
            rewrite_buffer(queue, buffer, &flatten_vec2(&buffers.texcoords));
        }
        if let (Some(buffer), Some(indices)) = (&self.index_buffer, &buffers.indices) {
            rewrite_buffer(queue, buffer, indices);
        }
    }
}

/// CPU-side buffers and color state of a drawable.
pub struct DrawableBuffers {
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
    colors: Vec<Vec3>,
    texcoords: Vec<Vec2>,
    indices: Option<Vec<u32>>,
    default_color: Vec3,
    per_vertex_color: bool,
    dirty: bool,
    gpu: Option<GpuBuffers>,
}

impl Default for DrawableBuffers {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            colors: Vec::new(),
            texcoords: Vec::new(),
            indices: None,
            default_color: Vec3::new(0.5, 0.5, 0.5),
            per_vertex_color: false,
            dirty: false,
            gpu: None,
        }
    }
}

impl DrawableBuffers {
    /// Checks the consistency rules between buffers.
    ///
    /// - every index addresses an uploaded vertex
    /// - normals, colors and texture coordinates, when present, match the vertex count
    /// - per-vertex coloring is only enabled with a full color buffer
    pub fn validate(&self) -> RenderResult<()> {
        let n = self.vertices.len();
        if let Some(indices) = &self.indices {
            if let Some(bad) = indices.iter().find(|&&i| i as usize >= n) {
                return Err(RenderError::InconsistentBuffers(format!(
                    "index {bad} out of range for {n} vertices"
                )));
            }
        }
        for (what, len) in [
            ("normals", self.normals.len()),
            ("colors", self.colors.len()),
            ("texcoords", self.texcoords.len()),
        ] {
            if len != 0 && len != n {
                return Err(RenderError::InconsistentBuffers(format!(
                    "{len} {what} for {n} vertices"
                )));
            }
        }
        if self.per_vertex_color && self.colors.len() != n {
            return Err(RenderError::InconsistentBuffers(format!(
                "per-vertex color enabled with {} colors for {n} vertices",
                self.colors.len()
            )));
        }
        Ok(())
    }

    /// Returns true if uploads happened since the last GPU sync.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the GPU buffers, if created.
    pub fn gpu(&self) -> Option<&GpuBuffers> {
        self.gpu.as_ref()
    }
}

impl fmt::Debug for DrawableBuffers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawableBuffers")
            .field("vertices", &self.vertices.len())
            .field("normals", &self.normals.len())
            .field("colors", &self.colors.len())
            .field("texcoords", &self.texcoords.len())
            .field("indices", &self.indices.as_ref().map(Vec::len))
            .field("default_color", &self.default_color)
            .field("per_vertex_color", &self.per_vertex_color)
            .field("on_gpu", &self.gpu.is_some())
            .finish()
    }
}

/// Capabilities common to points, lines and triangles drawables.
pub trait Drawable {
    /// Returns the drawable name.
    fn name(&self) -> &str;

    /// Returns the primitive kind.
    fn kind(&self) -> DrawableKind;

    /// Returns the buffer state.
    fn buffers(&self) -> &DrawableBuffers;

    /// Returns the buffer state mutably.
    fn buffers_mut(&mut self) -> &mut DrawableBuffers;

    /// Replaces the vertex positions.
    fn upload_vertices(&mut self, vertices: Vec<Vec3>) {
        let b = self.buffers_mut();
        b.vertices = vertices;
        b.dirty = true;
    }

    /// Replaces the per-vertex colors.
    fn upload_colors(&mut self, colors: Vec<Vec3>) {
        let b = self.buffers_mut();
        b.colors = colors;
        b.dirty = true;
    }

    /// Sets the uniform color used when per-vertex coloring is off.
    fn set_default_color(&mut self, color: Vec3) {
        self.buffers_mut().default_color = color;
    }

    /// Switches between per-vertex colors and the default color.
    fn set_per_vertex_color(&mut self, per_vertex: bool) {
        self.buffers_mut().per_vertex_color = per_vertex;
    }

    /// Returns the vertex positions.
    fn vertices(&self) -> &[Vec3] {
        &self.buffers().vertices
    }

    /// Returns the per-vertex colors (empty if none were uploaded).
    fn colors(&self) -> &[Vec3] {
        &self.buffers().colors
    }

    /// Returns the number of uploaded vertices.
    fn num_vertices(&self) -> usize {
        self.buffers().vertices.len()
    }

    /// Returns the default color.
    fn default_color(&self) -> Vec3 {
        self.buffers().default_color
    }

    /// Returns whether per-vertex coloring is enabled.
    fn per_vertex_color(&self) -> bool {
        self.buffers().per_vertex_color
    }

    /// Mirrors the CPU buffers into GPU buffers.
    ///
    /// Buffers are rewritten in place when their sizes still fit and recreated
    /// otherwise. Returns `Ok(false)` if nothing changed since the last sync.
    fn sync_gpu(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> RenderResult<bool> {
        let label = self.name().to_string();
        let b = self.buffers_mut();
        if !b.dirty && b.gpu.is_some() {
            return Ok(false);
        }
        b.validate()?;
        let reuse = b.gpu.as_ref().is_some_and(|gpu| gpu.fits(b));
        if reuse {
            if let Some(gpu) = &b.gpu {
                gpu.write(queue, b);
            }
        } else {
            log::trace!("creating GPU buffers for drawable '{label}'");
            let gpu = GpuBuffers::new(device, b, &label)?;
            b.gpu = Some(gpu);
        }
        b.dirty = false;
        Ok(true)
    }

    /// Drops the GPU buffers, keeping the CPU copies.
    fn release_gpu(&mut self) {
        let b = self.buffers_mut();
        b.gpu = None;
        b.dirty = true;
    }
}

/// Drawables that carry per-vertex normals.
pub trait NormalBuffer: Drawable {
    /// Replaces the per-vertex normals.
    fn upload_normals(&mut self, normals: Vec<Vec3>) {
        let b = self.buffers_mut();
        b.normals = normals;
        b.dirty = true;
    }

    /// Returns the per-vertex normals (empty if none were uploaded).
    fn normals(&self) -> &[Vec3] {
        &self.buffers().normals
    }
}

/// Drawables that carry per-vertex texture coordinates.
pub trait TexcoordBuffer: Drawable {
    /// Replaces the per-vertex texture coordinates.
    fn upload_texcoords(&mut self, texcoords: Vec<Vec2>) {
        let b = self.buffers_mut();
        b.texcoords = texcoords;
        b.dirty = true;
    }

    /// Returns the texture coordinates (empty if none were uploaded).
    fn texcoords(&self) -> &[Vec2] {
        &self.buffers().texcoords
    }
}

/// Drawables that can draw through an element index buffer.
pub trait IndexBuffer: Drawable {
    /// Replaces the element indices and switches to indexed drawing.
    fn upload_indices(&mut self, indices: Vec<u32>) {
        let b = self.buffers_mut();
        b.indices = Some(indices);
        b.dirty = true;
    }

    /// Drops the index buffer, switching to non-indexed drawing.
    fn release_index_buffer(&mut self) {
        let b = self.buffers_mut();
        b.indices = None;
        if let Some(gpu) = &mut b.gpu {
            gpu.index_buffer = None;
            gpu.num_indices = 0;
        }
        b.dirty = true;
    }

    /// Returns the element indices, or `None` when drawing non-indexed.
    fn indices(&self) -> Option<&[u32]> {
        self.buffers().indices.as_deref()
    }

    /// Returns true if an index buffer is bound.
    fn is_indexed(&self) -> bool {
        self.buffers().indices.is_some()
    }
}
