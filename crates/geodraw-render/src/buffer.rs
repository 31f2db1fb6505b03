//! Creation and refresh of the wgpu buffers behind a drawable.
//!
//! Per-vertex attributes are stored as tightly packed `vec4<f32>` (or `vec2<f32>`
//! for texture coordinates) so the same buffer can be bound as vertex input or
//! read from a storage binding.

use glam::{Vec2, Vec3};
use wgpu::util::DeviceExt;

/// Creates a per-vertex attribute buffer.
pub fn create_attribute_buffer<T: bytemuck::Pod>(
    device: &wgpu::Device,
    data: &[T],
    label: &str,
) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(data),
        usage: wgpu::BufferUsages::VERTEX
            | wgpu::BufferUsages::STORAGE
            | wgpu::BufferUsages::COPY_DST,
    })
}

/// Creates a `u32` element index buffer.
pub fn create_index_buffer(device: &wgpu::Device, indices: &[u32], label: &str) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(indices),
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
    })
}

/// Overwrites a buffer created by this module with data of the same size.
pub fn rewrite_buffer<T: bytemuck::Pod>(queue: &wgpu::Queue, buffer: &wgpu::Buffer, data: &[T]) {
    queue.write_buffer(buffer, 0, bytemuck::cast_slice(data));
}

/// Widens 3-vectors to vec4 with `w` as the fourth component.
pub fn pad_vec3(data: &[Vec3], w: f32) -> Vec<[f32; 4]> {
    data.iter().map(|v| v.extend(w).to_array()).collect()
}

/// Converts 2-vectors to plain arrays.
pub fn flatten_vec2(data: &[Vec2]) -> Vec<[f32; 2]> {
    data.iter().map(|v| v.to_array()).collect()
}

/// Size in bytes of the largest buffer a drawable with these element counts needs.
pub fn largest_buffer_size(vertices: usize, texcoords: usize, indices: usize) -> u64 {
    let vec4 = std::mem::size_of::<[f32; 4]>();
    let vec2 = std::mem::size_of::<[f32; 2]>();
    (vertices * vec4)
        .max(texcoords * vec2)
        .max(indices * std::mem::size_of::<u32>()) as u64
}
