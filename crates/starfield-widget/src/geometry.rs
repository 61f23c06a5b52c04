//! Static quad mesh shared by every star.

use bytemuck::{Pod, Zeroable};
use glam::Vec4;

/// Homogeneous vertex position, laid out exactly as the `vPosition` attribute
/// reads it (four tightly packed `f32`).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 4],
}

impl Vertex {
    pub const SIZE: u64 = std::mem::size_of::<Vertex>() as u64;

    #[inline]
    pub fn new(position: Vec4) -> Self {
        Self { position: position.to_array() }
    }
}

/// Vertices plus triangle-list topology.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl Mesh {
    pub const INDEX_SIZE: u64 = std::mem::size_of::<u32>() as u64;

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Default edge scale; keeps a star a small square in clip space.
pub const DEFAULT_QUAD_SCALE: f32 = 1.0 / 20.0;

/// Builds the star quad: corners at (±0.5, ±0.5, 0, 1), all four components
/// multiplied by `scale`, wound as two counter-clockwise triangles.
pub fn build_mesh(scale: f32) -> Mesh {
    let corners = [
        Vec4::new(-0.5, -0.5, 0.0, 1.0),
        Vec4::new(0.5, -0.5, 0.0, 1.0),
        Vec4::new(0.5, 0.5, 0.0, 1.0),
        Vec4::new(-0.5, 0.5, 0.0, 1.0),
    ];

    Mesh {
        vertices: corners.iter().map(|&c| Vertex::new(c * scale)).collect(),
        indices: vec![0, 1, 2, 2, 3, 0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_has_four_vertices_and_two_triangles() {
        let mesh = build_mesh(DEFAULT_QUAD_SCALE);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices().len(), 6);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn indices_reference_existing_vertices() {
        let mesh = build_mesh(DEFAULT_QUAD_SCALE);
        assert!(mesh.indices().iter().all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn scale_applies_to_every_component() {
        let mesh = build_mesh(DEFAULT_QUAD_SCALE);
        assert_eq!(mesh.vertices()[0].position, [-0.025, -0.025, 0.0, 0.05]);
        assert_eq!(mesh.vertices()[2].position, [0.025, 0.025, 0.0, 0.05]);
    }

    #[test]
    fn rebuild_is_deterministic() {
        assert_eq!(build_mesh(0.5), build_mesh(0.5));
    }

    #[test]
    fn byte_views_match_buffer_sizes() {
        let mesh = build_mesh(1.0);
        assert_eq!(mesh.vertex_bytes().len() as u64, 4 * Vertex::SIZE);
        assert_eq!(mesh.index_bytes().len() as u64, 2 * 3 * Mesh::INDEX_SIZE);
    }
}
