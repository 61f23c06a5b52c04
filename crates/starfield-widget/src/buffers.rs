//! Device copies of the quad mesh.

use crate::backend::GpuBackend;
use crate::error::{BufferError, BufferKind};
use crate::geometry::Mesh;

struct Uploaded<B: GpuBackend> {
    vertices: B::Buffer,
    indices: B::Buffer,
    index_count: u32,
}

/// Vertex + index buffers for the quad. Valid exactly when both exist.
pub struct GpuBuffers<B: GpuBackend> {
    uploaded: Option<Uploaded<B>>,
}

impl<B: GpuBackend> GpuBuffers<B> {
    pub fn new() -> Self {
        Self { uploaded: None }
    }

    pub fn is_valid(&self) -> bool {
        self.uploaded.is_some()
    }

    pub fn vertex_buffer(&self) -> Option<&B::Buffer> {
        self.uploaded.as_ref().map(|u| &u.vertices)
    }

    pub fn index_buffer(&self) -> Option<&B::Buffer> {
        self.uploaded.as_ref().map(|u| &u.indices)
    }

    /// Number of indices drawn per star; zero when invalid.
    pub fn index_count(&self) -> u32 {
        self.uploaded.as_ref().map_or(0, |u| u.index_count)
    }

    /// Releases both buffers. No-op when nothing is held.
    pub fn destroy(&mut self) {
        if self.uploaded.take().is_some() {
            log::debug!("mesh buffers released");
        }
    }

    /// Releases the current buffers, then uploads `mesh`.
    ///
    /// Without a mesh (or with an empty one) nothing is allocated and the
    /// buffers stay invalid. A failed index upload also releases the vertex
    /// buffer, so a partial upload is never kept.
    pub fn upload(&mut self, backend: &mut B, mesh: Option<&Mesh>) -> Result<(), BufferError> {
        self.destroy();

        let mesh = mesh
            .filter(|m| !m.is_empty())
            .ok_or(BufferError::MissingGeometry)?;

        let index_count = u32::try_from(mesh.indices().len()).map_err(|_| BufferError::Allocation {
            kind: BufferKind::Index,
            reason: format!("{} indices exceed a u32 draw range", mesh.indices().len()),
        })?;

        let vertices = backend.create_static_buffer(BufferKind::Vertex, mesh.vertex_bytes())?;
        let indices = backend.create_static_buffer(BufferKind::Index, mesh.index_bytes())?;

        log::debug!(
            "uploaded {} vertices ({} B) and {} indices ({} B)",
            mesh.vertex_count(),
            mesh.vertex_bytes().len(),
            index_count,
            mesh.index_bytes().len()
        );

        self.uploaded = Some(Uploaded {
            vertices,
            indices,
            index_count,
        });
        Ok(())
    }
}

impl<B: GpuBackend> Default for GpuBuffers<B> {
    fn default() -> Self {
        Self::new()
    }
}
