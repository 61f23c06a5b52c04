//! Device seam.
//!
//! `GpuBackend` creates the three kinds of device objects the starfield needs
//! (shader stages, linked programs, static buffers) and replays recorded
//! frames. Handles own their device object: dropping one releases it, so
//! replacing an `Option<Handle>` is the whole rebuild story.

mod wgpu_backend;

use glam::Vec4;
use starfield_engine::coords::{ColorRgba, Viewport};

use crate::error::{BufferError, BufferKind, ShaderError};
use crate::shader::{CompiledStage, ProgramLayout};

pub use wgpu_backend::{WgpuBackend, WgpuBuffer, WgpuProgram, WgpuStage};

pub trait GpuBackend: Sized {
    type Stage;
    type Program;
    type Buffer;

    /// Whatever the backend draws into for one frame.
    type Target<'t>;

    /// Creates the device object for a stage that already compiled.
    fn create_stage(&mut self, stage: &CompiledStage) -> Result<Self::Stage, ShaderError>;

    /// Creates a program from two device stages and their resolved layout.
    fn create_program(
        &mut self,
        layout: &ProgramLayout,
        vertex: &Self::Stage,
        fragment: &Self::Stage,
    ) -> Result<Self::Program, ShaderError>;

    /// Creates a buffer initialized with `contents` that is never written again.
    fn create_static_buffer(
        &mut self,
        kind: BufferKind,
        contents: &[u8],
    ) -> Result<Self::Buffer, BufferError>;

    /// Replays a recorded frame into `target`.
    fn submit(&mut self, target: &mut Self::Target<'_>, frame: &Frame<'_, Self>);
}

/// How the bound vertex buffer feeds an attribute.
///
/// A `stride` of zero means tightly packed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AttributeBinding {
    pub location: u32,
    pub components: u32,
    pub offset: u64,
    pub stride: u64,
}

impl AttributeBinding {
    /// Distance between consecutive vertices in bytes.
    pub fn effective_stride(&self) -> u64 {
        if self.stride == 0 {
            self.components as u64 * std::mem::size_of::<f32>() as u64
        } else {
            self.stride
        }
    }
}

/// One recorded draw-state change or draw call.
pub enum DrawCmd<'a, B: GpuBackend> {
    BindProgram(&'a B::Program),
    BindVertexBuffer {
        buffer: &'a B::Buffer,
        attribute: AttributeBinding,
    },
    BindIndexBuffer(&'a B::Buffer),
    /// Value of the `translation` uniform for the following draws.
    SetTranslation(Vec4),
    /// Indexed triangle list over the bound buffers, starting at index 0.
    DrawIndexed { index_count: u32 },
    ReleaseIndexBuffer,
    ReleaseVertexBuffer,
    ReleaseProgram,
}

/// Everything the backend needs to produce one frame.
///
/// Color and depth are always cleared first; depth testing is always on.
pub struct Frame<'a, B: GpuBackend> {
    pub viewport: Viewport,
    pub clear_color: ColorRgba,
    pub commands: Vec<DrawCmd<'a, B>>,
}

impl<'a, B: GpuBackend> Frame<'a, B> {
    pub fn new(viewport: Viewport, clear_color: ColorRgba) -> Self {
        Self {
            viewport,
            clear_color,
            commands: Vec::new(),
        }
    }

    /// True when the frame only clears.
    pub fn is_clear_only(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCmd::DrawIndexed { .. }))
            .count()
    }

    /// Translations in the order they are set.
    pub fn translations(&self) -> impl Iterator<Item = Vec4> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCmd::SetTranslation(t) => Some(*t),
            _ => None,
        })
    }
}
