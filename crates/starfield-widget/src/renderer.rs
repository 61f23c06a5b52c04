//! Turns the current star positions into a recorded frame.

use glam::Vec3;
use starfield_engine::coords::{ColorRgba, Viewport};

use crate::backend::{AttributeBinding, DrawCmd, Frame, GpuBackend};
use crate::buffers::GpuBuffers;
use crate::shader::ShaderPipeline;

/// Records one indexed draw per star, reusing the quad buffers and moving it
/// with the `translation` uniform.
#[derive(Debug, Clone)]
pub struct Renderer {
    clear_color: ColorRgba,
    viewport: Viewport,
}

impl Renderer {
    pub fn new(clear_color: ColorRgba) -> Self {
        Self {
            clear_color,
            viewport: Viewport::default(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Maps the viewport to the full `width` x `height` drawable.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
    }

    /// Records the frame. Unless both the program and the buffers are valid the
    /// frame only clears.
    pub fn record<'a, B: GpuBackend>(
        &self,
        shader: &'a ShaderPipeline<B>,
        buffers: &'a GpuBuffers<B>,
        stars: &[Vec3],
    ) -> Frame<'a, B> {
        let mut frame = Frame::new(self.viewport, self.clear_color);

        let (Some(program), Some(layout), Some(vertices), Some(indices)) = (
            shader.program(),
            shader.layout(),
            buffers.vertex_buffer(),
            buffers.index_buffer(),
        ) else {
            return frame;
        };

        let index_count = buffers.index_count();
        let cmds = &mut frame.commands;
        cmds.reserve(stars.len() * 2 + 6);

        cmds.push(DrawCmd::BindProgram(program));
        cmds.push(DrawCmd::BindVertexBuffer {
            buffer: vertices,
            attribute: AttributeBinding {
                location: layout.position_location,
                components: 4,
                offset: 0,
                stride: 0,
            },
        });
        cmds.push(DrawCmd::BindIndexBuffer(indices));

        for star in stars {
            // w = 0: a direction-free offset added to the homogeneous corner.
            cmds.push(DrawCmd::SetTranslation(star.extend(0.0)));
            cmds.push(DrawCmd::DrawIndexed { index_count });
        }

        cmds.push(DrawCmd::ReleaseIndexBuffer);
        cmds.push(DrawCmd::ReleaseVertexBuffer);
        cmds.push(DrawCmd::ReleaseProgram);

        frame
    }
}
