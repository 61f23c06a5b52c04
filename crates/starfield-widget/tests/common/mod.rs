//! In-memory `GpuBackend` that counts live device objects.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec4;
use starfield_engine::coords::Viewport;
use starfield_widget::backend::{DrawCmd, Frame, GpuBackend};
use starfield_widget::error::{BufferError, BufferKind, ShaderError, StageKind};
use starfield_widget::shader::{CompiledStage, ProgramLayout};

#[derive(Debug, Default)]
pub struct Counters {
    pub stages: Cell<usize>,
    pub programs: Cell<usize>,
    pub buffers: Cell<usize>,

    pub stages_created: Cell<usize>,
    pub programs_created: Cell<usize>,
    pub buffers_created: Cell<usize>,
}

fn inc(c: &Cell<usize>) {
    c.set(c.get() + 1);
}

fn dec(c: &Cell<usize>) {
    c.set(c.get() - 1);
}

pub struct FakeStage {
    pub kind: StageKind,
    counters: Rc<Counters>,
}

impl Drop for FakeStage {
    fn drop(&mut self) {
        dec(&self.counters.stages);
    }
}

pub struct FakeProgram {
    pub layout: ProgramLayout,
    counters: Rc<Counters>,
}

impl Drop for FakeProgram {
    fn drop(&mut self) {
        dec(&self.counters.programs);
    }
}

pub struct FakeBuffer {
    pub kind: BufferKind,
    pub len: usize,
    counters: Rc<Counters>,
}

impl Drop for FakeBuffer {
    fn drop(&mut self) {
        dec(&self.counters.buffers);
    }
}

/// What one submitted frame looked like.
#[derive(Debug, Clone, PartialEq)]
pub struct Submitted {
    pub viewport: Viewport,
    pub draws: usize,
    pub translations: Vec<Vec4>,
}

#[derive(Default)]
pub struct FakeBackend {
    pub counters: Rc<Counters>,
    pub fail_buffer: Option<BufferKind>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_buffer(kind: BufferKind) -> Self {
        Self {
            fail_buffer: Some(kind),
            ..Self::default()
        }
    }

    pub fn live(&self) -> (usize, usize, usize) {
        (
            self.counters.stages.get(),
            self.counters.programs.get(),
            self.counters.buffers.get(),
        )
    }
}

impl GpuBackend for FakeBackend {
    type Stage = FakeStage;
    type Program = FakeProgram;
    type Buffer = FakeBuffer;
    type Target<'t> = Vec<Submitted>;

    fn create_stage(&mut self, stage: &CompiledStage) -> Result<FakeStage, ShaderError> {
        inc(&self.counters.stages);
        inc(&self.counters.stages_created);
        Ok(FakeStage {
            kind: stage.kind,
            counters: Rc::clone(&self.counters),
        })
    }

    fn create_program(
        &mut self,
        layout: &ProgramLayout,
        _vertex: &FakeStage,
        _fragment: &FakeStage,
    ) -> Result<FakeProgram, ShaderError> {
        inc(&self.counters.programs);
        inc(&self.counters.programs_created);
        Ok(FakeProgram {
            layout: layout.clone(),
            counters: Rc::clone(&self.counters),
        })
    }

    fn create_static_buffer(
        &mut self,
        kind: BufferKind,
        contents: &[u8],
    ) -> Result<FakeBuffer, BufferError> {
        if self.fail_buffer == Some(kind) {
            return Err(BufferError::Allocation {
                kind,
                reason: "injected failure".to_string(),
            });
        }
        inc(&self.counters.buffers);
        inc(&self.counters.buffers_created);
        Ok(FakeBuffer {
            kind,
            len: contents.len(),
            counters: Rc::clone(&self.counters),
        })
    }

    fn submit(&mut self, target: &mut Vec<Submitted>, frame: &Frame<'_, Self>) {
        let draws = frame
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCmd::DrawIndexed { .. }))
            .count();
        target.push(Submitted {
            viewport: frame.viewport,
            draws,
            translations: frame.translations().collect(),
        });
    }
}
