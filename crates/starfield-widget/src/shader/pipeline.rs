use super::{compile_stage, link, ProgramLayout};
use crate::assets::LoadedShader;
use crate::backend::GpuBackend;
use crate::error::{ShaderError, StageKind};

/// Linked program plus the stages it was built from.
///
/// Field order is drop order: the program goes before its stages.
struct Linked<B: GpuBackend> {
    program: B::Program,
    _vertex: B::Stage,
    _fragment: B::Stage,
    layout: ProgramLayout,
}

/// Owns the shader program. Valid exactly when a linked program is held.
pub struct ShaderPipeline<B: GpuBackend> {
    linked: Option<Linked<B>>,
}

impl<B: GpuBackend> ShaderPipeline<B> {
    pub fn new() -> Self {
        Self { linked: None }
    }

    pub fn is_valid(&self) -> bool {
        self.linked.is_some()
    }

    pub fn program(&self) -> Option<&B::Program> {
        self.linked.as_ref().map(|l| &l.program)
    }

    pub fn layout(&self) -> Option<&ProgramLayout> {
        self.linked.as_ref().map(|l| &l.layout)
    }

    /// Releases the program and both stages. No-op when nothing is held.
    pub fn destroy(&mut self) {
        if self.linked.take().is_some() {
            log::debug!("shader program released");
        }
    }

    /// Destroys the current program, then compiles both stages and links them.
    ///
    /// On any error nothing is installed and the pipeline stays invalid; device
    /// objects created before the failure are released.
    pub fn rebuild(
        &mut self,
        backend: &mut B,
        vertex: &LoadedShader,
        fragment: &LoadedShader,
    ) -> Result<(), ShaderError> {
        self.destroy();

        let vs = compile_stage(StageKind::Vertex, &vertex.label, &vertex.text)?;
        let vs_stage = backend.create_stage(&vs)?;

        let fs = compile_stage(StageKind::Fragment, &fragment.label, &fragment.text)?;
        let fs_stage = backend.create_stage(&fs)?;

        let layout = link(&vs, &fs)?;
        let program = backend.create_program(&layout, &vs_stage, &fs_stage)?;

        self.linked = Some(Linked {
            program,
            _vertex: vs_stage,
            _fragment: fs_stage,
            layout,
        });
        Ok(())
    }
}

impl<B: GpuBackend> Default for ShaderPipeline<B> {
    fn default() -> Self {
        Self::new()
    }
}
