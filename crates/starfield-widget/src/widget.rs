//! The starfield component: owns the mesh, the shader program, the device
//! buffers and the particle field, and sequences their lifecycle.

use std::time::Duration;

use rand::Rng;
use rand::rngs::StdRng;

use crate::assets::{LoadedShader, ShaderAsset};
use crate::backend::{Frame, GpuBackend};
use crate::buffers::GpuBuffers;
use crate::config::StarfieldConfig;
use crate::error::{describe, ShaderError, StageKind};
use crate::geometry::{build_mesh, Mesh};
use crate::particles::ParticleField;
use crate::renderer::Renderer;
use crate::shader::ShaderPipeline;

/// Where the widget is in its lifecycle.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Phase {
    /// No GPU context yet; ticks are ignored.
    Uninitialized,
    /// Initialized; ticks advance the field and frames draw.
    Running,
    /// Device objects released. Further ticks and draws are no-ops.
    TornDown,
}

pub struct Starfield<B: GpuBackend, R = StdRng> {
    config: StarfieldConfig,
    phase: Phase,

    mesh: Option<Mesh>,
    shader: ShaderPipeline<B>,
    buffers: GpuBuffers<B>,
    particles: ParticleField<R>,
    renderer: Renderer,
}

impl<B: GpuBackend> Starfield<B, StdRng> {
    /// Builds a widget whose star generator comes from `config`.
    pub fn from_config(config: StarfieldConfig) -> Self {
        let rng = config.rng();
        Self::new(config, rng)
    }
}

impl<B: GpuBackend, R: Rng> Starfield<B, R> {
    pub fn new(config: StarfieldConfig, rng: R) -> Self {
        let particles = ParticleField::new(config.star_count, config.drift.clone(), rng);
        let renderer = Renderer::new(config.clear_color);
        Self {
            config,
            phase: Phase::Uninitialized,
            mesh: None,
            shader: ShaderPipeline::new(),
            buffers: GpuBuffers::new(),
            particles,
            renderer,
        }
    }

    /// One-time setup once a device exists: builds the quad, compiles the
    /// program, uploads the buffers and scatters the stars.
    ///
    /// Shader and buffer failures are logged and leave the matching flag
    /// false; the widget still runs and draws clear-only frames.
    pub fn initialize(&mut self, backend: &mut B) {
        if self.phase != Phase::Uninitialized {
            log::warn!("starfield already initialized; ignoring");
            return;
        }

        self.mesh = Some(build_mesh(self.config.quad_scale));
        self.rebuild_shaders(backend);
        self.upload_buffers(backend);
        self.particles.initialize();
        self.phase = Phase::Running;

        log::info!(
            "starfield running: {} stars, shader_ok={}, vbo_ok={}",
            self.particles.len(),
            self.shader_ok(),
            self.vbo_ok()
        );
    }

    /// Releases the current program and builds it again from the configured
    /// assets. Returns whether the new program is usable.
    pub fn rebuild_shaders(&mut self, backend: &mut B) -> bool {
        self.shader.destroy();
        let result = self.load_shaders().and_then(|(vs, fs)| self.shader.rebuild(backend, &vs, &fs));
        match result {
            Ok(()) => log::debug!(
                "shader program built from {} + {}",
                self.config.vertex_shader,
                self.config.fragment_shader
            ),
            Err(err) => log::error!("{}", describe(err)),
        }
        self.shader_ok()
    }

    /// Releases the current buffers and uploads the mesh again. Returns whether
    /// the new buffers are usable.
    pub fn upload_buffers(&mut self, backend: &mut B) -> bool {
        if let Err(err) = self.buffers.upload(backend, self.mesh.as_ref()) {
            log::error!("{}", describe(err));
        }
        self.vbo_ok()
    }

    /// Rebuilds the mesh, program and buffers in place. Star positions are kept.
    pub fn rebuild(&mut self, backend: &mut B) {
        if self.phase != Phase::Running {
            log::debug!("rebuild ignored in phase {:?}", self.phase);
            return;
        }
        log::info!("rebuilding starfield device objects");
        self.mesh = Some(build_mesh(self.config.quad_scale));
        self.rebuild_shaders(backend);
        self.upload_buffers(backend);
    }

    /// Points the program at new assets. Takes effect on the next rebuild.
    pub fn set_shader_assets(&mut self, vertex: ShaderAsset, fragment: ShaderAsset) {
        self.config.vertex_shader = vertex;
        self.config.fragment_shader = fragment;
    }

    /// Maps the viewport to the full drawable.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.renderer.set_viewport(width, height);
    }

    /// Advances the field by `elapsed`. Returns how many stars respawned, or
    /// zero when not running.
    pub fn tick(&mut self, elapsed: Duration) -> usize {
        if self.phase != Phase::Running {
            return 0;
        }
        self.particles.tick(elapsed)
    }

    /// Records the frame for the current state.
    pub fn frame(&self) -> Frame<'_, B> {
        let stars = match self.phase {
            Phase::Running => self.particles.positions(),
            _ => &[],
        };
        self.renderer.record(&self.shader, &self.buffers, stars)
    }

    /// Records the frame and submits it to `target`.
    pub fn draw(&self, backend: &mut B, target: &mut B::Target<'_>) {
        let frame = self.frame();
        backend.submit(target, &frame);
    }

    /// Releases the program and buffers. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.phase == Phase::TornDown {
            return;
        }
        self.shader.destroy();
        self.buffers.destroy();
        self.phase = Phase::TornDown;
        log::debug!("starfield torn down");
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn shader_ok(&self) -> bool {
        self.shader.is_valid()
    }

    pub fn vbo_ok(&self) -> bool {
        self.buffers.is_valid()
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    pub fn particles(&self) -> &ParticleField<R> {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut ParticleField<R> {
        &mut self.particles
    }

    fn load_shaders(&self) -> Result<(LoadedShader, LoadedShader), ShaderError> {
        let vs = self.config.vertex_shader.load(StageKind::Vertex)?;
        let fs = self.config.fragment_shader.load(StageKind::Fragment)?;
        Ok((vs, fs))
    }
}
