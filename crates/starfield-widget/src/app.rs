//! Hosts a [`Starfield`] inside the engine runtime.

use starfield_engine::core::{App, AppControl, FrameCtx, SetupCtx, TickControl};
use starfield_engine::time::{ElapsedTimer, TickTime};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

use crate::backend::WgpuBackend;
use crate::config::StarfieldConfig;
use crate::widget::{Phase, Starfield};

/// Engine application drawing a starfield into its window.
///
/// Keys: `R` rebuilds the program and buffers, `Escape` quits.
pub struct StarfieldApp {
    starfield: Starfield<WgpuBackend>,
    backend: Option<WgpuBackend>,
    elapsed: ElapsedTimer,
}

impl StarfieldApp {
    pub fn new(config: StarfieldConfig) -> Self {
        Self {
            starfield: Starfield::from_config(config),
            backend: None,
            elapsed: ElapsedTimer::new(),
        }
    }

    fn on_key(&mut self, event: &KeyEvent) -> AppControl {
        if event.state != ElementState::Pressed || event.repeat {
            return AppControl::Continue;
        }

        match &event.logical_key {
            Key::Named(NamedKey::Escape) => AppControl::Exit,
            Key::Character(c) if c.eq_ignore_ascii_case("r") => {
                if let Some(backend) = self.backend.as_mut() {
                    self.starfield.rebuild(backend);
                }
                AppControl::Continue
            }
            _ => AppControl::Continue,
        }
    }
}

impl App for StarfieldApp {
    fn on_context_ready(&mut self, ctx: &mut SetupCtx<'_, '_>) -> AppControl {
        let info = ctx.gpu.adapter_info();
        log::info!(
            "adapter: {} ({:?}, {:?}), surface format {:?}",
            info.name,
            info.device_type,
            info.backend,
            ctx.gpu.surface_format()
        );

        let mut backend = WgpuBackend::new(ctx.gpu.device(), ctx.gpu.queue(), ctx.gpu.surface_format());
        self.starfield.initialize(&mut backend);
        self.backend = Some(backend);

        self.elapsed.restart();
        AppControl::Continue
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        log::debug!("resize to {width}x{height}");
        self.starfield.resize(width, height);
    }

    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. } => self.on_key(event),
            _ => AppControl::Continue,
        }
    }

    fn on_tick(&mut self, tick: TickTime) -> TickControl {
        let elapsed = self.elapsed.restart_at(tick.now);
        if self.starfield.phase() != Phase::Running {
            return TickControl::Idle;
        }
        self.starfield.tick(elapsed);
        TickControl::Redraw
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(backend) = self.backend.as_mut() else {
            return AppControl::Continue;
        };
        let starfield = &self.starfield;
        ctx.render(|target| starfield.draw(backend, target))
    }

    fn on_teardown(&mut self) {
        self.starfield.teardown();
        self.backend = None;
    }
}
