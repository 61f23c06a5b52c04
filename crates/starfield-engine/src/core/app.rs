use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::{FrameCtx, SetupCtx};
use crate::time::TickTime;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Result of a timer tick.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TickControl {
    /// State changed; schedule a redraw.
    Redraw,
    /// Nothing to present.
    Idle,
}

/// Application contract implemented by higher layers.
///
/// Call order: `on_context_ready` once, then any interleaving of
/// `on_resize`/`on_window_event`/`on_tick`/`on_frame`, then `on_teardown`
/// while the GPU context is still alive.
pub trait App {
    /// Called once after the window and its GPU context exist.
    fn on_context_ready(&mut self, ctx: &mut SetupCtx<'_, '_>) -> AppControl {
        let _ = ctx;
        AppControl::Continue
    }

    /// Called when the drawable size changes (physical pixels).
    fn on_resize(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }

    /// Called for window events.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called by the periodic timer.
    fn on_tick(&mut self, tick: TickTime) -> TickControl;

    /// Called when the host delivers a redraw.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called before the GPU context is destroyed.
    fn on_teardown(&mut self) {}
}
