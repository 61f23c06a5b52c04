//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop) and
//! the application: lifecycle callbacks, the periodic tick and the per-frame
//! context.

mod app;
mod ctx;

pub use app::{App, AppControl, TickControl};
pub use ctx::{FrameCtx, SetupCtx, WindowCtx};
