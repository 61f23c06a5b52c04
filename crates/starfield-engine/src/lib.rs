//! Starfield engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the widget layer:
//! window and event loop, device/surface management, the tick timer and logging.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
