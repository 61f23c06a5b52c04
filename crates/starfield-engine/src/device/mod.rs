//! GPU device and swapchain.
//!
//! `Gpu` owns the wgpu instance, adapter, device and queue plus the window's
//! surface. It hands out one frame at a time and maps surface failures to a
//! recovery action.

mod context;
mod init;
mod surface;

pub use context::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
