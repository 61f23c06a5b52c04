//! Starfield widget.
//!
//! A field of small quads drifting toward the viewer. The widget owns its
//! mesh, shader program, device buffers and particle field; device work goes
//! through [`backend::GpuBackend`] so everything above it runs without a GPU.

pub mod assets;
pub mod backend;
pub mod buffers;
pub mod config;
pub mod error;
pub mod geometry;
pub mod particles;
pub mod renderer;
pub mod shader;

mod app;
mod widget;

pub use app::StarfieldApp;
pub use config::StarfieldConfig;
pub use error::{BufferError, ShaderError};
pub use widget::{Phase, Starfield};
