//! Small value types shared by the runtime and renderers.
//!
//! Viewports are expressed in physical pixels with the origin at the top-left,
//! matching what the surface and the rasterizer consume.

mod color;
mod viewport;

pub use color::ColorRgba;
pub use viewport::Viewport;
