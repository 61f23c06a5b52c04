//! Renderer-facing handles.
//!
//! Renderers own their GPU resources and record into the per-frame
//! `RenderTarget` handed out by `core::FrameCtx::render`.

mod target;

pub use target::RenderTarget;
