//! Shader program: per-stage compilation, interface linking and the owning
//! pipeline state.
//!
//! Stages are WGSL validated on the CPU with `naga` before any device object
//! is created, so a broken asset is reported with a readable diagnostic and
//! never reaches the GPU.

mod compile;
mod link;
mod pipeline;

pub use compile::{compile_stage, CompiledStage};
pub use link::{link, ProgramLayout, POSITION_ATTRIBUTE, TRANSLATION_UNIFORM};
pub use pipeline::ShaderPipeline;
