//! Render pipelines and their WGSL.
//!
//! - `basic` builds pipelines from a layout, a shader and primitive settings
//! - `shader` composes WGSL from chunks and build-time constants
//! - `material` pairs a fragment program with its uniforms and pipeline
//! - `lines` draws the grid and axes helpers

pub mod basic;
pub mod lines;
pub mod material;
pub mod shader;
