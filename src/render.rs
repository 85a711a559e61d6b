//! Render composition.
//!
//! Sketches describe what to draw as a [`Render`]. The driver flattens the
//! tree into batches: helper lines go through the context's line pipeline,
//! instanced models draw each of their groups with that group's material.
//!
//! # Key types
//!
//! - [`Render<'a>`] is the enum describing render operations
//! - [`Instanced<'a>`] is a model plus the buffer holding its instances
//! - [`Flat<'a>`] is a non-indexed line list

use crate::data_structures::model::Model;

/// A model drawn `amount` times from an instance buffer.
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub model: &'a Model,
    pub amount: usize,
}

/// Line list vertices (`LineVertex`) drawn without an index buffer.
pub struct Flat<'a> {
    pub vertex: &'a wgpu::Buffer,
    pub amount: usize,
}

/// Specifies how a scene object should be rendered.
///
/// - `None` renders nothing
/// - `Default(Instanced)` renders one instanced model
/// - `Lines(Flat)` renders helper lines
/// - `Composed(Vec<Render>)` recursively renders multiple renders
pub enum Render<'a> {
    None,
    Default(Instanced<'a>),
    Lines(Flat<'a>),
    Composed(Vec<Render<'a>>),
}

impl<'a> Render<'a> {
    pub(crate) fn set_pipelines(self, basics: &mut Vec<Instanced<'a>>, lines: &mut Vec<Flat<'a>>) {
        match self {
            Render::Default(instanced) => basics.push(instanced),
            Render::Lines(flat) => lines.push(flat),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(basics, lines)),
            Render::None => (),
        }
    }
}
