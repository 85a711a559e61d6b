//! A tomato sphere dotted with black discs.
//!
//! The discs sit on the 42 vertices of a once-subdivided icosahedron, each
//! scaled to 0.15 and turned to face the origin so it lies flat on the
//! sphere. They are separate instances and do not follow the sphere's spin.

use cgmath::Vector3;

use crate::{
    context::InitContext,
    data_structures::{
        colour::Colour,
        geometry::Geometry,
        instance::{Instance, Spin},
        model::Model,
        scene_graph::{MeshNode, SceneNode},
    },
    pipelines::material::{FragmentProgram, MaterialOptions, ShaderMaterial},
    sketches::{SPIN_SPEED, sketch_sphere},
};

pub const DISC_SCALE: f32 = 0.15;

/// One disc per icosahedron vertex, facing the origin.
pub fn disc_instances() -> Vec<Instance> {
    Geometry::icosahedron(1.0, 1)
        .unique_positions()
        .into_iter()
        .map(|point| {
            Instance::from(point)
                .with_uniform_scale(DISC_SCALE)
                .looking_at(Vector3::new(0.0, 0.0, 0.0))
        })
        .collect()
}

pub fn nodes(ctx: &InitContext) -> anyhow::Result<Vec<Box<dyn SceneNode>>> {
    let sphere_material = ShaderMaterial::new(
        ctx,
        "sphere",
        FragmentProgram::FlatTint {
            colour: Colour::TOMATO,
        },
        MaterialOptions::default(),
    )?;
    let sphere = Model::new(&ctx.device, "sphere", &sketch_sphere(), vec![sphere_material])?;

    let disc_material = ShaderMaterial::new(
        ctx,
        "disc",
        FragmentProgram::FlatTint {
            colour: Colour::BLACK,
        },
        MaterialOptions::double_sided(),
    )?;
    let disc = Model::new(
        &ctx.device,
        "disc",
        &Geometry::circle(1.0, 32),
        vec![disc_material],
    )?;

    let nodes: Vec<Box<dyn SceneNode>> = vec![
        Box::new(MeshNode::single(&ctx.device, sphere).with_spin(Spin::about_y(SPIN_SPEED))),
        Box::new(MeshNode::new(&ctx.device, disc, disc_instances())),
    ];
    Ok(nodes)
}
