//! Discs around a point cloud plus a Fresnel rim.
//!
//! The sphere's fragments turn white within 0.15 of any icosahedron vertex.
//! A view dependent rim term brightens the silhouette.

use cgmath::Vector3;

use crate::{
    context::InitContext,
    data_structures::{
        colour::Colour,
        geometry::Geometry,
        instance::Spin,
        model::Model,
        scene_graph::{MeshNode, SceneNode},
    },
    pipelines::material::{FragmentProgram, MaterialOptions, ShaderMaterial},
    sketches::{SPIN_SPEED, sketch_sphere},
};

pub const DISC_RADIUS: f32 = 0.15;
pub const RIM_STRENGTH: f32 = 0.25;

/// The 42 vertices the discs are centred on.
pub fn points() -> Vec<Vector3<f32>> {
    Geometry::icosahedron(1.0, 1).unique_positions()
}

pub fn nodes(ctx: &InitContext) -> anyhow::Result<Vec<Box<dyn SceneNode>>> {
    let material = ShaderMaterial::new(
        ctx,
        "rim",
        FragmentProgram::PointCloud {
            colour: Colour::TOMATO,
            points: points(),
            radius: DISC_RADIUS,
            rim_strength: RIM_STRENGTH,
        },
        MaterialOptions::default(),
    )?;
    let sphere = Model::new(&ctx.device, "sphere", &sketch_sphere(), vec![material])?;
    let nodes: Vec<Box<dyn SceneNode>> = vec![Box::new(
        MeshNode::single(&ctx.device, sphere).with_spin(Spin::about_y(SPIN_SPEED)),
    )];
    Ok(nodes)
}
