//! A spinning sphere covered in noise-jittered discs.
//!
//! UV space is cut into 20x10 cells (U is stretched by two). Each cell draws
//! a white disc whose radius is nudged by 3D simplex noise of the cell
//! coordinate and time.

use crate::{
    context::InitContext,
    data_structures::{
        colour::Colour,
        instance::Spin,
        model::Model,
        scene_graph::{MeshNode, SceneNode},
    },
    pipelines::material::{FragmentProgram, MaterialOptions, ShaderMaterial},
    shading::TileParams,
    sketches::{SPIN_SPEED, sketch_sphere},
};

pub fn nodes(ctx: &InitContext) -> anyhow::Result<Vec<Box<dyn SceneNode>>> {
    let material = ShaderMaterial::new(
        ctx,
        "noise",
        FragmentProgram::TiledNoise {
            colour: Colour::TOMATO,
            tiles: TileParams::default(),
        },
        MaterialOptions::default(),
    )?;
    let sphere = Model::new(&ctx.device, "sphere", &sketch_sphere(), vec![material])?;
    let nodes: Vec<Box<dyn SceneNode>> = vec![Box::new(
        MeshNode::single(&ctx.device, sphere).with_spin(Spin::about_y(SPIN_SPEED)),
    )];
    Ok(nodes)
}
