//! Two quads stitched into one buffer, each drawn with its own texture.
//!
//! Twelve unindexed vertices make four triangles. The first six form the
//! left quad, the last six the right one; two draw groups map them to a
//! normal-map and a diffuse brick texture.

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
    resources::load_texture_or_placeholder,
    sketches::SPIN_SPEED,
};

#[rustfmt::skip]
const POSITIONS: [f32; 36] = [
    -1.0, -1.0, 0.0,
     0.0,  1.0, 0.0,
    -1.0,  1.0, 0.0,

    -1.0, -1.0, 0.0,
     0.0, -1.0, 0.0,
     0.0,  1.0, 0.0,

     0.0, -1.0, 0.0,
     1.0,  1.0, 0.0,
     0.0,  1.0, 0.0,

     0.0, -1.0, 0.0,
     1.0, -1.0, 0.0,
     1.0,  1.0, 0.0,
];

/// Per quad UVs, repeated for both quads.
const QUAD_UVS: [f32; 12] = [0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0];

/// One texture per group, in group order.
pub const TEXTURES: [&str; 2] = ["brick-normal.png", "brick-diffuse.png"];

/// The stitched geometry with one group per quad.
pub fn stitched_quads() -> anyhow::Result<Geometry> {
    let uvs: Vec<f32> = QUAD_UVS.iter().chain(QUAD_UVS.iter()).copied().collect();
    let mut geometry = Geometry::from_buffers(&POSITIONS, &uvs)?;
    let per_quad = (QUAD_UVS.len() / 2) as u32;
    geometry.add_group(0, per_quad, 0);
    geometry.add_group(per_quad, per_quad, 1);
    Ok(geometry)
}

pub async fn nodes(ctx: &InitContext) -> anyhow::Result<Vec<Box<dyn SceneNode>>> {
    let fallbacks = [Colour::rgb(0.5, 0.5, 1.0), Colour::TOMATO];
    let textures = futures::future::join_all(
        TEXTURES
            .into_iter()
            .zip(fallbacks)
            .map(|(file_name, fallback)| {
                load_texture_or_placeholder(file_name, fallback, &ctx.device, &ctx.queue)
            }),
    )
    .await;
    let materials = TEXTURES
        .into_iter()
        .zip(textures)
        .map(|(file_name, texture)| {
            ShaderMaterial::new(
                ctx,
                file_name,
                FragmentProgram::TextureLookup { texture },
                MaterialOptions::double_sided(),
            )
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let quads = Model::new(&ctx.device, "stitched quads", &stitched_quads()?, materials)?;
    let nodes: Vec<Box<dyn SceneNode>> = vec![Box::new(
        MeshNode::single(&ctx.device, quads).with_spin(Spin::about_y(SPIN_SPEED)),
    )];
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_cover_both_quads() {
        let geometry = stitched_quads().unwrap();
        assert_eq!(geometry.positions.len(), 12);
        assert_eq!(geometry.uvs.len(), 12);
        let groups = geometry.groups_or_default();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].range(), 0..6);
        assert_eq!(groups[1].range(), 6..12);
        assert_eq!(groups[1].material_index, 1);
        geometry.validate(TEXTURES.len()).unwrap();
    }

    #[test]
    fn missing_second_material_is_rejected() {
        assert!(stitched_quads().unwrap().validate(1).is_err());
    }
}
