use crate::{
    data_structures::{helpers::LineVertex, model::Vertex},
    pipelines::{
        basic::{PrimitiveSetup, mk_pipeline_layout, mk_render_pipeline},
        shader::ShaderComposer,
    },
};

/// Vertex coloured line list, depth tested against the scene.
pub fn mk_lines_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
) -> anyhow::Result<wgpu::RenderPipeline> {
    let layout = mk_pipeline_layout(device, "Lines Pipeline Layout", &[camera_bind_group_layout]);
    let shader = ShaderComposer::new().descriptor("Lines Shader", include_str!("lines.wgsl"))?;
    Ok(mk_render_pipeline(
        device,
        "Lines Render Pipeline",
        &layout,
        format,
        PrimitiveSetup::LINES,
        &[LineVertex::desc()],
        shader,
    ))
}
