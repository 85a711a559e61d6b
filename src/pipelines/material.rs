//! Shader materials: one fragment program plus its uniforms and pipeline.
//!
//! Every program shares the vertex stage in `sketch_vertex.wgsl`, the camera
//! at bind group 0 and a [`MaterialUniform`] at group 1, binding 0. Programs
//! that need more (a texture, the point cloud) add bindings after it.

use std::mem::offset_of;

use anyhow::ensure;
use cgmath::Vector3;
use wgpu::util::DeviceExt;

use crate::{
    context::InitContext,
    data_structures::{
        colour::Colour,
        instance::InstanceRaw,
        model::{SketchVertex, Vertex},
        texture::{self, Texture},
    },
    pipelines::{
        basic::{PrimitiveSetup, mk_pipeline_layout, mk_render_pipeline},
        shader::ShaderComposer,
    },
    shading::TileParams,
};

/// Which faces a material draws.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Side {
    #[default]
    Front,
    Double,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MaterialOptions {
    pub side: Side,
}

impl MaterialOptions {
    pub fn double_sided() -> Self {
        Self { side: Side::Double }
    }
}

pub enum FragmentProgram {
    /// Solid colour.
    FlatTint { colour: Colour },
    /// Animated per-cell discs over the UV grid.
    TiledNoise { colour: Colour, tiles: TileParams },
    /// Sample one texture at the interpolated UV.
    TextureLookup { texture: Texture },
    /// Discs around a set of object space points plus a Fresnel rim.
    PointCloud {
        colour: Colour,
        points: Vec<Vector3<f32>>,
        radius: f32,
        rim_strength: f32,
    },
}

impl FragmentProgram {
    pub fn name(&self) -> &'static str {
        match self {
            FragmentProgram::FlatTint { .. } => "flat_tint",
            FragmentProgram::TiledNoise { .. } => "tiled_noise",
            FragmentProgram::TextureLookup { .. } => "texture_lookup",
            FragmentProgram::PointCloud { .. } => "point_cloud_rim",
        }
    }

    fn source(&self) -> &'static str {
        match self {
            FragmentProgram::FlatTint { .. } => include_str!("flat_tint.wgsl"),
            FragmentProgram::TiledNoise { .. } => include_str!("tiled_noise.wgsl"),
            FragmentProgram::TextureLookup { .. } => include_str!("texture_lookup.wgsl"),
            FragmentProgram::PointCloud { .. } => include_str!("point_cloud_rim.wgsl"),
        }
    }

    /// The composer for this program, with its build-time constants defined.
    pub fn composer(&self) -> ShaderComposer {
        match self {
            FragmentProgram::PointCloud { points, .. } => {
                ShaderComposer::new().define("POINT_COUNT", points.len())
            }
            _ => ShaderComposer::new(),
        }
    }

    /// Full WGSL of the program.
    pub fn compose(&self) -> anyhow::Result<String> {
        self.composer().compose(self.source())
    }

    pub fn uniform(&self) -> MaterialUniform {
        let mut uniform = MaterialUniform::default();
        match self {
            FragmentProgram::FlatTint { colour } => uniform.colour = colour.to_vec4(),
            FragmentProgram::TiledNoise { colour, tiles } => {
                uniform.colour = colour.to_vec4();
                uniform.radius = tiles.radius;
                uniform.jitter = tiles.jitter;
                uniform.tiles = tiles.tiles;
                uniform.aspect_x = tiles.aspect_x;
            }
            FragmentProgram::TextureLookup { .. } => (),
            FragmentProgram::PointCloud {
                colour,
                radius,
                rim_strength,
                ..
            } => {
                uniform.colour = colour.to_vec4();
                uniform.radius = *radius;
                uniform.rim_strength = *rim_strength;
            }
        }
        uniform
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub colour: [f32; 4],
    pub time: f32,
    pub radius: f32,
    pub rim_strength: f32,
    pub jitter: f32,
    pub tiles: f32,
    pub aspect_x: f32,
    // Uniform structs are padded to 16 bytes.
    pub _padding: [f32; 2],
}

impl Default for MaterialUniform {
    fn default() -> Self {
        Self {
            colour: Colour::WHITE.to_vec4(),
            time: 0.0,
            radius: 0.0,
            rim_strength: 0.0,
            jitter: 0.0,
            tiles: 1.0,
            aspect_x: 1.0,
            _padding: [0.0; 2],
        }
    }
}

/// Points as `vec4` array elements (uniform arrays have a 16 byte stride).
pub fn point_uniforms(points: &[Vector3<f32>]) -> Vec<[f32; 4]> {
    points.iter().map(|p| [p.x, p.y, p.z, 1.0]).collect()
}

pub struct ShaderMaterial {
    pub name: String,
    pub pipeline: wgpu::RenderPipeline,
    pub bind_group: wgpu::BindGroup,
    pub uniform: MaterialUniform,
    pub point_count: Option<usize>,
    buffer: wgpu::Buffer,
}

impl std::fmt::Debug for ShaderMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderMaterial")
            .field("name", &self.name)
            .field("uniform", &self.uniform)
            .field("point_count", &self.point_count)
            .finish()
    }
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_entries() -> [wgpu::BindGroupLayoutEntry; 2] {
    [
        wgpu::BindGroupLayoutEntry {
            binding: 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
            },
            count: None,
        },
        wgpu::BindGroupLayoutEntry {
            binding: 2,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        },
    ]
}

impl ShaderMaterial {
    pub fn new(
        ctx: &InitContext,
        name: &str,
        program: FragmentProgram,
        options: MaterialOptions,
    ) -> anyhow::Result<Self> {
        let device = &ctx.device;
        let uniform = program.uniform();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Material Buffer")),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let shared = uniform_entry(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT);

        let mut point_count = None;
        let (layout, bind_group) = match &program {
            FragmentProgram::FlatTint { .. } | FragmentProgram::TiledNoise { .. } => {
                let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("material_bind_group_layout"),
                    entries: &[shared],
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("{name} Material Bind Group")),
                    layout: &layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                });
                (layout, bind_group)
            }
            FragmentProgram::TextureLookup { texture } => {
                let [texture_entry, sampler_entry] = texture_entries();
                let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("texture_material_bind_group_layout"),
                    entries: &[shared, texture_entry, sampler_entry],
                });
                let fallback;
                let sampler = match &texture.sampler {
                    Some(sampler) => sampler,
                    None => {
                        fallback = texture::create_default_sampler(device);
                        &fallback
                    }
                };
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("{name} Material Bind Group")),
                    layout: &layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: buffer.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::TextureView(&texture.view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: wgpu::BindingResource::Sampler(sampler),
                        },
                    ],
                });
                (layout, bind_group)
            }
            FragmentProgram::PointCloud { points, .. } => {
                ensure!(!points.is_empty(), "{name}: point cloud needs at least one point");
                let max_points = device.limits().max_uniform_buffer_binding_size as usize
                    / std::mem::size_of::<[f32; 4]>();
                ensure!(
                    points.len() <= max_points,
                    "{name}: {} points exceed the uniform limit of {max_points}",
                    points.len()
                );
                point_count = Some(points.len());
                let points_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{name} Points Buffer")),
                    contents: bytemuck::cast_slice(&point_uniforms(points)),
                    usage: wgpu::BufferUsages::UNIFORM,
                });
                let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("point_cloud_bind_group_layout"),
                    entries: &[shared, uniform_entry(1, wgpu::ShaderStages::FRAGMENT)],
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("{name} Material Bind Group")),
                    layout: &layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: buffer.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: points_buffer.as_entire_binding(),
                        },
                    ],
                });
                (layout, bind_group)
            }
        };

        let shader_label = format!("{name} {}", program.name());
        let shader = program.composer().descriptor(&shader_label, program.source())?;
        let pipeline_layout = mk_pipeline_layout(
            device,
            &format!("{name} Pipeline Layout"),
            &[&ctx.camera_bind_group_layout, &layout],
        );
        let primitive = match options.side {
            Side::Front => PrimitiveSetup::TRIANGLES,
            Side::Double => PrimitiveSetup::DOUBLE_SIDED,
        };
        let pipeline = mk_render_pipeline(
            device,
            &format!("{name} Render Pipeline"),
            &pipeline_layout,
            ctx.format,
            primitive,
            &[SketchVertex::desc(), InstanceRaw::desc()],
            shader,
        );
        log::info!("built material {name} ({}, {:?})", program.name(), options.side);

        Ok(Self {
            name: name.to_string(),
            pipeline,
            bind_group,
            uniform,
            point_count,
            buffer,
        })
    }

    /// Update the `time` uniform, leaving the rest of the block untouched.
    pub fn set_time(&self, queue: &wgpu::Queue, time: f32) {
        queue.write_buffer(
            &self.buffer,
            offset_of!(MaterialUniform, time) as wgpu::BufferAddress,
            bytemuck::bytes_of(&time),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cloud(n: usize) -> FragmentProgram {
        FragmentProgram::PointCloud {
            colour: Colour::TOMATO,
            points: (0..n).map(|i| Vector3::new(i as f32, 0.0, 0.0)).collect(),
            radius: 0.15,
            rim_strength: 0.25,
        }
    }

    #[test]
    fn uniform_matches_wgsl_layout() {
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 48);
        assert_eq!(offset_of!(MaterialUniform, time), 16);
    }

    #[test]
    fn point_count_follows_points() {
        for n in [1, 12, 42] {
            let wgsl = cloud(n).compose().unwrap();
            assert!(wgsl.contains(&format!("array<vec4<f32>, {n}>")));
            assert!(wgsl.contains(&format!("i < {n}u")));
            assert_eq!(point_uniforms(&vec![Vector3::new(0.0, 0.0, 0.0); n]).len(), n);
        }
    }

    #[test]
    fn tiled_noise_uniform_carries_tile_params() {
        let program = FragmentProgram::TiledNoise {
            colour: Colour::TOMATO,
            tiles: TileParams::default(),
        };
        let uniform = program.uniform();
        assert_eq!(uniform.tiles, 10.0);
        assert_eq!(uniform.aspect_x, 2.0);
        assert_eq!(uniform.radius, 0.25);
        assert_eq!(uniform.jitter, 0.25);
    }
}
