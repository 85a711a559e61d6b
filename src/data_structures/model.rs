//! GPU meshes and the materials they are drawn with.
//!
//! A [`Model`] is one uploaded [`Geometry`] plus one [`ShaderMaterial`] per
//! material slot. Drawing walks the geometry's groups and issues one indexed,
//! instanced draw per group with that group's material bound.

use std::ops::Range;

use wgpu::util::DeviceExt;

use crate::{
    data_structures::geometry::{Geometry, Group},
    pipelines::material::ShaderMaterial,
};

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SketchVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex for SketchVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<SketchVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Interleave the attribute arrays of a geometry.
pub fn interleave(geometry: &Geometry) -> Vec<SketchVertex> {
    geometry
        .positions
        .iter()
        .zip(geometry.uvs.iter())
        .zip(geometry.normals.iter())
        .map(|((position, uv), normal)| SketchVertex {
            position: *position,
            tex_coords: *uv,
            normal: *normal,
        })
        .collect()
}

#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
    pub groups: Vec<Group>,
}

impl Mesh {
    pub fn from_geometry(device: &wgpu::Device, name: &str, geometry: &Geometry) -> Self {
        let vertices = interleave(geometry);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", name)),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", name)),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            num_elements: geometry.indices.len() as u32,
            groups: geometry.groups_or_default(),
        }
    }
}

pub struct Model {
    pub mesh: Mesh,
    pub materials: Vec<ShaderMaterial>,
}

impl Model {
    /// Upload `geometry` after checking it against the material count.
    pub fn new(
        device: &wgpu::Device,
        name: &str,
        geometry: &Geometry,
        materials: Vec<ShaderMaterial>,
    ) -> anyhow::Result<Self> {
        geometry
            .validate(materials.len())
            .map_err(|e| e.context(format!("invalid geometry for {name}")))?;
        let mesh = Mesh::from_geometry(device, name, geometry);
        log::debug!(
            "uploaded {name}: {} indices in {} group(s)",
            mesh.num_elements,
            mesh.groups.len()
        );
        Ok(Self { mesh, materials })
    }

    /// Push elapsed time to every material of the model.
    pub fn set_time(&self, queue: &wgpu::Queue, time: f32) {
        self.materials
            .iter()
            .for_each(|material| material.set_time(queue, time));
    }
}

pub trait DrawModel {
    fn draw_mesh_instanced(
        &mut self,
        mesh: &Mesh,
        materials: &[ShaderMaterial],
        instances: Range<u32>,
        camera_bind_group: &wgpu::BindGroup,
    );

    fn draw_model_instanced(
        &mut self,
        model: &Model,
        instances: Range<u32>,
        camera_bind_group: &wgpu::BindGroup,
    );
}

impl DrawModel for wgpu::RenderPass<'_> {
    fn draw_mesh_instanced(
        &mut self,
        mesh: &Mesh,
        materials: &[ShaderMaterial],
        instances: Range<u32>,
        camera_bind_group: &wgpu::BindGroup,
    ) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        for group in &mesh.groups {
            let Some(material) = materials.get(group.material_index) else {
                log::warn!(
                    "{}: group {:?} has no material {}",
                    mesh.name,
                    group.range(),
                    group.material_index
                );
                continue;
            };
            self.set_pipeline(&material.pipeline);
            self.set_bind_group(0, camera_bind_group, &[]);
            self.set_bind_group(1, &material.bind_group, &[]);
            self.draw_indexed(group.range(), 0, instances.clone());
        }
    }

    fn draw_model_instanced(
        &mut self,
        model: &Model,
        instances: Range<u32>,
        camera_bind_group: &wgpu::BindGroup,
    ) {
        self.draw_mesh_instanced(&model.mesh, &model.materials, instances, camera_bind_group);
    }
}
