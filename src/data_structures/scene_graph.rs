//! Scene nodes: the objects a sketch owns and hands to the renderer.
//!
//! A [`MeshNode`] is a model with its instances, optionally spinning with
//! elapsed time. A [`LineNode`] holds helper lines. Both keep CPU state and
//! upload it in `write_to_buffers`, so `on_update` stays the only place a
//! sketch touches the queue.

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        colour::Colour,
        helpers::{LineVertex, axes_lines, grid_lines},
        instance::{Instance, InstanceRaw, Spin},
        model::Model,
    },
    render::{Flat, Instanced, Render},
};

pub trait SceneNode {
    /// Advance time dependent state to `time` seconds.
    fn set_time(&mut self, time: f32);

    fn write_to_buffers(&mut self, queue: &wgpu::Queue, device: &wgpu::Device);

    fn get_render(&self) -> Render<'_>;
}

pub struct MeshNode {
    model: Model,
    instances: Vec<Instance>,
    instance_buffer: wgpu::Buffer,
    spin: Option<Spin>,
    time: f32,
}

impl MeshNode {
    pub fn new(device: &wgpu::Device, model: Model, instances: Vec<Instance>) -> Self {
        let raw: Vec<InstanceRaw> = instances.iter().map(Instance::to_raw).collect();
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Instance Buffer", model.mesh.name)),
            contents: bytemuck::cast_slice(&raw),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            model,
            instances,
            instance_buffer,
            spin: None,
            time: 0.0,
        }
    }

    /// A node drawing `model` once at the origin.
    pub fn single(device: &wgpu::Device, model: Model) -> Self {
        Self::new(device, model, vec![Instance::new()])
    }

    pub fn with_spin(mut self, spin: Spin) -> Self {
        self.spin = Some(spin);
        self
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// Transforms as drawn at the current time.
    pub fn world_transforms(&self) -> Vec<Instance> {
        match &self.spin {
            Some(spin) => self
                .instances
                .iter()
                .map(|instance| spin.apply(instance, self.time))
                .collect(),
            None => self.instances.clone(),
        }
    }
}

impl SceneNode for MeshNode {
    fn set_time(&mut self, time: f32) {
        self.time = time;
    }

    fn write_to_buffers(&mut self, queue: &wgpu::Queue, _device: &wgpu::Device) {
        self.model.set_time(queue, self.time);
        let raw_instances: Vec<InstanceRaw> = self
            .world_transforms()
            .iter()
            .map(Instance::to_raw)
            .collect();
        // Instance count is fixed at construction.
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&raw_instances));
    }

    fn get_render(&self) -> Render<'_> {
        Render::Default(Instanced {
            instance: &self.instance_buffer,
            model: &self.model,
            amount: self.instances.len(),
        })
    }
}

pub struct LineNode {
    vertex_buffer: wgpu::Buffer,
    vertex_count: usize,
    pub visible: bool,
}

impl LineNode {
    pub fn new(device: &wgpu::Device, label: &str, vertices: &[LineVertex]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Line Buffer")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            vertex_buffer,
            vertex_count: vertices.len(),
            visible: true,
        }
    }

    pub fn grid(device: &wgpu::Device, size: f32, divisions: u32, centre: Colour, grid: Colour) -> Self {
        Self::new(device, "Grid", &grid_lines(size, divisions, centre, grid))
    }

    pub fn axes(device: &wgpu::Device, size: f32) -> Self {
        Self::new(device, "Axes", &axes_lines(size))
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }
}

impl SceneNode for LineNode {
    fn set_time(&mut self, _time: f32) {}

    fn write_to_buffers(&mut self, _queue: &wgpu::Queue, _device: &wgpu::Device) {}

    fn get_render(&self) -> Render<'_> {
        if !self.visible || self.vertex_count == 0 {
            return Render::None;
        }
        Render::Lines(Flat {
            vertex: &self.vertex_buffer,
            amount: self.vertex_count,
        })
    }
}
