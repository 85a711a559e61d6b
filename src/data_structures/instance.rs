//! Instance transforms for GPU rendering.
//!
//! Every drawn mesh is instanced: one [`Instance`] per copy, packed into a
//! vertex buffer with step mode `Instance`. A sketch with a single sphere has
//! one instance, the icosahedron discs are forty-two instances of one circle.

use cgmath::{InnerSpace, Matrix3, One, Rad, Rotation3, Vector3};

use crate::data_structures::model;

/// Per-instance transformation: position, rotation (as quaternion), and scale.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub position: cgmath::Vector3<f32>,
    pub rotation: cgmath::Quaternion<f32>,
    pub scale: cgmath::Vector3<f32>,
}

impl Instance {
    /// Identity transformation.
    pub fn new() -> Self {
        Self {
            position: cgmath::Vector3::new(0.0, 0.0, 0.0),
            rotation: cgmath::Quaternion::one(),
            scale: cgmath::Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = cgmath::Vector3::new(scale, scale, scale);
        self
    }

    /// Turns the object so its local +Z axis points at `target`.
    ///
    /// Flat primitives face +Z, so a disc placed on a sphere and looking at
    /// the centre lies tangent to the surface.
    pub fn looking_at(mut self, target: cgmath::Vector3<f32>) -> Self {
        let up = Vector3::unit_y();
        let mut z = target - self.position;
        if z.magnitude2() == 0.0 {
            z = Vector3::unit_z();
        }
        z = z.normalize();
        let mut x = up.cross(z);
        if x.magnitude2() == 0.0 {
            // `up` and the view direction are parallel; nudge off the axis.
            if up.z.abs() == 1.0 {
                z.x += 0.0001;
            } else {
                z.z += 0.0001;
            }
            z = z.normalize();
            x = up.cross(z);
        }
        let x = x.normalize();
        let y = z.cross(x);
        self.rotation = Matrix3::from_cols(x, y, z).into();
        self
    }

    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.position)
            * cgmath::Matrix4::from(self.rotation)
            * cgmath::Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn to_raw(&self) -> InstanceRaw {
        InstanceRaw {
            model: self.to_matrix().into(),
            normal: cgmath::Matrix3::from(self.rotation).into(),
        }
    }
}

impl From<cgmath::Vector3<f32>> for Instance {
    fn from(position: cgmath::Vector3<f32>) -> Self {
        Instance {
            position,
            ..Default::default()
        }
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

/// Rotation about a fixed axis derived from elapsed time.
///
/// The angle is `time * radians_per_second`, never accumulated from frame
/// deltas, so the same time always yields the same orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spin {
    pub axis: cgmath::Vector3<f32>,
    pub radians_per_second: f32,
}

impl Spin {
    pub fn about_y(radians_per_second: f32) -> Self {
        Self {
            axis: Vector3::unit_y(),
            radians_per_second,
        }
    }

    pub fn rotation_at(&self, time: f32) -> cgmath::Quaternion<f32> {
        cgmath::Quaternion::from_axis_angle(self.axis.normalize(), Rad(time * self.radians_per_second))
    }

    /// `base` with its rotation replaced by the spin at `time`.
    pub fn apply(&self, base: &Instance, time: f32) -> Instance {
        Instance {
            rotation: self.rotation_at(time),
            ..base.clone()
        }
    }
}

/// The instance data as stored on the GPU.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 3]; 3],
}

/// Locations 5..=11: the model matrix as four vec4 columns followed by the
/// rotation-only normal matrix as three vec3 columns.
impl model::Vertex for InstanceRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            // Advance once per instance rather than per vertex.
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 9,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 19]>() as wgpu::BufferAddress,
                    shader_location: 10,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 22]>() as wgpu::BufferAddress,
                    shader_location: 11,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Deg, Vector4};

    use super::*;

    #[test]
    fn identity_matrix() {
        let m = Instance::new().to_matrix();
        assert_eq!(m, cgmath::Matrix4::one());
    }

    #[test]
    fn spin_depends_only_on_time() {
        let spin = Spin::about_y(0.15);
        let base = Instance::new();
        let first = spin.apply(&base, 12.5).to_raw();
        // Rendering other frames in between must not change the result.
        let _ = spin.apply(&base, 3.0);
        let again = spin.apply(&base, 12.5).to_raw();
        assert_eq!(first, again);
    }

    #[test]
    fn spin_at_zero_is_identity() {
        let q = Spin::about_y(0.15).rotation_at(0.0);
        assert_eq!(q, cgmath::Quaternion::one());
    }

    #[test]
    fn spin_rate() {
        let q = Spin::about_y(1.0).rotation_at(std::f32::consts::FRAC_PI_2);
        let expected = cgmath::Quaternion::from_angle_y(Deg(90.0));
        assert!((q.s - expected.s).abs() < 1e-6 && (q.v - expected.v).magnitude() < 1e-6);
    }

    #[test]
    fn looking_at_origin_turns_z_inward() {
        let instance = Instance::from(Vector3::new(0.3, 0.5, -0.8)).looking_at(Vector3::new(0.0, 0.0, 0.0));
        let z = instance.to_matrix() * Vector4::new(0.0, 0.0, 1.0, 0.0);
        let expected = -Vector3::new(0.3, 0.5, -0.8).normalize();
        assert!((z.truncate() - expected).magnitude() < 1e-5);
    }

    #[test]
    fn looking_at_along_up_axis_stays_finite() {
        let instance = Instance::from(Vector3::new(0.0, 1.0, 0.0)).looking_at(Vector3::new(0.0, 0.0, 0.0));
        let m = instance.to_matrix();
        assert!(m.x.x.is_finite() && m.z.y < -0.99);
    }
}
