//! Perspective camera, orbit controls and the camera uniform.
//!
//! The camera always looks at a target point. [`OrbitController`] collects
//! mouse input between frames and applies it in [`OrbitController::update`]:
//! left-drag orbits around the target, right-drag pans, the wheel dollies.

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};
use wgpu::util::DeviceExt;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Keeps the polar angle off the poles where the view matrix degenerates.
const POLAR_EPSILON: f32 = 0.000_001;

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>, T: Into<Point3<f32>>>(position: P, target: T) -> Self {
        Self {
            position: position.into(),
            target: target.into(),
            up: Vector3::unit_y(),
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn distance(&self) -> f32 {
        (self.position - self.target).magnitude()
    }

    /// Spherical offset from the target: (radius, polar angle from +Y, azimuth).
    fn spherical(&self) -> (f32, f32, f32) {
        let offset = self.position - self.target;
        let radius = offset.magnitude();
        if radius == 0.0 {
            return (0.0, 0.0, 0.0);
        }
        let polar = (offset.y / radius).clamp(-1.0, 1.0).acos();
        let azimuth = offset.x.atan2(offset.z);
        (radius, polar, azimuth)
    }

    fn set_spherical(&mut self, radius: f32, polar: f32, azimuth: f32) {
        self.position = self.target
            + Vector3::new(
                radius * polar.sin() * azimuth.sin(),
                radius * polar.cos(),
                radius * polar.sin() * azimuth.cos(),
            );
    }

    /// Rotate around the target by the given azimuth and polar deltas.
    pub fn orbit(&mut self, azimuth_delta: f32, polar_delta: f32) {
        let (radius, polar, azimuth) = self.spherical();
        let polar = (polar - polar_delta).clamp(POLAR_EPSILON, std::f32::consts::PI - POLAR_EPSILON);
        self.set_spherical(radius, polar, azimuth - azimuth_delta);
    }

    /// Scale the distance to the target, keeping it within `[min, max]`.
    pub fn dolly(&mut self, scale: f32, min: f32, max: f32) {
        let (radius, polar, azimuth) = self.spherical();
        self.set_spherical((radius * scale).clamp(min, max), polar, azimuth);
    }

    /// Move camera and target together in the view plane.
    pub fn pan(&mut self, right: f32, up: f32) {
        let forward = (self.target - self.position).normalize();
        let right_axis = forward.cross(self.up).normalize();
        let up_axis = right_axis.cross(forward);
        let offset = right_axis * right + up_axis * up;
        self.position += offset;
        self.target += offset;
    }
}

#[derive(Clone, Debug)]
pub struct Projection {
    aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width.max(1) as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: cgmath::Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Drag {
    Orbit,
    Pan,
}

/// Mouse driven orbit controls.
#[derive(Debug)]
pub struct OrbitController {
    /// Radians per dragged pixel.
    pub rotate_speed: f32,
    /// Distance factor per wheel notch.
    pub zoom_factor: f32,
    /// Pan distance per pixel, relative to the distance to the target.
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    orbit: (f32, f32),
    pan: (f32, f32),
    zoom: f32,
    drag: Option<Drag>,
    cursor: Option<PhysicalPosition<f64>>,
    enabled: bool,
}

impl OrbitController {
    pub fn new(rotate_speed: f32, zoom_factor: f32) -> Self {
        Self {
            rotate_speed,
            zoom_factor,
            pan_speed: 0.001,
            min_distance: 0.1,
            max_distance: 50.0,
            orbit: (0.0, 0.0),
            pan: (0.0, 0.0),
            zoom: 0.0,
            drag: None,
            cursor: None,
            enabled: true,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Feed a window event; returns whether the controller used it.
    pub fn handle_window_events(&mut self, event: &WindowEvent) -> bool {
        if !self.enabled {
            return false;
        }
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                self.drag = match (button, state) {
                    (MouseButton::Left, ElementState::Pressed) => Some(Drag::Orbit),
                    (MouseButton::Right, ElementState::Pressed) => Some(Drag::Pan),
                    (_, ElementState::Released) => None,
                    _ => self.drag,
                };
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                let previous = self.cursor.replace(*position);
                match (self.drag, previous) {
                    (Some(drag), Some(previous)) => {
                        let dx = position.x - previous.x;
                        let dy = position.y - previous.y;
                        match drag {
                            Drag::Orbit => self.handle_mouse(dx, dy),
                            Drag::Pan => self.handle_pan(dx, dy),
                        }
                        true
                    }
                    _ => false,
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.zoom += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32 / 50.0,
                };
                true
            }
            _ => false,
        }
    }

    /// Queue an orbit by a mouse delta in pixels.
    pub fn handle_mouse(&mut self, dx: f64, dy: f64) {
        if self.enabled {
            self.orbit.0 += dx as f32 * self.rotate_speed;
            self.orbit.1 += dy as f32 * self.rotate_speed;
        }
    }

    fn handle_pan(&mut self, dx: f64, dy: f64) {
        self.pan.0 -= dx as f32;
        self.pan.1 += dy as f32;
    }

    /// Apply all input received since the previous call.
    pub fn update(&mut self, camera: &mut Camera) {
        if !self.enabled {
            return;
        }
        let (azimuth, polar) = std::mem::take(&mut self.orbit);
        if azimuth != 0.0 || polar != 0.0 {
            camera.orbit(azimuth, polar);
        }
        let notches = std::mem::take(&mut self.zoom);
        if notches != 0.0 {
            camera.dolly(self.zoom_factor.powf(notches), self.min_distance, self.max_distance);
        }
        let (right, up) = std::mem::take(&mut self.pan);
        if right != 0.0 || up != 0.0 {
            let scale = camera.distance() * self.pan_speed;
            camera.pan(right * scale, up * scale);
        }
    }

    /// Detach from input; later events and updates are ignored.
    pub fn dispose(&mut self) {
        self.enabled = false;
        self.drag = None;
        self.cursor = None;
        self.orbit = (0.0, 0.0);
        self.pan = (0.0, 0.0);
        self.zoom = 0.0;
    }
}

/// The camera and the GPU objects it is uploaded through.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: OrbitController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(device: &wgpu::Device, camera: Camera, projection: &Projection) -> Self {
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera, projection);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("camera_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        Self {
            camera,
            controller: OrbitController::new(0.005, 0.95),
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Apply pending controller input and upload the camera.
    pub fn update(&mut self, queue: &wgpu::Queue, projection: &Projection) {
        self.controller.update(&mut self.camera);
        self.uniform.update_view_proj(&self.camera, projection);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
