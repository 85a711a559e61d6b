//! Reference geometry drawn as coloured line lists: a ground grid and the
//! three coordinate axes.

use crate::data_structures::{colour::Colour, model::Vertex};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub colour: [f32; 3],
}

impl LineVertex {
    fn new(position: [f32; 3], colour: Colour) -> Self {
        Self {
            position,
            colour: colour.to_array(),
        }
    }
}

impl Vertex for LineVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Square grid on the XZ plane, `size` wide with `divisions` cells per side.
///
/// The two lines through the origin get `centre`, all others `grid`. With an
/// odd division count no line crosses the origin and every line is `grid`.
pub fn grid_lines(size: f32, divisions: u32, centre: Colour, grid: Colour) -> Vec<LineVertex> {
    let divisions = divisions.max(1);
    let centre_index = divisions / 2;
    let step = size / divisions as f32;
    let half = size / 2.0;

    let mut vertices = Vec::with_capacity((divisions as usize + 1) * 4);
    for i in 0..=divisions {
        let k = -half + i as f32 * step;
        let colour = if i == centre_index && divisions % 2 == 0 {
            centre
        } else {
            grid
        };
        vertices.push(LineVertex::new([-half, 0.0, k], colour));
        vertices.push(LineVertex::new([half, 0.0, k], colour));
        vertices.push(LineVertex::new([k, 0.0, -half], colour));
        vertices.push(LineVertex::new([k, 0.0, half], colour));
    }
    vertices
}

/// X (red), Y (green) and Z (blue) axes of length `size` from the origin,
/// each fading slightly towards its tip.
pub fn axes_lines(size: f32) -> Vec<LineVertex> {
    let origin = [0.0, 0.0, 0.0];
    vec![
        LineVertex::new(origin, Colour::rgb(1.0, 0.0, 0.0)),
        LineVertex::new([size, 0.0, 0.0], Colour::rgb(1.0, 0.6, 0.0)),
        LineVertex::new(origin, Colour::rgb(0.0, 1.0, 0.0)),
        LineVertex::new([0.0, size, 0.0], Colour::rgb(0.6, 1.0, 0.0)),
        LineVertex::new(origin, Colour::rgb(0.0, 0.0, 1.0)),
        LineVertex::new([0.0, 0.0, size], Colour::rgb(0.0, 0.6, 1.0)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_two_lines_per_division_boundary() {
        let lines = grid_lines(10.0, 10, Colour::BLACK, Colour::WHITE);
        assert_eq!(lines.len(), 11 * 4);
        assert!(lines.iter().all(|v| v.position[1] == 0.0));
        assert!(lines.iter().all(|v| v.position[0].abs() <= 5.0 && v.position[2].abs() <= 5.0));
    }

    #[test]
    fn only_origin_lines_use_centre_colour() {
        let centre = Colour::hsl(0.0, 0.0, 0.5);
        let grid = Colour::hsl(0.0, 0.0, 0.7);
        let lines = grid_lines(10.0, 10, centre, grid);
        let centred: Vec<_> = lines
            .iter()
            .filter(|v| v.colour == centre.to_array())
            .collect();
        assert_eq!(centred.len(), 4);
        // Each centre line passes through the origin on one axis.
        assert!(centred.iter().all(|v| v.position[0] == 0.0 || v.position[2] == 0.0));
    }

    #[test]
    fn axes_point_along_positive_axes() {
        let axes = axes_lines(5.0);
        assert_eq!(axes.len(), 6);
        assert_eq!(axes[1].position, [5.0, 0.0, 0.0]);
        assert_eq!(axes[3].position, [0.0, 5.0, 0.0]);
        assert_eq!(axes[5].position, [0.0, 0.0, 5.0]);
    }
}
