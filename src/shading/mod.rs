//! CPU reference of the fragment programs.
//!
//! The WGSL programs in `pipelines/` are small closed-form functions of the
//! interpolated UV/position, the uniforms and time. The same math lives here
//! so it can be unit tested and used to predict pixels in golden image tests.
//! Every function mirrors its WGSL namesake; keep them in sync.

pub mod noise;

use cgmath::{InnerSpace, Matrix3, Matrix4, Vector2, Vector3, Vector4};

pub use noise::simplex3;

/// GLSL/WGSL `step`: 0 below `edge`, 1 at or above it.
pub fn step(edge: f32, x: f32) -> f32 {
    if x < edge { 0.0 } else { 1.0 }
}

/// GLSL/WGSL `smoothstep` (Hermite interpolation between two edges).
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linear blend of two colours, `a` at 0 and `b` at 1.
pub fn mix(a: Vector3<f32>, b: Vector3<f32>, t: f32) -> Vector3<f32> {
    a * (1.0 - t) + b * t
}

const WHITE: Vector3<f32> = Vector3::new(1.0, 1.0, 1.0);

/// Parameters of the tiled noise mask.
///
/// UV space is stretched by `aspect_x` horizontally and cut into `tiles`
/// cells per unit. Each cell draws a disc whose radius is jittered per cell
/// and over time by simplex noise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileParams {
    pub tiles: f32,
    pub aspect_x: f32,
    pub radius: f32,
    pub jitter: f32,
}

impl Default for TileParams {
    fn default() -> Self {
        Self {
            tiles: 10.0,
            aspect_x: 2.0,
            radius: 0.25,
            jitter: 0.25,
        }
    }
}

impl TileParams {
    fn scaled(&self, uv: Vector2<f32>) -> Vector2<f32> {
        Vector2::new(uv.x * self.aspect_x, uv.y) * self.tiles
    }

    /// Integer coordinate of the cell containing `uv`.
    pub fn tile_of(&self, uv: Vector2<f32>) -> Vector2<f32> {
        self.scaled(uv).map(f32::floor)
    }

    /// Radius offset of a cell at `time`.
    pub fn tile_offset(&self, tile: Vector2<f32>, time: f32) -> f32 {
        simplex3(Vector3::new(tile.x, tile.y, time)) * self.jitter
    }

    /// Distance from the pixel to the centre of its cell, in cell units.
    pub fn distance_to_centre(&self, uv: Vector2<f32>) -> f32 {
        let cell = self.scaled(uv).map(|c| c - c.floor());
        (cell - Vector2::new(0.5, 0.5)).magnitude()
    }

    /// 1 inside the jittered disc of the pixel's cell, 0 outside.
    pub fn mask(&self, uv: Vector2<f32>, time: f32) -> f32 {
        let offset = self.tile_offset(self.tile_of(uv), time);
        1.0 - step(self.radius + offset, self.distance_to_centre(uv))
    }

    pub fn shade(&self, colour: Vector3<f32>, uv: Vector2<f32>, time: f32) -> Vector3<f32> {
        mix(colour, WHITE, self.mask(uv, time))
    }
}

/// Smallest euclidean distance from `position` to any of `points`.
///
/// Starts from the same 10000.0 sentinel the fragment program uses, which is
/// also what an empty cloud yields.
pub fn nearest_distance(position: Vector3<f32>, points: &[Vector3<f32>]) -> f32 {
    points
        .iter()
        .map(|p| (position - p).magnitude())
        .fold(10000.0, f32::min)
}

/// 1 when `distance` is strictly below `radius`.
pub fn disc_mask(distance: f32, radius: f32) -> f32 {
    1.0 - step(radius, distance)
}

/// Fresnel-style rim term of a sphere surface point given in local space.
pub fn sphere_rim(
    local_position: Vector3<f32>,
    model: Matrix4<f32>,
    camera_position: Vector3<f32>,
) -> f32 {
    let normal = local_position.normalize();
    let model3 = Matrix3::from_cols(
        model.x.truncate(),
        model.y.truncate(),
        model.z.truncate(),
    );
    let world_normal = (model3 * normal).normalize();
    let world_position = (model * Vector4::new(local_position.x, local_position.y, local_position.z, 1.0)).truncate();
    let view = (camera_position - world_position).normalize();
    let rim = 1.0 - view.dot(world_normal).max(0.0);
    smoothstep(0.0, 1.0, rim).powf(0.5)
}

/// Inputs of the point cloud program besides the interpolated position.
#[derive(Clone, Debug)]
pub struct PointCloudParams<'a> {
    pub colour: Vector3<f32>,
    pub points: &'a [Vector3<f32>],
    pub radius: f32,
    pub rim_strength: f32,
}

/// Final colour of the point cloud + rim program.
pub fn shade_point_cloud(
    params: &PointCloudParams<'_>,
    local_position: Vector3<f32>,
    model: Matrix4<f32>,
    camera_position: Vector3<f32>,
) -> Vector3<f32> {
    let dist = nearest_distance(local_position, params.points);
    let base = mix(params.colour, WHITE, disc_mask(dist, params.radius));
    let rim = sphere_rim(local_position, model, camera_position) * params.rim_strength;
    base + Vector3::new(rim, rim, rim)
}
