//! CPU-side geometry: primitive builders and buffer invariants.
//!
//! A [`Geometry`] is the immutable vertex data of one mesh before it is
//! uploaded. Besides positions it carries normals and UVs, an index buffer
//! (non-indexed input gets a sequential one) and optional material groups
//! that split the index buffer into contiguous ranges, one material each.

use std::{collections::HashMap, f32::consts::PI, ops::Range};

use anyhow::{bail, ensure};
use cgmath::{InnerSpace, Vector3};

/// A contiguous range of the index buffer drawn with one material.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Group {
    pub start: u32,
    pub count: u32,
    pub material_index: usize,
}

impl Group {
    pub fn range(&self) -> Range<u32> {
        self.start..self.start + self.count
    }
}

#[derive(Clone, Debug, Default)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    pub groups: Vec<Group>,
}

impl Geometry {
    /// UV sphere, poles on the Y axis, seam at -X.
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);
        let mut geometry = Geometry::default();
        let mut grid: Vec<Vec<u32>> = Vec::with_capacity(height_segments as usize + 1);
        let mut index = 0;

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            // Poles get a half-segment shift so each cap triangle samples its own u.
            let u_offset = if iy == 0 {
                0.5 / width_segments as f32
            } else if iy == height_segments {
                -0.5 / width_segments as f32
            } else {
                0.0
            };
            let mut row = Vec::with_capacity(width_segments as usize + 1);
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let phi = u * 2.0 * PI;
                let theta = v * PI;
                let position = Vector3::new(
                    -radius * phi.cos() * theta.sin(),
                    radius * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                );
                geometry.positions.push(position.into());
                geometry.normals.push(normal_of(position));
                geometry.uvs.push([u + u_offset, 1.0 - v]);
                row.push(index);
                index += 1;
            }
            grid.push(row);
        }

        for iy in 0..height_segments as usize {
            for ix in 0..width_segments as usize {
                let a = grid[iy][ix + 1];
                let b = grid[iy][ix];
                let c = grid[iy + 1][ix];
                let d = grid[iy + 1][ix + 1];
                if iy != 0 {
                    geometry.indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments as usize - 1 {
                    geometry.indices.extend_from_slice(&[b, c, d]);
                }
            }
        }
        geometry
    }

    /// Subdivided icosahedron projected onto a sphere of `radius`.
    ///
    /// Every face is split into `(detail + 1)^2` triangles. The result is
    /// non-indexed (flat faces share no vertices); use [`Self::unique_positions`]
    /// for the point set.
    pub fn icosahedron(radius: f32, detail: u32) -> Self {
        let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
        #[rustfmt::skip]
        let corners: [[f32; 3]; 12] = [
            [-1.0, t, 0.0], [1.0, t, 0.0], [-1.0, -t, 0.0], [1.0, -t, 0.0],
            [0.0, -1.0, t], [0.0, 1.0, t], [0.0, -1.0, -t], [0.0, 1.0, -t],
            [t, 0.0, -1.0], [t, 0.0, 1.0], [-t, 0.0, -1.0], [-t, 0.0, 1.0],
        ];
        #[rustfmt::skip]
        let faces: [[usize; 3]; 20] = [
            [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
            [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
            [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
            [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
        ];

        let mut vertices = Vec::new();
        for [a, b, c] in faces {
            subdivide_face(
                corners[a].into(),
                corners[b].into(),
                corners[c].into(),
                detail,
                &mut vertices,
            );
        }

        let mut geometry = Geometry::default();
        for vertex in vertices {
            let unit = vertex.normalize();
            geometry.positions.push((unit * radius).into());
            geometry.normals.push(unit.into());
            geometry.uvs.push(spherical_uv(unit));
        }
        geometry.indices = (0..geometry.positions.len() as u32).collect();
        geometry
    }

    /// Flat disc in the XY plane facing +Z, centre vertex first.
    pub fn circle(radius: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let mut geometry = Geometry::default();
        geometry.positions.push([0.0, 0.0, 0.0]);
        geometry.normals.push([0.0, 0.0, 1.0]);
        geometry.uvs.push([0.5, 0.5]);

        for s in 0..=segments {
            let angle = s as f32 / segments as f32 * 2.0 * PI;
            let (x, y) = (radius * angle.cos(), radius * angle.sin());
            geometry.positions.push([x, y, 0.0]);
            geometry.normals.push([0.0, 0.0, 1.0]);
            geometry.uvs.push([(x / radius + 1.0) / 2.0, (y / radius + 1.0) / 2.0]);
        }
        for i in 1..=segments {
            geometry.indices.extend_from_slice(&[i, i + 1, 0]);
        }
        geometry
    }

    /// Non-indexed geometry from flat position (xyz) and uv (xy) buffers.
    ///
    /// Normals are per face. Buffers must hold whole vertices; call
    /// [`Self::validate`] to check that the two agree.
    pub fn from_buffers(positions: &[f32], uvs: &[f32]) -> anyhow::Result<Self> {
        ensure!(
            positions.len() % 3 == 0,
            "{} position floats are not a whole number of xyz vertices",
            positions.len()
        );
        ensure!(
            uvs.len() % 2 == 0,
            "{} uv floats are not a whole number of uv pairs",
            uvs.len()
        );
        let positions: Vec<[f32; 3]> = positions
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        let uvs = uvs.chunks_exact(2).map(|c| [c[0], c[1]]).collect();
        let normals = positions
            .chunks(3)
            .flat_map(|tri| {
                let normal = face_normal(tri);
                std::iter::repeat_n(normal, tri.len())
            })
            .collect();
        let indices = (0..positions.len() as u32).collect();
        Ok(Self {
            positions,
            normals,
            uvs,
            indices,
            groups: Vec::new(),
        })
    }

    pub fn add_group(&mut self, start: u32, count: u32, material_index: usize) {
        self.groups.push(Group {
            start,
            count,
            material_index,
        });
    }

    /// The declared groups, or a single group covering everything with material 0.
    pub fn groups_or_default(&self) -> Vec<Group> {
        if self.groups.is_empty() {
            vec![Group {
                start: 0,
                count: self.indices.len() as u32,
                material_index: 0,
            }]
        } else {
            self.groups.clone()
        }
    }

    /// Positions with coincident vertices merged (rounded to 4 decimals),
    /// in first-seen order.
    pub fn unique_positions(&self) -> Vec<Vector3<f32>> {
        let precision = 10_000.0_f32;
        let mut seen = HashMap::new();
        let mut unique = Vec::new();
        for p in &self.positions {
            let key = p.map(|c| (c * precision).round() as i64);
            seen.entry(key).or_insert_with(|| {
                unique.push(Vector3::from(*p));
                unique.len() - 1
            });
        }
        unique
    }

    /// Checks the buffer invariants against the number of materials the
    /// mesh will be drawn with.
    pub fn validate(&self, material_count: usize) -> anyhow::Result<()> {
        let vertex_count = self.positions.len();
        ensure!(vertex_count > 0, "geometry has no vertices");
        ensure!(
            self.uvs.len() == vertex_count,
            "{} uvs for {} vertices",
            self.uvs.len(),
            vertex_count
        );
        ensure!(
            self.normals.len() == vertex_count,
            "{} normals for {} vertices",
            self.normals.len(),
            vertex_count
        );
        if let Some(index) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            bail!("index {} out of range for {} vertices", index, vertex_count);
        }

        let mut groups = self.groups_or_default();
        groups.sort_by_key(|g| g.start);
        let mut cursor = 0;
        for group in &groups {
            ensure!(group.count > 0, "empty group at {}", group.start);
            if group.start < cursor {
                bail!("group at {} overlaps the previous group ending at {}", group.start, cursor);
            }
            if group.start > cursor {
                bail!("indices {}..{} are not covered by any group", cursor, group.start);
            }
            ensure!(
                group.material_index < material_count,
                "group at {} uses material {} but only {} exist",
                group.start,
                group.material_index,
                material_count
            );
            cursor = group.start + group.count;
        }
        ensure!(
            cursor as usize == self.indices.len(),
            "groups cover {} of {} indices",
            cursor,
            self.indices.len()
        );
        Ok(())
    }
}

fn normal_of(position: Vector3<f32>) -> [f32; 3] {
    if position.magnitude2() == 0.0 {
        [0.0, 1.0, 0.0]
    } else {
        position.normalize().into()
    }
}

fn face_normal(tri: &[[f32; 3]]) -> [f32; 3] {
    if tri.len() < 3 {
        return [0.0, 0.0, 1.0];
    }
    let a = Vector3::from(tri[0]);
    let b = Vector3::from(tri[1]);
    let c = Vector3::from(tri[2]);
    let n = (b - a).cross(c - a);
    if n.magnitude2() == 0.0 {
        [0.0, 0.0, 1.0]
    } else {
        n.normalize().into()
    }
}

fn spherical_uv(unit: Vector3<f32>) -> [f32; 2] {
    let azimuth = unit.z.atan2(-unit.x);
    let inclination = unit.y.clamp(-1.0, 1.0).asin();
    [azimuth / 2.0 / PI + 0.5, inclination / PI + 0.5]
}

fn subdivide_face(
    a: Vector3<f32>,
    b: Vector3<f32>,
    c: Vector3<f32>,
    detail: u32,
    out: &mut Vec<Vector3<f32>>,
) {
    let cols = detail as usize + 1;
    let mut rows: Vec<Vec<Vector3<f32>>> = Vec::with_capacity(cols + 1);
    for i in 0..=cols {
        let t = i as f32 / cols as f32;
        let aj = a + (c - a) * t;
        let bj = b + (c - b) * t;
        let span = cols - i;
        let row = (0..=span)
            .map(|j| {
                if j == 0 && i == cols {
                    aj
                } else {
                    aj + (bj - aj) * (j as f32 / span as f32)
                }
            })
            .collect();
        rows.push(row);
    }

    for i in 0..cols {
        for j in 0..2 * (cols - i) - 1 {
            let k = j / 2;
            if j % 2 == 0 {
                out.extend_from_slice(&[rows[i][k + 1], rows[i + 1][k], rows[i][k]]);
            } else {
                out.extend_from_slice(&[rows[i][k + 1], rows[i + 1][k + 1], rows[i + 1][k]]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_counts() {
        let g = Geometry::sphere(1.0, 32, 16);
        assert_eq!(g.positions.len(), 33 * 17);
        // Caps lose one triangle per segment.
        assert_eq!(g.indices.len(), (32 * 16 * 2 - 2 * 32) * 3);
        g.validate(1).unwrap();
    }

    #[test]
    fn sphere_vertices_on_radius() {
        let g = Geometry::sphere(2.0, 8, 6);
        for p in &g.positions {
            assert!((Vector3::from(*p).magnitude() - 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn icosahedron_detail_one_has_42_points() {
        let g = Geometry::icosahedron(1.0, 1);
        assert_eq!(g.positions.len(), 20 * 4 * 3);
        let points = g.unique_positions();
        assert_eq!(points.len(), 42);
        for p in points {
            assert!((p.magnitude() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn icosahedron_detail_zero_has_12_points() {
        assert_eq!(Geometry::icosahedron(1.0, 0).unique_positions().len(), 12);
    }

    #[test]
    fn circle_fans_around_centre() {
        let g = Geometry::circle(1.0, 32);
        assert_eq!(g.positions.len(), 34);
        assert_eq!(g.indices.len(), 32 * 3);
        g.validate(1).unwrap();
    }

    #[test]
    fn gap_between_groups_is_rejected() {
        let mut g = Geometry::circle(1.0, 4);
        g.add_group(0, 3, 0);
        g.add_group(6, 6, 0);
        assert!(g.validate(1).is_err());
    }

    #[test]
    fn missing_material_is_rejected() {
        let mut g = Geometry::circle(1.0, 4);
        g.add_group(0, 12, 1);
        assert!(g.validate(1).is_err());
    }
}
