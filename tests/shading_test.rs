use cgmath::{InnerSpace, Matrix4, Vector2, Vector3};
use flow_sketch::{
    data_structures::{
        colour::Colour,
        geometry::Geometry,
        instance::{Instance, Spin},
    },
    pipelines::material::FragmentProgram,
    shading::{
        PointCloudParams, TileParams, disc_mask, nearest_distance, shade_point_cloud, sphere_rim,
    },
    sketches::{SPIN_SPEED, mesh_stitching, rim_lighting, sketch_sphere},
};

/// Deterministic points on and around the unit sphere.
fn sample_positions(count: usize) -> Vec<Vector3<f32>> {
    let mut seed: u32 = 0x2545_f491;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        (seed as f32 / u32::MAX as f32) * 2.0 - 1.0
    };
    (0..count)
        .map(|_| Vector3::new(next(), next(), next()) * 1.2)
        .collect()
}

#[test]
fn tile_offset_is_deterministic() {
    let tiles = TileParams::default();
    for (x, y, t) in [(0.0, 0.0, 0.0), (7.0, 3.0, 1.5), (19.0, 9.0, 42.25)] {
        let tile = Vector2::new(x, y);
        assert_eq!(
            tiles.tile_offset(tile, t).to_bits(),
            tiles.tile_offset(tile, t).to_bits()
        );
    }
}

#[test]
fn tile_mask_is_binary() {
    let tiles = TileParams::default();
    let mut seen = [false; 2];
    for t in [0.0, 0.4, 3.7] {
        for i in 0..64 {
            for j in 0..64 {
                let uv = Vector2::new(i as f32 / 63.0, j as f32 / 63.0);
                let mask = tiles.mask(uv, t);
                assert!(mask == 0.0 || mask == 1.0, "mask {mask} at {uv:?}");
                seen[mask as usize] = true;
            }
        }
    }
    assert_eq!(seen, [true, true], "expected both discs and background");
}

#[test]
fn tile_grid_is_twenty_by_ten() {
    let tiles = TileParams::default();
    assert_eq!(tiles.tile_of(Vector2::new(0.999, 0.999)), Vector2::new(19.0, 9.0));
    assert_eq!(tiles.tile_of(Vector2::new(0.0, 0.0)), Vector2::new(0.0, 0.0));
}

#[test]
fn nearest_distance_matches_brute_force() {
    let points = rim_lighting::points();
    for position in sample_positions(500) {
        let mut expected = f32::INFINITY;
        for p in &points {
            let d = (position - p).magnitude();
            if d < expected {
                expected = d;
            }
        }
        assert_eq!(nearest_distance(position, &points), expected);
    }
}

#[test]
fn disc_mask_only_below_radius() {
    let points = rim_lighting::points();
    let radius = rim_lighting::DISC_RADIUS;
    for position in sample_positions(500) {
        let dist = nearest_distance(position, &points);
        let mask = disc_mask(dist, radius);
        assert_eq!(mask == 1.0, dist < radius, "dist {dist}");
    }
    assert_eq!(disc_mask(radius, radius), 0.0);
    // Exactly on a point.
    assert_eq!(disc_mask(nearest_distance(points[0], &points), radius), 1.0);
}

#[test]
fn rotation_is_a_pure_function_of_time() {
    let spin = Spin::about_y(SPIN_SPEED);
    let base = Instance::new();
    for time in [0.0, 0.016, 1.0, 120.5] {
        assert_eq!(spin.apply(&base, time), spin.apply(&base, time));
        assert_eq!(spin.rotation_at(time), spin.rotation_at(time));
    }
    // Rotation after 10s does not depend on the frames in between.
    let mut stepped = base.clone();
    for frame in 0..=600 {
        stepped = spin.apply(&stepped, frame as f32 / 60.0);
    }
    assert_eq!(stepped, spin.apply(&base, 10.0));
}

#[test]
fn groups_partition_the_index_buffer() {
    let stitched = mesh_stitching::stitched_quads().unwrap();
    stitched.validate(mesh_stitching::TEXTURES.len()).unwrap();

    let sphere = sketch_sphere();
    sphere.validate(1).unwrap();
    let groups = sphere.groups_or_default();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].count as usize, sphere.indices.len());
}

#[test]
fn overlapping_groups_are_rejected() {
    let mut geometry = mesh_stitching::stitched_quads().unwrap();
    geometry.groups.clear();
    geometry.add_group(0, 9, 0);
    geometry.add_group(6, 6, 1);
    assert!(geometry.validate(2).is_err());
}

#[test]
fn mismatched_uvs_are_rejected() {
    let positions = [0.0_f32; 9];
    let uvs = [0.0_f32; 4];
    let geometry = Geometry::from_buffers(&positions, &uvs).unwrap();
    assert!(geometry.validate(1).is_err());
}

#[test]
fn partial_vertices_are_rejected() {
    // One uv float too many for 12 vertices.
    assert!(Geometry::from_buffers(&[0.0; 36], &[0.0; 25]).is_err());
    // A stray position float.
    assert!(Geometry::from_buffers(&[0.0; 37], &[0.0; 24]).is_err());
    assert!(Geometry::from_buffers(&[0.0; 36], &[0.0; 24]).is_ok());
}

#[test]
fn rim_vanishes_where_the_sphere_faces_the_camera() {
    let camera = Vector3::new(3.0, 3.0, -5.0);
    let model = Matrix4::from(Spin::about_y(SPIN_SPEED).rotation_at(0.0));
    let facing = camera.normalize();
    assert!(sphere_rim(facing, model, camera).abs() < 1e-3);

    // The silhouette is fully lit.
    let side = Vector3::new(5.0, 0.0, 3.0).normalize();
    assert!(sphere_rim(side, model, camera) > 0.99);
}

#[test]
fn point_cloud_shading_adds_rim_on_top() {
    let points = rim_lighting::points();
    let colour = Vector3::from(Colour::TOMATO.to_array());
    let params = PointCloudParams {
        colour,
        points: &points,
        radius: rim_lighting::DISC_RADIUS,
        rim_strength: rim_lighting::RIM_STRENGTH,
    };
    let camera = Vector3::new(3.0, 3.0, -5.0);
    let model = Matrix4::from(Spin::about_y(SPIN_SPEED).rotation_at(0.0));

    // A disc centre is white, and the rim only ever adds light.
    let on_point = shade_point_cloud(&params, points[0], model, camera);
    assert!(on_point.x >= 1.0 && on_point.y >= 1.0 && on_point.z >= 1.0);
}

#[test]
fn point_count_follows_the_cloud() {
    let points = rim_lighting::points();
    assert_eq!(points.len(), 42);
    let program = FragmentProgram::PointCloud {
        colour: Colour::TOMATO,
        points: points.clone(),
        radius: rim_lighting::DISC_RADIUS,
        rim_strength: rim_lighting::RIM_STRENGTH,
    };
    let wgsl = program.compose().unwrap();
    assert!(wgsl.contains("array<vec4<f32>, 42>"), "{wgsl}");
    assert!(wgsl.contains("i < 42u"));
}
