// winit allows one event loop per process, so every windowed test lives in
// its own file.
#[cfg(feature = "integration-tests")]
#[macro_use]
mod common;

/// Point of the unit UV sphere with texture coordinate `uv`.
#[cfg(feature = "integration-tests")]
fn sphere_point(uv: cgmath::Vector2<f32>) -> cgmath::Vector3<f32> {
    use std::f32::consts::PI;

    let phi = uv.x * 2.0 * PI;
    let theta = (1.0 - uv.y) * PI;
    cgmath::Vector3::new(
        -phi.cos() * theta.sin(),
        theta.cos(),
        phi.sin() * theta.sin(),
    )
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_match_cpu_tiled_noise_at_time_zero() {
    use crate::common::test_utils::{ImageTest, assert_colour_near, pixel_of, rgb_at};
    use cgmath::{Vector2, Vector3};
    use flow_sketch::{
        context::InitContext,
        data_structures::colour::Colour,
        flow::{ImageTestResult, Settings},
        shading::TileParams,
        sketches::SketchKind,
    };

    let kind = SketchKind::GlslNoise;
    let settings = Settings {
        animate: false,
        title: kind.name().to_string(),
        dimensions: Some((800, 600)),
        ..Default::default()
    };
    golden_image_test!(settings, move |ctx: InitContext| async move {
        let sketch = kind.build(ctx).await?;
        anyhow::Ok(ImageTest::new(
            sketch,
            Box::new(|ctx, frames, texture| {
                if frames.frame() < 2 {
                    return Ok(ImageTestResult::Waiting);
                }
                let params = TileParams::default();
                let tomato = Vector3::from(Colour::TOMATO.to_array());
                let size = (texture.width(), texture.height());
                let columns = params.tiles * params.aspect_x;

                // Three neighbouring cells facing the camera, sampled 0.3 cells
                // right of their centres. Only the jitter decides the outcome.
                let cells = [(12.0, 6.0), (13.0, 6.0), (14.0, 6.0)];
                let mut masks = Vec::new();
                for (column, row) in cells {
                    let uv = Vector2::new((column + 0.8) / columns, (row + 0.5) / params.tiles);
                    let edge = params.radius + params.tile_offset(Vector2::new(column, row), 0.0);
                    let what = format!("cell ({column}, {row})");
                    // UVs interpolated across a facet drift by a few hundredths of a cell.
                    assert!(
                        (edge - params.distance_to_centre(uv)).abs() > 0.05,
                        "{what} samples its disc edge"
                    );
                    masks.push(params.mask(uv, 0.0));
                    let expected = params.shade(tomato, uv, 0.0);
                    let pixel = pixel_of(ctx, size, sphere_point(uv));
                    assert_colour_near(rgb_at(ctx, texture, pixel), expected, &what);
                }
                assert!(masks.contains(&0.0) && masks.contains(&1.0), "masks {masks:?}");
                Ok(ImageTestResult::Passed)
            }),
        ))
    });
}
