// winit allows one event loop per process, so every windowed test lives in
// its own file.
#[cfg(feature = "integration-tests")]
#[macro_use]
mod common;

#[test]
#[cfg(feature = "integration-tests")]
fn should_match_cpu_point_cloud_shading() {
    use crate::common::test_utils::{ImageTest, assert_colour_near, pixel_of, rgb_at};
    use cgmath::{EuclideanSpace, InnerSpace, Matrix4, SquareMatrix, Vector3};
    use flow_sketch::{
        context::InitContext,
        data_structures::colour::Colour,
        flow::{ImageTestResult, Settings},
        shading::{PointCloudParams, nearest_distance, shade_point_cloud},
        sketches::{SketchKind, rim_lighting},
    };

    let kind = SketchKind::RimLighting;
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
                let points = rim_lighting::points();
                let params = PointCloudParams {
                    colour: Vector3::from(Colour::TOMATO.to_array()),
                    points: &points,
                    radius: rim_lighting::DISC_RADIUS,
                    rim_strength: rim_lighting::RIM_STRENGTH,
                };
                // Time is pinned at 0, so the sphere has not turned.
                let model = Matrix4::identity();
                let eye = ctx.camera.camera.position.to_vec();
                let size = (texture.width(), texture.height());

                let samples = [
                    ("disc facing the camera", Vector3::new(0.5, 0.309_017, -0.809_017)),
                    ("bare spot in front", Vector3::new(0.4045, 0.5878, -0.7006)),
                    ("bare spot near the silhouette", Vector3::new(-0.5091, 0.5878, -0.6287)),
                ];
                for (what, direction) in samples {
                    let surface = direction.normalize();
                    // Tessellation moves the drawn surface slightly inside the sphere.
                    let margin = (nearest_distance(surface, &points) - params.radius).abs();
                    assert!(margin > 0.05, "{what} sits on a disc edge");
                    let expected = shade_point_cloud(&params, surface, model, eye);
                    let pixel = pixel_of(ctx, size, surface);
                    assert_colour_near(rgb_at(ctx, texture, pixel), expected, what);
                }
                Ok(ImageTestResult::Passed)
            }),
        ))
    });
}
