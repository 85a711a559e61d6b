//! The sketch gallery.
//!
//! Every sketch is the same [`Stage`] (camera, grid, axes) plus a handful of
//! scene nodes. The modules below only differ in the nodes they build:
//!
//! - `disc_on_icosahedron`: tomato sphere with black discs at the
//!   icosahedron's vertices
//! - `glsl_noise`: sphere covered in animated noise-jittered discs
//! - `mesh_stitching`: two quads sharing one buffer, one texture each
//! - `rim_lighting`: point cloud discs on a sphere plus a Fresnel rim

use std::{fmt, pin::Pin, str::FromStr};

use anyhow::bail;
use cgmath::Deg;

use crate::{
    camera::{Camera, Projection},
    context::{Context, InitContext},
    data_structures::{
        colour::Colour,
        geometry::Geometry,
        scene_graph::{LineNode, SceneNode},
    },
    flow::{Frame, Out, SketchConstructor, SketchFlow, Viewport},
    render::Render,
};

pub mod disc_on_icosahedron;
pub mod glsl_noise;
pub mod mesh_stitching;
pub mod rim_lighting;

/// Rotation speed of the main mesh about +Y in radians per second.
pub const SPIN_SPEED: f32 = 0.15;

/// The main sphere of the sphere based sketches.
pub fn sketch_sphere() -> Geometry {
    Geometry::sphere(1.0, 32, 16)
}

/// Scene setup shared by every sketch.
pub struct Stage {
    pub grid: LineNode,
    pub axes: LineNode,
}

impl Stage {
    pub const GRID_SIZE: f32 = 10.0;
    pub const GRID_DIVISIONS: u32 = 10;
    pub const AXES_SIZE: f32 = 5.0;

    pub fn new(ctx: &InitContext) -> anyhow::Result<Self> {
        let centre: Colour = "hsl(0, 0%, 50%)".parse()?;
        let lines: Colour = "hsl(0, 0%, 70%)".parse()?;
        Ok(Self {
            grid: LineNode::grid(
                &ctx.device,
                Self::GRID_SIZE,
                Self::GRID_DIVISIONS,
                centre,
                lines,
            ),
            axes: LineNode::axes(&ctx.device, Self::AXES_SIZE),
        })
    }

    /// Perspective camera at (3, 3, -5) looking at the origin.
    pub fn place_camera(ctx: &mut Context) {
        ctx.camera.camera = Camera::new((3.0, 3.0, -5.0), (0.0, 0.0, 0.0));
        ctx.projection = Projection::new(
            ctx.config.width,
            ctx.config.height,
            Deg(50.0),
            0.01,
            100.0,
        );
    }

    fn get_render(&self) -> Vec<Render<'_>> {
        vec![self.grid.get_render(), self.axes.get_render()]
    }
}

/// A built sketch: the stage plus its scene nodes.
pub struct Sketch {
    name: &'static str,
    stage: Stage,
    nodes: Vec<Box<dyn SceneNode>>,
    time: f32,
}

impl Sketch {
    pub fn new(name: &'static str, stage: Stage, nodes: Vec<Box<dyn SceneNode>>) -> Self {
        Self {
            name,
            stage,
            nodes,
            time: 0.0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn nodes(&self) -> &[Box<dyn SceneNode>] {
        &self.nodes
    }

    /// Time of the last update in seconds.
    pub fn time(&self) -> f32 {
        self.time
    }
}

impl SketchFlow for Sketch {
    fn on_init(&mut self, ctx: &mut Context) -> Out {
        Stage::place_camera(ctx);
        log::info!("{} ready with {} node(s)", self.name, self.nodes.len());
        Out::Empty
    }

    fn on_resize(&mut self, _ctx: &Context, viewport: Viewport) -> Out {
        log::debug!(
            "{}: viewport {}x{} at pixel ratio {}",
            self.name,
            viewport.width,
            viewport.height,
            viewport.pixel_ratio
        );
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, frame: Frame) -> Out {
        self.time = frame.time;
        for node in self.nodes.iter_mut() {
            node.set_time(frame.time);
            node.write_to_buffers(&ctx.queue, &ctx.device);
        }
        Out::Empty
    }

    fn on_render(&self) -> Render<'_> {
        let mut renders = self.stage.get_render();
        renders.extend(self.nodes.iter().map(|node| node.get_render()));
        Render::Composed(renders)
    }

    fn on_unload(&mut self, _ctx: &Context) {
        log::info!("unloading {}", self.name);
        self.nodes.clear();
    }
}

/// The sketches of the gallery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SketchKind {
    DiscOnIcosahedron,
    GlslNoise,
    MeshStitching,
    RimLighting,
}

impl SketchKind {
    pub const ALL: [SketchKind; 4] = [
        SketchKind::DiscOnIcosahedron,
        SketchKind::GlslNoise,
        SketchKind::MeshStitching,
        SketchKind::RimLighting,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SketchKind::DiscOnIcosahedron => "disc-on-icosahedron",
            SketchKind::GlslNoise => "glsl-noise",
            SketchKind::MeshStitching => "mesh-stitching",
            SketchKind::RimLighting => "rim-lighting",
        }
    }

    /// Build the sketch from the rendering handle.
    pub async fn build(self, ctx: InitContext) -> anyhow::Result<Sketch> {
        let stage = Stage::new(&ctx)?;
        let nodes = match self {
            SketchKind::DiscOnIcosahedron => disc_on_icosahedron::nodes(&ctx)?,
            SketchKind::GlslNoise => glsl_noise::nodes(&ctx)?,
            SketchKind::MeshStitching => mesh_stitching::nodes(&ctx).await?,
            SketchKind::RimLighting => rim_lighting::nodes(&ctx)?,
        };
        Ok(Sketch::new(self.name(), stage, nodes))
    }

    pub fn constructor(self) -> SketchConstructor {
        Box::new(move |ctx: InitContext| {
            let built: Pin<Box<dyn Future<Output = anyhow::Result<Box<dyn SketchFlow>>>>> =
                Box::pin(async move {
                    let sketch: Box<dyn SketchFlow> = Box::new(self.build(ctx).await?);
                    Ok(sketch)
                });
            built
        })
    }
}

impl fmt::Display for SketchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SketchKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match Self::ALL.into_iter().find(|kind| kind.name() == s) {
            Some(kind) => Ok(kind),
            // Misspelled alias.
            None if s == "mesh-stiching" => Ok(SketchKind::MeshStitching),
            None => {
                let names: Vec<&str> = Self::ALL.iter().map(|kind| kind.name()).collect();
                bail!("unknown sketch '{s}', expected one of: {}", names.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back() {
        for kind in SketchKind::ALL {
            assert_eq!(kind.name().parse::<SketchKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_sketch_lists_the_gallery() {
        let err = "teapot".parse::<SketchKind>().unwrap_err().to_string();
        assert!(err.contains("rim-lighting"), "{err}");
    }

    #[test]
    fn old_folder_spelling_is_accepted() {
        assert_eq!(
            "mesh-stiching".parse::<SketchKind>().unwrap(),
            SketchKind::MeshStitching
        );
    }
}
