//! flow-sketch CLI - open one sketch of the gallery in a window

use anyhow::Result;
use clap::Parser;
use flow_sketch::{
    flow::{self, Settings},
    sketches::SketchKind,
};

#[derive(Parser)]
#[command(name = "flow-sketch")]
#[command(about = "Small shader sketches on wgpu", long_about = None)]
#[command(version)]
struct Cli {
    /// Sketch to open: disc-on-icosahedron, glsl-noise, mesh-stitching or rim-lighting
    sketch: SketchKind,

    /// Draw a single still frame at time 0 instead of animating
    #[arg(long)]
    still: bool,

    /// Window width
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Window height
    #[arg(long, requires = "width")]
    height: Option<u32>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings {
        animate: !cli.still,
        title: format!("flow-sketch: {}", cli.sketch),
        dimensions: cli.width.zip(cli.height),
        ..Default::default()
    };

    flow::run(settings, cli.sketch.constructor())
}
