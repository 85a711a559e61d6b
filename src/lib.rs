//! flow-sketch
//!
//! A gallery of small shader sketches on top of a cross-platform wgpu frame
//! driver. A sketch builds a scene once (camera, helper lines, geometry and
//! shader materials) and is then updated from elapsed time and redrawn
//! every frame, natively or in the browser.
//!
//! High-level modules
//! - `camera`: camera, orbit controller and view/projection uniforms
//! - `context`: GPU and window context, plus the `InitContext` handle given
//!   to sketch constructors
//! - `data_structures`: geometry, meshes, instances, textures, colours and
//!   scene nodes
//! - `flow`: the frame driver (`SketchFlow`, `run`)
//! - `pipelines`: render pipelines, WGSL composition and shader materials
//! - `render`: render composition for pipeline reuse
//! - `resources`: asset loading
//! - `shading`: CPU versions of the fragment shader math
//! - `sketches`: the four sketches
//!

pub mod camera;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod shading;
pub mod sketches;

// Re-exports commonly used types for convenience in downstream code.
pub use winit::event::WindowEvent;
