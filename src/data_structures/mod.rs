//! Sketch data structures: geometry, models, textures, scene nodes.
//!
//! - `colour` parses and converts the colours sketches are written with
//! - `geometry` holds CPU vertex data, primitive builders and draw groups
//! - `helpers` builds the grid and axes line lists
//! - `instance` holds per-instance transformations and time driven spins
//! - `model` contains GPU meshes and the per-group material draw
//! - `scene_graph` has the nodes a sketch updates and renders
//! - `texture` contains the GPU texture wrapper and creation utilities

pub mod colour;
pub mod geometry;
pub mod helpers;
pub mod instance;
pub mod model;
pub mod scene_graph;
pub mod texture;
