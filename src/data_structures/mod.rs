//! Viewer data structures: models, textures, the scene graph and transforms.
//!
//! - `model` contains mesh and material definitions, GPU resources for 3D models
//! - `texture` contains the GPU texture wrapper and creation utilities
//! - `scene_graph` holds the arena scene graph and bounding-volume math
//! - `transform` holds node transforms and their raw GPU form

pub mod model;
pub mod scene_graph;
pub mod texture;
pub mod transform;
