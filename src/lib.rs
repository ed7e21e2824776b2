//! strut
//!
//! A small cross-platform 3D model viewer for native and WASM targets. It
//! loads a glTF binary with its texture maps, replaces whatever materials the
//! asset ships with by one standard lit material, normalizes the model to a
//! fixed size at the origin and plays every animation clip in a loop, lit by
//! a fixed three-light rig with a shadow-casting sun.
//!
//! High-level modules
//! - `app`: window bootstrap, event loop and the per-frame render path
//! - `camera`: camera types, the damped orbit controller and uniforms
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: meshes, materials, textures, the scene graph
//! - `pipelines`: the lit model pipeline and the depth-only shadow pipeline
//! - `resources`: glTF parsing, texture fetching and GPU uploads
//! - `scene`: scene contents, model installation and animation advancement
//!

pub mod app;
pub mod camera;
pub mod context;
pub mod data_structures;
pub mod pipelines;
pub mod resources;
pub mod scene;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;
