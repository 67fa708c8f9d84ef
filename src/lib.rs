//! Grid raycaster with a cheap per-pixel lighting model.
//!
//! Modules:
//! - `world`: grid map, camera, lights and their text formats
//! - `render`: framebuffer, textures, DDA caster and the frame renderer
//! - `config`: TOML-backed application and render settings
//! - `cli`: command line arguments for the binary

pub mod cli;
pub mod config;
pub mod render;
pub mod world;
