//! World state read by the renderer (map, camera, lights) and its loaders.
//!
//! Re-exports:
//! - `grid_map`: three-layer tile grid with bounds-checked queries
//! - `map_loader`: map text format and map file discovery
//! - `camera`: position, direction and camera plane
//! - `process_events`: per-frame movement intent applied to the camera
//! - `lighting`: light manager and the composite lighting primitive
//! - `lights_file`: light text format

pub mod camera;
pub mod grid_map;
pub mod lighting;
pub mod lights_file;
pub mod map_loader;
pub mod process_events;
