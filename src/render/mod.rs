//! Software renderer.
//!
//! Re-exports:
//! - `color`: packed RGBA pixel helpers
//! - `framebuffer`: CPU frame buffer handed to the presentation layer
//! - `textures`: fixed-slot texture store with procedural fallbacks
//! - `casters`: DDA ray casting against the grid map
//! - `render3d`: floor/ceiling rows and wall columns with lighting

pub mod casters;
pub mod color;
pub mod framebuffer;
pub mod render3d;
pub mod textures;
