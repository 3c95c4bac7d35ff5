//! wgpu render backend for the beach scene.
//!
//! Draws a [`beachfire_render::DrawList`] in three passes over one colour
//! target: lit instanced props, alpha-tested textured quads, then additive
//! particles with depth writes off.
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - Textures are uploaded once and looked up by [`beachfire_render::TextureKey`].

mod gpu;
mod mesh;
mod readback;
mod shaders;

pub use gpu::WgpuRenderer;
pub use readback::{ReadbackError, read_rgba};
