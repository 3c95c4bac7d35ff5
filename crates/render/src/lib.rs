//! Rendering adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers never mutate the scene.
//! - Everything drawn in a frame derives from the scene and the view.
//!
//! [`DrawList`] flattens a [`beachfire_scene::SceneRoot`] into world-space
//! instances grouped by pipeline, so backends only deal with matrices,
//! colours and texture keys.

mod draw;
mod renderer;

pub use draw::{
    DrawList, Lighting, MeshInstance, MeshKind, ParticleInstance, TextureKey, TexturedQuad,
};
pub use renderer::{DebugTextRenderer, RenderView, Renderer};
