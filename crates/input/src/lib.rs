//! Input mapping: raw window events become [`Action`]s.
//!
//! # Invariants
//! - The scene consumes actions, never raw platform events.
//! - Mapping is pure; no input state is kept here.

pub mod action;

pub use action::{Action, MAX_SPRITE_COUNT, ZoomDirection};
