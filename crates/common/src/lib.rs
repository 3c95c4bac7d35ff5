//! Shared types used by every beachfire crate.

pub mod types;

pub use types::{EulerRotation, Rgb, Transform};
