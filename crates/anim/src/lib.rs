//! Procedural animation core: everything that changes from frame to frame.
//!
//! # Invariants
//! - Emitter pools are sized once; particles are recycled in place.
//! - Flip-book frame indices never leave `[0, total_frames)`.
//! - Oscillators are pure functions of time and their baseline.

pub mod emitter;
pub mod error;
pub mod flipbook;
pub mod oscillator;

pub use emitter::{Emitter, EmitterConfig};
pub use error::AnimError;
pub use flipbook::{Billboard, Flipbook, FlipbookSprite, SheetLayout, UvRect};
pub use oscillator::{Flicker, WindSway};
