//! Scene root: owns every visual component of the vignette and advances them
//! once per frame.
//!
//! # Invariants
//! - Components are owned by [`SceneRoot`]; nothing is shared through globals.
//! - Per-frame update order is fixed: sky, ocean, beach, campfire,
//!   characters, palm tree.
//! - Each component mutates only its own state.

pub mod beach;
pub mod camera;
pub mod campfire;
pub mod characters;
pub mod config;
pub mod error;
pub mod frame;
pub mod palm_tree;
pub mod prop;
pub mod root;
pub mod summary;

pub use beach::{AmbientLight, Beach, DirectionalLight, Ocean, Sky};
pub use camera::CameraRig;
pub use campfire::{Campfire, ParticleKind, ParticleSystem, PointLight};
pub use characters::{Character, CharacterPreset, Characters};
pub use config::{ConfigSource, Preferences, PreferencesStore, SceneConfig, resolve_config};
pub use error::{ConfigError, SceneError};
pub use frame::FrameLoop;
pub use palm_tree::PalmTree;
pub use prop::{Prop, Shape};
pub use root::SceneRoot;
pub use summary::SceneSummary;

/// Splitmix64, used to derive independent per-component seeds from the one
/// scene seed.
pub(crate) fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splitmix_diverges() {
        assert_ne!(splitmix64(1), splitmix64(2));
        assert_eq!(splitmix64(42), splitmix64(42));
    }
}
