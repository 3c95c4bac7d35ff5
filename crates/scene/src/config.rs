use beachfire_input::MAX_SPRITE_COUNT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ConfigError;
use crate::characters::DEFAULT_FRAME_DURATION;

pub const DEFAULT_SPRITE_COUNT: u8 = 2;
pub const DEFAULT_SEED: u64 = 0x00be_ac4f_14e5;
/// Query key that selects the sprite count.
pub const SPRITES_KEY: &str = "sprites";

/// Where the resolved sprite count came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Query,
    Persisted,
    Default,
}

/// Start-up configuration of the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub sprite_count: u8,
    pub seed: u64,
    pub character_frame_duration: f32,
    pub source: ConfigSource,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            sprite_count: DEFAULT_SPRITE_COUNT,
            seed: DEFAULT_SEED,
            character_frame_duration: DEFAULT_FRAME_DURATION,
            source: ConfigSource::Default,
        }
    }
}

impl SceneConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// User choices that survive restarts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub sprite_count: Option<u8>,
}

/// JSON file holding [`Preferences`].
#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file. A missing file is `Ok(None)`.
    pub fn try_load(&self) -> Result<Option<Preferences>, ConfigError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    /// Read the file, treating a missing or unreadable one as empty.
    pub fn load(&self) -> Preferences {
        match self.try_load() {
            Ok(Some(prefs)) => {
                tracing::debug!(path = %self.path.display(), ?prefs, "preferences loaded");
                prefs
            }
            Ok(None) => Preferences::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "ignoring unreadable preferences: {e}");
                Preferences::default()
            }
        }
    }

    pub fn save(&self, prefs: &Preferences) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(prefs)?;
        std::fs::write(&self.path, json)?;
        tracing::info!(path = %self.path.display(), "preferences saved");
        Ok(())
    }
}

/// Value of `key` in an `a=b&c=d` query string. A leading `?` is allowed.
pub fn query_param<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

fn parse_sprite_count(raw: &str) -> Option<u8> {
    raw.trim().parse::<u8>().ok().filter(|n| *n <= MAX_SPRITE_COUNT)
}

/// Resolve the start-up configuration. The sprite count comes from the
/// query string, then the persisted preferences, then the default; a
/// missing or invalid value at one source falls through to the next.
pub fn resolve_config(query: Option<&str>, prefs: Option<&Preferences>) -> SceneConfig {
    let from_query = query
        .and_then(|q| query_param(q, SPRITES_KEY))
        .and_then(|raw| {
            let parsed = parse_sprite_count(raw);
            if parsed.is_none() {
                tracing::warn!(raw, "ignoring invalid sprite count in query");
            }
            parsed
        });
    let from_prefs = prefs.and_then(|p| p.sprite_count).and_then(|n| {
        if n > MAX_SPRITE_COUNT {
            tracing::warn!(n, "ignoring out-of-range persisted sprite count");
            None
        } else {
            Some(n)
        }
    });

    let (sprite_count, source) = match (from_query, from_prefs) {
        (Some(n), _) => (n, ConfigSource::Query),
        (None, Some(n)) => (n, ConfigSource::Persisted),
        (None, None) => (DEFAULT_SPRITE_COUNT, ConfigSource::Default),
    };
    tracing::info!(sprite_count, ?source, "configuration resolved");
    SceneConfig {
        sprite_count,
        source,
        ..SceneConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs(n: u8) -> Preferences {
        Preferences {
            sprite_count: Some(n),
        }
    }

    #[test]
    fn query_beats_persisted() {
        let cfg = resolve_config(Some("sprites=5"), Some(&prefs(3)));
        assert_eq!(cfg.sprite_count, 5);
        assert_eq!(cfg.source, ConfigSource::Query);
    }

    #[test]
    fn persisted_beats_default() {
        let cfg = resolve_config(None, Some(&prefs(3)));
        assert_eq!(cfg.sprite_count, 3);
        assert_eq!(cfg.source, ConfigSource::Persisted);
    }

    #[test]
    fn default_when_nothing_set() {
        let cfg = resolve_config(None, None);
        assert_eq!(cfg.sprite_count, DEFAULT_SPRITE_COUNT);
        assert_eq!(cfg.source, ConfigSource::Default);
        assert_eq!(resolve_config(Some(""), Some(&Preferences::default())).source, ConfigSource::Default);
    }

    #[test]
    fn invalid_values_fall_through() {
        let cfg = resolve_config(Some("sprites=abc"), Some(&prefs(4)));
        assert_eq!((cfg.sprite_count, cfg.source), (4, ConfigSource::Persisted));

        let cfg = resolve_config(Some("sprites=9"), Some(&prefs(42)));
        assert_eq!((cfg.sprite_count, cfg.source), (DEFAULT_SPRITE_COUNT, ConfigSource::Default));
    }

    #[test]
    fn zero_is_a_valid_count() {
        let cfg = resolve_config(Some("?sprites=0"), None);
        assert_eq!((cfg.sprite_count, cfg.source), (0, ConfigSource::Query));
    }

    #[test]
    fn query_param_lookup() {
        assert_eq!(query_param("?a=1&sprites=3", "sprites"), Some("3"));
        assert_eq!(query_param("sprites", "sprites"), None);
        assert_eq!(query_param("x=1", "sprites"), None);
    }

    #[test]
    fn preferences_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferencesStore::new(dir.path().join("nested").join("prefs.json"));
        assert_eq!(store.try_load().unwrap(), None);
        store.save(&prefs(6)).unwrap();
        assert_eq!(store.load(), prefs(6));
    }

    #[test]
    fn corrupt_preferences_load_as_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = PreferencesStore::new(&path);
        assert!(matches!(store.try_load(), Err(ConfigError::Json(_))));
        assert_eq!(store.load(), Preferences::default());
    }
}
