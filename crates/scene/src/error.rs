use beachfire_anim::AnimError;

/// Errors raised while building or advancing the scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("failed to start {component}: {source}")]
    Init {
        component: &'static str,
        #[source]
        source: AnimError,
    },
    #[error("frame delta must be finite and non-negative, got {0}")]
    InvalidDelta(f32),
    #[error("{component} produced a non-finite value")]
    NonFinite { component: &'static str },
}

/// Errors from reading or writing persisted preferences.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
