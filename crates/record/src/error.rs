use std::path::PathBuf;

/// Errors raised by a capture backend.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("mime type {0} is not supported by this backend")]
    UnsupportedMime(String),
    #[error("frame is {got} bytes, expected {expected}")]
    FrameSize { expected: usize, got: usize },
    #[error("not recording")]
    NotRecording,
    #[error("encoder failed: {0}")]
    Encoder(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by the recording controller.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("screen capture is not supported")]
    Unsupported,
    #[error("recorder setup failed: {0}")]
    Setup(#[source] CaptureError),
    #[error("recording already in progress")]
    AlreadyRecording,
    #[error("recorder error: {0}")]
    Capture(#[from] CaptureError),
    #[error("failed to save {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
