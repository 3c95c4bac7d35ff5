//! Recording of the rendered canvas to a WebM file.
//!
//! [`RecordingController`] owns the start/stop button state and talks to a
//! [`MediaCapture`] backend. Finished recordings are handed to a
//! [`DownloadSink`] under a timestamped file name.
//!
//! # Invariants
//! - Exactly one of the two buttons is enabled at any time.
//! - Every failure path ends with the start button enabled and the capture
//!   stream released.
//! - A successful stop produces exactly one download.

pub mod capture;
pub mod controller;
pub mod error;
pub mod ffmpeg;
pub mod sink;

pub use capture::MediaCapture;
pub use controller::{
    ButtonState, CAPTURE_FPS, FALLBACK_MIME, PREFERRED_MIME, RecordingController,
    recording_filename,
};
pub use error::{CaptureError, RecordError};
pub use ffmpeg::FfmpegCapture;
pub use sink::{DirectorySink, Download, DownloadSink, MemorySink};
