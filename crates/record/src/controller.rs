use crate::{CaptureError, DownloadSink, MediaCapture, RecordError};
use chrono::{DateTime, SecondsFormat, Utc};

/// Preferred encoding; falls back once to [`FALLBACK_MIME`].
pub const PREFERRED_MIME: &str = "video/webm;codecs=vp9";
pub const FALLBACK_MIME: &str = "video/webm";
/// Rate at which frames are handed to the capture backend.
pub const CAPTURE_FPS: u32 = 30;

/// Enabled state of the Start and Stop buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonState {
    pub start_enabled: bool,
    pub stop_enabled: bool,
}

impl ButtonState {
    pub const IDLE: Self = Self {
        start_enabled: true,
        stop_enabled: false,
    };
    pub const RECORDING: Self = Self {
        start_enabled: false,
        stop_enabled: true,
    };
}

/// `recording-<ISO-8601 UTC>.webm` with `:` and `.` replaced by `-`.
pub fn recording_filename(now: DateTime<Utc>) -> String {
    let stamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("recording-{stamp}.webm")
}

/// Drives one capture backend from the two recording buttons.
pub struct RecordingController<C, S> {
    capture: C,
    sink: S,
    buttons: ButtonState,
    mime: Option<&'static str>,
    chunks: Vec<Vec<u8>>,
    alerts: Vec<String>,
    since_frame: f32,
}

impl<C: MediaCapture, S: DownloadSink> RecordingController<C, S> {
    pub fn new(capture: C, sink: S) -> Self {
        Self {
            capture,
            sink,
            buttons: ButtonState::IDLE,
            mime: None,
            chunks: Vec::new(),
            alerts: Vec::new(),
            since_frame: 0.0,
        }
    }

    pub fn buttons(&self) -> ButtonState {
        self.buttons
    }

    pub fn is_recording(&self) -> bool {
        self.mime.is_some()
    }

    /// Mime type of the recording in progress.
    pub fn mime(&self) -> Option<&'static str> {
        self.mime
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// User-facing messages raised since the last call.
    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    /// Start button handler.
    pub fn start(&mut self, width: u32, height: u32) -> Result<(), RecordError> {
        tracing::info!(width, height, "start recording requested");
        if self.is_recording() {
            return Err(RecordError::AlreadyRecording);
        }
        if !self.capture.is_supported() {
            self.alert("Screen capture is not supported on this system.");
            self.reset();
            return Err(RecordError::Unsupported);
        }

        let mime = match self.capture.start(PREFERRED_MIME, width, height, CAPTURE_FPS) {
            Ok(()) => PREFERRED_MIME,
            Err(err) => {
                tracing::warn!(%err, "preferred codec unavailable, trying without codec");
                if let Err(err) = self.capture.start(FALLBACK_MIME, width, height, CAPTURE_FPS) {
                    tracing::error!(%err, "recorder setup failed");
                    self.alert("Recorder setup failed. Check the log for errors.");
                    self.capture.release();
                    self.reset();
                    return Err(RecordError::Setup(err));
                }
                FALLBACK_MIME
            }
        };

        self.chunks.clear();
        self.mime = Some(mime);
        self.since_frame = 0.0;
        self.buttons = ButtonState::RECORDING;
        tracing::info!(mime, "recording started");
        Ok(())
    }

    /// Number of capture intervals at [`CAPTURE_FPS`] that elapsed in
    /// `delta` seconds. A slow frame yields several, so the stream keeps
    /// real-time length when rendering falls below the capture rate.
    pub fn frame_due(&mut self, delta: f32) -> u32 {
        if !self.is_recording() {
            return 0;
        }
        self.since_frame += delta.max(0.0);
        let interval = 1.0 / CAPTURE_FPS as f32;
        let due = (self.since_frame / interval).floor();
        self.since_frame -= due * interval;
        due as u32
    }

    /// Hand one rendered frame to the backend `copies` times and collect
    /// any finished chunks. Backend failures end the recording.
    pub fn capture_frame(&mut self, rgba: &[u8], copies: u32) -> Result<(), RecordError> {
        if !self.is_recording() || copies == 0 {
            return Ok(());
        }
        let mut result = Ok(());
        for _ in 0..copies {
            result = self.capture.push_frame(rgba);
            if result.is_err() {
                break;
            }
        }
        match result.and_then(|()| self.capture.poll_chunks()) {
            Ok(chunks) => {
                self.collect(chunks);
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Stop button handler. Returns the saved file name, if any.
    pub fn stop(&mut self) -> Result<Option<String>, RecordError> {
        tracing::info!("stop recording requested");
        let Some(mime) = self.mime else {
            tracing::info!("recorder not recording");
            self.reset();
            return Ok(None);
        };

        let chunks = match self.capture.stop() {
            Ok(chunks) => chunks,
            Err(err) => return Err(self.fail(err)),
        };
        self.collect(chunks);
        self.capture.release();

        let bytes = std::mem::take(&mut self.chunks).concat();
        self.reset();
        if bytes.is_empty() {
            tracing::warn!("recording produced no data, nothing saved");
            return Ok(None);
        }

        let filename = recording_filename(Utc::now());
        if let Err(err) = self.sink.save(&filename, mime, &bytes) {
            tracing::error!(%err, "saving recording failed");
            self.alert(format!("Saving the recording failed: {err}"));
            return Err(err);
        }
        tracing::info!(%filename, bytes = bytes.len(), "recording finished");
        Ok(Some(filename))
    }

    fn collect(&mut self, chunks: Vec<Vec<u8>>) {
        for chunk in chunks.into_iter().filter(|c| !c.is_empty()) {
            tracing::debug!(size = chunk.len(), "chunk received");
            self.chunks.push(chunk);
        }
    }

    /// Abandon the recording after a backend error.
    fn fail(&mut self, err: CaptureError) -> RecordError {
        tracing::error!(%err, "recorder error");
        self.alert(format!("Recorder error: {err}"));
        if self.capture.is_recording() {
            if let Err(err) = self.capture.stop() {
                tracing::warn!(%err, "stopping failed recorder");
            }
        }
        self.capture.release();
        self.chunks.clear();
        self.reset();
        RecordError::Capture(err)
    }

    fn reset(&mut self) {
        self.mime = None;
        self.buttons = ButtonState::IDLE;
    }

    fn alert(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(%message, "alert");
        self.alerts.push(message);
    }
}
