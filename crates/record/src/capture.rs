use crate::CaptureError;

/// A backend that turns raw RGBA frames into encoded video chunks.
///
/// One recording at a time: `start`, any number of `push_frame` and
/// `poll_chunks` calls, then `stop`. `release` frees the underlying stream
/// and is safe to call in any state.
pub trait MediaCapture {
    /// Whether the backend can record at all.
    fn is_supported(&self) -> bool;

    /// Begin a recording encoded as `mime`. Fails with
    /// [`CaptureError::UnsupportedMime`] when the format is unavailable.
    fn start(&mut self, mime: &str, width: u32, height: u32, fps: u32) -> Result<(), CaptureError>;

    /// Feed one tightly packed RGBA frame of the size given to `start`.
    fn push_frame(&mut self, rgba: &[u8]) -> Result<(), CaptureError>;

    /// Encoded chunks produced since the last call.
    fn poll_chunks(&mut self) -> Result<Vec<Vec<u8>>, CaptureError>;

    /// Finish encoding and return the remaining chunks.
    fn stop(&mut self) -> Result<Vec<Vec<u8>>, CaptureError>;

    fn is_recording(&self) -> bool;

    fn release(&mut self);
}
