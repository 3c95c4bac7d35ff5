//! Capture backend that pipes raw RGBA frames into an `ffmpeg` child and
//! reads WebM back from its stdout.
//!
//! The child runs under a small tokio runtime owned by [`FfmpegCapture`]. A
//! reader task forwards stdout through a bounded channel that the render
//! thread drains after every frame.

use crate::{CaptureError, MediaCapture};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, Receiver, error::TryRecvError};
use tokio::task::JoinHandle;

const READ_CHUNK: usize = 64 * 1024;
/// Encoded chunks held between the reader task and the render thread.
const CHUNK_CAPACITY: usize = 256;

/// Encoder name for a WebM mime type.
fn encoder_for(mime: &str) -> Option<&'static str> {
    match mime {
        "video/webm;codecs=vp9" => Some("libvpx-vp9"),
        "video/webm;codecs=vp8" | "video/webm" => Some("libvpx"),
        _ => None,
    }
}

fn encoder_args(width: u32, height: u32, fps: u32, encoder: &str) -> Vec<String> {
    let mut args: Vec<String> = [
        "-hide_banner",
        "-loglevel",
        "error",
        "-nostats",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
        "-s",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    args.push(format!("{width}x{height}"));
    args.extend(["-r".to_string(), fps.to_string()]);
    args.extend(
        [
            "-i", "pipe:0", "-an", "-c:v", encoder, "-deadline", "realtime", "-pix_fmt",
            "yuv420p", "-f", "webm", "pipe:1",
        ]
        .iter()
        .map(|s| s.to_string()),
    );
    args
}

struct Session {
    child: Child,
    stdin: Option<ChildStdin>,
    chunks: Receiver<std::io::Result<Vec<u8>>>,
    reader: JoinHandle<()>,
    frame_len: usize,
}

impl Session {
    fn drain(&mut self) -> Result<Vec<Vec<u8>>, CaptureError> {
        let mut out = Vec::new();
        loop {
            match self.chunks.try_recv() {
                Ok(chunk) => out.push(chunk?),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return Ok(out),
            }
        }
    }

    /// Close stdin, collect everything ffmpeg still writes, then reap it.
    async fn finish(&mut self) -> Result<(Vec<Vec<u8>>, std::process::ExitStatus), CaptureError> {
        drop(self.stdin.take());
        let mut out = Vec::new();
        while let Some(chunk) = self.chunks.recv().await {
            out.push(chunk?);
        }
        if let Err(err) = (&mut self.reader).await {
            tracing::warn!(%err, "ffmpeg reader task failed");
        }
        let status = self.child.wait().await?;
        Ok((out, status))
    }
}

fn probe_encoders(runtime: &Runtime, program: &Path) -> Vec<&'static str> {
    let listing = runtime.block_on(
        Command::new(program)
            .args(["-hide_banner", "-encoders"])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output(),
    );
    match listing {
        Ok(output) if output.status.success() => {
            let text = String::from_utf8_lossy(&output.stdout);
            ["libvpx-vp9", "libvpx"]
                .into_iter()
                .filter(|name| text.split_whitespace().any(|word| word == *name))
                .collect()
        }
        Ok(output) => {
            tracing::warn!(status = %output.status, "ffmpeg encoder probe failed");
            Vec::new()
        }
        Err(err) => {
            tracing::warn!(program = %program.display(), %err, "ffmpeg not available");
            Vec::new()
        }
    }
}

/// `ffmpeg`-backed [`MediaCapture`].
pub struct FfmpegCapture {
    program: PathBuf,
    encoders: Vec<&'static str>,
    session: Option<Session>,
    runtime: Option<Runtime>,
}

impl FfmpegCapture {
    /// Probe `program` for the WebM encoders it offers. A missing binary
    /// yields a backend that reports itself unsupported.
    pub fn detect(program: impl Into<PathBuf>) -> Self {
        let program = program.into();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("ffmpeg-io")
            .enable_all()
            .build();
        let runtime = match runtime {
            Ok(runtime) => Some(runtime),
            Err(err) => {
                tracing::warn!(%err, "capture runtime unavailable");
                None
            }
        };
        let encoders = runtime
            .as_ref()
            .map(|rt| probe_encoders(rt, &program))
            .unwrap_or_default();
        tracing::info!(?encoders, "ffmpeg capture detected");
        Self {
            program,
            encoders,
            session: None,
            runtime,
        }
    }

    pub fn encoders(&self) -> &[&'static str] {
        &self.encoders
    }
}

impl MediaCapture for FfmpegCapture {
    fn is_supported(&self) -> bool {
        self.runtime.is_some() && !self.encoders.is_empty()
    }

    fn start(&mut self, mime: &str, width: u32, height: u32, fps: u32) -> Result<(), CaptureError> {
        let encoder = encoder_for(mime)
            .filter(|e| self.encoders.contains(e))
            .ok_or_else(|| CaptureError::UnsupportedMime(mime.to_string()))?;
        self.release();
        let runtime = self.runtime.as_ref().ok_or(CaptureError::NotRecording)?;

        // Child pipes register with the runtime's reactor.
        let _guard = runtime.enter();
        let mut child = Command::new(&self.program)
            .args(encoder_args(width, height, fps, encoder))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;
        let stdin = child.stdin.take();
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| CaptureError::Encoder("ffmpeg stdout unavailable".into()))?;

        let (tx, rx) = mpsc::channel(CHUNK_CAPACITY);
        let reader = runtime.spawn(async move {
            let mut buf = vec![0u8; READ_CHUNK];
            loop {
                match stdout.read(&mut buf).await {
                    Ok(0) => break,
                    Ok(n) => {
                        if tx.send(Ok(buf[..n].to_vec())).await.is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        let _ = tx.send(Err(err)).await;
                        break;
                    }
                }
            }
        });

        tracing::info!(encoder, width, height, fps, "ffmpeg started");
        self.session = Some(Session {
            child,
            stdin,
            chunks: rx,
            reader,
            frame_len: width as usize * height as usize * 4,
        });
        Ok(())
    }

    fn push_frame(&mut self, rgba: &[u8]) -> Result<(), CaptureError> {
        let session = self.session.as_mut().ok_or(CaptureError::NotRecording)?;
        let runtime = self.runtime.as_ref().ok_or(CaptureError::NotRecording)?;
        if rgba.len() != session.frame_len {
            return Err(CaptureError::FrameSize {
                expected: session.frame_len,
                got: rgba.len(),
            });
        }
        let stdin = session.stdin.as_mut().ok_or(CaptureError::NotRecording)?;
        runtime.block_on(stdin.write_all(rgba)).map_err(|err| {
            if err.kind() == std::io::ErrorKind::BrokenPipe {
                CaptureError::Encoder("ffmpeg exited while recording".into())
            } else {
                CaptureError::Io(err)
            }
        })
    }

    fn poll_chunks(&mut self) -> Result<Vec<Vec<u8>>, CaptureError> {
        match self.session.as_mut() {
            Some(session) => session.drain(),
            None => Ok(Vec::new()),
        }
    }

    fn stop(&mut self) -> Result<Vec<Vec<u8>>, CaptureError> {
        let mut session = self.session.take().ok_or(CaptureError::NotRecording)?;
        let runtime = self.runtime.as_ref().ok_or(CaptureError::NotRecording)?;
        let (chunks, status) = runtime.block_on(session.finish())?;
        if !status.success() {
            return Err(CaptureError::Encoder(format!("ffmpeg exited with {status}")));
        }
        tracing::info!(chunks = chunks.len(), "ffmpeg finished");
        Ok(chunks)
    }

    fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    fn release(&mut self) {
        if let Some(mut session) = self.session.take() {
            drop(session.stdin.take());
            session.reader.abort();
            if let Err(err) = session.child.start_kill() {
                tracing::debug!(%err, "ffmpeg already exited");
            }
            if let Some(runtime) = &self.runtime {
                let _ = runtime.block_on(session.child.wait());
            }
            tracing::debug!("capture stream released");
        }
    }
}

impl Drop for FfmpegCapture {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_maps_to_encoder() {
        assert_eq!(encoder_for("video/webm;codecs=vp9"), Some("libvpx-vp9"));
        assert_eq!(encoder_for("video/webm"), Some("libvpx"));
        assert_eq!(encoder_for("video/mp4"), None);
    }

    #[test]
    fn args_describe_raw_input_and_webm_output() {
        let args = encoder_args(640, 480, 30, "libvpx-vp9");
        let joined = args.join(" ");
        assert!(joined.contains("-pix_fmt rgba -s 640x480 -r 30 -i pipe:0"));
        assert!(joined.contains("-c:v libvpx-vp9"));
        assert!(joined.ends_with("-f webm pipe:1"));
    }

    #[test]
    fn missing_binary_is_unsupported() {
        let mut capture = FfmpegCapture::detect("/nonexistent/ffmpeg-binary");
        assert!(!capture.is_supported());
        assert!(matches!(
            capture.start("video/webm", 4, 4, 30),
            Err(CaptureError::UnsupportedMime(_))
        ));
        assert!(matches!(capture.push_frame(&[0; 64]), Err(CaptureError::NotRecording)));
        assert!(matches!(capture.stop(), Err(CaptureError::NotRecording)));
        assert!(capture.poll_chunks().unwrap().is_empty());
        capture.release();
        assert!(!capture.is_recording());
    }
}
