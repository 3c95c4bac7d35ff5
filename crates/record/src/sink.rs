use crate::RecordError;
use std::path::{Path, PathBuf};

/// Destination for finished recordings.
pub trait DownloadSink {
    fn save(&mut self, filename: &str, mime: &str, bytes: &[u8]) -> Result<(), RecordError>;
}

/// Writes recordings into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn save(&mut self, filename: &str, mime: &str, bytes: &[u8]) -> Result<(), RecordError> {
        let path = self.dir.join(filename);
        let write = || {
            std::fs::create_dir_all(&self.dir)?;
            std::fs::write(&path, bytes)
        };
        write().map_err(|source| RecordError::Save {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), mime, bytes = bytes.len(), "recording saved");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Keeps recordings in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub downloads: Vec<Download>,
}

impl DownloadSink for MemorySink {
    fn save(&mut self, filename: &str, mime: &str, bytes: &[u8]) -> Result<(), RecordError> {
        self.downloads.push(Download {
            filename: filename.to_string(),
            mime: mime.to_string(),
            bytes: bytes.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_sink_creates_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("recordings");
        let mut sink = DirectorySink::new(&dir);
        sink.save("a.webm", "video/webm", b"abc").unwrap();
        assert_eq!(std::fs::read(dir.join("a.webm")).unwrap(), b"abc");
    }

    #[test]
    fn directory_sink_reports_path_on_failure() {
        let tmp = tempfile::tempdir().unwrap();
        // A file where the directory should be.
        let blocker = tmp.path().join("blocked");
        std::fs::write(&blocker, b"").unwrap();
        let mut sink = DirectorySink::new(&blocker);
        let err = sink.save("a.webm", "video/webm", b"abc").unwrap_err();
        assert!(matches!(err, RecordError::Save { path, .. } if path.ends_with("a.webm")));
    }
}
