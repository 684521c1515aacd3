//! Persistence of finished mosaics.
//!
//! The scanner hands each completed [`Mosaic`] to an [`ImageSink`] by
//! value. Sinks run on a blocking thread, so they may do synchronous I/O.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;
use tracing::info;

use crate::mosaic::Mosaic;

/// Errors raised while persisting a mosaic.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Filesystem failure (directory creation, permissions, disk full).
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Image encoding failed.
    #[error("failed to encode {}: {reason}", path.display())]
    Encode { path: PathBuf, reason: String },

    /// The blocking save task panicked or was cancelled.
    #[error("save task failed: {0}")]
    Task(String),
}

/// Receives finished mosaics.
pub trait ImageSink: Send + Sync {
    /// Persists `mosaic` under `name`.
    fn save(&self, name: &str, mosaic: Mosaic) -> Result<(), SinkError>;
}

/// Writes each mosaic as `{directory}/{name}.png`.
#[derive(Debug, Clone)]
pub struct PngDirectorySink {
    directory: PathBuf,
}

impl PngDirectorySink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path a mosaic named `name` is written to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{}.png", name))
    }
}

impl ImageSink for PngDirectorySink {
    fn save(&self, name: &str, mosaic: Mosaic) -> Result<(), SinkError> {
        fs::create_dir_all(&self.directory).map_err(|e| SinkError::Io {
            path: self.directory.clone(),
            source: e,
        })?;

        let path = self.path_for(name);
        mosaic
            .into_image()
            .save_with_format(&path, image::ImageFormat::Png)
            .map_err(|e| match e {
                image::ImageError::IoError(source) => SinkError::Io {
                    path: path.clone(),
                    source,
                },
                other => SinkError::Encode {
                    path: path.clone(),
                    reason: other.to_string(),
                },
            })?;

        info!(path = %path.display(), "Mosaic saved");
        Ok(())
    }
}

/// Keeps mosaics in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    saved: Mutex<Vec<(String, Mosaic)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of saved mosaics, in arrival order.
    pub fn names(&self) -> Vec<String> {
        self.saved.lock().iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.saved.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.lock().is_empty()
    }

    /// Removes and returns everything saved so far.
    pub fn take(&self) -> Vec<(String, Mosaic)> {
        std::mem::take(&mut *self.saved.lock())
    }
}

impl ImageSink for MemorySink {
    fn save(&self, name: &str, mosaic: Mosaic) -> Result<(), SinkError> {
        self.saved.lock().push((name.to_string(), mosaic));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::TileIndex;
    use crate::mosaic::SubGrid;
    use crate::provider::TileLayer;

    fn mosaic(w: u32, h: u32) -> Mosaic {
        Mosaic::blank(SubGrid::new(
            TileIndex::new(7, 9, 12),
            w,
            h,
            TileLayer::Satellite,
        ))
    }

    #[test]
    fn test_png_sink_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = PngDirectorySink::new(dir.path());

        sink.save("7-9", mosaic(2, 1)).unwrap();

        let path = dir.path().join("7-9.png");
        assert!(path.exists());
        let reloaded = image::open(&path).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (512, 256));
    }

    #[test]
    fn test_png_sink_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("z20");
        let sink = PngDirectorySink::new(&nested);

        sink.save("1-2", mosaic(1, 1)).unwrap();

        assert!(nested.join("1-2.png").exists());
    }

    #[test]
    fn test_png_sink_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the output directory should be
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, b"x").unwrap();
        let sink = PngDirectorySink::new(&blocker);

        let err = sink.save("1-2", mosaic(1, 1)).unwrap_err();
        assert!(matches!(err, SinkError::Io { .. }), "got {:?}", err);
    }

    #[test]
    fn test_path_for() {
        let sink = PngDirectorySink::new("/tmp/tiles");
        assert_eq!(sink.path_for("3-4"), PathBuf::from("/tmp/tiles/3-4.png"));
    }

    #[test]
    fn test_memory_sink_collects_in_order() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.save("a", mosaic(1, 1)).unwrap();
        sink.save("b", mosaic(1, 1)).unwrap();

        assert_eq!(sink.names(), vec!["a", "b"]);
        assert_eq!(sink.take().len(), 2);
        assert!(sink.is_empty());
    }
}
