//! Saves partial translations.

use log::trace;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Somewhere to save the translated prefix of a document while the rest
/// is still being translated.
pub trait Checkpoint {
    /// Saves `document`, replacing any earlier checkpoint.
    fn save(&self, document: &str) -> io::Result<()>;
}

impl<C: Checkpoint> Checkpoint for &C {
    fn save(&self, document: &str) -> io::Result<()> {
        (**self).save(document)
    }
}

/// Discards checkpoints.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCheckpoint;

impl Checkpoint for NoCheckpoint {
    fn save(&self, _document: &str) -> io::Result<()> {
        Ok(())
    }
}

/// Writes files atomically.
///
/// Contents are written to a temporary file in the destination's
/// directory, which is then renamed over the destination. Readers see
/// either the old file or the new one, never a partial write.
#[derive(Clone, Debug)]
pub struct AtomicWriter {
    path: PathBuf,
}

impl AtomicWriter {
    /// Creates a writer for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self { path }
    }

    /// The destination file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the destination file's contents with `contents`.
    pub fn write(&self, contents: &str) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(contents.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|err| err.error)?;
        trace!("wrote {} bytes to {}", contents.len(), self.path.display());
        Ok(())
    }
}

impl Checkpoint for AtomicWriter {
    fn save(&self, document: &str) -> io::Result<()> {
        self.write(document)
    }
}
