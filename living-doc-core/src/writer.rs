//! Filesystem implementation of [`DocumentWriter`].

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::contract::DocumentWriter;

/// Writes straight to the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsWriter;

impl DocumentWriter for FsWriter {
    fn write(&self, path: &Path, content: &str) -> std::io::Result<()> {
        fs::write(path, content)?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "Wrote file");
        Ok(())
    }

    fn ensure_directory(&self, path: &Path) -> std::io::Result<()> {
        fs::create_dir_all(path)
    }

    fn remove_tree(&self, path: &Path) -> std::io::Result<()> {
        match fs::remove_dir_all(path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Removed existing output tree");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
