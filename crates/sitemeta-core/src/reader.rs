//! Disk access for external metadata sources
//!
//! External sources live outside the content root, so they are read here
//! rather than from the content set. [`SourceReader`] is the seam; the
//! coordinator only ever talks to the trait.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Reads files and lists directories for external sources
#[async_trait]
pub trait SourceReader: Send + Sync {
    /// Read a whole file
    async fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// List every file below `dir`, recursively, in a stable order
    async fn list(&self, dir: &Path) -> Result<Vec<PathBuf>>;
}

/// [`SourceReader`] backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

#[async_trait]
impl SourceReader for FsReader {
    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        tracing::debug!("Reading {}", path.display());
        tokio::fs::read(path).await.map_err(|e| Error::io(path, e))
    }

    async fn list(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let dir = dir.to_path_buf();
        tokio::task::spawn_blocking(move || walk_files(&dir))
            .await
            .map_err(|e| Error::io(PathBuf::new(), std::io::Error::other(e)))?
    }
}

fn walk_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            Error::io(path, e.into())
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    tracing::debug!("Found {} files under {}", files.len(), dir.display());
    Ok(files)
}
