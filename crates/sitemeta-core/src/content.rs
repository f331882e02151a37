//! In-memory content set
//!
//! The page pipeline owns the content set: every file under the content root,
//! keyed by its `/`-separated path relative to that root. The aggregation
//! engine only reads entries and removes the ones it consumes as data, through
//! the [`ContentStore`] trait.

use std::collections::HashMap;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A file in the content set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentFile {
    /// Raw file bytes
    pub contents: Vec<u8>,

    /// Per-file metadata set by the page pipeline
    pub metadata: Map<String, Value>,
}

impl ContentFile {
    /// Create a file record with no metadata
    pub fn new(contents: impl Into<Vec<u8>>) -> Self {
        Self {
            contents: contents.into(),
            metadata: Map::new(),
        }
    }
}

/// Access to the content set needed by the aggregation engine
pub trait ContentStore {
    /// Look up a file by content-root-relative path
    fn get(&self, path: &str) -> Option<&ContentFile>;

    /// Remove a file so it is not rendered as a page
    fn remove(&mut self, path: &str) -> Option<ContentFile>;

    /// All paths, in discovery order
    fn paths(&self) -> Vec<String>;
}

/// Insertion-ordered content set
#[derive(Debug, Clone, Default)]
pub struct ContentSet {
    order: Vec<String>,
    files: HashMap<String, ContentFile>,
}

impl ContentSet {
    /// Create an empty content set
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every file below `root`, in file-name order per directory
    pub fn from_dir(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let mut set = Self::new();

        for entry in walkdir::WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                Error::io(path, e.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let key = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let contents =
                std::fs::read(entry.path()).map_err(|e| Error::io(entry.path(), e))?;
            set.insert(key, ContentFile::new(contents));
        }

        tracing::debug!("Loaded {} content files from {}", set.len(), root.display());
        Ok(set)
    }

    /// Add or replace a file. A replaced file keeps its original position.
    pub fn insert(&mut self, path: impl Into<String>, file: ContentFile) {
        let path = path.into();
        if self.files.insert(path.clone(), file).is_none() {
            self.order.push(path);
        }
    }

    /// Whether `path` is in the set
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Number of files
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the set has no files
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate files in discovery order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContentFile)> {
        self.order
            .iter()
            .filter_map(|path| self.files.get(path).map(|file| (path.as_str(), file)))
    }
}

impl ContentStore for ContentSet {
    fn get(&self, path: &str) -> Option<&ContentFile> {
        self.files.get(path)
    }

    fn remove(&mut self, path: &str) -> Option<ContentFile> {
        let file = self.files.remove(path)?;
        self.order.retain(|p| p != path);
        Some(file)
    }

    fn paths(&self) -> Vec<String> {
        self.order.clone()
    }
}

impl<P: Into<String>> FromIterator<(P, ContentFile)> for ContentSet {
    fn from_iter<I: IntoIterator<Item = (P, ContentFile)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (path, file) in iter {
            set.insert(path, file);
        }
        set
    }
}
