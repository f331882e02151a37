//! Metadata source specifications and their classification
//!
//! A [`Specification`] pairs a destination key with a source path. Before any
//! data is read, each one is classified against the project [`Roots`]: sources
//! inside the content root are *local* (their bytes are already in the
//! content set), everything else is *external* and read from disk. A final
//! path segment with an extension is a single file, anything else is a
//! directory.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::format::Format;

/// A destination key and the path its data comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specification {
    /// Dotted key in the metadata tree (`"nav.primary"`)
    pub key: String,

    /// Source path, relative to the project root
    pub path: String,
}

impl Specification {
    /// Create a specification
    pub fn new(key: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
        }
    }

    /// Work out where this specification's data lives.
    ///
    /// Only looks at paths; nothing is read. Fails with
    /// [`Error::UnsupportedFormat`] when the source looks like a file but its
    /// extension is not a supported data format.
    pub fn classify(&self, roots: &Roots) -> Result<Resolved> {
        validate_key(&self.key)?;

        let absolute = normalize(&roots.project.join(&self.path));
        let extension = absolute.extension().and_then(|ext| ext.to_str());

        let format = match extension {
            Some(ext) => Some(Format::from_extension(ext).ok_or_else(|| {
                Error::UnsupportedFormat {
                    key: self.key.clone(),
                    path: self.path.clone(),
                }
            })?),
            None => None,
        };

        let local = absolute.strip_prefix(&roots.content).ok().map(content_key);
        let target = match (local, format) {
            (Some(path), Some(format)) => Target::Local(LocalSource::File { path, format }),
            (Some(prefix), None) => Target::Local(LocalSource::Directory { prefix }),
            (None, Some(format)) => Target::External(ExternalSource::File {
                path: absolute,
                format,
            }),
            (None, None) => Target::External(ExternalSource::Directory { path: absolute }),
        };

        Ok(Resolved {
            key: self.key.clone(),
            source: self.path.clone(),
            target,
        })
    }
}

/// Absolute project root and content root
#[derive(Debug, Clone)]
pub struct Roots {
    /// Directory the specification paths are relative to
    pub project: PathBuf,

    /// Directory whose files make up the content set
    pub content: PathBuf,
}

impl Roots {
    /// Build roots from a project directory and a content directory relative to it
    pub fn new(project: impl AsRef<Path>, content: impl AsRef<Path>) -> Self {
        let project = normalize(project.as_ref());
        let content = normalize(&project.join(content));
        Self { project, content }
    }
}

/// The four kinds of metadata source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Single data file already in the content set
    LocalFile,
    /// Directory prefix within the content set
    LocalDirectory,
    /// Single data file read from disk
    ExternalFile,
    /// Directory tree read from disk
    ExternalDirectory,
}

impl Classification {
    /// Whether the source is served from the in-memory content set
    pub fn is_local(self) -> bool {
        matches!(self, Self::LocalFile | Self::LocalDirectory)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LocalFile => "local file",
            Self::LocalDirectory => "local directory",
            Self::ExternalFile => "external file",
            Self::ExternalDirectory => "external directory",
        })
    }
}

/// Where a classified source's data is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Served from the content set
    Local(LocalSource),
    /// Read from disk
    External(ExternalSource),
}

/// A source inside the content root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalSource {
    /// Content-set key of a data file
    File {
        /// `/`-separated path relative to the content root
        path: String,
        /// Format from the file extension
        format: Format,
    },
    /// Content-set prefix; empty for the content root itself
    Directory {
        /// `/`-separated path relative to the content root
        prefix: String,
    },
}

/// A source outside the content root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalSource {
    /// Data file on disk
    File {
        /// Absolute, normalized path
        path: PathBuf,
        /// Format from the file extension
        format: Format,
    },
    /// Directory on disk, walked recursively
    Directory {
        /// Absolute, normalized path
        path: PathBuf,
    },
}

impl ExternalSource {
    /// Absolute path of the file or directory
    pub fn path(&self) -> &Path {
        match self {
            Self::File { path, .. } | Self::Directory { path } => path,
        }
    }
}

/// A classified specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Destination key
    pub key: String,

    /// Source path as written in the specification
    pub source: String,

    /// Resolved location
    pub target: Target,
}

impl Resolved {
    /// The classification of the target
    pub fn classification(&self) -> Classification {
        match self.target {
            Target::Local(LocalSource::File { .. }) => Classification::LocalFile,
            Target::Local(LocalSource::Directory { .. }) => Classification::LocalDirectory,
            Target::External(ExternalSource::File { .. }) => Classification::ExternalFile,
            Target::External(ExternalSource::Directory { .. }) => {
                Classification::ExternalDirectory
            }
        }
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.split('.').any(str::is_empty) {
        return Err(Error::ConfigInvalid {
            message: format!("metadata key '{key}' has an empty segment"),
        });
    }
    Ok(())
}

/// Resolve `.` and `..` components without touching the filesystem
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn content_key(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
