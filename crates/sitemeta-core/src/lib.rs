//! sitemeta Core Library
//!
//! This crate loads site data into a single metadata tree for templates:
//! - Project configuration (`sitemeta.yaml`)
//! - Source classification (local content vs. external disk, file vs. directory)
//! - JSON, YAML and TOML parsing
//! - Dotted-key placement into the tree
//! - Aggregation of every source, external reads running concurrently
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Config    │────▶│  Aggregator │────▶│  Metadata   │
//! │   (YAML)    │     │ local + disk│     │    tree     │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            ▲
//!                     ┌──────┴──────┐
//!                     │ Content set │
//!                     └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use sitemeta_core::{Aggregator, Config, ContentSet, Metadata};
//!
//! let config = Config::load("./my-site")?;
//! let roots = config.roots()?;
//! let mut content = ContentSet::from_dir(&roots.content)?;
//! let mut tree = Metadata::new();
//! Aggregator::new(roots)
//!     .run(&config.specifications()?, &mut content, &mut tree)
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod content;
pub mod coordinator;
pub mod directory;
pub mod error;
pub mod format;
pub mod reader;
pub mod spec;
pub mod tree;

pub use config::{Config, ProjectConfig};
pub use content::{ContentFile, ContentSet, ContentStore};
pub use coordinator::{Aggregator, Completion, Stage};
pub use error::{Error, Result};
pub use format::Format;
pub use reader::{FsReader, SourceReader};
pub use spec::{Classification, Roots, Specification};
pub use tree::Metadata;
