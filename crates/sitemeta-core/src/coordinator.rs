//! Aggregation of all metadata sources into one tree
//!
//! An [`Aggregator`] runs once per build and moves through a fixed sequence
//! of [`Stage`]s:
//!
//! ```text
//! Idle -> Classifying -> LocalResolving -> ExternalDispatched -> AllSettled -> Done
//! ```
//!
//! Every specification is classified before anything is read, so an
//! unsupported format fails without I/O. Local sources are resolved in order
//! against the content set; the first local error ends the run before any
//! disk read starts. External sources are then read concurrently and joined.
//! Their results are written to the tree only after all of them settled, on
//! the calling task, in specification order.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde_json::Value;

use crate::content::ContentStore;
use crate::directory;
use crate::error::{Error, Result};
use crate::reader::{FsReader, SourceReader};
use crate::spec::{ExternalSource, LocalSource, Resolved, Roots, Specification, Target};
use crate::tree::{self, Metadata};

/// Progress of an [`Aggregator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    /// Not started
    Idle,
    /// Classifying specifications
    Classifying,
    /// Resolving sources from the content set
    LocalResolving,
    /// External reads in flight
    ExternalDispatched,
    /// Every external read finished
    AllSettled,
    /// Finished, successfully or not
    Done,
}

/// Callback that fires at most once
pub struct Completion<F>
where
    F: FnOnce(Result<()>),
{
    callback: Option<F>,
}

impl<F> Completion<F>
where
    F: FnOnce(Result<()>),
{
    /// Wrap `callback`
    pub fn new(callback: F) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    /// Invoke the callback with `result`.
    ///
    /// Returns `false` and drops `result` if the callback already fired.
    pub fn fire(&mut self, result: Result<()>) -> bool {
        match self.callback.take() {
            Some(callback) => {
                callback(result);
                true
            }
            None => {
                tracing::debug!("Completion already fired, ignoring {:?}", result.err());
                false
            }
        }
    }

    /// Whether the callback has fired
    pub fn is_fired(&self) -> bool {
        self.callback.is_none()
    }
}

/// Loads metadata specifications into a [`Metadata`] tree
pub struct Aggregator {
    roots: Roots,
    reader: Arc<dyn SourceReader>,
    timeout: Option<Duration>,
    stage: Stage,
}

impl Aggregator {
    /// Create an aggregator reading external sources from the filesystem
    pub fn new(roots: Roots) -> Self {
        Self {
            roots,
            reader: Arc::new(FsReader),
            timeout: None,
            stage: Stage::Idle,
        }
    }

    /// Read external sources through `reader` instead
    pub fn with_reader(mut self, reader: Arc<dyn SourceReader>) -> Self {
        self.reader = reader;
        self
    }

    /// Fail an external source that takes longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Current stage
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Resolve every specification and merge the results into `tree`.
    ///
    /// Local single-file sources are removed from `content`. Returns the
    /// first error; entries merged before a local failure stay in the tree.
    pub async fn run(
        &mut self,
        specs: &[Specification],
        content: &mut impl ContentStore,
        tree: &mut Metadata,
    ) -> Result<()> {
        if self.stage != Stage::Idle {
            return Err(Error::AlreadyRun);
        }

        let result = self.execute(specs, content, tree).await;
        self.advance(Stage::Done);

        match &result {
            Ok(()) => tracing::info!("Loaded {} metadata sources", specs.len()),
            Err(e) => tracing::error!("Metadata aggregation failed: {}", e),
        }
        result
    }

    /// [`run`](Self::run), reporting the outcome through `completion`
    pub async fn run_with<F>(
        &mut self,
        specs: &[Specification],
        content: &mut impl ContentStore,
        tree: &mut Metadata,
        mut completion: Completion<F>,
    ) where
        F: FnOnce(Result<()>),
    {
        let result = self.run(specs, content, tree).await;
        completion.fire(result);
    }

    async fn execute(
        &mut self,
        specs: &[Specification],
        content: &mut impl ContentStore,
        tree: &mut Metadata,
    ) -> Result<()> {
        self.advance(Stage::Classifying);
        let resolved = specs
            .iter()
            .map(|spec| spec.classify(&self.roots))
            .collect::<Result<Vec<_>>>()?;

        self.advance(Stage::LocalResolving);
        let mut external = Vec::new();
        for entry in &resolved {
            match &entry.target {
                Target::Local(source) => resolve_local(entry, source, content, tree)?,
                Target::External(source) => external.push((entry, source)),
            }
        }

        self.advance(Stage::ExternalDispatched);
        tracing::debug!("Dispatching {} external sources", external.len());
        let settled = join_all(
            external
                .iter()
                .map(|(entry, source)| self.resolve_external(entry, source)),
        )
        .await;

        self.advance(Stage::AllSettled);
        let mut first_error = None;
        let mut values = Vec::with_capacity(settled.len());
        for ((entry, _), result) in external.iter().zip(settled) {
            match result {
                Ok(value) => values.push((entry.key.as_str(), value)),
                Err(e) => {
                    tracing::error!("Failed to load metadata for '{}': {}", entry.key, e);
                    first_error.get_or_insert(e);
                }
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        for (key, value) in values {
            tree::place(tree, key, value);
        }
        Ok(())
    }

    async fn resolve_external(&self, entry: &Resolved, source: &ExternalSource) -> Result<Value> {
        let reader = self.reader.as_ref();
        let load = async {
            match source {
                ExternalSource::File { path, format } => {
                    let bytes = reader.read(path).await?;
                    format.parse(&bytes, &path.display().to_string())
                }
                ExternalSource::Directory { path } => {
                    directory::aggregate_external(reader, &entry.key, path).await
                }
            }
        };

        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, load)
                .await
                .unwrap_or_else(|_| {
                    Err(Error::Timeout {
                        key: entry.key.clone(),
                        path: entry.source.clone(),
                        limit,
                    })
                }),
            None => load.await,
        };

        result.map_err(|e| missing_source(e, entry, source.path()))
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(next > self.stage, "stage {:?} after {:?}", next, self.stage);
        tracing::debug!("Aggregation stage {:?} -> {:?}", self.stage, next);
        self.stage = next;
    }
}

fn resolve_local(
    entry: &Resolved,
    source: &LocalSource,
    content: &mut impl ContentStore,
    tree: &mut Metadata,
) -> Result<()> {
    match source {
        LocalSource::File { path, format } => {
            let file = content.get(path).ok_or_else(|| Error::NotFound {
                key: entry.key.clone(),
                path: entry.source.clone(),
            })?;
            let value = format.parse(&file.contents, path)?;
            tree::place(tree, &entry.key, value);
            content.remove(path);
            tracing::debug!("Loaded '{}' from {}", entry.key, path);
        }
        LocalSource::Directory { prefix } => {
            let value = directory::aggregate_local(&entry.key, prefix, content)?;
            tree::place(tree, &entry.key, value);
            tracing::debug!("Loaded '{}' from directory {}", entry.key, entry.source);
        }
    }
    Ok(())
}

fn missing_source(err: Error, entry: &Resolved, target: &Path) -> Error {
    match err {
        Error::Io { ref path, ref source }
            if source.kind() == std::io::ErrorKind::NotFound && path == target =>
        {
            Error::NotFound {
                key: entry.key.clone(),
                path: entry.source.clone(),
            }
        }
        other => other,
    }
}
