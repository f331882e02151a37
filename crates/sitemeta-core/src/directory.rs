//! Directory sources
//!
//! A local directory is a prefix of the content set and aggregates into an
//! array, in content-set order. An external directory is walked recursively
//! on disk and aggregates into an object keyed by each file's path relative
//! to the directory, extension stripped (`sub/b.yaml` becomes `"sub/b"`).

use std::path::{Component, Path, PathBuf};

use futures::future::try_join_all;
use serde_json::{Map, Value};

use crate::content::ContentStore;
use crate::error::{Error, Result};
use crate::format::Format;
use crate::reader::SourceReader;

/// Parse every data file under `prefix` in the content set.
///
/// Files without a data extension are skipped. Nothing is removed from the
/// content set. Fails with [`Error::EmptyDirectory`] when no data file
/// matches.
pub fn aggregate_local(key: &str, prefix: &str, content: &impl ContentStore) -> Result<Value> {
    let mut values = Vec::new();

    for path in content.paths() {
        if !under_prefix(&path, prefix) {
            continue;
        }
        let Some(format) = Format::from_path(&path) else {
            tracing::trace!("Skipping non-data file {}", path);
            continue;
        };
        let Some(file) = content.get(&path) else {
            continue;
        };
        tracing::debug!("Parsing {} for '{}'", path, key);
        values.push(format.parse(&file.contents, &path)?);
    }

    if values.is_empty() {
        return Err(Error::EmptyDirectory {
            key: key.to_string(),
            path: prefix.to_string(),
        });
    }

    Ok(Value::Array(values))
}

fn under_prefix(path: &str, prefix: &str) -> bool {
    prefix.is_empty()
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Data files under `dir`, paired with their format
pub async fn walk(reader: &dyn SourceReader, dir: &Path) -> Result<Vec<(PathBuf, Format)>> {
    let files = reader.list(dir).await?;
    Ok(files
        .into_iter()
        .filter_map(|file| Format::from_path(&file).map(|format| (file, format)))
        .collect())
}

/// Key of `file` within `dir`: the relative path without its extension,
/// components joined with `/`
pub fn entry_key(dir: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(dir).unwrap_or(file).with_extension("");
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Read and parse every data file below `dir`.
///
/// An empty directory yields an empty object and a warning. Files that map to
/// the same key (`a.json`, `a.yaml`) collide; the later one in walk order wins
/// and a warning names it.
pub async fn aggregate_external(
    reader: &dyn SourceReader,
    key: &str,
    dir: &Path,
) -> Result<Value> {
    let files = walk(reader, dir).await?;

    if files.is_empty() {
        tracing::warn!(
            "No data files found in {} for '{}'",
            dir.display(),
            key
        );
        return Ok(Value::Object(Map::new()));
    }

    let parsed = try_join_all(files.iter().map(|(file, format)| async move {
        let bytes = reader.read(file).await?;
        let value = format.parse(&bytes, &file.display().to_string())?;
        Ok::<_, Error>((entry_key(dir, file), file, value))
    }))
    .await?;

    let mut entries = Map::new();
    for (name, file, value) in parsed {
        if entries.insert(name.clone(), value).is_some() {
            tracing::warn!(
                "'{}' in {} for '{}' is replaced by {}",
                name,
                dir.display(),
                key,
                file.display()
            );
        }
    }

    Ok(Value::Object(entries))
}
