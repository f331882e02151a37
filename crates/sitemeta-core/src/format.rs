//! Data format detection and parsing
//!
//! Every supported format decodes into a [`serde_json::Value`], so the same
//! document written as JSON, YAML or TOML yields an identical value.

use std::fmt;
use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};

/// Serialization format of a data file, taken from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// `.json`
    Json,
    /// `.yaml` or `.yml`
    Yaml,
    /// `.toml`
    Toml,
}

impl Format {
    /// Match an extension (without the dot). Matching is case-sensitive.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// Format of the file at `path`, if its last dot-segment is recognized
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Decode `bytes` read from `path`.
    ///
    /// `path` is only used to name the file in [`Error::MalformedData`].
    pub fn parse(self, bytes: &[u8], path: &str) -> Result<Value> {
        let parsed = match self {
            Format::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
            Format::Yaml => parse_yaml(bytes),
            Format::Toml => std::str::from_utf8(bytes)
                .map_err(|e| e.to_string())
                .and_then(|text| toml::from_str::<toml::Table>(text).map_err(|e| e.to_string()))
                .and_then(|table| toml_to_json(toml::Value::Table(table))),
        };

        parsed.map_err(|message| Error::MalformedData {
            path: path.to_string(),
            format: self,
            message,
        })
    }
}

/// YAML with `<<` merge keys expanded
fn parse_yaml(bytes: &[u8]) -> std::result::Result<Value, String> {
    let mut value: serde_yaml::Value = serde_yaml::from_slice(bytes).map_err(|e| e.to_string())?;
    value.apply_merge().map_err(|e| e.to_string())?;
    serde_json::to_value(value).map_err(|e| e.to_string())
}

/// Convert a `toml::Value`, rendering datetimes as their TOML text
fn toml_to_json(value: toml::Value) -> std::result::Result<Value, String> {
    let json = match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .ok_or_else(|| format!("float {f} has no JSON representation"))?,
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(toml_to_json)
                .collect::<std::result::Result<_, _>>()?,
        ),
        toml::Value::Table(table) => {
            let mut map = serde_json::Map::new();
            for (k, v) in table {
                map.insert(k, toml_to_json(v)?);
            }
            Value::Object(map)
        }
    };

    Ok(json)
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Json => "JSON",
            Format::Yaml => "YAML",
            Format::Toml => "TOML",
        })
    }
}
