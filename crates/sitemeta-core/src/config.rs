//! Configuration parsing and validation
//!
//! This module handles loading the `sitemeta.yaml` project file.
//!
//! # Configuration File
//!
//! ```yaml
//! name: my-site
//! source: src                 # content root, relative to the project
//! external_timeout_secs: 30   # optional limit per external source
//! metadata:                   # destination key -> source path
//!   site: ./src/data/site.json
//!   nav.primary: ../shared/nav.yaml
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::spec::{Roots, Specification};

/// Default project file name
pub const CONFIG_FILE: &str = "sitemeta.yaml";

/// Root project configuration from `sitemeta.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    pub name: String,

    /// Content root, relative to the project directory
    #[serde(default = "default_source")]
    pub source: String,

    /// Give up on an external source after this many seconds
    #[serde(default)]
    pub external_timeout_secs: Option<u64>,

    /// Metadata sources: destination key to source path, in file order
    #[serde(default)]
    pub metadata: serde_yaml::Mapping,
}

fn default_source() -> String {
    "src".to_string()
}

/// Main configuration container
#[derive(Debug, Clone)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Base path of the project
    pub base_path: PathBuf,
}

impl Config {
    /// Load configuration from a directory
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the project directory or sitemeta.yaml file
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let config = Config::load("./my-site")?;
    /// println!("Project: {}", config.project.name);
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let (config_path, base_path) = if path.is_dir() {
            (path.join(CONFIG_FILE), path.to_path_buf())
        } else {
            (
                path.to_path_buf(),
                path.parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or(Path::new("."))
                    .to_path_buf(),
            )
        };

        if !config_path.exists() {
            return Err(Error::ConfigNotFound {
                path: config_path.display().to_string(),
            });
        }

        let contents =
            std::fs::read_to_string(&config_path).map_err(|e| Error::io(&config_path, e))?;
        let project: ProjectConfig = serde_yaml::from_str(&contents)?;

        Ok(Self { project, base_path })
    }

    /// Metadata specifications in the order they appear in the file
    pub fn specifications(&self) -> Result<Vec<Specification>> {
        self.project
            .metadata
            .iter()
            .map(|(key, path)| {
                let key = key.as_str().ok_or_else(|| Error::ConfigInvalid {
                    message: format!("metadata key {key:?} must be a string"),
                })?;
                let path = path.as_str().ok_or_else(|| Error::ConfigInvalid {
                    message: format!("metadata source for '{key}' must be a path string"),
                })?;
                Ok::<_, Error>(Specification::new(key, path))
            })
            .collect()
    }

    /// Absolute project and content roots
    pub fn roots(&self) -> Result<Roots> {
        let project =
            std::path::absolute(&self.base_path).map_err(|e| Error::io(&self.base_path, e))?;
        Ok(Roots::new(project, &self.project.source))
    }

    /// Per-source timeout for external reads, if configured
    pub fn external_timeout(&self) -> Option<Duration> {
        self.project.external_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let yaml = r#"
name: test-site
"#;
        let config: ProjectConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.name, "test-site");
        assert_eq!(config.source, "src");
        assert!(config.external_timeout_secs.is_none());
        assert!(config.metadata.is_empty());
    }

    #[test]
    fn test_specifications_keep_file_order() {
        let yaml = r#"
name: test-site
source: content
metadata:
  site: ./content/site.json
  nav.primary: ../shared/nav.yaml
  authors: ./data/authors
"#;
        let config = Config {
            project: serde_yaml::from_str(yaml).unwrap(),
            base_path: PathBuf::from("/project"),
        };
        let specs = config.specifications().unwrap();
        assert_eq!(
            specs,
            vec![
                Specification::new("site", "./content/site.json"),
                Specification::new("nav.primary", "../shared/nav.yaml"),
                Specification::new("authors", "./data/authors"),
            ]
        );

        let roots = config.roots().unwrap();
        assert_eq!(roots.content, PathBuf::from("/project/content"));
    }

    #[test]
    fn test_non_string_source_rejected() {
        let yaml = r#"
name: test-site
metadata:
  site: 42
"#;
        let config = Config {
            project: serde_yaml::from_str(yaml).unwrap(),
            base_path: PathBuf::from("."),
        };
        assert!(matches!(
            config.specifications(),
            Err(Error::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "name: test\nexternal_timeout_secs: 10\n",
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.project.name, "test");
        assert_eq!(config.base_path, dir.path());
        assert_eq!(config.external_timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("custom.yaml");
        std::fs::write(&file, "name: custom\n").unwrap();

        let config = Config::load(&file).unwrap();
        assert_eq!(config.project.name, "custom");
        assert_eq!(config.base_path, dir.path());
    }

    #[test]
    fn test_load_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = Config::load(dir.path());
        assert!(matches!(result, Err(Error::ConfigNotFound { .. })));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "name: [unclosed\n").unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(Error::ConfigParse(_))
        ));
    }
}
