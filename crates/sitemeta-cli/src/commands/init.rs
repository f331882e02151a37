//! Initialize a new sitemeta project

use anyhow::Result;
use sitemeta_core::config::CONFIG_FILE;
use std::fs;
use std::path::Path;

/// Run the init command
pub async fn run(path: &str, name: Option<&str>) -> Result<()> {
    let project_dir = Path::new(path);

    // Create directory if it doesn't exist
    if !project_dir.exists() {
        fs::create_dir_all(project_dir)?;
    }

    // Get absolute path for deriving name
    let abs_path = project_dir.canonicalize()?;

    // Derive project name from directory name if not provided
    let project_name = match name {
        Some(n) => n.to_string(),
        None => abs_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("Could not determine project name from path"))?,
    };

    // Check if already initialized
    if project_dir.join(CONFIG_FILE).exists() {
        anyhow::bail!(
            "Directory '{}' already contains a {}",
            project_dir.display(),
            CONFIG_FILE
        );
    }

    tracing::info!("Creating new sitemeta project: {}", project_name);

    // Create directory structure
    fs::create_dir_all(project_dir.join("src/data/authors"))?;
    fs::create_dir_all(project_dir.join("data"))?;

    // Create sitemeta.yaml
    let config = format!(
        r#"# sitemeta project configuration
name: {project_name}

# Content root; files in here are rendered as pages
source: src

# Destination key -> data file or directory.
# Paths inside the content root are read from the loaded content,
# everything else from disk. Dotted keys nest: nav.primary -> nav.primary
metadata:
  site: ./src/data/site.json
  authors: ./src/data/authors
  nav.primary: ./data/nav.yaml
"#
    );
    fs::write(project_dir.join(CONFIG_FILE), config)?;

    // Create example page and data
    fs::write(project_dir.join("src/index.md"), "# {{ site.title }}\n")?;
    fs::write(
        project_dir.join("src/data/site.json"),
        serde_json::to_string_pretty(&serde_json::json!({ "title": project_name }))? + "\n",
    )?;
    fs::write(
        project_dir.join("src/data/authors/example.yaml"),
        "name: Example Author\nemail: author@example.com\n",
    )?;
    fs::write(
        project_dir.join("data/nav.yaml"),
        "- title: Home\n  url: /\n- title: About\n  url: /about/\n",
    )?;

    tracing::info!(
        "✓ Created project '{}' at {}",
        project_name,
        abs_path.display()
    );
    tracing::info!("");
    tracing::info!("Next steps:");
    if path != "." {
        tracing::info!("  cd {}", project_dir.display());
    }
    tracing::info!("  sitemeta validate    # Check configuration");
    tracing::info!("  sitemeta build       # Print the metadata tree");

    Ok(())
}
