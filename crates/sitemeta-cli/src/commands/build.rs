//! Build the metadata tree

use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;
use sitemeta_core::{Aggregator, Config, ContentSet, Metadata};

/// Run the build command
pub async fn run(
    config_path: &str,
    output: Option<&str>,
    compact: bool,
    timeout: Option<u64>,
) -> Result<()> {
    tracing::info!("Loading configuration from {}", config_path);

    let config = Config::load(config_path).context("Failed to load configuration")?;
    let roots = config.roots().context("Failed to resolve project roots")?;
    let specs = config
        .specifications()
        .context("Invalid metadata configuration")?;

    tracing::info!("Project: {}", config.project.name);

    let mut content = ContentSet::from_dir(&roots.content).with_context(|| {
        format!("Failed to load content from {}", roots.content.display())
    })?;
    let loaded = content.len();

    let mut aggregator = Aggregator::new(roots);
    if let Some(limit) = timeout
        .map(Duration::from_secs)
        .or_else(|| config.external_timeout())
    {
        aggregator = aggregator.with_timeout(limit);
    }

    let mut tree = Metadata::new();
    aggregator
        .run(&specs, &mut content, &mut tree)
        .await
        .context("Failed to load metadata")?;

    tracing::info!(
        "✓ {} content files left to render ({} consumed as data)",
        content.len(),
        loaded - content.len()
    );
    for (path, _) in content.iter() {
        tracing::debug!("  page: {}", path);
    }

    let tree = Value::Object(tree);
    let json = if compact {
        serde_json::to_string(&tree)?
    } else {
        serde_json::to_string_pretty(&tree)?
    };

    match output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("Failed to write {path}"))?;
            tracing::info!("✓ Wrote metadata to {}", path);
        }
        None => println!("{json}"),
    }

    Ok(())
}
