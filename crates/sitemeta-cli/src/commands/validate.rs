//! Validate configuration command

use anyhow::{Context, Result};
use sitemeta_core::Config;

/// Run the validate command
pub async fn run(config_path: &str) -> Result<()> {
    tracing::info!("Validating configuration: {}", config_path);

    let config = Config::load(config_path).context("Failed to load configuration")?;
    let roots = config.roots().context("Failed to resolve project roots")?;
    let specs = config
        .specifications()
        .context("Invalid metadata configuration")?;

    tracing::info!("✓ Project: {}", config.project.name);
    tracing::info!("✓ Content root: {}", roots.content.display());

    for spec in &specs {
        let resolved = spec
            .classify(&roots)
            .with_context(|| format!("Invalid metadata source '{}'", spec.key))?;
        tracing::info!(
            "✓ {} <- {} ({})",
            spec.key,
            spec.path,
            resolved.classification()
        );
    }

    tracing::info!("✓ {} metadata sources are valid", specs.len());
    Ok(())
}
