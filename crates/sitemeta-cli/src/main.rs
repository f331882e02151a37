//! sitemeta CLI
//!
//! Developer tool for loading site data files into a metadata tree.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// sitemeta - Site metadata from JSON, YAML and TOML files
#[derive(Parser)]
#[command(name = "sitemeta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "sitemeta.yaml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new sitemeta project
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,

        /// Project name (defaults to directory name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Check every metadata source without reading it
    Validate,

    /// Load all metadata sources and write the merged tree as JSON
    Build {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Emit compact JSON
        #[arg(long)]
        compact: bool,

        /// Seconds to wait for each external source (overrides the config)
        #[arg(long)]
        timeout: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // stdout carries the JSON tree
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Init { path, name } => {
            commands::init::run(&path, name.as_deref()).await?;
        }
        Commands::Validate => {
            commands::validate::run(&cli.config).await?;
        }
        Commands::Build {
            output,
            compact,
            timeout,
        } => {
            commands::build::run(&cli.config, output.as_deref(), compact, timeout).await?;
        }
    }

    Ok(())
}
