///
/// This module implements the CLI interface for living-doc: command parsing, the two entry
/// modes (a YAML config file, or GitHub Action inputs) and the wiring of the real
/// collaborators into the core pipeline.
///
/// All business logic (consolidation, classification, layout, rendering) lives in the
/// [`living-doc-core`] crate. This module is strictly CLI glue.
///
/// ## How To Use
/// - From a shell: `living-doc generate --config living-doc.yaml [--verbose]`.
/// - From a GitHub Action step: `living-doc action`, configured through `INPUT_*` variables.
/// - Programmatically or in integration tests: call [`run`] with a constructed [`Cli`].
///
/// [`living-doc-core`]: ../../living-doc-core/
use crate::github::GithubClient;
use crate::load_config::{
    load_action_inputs, load_config, verbose_requested, write_action_output, Settings,
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use living_doc_core::generate::{generate, GenerationReport};
use living_doc_core::templates::FsTemplateLoader;
use living_doc_core::writer::FsWriter;
use std::path::PathBuf;

/// CLI for living-doc: mine GitHub issues into a Living Documentation tree.
#[derive(Parser)]
#[clap(
    name = "living-doc",
    version,
    about = "Generate Living Documentation Markdown pages from GitHub issues and Projects"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the documentation tree described by a YAML config file
    Generate {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Log at debug level
        #[clap(long)]
        verbose: bool,
    },
    /// Run as a GitHub Action, reading INPUT_* environment variables
    Action,
}

impl Cli {
    /// Whether debug logging was requested, by flag or by action input.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Commands::Generate { verbose, .. } => *verbose,
            Commands::Action => verbose_requested(),
        }
    }
}

/// Async CLI entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Generate { config, .. } => {
            let settings = load_config(config)?;
            tracing::info!(command = "generate", "Starting generation");
            let client = GithubClient::new_from_env()
                .map_err(|e| anyhow!("Failed to construct GitHub client from env: {e}"))?;
            let report = generate_with(&settings, &client).await?;
            tracing::info!(command = "generate", ?report, "Generation complete");
            Ok(())
        }
        Commands::Action => {
            let inputs = load_action_inputs()?;
            tracing::info!(command = "action", "Starting generation");
            let client = GithubClient::new(inputs.github_token.clone());
            let report = generate_with(&inputs.settings, &client).await?;
            write_action_output(&report.output_dir)?;
            tracing::info!(command = "action", ?report, "Generation complete");
            Ok(())
        }
    }
}

async fn generate_with(settings: &Settings, client: &GithubClient) -> Result<GenerationReport> {
    let loader = FsTemplateLoader::new(settings.templates_dir.clone());
    match generate(&settings.generator, client, client, &loader, &FsWriter).await {
        Ok(report) => Ok(report),
        Err(e) => {
            tracing::error!(error = %e, "Generation failed");
            Err(e).context("Living Documentation generation failed")
        }
    }
}
