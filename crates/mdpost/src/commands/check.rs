//! `mdpost check` command implementation.
//!
//! Dry-run variant of `render`: nothing is written, and unresolved
//! references fail the command so a broken post is caught before
//! publishing.

use std::path::PathBuf;

use clap::Args;
use mdpost_config::{CliSettings, Config, StrategyKind};

use crate::error::CliError;
use crate::output::Output;

use super::render::report;
use super::{build_renderer, resolve_post_path};

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Markdown post to check (default: most recent post in the
    /// configured posts directory).
    file: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover mdpost.toml).
    #[arg(short, long, env = "MDPOST_CONFIG")]
    config: Option<PathBuf>,

    /// Media strategy: drop, remote or upload (overrides config).
    #[arg(long)]
    strategy: Option<StrategyKind>,

    /// Posts source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Attachment directory (overrides config).
    #[arg(long)]
    attachment_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, file selection, or reading
    /// the post fails, or if any image reference is unresolved.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            attachment_dir: self.attachment_dir,
            strategy: self.strategy,
            preserve_blank_lines: None,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let path = resolve_post_path(self.file, &config)?;
        let renderer = build_renderer(&config)?;
        let result = renderer.render_file(&path)?;

        report(&output, &config, &path, &result);

        if result.diagnostics.is_empty() {
            output.success("Post is ready to publish");
            Ok(())
        } else {
            Err(CliError::Validation(format!(
                "{} unresolved image reference(s)",
                result.diagnostics.len()
            )))
        }
    }
}
