//! `mdpost render` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use mdpost_config::{CliSettings, Config, StrategyKind};
use mdpost_renderer::RenderResult;

use crate::error::CliError;
use crate::output::Output;

use super::{build_renderer, resolve_post_path};

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown post to render (default: most recent post in the
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

    /// Write the HTML to this file instead of stdout.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Emit the full render manifest (title, html, jobs, diagnostics)
    /// as JSON for an external publish adapter.
    #[arg(long, conflicts_with = "out")]
    json: bool,

    /// Keep blank source lines as blank output lines.
    #[arg(long)]
    keep_blank_lines: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, file selection, reading the
    /// post, or writing the output fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            attachment_dir: self.attachment_dir,
            strategy: self.strategy,
            preserve_blank_lines: self.keep_blank_lines.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let path = resolve_post_path(self.file, &config)?;
        let renderer = build_renderer(&config)?;
        let result = renderer.render_file(&path)?;

        report(&output, &config, &path, &result);

        if self.json {
            let manifest = serde_json::to_string_pretty(&result)?;
            write_stdout(&manifest)?;
        } else if let Some(out) = &self.out {
            std::fs::write(out, &result.html)?;
            output.success(&format!("HTML written to {}", out.display()));
        } else {
            write_stdout(&result.html)?;
        }

        Ok(())
    }
}

/// Print the render summary to stderr.
pub(crate) fn report(output: &Output, config: &Config, path: &std::path::Path, result: &RenderResult) {
    output.banner("mdpost");
    if let Some(name) = &config.blog.name {
        output.detail("Blog", name);
    }
    output.detail("Post", &path.display().to_string());
    output.detail("Title", &result.title);

    if result.jobs.is_empty() {
        output.info("No pending uploads");
    } else {
        output.info(&format!("Pending uploads: {}", result.jobs.len()));
        for job in &result.jobs {
            output.item(&format!("{} <- {}", job.token, job.path.display()));
        }
    }

    for diagnostic in &result.diagnostics {
        output.warning(&format!(
            "Unresolved image: {} ({})",
            diagnostic.reference, diagnostic.reason
        ));
    }
}

/// Write a machine-consumable payload to stdout.
fn write_stdout(payload: &str) -> Result<(), std::io::Error> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(payload.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}
