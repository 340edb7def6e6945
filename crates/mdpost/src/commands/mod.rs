//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod render;

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use mdpost_config::{Config, StrategyKind};
use mdpost_renderer::{MediaStrategy, PostRenderer, RemoteBase};

use crate::error::CliError;

pub(crate) use check::CheckArgs;
pub(crate) use render::RenderArgs;

/// Resolve the post to operate on: an explicit path, or the most
/// recently modified `.md` file under the configured posts directory.
pub(crate) fn resolve_post_path(
    file: Option<PathBuf>,
    config: &Config,
) -> Result<PathBuf, CliError> {
    if let Some(path) = file {
        if !path.exists() {
            return Err(CliError::Validation(format!(
                "post not found: {}",
                path.display()
            )));
        }
        return Ok(path);
    }

    let source_dir = &config.posts_resolved.source_dir;
    tracing::debug!(dir = %source_dir.display(), "selecting most recent post");
    latest_post(source_dir)?.ok_or_else(|| {
        CliError::Validation(format!(
            "no markdown posts found in {}",
            source_dir.display()
        ))
    })
}

/// Most recently modified markdown file in a directory, if any.
fn latest_post(dir: &Path) -> Result<Option<PathBuf>, std::io::Error> {
    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "md") {
            let modified = entry.metadata()?.modified()?;
            if newest.as_ref().is_none_or(|(time, _)| modified > *time) {
                newest = Some((modified, path));
            }
        }
    }
    Ok(newest.map(|(_, path)| path))
}

/// Build a renderer from the loaded configuration.
pub(crate) fn build_renderer(config: &Config) -> Result<PostRenderer, CliError> {
    let strategy = match config.media.strategy {
        StrategyKind::Drop => MediaStrategy::Drop,
        StrategyKind::Upload => MediaStrategy::UploadPlaceholder,
        StrategyKind::Remote => {
            let remote = config.require_remote()?;
            MediaStrategy::RemoteRewrite(RemoteBase {
                host: remote.host.clone(),
                user: remote.user.clone(),
                repo: remote.repo.clone(),
                branch: remote.branch.clone(),
            })
        }
    };

    let mut renderer = PostRenderer::new(&config.posts_resolved.project_root)
        .with_strategy(strategy)
        .with_preserved_blank_lines(config.render.preserve_blank_lines);
    if let Some(dir) = &config.posts_resolved.attachment_dir {
        renderer = renderer.with_attachment_dir(dir);
    }
    Ok(renderer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_post_picks_newest() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("old.md"), "old").unwrap();
        std::fs::write(tmp.path().join("ignored.txt"), "x").unwrap();
        // Make sure mtimes differ even on coarse filesystems.
        std::thread::sleep(std::time::Duration::from_millis(20));
        std::fs::write(tmp.path().join("new.md"), "new").unwrap();

        let latest = latest_post(tmp.path()).unwrap().unwrap();
        assert!(latest.ends_with("new.md"));
    }

    #[test]
    fn test_latest_post_empty_dir() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(latest_post(tmp.path()).unwrap().is_none());
    }
}
