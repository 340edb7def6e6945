//! Document rendering entry point.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::assets::{AssetResolver, Diagnostic, MediaStrategy, UploadJob};
use crate::block::{BlockParser, RenderOptions};
use crate::error::RenderError;

static H1_HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)$").unwrap());

/// Result of rendering a post.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RenderResult {
    /// Post title: first H1 heading, else the source file stem.
    pub title: String,
    /// Block-level HTML. Under the upload-placeholder strategy it
    /// contains literal `ASSET_PLACEHOLDER_<n>` tokens that the
    /// publish adapter must substitute.
    pub html: String,
    /// Pending upload jobs, in first-occurrence order.
    pub jobs: Vec<UploadJob>,
    /// Unresolved references, in source order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Renders a markdown post into block-level HTML.
///
/// Configuration is explicit per renderer instance; nothing is stored
/// in process-wide state, so documents can render concurrently with
/// different configurations.
#[derive(Clone, Debug)]
pub struct PostRenderer {
    project_root: PathBuf,
    strategy: MediaStrategy,
    attachment_dir: Option<PathBuf>,
    options: RenderOptions,
}

impl PostRenderer {
    /// Create a renderer rooted at the given project directory.
    ///
    /// Defaults to the upload-placeholder strategy with no extra
    /// attachment directory.
    #[must_use]
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            strategy: MediaStrategy::default(),
            attachment_dir: None,
            options: RenderOptions::default(),
        }
    }

    /// Set the media resolution strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: MediaStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Add a fixed attachment directory to the lookup path.
    #[must_use]
    pub fn with_attachment_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.attachment_dir = Some(dir.into());
        self
    }

    /// Keep blank source lines as blank output lines.
    #[must_use]
    pub fn with_preserved_blank_lines(mut self, enabled: bool) -> Self {
        self.options.preserve_blank_lines = enabled;
        self
    }

    /// Render post content.
    ///
    /// `path` is only used for title fallback and for resolving
    /// document-relative image references; the file itself is not
    /// read. Rendering is deterministic and never fails: unresolvable
    /// references degrade to diagnostics on the result.
    #[must_use]
    pub fn render(&self, path: &Path, content: &str) -> RenderResult {
        let title = extract_title(path, content);

        // Attachment-style references are resolved before standard
        // markdown images; see AssetResolver::resolve_all.
        let mut resolver = AssetResolver::new(
            &self.strategy,
            path.parent().unwrap_or_else(|| Path::new(".")),
            self.attachment_dir.as_deref(),
            &self.project_root,
        );
        let body = resolver.resolve_all(content);
        let (jobs, diagnostics) = resolver.into_parts();

        let blocks = BlockParser::new(self.options).parse(&body);
        let html = blocks.join("\n");

        tracing::debug!(
            title = %title,
            jobs = jobs.len(),
            diagnostics = diagnostics.len(),
            "rendered post"
        );

        RenderResult {
            title,
            html,
            jobs,
            diagnostics,
        }
    }

    /// Read a post from disk and render it.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Read`] if the file is missing,
    /// unreadable, or not valid UTF-8.
    pub fn render_file(&self, path: &Path) -> Result<RenderResult, RenderError> {
        let content = std::fs::read_to_string(path).map_err(|source| RenderError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.render(path, &content))
    }
}

/// Extract the post title: the first H1 heading anywhere in the
/// document, else the file stem. Always non-empty.
fn extract_title(path: &Path, content: &str) -> String {
    if let Some(caps) = H1_HEADING.captures(content) {
        return caps[1].trim().to_owned();
    }
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "untitled".to_owned())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn drop_renderer() -> PostRenderer {
        PostRenderer::new("/nonexistent").with_strategy(MediaStrategy::Drop)
    }

    #[test]
    fn test_title_from_first_h1() {
        let result = drop_renderer().render(Path::new("note.md"), "# Hello\nworld");
        assert_eq!(result.title, "Hello");
    }

    #[test]
    fn test_title_from_h1_anywhere() {
        let result = drop_renderer().render(Path::new("note.md"), "intro\n\n# Late Title\nbody");
        assert_eq!(result.title, "Late Title");
    }

    #[test]
    fn test_title_falls_back_to_file_stem() {
        let result = drop_renderer().render(Path::new("posts/note.md"), "no heading here");
        assert_eq!(result.title, "note");
    }

    #[test]
    fn test_title_never_empty() {
        let result = drop_renderer().render(Path::new(""), "no heading");
        assert_eq!(result.title, "untitled");
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = drop_renderer();
        let content = "# T\n\n- a\n- b\n\n*text* and https://example.com";
        let first = renderer.render(Path::new("t.md"), content);
        let second = renderer.render(Path::new("t.md"), content);
        assert_eq!(first.title, second.title);
        assert_eq!(first.html, second.html);
        assert_eq!(first.jobs, second.jobs);
        assert_eq!(first.diagnostics, second.diagnostics);
    }

    #[test]
    fn test_heading_line_still_rendered_in_body() {
        let result = drop_renderer().render(Path::new("t.md"), "# Hello\nworld");
        assert_eq!(result.html, "<h1>Hello</h1>\n<p>world</p>");
    }

    #[test]
    fn test_render_file_missing_is_io_error() {
        let err = drop_renderer()
            .render_file(Path::new("/nonexistent/missing.md"))
            .unwrap_err();
        assert!(err.to_string().contains("missing.md"));
    }
}
