//! Asset reference resolution.
//!
//! Embedded image references come in two source forms: attachment-style
//! `![[name]]` (optionally `![[name|size]]`, size hint discarded) and
//! standard markdown `![alt](src)`. Each reference resolves to a final
//! `<img>` fragment, an order-stable placeholder token paired with a
//! pending [`UploadJob`], or the empty string, depending on the
//! configured [`MediaStrategy`].
//!
//! The resolver is created fresh per render call so placeholder
//! indices always start at 0 and match document order.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_encode};
use regex::Regex;

use crate::inline::escape_html;

/// Prefix of placeholder tokens embedded in intermediate HTML.
pub(crate) const PLACEHOLDER_PREFIX: &str = "ASSET_PLACEHOLDER_";

static ATTACHMENT_REF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[\[(.*?)\]\]").unwrap());

static IMAGE_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]*)\)").unwrap());

/// URL path segment characters that survive unencoded: RFC 3986
/// unreserved (A-Z a-z 0-9 - . _ ~).
const SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a single URL path segment.
fn encode_segment(segment: &str) -> String {
    percent_encode(segment.as_bytes(), SEGMENT_ENCODE_SET).to_string()
}

/// Remote base under which project files are reachable, as
/// `{host}/{user}/{repo}/{branch}/{path}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteBase {
    /// Host including scheme, e.g. `https://raw.githubusercontent.com`.
    pub host: String,
    /// Repository owner.
    pub user: String,
    /// Repository name.
    pub repo: String,
    /// Branch name.
    pub branch: String,
}

impl RemoteBase {
    /// Build the remote URL for a project-relative file path.
    ///
    /// Every path segment is percent-encoded individually.
    #[must_use]
    pub fn url_for(&self, relative: &Path) -> String {
        let mut url = format!(
            "{}/{}/{}/{}",
            self.host.trim_end_matches('/'),
            encode_segment(&self.user),
            encode_segment(&self.repo),
            encode_segment(&self.branch)
        );
        for segment in relative.iter() {
            url.push('/');
            url.push_str(&encode_segment(&segment.to_string_lossy()));
        }
        url
    }
}

/// How embedded media references are resolved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum MediaStrategy {
    /// Strip local media references silently ("no media" mode).
    Drop,
    /// Rewrite local files to URLs under a fixed remote base.
    RemoteRewrite(RemoteBase),
    /// Defer to an external upload step via placeholder tokens.
    #[default]
    UploadPlaceholder,
}

/// Pending association between a placeholder token and a local file
/// awaiting an external upload.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UploadJob {
    /// Token embedded in the intermediate HTML (`ASSET_PLACEHOLDER_<n>`).
    pub token: String,
    /// Absolute path of the local file to upload.
    pub path: PathBuf,
    /// Human-readable name for reporting.
    pub display_name: String,
}

/// A reference that could not be resolved to a file.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Diagnostic {
    /// The reference name or path as written in the source.
    pub reference: String,
    /// Why resolution failed.
    pub reason: String,
}

/// Per-document asset resolver.
///
/// Holds the placeholder counter, pending jobs and diagnostics for a
/// single render call.
pub(crate) struct AssetResolver<'a> {
    strategy: &'a MediaStrategy,
    doc_dir: &'a Path,
    attachment_dir: Option<&'a Path>,
    project_root: &'a Path,
    jobs: Vec<UploadJob>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> AssetResolver<'a> {
    pub(crate) fn new(
        strategy: &'a MediaStrategy,
        doc_dir: &'a Path,
        attachment_dir: Option<&'a Path>,
        project_root: &'a Path,
    ) -> Self {
        Self {
            strategy,
            doc_dir,
            attachment_dir,
            project_root,
            jobs: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Replace every embedded image reference in `text`.
    ///
    /// Attachment-style references are rewritten first so they are
    /// never reinterpreted by the standard markdown image pattern.
    pub(crate) fn resolve_all(&mut self, text: &str) -> String {
        let text = ATTACHMENT_REF
            .replace_all(text, |caps: &regex::Captures<'_>| {
                self.resolve_attachment(&caps[1])
            })
            .into_owned();
        IMAGE_REF
            .replace_all(&text, |caps: &regex::Captures<'_>| {
                self.resolve_markdown_image(&caps[1], &caps[2])
            })
            .into_owned()
    }

    pub(crate) fn into_parts(self) -> (Vec<UploadJob>, Vec<Diagnostic>) {
        (self.jobs, self.diagnostics)
    }

    /// Resolve an attachment-style reference (`![[name]]`).
    ///
    /// A `|size` suffix is discarded. Candidate directories are
    /// searched in order; the first existing file wins.
    fn resolve_attachment(&mut self, raw: &str) -> String {
        let name = raw.split('|').next().unwrap_or_default().trim();
        if name.is_empty() {
            return self.unresolved(raw, "empty reference name");
        }
        match self.find_attachment(name) {
            Some(path) => self.emit(path, name),
            None => self.unresolved(name, "file not found in any candidate directory"),
        }
    }

    /// Resolve a standard markdown image reference (`![alt](src)`).
    ///
    /// Remote `http(s)` sources become `<img>` tags unconditionally;
    /// anything else resolves relative to the document directory.
    fn resolve_markdown_image(&mut self, alt: &str, src: &str) -> String {
        if src.is_empty() {
            return self.unresolved(alt, "empty reference name");
        }
        if src.starts_with("http://") || src.starts_with("https://") {
            return image_tag(src, alt);
        }
        let path = self.doc_dir.join(src);
        if path.is_file() {
            let display = if alt.is_empty() { src } else { alt };
            self.emit(path, display)
        } else {
            self.unresolved(src, "file not found in any candidate directory")
        }
    }

    /// Search the candidate directories for an attachment by name.
    fn find_attachment(&self, name: &str) -> Option<PathBuf> {
        let mut candidates = vec![
            self.doc_dir.join(name),
            self.doc_dir.join("images").join(name),
            self.doc_dir.join("assets").join(name),
        ];
        if let Some(dir) = self.attachment_dir {
            candidates.push(dir.join(name));
        }
        candidates.push(self.project_root.join(name));

        candidates.into_iter().find(|c| c.is_file())
    }

    /// Produce the fragment for a located file under the active strategy.
    fn emit(&mut self, path: PathBuf, display_name: &str) -> String {
        match self.strategy {
            MediaStrategy::Drop => String::new(),
            MediaStrategy::RemoteRewrite(base) => match path.strip_prefix(self.project_root) {
                Ok(relative) => image_tag(&base.url_for(relative), display_name),
                Err(_) => self.unresolved(display_name, "file is outside the project root"),
            },
            MediaStrategy::UploadPlaceholder => {
                let token = format!("{PLACEHOLDER_PREFIX}{}", self.jobs.len());
                let absolute = std::fs::canonicalize(&path).unwrap_or(path);
                tracing::debug!(token = %token, path = %absolute.display(), "queued upload job");
                self.jobs.push(UploadJob {
                    token: token.clone(),
                    path: absolute,
                    display_name: display_name.to_owned(),
                });
                token
            }
        }
    }

    /// Degrade an unresolvable reference to the empty string.
    ///
    /// The drop strategy strips silently; the other strategies record
    /// a caller-visible diagnostic.
    fn unresolved(&mut self, reference: &str, reason: &str) -> String {
        if *self.strategy != MediaStrategy::Drop {
            tracing::warn!(reference = %reference, reason = %reason, "unresolved image reference");
            self.diagnostics.push(Diagnostic {
                reference: reference.to_owned(),
                reason: reason.to_owned(),
            });
        }
        String::new()
    }
}

/// Build an `<img>` fragment with an escaped alt text.
fn image_tag(src: &str, alt: &str) -> String {
    format!(r#"<img src="{src}" alt="{}">"#, escape_html(alt))
}
