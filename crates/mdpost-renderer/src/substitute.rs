//! Placeholder substitution and the publish-adapter boundary.
//!
//! Rendering under the upload-placeholder strategy is two-phase: the
//! renderer embeds opaque tokens now, and an external publish adapter
//! uploads the files and substitutes its own fragments later. All text
//! manipulation stays here, pure and testable; all I/O stays on the
//! adapter side behind [`MediaUploader`].

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::assets::UploadJob;

static PLACEHOLDER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ASSET_PLACEHOLDER_\d+").unwrap());

/// Replace placeholder tokens with resolved fragments.
///
/// Tokens absent from `resolved` are replaced with the empty string.
/// A single pass over the input guarantees that token-like text inside
/// a substituted fragment is never re-substituted, and no other
/// content is altered.
#[must_use]
pub fn substitute(html: &str, resolved: &HashMap<String, String>) -> String {
    PLACEHOLDER_TOKEN
        .replace_all(html, |caps: &regex::Captures<'_>| {
            resolved.get(&caps[0]).cloned().unwrap_or_default()
        })
        .into_owned()
}

/// Upload failure reported by a publish adapter.
#[derive(Debug, thiserror::Error)]
#[error("upload of {name} failed: {message}")]
pub struct UploadError {
    /// Display name of the failed asset.
    pub name: String,
    /// Adapter-provided failure description.
    pub message: String,
}

/// Media upload seam implemented by a publish adapter.
///
/// Uploads are driven in document order, so an adapter may correlate
/// uploads with tokens by index.
pub trait MediaUploader {
    /// Upload one pending asset and return the final HTML fragment
    /// that replaces its placeholder token.
    fn upload(&mut self, job: &UploadJob) -> Result<String, UploadError>;
}

/// Upload all pending jobs and substitute their tokens.
///
/// Jobs are uploaded in document order. A failed upload is logged and
/// its token substituted with the empty string, matching the behavior
/// for unresolvable references during rendering.
pub fn apply_uploads<U: MediaUploader>(html: &str, jobs: &[UploadJob], uploader: &mut U) -> String {
    let mut resolved = HashMap::new();
    for job in jobs {
        match uploader.upload(job) {
            Ok(fragment) => {
                resolved.insert(job.token.clone(), fragment);
            }
            Err(err) => {
                tracing::warn!(token = %job.token, "{err}");
            }
        }
    }
    substitute(html, &resolved)
}
