//! Error types for the rendering pipeline.

use std::path::PathBuf;

/// Fatal error while rendering from a file.
///
/// Unresolvable references are never fatal; they surface as
/// diagnostics on the render result instead.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// The source file could not be read (missing, unreadable, or not
    /// valid UTF-8).
    #[error("failed to read {}", path.display())]
    Read {
        /// Path of the unreadable source file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
