//! Markdown-to-HTML rendering pipeline for blog posts.
//!
//! This crate converts a markdown post into block-level HTML while
//! reconciling locally-referenced images with externally-hosted
//! representations. Depending on the configured [`MediaStrategy`], a
//! local image reference is either rewritten to a remote URL, replaced
//! by an order-stable placeholder token paired with an [`UploadJob`],
//! or stripped entirely.
//!
//! The pipeline is pure computation over in-memory strings plus local
//! file existence checks; all network side effects live behind the
//! [`MediaUploader`] boundary that a publish adapter implements.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//!
//! use mdpost_renderer::{MediaStrategy, PostRenderer};
//!
//! let renderer = PostRenderer::new(".").with_strategy(MediaStrategy::Drop);
//! let result = renderer.render(Path::new("hello.md"), "# Hello\n\n**Bold** text");
//! assert_eq!(result.title, "Hello");
//! assert_eq!(result.html, "<h1>Hello</h1>\n<p><strong>Bold</strong> text</p>");
//! ```

mod assets;
mod block;
mod error;
mod inline;
mod renderer;
mod substitute;

pub use assets::{Diagnostic, MediaStrategy, RemoteBase, UploadJob};
pub use block::RenderOptions;
pub use error::RenderError;
pub use inline::{escape_html, format_inline};
pub use renderer::{PostRenderer, RenderResult};
pub use substitute::{MediaUploader, UploadError, apply_uploads, substitute};
