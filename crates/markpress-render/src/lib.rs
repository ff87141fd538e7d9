//! Frontmatter-aware markdown page rendering for MarkPress.
//!
//! Rendering a page is three steps:
//!
//! 1. Split the YAML frontmatter from the markdown body ([`parse_frontmatter`])
//! 2. Convert the body to HTML with pulldown-cmark ([`render_markdown`])
//! 3. Optionally prepend a `<head>` fragment built from the `config` block of
//!    the site's root `index.md` ([`extract_head_fragment`])
//!
//! [`render_file`] runs all three for a single file. [`PageRenderer`] binds a
//! views directory so pages can be rendered by their route render path.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use markpress_render::{RenderContext, render_file};
//!
//! let context = RenderContext::with_dir("docs");
//! let html = render_file(Path::new("docs/about.md"), &context).await?;
//! ```

mod frontmatter;
mod head;
mod markdown;
mod renderer;

use std::path::PathBuf;

use markpress_routes::RouteError;

pub use frontmatter::{Frontmatter, parse_frontmatter};
pub use head::{DEFAULT_TITLE, HeadOptions, MetaTag, PageHead, escape_html, extract_head_fragment};
pub use markdown::{MarkdownOptions, render_markdown};
pub use renderer::{PageRenderer, RenderContext, render_file};

/// Error returned when page rendering fails.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Source file not found.
    #[error("Source file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    /// I/O error reading a source file.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Root index lookup failed.
    #[error("Failed to locate root index: {0}")]
    Scan(#[from] RouteError),
    /// The blocking head lookup task panicked or was cancelled.
    #[error("Head lookup task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl RenderError {
    /// Classify an I/O error for `path`.
    pub(crate) fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound(path)
        } else {
            Self::Io { path, source }
        }
    }
}
