//! Markdown file discovery and route derivation for MarkPress.
//!
//! This crate turns a directory of markdown files into a list of routes:
//!
//! - [`map_routes`] scans a root directory for `*.md` files and derives a
//!   [`RouteEntry`] for each one, locating the root `index.md` on the way
//! - [`RouteTable`] binds entries by URL path, rejecting conflicting bindings
//!
//! # Path Convention
//!
//! Route paths always start with `/` and carry the configured prefix:
//! - `index.md` -> `/` (or the prefix itself)
//! - `about.md` -> `/about`
//! - `blog/index.md` -> `/blog`
//! - `blog/post1.md` -> `/blog/post1`
//!
//! Render paths are the file path relative to the root directory with the
//! `.md` extension removed (`index`, `about`, `blog/index`, `blog/post1`).
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use markpress_routes::map_routes;
//!
//! let discovery = map_routes(Path::new("docs"), Some("/docs"))?;
//! for route in &discovery.routes {
//!     println!("{} -> {}", route.get_path, route.render_path);
//! }
//! ```

mod scanner;
mod table;

use std::path::{Path, PathBuf};

pub use scanner::{Discovery, find_root_index, map_routes};
pub use table::RouteTable;

/// Markdown file extension, without the dot.
pub const MARKDOWN_EXTENSION: &str = "md";

/// Base name of a directory's default document, without extension.
pub const INDEX_NAME: &str = "index";

/// A single markdown file mapped to a URL path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteEntry {
    /// URL path the server matches (e.g., "/", "/about", "/blog/post1").
    pub get_path: String,
    /// Root-relative path without extension (e.g., "index", "blog/post1").
    pub render_path: String,
}

/// Source file for a render path (e.g., "blog/post1") under `root_dir`.
#[must_use]
pub fn source_path(root_dir: &Path, render_path: &str) -> PathBuf {
    root_dir.join(format!("{render_path}.{MARKDOWN_EXTENSION}"))
}

/// Error returned when discovering or binding routes fails.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// The root directory produced an unusable glob pattern.
    #[error("Invalid scan pattern {pattern}: {source}")]
    Pattern {
        /// Pattern built from the root directory.
        pattern: String,
        /// Underlying pattern error.
        #[source]
        source: glob::PatternError,
    },
    /// A directory entry could not be read during the scan.
    #[error("Failed to scan {}: {source}", path.display())]
    Scan {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Two different markdown files map to the same URL path.
    #[error("Route {path} is bound to {existing}, cannot bind {incoming}")]
    Conflict {
        /// URL path both entries map to.
        path: String,
        /// Render path already bound.
        existing: String,
        /// Render path that was rejected.
        incoming: String,
    },
}
