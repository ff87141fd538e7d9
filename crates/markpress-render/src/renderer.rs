//! Page rendering.
//!
//! Provides [`render_file`] for one-off rendering and [`PageRenderer`] for
//! rendering pages by render path under a views directory. Nothing is cached:
//! every call re-reads the page, and when a root directory is set, rescans it
//! for the root index and re-reads that too.

use std::path::{Path, PathBuf};

use markpress_routes::{find_root_index, source_path};

use crate::RenderError;
use crate::frontmatter::parse_frontmatter;
use crate::head::{HeadOptions, extract_head_fragment};
use crate::markdown::{MarkdownOptions, render_markdown};

/// Settings applied to each render call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderContext {
    /// Site root directory. When set, the head fragment from its root
    /// `index.md` is prepended to the page.
    pub dir: Option<PathBuf>,
    /// Markdown extensions for body conversion.
    pub markdown: MarkdownOptions,
    /// Head fragment options.
    pub head: HeadOptions,
}

impl RenderContext {
    /// Context that injects the head fragment of `dir`'s root index.
    #[must_use]
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            ..Self::default()
        }
    }

    /// Set markdown options.
    #[must_use]
    pub fn with_markdown(mut self, markdown: MarkdownOptions) -> Self {
        self.markdown = markdown;
        self
    }

    /// Set head options.
    #[must_use]
    pub fn with_head(mut self, head: HeadOptions) -> Self {
        self.head = head;
        self
    }
}

/// Render a markdown file to HTML.
///
/// The page is read asynchronously; the root index lookup and its frontmatter
/// read are synchronous and run on the blocking pool. Without `context.dir`, or when the directory has no
/// root index, only the body HTML is returned.
///
/// # Errors
///
/// Returns [`RenderError::FileNotFound`] or [`RenderError::Io`] if the page or
/// root index cannot be read, and [`RenderError::Scan`] if the root directory
/// cannot be scanned.
pub async fn render_file(path: &Path, context: &RenderContext) -> Result<String, RenderError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| RenderError::from_io(path.to_path_buf(), e))?;

    let doc = parse_frontmatter(&text);
    let body = render_markdown(doc.content, &context.markdown);

    let Some(dir) = context.dir.clone() else {
        return Ok(body);
    };
    let head_options = context.head.clone();
    let head = tokio::task::spawn_blocking(move || -> Result<Option<String>, RenderError> {
        let Some(root_index) = find_root_index(&dir)? else {
            tracing::debug!(dir = %dir.display(), "No root index, rendering body only");
            return Ok(None);
        };
        extract_head_fragment(&root_index, &head_options).map(Some)
    })
    .await??;

    Ok(match head {
        Some(head) => format!("{head}\n{body}"),
        None => body,
    })
}

/// Renders pages by render path relative to a views directory.
///
/// The views directory doubles as the site root for head injection.
#[derive(Clone, Debug)]
pub struct PageRenderer {
    views: PathBuf,
    context: RenderContext,
}

impl PageRenderer {
    /// Create a renderer for `views`.
    #[must_use]
    pub fn new(views: impl Into<PathBuf>, markdown: MarkdownOptions, head: HeadOptions) -> Self {
        let views = views.into();
        let context = RenderContext {
            dir: Some(views.clone()),
            markdown,
            head,
        };
        Self { views, context }
    }

    /// Views directory.
    #[must_use]
    pub fn views(&self) -> &Path {
        &self.views
    }

    /// Context passed to [`render_file`].
    #[must_use]
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Resolve a render path (e.g., "blog/post1") to its source file.
    #[must_use]
    pub fn view_path(&self, render_path: &str) -> PathBuf {
        source_path(&self.views, render_path)
    }

    /// Render the page for a render path.
    ///
    /// # Errors
    ///
    /// Same as [`render_file`].
    pub async fn render_view(&self, render_path: &str) -> Result<String, RenderError> {
        let path = self.view_path(render_path);
        tracing::debug!(render_path, path = %path.display(), "Rendering view");
        render_file(&path, &self.context).await
    }
}
