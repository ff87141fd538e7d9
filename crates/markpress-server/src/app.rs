//! Router construction.
//!
//! [`MarkRouter`] owns the configuration of one routed markdown directory.
//! It scans the directory, binds one GET route per markdown file and hands
//! back either a standalone axum [`Router`] or a [`MarkLayer`] to put in front
//! of an existing service.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::routing::get;
use markpress_config::Config;
use markpress_render::{HeadOptions, MarkdownOptions, PageRenderer};
use markpress_routes::{RouteTable, map_routes};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::error::ServerError;
use crate::handlers;
use crate::middleware::layer::MarkLayer;
use crate::middleware::security;
use crate::state::AppState;

/// Characters escaped in route path segments.
///
/// Covers what a client must percent-encode in a path, plus the braces axum
/// reads as captures.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Builder for the routes of one markdown directory.
///
/// # Example
///
/// ```ignore
/// use markpress_server::MarkRouter;
///
/// let app = MarkRouter::new("docs").with_root_path("/docs").into_router()?;
/// ```
#[derive(Clone, Debug)]
pub struct MarkRouter {
    root_dir: PathBuf,
    root_path: Option<String>,
    markdown: MarkdownOptions,
    head: HeadOptions,
}

impl MarkRouter {
    /// Route the markdown files under `root_dir` at the server root.
    #[must_use]
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            root_path: None,
            markdown: MarkdownOptions::default(),
            head: HeadOptions::default(),
        }
    }

    /// Build from loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let markdown = &config.markdown;
        Self {
            root_dir: config.site_resolved.root_dir.clone(),
            root_path: config.site_resolved.root_path.clone(),
            markdown: MarkdownOptions {
                tables: markdown.tables,
                strikethrough: markdown.strikethrough,
                tasklists: markdown.tasklists,
                footnotes: markdown.footnotes,
                smart_punctuation: markdown.smart_punctuation,
                heading_attributes: markdown.heading_attributes,
            },
            head: HeadOptions {
                default_title: config.head.default_title.clone(),
                escape: config.head.escape,
            },
        }
    }

    /// Mount all routes under `root_path` (e.g., "/docs").
    #[must_use]
    pub fn with_root_path(mut self, root_path: impl Into<String>) -> Self {
        self.root_path = Some(root_path.into());
        self
    }

    /// Set markdown options used for every page.
    #[must_use]
    pub fn with_markdown(mut self, markdown: MarkdownOptions) -> Self {
        self.markdown = markdown;
        self
    }

    /// Set head fragment options.
    #[must_use]
    pub fn with_head(mut self, head: HeadOptions) -> Self {
        self.head = head;
        self
    }

    /// Root directory being routed.
    #[must_use]
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Scan the root directory and bind its routes.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Route`] if the scan fails or two files map to
    /// the same URL path.
    pub fn routes(&self) -> Result<RouteTable, ServerError> {
        let discovery = map_routes(&self.root_dir, self.root_path.as_deref())?;
        let table = RouteTable::from_entries(discovery.routes)?;
        tracing::info!(
            root_dir = %self.root_dir.display(),
            routes = table.len(),
            "Bound markdown routes"
        );
        Ok(table)
    }

    /// Build a standalone application serving every markdown file.
    ///
    /// # Errors
    ///
    /// Same as [`routes`](Self::routes).
    pub fn into_router(self) -> Result<Router, ServerError> {
        let (router, _) = self.build()?;
        Ok(router.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        ))
    }

    /// Build a middleware layer serving every markdown file and passing all
    /// other requests to the wrapped service.
    ///
    /// # Errors
    ///
    /// Same as [`routes`](Self::routes).
    pub fn into_layer(self) -> Result<MarkLayer, ServerError> {
        let (router, paths) = self.build()?;
        Ok(MarkLayer::new(router, paths))
    }

    /// Bind one handler per route, returning the router and its URL paths.
    fn build(self) -> Result<(Router, HashSet<String>), ServerError> {
        let table = self.routes()?;
        let state = Arc::new(AppState {
            renderer: PageRenderer::new(self.root_dir, self.markdown, self.head),
        });

        // File names may start with `:` or `*`; those are literal segments here.
        let mut router = Router::new().without_v07_checks();
        let mut paths = HashSet::with_capacity(table.len());
        for entry in &table {
            let url_path = encode_route_path(&entry.get_path);
            let render_path: Arc<str> = Arc::from(entry.render_path.as_str());
            tracing::debug!(path = %url_path, render_path = %render_path, "Binding route");

            router = router.route(
                &url_path,
                get(move |State(state): State<Arc<AppState>>| {
                    handlers::pages::get_page(state, Arc::clone(&render_path))
                }),
            );
            paths.insert(url_path);
        }

        Ok((router.with_state(state), paths))
    }
}

/// Build a standalone application for `root_dir`.
///
/// # Errors
///
/// Same as [`MarkRouter::routes`].
pub fn mark_app(
    root_dir: impl Into<PathBuf>,
    root_path: Option<&str>,
    markdown: Option<MarkdownOptions>,
) -> Result<Router, ServerError> {
    builder(root_dir, root_path, markdown).into_router()
}

/// Build a middleware layer for `root_dir`.
///
/// # Errors
///
/// Same as [`MarkRouter::routes`].
pub fn mark_layer(
    root_dir: impl Into<PathBuf>,
    root_path: Option<&str>,
    markdown: Option<MarkdownOptions>,
) -> Result<MarkLayer, ServerError> {
    builder(root_dir, root_path, markdown).into_layer()
}

fn builder(
    root_dir: impl Into<PathBuf>,
    root_path: Option<&str>,
    markdown: Option<MarkdownOptions>,
) -> MarkRouter {
    let mut builder = MarkRouter::new(root_dir);
    if let Some(root_path) = root_path {
        builder = builder.with_root_path(root_path);
    }
    if let Some(markdown) = markdown {
        builder = builder.with_markdown(markdown);
    }
    builder
}

/// Percent-encode each segment of a route path so it matches the raw request
/// path a client sends.
fn encode_route_path(get_path: &str) -> String {
    get_path
        .split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}
