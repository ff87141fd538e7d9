//! HTTP routing for MarkPress markdown directories.
//!
//! This crate maps a directory of markdown files onto axum routes. Every
//! `*.md` file below the root directory gets one GET route; a request renders
//! the file to HTML, with the `<title>`, meta tags and stylesheet links taken
//! from the frontmatter of the root `index.md`.
//!
//! Two entry points build the same routes:
//! - [`mark_app`] / [`MarkRouter::into_router`]: a standalone [`axum::Router`]
//! - [`mark_layer`] / [`MarkRouter::into_layer`]: a tower [`Layer`](tower::Layer)
//!   that answers markdown routes and passes every other request on
//!
//! Routes are discovered and bound once, when the router or layer is built.
//! Page content is re-read on every request.
//!
//! # Quick Start
//!
//! ```ignore
//! use markpress_server::mark_app;
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = mark_app("docs", Some("/docs"), None).unwrap();
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:7979").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! MarkRouter ──scan──► markpress-routes (glob, route table)
//!     │
//!     └─► axum Router ──GET /path──► PageRenderer (markpress-render)
//!                                        ├─► tokio::fs read + frontmatter split
//!                                        ├─► pulldown-cmark body
//!                                        └─► root index.md head fragment
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;

use markpress_config::Config;

pub use app::{MarkRouter, mark_app, mark_layer};
pub use error::ServerError;
pub use markpress_render::{HeadOptions, MarkdownOptions};
pub use middleware::layer::{MarkLayer, MarkService};

/// Run the server described by `config` until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the routes cannot be built or the server fails to
/// bind or serve.
pub async fn run_server(config: &Config) -> Result<(), ServerError> {
    let app = MarkRouter::from_config(config).into_router()?;

    let address = format!("{}:{}", config.server.host, config.server.port);
    let addr: SocketAddr = address
        .parse()
        .map_err(|_| ServerError::Address(address.clone()))?;
    tracing::info!(
        address = %addr,
        root_dir = %config.site_resolved.root_dir.display(),
        "Starting server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Load configuration and run the server.
///
/// `config_path` is optional; without it `markpress.toml` is discovered in
/// the current directory or its parents.
///
/// # Errors
///
/// Returns an error if configuration fails to load or the server fails.
pub async fn run_with_config_file(
    config_path: Option<&std::path::Path>,
) -> Result<(), ServerError> {
    let config = Config::load(config_path)?;
    run_server(&config).await
}
