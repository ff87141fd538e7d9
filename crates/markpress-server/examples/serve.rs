//! Serve a markdown directory using `markpress.toml`.
//!
//! ```text
//! RUST_LOG=debug cargo run -p markpress-server --example serve
//! ```

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), markpress_server::ServerError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    markpress_server::run_with_config_file(None).await
}
