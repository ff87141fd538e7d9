//! Page endpoint.
//!
//! Each discovered markdown file is bound to its own route; the handler
//! renders the bound render path on every request.

use std::sync::Arc;

use axum::response::Html;

use crate::error::ServerError;
use crate::state::AppState;

/// Render the page for `render_path` as HTML.
pub(crate) async fn get_page(
    state: Arc<AppState>,
    render_path: Arc<str>,
) -> Result<Html<String>, ServerError> {
    let html = state.renderer.render_view(&render_path).await?;
    Ok(Html(html))
}
