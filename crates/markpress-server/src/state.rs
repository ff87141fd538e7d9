//! Application state.
//!
//! Shared state for all page handlers.

use markpress_render::PageRenderer;

/// State owned by one routed markdown directory.
pub(crate) struct AppState {
    /// Renders pages by render path under the root directory.
    pub(crate) renderer: PageRenderer,
}
