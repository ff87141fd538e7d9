//! Router middleware.

pub(crate) mod layer;
pub(crate) mod security;
