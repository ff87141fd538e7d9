//! Middleware form of the markdown router.
//!
//! [`MarkLayer`] wraps any service. GET and HEAD requests whose path is a
//! bound markdown route are answered by the markdown router; every other
//! request continues to the wrapped service unchanged.

use std::collections::HashSet;
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use tower::{Layer, Service, ServiceExt};

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Layer that serves bound markdown routes in front of another service.
///
/// Routes are discovered and bound once, when the layer is built by
/// [`MarkRouter::into_layer`](crate::MarkRouter::into_layer). Applying the
/// layer to several services shares the same bound routes.
#[derive(Clone)]
pub struct MarkLayer {
    router: Router,
    paths: Arc<HashSet<String>>,
}

impl MarkLayer {
    pub(crate) fn new(router: Router, paths: HashSet<String>) -> Self {
        Self {
            router,
            paths: Arc::new(paths),
        }
    }

    /// Whether a request path is served by this layer.
    #[must_use]
    pub fn serves(&self, path: &str) -> bool {
        self.paths.contains(path)
    }
}

impl std::fmt::Debug for MarkLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkLayer")
            .field("routes", &self.paths.len())
            .finish_non_exhaustive()
    }
}

impl<S> Layer<S> for MarkLayer {
    type Service = MarkService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MarkService {
            router: self.router.clone(),
            paths: Arc::clone(&self.paths),
            inner,
        }
    }
}

/// Service produced by [`MarkLayer`].
#[derive(Clone)]
pub struct MarkService<S> {
    router: Router,
    paths: Arc<HashSet<String>>,
    inner: S,
}

impl<S> MarkService<S> {
    fn is_markdown_request(&self, req: &Request<Body>) -> bool {
        matches!(*req.method(), Method::GET | Method::HEAD) && self.paths.contains(req.uri().path())
    }
}

impl<S> Service<Request<Body>> for MarkService<S>
where
    S: Service<Request<Body>, Response = Response, Error = Infallible> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<Result<Response, Infallible>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        if self.is_markdown_request(&req) {
            let router = self.router.clone();
            return Box::pin(router.oneshot(req));
        }

        // Call the service that was polled ready, leave a fresh clone behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move { inner.call(req).await })
    }
}
