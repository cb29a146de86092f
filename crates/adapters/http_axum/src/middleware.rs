//! Route middleware and the named middleware table.
//!
//! A middleware receives the request and the rest of the chain. It may call
//! `next.run(request)` and post-process the response, or answer on its own
//! and skip everything after it, including the dispatch handler.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::MethodRouter;

use actweb_domain::route::MiddlewareRef;

use crate::error::BindError;

/// Boxed future returned by a [`Middleware`].
pub type MiddlewareFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// A handler placed in front of a route's dispatch handler.
pub trait Middleware: Send + Sync + 'static {
    fn handle(&self, request: Request, next: Next) -> MiddlewareFuture;
}

impl<F, Fut> Middleware for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn handle(&self, request: Request, next: Next) -> MiddlewareFuture {
        Box::pin(self(request, next))
    }
}

/// Shared, type-erased middleware.
pub type SharedMiddleware = Arc<dyn Middleware>;

/// Wrap a closure or function as [`SharedMiddleware`].
pub fn shared<F, Fut>(middleware: F) -> SharedMiddleware
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Arc::new(middleware)
}

/// Name → middleware table consulted at bind time. Never mutated by the
/// binder.
#[derive(Default, Clone)]
pub struct MiddlewareRegistry {
    entries: HashMap<String, SharedMiddleware>,
}

impl MiddlewareRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `middleware` under `name`, replacing any previous entry.
    #[must_use]
    pub fn with<F, Fut>(mut self, name: impl Into<String>, middleware: F) -> Self
    where
        F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.entries.insert(name.into(), shared(middleware));
        self
    }

    /// Register an already shared middleware under `name`.
    #[must_use]
    pub fn with_shared(mut self, name: impl Into<String>, middleware: SharedMiddleware) -> Self {
        self.entries.insert(name.into(), middleware);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SharedMiddleware> {
        self.entries.get(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Turn a reference from a route descriptor into a runnable middleware.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::InvalidMiddleware`] naming the reference when a
    /// name is not registered.
    pub fn resolve(
        &self,
        reference: &MiddlewareRef<SharedMiddleware>,
    ) -> Result<SharedMiddleware, BindError> {
        match reference {
            MiddlewareRef::Handler(handler) => Ok(Arc::clone(handler)),
            MiddlewareRef::Named(name) => {
                self.get(name)
                    .cloned()
                    .ok_or_else(|| BindError::InvalidMiddleware {
                        reference: name.clone(),
                    })
            }
        }
    }
}

impl fmt::Debug for MiddlewareRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// Wrap the handlers of `router` so that `middleware` runs before them.
///
/// Only requests whose method the router serves pass through; the 405
/// fallback for other methods is left untouched.
///
/// Applying `[a, b]` in reverse order (`b` first, then `a`) makes `a` the
/// outermost layer, so requests pass through `a`, then `b`, then the handler.
pub(crate) fn layer(router: MethodRouter, middleware: &SharedMiddleware) -> MethodRouter {
    let middleware = Arc::clone(middleware);
    router.route_layer(axum::middleware::from_fn(
        move |request: Request, next: Next| {
            let middleware = Arc::clone(&middleware);
            async move { middleware.handle(request, next).await }
        },
    ))
}
