//! Route binder: mounts route descriptors onto an HTTP context.
//!
//! For each route, named middleware is resolved against the binder's
//! middleware table, then one handler chain per declared method is
//! registered: the resolved middleware, in order, followed by the dispatch
//! handler. Binding is synchronous; only request handling awaits the
//! action dispatcher.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{MethodRouter, on};

use actweb_app::ports::ActionDispatcher;
use actweb_domain::method::HttpMethod;
use actweb_domain::route::RouteDescriptor;

use crate::config::BinderConfig;
use crate::context::{HttpContext, method_filter};
use crate::dispatch::{self, BoundRoute};
use crate::error::BindError;
use crate::middleware::{self, MiddlewareRegistry, SharedMiddleware};

/// A route descriptor whose inline middleware are axum middleware.
pub type Route = RouteDescriptor<SharedMiddleware>;

/// Outcome of a successful bind: the routes that were mounted.
#[derive(Debug)]
pub struct Registration {
    pub routes: Vec<Route>,
}

/// Binds route descriptors to an action dispatcher.
pub struct RouteBinder<D> {
    config: BinderConfig,
    middleware: MiddlewareRegistry,
    dispatcher: Arc<D>,
}

impl<D> RouteBinder<D>
where
    D: ActionDispatcher + Send + Sync + 'static,
{
    /// Create a binder with default configuration and no named middleware.
    pub fn new(dispatcher: D) -> Self {
        Self::from_arc(Arc::new(dispatcher))
    }

    /// Create a binder around a dispatcher that is shared elsewhere.
    pub fn from_arc(dispatcher: Arc<D>) -> Self {
        Self {
            config: BinderConfig::default(),
            middleware: MiddlewareRegistry::default(),
            dispatcher,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: BinderConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_middleware(mut self, middleware: MiddlewareRegistry) -> Self {
        self.middleware = middleware;
        self
    }

    #[must_use]
    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    /// Register one handler chain per (route, method) pair on `context`.
    ///
    /// Routes are processed in order. A failure stops the pass; routes
    /// registered before the failing one stay registered.
    ///
    /// # Errors
    ///
    /// - [`BindError::MissingContext`] when `context` is `None`; nothing is
    ///   registered.
    /// - [`BindError::InvalidMiddleware`] when a named middleware is not in
    ///   the middleware table.
    /// - [`BindError::InvalidRedirect`] when a redirect target is not a
    ///   valid header value.
    /// - Any error the context reports while registering.
    pub fn bind<C: HttpContext>(
        &self,
        context: Option<&mut C>,
        routes: Vec<Route>,
    ) -> Result<Registration, BindError> {
        let Some(context) = context else {
            return Err(BindError::MissingContext);
        };

        for route in &routes {
            let chain = route
                .middleware
                .iter()
                .map(|reference| self.middleware.resolve(reference))
                .collect::<Result<Vec<_>, _>>()?;

            let redirect = route
                .redirect
                .as_deref()
                .map(|target| {
                    HeaderValue::from_str(target).map_err(|_| BindError::InvalidRedirect {
                        path: route.path.clone(),
                        target: target.to_string(),
                    })
                })
                .transpose()?;

            for &method in &route.methods {
                let handler = self.handler_chain(route, method, redirect.clone(), &chain);
                context.register(method, &route.path, handler)?;
                self.config
                    .mount_log
                    .announce(method, &route.path, &route.pattern);
            }
        }

        Ok(Registration { routes })
    }

    fn handler_chain(
        &self,
        route: &Route,
        method: HttpMethod,
        redirect: Option<HeaderValue>,
        chain: &[SharedMiddleware],
    ) -> MethodRouter {
        let bound = Arc::new(BoundRoute {
            method,
            pattern: route.pattern.clone(),
            redirect,
            autoreply: route.autoreply,
            parse_body: self.config.parse_body,
            body_limit: self.config.body_limit,
            dispatcher: Arc::clone(&self.dispatcher),
        });

        let handler = on(method_filter(method), dispatch::handle::<D>).with_state(bound);
        chain.iter().rev().fold(handler, middleware::layer)
    }
}
