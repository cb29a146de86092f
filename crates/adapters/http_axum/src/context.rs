//! HTTP contexts: the place route handlers get registered on.

use axum::Router;
use axum::routing::{MethodFilter, MethodRouter};

use actweb_domain::method::HttpMethod;

use crate::error::BindError;

/// Something handlers can be registered on, one (method, path) at a time.
pub trait HttpContext {
    /// Register `handler` for `method` requests on `path`.
    ///
    /// # Errors
    ///
    /// Implementations may refuse a registration, e.g. with
    /// [`BindError::DuplicateRoute`].
    fn register(
        &mut self,
        method: HttpMethod,
        path: &str,
        handler: MethodRouter,
    ) -> Result<(), BindError>;
}

/// A (method, path) pair registered on an [`AxumContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountedRoute {
    pub method: HttpMethod,
    pub path: String,
}

/// [`HttpContext`] that accumulates handlers into an axum [`Router`].
#[derive(Debug, Default)]
pub struct AxumContext {
    router: Router,
    mounted: Vec<MountedRoute>,
}

impl AxumContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing router; routes already on it are not listed.
    #[must_use]
    pub fn from_router(router: Router) -> Self {
        Self {
            router,
            mounted: Vec::new(),
        }
    }

    /// Every route registered so far, in registration order.
    #[must_use]
    pub fn routes(&self) -> &[MountedRoute] {
        &self.mounted
    }

    #[must_use]
    pub fn is_mounted(&self, method: HttpMethod, path: &str) -> bool {
        self.mounted
            .iter()
            .any(|route| route.method == method && route.path == path)
    }

    /// Consume the context and return the assembled router.
    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
    }
}

impl HttpContext for AxumContext {
    fn register(
        &mut self,
        method: HttpMethod,
        path: &str,
        handler: MethodRouter,
    ) -> Result<(), BindError> {
        check_path(path)?;
        let wanted = shape(path);
        if let Some(existing) = self
            .mounted
            .iter()
            .find(|route| route.path != path && shape(&route.path) == wanted)
        {
            return Err(BindError::ConflictingRoute {
                path: path.to_string(),
                existing: existing.path.clone(),
            });
        }
        if self.is_mounted(method, path) {
            return Err(BindError::DuplicateRoute {
                method,
                path: path.to_string(),
            });
        }

        self.router = std::mem::take(&mut self.router).route(path, handler);
        self.mounted.push(MountedRoute {
            method,
            path: path.to_string(),
        });
        Ok(())
    }
}

/// Accept only paths the router can insert: a leading `/`, and captures
/// that fill a whole segment as `{name}`, or `{*name}` in the last one.
fn check_path(path: &str) -> Result<(), BindError> {
    let invalid = || BindError::InvalidPath {
        path: path.to_string(),
    };

    let Some(rest) = path.strip_prefix('/') else {
        return Err(invalid());
    };
    let segments: Vec<&str> = rest.split('/').collect();
    let last = segments.len() - 1;

    for (idx, segment) in segments.iter().enumerate() {
        if segment.starts_with(':') || segment.starts_with('*') {
            return Err(invalid());
        }
        if !segment.contains(['{', '}']) {
            continue;
        }
        let name = segment
            .strip_prefix('{')
            .and_then(|inner| inner.strip_suffix('}'))
            .ok_or_else(invalid)?;
        let name = match name.strip_prefix('*') {
            Some(rest) if idx == last => rest,
            Some(_) => return Err(invalid()),
            None => name,
        };
        if name.is_empty() || name.contains(['{', '}', '*', ':']) {
            return Err(invalid());
        }
    }
    Ok(())
}

/// The path with every capture name erased: `/users/{id}` → `/users/{}`.
fn shape(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment.starts_with("{*") {
                "{*}"
            } else if segment.starts_with('{') {
                "{}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// The axum method filter matching `method`.
#[must_use]
pub fn method_filter(method: HttpMethod) -> MethodFilter {
    match method {
        HttpMethod::Get => MethodFilter::GET,
        HttpMethod::Post => MethodFilter::POST,
        HttpMethod::Put => MethodFilter::PUT,
        HttpMethod::Delete => MethodFilter::DELETE,
        HttpMethod::Patch => MethodFilter::PATCH,
        HttpMethod::Head => MethodFilter::HEAD,
        HttpMethod::Options => MethodFilter::OPTIONS,
    }
}
