//! Route descriptor: one HTTP path bound to one action pattern.
//!
//! A descriptor is immutable once built and owned by whoever asks for it to
//! be bound. Middleware entries are either names, resolved later against a
//! middleware table, or handlers of an adapter-chosen type `H` used as-is.

use std::fmt;

use crate::error::{DomainError, ValidationError};
use crate::method::HttpMethod;
use crate::pattern::Pattern;

/// A reference to a middleware handler.
#[derive(Clone)]
pub enum MiddlewareRef<H> {
    /// Looked up by name in the middleware table at bind time.
    Named(String),
    /// A handler supplied directly.
    Handler(H),
}

impl<H> MiddlewareRef<H> {
    /// The name, for [`MiddlewareRef::Named`] entries.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Handler(_) => None,
        }
    }
}

impl<H> From<&str> for MiddlewareRef<H> {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl<H> From<String> for MiddlewareRef<H> {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl<H> fmt::Debug for MiddlewareRef<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

/// Declarative description of a single HTTP route.
#[derive(Clone)]
pub struct RouteDescriptor<H> {
    /// Mount path, always starting with `/`.
    pub path: String,
    /// Action pattern dispatched for every request on this route.
    pub pattern: Pattern,
    /// Methods the route answers, deduplicated, in declaration order.
    pub methods: Vec<HttpMethod>,
    /// Middleware run, in order, before the dispatch handler.
    pub middleware: Vec<MiddlewareRef<H>>,
    /// Path to redirect to after a successful dispatch.
    pub redirect: Option<String>,
    /// Write the dispatch result as the JSON response body.
    pub autoreply: bool,
}

impl<H> RouteDescriptor<H> {
    /// Create a builder for constructing a [`RouteDescriptor`].
    #[must_use]
    pub fn builder() -> RouteDescriptorBuilder<H> {
        RouteDescriptorBuilder::default()
    }

    /// Check descriptor invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the path does not start with `/`,
    /// no method is declared, or the redirect target is empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.path.starts_with('/') {
            return Err(ValidationError::PathWithoutLeadingSlash {
                path: self.path.clone(),
            });
        }
        if self.methods.is_empty() {
            return Err(ValidationError::NoMethods {
                path: self.path.clone(),
            });
        }
        if self.redirect.as_deref().is_some_and(str::is_empty) {
            return Err(ValidationError::EmptyRedirect {
                path: self.path.clone(),
            });
        }
        Ok(())
    }
}

impl<H> fmt::Debug for RouteDescriptor<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDescriptor")
            .field("path", &self.path)
            .field("pattern", &self.pattern)
            .field("methods", &self.methods)
            .field("middleware", &self.middleware)
            .field("redirect", &self.redirect)
            .field("autoreply", &self.autoreply)
            .finish()
    }
}

/// Step-by-step builder for [`RouteDescriptor`].
pub struct RouteDescriptorBuilder<H> {
    path: Option<String>,
    pattern: Option<Pattern>,
    methods: Vec<HttpMethod>,
    middleware: Vec<MiddlewareRef<H>>,
    redirect: Option<String>,
    autoreply: bool,
}

impl<H> Default for RouteDescriptorBuilder<H> {
    fn default() -> Self {
        Self {
            path: None,
            pattern: None,
            methods: Vec::new(),
            middleware: Vec::new(),
            redirect: None,
            autoreply: false,
        }
    }
}

impl<H> RouteDescriptorBuilder<H> {
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Add a method; repeated methods are kept once.
    #[must_use]
    pub fn method(mut self, method: HttpMethod) -> Self {
        if !self.methods.contains(&method) {
            self.methods.push(method);
        }
        self
    }

    #[must_use]
    pub fn methods(self, methods: impl IntoIterator<Item = HttpMethod>) -> Self {
        methods.into_iter().fold(self, Self::method)
    }

    /// Append a middleware reference to the chain.
    #[must_use]
    pub fn middleware(mut self, middleware: impl Into<MiddlewareRef<H>>) -> Self {
        self.middleware.push(middleware.into());
        self
    }

    /// Append a handler to the chain.
    #[must_use]
    pub fn handler(mut self, handler: H) -> Self {
        self.middleware.push(MiddlewareRef::Handler(handler));
        self
    }

    #[must_use]
    pub fn redirect(mut self, target: impl Into<String>) -> Self {
        self.redirect = Some(target.into());
        self
    }

    #[must_use]
    pub fn autoreply(mut self, autoreply: bool) -> Self {
        self.autoreply = autoreply;
        self
    }

    /// Consume the builder, validate, and return a [`RouteDescriptor`].
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] if the pattern is missing or any
    /// descriptor invariant fails.
    pub fn build(self) -> Result<RouteDescriptor<H>, DomainError> {
        let path = self.path.unwrap_or_default();
        let pattern = self
            .pattern
            .ok_or_else(|| ValidationError::MissingPattern { path: path.clone() })?;

        let route = RouteDescriptor {
            path,
            pattern,
            methods: self.methods,
            middleware: self.middleware,
            redirect: self.redirect,
            autoreply: self.autoreply,
        };
        route.validate()?;
        Ok(route)
    }
}
