//! Route map: the declarative block that expands into route descriptors.
//!
//! A route map names a `pin` with exactly one wildcard value and a `map` of
//! entries. Every enabled entry becomes one route whose pattern is the pin
//! with the wildcard replaced by the entry key:
//!
//! ```toml
//! pin = "role:test,cmd:*"
//! prefix = "/api"
//! middleware = ["no-store"]
//!
//! [map]
//! ping = true                            # GET /api/ping  -> role:test,cmd:ping
//! echo = { POST = true, PUT = true }     # POST|PUT /api/echo
//! login = { POST = true, redirect = "/" }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, RouteMapError};
use crate::method::HttpMethod;
use crate::pattern::Pattern;
use crate::route::{MiddlewareRef, RouteDescriptor};

/// A group of routes sharing a pin, a path prefix/suffix and middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteMap {
    /// Pattern template; exactly one value must be `*`.
    pub pin: Pattern,
    /// Prepended to every route path.
    #[serde(default)]
    pub prefix: String,
    /// Appended to every route path.
    #[serde(default)]
    pub suffix: String,
    /// Named middleware run before each route's own middleware.
    #[serde(default)]
    pub middleware: Vec<String>,
    /// Route entries keyed by the value substituted into the pin.
    #[serde(default)]
    pub map: BTreeMap<String, RouteEntry>,
}

/// One entry of a route map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RouteEntry {
    /// `true` mounts a default `GET` route with autoreply; `false` skips it.
    Enabled(bool),
    /// Explicit per-route options.
    Detailed(RouteOptions),
}

/// Explicit options for a route-map entry.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteOptions {
    #[serde(rename = "GET")]
    pub get: bool,
    #[serde(rename = "POST")]
    pub post: bool,
    #[serde(rename = "PUT")]
    pub put: bool,
    #[serde(rename = "DELETE")]
    pub delete: bool,
    #[serde(rename = "PATCH")]
    pub patch: bool,
    /// Path segment used instead of the entry key.
    pub alias: Option<String>,
    /// Redirect target after a successful dispatch.
    pub redirect: Option<String>,
    /// Write the dispatch result as the body; defaults to `true`.
    pub autoreply: Option<bool>,
    /// Named middleware run after the route map's own middleware.
    pub middleware: Vec<String>,
}

impl RouteOptions {
    /// Declared methods, falling back to `GET` when none is set.
    #[must_use]
    pub fn methods(&self) -> Vec<HttpMethod> {
        let declared: Vec<_> = [
            (self.get, HttpMethod::Get),
            (self.post, HttpMethod::Post),
            (self.put, HttpMethod::Put),
            (self.delete, HttpMethod::Delete),
            (self.patch, HttpMethod::Patch),
        ]
        .into_iter()
        .filter_map(|(enabled, method)| enabled.then_some(method))
        .collect();

        if declared.is_empty() {
            vec![HttpMethod::Get]
        } else {
            declared
        }
    }
}

impl RouteMap {
    /// Expand the map into route descriptors, ordered by entry key.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::RouteMap`] if the pin does not hold exactly
    /// one wildcard or an entry key holds `,` or `:`, or
    /// [`DomainError::Validation`] if an expanded route is
    /// invalid (e.g. an empty redirect).
    pub fn expand<H>(&self) -> Result<Vec<RouteDescriptor<H>>, DomainError> {
        let wildcards: Vec<_> = self.pin.wildcard_keys().collect();
        let [wildcard] = wildcards.as_slice() else {
            return Err(RouteMapError::PinWildcard {
                pin: self.pin.to_string(),
                found: wildcards.len(),
            }
            .into());
        };

        let mut routes = Vec::with_capacity(self.map.len());
        for (key, entry) in &self.map {
            if !is_pattern_value(key) {
                return Err(RouteMapError::InvalidKey { key: key.clone() }.into());
            }
            let options = match entry {
                RouteEntry::Enabled(false) => continue,
                RouteEntry::Enabled(true) => RouteOptions::default(),
                RouteEntry::Detailed(options) => options.clone(),
            };

            let name = options.alias.as_deref().unwrap_or(key);
            let mut builder = RouteDescriptor::builder()
                .path(self.path_for(name))
                .pattern(self.pin.with(wildcard, key.as_str()))
                .methods(options.methods())
                .autoreply(options.autoreply.unwrap_or(true));

            for name in self.middleware.iter().chain(&options.middleware) {
                builder = builder.middleware(MiddlewareRef::Named(name.clone()));
            }
            if let Some(target) = options.redirect {
                builder = builder.redirect(target);
            }

            routes.push(builder.build()?);
        }
        Ok(routes)
    }

    fn path_for(&self, name: &str) -> String {
        let prefix = self.prefix.trim_end_matches('/');
        let name = name.trim_start_matches('/');
        if prefix.is_empty() || prefix.starts_with('/') {
            format!("{prefix}/{name}{}", self.suffix)
        } else {
            format!("/{prefix}/{name}{}", self.suffix)
        }
    }
}

/// Whether `key` reads back unchanged once substituted into a pattern.
fn is_pattern_value(key: &str) -> bool {
    !key.is_empty() && key.trim() == key && !key.contains([',', ':'])
}
