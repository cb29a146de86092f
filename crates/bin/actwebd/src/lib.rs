//! # actwebd: actweb daemon
//!
//! Composition root that binds configured route maps onto the in-process
//! action bus and serves them over HTTP.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file)
//! - Register the built-in actions and named middleware
//! - Expand route maps into route descriptors and bind them
//! - Build the axum router
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

pub mod builtins;
pub mod config;

use axum::Router;

use actweb_adapter_http_axum::binder::{Route, RouteBinder};
use actweb_adapter_http_axum::context::AxumContext;
use actweb_adapter_http_axum::error::BindError;
use actweb_adapter_http_axum::router;

use crate::config::{Config, ConfigError};

/// Build the full application router for `config`.
///
/// # Errors
///
/// Returns [`StartupError`] if the route maps do not expand or a route
/// cannot be bound.
pub fn app(config: &Config) -> Result<Router, StartupError> {
    let binder = RouteBinder::new(builtins::action_bus())
        .with_config(config.binder.clone())
        .with_middleware(builtins::middleware());

    let routes: Vec<Route> = config.route_descriptors()?;
    let mut context = AxumContext::new();
    let registration = binder.bind(Some(&mut context), routes)?;
    tracing::info!(routes = registration.routes.len(), "routes bound");

    Ok(router::build(context, binder.config()))
}

/// Errors that stop the daemon before it serves.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Bind(#[from] BindError),
}
