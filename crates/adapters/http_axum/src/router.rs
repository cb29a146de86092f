//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use actweb_domain::method::HttpMethod;

use crate::body::{self, BodyLimit};
use crate::config::BinderConfig;
use crate::context::AxumContext;

/// Build the top-level axum [`Router`] from a context routes were bound on.
///
/// Adds `GET /health` unless a bound route already claims it. When the
/// binder does not parse bodies itself, the upstream [`body::parser`] is
/// installed so dispatch handlers still find a parsed body.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build(context: AxumContext, config: &BinderConfig) -> Router {
    let health = !context.is_mounted(HttpMethod::Get, "/health");
    let mut router = context.into_router();

    if health {
        router = router.route("/health", get(health_check));
    }
    if !config.parse_body {
        router = router.layer(axum::middleware::from_fn_with_state(
            BodyLimit(config.body_limit),
            body::parser,
        ));
    }

    router.layer(TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "OK"
}
