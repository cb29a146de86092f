//! Built-in actions and named middleware shipped with the daemon.

use axum::Json;
use axum::extract::Request;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use actweb_adapter_http_axum::middleware::MiddlewareRegistry;
use actweb_app::action_bus::LocalActionBus;
use actweb_app::error::DispatchError;
use actweb_domain::pattern::Pattern;
use actweb_domain::payload::DispatchPayload;

/// Action bus with `role:web,cmd:ping` and `role:web,cmd:echo` registered.
#[must_use]
pub fn action_bus() -> LocalActionBus {
    let web = Pattern::pair("role", "web");
    let mut bus = LocalActionBus::new();
    bus.add(web.with("cmd", "ping"), ping)
        .add(web.with("cmd", "echo"), echo);
    bus
}

/// Middleware table with `no-store` and `require-json`.
#[must_use]
pub fn middleware() -> MiddlewareRegistry {
    MiddlewareRegistry::new()
        .with("no-store", no_store)
        .with("require-json", require_json)
}

async fn ping(_payload: DispatchPayload) -> Result<Value, DispatchError> {
    Ok(json!({"res": "pong!"}))
}

async fn echo(payload: DispatchPayload) -> Result<Value, DispatchError> {
    Ok(json!({
        "method": payload.request.method,
        "path": payload.request.path,
        "body": payload.args.body,
        "query": payload.args.query,
    }))
}

/// Mark every response as not cacheable.
async fn no_store(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

/// Refuse `POST`/`PUT` requests that do not declare a JSON body.
async fn require_json(request: Request, next: Next) -> Response {
    let method = request.method();
    if (method == Method::POST || method == Method::PUT) && !is_json(request.headers()) {
        tracing::debug!(%method, uri = %request.uri(), "rejected non-JSON body");
        return (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Json(json!({"error": "expected a JSON request body"})),
        )
            .into_response();
    }
    next.run(request).await
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|ct| ct.split(';').next().unwrap_or_default().trim().to_ascii_lowercase())
        .is_some_and(|ct| ct == "application/json" || ct.ends_with("+json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actweb_app::ports::ActionDispatcher;
    use actweb_domain::method::HttpMethod;
    use actweb_domain::payload::{Args, RequestMeta};

    fn payload(body: Value) -> DispatchPayload {
        DispatchPayload::new(
            RequestMeta::new(HttpMethod::Post, "/api/echo"),
            Args {
                body,
                ..Args::default()
            },
        )
    }

    #[tokio::test]
    async fn should_answer_ping() {
        let bus = action_bus();
        let pattern = "role:web,cmd:ping".parse().unwrap();
        let reply = bus.dispatch(&pattern, payload(json!({}))).await.unwrap();
        assert_eq!(reply, json!({"res": "pong!"}));
    }

    #[tokio::test]
    async fn should_echo_request_args() {
        let bus = action_bus();
        let pattern = "role:web,cmd:echo".parse().unwrap();
        let reply = bus
            .dispatch(&pattern, payload(json!({"foo": "bar"})))
            .await
            .unwrap();
        assert_eq!(
            reply,
            json!({"method": "POST", "path": "/api/echo", "body": {"foo": "bar"}, "query": {}})
        );
    }

    #[test]
    fn should_register_builtin_middleware() {
        assert_eq!(middleware().names(), vec!["no-store", "require-json"]);
    }

    #[test]
    fn should_detect_json_content_types() {
        let mut headers = HeaderMap::new();
        assert!(!is_json(&headers));

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json; charset=utf-8"));
        assert!(is_json(&headers));

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/merge-patch+json"));
        assert!(is_json(&headers));

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert!(!is_json(&headers));
    }
}
