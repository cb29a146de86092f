//! End-to-end smoke tests for the full actwebd stack.
//!
//! Each test builds the complete application (built-in actions, built-in
//! middleware, route maps from TOML, real axum router) and exercises the
//! HTTP layer via `tower::ServiceExt::oneshot`. No TCP port is bound.

use axum::body::Body;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE, LOCATION};
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use actwebd::config::Config;

fn app_from(toml_src: &str) -> axum::Router {
    let config: Config = toml::from_str(toml_src).expect("config should parse");
    actwebd::app(&config).expect("app should build")
}

fn default_app() -> axum::Router {
    app_from("")
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let resp = default_app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Built-in route map
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_answer_ping_on_default_routes() {
    let resp = default_app()
        .oneshot(
            Request::builder()
                .uri("/api/ping")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
    assert_eq!(body_json(resp).await, json!({"res": "pong!"}));
}

#[tokio::test]
async fn should_echo_posted_body_without_caching() {
    let resp = default_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/echo?page=2")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name":"kitchen"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[CACHE_CONTROL], "no-store");
    assert_eq!(
        body_json(resp).await,
        json!({
            "method": "POST",
            "path": "/api/echo",
            "body": {"name": "kitchen"},
            "query": {"page": "2"},
        })
    );
}

#[tokio::test]
async fn should_reject_unmounted_method() {
    let resp = default_app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/ping")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ---------------------------------------------------------------------------
// Configured route maps
// ---------------------------------------------------------------------------

const USER_ROUTES: &str = r"
    [[routes]]
    pin = 'role:web,cmd:*'
    prefix = '/user'
    middleware = ['require-json']

    [routes.map]
    echo = { POST = true, redirect = '/done' }
    ping = { alias = 'status' }
";

#[tokio::test]
async fn should_redirect_after_dispatch() {
    let resp = app_from(USER_ROUTES)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/user/echo")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[LOCATION], "/done");
}

#[tokio::test]
async fn should_run_route_map_middleware_first() {
    let resp = app_from(USER_ROUTES)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/user/echo")
                .header(CONTENT_TYPE, "text/plain")
                .body(Body::from("hello"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn should_mount_alias_path() {
    let resp = app_from(USER_ROUTES)
        .oneshot(
            Request::builder()
                .uri("/user/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"res": "pong!"}));
}

#[tokio::test]
async fn should_return_server_error_for_unhandled_action() {
    let app = app_from(
        r"
        [[routes]]
        pin = 'role:missing,cmd:*'
        [routes.map]
        nothing = true
        ",
    );

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/nothing")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("role:missing"));
}

#[tokio::test]
async fn should_serve_with_upstream_parser_when_binder_skips_parsing() {
    let app = app_from(
        r"
        [binder]
        parse_body = false
        ",
    );

    let resp = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/echo")
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("tag=a&tag=b"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["body"], json!({"tag": ["a", "b"]}));
}

#[test]
fn should_fail_to_build_with_unknown_middleware() {
    let config: Config = toml::from_str(
        r"
        [[routes]]
        pin = 'role:web,cmd:*'
        middleware = ['unknownName']
        [routes.map]
        ping = true
        ",
    )
    .unwrap();

    let err = actwebd::app(&config).unwrap_err();
    assert_eq!(
        err.to_string(),
        "expected valid middleware, got unknownName"
    );
}

#[test]
fn should_fail_to_build_with_unroutable_alias() {
    let config: Config = toml::from_str(
        r"
        [[routes]]
        pin = 'role:web,cmd:*'
        [routes.map]
        ping = { alias = '{broken' }
        ",
    )
    .unwrap();

    let err = actwebd::app(&config).unwrap_err();
    assert!(err.to_string().contains("{broken"));
}
