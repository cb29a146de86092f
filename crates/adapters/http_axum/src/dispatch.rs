//! The dispatch handler: the last link of every bound handler chain.
//!
//! Per request: read the body (for `POST`/`PUT`), copy the query string,
//! build a [`DispatchPayload`], await the action dispatcher, then either
//! write the reply or hand the error back to axum as an error response.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Request, State};
use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value};

use actweb_app::ports::ActionDispatcher;
use actweb_domain::method::HttpMethod;
use actweb_domain::pattern::Pattern;
use actweb_domain::payload::{Args, DispatchPayload, RequestMeta};

use crate::body::{self, ParsedBody};
use crate::error::RouteError;

/// Everything a dispatch handler needs, fixed at bind time.
pub struct BoundRoute<D> {
    pub method: HttpMethod,
    pub pattern: Pattern,
    pub redirect: Option<HeaderValue>,
    pub autoreply: bool,
    pub parse_body: bool,
    pub body_limit: usize,
    pub dispatcher: Arc<D>,
}

/// Serve one request on a bound route.
///
/// # Errors
///
/// Returns [`RouteError::Parse`] when the body or query string cannot be
/// read and [`RouteError::Dispatch`] when the action dispatcher fails.
pub async fn handle<D>(
    State(route): State<Arc<BoundRoute<D>>>,
    request: Request,
) -> Result<Response, RouteError>
where
    D: ActionDispatcher + Send + Sync + 'static,
{
    let (mut parts, raw_body) = request.into_parts();

    let body = match (route.method.carries_body(), route.parse_body) {
        (false, _) => Value::Object(Map::new()),
        (true, true) => body::parse(&parts.headers, raw_body, route.body_limit).await?,
        (true, false) => parts
            .extensions
            .remove::<ParsedBody>()
            .map_or(Value::Null, |parsed| parsed.0),
    };
    let query = body::query(parts.uri.query())?;

    let request =
        RequestMeta::new(route.method, parts.uri.path()).with_headers(headers(&parts.headers));
    let payload = DispatchPayload::new(request, Args { body, query });
    let id = payload.id;

    match route.dispatcher.dispatch(&route.pattern, payload).await {
        Ok(result) => Ok(route.respond(result)),
        Err(err) => {
            tracing::debug!(%id, pattern = %route.pattern, error = %err, "dispatch failed");
            Err(err.into())
        }
    }
}

impl<D> BoundRoute<D> {
    /// Write a successful dispatch result.
    ///
    /// A redirect takes precedence over autoreply: the response is a bare
    /// `302 Found` and the result is not written. The content type is
    /// declared as JSON either way.
    fn respond(&self, result: Value) -> Response {
        let mut response = if let Some(location) = &self.redirect {
            (StatusCode::FOUND, [(LOCATION, location.clone())]).into_response()
        } else if self.autoreply {
            (StatusCode::OK, Json(result)).into_response()
        } else {
            StatusCode::OK.into_response()
        };
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }
}

fn headers(map: &HeaderMap) -> BTreeMap<String, String> {
    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in map {
        let Ok(value) = value.to_str() else {
            continue;
        };
        headers
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    headers
}
