//! Bind-time errors and HTTP error response mapping.

use std::sync::Arc;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use actweb_app::error::DispatchError;
use actweb_domain::method::HttpMethod;

/// Errors raised while binding routes onto an HTTP context.
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    /// No HTTP context was handed to the binder.
    #[error("no context provided")]
    MissingContext,

    /// A named middleware is not in the middleware table.
    #[error("expected valid middleware, got {reference}")]
    InvalidMiddleware { reference: String },

    /// A redirect target cannot be sent as a `Location` header.
    #[error("route {path} has an invalid redirect target {target:?}")]
    InvalidRedirect { path: String, target: String },

    /// The path is not something the router accepts: no leading `/`,
    /// `:`/`*` segments, or braces that are not whole `{name}` captures.
    #[error("route path {path:?} is not a valid route; captures must be whole {{name}} or trailing {{*name}} segments")]
    InvalidPath { path: String },

    /// The path matches an already mounted path except for capture names.
    #[error("route path {path:?} conflicts with mounted route {existing:?}")]
    ConflictingRoute { path: String, existing: String },

    /// The context already holds a handler for this method and path.
    #[error("route {method} {path} is already registered")]
    DuplicateRoute { method: HttpMethod, path: String },
}

/// A request body or query string could not be read.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read request body")]
    Read(#[source] axum::Error),

    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("unsupported content type {content_type:?}")]
    UnsupportedMediaType { content_type: String },

    #[error("invalid JSON body")]
    Json(#[source] serde_json::Error),

    #[error("invalid form body")]
    Form(#[source] serde_urlencoded::de::Error),

    #[error("request body is not valid UTF-8")]
    Utf8(#[source] std::string::FromUtf8Error),

    #[error("invalid query string")]
    Query(#[source] serde_urlencoded::de::Error),
}

/// Failure of a bound route while serving one request.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl RouteError {
    /// Status used when no outer layer rewrites the response.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Dispatch(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Parse(ParseError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Parse(ParseError::UnsupportedMediaType { .. }) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            Self::Parse(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// The underlying error behind an error response, stored in the response
/// extensions.
///
/// An outer middleware can read it to render the failure its own way:
///
/// ```ignore
/// async fn errors(request: Request, next: Next) -> Response {
///     let response = next.run(request).await;
///     match response.extensions().get::<RouteFailure>() {
///         Some(failure) => (StatusCode::BAD_REQUEST, failure.error().to_string()).into_response(),
///         None => response,
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RouteFailure(Arc<RouteError>);

impl RouteFailure {
    #[must_use]
    pub fn error(&self) -> &RouteError {
        &self.0
    }
}

/// JSON error body returned by bound routes.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "bound route failed");
        } else {
            tracing::debug!(error = %self, "rejected request");
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        let mut response = (status, Json(body)).into_response();
        response
            .extensions_mut()
            .insert(RouteFailure(Arc::new(self)));
        response
    }
}
