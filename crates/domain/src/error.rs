//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts via `#[from]`.

/// Top-level domain error.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    RouteMap(#[from] RouteMapError),
}

/// A route descriptor violated one of its invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("route path must start with '/', got {path:?}")]
    PathWithoutLeadingSlash { path: String },

    #[error("route {path} declares no HTTP method")]
    NoMethods { path: String },

    #[error("route {path} has no action pattern")]
    MissingPattern { path: String },

    #[error("route {path} has an empty redirect target")]
    EmptyRedirect { path: String },

    #[error("unknown HTTP method {method:?}")]
    UnknownMethod { method: String },
}

/// An action pattern string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,

    #[error("pattern segment {segment:?} is not of the form key:value")]
    MissingSeparator { segment: String },

    #[error("pattern segment {segment:?} has an empty key")]
    EmptyKey { segment: String },

    #[error("pattern key {key:?} has an empty value")]
    EmptyValue { key: String },

    #[error("pattern key {key:?} appears more than once")]
    DuplicateKey { key: String },
}

/// A route map could not be expanded into route descriptors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteMapError {
    #[error("pin {pin} must contain exactly one '*' value, found {found}")]
    PinWildcard { pin: String, found: usize },

    #[error("route map key {key:?} cannot be used as a pattern value")]
    InvalidKey { key: String },
}
