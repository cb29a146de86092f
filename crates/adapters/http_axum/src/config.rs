//! Route binder configuration.

use serde::Deserialize;

use actweb_domain::method::HttpMethod;
use actweb_domain::pattern::Pattern;

/// Default request body limit (1 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Options recognised by the route binder.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BinderConfig {
    /// Parse `POST`/`PUT` bodies in the dispatch handler. When `false` the
    /// handler reads the body an upstream parser stored on the request.
    pub parse_body: bool,
    /// Maximum number of body bytes read per request.
    pub body_limit: usize,
    /// Level at which each mounted route is announced.
    pub mount_log: MountLogLevel,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            parse_body: true,
            body_limit: DEFAULT_BODY_LIMIT,
            mount_log: MountLogLevel::Silent,
        }
    }
}

/// Log level used to announce mounts; `silent` announces nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountLogLevel {
    #[default]
    Silent,
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl MountLogLevel {
    /// Emit the mount announcement for one (method, path) pair.
    pub fn announce(self, method: HttpMethod, path: &str, pattern: &Pattern) {
        match self {
            Self::Silent => {}
            Self::Trace => tracing::trace!(%method, path, %pattern, "route mounted"),
            Self::Debug => tracing::debug!(%method, path, %pattern, "route mounted"),
            Self::Info => tracing::info!(%method, path, %pattern, "route mounted"),
            Self::Warn => tracing::warn!(%method, path, %pattern, "route mounted"),
            Self::Error => tracing::error!(%method, path, %pattern, "route mounted"),
        }
    }
}
