//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `actweb.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

use actweb_adapter_http_axum::config::BinderConfig;
use actweb_domain::error::DomainError;
use actweb_domain::pattern::{Pattern, WILDCARD};
use actweb_domain::route::RouteDescriptor;
use actweb_domain::route_map::{RouteEntry, RouteMap, RouteOptions};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Route binder options.
    pub binder: BinderConfig,
    /// Route maps to mount. The built-in `role:web` map is used when empty.
    pub routes: Vec<RouteMap>,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `actweb.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration does not validate.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("actweb.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("ACTWEB_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("ACTWEB_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("ACTWEB_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("ACTWEB_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.binder.body_limit == 0 {
            return Err(ConfigError::Validation(
                "binder.body_limit must be non-zero".to_string(),
            ));
        }
        self.route_descriptors::<()>()?;
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Expand every configured route map, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Routes`] if a route map does not expand.
    pub fn route_descriptors<H>(&self) -> Result<Vec<RouteDescriptor<H>>, ConfigError> {
        let defaults;
        let maps = if self.routes.is_empty() {
            defaults = default_routes();
            &defaults
        } else {
            &self.routes
        };

        let mut routes = Vec::new();
        for map in maps {
            routes.extend(map.expand()?);
        }
        Ok(routes)
    }
}

/// The built-in `role:web` map: `GET /api/ping` and `GET|POST|PUT /api/echo`.
#[must_use]
pub fn default_routes() -> Vec<RouteMap> {
    let echo = RouteOptions {
        get: true,
        post: true,
        put: true,
        middleware: vec!["no-store".to_string()],
        ..RouteOptions::default()
    };

    vec![RouteMap {
        pin: Pattern::pair("role", "web").with("cmd", WILDCARD),
        prefix: "/api".to_string(),
        suffix: String::new(),
        middleware: Vec::new(),
        map: [
            ("ping".to_string(), RouteEntry::Enabled(true)),
            ("echo".to_string(), RouteEntry::Detailed(echo)),
        ]
        .into_iter()
        .collect(),
    }]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "actwebd=info,actweb=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// A route map cannot be expanded into routes.
    #[error("invalid route map")]
    Routes(#[from] DomainError),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use actweb_adapter_http_axum::config::MountLogLevel;
    use actweb_domain::method::HttpMethod;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert!(config.binder.parse_body);
        assert!(config.routes.is_empty());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = r"
            [server]
            host = '127.0.0.1'
            port = 9090

            [logging]
            filter = 'debug'

            [binder]
            parse_body = false
            body_limit = 2048
            mount_log = 'info'

            [[routes]]
            pin = 'role:user,cmd:*'
            prefix = '/user'
            middleware = ['no-store']

            [routes.map]
            login = { POST = true, redirect = '/' }
            logout = true
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.logging.filter, "debug");
        assert!(!config.binder.parse_body);
        assert_eq!(config.binder.body_limit, 2048);
        assert_eq!(config.binder.mount_log, MountLogLevel::Info);
        assert_eq!(config.routes.len(), 1);
        assert_eq!(config.routes[0].prefix, "/user");
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_zero_body_limit() {
        let mut config = Config::default();
        config.binder.body_limit = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_pin_without_wildcard() {
        let config: Config = toml::from_str(
            r"
            [[routes]]
            pin = 'role:user,cmd:login'
            [routes.map]
            login = true
            ",
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Routes(_))));
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_format_custom_bind_addr() {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 9090;
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn should_expand_default_routes_when_none_configured() {
        let routes: Vec<RouteDescriptor<()>> = Config::default().route_descriptors().unwrap();

        let summary: Vec<_> = routes
            .iter()
            .map(|r| (r.path.as_str(), r.pattern.to_string(), r.methods.clone()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (
                    "/api/echo",
                    "cmd:echo,role:web".to_string(),
                    vec![HttpMethod::Get, HttpMethod::Post, HttpMethod::Put]
                ),
                ("/api/ping", "cmd:ping,role:web".to_string(), vec![HttpMethod::Get]),
            ]
        );
    }

    #[test]
    fn should_expand_configured_routes_in_order() {
        let config: Config = toml::from_str(
            r"
            [[routes]]
            pin = 'role:b,cmd:*'
            [routes.map]
            one = true

            [[routes]]
            pin = 'role:a,cmd:*'
            [routes.map]
            two = true
            ",
        )
        .unwrap();

        let routes: Vec<RouteDescriptor<()>> = config.route_descriptors().unwrap();
        let paths: Vec<_> = routes.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/one", "/two"]);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
