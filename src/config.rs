use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Bluesky upstream
    pub auth: AuthStrategy,
    pub identifier: Option<String>,
    pub app_password: Option<String>,
    pub appview_url: String,
    pub entryway_url: String,
    pub http_timeout: Duration,

    // Web Server
    pub web_host: String,
    pub web_port: u16,
}

/// How searches authenticate against Bluesky.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    /// Query the public AppView without credentials
    Public,
    /// Create a session on the entryway and search with a bearer token
    Session,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable holds an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Bluesky upstream
            auth: parse_auth_strategy(&env_or_default("BSKY_AUTH", "public"))?,
            identifier: optional_env("BSKY_IDENTIFIER"),
            app_password: optional_env("BSKY_APP_PASSWORD"),
            appview_url: env_or_default("BSKY_APPVIEW_URL", "https://public.api.bsky.app"),
            entryway_url: env_or_default("BSKY_ENTRYWAY_URL", "https://bsky.social"),
            http_timeout: Duration::from_secs(parse_env_u64("HTTP_TIMEOUT_SECS", 30)?),

            // Web Server
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_u16("WEB_PORT", 8080)?,
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "HTTP_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.appview_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "BSKY_APPVIEW_URL".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.entryway_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "BSKY_ENTRYWAY_URL".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Whether both upstream credentials are present.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.identifier.is_some() && self.app_password.is_some()
    }

    /// A configuration suitable for tests, independent of the process environment.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            auth: AuthStrategy::Public,
            identifier: None,
            app_password: None,
            appview_url: "https://public.api.bsky.app".to_string(),
            entryway_url: "https://bsky.social".to_string(),
            http_timeout: Duration::from_secs(10),
            web_host: "127.0.0.1".to_string(),
            web_port: 0,
        }
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_auth_strategy(value: &str) -> Result<AuthStrategy, ConfigError> {
    match value.to_lowercase().as_str() {
        "public" => Ok(AuthStrategy::Public),
        "session" => Ok(AuthStrategy::Session),
        _ => Err(ConfigError::InvalidValue {
            name: "BSKY_AUTH".to_string(),
            message: format!("must be 'public' or 'session', got '{value}'"),
        }),
    }
}
