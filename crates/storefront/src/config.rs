//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `WATCHSHOP_HOST` - Bind address (default: 127.0.0.1)
//! - `WATCHSHOP_PORT` - Listen port (default: 8080)
//! - `WATCHSHOP_DATA_DIR` - Directory holding `users.json`, `watches.json`
//!   and `admins.json` (default: data)
//! - `WATCHSHOP_PUBLIC_DIR` - Static files and uploaded images (default: public)
//! - `WATCHSHOP_CORS_ORIGIN` - Browser origin allowed to send credentialed
//!   requests (default: `http://localhost:5173`)
//! - `WATCHSHOP_SECURE_COOKIES` - Mark the session cookie `Secure` (default: false)
//! - `WATCHSHOP_MAX_UPLOAD_BYTES` - Request body limit for uploads (default: 10 MiB)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use axum::http::HeaderValue;
use thiserror::Error;

const DEFAULT_MAX_UPLOAD_BYTES: &str = "10485760";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
///
/// Implements `Debug` manually to redact the Sentry DSN.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory with the JSON data files
    pub data_dir: PathBuf,
    /// Directory served as static files; uploads land here
    pub public_dir: PathBuf,
    /// Allowed CORS origin
    pub cors_origin: HeaderValue,
    /// Whether the session cookie requires HTTPS
    pub secure_cookies: bool,
    /// Maximum request body size in bytes
    pub max_upload_bytes: usize,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("data_dir", &self.data_dir)
            .field("public_dir", &self.public_dir)
            .field("cors_origin", &self.cors_origin)
            .field("secure_cookies", &self.secure_cookies)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let host = env
            .or_default("WATCHSHOP_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| invalid("WATCHSHOP_HOST", &e))?;
        let port = env
            .or_default("WATCHSHOP_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| invalid("WATCHSHOP_PORT", &e))?;
        let data_dir = PathBuf::from(env.or_default("WATCHSHOP_DATA_DIR", "data"));
        let public_dir = PathBuf::from(env.or_default("WATCHSHOP_PUBLIC_DIR", "public"));
        let cors_origin = HeaderValue::from_str(
            &env.or_default("WATCHSHOP_CORS_ORIGIN", "http://localhost:5173"),
        )
        .map_err(|e| invalid("WATCHSHOP_CORS_ORIGIN", &e))?;
        let secure_cookies = parse_bool(
            "WATCHSHOP_SECURE_COOKIES",
            &env.or_default("WATCHSHOP_SECURE_COOKIES", "false"),
        )?;
        let max_upload_bytes = env
            .or_default("WATCHSHOP_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)
            .parse::<usize>()
            .map_err(|e| invalid("WATCHSHOP_MAX_UPLOAD_BYTES", &e))?;

        Ok(Self {
            host,
            port,
            data_dir,
            public_dir,
            cors_origin,
            secure_cookies,
            max_upload_bytes,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable; empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_owned())
    }
}

fn invalid(key: &str, err: &impl ToString) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_owned(), err.to_string())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_owned(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.public_dir, PathBuf::from("public"));
        assert_eq!(config.cors_origin, "http://localhost:5173");
        assert!(!config.secure_cookies);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("WATCHSHOP_HOST", "0.0.0.0"),
            ("WATCHSHOP_PORT", "9000"),
            ("WATCHSHOP_DATA_DIR", "/srv/watchshop"),
            ("WATCHSHOP_SECURE_COOKIES", "TRUE"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:9000");
        assert_eq!(config.data_dir, PathBuf::from("/srv/watchshop"));
        assert!(config.secure_cookies);
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("WATCHSHOP_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "WATCHSHOP_PORT"));
    }

    #[test]
    fn test_invalid_bool() {
        assert!(load(&[("WATCHSHOP_SECURE_COOKIES", "maybe")]).is_err());
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load(&[("WATCHSHOP_PORT", "  "), ("SENTRY_DSN", "")]).unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_debug_redacts_dsn() {
        let config = load(&[("SENTRY_DSN", "https://key@o1.ingest.sentry.io/2")]).unwrap();
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("ingest.sentry.io"));
    }
}
