//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; defaults suit local development.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL; `https://` enables secure cookies
//!   (default: <http://localhost:3000>)
//! - `STOREFRONT_STATIC_DIR` - Stylesheets and other assets
//!   (default: crates/storefront/static)
//! - `CATALOG_BASE_URL` - Product catalog API (default: <https://fakestoreapi.com>)
//! - `CATALOG_CACHE_TTL_SECS` - Cache lifetime for catalog responses (default: 300)
//! - `CATALOG_TIMEOUT_SECS` - Per-request timeout for catalog calls (default: 10)
//! - `USERS_FILE` - JSON file holding demo accounts (default: data/users.json)
//! - `CHECKOUT_DELAY_MS` - Simulated payment processing time (default: 2000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default product catalog API.
pub const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com";

/// Default demo account file.
pub const DEFAULT_USERS_FILE: &str = "data/users.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Product catalog client configuration
    pub catalog: CatalogConfig,
    /// Demo account storage file
    pub users_file: PathBuf,
    /// Simulated payment processing delay
    pub checkout_delay: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<SecretString>,
    /// Sentry environment name (e.g. "production")
    pub sentry_environment: Option<String>,
}

/// Product catalog client configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// API root, without trailing slash
    pub base_url: Url,
    /// How long successful responses are cached
    pub cache_ttl: Duration,
    /// Per-request timeout
    pub timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or("STOREFRONT_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_env_or("STOREFRONT_PORT", 3000u16)?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
        })?;
        let static_dir = PathBuf::from(get_env_or_default(
            "STOREFRONT_STATIC_DIR",
            "crates/storefront/static",
        ));

        let catalog = CatalogConfig::from_env()?;
        let users_file = users_file_from_env();
        let checkout_delay = Duration::from_millis(parse_env_or("CHECKOUT_DELAY_MS", 2000u64)?);

        let sentry_dsn = get_optional_env("SENTRY_DSN").map(SecretString::from);
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            base_url,
            static_dir,
            catalog,
            users_file,
            checkout_delay,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should carry the `Secure` flag.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl CatalogConfig {
    /// Load the catalog settings on their own (the CLI needs only these).
    ///
    /// Reads the process environment only; callers load `.env` first.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = get_env_or_default("CATALOG_BASE_URL", DEFAULT_CATALOG_URL);
        let base_url = parse_base_url(&raw)
            .map_err(|e| ConfigError::InvalidEnvVar("CATALOG_BASE_URL".to_string(), e))?;

        Ok(Self {
            base_url,
            cache_ttl: Duration::from_secs(parse_env_or("CATALOG_CACHE_TTL_SECS", 300u64)?),
            timeout: Duration::from_secs(parse_env_or("CATALOG_TIMEOUT_SECS", 10u64)?),
        })
    }

    /// Catalog settings for an explicit base URL with default timings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL is not an absolute http(s) URL.
    pub fn with_base_url(raw: &str) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(raw)
            .map_err(|e| ConfigError::InvalidEnvVar("CATALOG_BASE_URL".to_string(), e))?;
        Ok(Self {
            base_url,
            cache_ttl: Duration::from_secs(300),
            timeout: Duration::from_secs(10),
        })
    }
}

/// Demo account file location from `USERS_FILE`.
///
/// Shared with the CLI, which manages accounts without starting the server.
/// Like [`CatalogConfig::from_env`], this does not load `.env` itself.
#[must_use]
pub fn users_file_from_env() -> PathBuf {
    PathBuf::from(get_env_or_default("USERS_FILE", DEFAULT_USERS_FILE))
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a catalog base URL, requiring http(s) and dropping any trailing slash.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw.trim_end_matches('/')).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme '{other}'")),
    }
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            static_dir: PathBuf::from("static"),
            catalog: CatalogConfig::with_base_url(DEFAULT_CATALOG_URL).unwrap(),
            users_file: PathBuf::from("users.json"),
            checkout_delay: Duration::ZERO,
            sentry_dsn: Some(SecretString::from("https://key@sentry.example/1")),
            sentry_environment: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_secure_cookies_follow_scheme() {
        let mut config = config();
        assert!(!config.secure_cookies());
        config.base_url = "https://shop.example".to_string();
        assert!(config.secure_cookies());
    }

    #[test]
    fn test_debug_redacts_sentry_dsn() {
        let debug_output = format!("{:?}", config());
        assert!(!debug_output.contains("https://key@sentry.example/1"));
    }

    #[test]
    fn test_parse_base_url_strips_trailing_slash() {
        let url = parse_base_url("http://127.0.0.1:8080/").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/");
        let url = parse_base_url("https://api.example/v1/").unwrap();
        assert_eq!(url.as_str(), "https://api.example/v1");
    }

    #[test]
    fn test_parse_base_url_rejects_other_schemes() {
        assert!(parse_base_url("ftp://example.com").is_err());
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_parse_env_or_uses_default_when_unset() {
        let value: u64 = parse_env_or("BAZAAR_TEST_SURELY_UNSET_VAR", 42).unwrap();
        assert_eq!(value, 42);
    }
}
