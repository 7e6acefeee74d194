//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BLOOM_API_BASE_URL` - Base URL of the REST API (e.g., `https://api.bloom.in/api/`)
//!
//! ## Optional
//! - `BLOOM_SESSION_PATH` - Session file location (default: `.bloom/session.json`)
//! - `BLOOM_HTTP_TIMEOUT_SECS` - Connect and request timeout (default: 30)
//! - `BLOOM_CURRENCY` - Display currency code (default: INR)

use std::path::PathBuf;
use std::time::Duration;

use bloom_core::CurrencyCode;
use thiserror::Error;
use url::Url;

const DEFAULT_SESSION_PATH: &str = ".bloom/session.json";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Bloom client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, always ending in `/` so relative paths join beneath it
    pub api_base_url: Url,
    /// Where the session (token and user profile) is persisted
    pub session_path: PathBuf,
    /// Timeout applied to connecting and to each whole request
    pub http_timeout: Duration,
    /// Currency used when formatting amounts
    pub currency: CurrencyCode,
}

impl ClientConfig {
    /// Configuration with defaults for everything except the API URL.
    #[must_use]
    pub fn new(api_base_url: Url) -> Self {
        Self {
            api_base_url: normalize_base_url(api_base_url),
            session_path: PathBuf::from(DEFAULT_SESSION_PATH),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            currency: CurrencyCode::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = parse_base_url(&get_required_env("BLOOM_API_BASE_URL")?)?;
        let session_path = PathBuf::from(get_env_or_default(
            "BLOOM_SESSION_PATH",
            DEFAULT_SESSION_PATH,
        ));
        let http_timeout = parse_timeout(&get_env_or_default(
            "BLOOM_HTTP_TIMEOUT_SECS",
            &DEFAULT_HTTP_TIMEOUT_SECS.to_string(),
        ))?;
        let currency = get_env_or_default("BLOOM_CURRENCY", CurrencyCode::default().code())
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("BLOOM_CURRENCY".to_string(), e))?;

        Ok(Self {
            api_base_url,
            session_path,
            http_timeout,
            currency,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse and normalize the API base URL. Only http(s) is accepted.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidEnvVar("BLOOM_API_BASE_URL".to_string(), msg);
    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    Ok(normalize_base_url(url))
}

fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidEnvVar("BLOOM_HTTP_TIMEOUT_SECS".to_string(), msg);
    let secs = raw.trim().parse::<u64>().map_err(|e| invalid(e.to_string()))?;
    if secs == 0 {
        return Err(invalid("must be greater than zero".to_string()));
    }
    Ok(Duration::from_secs(secs))
}
