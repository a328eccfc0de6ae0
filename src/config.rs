// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Client Configuration
//!
//! Construction-time settings for [`Client`](crate::Client). Configuration can
//! be built in code or loaded from the environment.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `AUTHIK_SECRET_KEY` | Secret API key (`authik_sk_...`) | Required |
//! | `AUTHIK_API_URL` | Authik API base URL | `https://api.authik.com` |
//! | `AUTHIK_TIMEOUT_SECS` | HTTP request timeout | `10` |
//! | `AUTHIK_JWKS_CACHE_TTL_SECS` | How long a fetched JWKS is trusted | `3600` |
//! | `AUTHIK_LEEWAY_SECS` | Clock skew tolerance for time claims | `0` |
//! | `LOG_FORMAT` | CLI logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | CLI log level filter | `info` |

use std::fmt;
use std::time::Duration;

use url::Url;

/// Environment variable holding the secret API key.
pub const SECRET_KEY_ENV: &str = "AUTHIK_SECRET_KEY";
/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "AUTHIK_API_URL";
/// Environment variable overriding the HTTP timeout, in seconds.
pub const TIMEOUT_ENV: &str = "AUTHIK_TIMEOUT_SECS";
/// Environment variable overriding the JWKS cache TTL, in seconds.
pub const JWKS_CACHE_TTL_ENV: &str = "AUTHIK_JWKS_CACHE_TTL_SECS";
/// Environment variable overriding the clock skew leeway, in seconds.
pub const LEEWAY_ENV: &str = "AUTHIK_LEEWAY_SECS";
/// Environment variable selecting the CLI log format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Production API base URL.
pub const DEFAULT_API_URL: &str = "https://api.authik.com";
/// Default HTTP timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Default JWKS cache TTL (1 hour).
pub const DEFAULT_JWKS_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Every secret key starts with this prefix.
pub const SECRET_KEY_PREFIX: &str = "authik_sk_";

/// Configuration error. Returned from constructors instead of panicking.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("authik: invalid secret key (expected prefix 'authik_sk_')")]
    InvalidSecretKey,

    #[error("authik: invalid API URL '{url}': {reason}")]
    InvalidApiUrl { url: String, reason: String },

    #[error("authik: missing environment variable {0}")]
    MissingEnv(&'static str),

    #[error("authik: invalid value for {name}: '{value}'")]
    InvalidEnv { name: &'static str, value: String },

    #[error("authik: failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Validated secret API key.
///
/// `Debug` never prints the key itself.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(String);

impl SecretKey {
    /// Validate the key format.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = raw.into();
        let rest = raw
            .strip_prefix(SECRET_KEY_PREFIX)
            .ok_or(ConfigError::InvalidSecretKey)?;
        if rest.is_empty() || rest.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidSecretKey);
        }
        Ok(Self(raw))
    }

    /// The raw key, for the `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey({SECRET_KEY_PREFIX}***)")
    }
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub secret_key: SecretKey,
    pub api_url: Url,
    pub timeout: Duration,
    pub jwks_cache_ttl: Duration,
    pub leeway: Duration,
}

impl ClientConfig {
    /// Configuration with production defaults for the given secret key.
    pub fn new(secret_key: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            secret_key: SecretKey::parse(secret_key)?,
            api_url: parse_api_url(DEFAULT_API_URL)?,
            timeout: DEFAULT_TIMEOUT,
            jwks_cache_ttl: DEFAULT_JWKS_CACHE_TTL,
            leeway: Duration::ZERO,
        })
    }

    /// Point the client at a different API deployment.
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self, ConfigError> {
        self.api_url = parse_api_url(api_url)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_jwks_cache_ttl(mut self, ttl: Duration) -> Self {
        self.jwks_cache_ttl = ttl;
        self
    }

    /// Tolerate this much clock skew when checking `exp`, `nbf` and `iat`.
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let secret_key = get(SECRET_KEY_ENV).ok_or(ConfigError::MissingEnv(SECRET_KEY_ENV))?;
        let mut config = Self::new(secret_key)?;

        if let Some(api_url) = get(API_URL_ENV) {
            config = config.with_api_url(&api_url)?;
        }
        if let Some(value) = get(TIMEOUT_ENV) {
            config.timeout = parse_secs(TIMEOUT_ENV, value)?;
        }
        if let Some(value) = get(JWKS_CACHE_TTL_ENV) {
            config.jwks_cache_ttl = parse_secs(JWKS_CACHE_TTL_ENV, value)?;
        }
        if let Some(value) = get(LEEWAY_ENV) {
            config.leeway = parse_secs(LEEWAY_ENV, value)?;
        }

        Ok(config)
    }
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidApiUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidApiUrl {
            url: raw.to_string(),
            reason: "scheme must be http or https".to_string(),
        });
    }
    Ok(url)
}

fn parse_secs(name: &'static str, value: String) -> Result<Duration, ConfigError> {
    value
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ConfigError::InvalidEnv { name, value })
}
