use std::{env, fmt, time::Duration};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use url::Url;

use crate::error::ConfigError;

/// Credentials sent as an HTTP Basic `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Already base64-encoded `user:password`.
    Token(String),
    Basic { username: String, password: String },
}

impl Credentials {
    /// The full `Authorization` header value.
    pub fn header_value(&self) -> String {
        match self {
            Credentials::Token(token) => format!("Basic {token}"),
            Credentials::Basic { username, password } => {
                format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
            }
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Token(_) => f.write_str("Token(<redacted>)"),
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

/// Connection settings for the store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Database endpoint, e.g.
    /// `https://cloud1.griddb.com/griddb/v2/gs_cluster/dbs/db1`.
    pub base_url: Url,
    pub credentials: Credentials,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
/// Default whole-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

impl StoreConfig {
    /// Creates a config with default timeouts.
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            credentials,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `GRIDDB_BASE_URL` - Database endpoint (required)
    /// - `GRIDDB_AUTH_TOKEN` - Pre-encoded Basic token, or
    /// - `GRIDDB_USERNAME` / `GRIDDB_PASSWORD` - Encoded on the fly
    /// - `GRIDDB_CONNECT_TIMEOUT_SECS` - Connect timeout (default: 5)
    /// - `GRIDDB_REQUEST_TIMEOUT_SECS` - Request timeout (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Self::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup("GRIDDB_BASE_URL").ok_or(ConfigError::Missing("GRIDDB_BASE_URL"))?;

        let credentials = match lookup("GRIDDB_AUTH_TOKEN").filter(|t| !t.is_empty()) {
            Some(token) => Credentials::Token(token),
            None => Credentials::Basic {
                username: lookup("GRIDDB_USERNAME")
                    .ok_or(ConfigError::Missing("GRIDDB_AUTH_TOKEN or GRIDDB_USERNAME"))?,
                password: lookup("GRIDDB_PASSWORD").ok_or(ConfigError::Missing("GRIDDB_PASSWORD"))?,
            },
        };

        let mut config = Self::new(&base_url, credentials)?;
        if let Some(secs) = seconds(&lookup, "GRIDDB_CONNECT_TIMEOUT_SECS")? {
            config.connect_timeout = secs;
        }
        if let Some(secs) = seconds(&lookup, "GRIDDB_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout = secs;
        }
        Ok(config)
    }

    pub fn with_timeouts(mut self, connect: Duration, request: Duration) -> Self {
        self.connect_timeout = connect;
        self.request_timeout = request;
        self
    }

    /// Absolute URL of an endpoint path such as `/checkConnection`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        value: value.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            value: value.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

fn seconds(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
    }
}
