use std::env;

use thiserror::Error;
use volmatch_client::{ConfigError, StoreConfig};
use volmatch_core::codec::DecodePolicy;

/// Errors that can occur while loading [`Settings`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error(transparent)]
    Store(#[from] ConfigError),

    #[error("VOLMATCH_DECODE_POLICY: {0}")]
    DecodePolicy(String),
}

/// Runtime configuration: where the store is and how reads are decoded.
#[derive(Debug, Clone)]
pub struct Settings {
    pub store: StoreConfig,
    pub decode_policy: DecodePolicy,
}

impl Settings {
    /// Load settings from environment variables.
    ///
    /// Reads everything [`StoreConfig::from_env`] reads, plus:
    /// - `VOLMATCH_DECODE_POLICY` - `lenient` or `strict` (default: lenient)
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Self::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let decode_policy = match lookup("VOLMATCH_DECODE_POLICY") {
            Some(value) => value.parse().map_err(SettingsError::DecodePolicy)?,
            None => DecodePolicy::default(),
        };

        Ok(Self {
            store: StoreConfig::from_lookup(&lookup)?,
            decode_policy,
        })
    }
}
