//! volmatch_client - gateway client for the GridDB Cloud Web API.
//!
//! [`GridDbClient`] implements [`volmatch_core::storage::StoreGateway`] over
//! HTTPS with Basic authentication. Every failure is classified into
//! [`volmatch_core::storage::StoreError`].

pub mod client;
pub mod config;
pub mod error;

pub use client::GridDbClient;
pub use config::{Credentials, StoreConfig};
pub use error::ConfigError;
