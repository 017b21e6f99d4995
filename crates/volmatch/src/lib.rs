//! volmatch - store-access layer for volunteer matching.
//!
//! Repositories for the eight entities over any
//! [`volmatch_core::storage::StoreGateway`], the registration validation
//! engine and service, configuration, and the operator CLI definitions.

pub mod cli;
pub mod config;
pub mod output;
pub mod registration;
pub mod storage;
