//! In-memory store backend for testing.
//!
//! [`InMemoryGateway`] keeps every container in a `HashMap` wrapped in
//! `Arc<RwLock<_>>` and evaluates SQL statement trees directly, so the
//! repositories above it run unchanged against it.
//!
//! # Example
//!
//! ```rust,ignore
//! use volmatch::storage::inmemory::InMemoryGateway;
//!
//! let gateway = InMemoryGateway::new();
//! // Provision containers, then build repositories over it...
//! ```

mod eval;
mod store;

pub use store::InMemoryGateway;
