//! volmatch_core - pure building blocks for the volmatch store-access layer.
//!
//! Nothing in this crate performs I/O. It defines the domain records, the
//! per-entity container schemas, the row codec, the SQL statement tree, the
//! store wire types and the traits the imperative shell implements.

pub mod codec;
pub mod domain;
pub mod ids;
pub mod registration;
pub mod schema;
pub mod sql;
pub mod storage;
pub mod wire;
