mod error;
mod http_mapping;
mod traits;

pub use error::{Result, StoreError};
pub use http_mapping::store_error_to_status_code;
pub use traits::{Repository, StoreGateway};

/// Rows read by `find_all` and foreign-key lookups.
pub const PAGE_SIZE: u64 = 50;
