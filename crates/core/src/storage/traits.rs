use async_trait::async_trait;

use crate::codec::Entity;
use crate::sql::Statement;
use crate::wire::{AcquireRowsResponse, ContainerDefinition, QueryResult, Row, RowQuery, UpdateResult};

use super::Result;

/// Transport to the store.
///
/// One method per endpoint of the store's Web API. Implementations classify
/// every failure into [`super::StoreError`]; none of them retry.
#[async_trait]
pub trait StoreGateway: Send + Sync {
    /// Liveness probe. Never fails; a failed probe is logged and reported
    /// as `false`.
    async fn check_connection(&self) -> bool;

    /// Creates a container. An already existing container is success.
    async fn create_container(&self, definition: &ContainerDefinition) -> Result<()>;

    /// Upserts rows by id.
    async fn register_rows(&self, container: &str, rows: &[Row]) -> Result<()>;

    /// Row-level read with optional condition, sort and limit.
    async fn acquire_rows(&self, container: &str, query: &RowQuery) -> Result<AcquireRowsResponse>;

    /// Read-only SQL; one result per statement, in order.
    async fn run_query(&self, statements: &[Statement]) -> Result<Vec<QueryResult>>;

    /// Mutating SQL, executed in order but not atomically.
    async fn run_update(&self, statements: &[Statement]) -> Result<Vec<UpdateResult>>;

    /// Schema SQL.
    async fn run_ddl(&self, statements: &[Statement]) -> Result<Vec<UpdateResult>>;
}

/// The create/get/find/update/delete cycle every entity supports.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Writes a new record, assigning an id if none is set. Returns the id.
    async fn create(&self, record: &E) -> Result<String>;

    /// Reads one record. Zero rows is `StoreError::NotFound`.
    async fn get(&self, id: &str) -> Result<E>;

    /// Reads the first page of records sorted by id ascending.
    async fn find_all(&self) -> Result<Vec<E>>;

    /// Full-row rewrite of the record stored under `id`.
    async fn update(&self, id: &str, record: &E) -> Result<()>;

    /// Always `StoreError::Unsupported`: the store API used here cannot
    /// delete rows.
    async fn delete(&self, id: &str) -> Result<()>;

    /// `get` succeeded, or `false` on `NotFound`. Other errors propagate.
    async fn id_exists(&self, id: &str) -> Result<bool>;
}
