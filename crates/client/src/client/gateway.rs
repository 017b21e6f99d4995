//! [`StoreGateway`] over HTTP.

use async_trait::async_trait;
use volmatch_core::sql::Statement;
use volmatch_core::storage::{Result, StoreGateway};
use volmatch_core::wire::{
    AcquireRowsResponse, ContainerDefinition, QueryResult, Row, RowQuery, UpdateResult,
};

use super::GridDbClient;

#[async_trait]
impl StoreGateway for GridDbClient {
    async fn check_connection(&self) -> bool {
        GridDbClient::check_connection(self).await
    }

    async fn create_container(&self, definition: &ContainerDefinition) -> Result<()> {
        GridDbClient::create_container(self, definition).await
    }

    async fn register_rows(&self, container: &str, rows: &[Row]) -> Result<()> {
        GridDbClient::register_rows(self, container, rows).await
    }

    async fn acquire_rows(&self, container: &str, query: &RowQuery) -> Result<AcquireRowsResponse> {
        GridDbClient::acquire_rows(self, container, query).await
    }

    async fn run_query(&self, statements: &[Statement]) -> Result<Vec<QueryResult>> {
        GridDbClient::run_query(self, statements).await
    }

    async fn run_update(&self, statements: &[Statement]) -> Result<Vec<UpdateResult>> {
        GridDbClient::run_update(self, statements).await
    }

    async fn run_ddl(&self, statements: &[Statement]) -> Result<Vec<UpdateResult>> {
        GridDbClient::run_ddl(self, statements).await
    }
}
