//! Container (schema) registration.

use reqwest::Method;
use volmatch_core::storage::{Result, StoreError};
use volmatch_core::wire::ContainerDefinition;

use super::GridDbClient;

impl GridDbClient {
    /// `POST /containers`. A 409 means the container already exists and
    /// counts as success.
    pub async fn create_container(&self, definition: &ContainerDefinition) -> Result<()> {
        match self.send_json(Method::POST, "/containers", definition).await {
            Ok(_) => Ok(()),
            Err(StoreError::Fault {
                status: Some(409), ..
            }) => {
                tracing::info!(
                    container = %definition.container_name,
                    "Container already exists"
                );
                Ok(())
            }
            Err(error) => Err(error),
        }
    }
}
