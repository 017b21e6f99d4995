//! Container provisioning.

use serde::Serialize;

use volmatch_core::schema::{ContainerSchema, ALL};
use volmatch_core::sql::{CreateTable, Statement};
use volmatch_core::storage::{Result, StoreError, StoreGateway};

/// How containers are created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProvisionMode {
    /// `POST /containers` per container.
    #[default]
    Rest,
    /// `CREATE TABLE IF NOT EXISTS` through the DDL endpoint.
    Sql,
}

/// A container that could not be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionFailure {
    pub container: &'static str,
    pub error: String,
}

/// Outcome of [`provision_containers`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    pub created: Vec<&'static str>,
    pub failed: Vec<ProvisionFailure>,
}

impl ProvisionReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

async fn provision_one(
    gateway: &dyn StoreGateway,
    schema: &'static ContainerSchema,
    mode: ProvisionMode,
) -> Result<()> {
    match mode {
        ProvisionMode::Rest => gateway.create_container(&schema.definition()).await,
        ProvisionMode::Sql => {
            let results = gateway
                .run_ddl(&[Statement::from(CreateTable { schema })])
                .await?;
            match results.first() {
                Some(result) if result.is_success() => Ok(()),
                Some(result) => Err(StoreError::Fault {
                    status: None,
                    body: result
                        .message
                        .clone()
                        .unwrap_or_else(|| format!("DDL status {}", result.status)),
                }),
                None => Err(StoreError::transport("DDL returned no result")),
            }
        }
    }
}

/// Creates every container, continuing past individual failures.
///
/// Already existing containers count as created.
pub async fn provision_containers(gateway: &dyn StoreGateway, mode: ProvisionMode) -> ProvisionReport {
    let mut report = ProvisionReport::default();

    for schema in ALL {
        match provision_one(gateway, schema, mode).await {
            Ok(()) => {
                tracing::info!(container = schema.name, ?mode, "Container ready");
                report.created.push(schema.name);
            }
            Err(error) => {
                tracing::error!(container = schema.name, ?mode, error = %error, "Container creation failed");
                report.failed.push(ProvisionFailure {
                    container: schema.name,
                    error: error.to_string(),
                });
            }
        }
    }

    report
}
