//! Declared container schemas.
//!
//! Each entity has exactly one [`ContainerSchema`]: the container name and
//! the ordered column list fixed at container creation. Positional rows are
//! only ever produced from, or read against, these declarations.

mod containers;

pub use containers::{
    ALL, OPPORTUNITIES, OPPORTUNITY_REQUIREMENTS, ORGANIZATIONS, ORGANIZATION_MEMBERS,
    REGISTRATIONS, SKILLS, USERS, VOLUNTEER_SKILLS,
};

use crate::wire::{ColumnDefinition, ContainerDefinition};

/// Name of the row-key column every container starts with.
pub const ID_COLUMN: &str = "id";

/// Store column types used by this system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    String,
    Bool,
    Long,
    Timestamp,
}

impl ColumnType {
    /// The type name the store expects in a container definition.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "STRING",
            ColumnType::Bool => "BOOL",
            ColumnType::Long => "LONG",
            ColumnType::Timestamp => "TIMESTAMP",
        }
    }
}

/// One declared column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub column_type: ColumnType,
    /// Whether the store keeps a TREE index on this column.
    pub indexed: bool,
}

impl Column {
    pub const fn new(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            indexed: false,
        }
    }

    pub const fn indexed(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            indexed: true,
        }
    }
}

/// A container name plus its ordered columns.
#[derive(Debug, PartialEq, Eq)]
pub struct ContainerSchema {
    pub name: &'static str,
    pub columns: &'static [Column],
}

impl ContainerSchema {
    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&'static Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Position of a column in the wire row.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    /// Column names in wire order.
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|column| column.name).collect()
    }

    /// The body sent to the container-creation endpoint.
    pub fn definition(&self) -> ContainerDefinition {
        ContainerDefinition {
            container_name: self.name.to_string(),
            container_type: "COLLECTION".to_string(),
            rowkey: true,
            columns: self
                .columns
                .iter()
                .map(|column| ColumnDefinition {
                    name: column.name.to_string(),
                    column_type: column.column_type.as_str().to_string(),
                    index: if column.indexed {
                        vec!["TREE".to_string()]
                    } else {
                        Vec::new()
                    },
                })
                .collect(),
        }
    }
}
