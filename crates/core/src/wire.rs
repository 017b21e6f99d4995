//! Request and response bodies of the store's Web API.
//!
//! [`RowQuery`] is the typed form used inside the system; it is turned into
//! the wire [`AcquireRowsRequest`] only by the HTTP client, so the condition
//! stays an expression tree until the last moment.

use serde::{Deserialize, Serialize};

use crate::sql::{Expr, Order};

/// A positional row as the store sends and receives it.
pub type Row = Vec<serde_json::Value>;

/// Body of `POST /containers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerDefinition {
    pub container_name: String,
    pub container_type: String,
    pub rowkey: bool,
    pub columns: Vec<ColumnDefinition>,
}

/// One column of a [`ContainerDefinition`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub index: Vec<String>,
}

/// Sort key of a row read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub column: &'static str,
    pub order: Order,
}

impl Sort {
    pub fn ascending(column: &'static str) -> Self {
        Self {
            column,
            order: Order::Asc,
        }
    }

    /// The store's textual form, e.g. `id ASC`.
    pub fn to_wire(&self) -> String {
        format!("{} {}", self.column, self.order.as_str())
    }
}

/// A row-level read against one container.
#[derive(Debug, Clone, PartialEq)]
pub struct RowQuery {
    pub offset: Option<u64>,
    pub limit: u64,
    pub condition: Option<Expr>,
    pub sort: Option<Sort>,
}

impl RowQuery {
    /// Reads up to `limit` rows with no condition.
    pub fn limit(limit: u64) -> Self {
        Self {
            offset: None,
            limit,
            condition: None,
            sort: None,
        }
    }

    pub fn with_condition(mut self, condition: Expr) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// Body of `POST /containers/{name}/rows`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquireRowsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    pub limit: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl From<&RowQuery> for AcquireRowsRequest {
    fn from(query: &RowQuery) -> Self {
        Self {
            offset: query.offset,
            limit: query.limit,
            condition: query.condition.as_ref().map(ToString::to_string),
            sort: query.sort.as_ref().map(Sort::to_wire),
        }
    }
}

/// Column metadata returned with rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type", default)]
    pub column_type: String,
}

/// Response of a row read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcquireRowsResponse {
    #[serde(default)]
    pub columns: Vec<ColumnInfo>,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub total: u64,
}

/// One entry of a SQL batch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlStatement {
    pub stmt: String,
}

/// Per-statement result of `POST /sql/dml/query`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub columns: Vec<ColumnInfo>,
    #[serde(default)]
    pub results: Vec<Row>,
}

/// Per-statement result of `POST /sql/dml/update` and `POST /sql/ddl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResult {
    /// `1` on success, `0` on failure.
    pub status: i32,
    #[serde(rename = "updatedRows", default)]
    pub updated_rows: i64,
    #[serde(default)]
    pub stmt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UpdateResult {
    pub fn success(stmt: impl Into<String>, updated_rows: i64) -> Self {
        Self {
            status: 1,
            updated_rows,
            stmt: stmt.into(),
            message: None,
        }
    }

    pub fn failure(stmt: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: 0,
            updated_rows: 0,
            stmt: stmt.into(),
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 1
    }
}
