//! In-memory gateway implementation.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use volmatch_core::sql::{Delete, Insert, Order, Statement};
use volmatch_core::storage::{Result, StoreError, StoreGateway};
use volmatch_core::wire::{
    AcquireRowsResponse, ColumnDefinition, ColumnInfo, ContainerDefinition, QueryResult, Row,
    RowQuery, UpdateResult,
};

use super::eval::{compare_values, filter_rows, run_select};

/// One container: its declared columns and rows keyed by row key.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<ColumnDefinition>,
    rows: BTreeMap<String, Row>,
}

impl Table {
    fn new(definition: &ContainerDefinition) -> Self {
        Self {
            columns: definition.columns.clone(),
            rows: BTreeMap::new(),
        }
    }

    pub(super) fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == column)
    }

    pub(super) fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.values()
    }

    pub(super) fn column_info(&self) -> Vec<ColumnInfo> {
        self.columns
            .iter()
            .map(|c| ColumnInfo {
                name: c.name.clone(),
                column_type: c.column_type.clone(),
            })
            .collect()
    }

    /// Validates a row's shape and returns its row key.
    fn key_of(&self, row: &Row) -> std::result::Result<String, String> {
        if row.len() != self.columns.len() {
            return Err(format!(
                "row has {} values, container declares {}",
                row.len(),
                self.columns.len()
            ));
        }
        match row.first() {
            Some(serde_json::Value::String(key)) if !key.is_empty() => Ok(key.clone()),
            _ => Err("row key must be a non-empty string".to_string()),
        }
    }
}

fn bad_request(body: impl Into<String>) -> StoreError {
    StoreError::Fault {
        status: Some(400),
        body: body.into(),
    }
}

fn missing_container(name: &str) -> StoreError {
    StoreError::Fault {
        status: Some(404),
        body: format!("container {name} does not exist"),
    }
}

/// In-memory [`StoreGateway`] for testing and local runs.
///
/// Tables live in a `HashMap` wrapped in `Arc<RwLock<_>>`. Row writes are
/// upserts by row key, row reads honour condition, sort and limit, and SQL
/// statements are evaluated from their trees. Data is lost when the gateway
/// is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGateway {
    tables: Arc<RwLock<HashMap<String, Table>>>,
}

impl InMemoryGateway {
    /// Creates a new empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently stored in `container`.
    pub async fn row_count(&self, container: &str) -> usize {
        let tables = self.tables.read().await;
        tables.get(container).map_or(0, |table| table.rows.len())
    }

    fn apply_delete(tables: &mut HashMap<String, Table>, delete: &Delete, stmt: String) -> UpdateResult {
        let Some(table) = tables.get(delete.table) else {
            return UpdateResult::failure(stmt, format!("container {} does not exist", delete.table));
        };
        let keys: Vec<String> = match filter_rows(table, delete.table, Some(&delete.condition)) {
            Ok(rows) => rows
                .into_iter()
                .filter_map(|row| row.first().and_then(|v| v.as_str()).map(str::to_string))
                .collect(),
            Err(error) => return UpdateResult::failure(stmt, error.to_string()),
        };
        if let Some(table) = tables.get_mut(delete.table) {
            for key in &keys {
                table.rows.remove(key);
            }
        }
        UpdateResult::success(stmt, keys.len() as i64)
    }

    fn apply_insert(tables: &mut HashMap<String, Table>, insert: &Insert, stmt: String) -> UpdateResult {
        let Some(table) = tables.get_mut(insert.table) else {
            return UpdateResult::failure(stmt, format!("container {} does not exist", insert.table));
        };

        let mut staged: BTreeMap<String, Row> = BTreeMap::new();
        for literals in &insert.rows {
            let mut row: Row = vec![serde_json::Value::Null; table.columns.len()];
            for (column, literal) in insert.columns.iter().zip(literals) {
                match table.position(column) {
                    Some(position) => row[position] = literal.to_value(),
                    None => return UpdateResult::failure(stmt, format!("unknown column {column}")),
                }
            }
            let key = match table.key_of(&row) {
                Ok(key) => key,
                Err(message) => return UpdateResult::failure(stmt, message),
            };
            if table.rows.contains_key(&key) || staged.contains_key(&key) {
                return UpdateResult::failure(stmt, format!("duplicate row key {key}"));
            }
            staged.insert(key, row);
        }

        let inserted = staged.len() as i64;
        table.rows.extend(staged);
        UpdateResult::success(stmt, inserted)
    }
}

#[async_trait]
impl StoreGateway for InMemoryGateway {
    async fn check_connection(&self) -> bool {
        true
    }

    async fn create_container(&self, definition: &ContainerDefinition) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables
            .entry(definition.container_name.clone())
            .or_insert_with(|| Table::new(definition));
        Ok(())
    }

    async fn register_rows(&self, container: &str, rows: &[Row]) -> Result<()> {
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(container)
            .ok_or_else(|| missing_container(container))?;

        // Validate everything first so a bad row writes nothing.
        let mut keyed = Vec::with_capacity(rows.len());
        for row in rows {
            let key = table.key_of(row).map_err(bad_request)?;
            keyed.push((key, row.clone()));
        }
        table.rows.extend(keyed);
        Ok(())
    }

    async fn acquire_rows(&self, container: &str, query: &RowQuery) -> Result<AcquireRowsResponse> {
        let tables = self.tables.read().await;
        let table = tables
            .get(container)
            .ok_or_else(|| missing_container(container))?;

        let mut rows = filter_rows(table, container, query.condition.as_ref())?;
        if let Some(sort) = &query.sort {
            let position = table
                .position(sort.column)
                .ok_or_else(|| bad_request(format!("unknown sort column {}", sort.column)))?;
            rows.sort_by(|a, b| {
                let ordering = compare_values(&a[position], &b[position]);
                match sort.order {
                    Order::Asc => ordering,
                    Order::Desc => ordering.reverse(),
                }
            });
        }

        let total = rows.len() as u64;
        let offset = query.offset.unwrap_or(0);
        let rows: Vec<Row> = rows
            .into_iter()
            .skip(offset as usize)
            .take(query.limit as usize)
            .cloned()
            .collect();

        Ok(AcquireRowsResponse {
            columns: table.column_info(),
            rows,
            offset,
            limit: query.limit,
            total,
        })
    }

    async fn run_query(&self, statements: &[Statement]) -> Result<Vec<QueryResult>> {
        let tables = self.tables.read().await;
        let lookup = |name: &str| tables.get(name).ok_or_else(|| missing_container(name));

        statements
            .iter()
            .map(|statement| match statement {
                Statement::Select(select) => run_select(select, &lookup),
                other => Err(bad_request(format!("not a query: {other}"))),
            })
            .collect()
    }

    async fn run_update(&self, statements: &[Statement]) -> Result<Vec<UpdateResult>> {
        let mut tables = self.tables.write().await;

        // Each statement runs on its own; a failure does not roll back or
        // skip the others.
        Ok(statements
            .iter()
            .map(|statement| {
                let stmt = statement.to_string();
                match statement {
                    Statement::Delete(delete) => Self::apply_delete(&mut tables, delete, stmt),
                    Statement::Insert(insert) => Self::apply_insert(&mut tables, insert, stmt),
                    _ => UpdateResult::failure(stmt, "not an update statement"),
                }
            })
            .collect())
    }

    async fn run_ddl(&self, statements: &[Statement]) -> Result<Vec<UpdateResult>> {
        let mut tables = self.tables.write().await;

        Ok(statements
            .iter()
            .map(|statement| match statement {
                Statement::CreateTable(create) => {
                    let definition = create.schema.definition();
                    tables
                        .entry(definition.container_name.clone())
                        .or_insert_with(|| Table::new(&definition));
                    UpdateResult::success(statement.to_string(), 0)
                }
                other => UpdateResult::failure(other.to_string(), "not a DDL statement"),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use volmatch_core::schema::{OPPORTUNITIES, REGISTRATIONS, SKILLS, VOLUNTEER_SKILLS};
    use volmatch_core::sql::{col, qualified, CreateTable, Select, TableRef};
    use volmatch_core::wire::Sort;

    use super::*;

    async fn gateway_with_skills() -> InMemoryGateway {
        let gateway = InMemoryGateway::new();
        gateway.create_container(&SKILLS.definition()).await.unwrap();
        gateway
            .register_rows(
                SKILLS.name,
                &[
                    vec![json!("sk_2"), json!("Driving")],
                    vec![json!("sk_1"), json!("First aid")],
                    vec![json!("sk_3"), json!("O'Brien \"the\" \\helper")],
                ],
            )
            .await
            .unwrap();
        gateway
    }

    #[tokio::test]
    async fn test_register_rows_upserts_by_key() {
        let gateway = gateway_with_skills().await;
        gateway
            .register_rows(SKILLS.name, &[vec![json!("sk_1"), json!("CPR")]])
            .await
            .unwrap();

        let response = gateway
            .acquire_rows(
                SKILLS.name,
                &RowQuery::limit(1).with_condition(col("id").eq("sk_1")),
            )
            .await
            .unwrap();

        assert_eq!(gateway.row_count(SKILLS.name).await, 3);
        assert_eq!(response.rows, vec![vec![json!("sk_1"), json!("CPR")]]);
    }

    #[tokio::test]
    async fn test_register_rows_rejects_bad_shape() {
        let gateway = gateway_with_skills().await;

        let result = gateway
            .register_rows(
                SKILLS.name,
                &[vec![json!("sk_9"), json!("Ok")], vec![json!("sk_10")]],
            )
            .await;

        assert!(matches!(result, Err(StoreError::Fault { status: Some(400), .. })));
        assert_eq!(gateway.row_count(SKILLS.name).await, 3);
    }

    #[tokio::test]
    async fn test_missing_container_is_a_fault() {
        let gateway = InMemoryGateway::new();

        let result = gateway.acquire_rows("VoMaNowhere", &RowQuery::limit(1)).await;

        assert!(matches!(result, Err(StoreError::Fault { status: Some(404), .. })));
    }

    #[tokio::test]
    async fn test_acquire_rows_sorts_and_limits() {
        let gateway = gateway_with_skills().await;

        let response = gateway
            .acquire_rows(
                SKILLS.name,
                &RowQuery::limit(2).with_sort(Sort::ascending("id")),
            )
            .await
            .unwrap();

        let ids: Vec<&str> = response.rows.iter().map(|row| row[0].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["sk_1", "sk_2"]);
        assert_eq!(response.total, 3);
    }

    #[tokio::test]
    async fn test_condition_matches_awkward_text_exactly() {
        let gateway = gateway_with_skills().await;

        let response = gateway
            .acquire_rows(
                SKILLS.name,
                &RowQuery::limit(1).with_condition(col("name").eq("O'Brien \"the\" \\helper")),
            )
            .await
            .unwrap();

        assert_eq!(response.rows.len(), 1);
        assert_eq!(response.rows[0][0], "sk_3");
    }

    #[tokio::test]
    async fn test_count_and_in_list() {
        let gateway = gateway_with_skills().await;

        let results = gateway
            .run_query(&[
                Select::count(TableRef::new(SKILLS.name), col("id")).into(),
                Select::all_from(TableRef::new(SKILLS.name))
                    .filter(col("id").in_list(["sk_1", "sk_3", "sk_missing"]))
                    .order_by(col("id"), Order::Desc)
                    .into(),
            ])
            .await
            .unwrap();

        assert_eq!(results[0].results, vec![vec![json!(3)]]);
        let ids: Vec<&str> = results[1]
            .results
            .iter()
            .map(|row| row[0].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["sk_3", "sk_1"]);
    }

    #[tokio::test]
    async fn test_left_join_keeps_unmatched_rows() {
        let gateway = gateway_with_skills().await;
        gateway
            .run_ddl(&[CreateTable { schema: &VOLUNTEER_SKILLS }.into()])
            .await
            .unwrap();
        gateway
            .register_rows(
                VOLUNTEER_SKILLS.name,
                &[
                    vec![json!("vsk_1"), json!("usr_1"), json!("sk_1"), json!(null), json!("VERIFIED")],
                    vec![json!("vsk_2"), json!("usr_1"), json!("sk_gone"), json!(null), json!("PENDING")],
                    vec![json!("vsk_3"), json!("usr_2"), json!("sk_2"), json!(null), json!("PENDING")],
                ],
            )
            .await
            .unwrap();

        let select = Select::all_from(TableRef::aliased(VOLUNTEER_SKILLS.name, "vs"))
            .schema_columns("vs", &VOLUNTEER_SKILLS)
            .with_column(qualified("sk", "name"), "skillName")
            .left_join(
                TableRef::aliased(SKILLS.name, "sk"),
                qualified("vs", "skillId"),
                qualified("sk", "id"),
            )
            .filter(qualified("vs", "userId").eq("usr_1"))
            .order_by(qualified("vs", "id"), Order::Asc);

        let results = gateway.run_query(&[select.into()]).await.unwrap();
        let result = &results[0];

        assert_eq!(result.columns.last().unwrap().name, "skillName");
        assert_eq!(result.results.len(), 2);
        assert_eq!(result.results[0].last().unwrap(), &json!("First aid"));
        assert_eq!(result.results[1].last().unwrap(), &json!(null));
    }

    #[tokio::test]
    async fn test_update_batch_continues_after_failure() {
        let gateway = gateway_with_skills().await;

        let results = gateway
            .run_update(&[
                Insert::rows(&SKILLS, &[vec![json!("sk_1"), json!("Duplicate")]]).into(),
                Delete {
                    table: SKILLS.name,
                    condition: col("id").eq("sk_2"),
                }
                .into(),
            ])
            .await
            .unwrap();

        assert!(!results[0].is_success());
        assert!(results[1].is_success());
        assert_eq!(results[1].updated_rows, 1);
        assert_eq!(gateway.row_count(SKILLS.name).await, 2);
    }

    #[tokio::test]
    async fn test_ddl_is_idempotent() {
        let gateway = InMemoryGateway::new();
        let create: Statement = CreateTable { schema: &OPPORTUNITIES }.into();

        gateway.run_ddl(&[create.clone()]).await.unwrap();
        let results = gateway.run_ddl(&[create]).await.unwrap();
        gateway.create_container(&OPPORTUNITIES.definition()).await.unwrap();

        assert!(results[0].is_success());
        assert_eq!(gateway.row_count(OPPORTUNITIES.name).await, 0);
        assert!(gateway.run_query(&[Select::all_from(TableRef::new(REGISTRATIONS.name)).into()]).await.is_err());
    }
}
