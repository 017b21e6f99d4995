//! SQL endpoints. Statement trees are rendered to text here and nowhere
//! earlier.

use reqwest::Method;
use volmatch_core::sql::Statement;
use volmatch_core::storage::Result;
use volmatch_core::wire::{QueryResult, SqlStatement, UpdateResult};

use super::GridDbClient;

fn envelope(statements: &[Statement]) -> Vec<SqlStatement> {
    statements.iter().map(Statement::to_wire).collect()
}

impl GridDbClient {
    /// `POST /sql/dml/query`
    pub async fn run_query(&self, statements: &[Statement]) -> Result<Vec<QueryResult>> {
        let response = self
            .send_json(Method::POST, "/sql/dml/query", &envelope(statements))
            .await?;
        self.handle_response(response).await
    }

    /// `POST /sql/dml/update`
    pub async fn run_update(&self, statements: &[Statement]) -> Result<Vec<UpdateResult>> {
        let response = self
            .send_json(Method::POST, "/sql/dml/update", &envelope(statements))
            .await?;
        self.handle_response(response).await
    }

    /// `POST /sql/ddl`
    pub async fn run_ddl(&self, statements: &[Statement]) -> Result<Vec<UpdateResult>> {
        let response = self
            .send_json(Method::POST, "/sql/ddl", &envelope(statements))
            .await?;
        self.handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use volmatch_core::schema::REGISTRATIONS;
    use volmatch_core::sql::{col, Delete, Select, Statement, TableRef};
    use volmatch_core::storage::StoreError;

    use crate::client::tests::stub;

    #[tokio::test]
    async fn test_query_renders_statements() {
        let app = Router::new().route(
            "/griddb/v2/cluster/dbs/db/sql/dml/query",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(
                    body,
                    json!([{"stmt": "SELECT COUNT(id) FROM VoMaRegistrations WHERE opportunityId == 'opp_1'"}])
                );
                Json(json!([{"columns": [{"name": "", "type": "LONG"}], "results": [[2]]}]))
            }),
        );
        let client = stub(app).await;
        let count: Statement = Select::count(TableRef::new(REGISTRATIONS.name), col("id"))
            .filter(col("opportunityId").eq("opp_1"))
            .into();

        let results = client.run_query(&[count]).await.unwrap();

        assert_eq!(results[0].results, vec![vec![json!(2)]]);
    }

    #[tokio::test]
    async fn test_server_error_is_a_fault() {
        let app = Router::new().route(
            "/griddb/v2/cluster/dbs/db/sql/dml/query",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let client = stub(app).await;
        let select: Statement = Select::all_from(TableRef::new(REGISTRATIONS.name)).into();

        assert_eq!(
            client.run_query(&[select]).await,
            Err(StoreError::Fault {
                status: Some(500),
                body: "boom".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_update_returns_per_statement_status() {
        let app = Router::new().route(
            "/griddb/v2/cluster/dbs/db/sql/dml/update",
            post(|| async {
                Json(json!([
                    {"status": 1, "updatedRows": 2, "stmt": "DELETE ...", "message": null},
                    {"status": 0, "updatedRows": 0, "stmt": "INSERT ...", "message": "duplicate"}
                ]))
            }),
        );
        let client = stub(app).await;
        let delete: Statement = Delete {
            table: REGISTRATIONS.name,
            condition: col("id").eq("reg_1"),
        }
        .into();

        let results = client.run_update(&[delete]).await.unwrap();

        assert!(results[0].is_success());
        assert_eq!(results[0].updated_rows, 2);
        assert!(!results[1].is_success());
    }
}
