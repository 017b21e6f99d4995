//! Row-level write and read.

use reqwest::Method;
use volmatch_core::storage::Result;
use volmatch_core::wire::{AcquireRowsRequest, AcquireRowsResponse, Row, RowQuery};

use super::GridDbClient;

fn rows_path(container: &str) -> String {
    format!("/containers/{container}/rows")
}

impl GridDbClient {
    /// `PUT /containers/{name}/rows`: upserts rows by id.
    pub async fn register_rows(&self, container: &str, rows: &[Row]) -> Result<()> {
        self.send_json(Method::PUT, &rows_path(container), rows)
            .await
            .map(|_| ())
    }

    /// `POST /containers/{name}/rows`: reads rows matching `query`.
    pub async fn acquire_rows(&self, container: &str, query: &RowQuery) -> Result<AcquireRowsResponse> {
        let request = AcquireRowsRequest::from(query);
        let response = self
            .send_json(Method::POST, &rows_path(container), &request)
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
    use volmatch_core::sql::col;
    use volmatch_core::storage::StoreError;
    use volmatch_core::wire::{RowQuery, Sort};

    use crate::client::tests::stub;

    const ROWS: &str = "/griddb/v2/cluster/dbs/db/containers/VoMaSkills/rows";

    #[tokio::test]
    async fn test_acquire_rows_sends_condition_and_parses_rows() {
        let app = Router::new().route(
            ROWS,
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["condition"], "name == 'O''Brien'");
                assert_eq!(body["sort"], "id ASC");
                assert_eq!(body["limit"], 1);
                Json(json!({
                    "columns": [{"name": "id", "type": "STRING"}, {"name": "name", "type": "STRING"}],
                    "rows": [["sk_1", "O'Brien"]],
                    "offset": 0,
                    "limit": 1,
                    "total": 1
                }))
            }),
        );
        let client = stub(app).await;
        let query = RowQuery::limit(1)
            .with_condition(col("name").eq("O'Brien"))
            .with_sort(Sort::ascending("id"));

        let response = client.acquire_rows("VoMaSkills", &query).await.unwrap();

        assert_eq!(response.total, 1);
        assert_eq!(response.rows, vec![vec![json!("sk_1"), json!("O'Brien")]]);
    }

    #[tokio::test]
    async fn test_register_rows_puts_json_arrays() {
        let app = Router::new().route(
            ROWS,
            axum::routing::put(|Json(body): Json<Value>| async move {
                assert_eq!(body, json!([["sk_1", "a \"quoted\" \\ name"]]));
                (StatusCode::OK, Json(json!({"count": 1})))
            }),
        );
        let client = stub(app).await;

        let rows = vec![vec![json!("sk_1"), json!("a \"quoted\" \\ name")]];
        assert_eq!(client.register_rows("VoMaSkills", &rows).await, Ok(()));
    }

    #[tokio::test]
    async fn test_forbidden_is_distinct_from_fault() {
        let app = Router::new().route(ROWS, post(|| async { (StatusCode::FORBIDDEN, "denied") }));
        let client = stub(app).await;

        let result = client.acquire_rows("VoMaSkills", &RowQuery::limit(1)).await;

        assert_eq!(
            result,
            Err(StoreError::Forbidden {
                body: "denied".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_a_fault() {
        let app = Router::new().route(ROWS, post(|| async { "not json" }));
        let client = stub(app).await;

        let result = client.acquire_rows("VoMaSkills", &RowQuery::limit(1)).await;

        assert!(matches!(
            result,
            Err(StoreError::Fault {
                status: Some(200),
                ..
            })
        ));
    }
}
