//! HTTP client for the GridDB Cloud Web API.

pub mod containers;
pub mod health;
pub mod rows;
pub mod sql;

mod gateway;

use std::time::Instant;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use volmatch_core::storage::{Result, StoreError};

use crate::config::StoreConfig;
use crate::error::{invalid_response, transport_error};

/// HTTP client for one store database.
#[derive(Debug, Clone)]
pub struct GridDbClient {
    client: reqwest::Client,
    config: StoreConfig,
}

impl GridDbClient {
    /// Builds a client with the config's credentials and timeouts.
    pub fn new(config: StoreConfig) -> Result<Self> {
        let mut authorization = HeaderValue::from_str(&config.credentials.header_value())
            .map_err(|e| StoreError::transport(format!("invalid credentials header: {e}")))?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(transport_error)?;

        Ok(Self { client, config })
    }

    /// Get the store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Sends one request and classifies the outcome.
    ///
    /// Returns the response only for 2xx statuses. Everything else becomes a
    /// [`StoreError`]: 403 is `Forbidden`, any other status is `Fault`.
    async fn send(&self, method: Method, path: &str, body: Option<String>) -> Result<reqwest::Response> {
        let target = self.config.endpoint(path);
        let mut request = self.client.request(method.clone(), &target);
        if let Some(body) = &body {
            request = request.body(body.clone());
        }

        let started = Instant::now();
        let outcome = request.send().await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let response = match outcome {
            Ok(response) => response,
            Err(error) => {
                tracing::error!(
                    method = %method,
                    target = %target,
                    elapsed_ms,
                    error = %error,
                    "Store request failed"
                );
                return Err(transport_error(error));
            }
        };

        let status = response.status().as_u16();
        tracing::info!(
            method = %method,
            target = %target,
            status,
            elapsed_ms,
            body = body.as_deref().unwrap_or("<no-body>"),
            "Store request"
        );

        if response.status().is_success() {
            return Ok(response);
        }

        let text = match response.text().await {
            Ok(text) if text.is_empty() => "<empty>".to_string(),
            Ok(text) => text,
            Err(error) => format!("<error-reading-body: {error}>"),
        };
        tracing::error!(status, body = %text, "Store API error");
        if status == 403 {
            tracing::error!("Access forbidden; check the store credentials and permissions");
        }
        Err(StoreError::from_status(status, text))
    }

    /// Sends a JSON body.
    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response> {
        let body = serde_json::to_string(body)
            .map_err(|e| StoreError::transport(format!("failed to serialize request body: {e}")))?;
        self.send(method, path, Some(body)).await
    }

    /// Parses a successful response body.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status().as_u16();
        let text = response.text().await.map_err(transport_error)?;
        serde_json::from_str(&text).map_err(|e| invalid_response(status, e, &text))
    }
}
