//! Connectivity check.

use reqwest::Method;

use super::GridDbClient;

impl GridDbClient {
    /// `GET /checkConnection`. Any failure is logged and reported as `false`.
    pub async fn check_connection(&self) -> bool {
        match self.send(Method::GET, "/checkConnection", None).await {
            Ok(_) => {
                tracing::info!("Connection to the store successful");
                true
            }
            Err(error) => {
                tracing::error!(error = %error, "Failed to connect to the store");
                false
            }
        }
    }
}
