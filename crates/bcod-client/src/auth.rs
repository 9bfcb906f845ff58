//! Login and logout against the marketplace, keeping the persisted
//! bearer token in sync with the session.

use reqwest::Method;
use serde_json::json;

use crate::error::StoreError;
use crate::http::StoreClient;
use crate::types::LoginEnvelope;

impl StoreClient {
    /// Authenticates and stores the returned bearer token, so every
    /// subsequent request from this client carries it.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Unauthenticated`] when the server rejects the
    ///   credentials (401).
    /// - [`StoreError::Api`] when a 2xx envelope carries a failure code
    ///   or no token.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), StoreError> {
        let url = self.endpoint("login", &[])?;
        let body = json!({ "username": username, "password": password });
        let response = self.request_json(Method::POST, url, Some(&body)).await?;

        let envelope: LoginEnvelope =
            serde_json::from_value(response).map_err(|e| StoreError::Deserialize {
                context: "login".to_string(),
                source: e,
            })?;
        if envelope.code.as_deref() != Some("000") {
            return Err(StoreError::Api(
                envelope.message.unwrap_or_else(|| "login failed".to_string()),
            ));
        }
        let token = envelope
            .token
            .ok_or_else(|| StoreError::Api("login succeeded without a token".to_string()))?;

        self.tokens().set(&token);
        tracing::info!(username, "logged in");
        Ok(())
    }

    /// Ends the session. The server-side logout is best-effort; the
    /// local token is cleared no matter what the call returned, so the
    /// client is signed out either way.
    pub async fn logout(&self) {
        if self.has_token() {
            if let Ok(url) = self.endpoint("logout", &[]) {
                if let Err(error) = self.request_json(Method::POST, url, None).await {
                    tracing::debug!(%error, "server-side logout failed, clearing token anyway");
                }
            }
        }
        self.tokens().clear();
        tracing::info!("logged out");
    }
}
