//! HTTP plumbing for the marketplace API.
//!
//! Wraps `reqwest` with base-URL handling, bearer-token injection at
//! request-build time, and the mapping from HTTP statuses to the
//! [`StoreError`] taxonomy. One request per call; no implicit retry.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, StatusCode, Url};
use tokio::sync::OnceCell;

use bcod_core::product::CategoryRecord;
use bcod_core::AppConfig;

use crate::error::StoreError;
use crate::session::TokenStore;

/// Client for the B-COD marketplace REST API.
///
/// Holds the HTTP client, base URL, and the token store consulted for
/// every outgoing request. Use [`StoreClient::new`] with the app config
/// for production, or [`StoreClient::with_base_url`] to point at a mock
/// server in tests.
pub struct StoreClient {
    client: Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
    pub(crate) per_page: u32,
    pub(crate) categories: OnceCell<Vec<CategoryRecord>>,
}

impl StoreClient {
    /// Creates a client from the application config.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`StoreError::InvalidBaseUrl`] if the
    /// configured base URL does not parse.
    pub fn new(config: &AppConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, StoreError> {
        Self::build(
            &config.api_base_url,
            config.http_timeout_secs,
            &config.user_agent,
            config.per_page,
            tokens,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same failure modes as [`StoreClient::new`].
    pub fn with_base_url(base_url: &str, tokens: Arc<dyn TokenStore>) -> Result<Self, StoreError> {
        Self::build(base_url, 30, "bcod/0.1 (campus-marketplace)", 12, tokens)
    }

    fn build(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        per_page: u32,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: exactly one trailing slash so Url::join appends path
        // segments instead of replacing the last one.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| StoreError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            tokens,
            per_page,
            categories: OnceCell::new(),
        })
    }

    /// Whether a persisted credential is currently present.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.tokens.get().is_some()
    }

    pub(crate) fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Joins `path` (no leading slash) onto the base URL, optionally
    /// appending percent-encoded query pairs.
    pub(crate) fn endpoint(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Url, StoreError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| StoreError::InvalidBaseUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Sends one request and parses the body as JSON.
    ///
    /// The bearer token is read from the store at build time, so a login
    /// or logout earlier in the session affects the very next request.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Unreachable`] on transport failure (no response).
    /// - The taxonomy mapping of any non-2xx status (see [`map_status`]).
    /// - [`StoreError::Deserialize`] if the body is not valid JSON.
    pub(crate) async fn request_json(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, StoreError> {
        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(token) = self.tokens.get() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%method, %url, "marketplace request");
        let response = request.send().await.map_err(StoreError::Unreachable)?;

        let status = response.status();
        let text = response.text().await.map_err(StoreError::Unreachable)?;
        if !status.is_success() {
            tracing::debug!(%status, %url, "marketplace request failed");
            return Err(map_status(status, &text));
        }

        serde_json::from_str(&text).map_err(|e| StoreError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

/// Maps a non-2xx HTTP status to the error taxonomy, pulling the
/// server-supplied `message` out of the body when one is there.
fn map_status(status: StatusCode, body: &str) -> StoreError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        });

    match status {
        StatusCode::UNAUTHORIZED => StoreError::Unauthenticated,
        StatusCode::FORBIDDEN => {
            StoreError::Forbidden(message.unwrap_or_else(|| "action not allowed".to_string()))
        }
        StatusCode::NOT_FOUND => StoreError::NotFound,
        StatusCode::UNPROCESSABLE_ENTITY => {
            StoreError::Validation(message.unwrap_or_else(|| "invalid request".to_string()))
        }
        other => StoreError::Server {
            status: other.as_u16(),
        },
    }
}

#[cfg(test)]
mod tests {
    use crate::session::MemoryTokenStore;

    use super::*;

    fn test_client(base_url: &str) -> StoreClient {
        StoreClient::with_base_url(base_url, Arc::new(MemoryTokenStore::new()))
            .expect("client construction should not fail")
    }

    #[test]
    fn endpoint_joins_path_onto_base() {
        let client = test_client("http://localhost:9999/api");
        let url = client.endpoint("products", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9999/api/products");
    }

    #[test]
    fn endpoint_tolerates_trailing_slash_on_base() {
        let client = test_client("http://localhost:9999/api/");
        let url = client.endpoint("cart", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9999/api/cart");
    }

    #[test]
    fn endpoint_percent_encodes_query_values() {
        let client = test_client("http://localhost:9999/api");
        let url = client
            .endpoint("products", &[("search", "ikan & pelet".to_string())])
            .unwrap();
        assert!(
            url.as_str().contains("ikan+%26+pelet") || url.as_str().contains("ikan%20%26%20pelet"),
            "query param should be percent-encoded: {url}"
        );
    }

    #[test]
    fn status_mapping_matches_taxonomy() {
        assert!(matches!(
            map_status(StatusCode::UNAUTHORIZED, ""),
            StoreError::Unauthenticated
        ));
        assert!(matches!(
            map_status(StatusCode::NOT_FOUND, ""),
            StoreError::NotFound
        ));
        assert!(matches!(
            map_status(StatusCode::INTERNAL_SERVER_ERROR, ""),
            StoreError::Server { status: 500 }
        ));
        match map_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"message": "quantity exceeds stock"}"#,
        ) {
            StoreError::Validation(message) => assert_eq!(message, "quantity exceeds stock"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
