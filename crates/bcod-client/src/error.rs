use thiserror::Error;

/// Errors surfaced by the marketplace client.
///
/// Every failure is terminal for the attempt: nothing in this client
/// auto-retries, a new user action is required.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No response at all: network failure, DNS, timeout.
    #[error("marketplace unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// Missing credential, or the server rejected the one presented (401).
    #[error("not authenticated")]
    Unauthenticated,

    /// The server refused the action for this actor (403), e.g. a seller
    /// carting their own listing.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Payload rejected (422), carries the server's message.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Referenced entity absent on the server (404).
    #[error("not found")]
    NotFound,

    /// Opaque server-side failure (5xx or other unexpected status).
    #[error("server error (HTTP {status})")]
    Server { status: u16 },

    /// A 2xx response whose envelope carried an application failure code.
    #[error("API error: {0}")]
    Api(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Client-side rejection of a non-positive product id.
    #[error("invalid product id {0}")]
    InvalidProduct(i64),

    /// The line item is absent from the last confirmed cart snapshot;
    /// the caller should refresh and retry.
    #[error("cart item {0} not found in last snapshot")]
    ItemNotFound(i64),

    /// A mutation for this line item is already in flight; the attempt
    /// was dropped, not queued.
    #[error("mutation already in flight for cart item {0}")]
    MutationInFlight(i64),

    /// The view that requested this fetch has navigated away; the result
    /// must not be committed.
    #[error("fetch superseded by a newer view generation")]
    Superseded,

    /// Failure constructing the underlying HTTP client.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
