//! Paginated, filtered product and category fetches.
//!
//! `fetch_page` issues exactly one request per call and never retries.
//! When the active sort key is not delegated to the server, the fetched
//! page is reordered locally before being returned — one page only,
//! never a re-pagination.

use reqwest::Method;

use bcod_core::product::{CategoryRecord, PageResult};
use bcod_core::sort::apply_local_sort;
use bcod_core::QuerySpec;

use crate::debounce::Generation;
use crate::error::StoreError;
use crate::http::StoreClient;
use crate::normalize;
use crate::types::{CategoriesEnvelope, StatusEnvelope};

impl StoreClient {
    /// Fetches one page of products for the given query.
    ///
    /// Both historic response envelopes (flat and nested `data`) are
    /// accepted; see [`normalize::page_result`]. Server-unsupported sort
    /// keys are applied locally to the fetched page.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Api`] when the envelope carries a failure code.
    /// - [`StoreError::Unreachable`] on transport failure.
    /// - [`StoreError::Deserialize`] when neither envelope shape matches.
    pub async fn fetch_page(&self, spec: &QuerySpec) -> Result<PageResult, StoreError> {
        let url = self.endpoint("products", &spec.encode())?;
        let body = self.request_json(Method::GET, url, None).await?;
        check_envelope(&body)?;

        let mut page = normalize::page_result(&body, self.per_page)?;
        if !spec.sort.server_delegated() {
            apply_local_sort(&mut page.items, spec.sort);
        }
        tracing::debug!(
            page = page.current_page,
            of = page.last_page,
            items = page.items.len(),
            "fetched product page"
        );
        Ok(page)
    }

    /// Like [`StoreClient::fetch_page`], but refuses to hand back a page
    /// for a view that has since navigated away.
    ///
    /// `tag` is the generation observed when the fetch was started; if
    /// the generation has been bumped while the request was in flight the
    /// stale result is discarded as [`StoreError::Superseded`].
    ///
    /// # Errors
    ///
    /// Everything [`StoreClient::fetch_page`] returns, plus
    /// [`StoreError::Superseded`].
    pub async fn fetch_page_guarded(
        &self,
        spec: &QuerySpec,
        generation: &Generation,
        tag: u64,
    ) -> Result<PageResult, StoreError> {
        let page = self.fetch_page(spec).await?;
        if generation.is_current(tag) {
            Ok(page)
        } else {
            tracing::debug!(tag, "discarding page fetched for a stale view");
            Err(StoreError::Superseded)
        }
    }

    /// Returns the category list, fetching it at most once per client
    /// lifetime (categories are immutable for a session).
    ///
    /// # Errors
    ///
    /// First call only: [`StoreError::Api`] on an envelope failure,
    /// [`StoreError::Unreachable`] on transport failure. A failed first
    /// fetch is not cached; the next call retries.
    pub async fn categories(&self) -> Result<&[CategoryRecord], StoreError> {
        let categories = self
            .categories
            .get_or_try_init(|| async {
                let url = self.endpoint("categories", &[])?;
                let body = self.request_json(Method::GET, url, None).await?;
                check_envelope(&body)?;

                let envelope: CategoriesEnvelope =
                    serde_json::from_value(body).map_err(|e| StoreError::Deserialize {
                        context: "categories".to_string(),
                        source: e,
                    })?;
                Ok::<Vec<CategoryRecord>, StoreError>(
                    envelope.data.into_iter().map(normalize::category).collect(),
                )
            })
            .await?;
        Ok(categories)
    }
}

/// Rejects a 2xx response whose body carries an application-level
/// failure code, surfacing the server-supplied message.
pub(crate) fn check_envelope(body: &serde_json::Value) -> Result<(), StoreError> {
    let envelope: StatusEnvelope =
        serde_json::from_value(body.clone()).map_err(|e| StoreError::Deserialize {
            context: "response envelope".to_string(),
            source: e,
        })?;
    if envelope.is_success() {
        Ok(())
    } else {
        Err(StoreError::Api(envelope.message.unwrap_or_else(|| {
            "marketplace reported a failure".to_string()
        })))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn check_envelope_accepts_both_success_conventions() {
        assert!(check_envelope(&json!({"code": "000", "data": []})).is_ok());
        assert!(check_envelope(&json!({"status": "success", "data": []})).is_ok());
    }

    #[test]
    fn check_envelope_surfaces_server_message() {
        let err = check_envelope(&json!({"status": "error", "message": "maintenance"}));
        match err {
            Err(StoreError::Api(message)) => assert_eq!(message, "maintenance"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
