//! The cart reconciler: optimistic-intent quantity updates against the
//! remote cart, with server-confirmed refresh.
//!
//! Quantity updates are submitted as absolute values, not deltas: the
//! last snapshot's quantity is only a hint for computing the next value,
//! and the server is the single arbiter of the result. Every successful
//! mutation ends in exactly one full re-fetch so the displayed subtotal
//! and stock-validated quantities are always server truth; the snapshot
//! is replaced wholesale, never field-mutated.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use reqwest::Method;
use serde_json::json;

use bcod_core::cart::CartSnapshot;

use crate::catalog::check_envelope;
use crate::error::StoreError;
use crate::http::StoreClient;
use crate::normalize;
use crate::types::CartEnvelope;

pub struct CartReconciler {
    client: Arc<StoreClient>,
    snapshot: Mutex<Option<CartSnapshot>>,
    /// Line items with a mutation currently in flight. At most one
    /// outstanding mutation per line item; overlapping attempts are
    /// dropped, not queued.
    in_flight: Mutex<HashSet<i64>>,
}

impl CartReconciler {
    #[must_use]
    pub fn new(client: Arc<StoreClient>) -> Self {
        Self {
            client,
            snapshot: Mutex::new(None),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// The last server-confirmed snapshot, or an empty cart before the
    /// first refresh.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.snapshot
            .lock()
            .ok()
            .and_then(|s| s.clone())
            .unwrap_or_else(CartSnapshot::empty)
    }

    /// Re-fetches the full cart and replaces the stored snapshot.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unauthenticated`] without a credential; otherwise
    /// the usual transport/envelope failures.
    pub async fn refresh(&self) -> Result<CartSnapshot, StoreError> {
        if !self.client.has_token() {
            return Err(StoreError::Unauthenticated);
        }
        let url = self.client.endpoint("cart", &[])?;
        let body = self.client.request_json(Method::GET, url, None).await?;
        check_envelope(&body)?;

        let envelope: CartEnvelope =
            serde_json::from_value(body).map_err(|e| StoreError::Deserialize {
                context: "cart".to_string(),
                source: e,
            })?;
        let snapshot = envelope
            .data
            .map_or_else(CartSnapshot::empty, normalize::cart_snapshot);

        if let Ok(mut slot) = self.snapshot.lock() {
            *slot = Some(snapshot.clone());
        }
        tracing::debug!(
            items = snapshot.items.len(),
            total_items = snapshot.total_items,
            "cart refreshed"
        );
        Ok(snapshot)
    }

    /// Adds `quantity` units of a product to the cart, then refreshes.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidProduct`] for a non-positive product id.
    /// - [`StoreError::Unauthenticated`] without a credential (the caller
    ///   should prompt login).
    /// - [`StoreError::Forbidden`] when the server reports the actor is
    ///   the product's own seller.
    /// - [`StoreError::Validation`] for stock/quantity violations.
    pub async fn add(&self, product_id: i64, quantity: u32) -> Result<CartSnapshot, StoreError> {
        if product_id <= 0 {
            return Err(StoreError::InvalidProduct(product_id));
        }
        if !self.client.has_token() {
            return Err(StoreError::Unauthenticated);
        }

        let url = self.client.endpoint(&format!("cart/add/{product_id}"), &[])?;
        let body = json!({ "quantity": quantity.max(1) });
        let response = self
            .client
            .request_json(Method::POST, url, Some(&body))
            .await?;
        check_envelope(&response)?;

        tracing::info!(product_id, quantity, "added product to cart");
        self.refresh().await
    }

    /// Submits `current quantity + 1` for the line item, then refreshes.
    ///
    /// # Errors
    ///
    /// - [`StoreError::ItemNotFound`] when the item is absent from the
    ///   last snapshot (stale client state; refresh and retry).
    /// - [`StoreError::MutationInFlight`] when a mutation for this item
    ///   has not resolved yet.
    pub async fn increment(&self, cart_item_id: i64) -> Result<CartSnapshot, StoreError> {
        let _guard = self.claim(cart_item_id)?;
        let quantity = self.known_quantity(cart_item_id)?.saturating_add(1);
        self.submit_quantity(cart_item_id, quantity).await
    }

    /// Submits `max(1, current quantity - 1)` for the line item, then
    /// refreshes. The quantity never drops below 1 through this
    /// operation; removal is [`CartReconciler::remove`].
    ///
    /// # Errors
    ///
    /// Same as [`CartReconciler::increment`].
    pub async fn decrement(&self, cart_item_id: i64) -> Result<CartSnapshot, StoreError> {
        let _guard = self.claim(cart_item_id)?;
        let quantity = self.known_quantity(cart_item_id)?.saturating_sub(1).max(1);
        self.submit_quantity(cart_item_id, quantity).await
    }

    /// Deletes the line item, then refreshes.
    ///
    /// # Errors
    ///
    /// [`StoreError::MutationInFlight`] on overlap, plus the usual
    /// transport/status failures.
    pub async fn remove(&self, cart_item_id: i64) -> Result<CartSnapshot, StoreError> {
        let _guard = self.claim(cart_item_id)?;
        if !self.client.has_token() {
            return Err(StoreError::Unauthenticated);
        }

        let url = self
            .client
            .endpoint(&format!("cart/items/{cart_item_id}"), &[])?;
        let response = self.client.request_json(Method::DELETE, url, None).await?;
        check_envelope(&response)?;

        tracing::info!(cart_item_id, "removed cart item");
        self.refresh().await
    }

    async fn submit_quantity(
        &self,
        cart_item_id: i64,
        quantity: u32,
    ) -> Result<CartSnapshot, StoreError> {
        if !self.client.has_token() {
            return Err(StoreError::Unauthenticated);
        }

        let url = self
            .client
            .endpoint(&format!("cart/items/{cart_item_id}"), &[])?;
        let body = json!({ "quantity": quantity });
        let response = self
            .client
            .request_json(Method::PUT, url, Some(&body))
            .await?;
        check_envelope(&response)?;

        tracing::info!(cart_item_id, quantity, "submitted absolute cart quantity");
        self.refresh().await
    }

    /// Reads the item's quantity from the last confirmed snapshot.
    fn known_quantity(&self, cart_item_id: i64) -> Result<u32, StoreError> {
        self.snapshot()
            .line_item(cart_item_id)
            .map(|item| item.quantity)
            .ok_or(StoreError::ItemNotFound(cart_item_id))
    }

    /// Marks the line item as having a mutation in flight; the returned
    /// guard releases the claim when the operation resolves either way.
    fn claim(&self, cart_item_id: i64) -> Result<LineClaim<'_>, StoreError> {
        let mut in_flight = self
            .in_flight
            .lock()
            .map_err(|_| StoreError::MutationInFlight(cart_item_id))?;
        if !in_flight.insert(cart_item_id) {
            return Err(StoreError::MutationInFlight(cart_item_id));
        }
        Ok(LineClaim {
            set: &self.in_flight,
            cart_item_id,
        })
    }
}

struct LineClaim<'a> {
    set: &'a Mutex<HashSet<i64>>,
    cart_item_id: i64,
}

impl Drop for LineClaim<'_> {
    fn drop(&mut self) {
        if let Ok(mut set) = self.set.lock() {
            set.remove(&self.cart_item_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::session::MemoryTokenStore;

    use super::*;

    fn reconciler(with_token: bool) -> CartReconciler {
        let tokens: Arc<dyn crate::session::TokenStore> = if with_token {
            Arc::new(MemoryTokenStore::with_token("t"))
        } else {
            Arc::new(MemoryTokenStore::new())
        };
        let client =
            StoreClient::with_base_url("http://localhost:9999/api", tokens).expect("client");
        CartReconciler::new(Arc::new(client))
    }

    #[tokio::test]
    async fn add_rejects_non_positive_product_id() {
        let cart = reconciler(true);
        assert!(matches!(
            cart.add(0, 1).await,
            Err(StoreError::InvalidProduct(0))
        ));
        assert!(matches!(
            cart.add(-3, 1).await,
            Err(StoreError::InvalidProduct(-3))
        ));
    }

    #[tokio::test]
    async fn add_without_credential_is_unauthenticated() {
        let cart = reconciler(false);
        assert!(matches!(
            cart.add(7, 1).await,
            Err(StoreError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn increment_of_unknown_item_is_item_not_found() {
        let cart = reconciler(true);
        assert!(matches!(
            cart.increment(3).await,
            Err(StoreError::ItemNotFound(3))
        ));
    }

    #[test]
    fn claim_blocks_overlap_and_releases_on_drop() {
        let cart = reconciler(true);
        let guard = cart.claim(3).expect("first claim should succeed");
        assert!(matches!(
            cart.claim(3),
            Err(StoreError::MutationInFlight(3))
        ));
        // A different line item is unaffected.
        drop(cart.claim(4).expect("other items claim independently"));
        drop(guard);
        assert!(cart.claim(3).is_ok());
    }

    #[test]
    fn snapshot_before_first_refresh_is_empty() {
        let cart = reconciler(true);
        assert!(cart.snapshot().is_empty());
    }
}
