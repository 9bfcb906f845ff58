//! Cash-on-delivery checkout: pick a campus handover spot and a time,
//! get back the order id and the seller's WhatsApp link.

use chrono::{NaiveDate, NaiveTime};
use reqwest::Method;
use rust_decimal::Decimal;
use serde_json::json;

use crate::catalog::check_envelope;
use crate::error::StoreError;
use crate::http::StoreClient;
use crate::types::CheckoutEnvelope;

/// Campus handover spots the marketplace offers. Wire values keep the
/// upstream API's exact (Indonesian, inconsistently cased) strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupLocation {
    KantinPayung,
    Lkc,
    DepanAdmisi,
}

impl PickupLocation {
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            PickupLocation::KantinPayung => "kantin payung",
            PickupLocation::Lkc => "LKC",
            PickupLocation::DepanAdmisi => "Depan Admisi",
        }
    }

    /// Parses a wire/CLI value, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "kantin payung" | "kantin-payung" => Some(PickupLocation::KantinPayung),
            "lkc" => Some(PickupLocation::Lkc),
            "depan admisi" | "depan-admisi" => Some(PickupLocation::DepanAdmisi),
            _ => None,
        }
    }
}

/// Location and time the buyer commits to for the cash handover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub location: PickupLocation,
    pub order_date: NaiveDate,
    pub order_time: NaiveTime,
}

/// Server confirmation for a placed order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfirmation {
    pub order_id: i64,
    pub total_amount: Decimal,
    /// Deep link for contacting the seller; the buyer screenshots the
    /// confirmation and sends it there.
    pub whatsapp_link: Option<String>,
    pub location: Option<String>,
    pub order_date: Option<String>,
    pub order_time: Option<String>,
}

impl StoreClient {
    /// Places the order for the whole current cart.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Unauthenticated`] without a credential.
    /// - [`StoreError::Validation`] when the server rejects the slot.
    /// - [`StoreError::Api`] on an envelope failure code.
    pub async fn checkout(&self, request: &CheckoutRequest) -> Result<OrderConfirmation, StoreError> {
        if !self.has_token() {
            return Err(StoreError::Unauthenticated);
        }

        let url = self.endpoint("checkout", &[])?;
        let body = json!({
            "lokasi": request.location.wire_name(),
            "tanggal_pesan": request.order_date.format("%Y-%m-%d").to_string(),
            "jam_pesan": request.order_time.format("%H:%M").to_string(),
        });
        let response = self.request_json(Method::POST, url, Some(&body)).await?;
        check_envelope(&response)?;

        let envelope: CheckoutEnvelope =
            serde_json::from_value(response).map_err(|e| StoreError::Deserialize {
                context: "checkout".to_string(),
                source: e,
            })?;
        let raw = envelope.data.ok_or_else(|| StoreError::Api(
            envelope
                .message
                .unwrap_or_else(|| "checkout confirmed without order data".to_string()),
        ))?;

        tracing::info!(order_id = raw.order_id, "order placed");
        Ok(OrderConfirmation {
            order_id: raw.order_id,
            total_amount: raw.total_amount,
            whatsapp_link: raw.whatsapp_link,
            location: raw.lokasi,
            order_date: raw.tanggal_pesan,
            order_time: raw.jam_pesan,
        })
    }
}
