//! Raw wire types for the marketplace API.
//!
//! The upstream API changed envelope shape and field naming between
//! versions, so everything here is deliberately lenient: aliases for the
//! renamed fields, and decimal/date fields that accept both the string
//! and the numeric encodings observed on the wire. Raw shapes never
//! escape this crate; [`crate::normalize`] converts them into the
//! `bcod-core` types at the boundary.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

/// Success/failure envelope common to mutation acknowledgements.
///
/// Older endpoints report `"code": "000"` on success, newer ones
/// `"status": "success"`; some responses carry both.
#[derive(Debug, Deserialize)]
pub struct StatusEnvelope {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusEnvelope {
    /// Application-level success under either envelope convention.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code.as_deref() == Some("000") || self.status.as_deref() == Some("success")
    }
}

/// A product as it appears inside a listing page, under either API
/// version's field names.
#[derive(Debug, Deserialize)]
pub struct RawProduct {
    #[serde(alias = "id")]
    pub product_id: i64,
    #[serde(alias = "product_name")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "de_decimal")]
    pub price: Decimal,
    #[serde(default, alias = "stock_quantity")]
    pub stock: u32,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default, alias = "image", alias = "main_image")]
    pub image_url: Option<String>,
    #[serde(default = "default_true", alias = "active")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub total_sales: u32,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct RawCategory {
    #[serde(alias = "id")]
    pub category_id: i64,
    #[serde(alias = "category_name")]
    pub name: String,
}

/// `GET /categories` envelope: `{status, data: [...]}`.
#[derive(Debug, Deserialize)]
pub struct CategoriesEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Vec<RawCategory>,
}

#[derive(Debug, Deserialize)]
pub struct RawCartItem {
    #[serde(alias = "id")]
    pub cart_item_id: i64,
    pub product_id: i64,
    #[serde(alias = "name")]
    pub product_name: String,
    #[serde(deserialize_with = "de_decimal")]
    pub price: Decimal,
    #[serde(default, alias = "image")]
    pub image_url: Option<String>,
    pub quantity: u32,
}

/// `GET /cart` payload: `{items, total_items, subtotal}`.
#[derive(Debug, Deserialize)]
pub struct RawCartPayload {
    #[serde(default)]
    pub items: Vec<RawCartItem>,
    #[serde(default)]
    pub total_items: u32,
    #[serde(default, deserialize_with = "de_decimal_default")]
    pub subtotal: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct CartEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<RawCartPayload>,
}

/// `POST /login` response; the token sits at the top level.
#[derive(Debug, Deserialize)]
pub struct LoginEnvelope {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

/// `POST /checkout` confirmation payload, Indonesian field names as sent
/// by the upstream API.
#[derive(Debug, Deserialize)]
pub struct RawOrderConfirmation {
    pub order_id: i64,
    #[serde(deserialize_with = "de_decimal")]
    pub total_amount: Decimal,
    #[serde(default)]
    pub whatsapp_link: Option<String>,
    #[serde(default)]
    pub lokasi: Option<String>,
    #[serde(default)]
    pub tanggal_pesan: Option<String>,
    #[serde(default)]
    pub jam_pesan: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutEnvelope {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<RawOrderConfirmation>,
}

fn default_true() -> bool {
    true
}

/// Accepts `"12.99"` and `12.99` alike; both appear on the wire.
fn de_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    decimal_from_value(&value).ok_or_else(|| {
        serde::de::Error::custom(format!("cannot parse decimal from {value}"))
    })
}

/// Like [`de_decimal`] but tolerates an absent/null field as zero, for
/// server-computed aggregates on empty carts.
fn de_decimal_default<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(Decimal::ZERO);
    }
    decimal_from_value(&value).ok_or_else(|| {
        serde::de::Error::custom(format!("cannot parse decimal from {value}"))
    })
}

fn decimal_from_value(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::String(s) => s.trim().parse().ok(),
        serde_json::Value::Number(n) => n.to_string().parse().ok(),
        _ => None,
    }
}

fn de_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) => s.trim().parse().ok(),
        serde_json::Value::Number(n) => n.as_f64(),
        _ => None,
    }))
}

/// Accepts RFC 3339 (`2025-03-01T12:00:00Z`) and the API's older
/// space-separated form (`2025-03-01 12:00:00`); anything else is `None`
/// rather than a hard failure.
fn de_opt_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_datetime))
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.and_utc())
        })
}
