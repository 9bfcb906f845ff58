//! Normalization of raw API responses into the `bcod-core` types.
//!
//! The `/products` endpoint has shipped two envelope shapes for the same
//! logical data: a flat `{data: [...], current_page, ...}` and a nested
//! `{data: {data: [...], current_page, ...}}`. Both are accepted here and
//! nowhere else; past this boundary only [`PageResult`] exists.

use bcod_core::cart::{CartLineItem, CartSnapshot};
use bcod_core::product::{CategoryRecord, PageResult, ProductRecord};

use crate::error::StoreError;
use crate::types::{RawCartItem, RawCartPayload, RawCategory, RawProduct};

/// Adapts either observed `/products` envelope into one [`PageResult`].
///
/// Pagination metadata lives next to whichever `data` array is the item
/// list. An empty result set normalizes to `last_page = 1`, and
/// `current_page` is clamped so `current_page ≤ last_page` always holds.
///
/// # Errors
///
/// [`StoreError::Deserialize`] when no item array can be located or an
/// item does not match the expected product shape.
pub fn page_result(body: &serde_json::Value, fallback_per_page: u32) -> Result<PageResult, StoreError> {
    // The paging container is whichever object directly holds the item array.
    let container = match body.get("data") {
        Some(serde_json::Value::Array(_)) => body,
        Some(nested @ serde_json::Value::Object(_)) => nested,
        _ => {
            return Err(deserialize_error(
                "products envelope",
                "missing \"data\" member",
            ))
        }
    };

    let raw_items = container
        .get("data")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| deserialize_error("products envelope", "\"data\" is not an array"))?;

    let mut items = Vec::with_capacity(raw_items.len());
    for (index, value) in raw_items.iter().enumerate() {
        let raw: RawProduct = serde_json::from_value(value.clone()).map_err(|e| {
            StoreError::Deserialize {
                context: format!("products[{index}]"),
                source: e,
            }
        })?;
        items.push(product(raw));
    }

    let total = u64_field(container, "total").unwrap_or(items.len() as u64);
    let per_page = u32_field(container, "per_page").unwrap_or(fallback_per_page);
    let last_page = u32_field(container, "last_page").unwrap_or(1).max(1);
    let current_page = u32_field(container, "current_page")
        .unwrap_or(1)
        .clamp(1, last_page);

    Ok(PageResult {
        items,
        current_page,
        last_page,
        total,
        per_page,
    })
}

pub fn product(raw: RawProduct) -> ProductRecord {
    ProductRecord {
        product_id: raw.product_id,
        name: raw.name,
        description: raw.description,
        price: raw.price,
        stock: raw.stock,
        category_id: raw.category_id,
        image_url: raw.image_url,
        is_active: raw.is_active,
        average_rating: raw.average_rating,
        total_sales: raw.total_sales,
        created_at: raw.created_at,
    }
}

pub fn category(raw: RawCategory) -> CategoryRecord {
    CategoryRecord {
        category_id: raw.category_id,
        name: raw.name,
    }
}

pub fn cart_snapshot(raw: RawCartPayload) -> CartSnapshot {
    CartSnapshot {
        items: raw.items.into_iter().map(cart_line_item).collect(),
        total_items: raw.total_items,
        subtotal: raw.subtotal,
    }
}

fn cart_line_item(raw: RawCartItem) -> CartLineItem {
    CartLineItem {
        cart_item_id: raw.cart_item_id,
        product_id: raw.product_id,
        product_name: raw.product_name,
        price: raw.price,
        image_url: raw.image_url,
        quantity: raw.quantity.max(1),
    }
}

fn deserialize_error(context: &str, reason: &str) -> StoreError {
    StoreError::Deserialize {
        context: context.to_string(),
        source: serde::de::Error::custom(reason),
    }
}

fn u64_field(container: &serde_json::Value, key: &str) -> Option<u64> {
    let value = container.get(key)?;
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

#[allow(clippy::cast_possible_truncation)]
fn u32_field(container: &serde_json::Value, key: &str) -> Option<u32> {
    u64_field(container, key).map(|v| v.min(u64::from(u32::MAX)) as u32)
}
