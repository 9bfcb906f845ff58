use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One quantity-bearing line in the cart, with the product details the
/// server snapshotted at add time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub cart_item_id: i64,
    pub product_id: i64,
    pub product_name: String,
    /// Unit price as confirmed by the server for this line.
    pub price: Decimal,
    pub image_url: Option<String>,
    /// Always ≥ 1; the only way to reach zero is removing the line.
    pub quantity: u32,
}

/// The full cart as last confirmed by the server.
///
/// Snapshots are replaced wholesale on every refresh, never field-mutated
/// in place. `subtotal` and `total_items` are server-computed and trusted
/// as-is; the client never recomputes them for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub items: Vec<CartLineItem>,
    pub total_items: u32,
    pub subtotal: Decimal,
}

impl CartSnapshot {
    /// A cart with nothing in it, used before the first server refresh.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_items: 0,
            subtotal: Decimal::ZERO,
        }
    }

    /// Finds a line item by its cart-scoped identifier.
    #[must_use]
    pub fn line_item(&self, cart_item_id: i64) -> Option<&CartLineItem> {
        self.items.iter().find(|i| i.cart_item_id == cart_item_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
