use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A storefront product, normalized from the marketplace API for listing
/// and comparison regardless of which envelope shape it arrived in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Unit price in the store currency. Parsed from the API's decimal
    /// string to avoid float drift.
    pub price: Decimal,
    /// Units currently available; `0` means listed but out of stock.
    pub stock: u32,
    pub category_id: Option<i64>,
    /// Primary product image, absent for listings created without one.
    pub image_url: Option<String>,
    pub is_active: bool,
    /// Average review rating on a 0–5 scale, absent when unreviewed.
    pub average_rating: Option<f64>,
    pub total_sales: u32,
    pub created_at: Option<DateTime<Utc>>,
}

impl ProductRecord {
    /// Returns `true` if at least one unit can be carted right now.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.is_active && self.stock > 0
    }

    /// Rating used for ordering: unreviewed products sort as zero.
    #[must_use]
    pub fn rating_or_zero(&self) -> f64 {
        self.average_rating.unwrap_or(0.0)
    }
}

/// A product category. Fetched once per session and cached; immutable
/// from the client's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub category_id: i64,
    pub name: String,
}

/// One fetched page of products plus the pagination metadata the server
/// reported for the full (filtered) result set.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    pub items: Vec<ProductRecord>,
    pub current_page: u32,
    pub last_page: u32,
    pub total: u64,
    pub per_page: u32,
}

impl PageResult {
    /// An empty result for a query that matched nothing. Displayed as
    /// "no results", never as an error.
    #[must_use]
    pub fn empty(per_page: u32) -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            last_page: 1,
            total: 0,
            per_page,
        }
    }

    #[must_use]
    pub fn is_last_page(&self) -> bool {
        self.current_page >= self.last_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_product(stock: u32, is_active: bool) -> ProductRecord {
        ProductRecord {
            product_id: 1,
            name: "Betta Halfmoon".to_string(),
            description: None,
            price: Decimal::new(4_500_000, 2),
            stock,
            category_id: Some(3),
            image_url: None,
            is_active,
            average_rating: None,
            total_sales: 0,
            created_at: None,
        }
    }

    #[test]
    fn in_stock_requires_active_and_positive_stock() {
        assert!(make_product(2, true).in_stock());
        assert!(!make_product(0, true).in_stock());
        assert!(!make_product(2, false).in_stock());
    }

    #[test]
    fn unreviewed_product_rates_as_zero() {
        assert!(make_product(1, true).rating_or_zero().abs() < f64::EPSILON);
    }

    #[test]
    fn empty_page_is_its_own_last_page() {
        let page = PageResult::empty(12);
        assert!(page.is_last_page());
        assert_eq!(page.last_page, 1);
        assert_eq!(page.total, 0);
    }
}
