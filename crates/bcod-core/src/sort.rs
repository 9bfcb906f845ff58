//! Sort keys for the product list and the local fallback applied when the
//! catalog endpoint does not delegate a key server-side.
//!
//! The marketplace API only orders by name (or its own default relevance);
//! the remaining keys were discovered ad hoc on the client and must be
//! applied to the fetched page locally. Local sorting reorders one page
//! only — it never re-paginates, so cross-page global order is not
//! guaranteed for fallback keys.

use std::cmp::Ordering;

use crate::product::ProductRecord;

/// Ordering criterion for a product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Server-defined order (relevance). Encoded as an absent parameter.
    #[default]
    Default,
    NameAsc,
    NameDesc,
    PriceLow,
    PriceHigh,
    RatingHigh,
    BestSeller,
    Latest,
    Oldest,
}

impl SortKey {
    /// Wire value for the `sort` query parameter. `Default` has no wire
    /// form and is omitted on encode.
    #[must_use]
    pub fn wire_name(self) -> Option<&'static str> {
        match self {
            SortKey::Default => None,
            SortKey::NameAsc => Some("name_asc"),
            SortKey::NameDesc => Some("name_desc"),
            SortKey::PriceLow => Some("price_low"),
            SortKey::PriceHigh => Some("price_high"),
            SortKey::RatingHigh => Some("rating_high"),
            SortKey::BestSeller => Some("best_seller"),
            SortKey::Latest => Some("latest"),
            SortKey::Oldest => Some("oldest"),
        }
    }

    /// Parses a wire value; unknown values fall back to `Default` rather
    /// than failing the whole query decode.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "name_asc" => SortKey::NameAsc,
            "name_desc" => SortKey::NameDesc,
            "price_low" => SortKey::PriceLow,
            "price_high" => SortKey::PriceHigh,
            "rating_high" => SortKey::RatingHigh,
            "best_seller" => SortKey::BestSeller,
            "latest" => SortKey::Latest,
            "oldest" => SortKey::Oldest,
            _ => SortKey::Default,
        }
    }

    /// Capability table for the `/products` endpoint: `true` when the
    /// server orders the full result set itself and the client must not
    /// reorder the page.
    #[must_use]
    pub fn server_delegated(self) -> bool {
        matches!(self, SortKey::Default | SortKey::NameAsc | SortKey::NameDesc)
    }
}

/// Reorders one fetched page in place for a server-unsupported sort key.
///
/// The sort is stable: products that compare equal under the key retain
/// their server-reported relative order. Delegated keys are a no-op.
pub fn apply_local_sort(items: &mut [ProductRecord], key: SortKey) {
    if key.server_delegated() {
        return;
    }
    match key {
        SortKey::PriceLow => items.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceHigh => items.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::RatingHigh => items.sort_by(|a, b| cmp_f64(b.rating_or_zero(), a.rating_or_zero())),
        SortKey::BestSeller => items.sort_by(|a, b| b.total_sales.cmp(&a.total_sales)),
        SortKey::Latest => items.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Oldest => items.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortKey::Default | SortKey::NameAsc | SortKey::NameDesc => {}
    }
}

/// Total order over ratings; NaN never comes from the API but must not
/// panic the sort if it ever does.
fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
