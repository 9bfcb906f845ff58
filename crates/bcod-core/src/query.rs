//! Canonical representation of the active list filters, and the two-way
//! codec between it and `/products` query parameters.
//!
//! Absent optional fields are omitted from the wire request entirely (no
//! `category_id=` empty parameters), and decode fills the neutral value
//! back in, so `decode(&encode(q)) == q` for everything the wire format
//! can carry.

use rust_decimal::Decimal;

use crate::sort::SortKey;

/// The active filter/sort/pagination selection for a product listing.
///
/// Owned by the page-level controller and replaced wholesale on every
/// change; the field setters encode the page-reset policy — narrowing a
/// filter lands the user on page 1 of the narrowed set.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    /// 1-based page number, always present on the wire.
    pub page: u32,
    pub search: Option<String>,
    pub category_id: Option<i64>,
    pub sort: SortKey,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Minimum review rating, 0–5.
    pub min_rating: Option<u8>,
    /// `Some(true)` restricts to carted-able stock; `Some(false)` and
    /// `None` both mean "no stock filter" and encode identically.
    pub in_stock: Option<bool>,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            page: 1,
            search: None,
            category_id: None,
            sort: SortKey::Default,
            min_price: None,
            max_price: None,
            min_rating: None,
            in_stock: None,
        }
    }
}

impl QuerySpec {
    /// Encodes the spec as ordered query pairs for the catalog endpoint.
    ///
    /// `page` is always emitted; every other field only when set, and
    /// `in_stock` only when `Some(true)`.
    #[must_use]
    pub fn encode(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string())];
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(category_id) = self.category_id {
            pairs.push(("category_id", category_id.to_string()));
        }
        if let Some(min_price) = self.min_price {
            pairs.push(("min_price", min_price.to_string()));
        }
        if let Some(max_price) = self.max_price {
            pairs.push(("max_price", max_price.to_string()));
        }
        if let Some(min_rating) = self.min_rating {
            pairs.push(("min_rating", min_rating.to_string()));
        }
        if self.in_stock == Some(true) {
            pairs.push(("in_stock", "true".to_string()));
        }
        if let Some(sort) = self.sort.wire_name() {
            pairs.push(("sort", sort.to_string()));
        }
        pairs
    }

    /// Decodes query pairs back into a spec.
    ///
    /// Missing or malformed values fall back to the field's neutral value:
    /// absent page → 1, page 0 → 1, unknown sort → `Default`, unparsable
    /// numerics → unset. Unknown keys are ignored.
    #[must_use]
    pub fn decode<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut spec = Self::default();
        for (key, value) in pairs {
            match key {
                "page" => spec.page = value.parse().unwrap_or(1).max(1),
                "search" if !value.is_empty() => spec.search = Some(value.to_string()),
                "category_id" => spec.category_id = value.parse().ok(),
                "min_price" => spec.min_price = value.parse().ok(),
                "max_price" => spec.max_price = value.parse().ok(),
                "min_rating" => spec.min_rating = value.parse().ok(),
                "in_stock" if value == "true" => spec.in_stock = Some(true),
                "sort" => spec.sort = SortKey::parse(value),
                _ => {}
            }
        }
        spec
    }

    /// Moves to another page of the same filtered set.
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Replaces the search term. Resets to page 1.
    #[must_use]
    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search.filter(|s| !s.is_empty());
        self.page = 1;
        self
    }

    /// Replaces the category filter. Resets to page 1.
    #[must_use]
    pub fn with_category(mut self, category_id: Option<i64>) -> Self {
        self.category_id = category_id;
        self.page = 1;
        self
    }

    /// Replaces both price bounds. Resets to page 1.
    #[must_use]
    pub fn with_price_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self.page = 1;
        self
    }

    /// Replaces the rating floor. Resets to page 1.
    #[must_use]
    pub fn with_min_rating(mut self, min_rating: Option<u8>) -> Self {
        self.min_rating = min_rating;
        self.page = 1;
        self
    }

    /// Toggles the stock-only filter. Resets to page 1.
    #[must_use]
    pub fn with_in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = if in_stock { Some(true) } else { None };
        self.page = 1;
        self
    }

    /// Replaces the sort key. Resets to page 1.
    #[must_use]
    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self.page = 1;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(spec: &QuerySpec) -> QuerySpec {
        let encoded = spec.encode();
        QuerySpec::decode(encoded.iter().map(|(k, v)| (*k, v.as_str())))
    }

    #[test]
    fn default_spec_encodes_page_only() {
        let pairs = QuerySpec::default().encode();
        assert_eq!(pairs, vec![("page", "1".to_string())]);
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let spec = QuerySpec {
            page: 4,
            search: Some("guppy food".to_string()),
            category_id: Some(3),
            sort: SortKey::PriceHigh,
            min_price: Some("10.50".parse().unwrap()),
            max_price: Some("99.99".parse().unwrap()),
            min_rating: Some(4),
            in_stock: Some(true),
        };
        assert_eq!(round_trip(&spec), spec);
    }

    #[test]
    fn round_trip_of_sparse_specs() {
        let cases = [
            QuerySpec::default(),
            QuerySpec::default().with_search(Some("betta".to_string())),
            QuerySpec::default().with_category(Some(8)).with_page(3),
            QuerySpec::default().with_sort(SortKey::Oldest),
            QuerySpec::default().with_min_rating(Some(3)),
        ];
        for spec in cases {
            assert_eq!(round_trip(&spec), spec, "round-trip failed for {spec:?}");
        }
    }

    #[test]
    fn decode_defaults_missing_page_to_one() {
        let spec = QuerySpec::decode([("search", "tank")]);
        assert_eq!(spec.page, 1);
        assert_eq!(spec.search.as_deref(), Some("tank"));
    }

    #[test]
    fn decode_clamps_page_zero_and_garbage() {
        assert_eq!(QuerySpec::decode([("page", "0")]).page, 1);
        assert_eq!(QuerySpec::decode([("page", "abc")]).page, 1);
    }

    #[test]
    fn decode_ignores_unknown_keys_and_sorts() {
        let spec = QuerySpec::decode([("utm_source", "x"), ("sort", "cheapest_first")]);
        assert_eq!(spec, QuerySpec::default());
    }

    #[test]
    fn in_stock_false_is_not_encoded() {
        let spec = QuerySpec {
            in_stock: Some(false),
            ..QuerySpec::default()
        };
        assert!(!spec.encode().iter().any(|(k, _)| *k == "in_stock"));
    }

    #[test]
    fn filter_setters_reset_page_to_one() {
        let base = QuerySpec::default().with_page(7);
        assert_eq!(base.clone().with_search(Some("x".to_string())).page, 1);
        assert_eq!(base.clone().with_category(Some(2)).page, 1);
        assert_eq!(base.clone().with_price_range(None, None).page, 1);
        assert_eq!(base.clone().with_min_rating(Some(4)).page, 1);
        assert_eq!(base.clone().with_in_stock(true).page, 1);
        assert_eq!(base.clone().with_sort(SortKey::Latest).page, 1);
        assert_eq!(base.with_page(9).page, 9);
    }

    #[test]
    fn empty_search_is_treated_as_absent() {
        let spec = QuerySpec::default().with_search(Some(String::new()));
        assert!(spec.search.is_none());
        assert_eq!(QuerySpec::decode([("search", "")]).search, None);
    }
}
