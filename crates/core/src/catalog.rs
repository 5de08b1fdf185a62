//! Products and client-side catalog filtering.
//!
//! The API returns whole product lists; searching, price filtering, and
//! sorting happen locally on the already-fetched list.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::{Availability, Price, ProductId};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub availability: Availability,
    pub created_on: Option<DateTime<Utc>>,
}

impl Product {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.availability.is_active()
    }

    /// The subset of fields cached for order history and cart display.
    #[must_use]
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            price: Some(self.price),
        }
    }
}

/// Identity, name, and (when known) price of a product at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub price: Option<Price>,
}

/// An invalid product form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("product name is required")]
    MissingName,
    #[error("product description is required")]
    MissingDescription,
    #[error("price cannot be negative")]
    NegativePrice,
}

/// Fields an administrator submits to create or update a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Decimal,
}

impl ProductDraft {
    /// Check the draft before it is sent.
    ///
    /// # Errors
    ///
    /// Returns the first [`DraftError`] found.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.name.trim().is_empty() {
            return Err(DraftError::MissingName);
        }
        if self.description.trim().is_empty() {
            return Err(DraftError::MissingDescription);
        }
        if self.price < Decimal::ZERO {
            return Err(DraftError::NegativePrice);
        }
        Ok(())
    }

    /// A draft pre-filled from an existing product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.amount,
        }
    }
}

/// Sort order for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    PriceAsc,
    PriceDesc,
    Newest,
}

/// The sort key string is not recognized.
#[derive(Debug, Clone, Error)]
#[error("unknown sort key '{0}' (expected name, price, price-desc, or newest)")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "price" | "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "newest" => Ok(Self::Newest),
            _ => Err(UnknownSortKey(s.to_string())),
        }
    }
}

impl SortKey {
    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            Self::PriceAsc => a.price.amount.cmp(&b.price.amount),
            Self::PriceDesc => b.price.amount.cmp(&a.price.amount),
            // Products without a creation date sort last.
            Self::Newest => match (a.created_on, b.created_on) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

/// Local filter and sort applied to a fetched product list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Case-insensitive substring matched against name and description.
    pub search: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
    /// Hide archived products.
    pub active_only: bool,
    pub sort: Option<SortKey>,
}

impl ProductQuery {
    /// Returns `true` if the product passes every filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if self.active_only && !product.is_active() {
            return false;
        }
        if self.min_price.is_some_and(|min| product.price.amount < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price.amount > max) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                product.name.to_lowercase().contains(&needle)
                    || product.description.to_lowercase().contains(&needle)
            }
        }
    }

    /// Filter then sort. The sort is stable, so equal keys keep server order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let mut visible: Vec<&Product> = products.iter().filter(|p| self.matches(p)).collect();
        if let Some(key) = self.sort {
            visible.sort_by(|a, b| key.compare(a, b));
        }
        visible
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::types::CurrencyCode;

    fn product(id: &str, name: &str, price: i64, active: bool, day: Option<u32>) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: format!("{name} tablets"),
            price: Price::new(Decimal::from(price), CurrencyCode::PHP),
            availability: Availability::from_active(active),
            created_on: day.map(|d| Utc.with_ymd_and_hms(2025, 1, d, 0, 0, 0).unwrap()),
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("1", "Paracetamol", 5, true, Some(3)),
            product("2", "ascorbic acid", 12, true, Some(1)),
            product("3", "Loperamide", 9, false, None),
            product("4", "Cetirizine", 15, true, Some(7)),
        ]
    }

    fn ids(list: &[&Product]) -> Vec<String> {
        list.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_default_query_keeps_server_order() {
        let products = catalog();
        let visible = ProductQuery::default().apply(&products);
        assert_eq!(ids(&visible), ["1", "2", "3", "4"]);
    }

    #[test]
    fn test_search_is_case_insensitive_and_covers_description() {
        let products = catalog();
        let query = ProductQuery {
            search: Some("PARA".to_string()),
            ..ProductQuery::default()
        };
        assert_eq!(ids(&query.apply(&products)), ["1"]);

        let query = ProductQuery {
            search: Some("tablets".to_string()),
            ..ProductQuery::default()
        };
        assert_eq!(query.apply(&products).len(), 4);
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let products = catalog();
        let query = ProductQuery {
            min_price: Some(Decimal::from(9)),
            max_price: Some(Decimal::from(12)),
            ..ProductQuery::default()
        };
        assert_eq!(ids(&query.apply(&products)), ["2", "3"]);
    }

    #[test]
    fn test_active_only_and_sorts() {
        let products = catalog();
        let mut query = ProductQuery {
            active_only: true,
            sort: Some(SortKey::Name),
            ..ProductQuery::default()
        };
        assert_eq!(ids(&query.apply(&products)), ["2", "4", "1"]);

        query.sort = Some(SortKey::PriceDesc);
        assert_eq!(ids(&query.apply(&products)), ["4", "2", "1"]);

        query.active_only = false;
        query.sort = Some(SortKey::Newest);
        assert_eq!(ids(&query.apply(&products)), ["4", "1", "2", "3"]);
    }

    #[test]
    fn test_sort_key_from_str() {
        assert_eq!("price".parse::<SortKey>().unwrap(), SortKey::PriceAsc);
        assert_eq!("Newest".parse::<SortKey>().unwrap(), SortKey::Newest);
        assert!("random".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_draft_validation() {
        let mut draft = ProductDraft {
            name: "Ibuprofen".to_string(),
            description: "200mg".to_string(),
            price: Decimal::from(8),
        };
        assert!(draft.validate().is_ok());

        draft.price = Decimal::from(-1);
        assert_eq!(draft.validate(), Err(DraftError::NegativePrice));

        draft.name = "  ".to_string();
        assert_eq!(draft.validate(), Err(DraftError::MissingName));
    }
}
