//! Product payloads.

use chrono::{DateTime, Utc};
use generix_core::{Availability, CurrencyCode, Price, Product, ProductDraft, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{from_value, kind_of, take_field};
use crate::error::{ClientError, Result};

/// Body of `POST /products` and `PATCH /products/{id}/update`.
#[derive(Debug, Serialize)]
pub struct ProductBody<'a> {
    pub name: &'a str,
    pub description: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl<'a> From<&'a ProductDraft> for ProductBody<'a> {
    fn from(draft: &'a ProductDraft) -> Self {
        Self {
            name: draft.name.trim(),
            description: draft.description.trim(),
            price: draft.price,
        }
    }
}

const fn active_by_default() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireProduct {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    price: Decimal,
    #[serde(default = "active_by_default")]
    is_active: bool,
    #[serde(default)]
    created_on: Option<DateTime<Utc>>,
}

impl WireProduct {
    fn into_domain(self, currency: CurrencyCode) -> Product {
        Product {
            id: ProductId::new(self.id),
            name: self.name,
            description: self.description,
            price: Price::new(self.price, currency),
            availability: Availability::from_active(self.is_active),
            created_on: self.created_on,
        }
    }
}

/// Convert a single product document.
///
/// # Errors
///
/// Returns `ClientError::DataShape` if the document lacks required fields.
pub fn convert_product(body: Value, currency: CurrencyCode) -> Result<Product> {
    let wire: WireProduct = from_value(body, "product")?;
    Ok(wire.into_domain(currency))
}

/// Convert a product list response.
///
/// Accepts a bare array or `{ products: [...] }`; any other shape yields an
/// empty list and a warning.
///
/// # Errors
///
/// Returns `ClientError::DataShape` if an element of the list is not a
/// product.
pub fn convert_products(body: Value, currency: CurrencyCode) -> Result<Vec<Product>> {
    let list = match body {
        Value::Array(list) => list,
        Value::Object(mut object) => match take_field(&mut object, &["products"]) {
            Some(Value::Array(list)) => list,
            _ => {
                tracing::warn!("Product list response has no products array");
                return Ok(Vec::new());
            }
        },
        other => {
            tracing::warn!(kind = kind_of(&other), "Product list response is not a list");
            return Ok(Vec::new());
        }
    };

    list.into_iter()
        .map(|item| convert_product(item, currency))
        .collect::<Result<Vec<_>>>()
        .map_err(|e| match e {
            ClientError::DataShape(msg) => ClientError::DataShape(format!("product list: {msg}")),
            other => other,
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(id: &str, active: bool) -> Value {
        json!({
            "_id": id,
            "name": "Amoxicillin",
            "description": "500mg capsule",
            "price": 12.75,
            "isActive": active,
            "createdOn": "2025-02-14T09:30:00.000Z",
            "__v": 0
        })
    }

    #[test]
    fn test_convert_product() {
        let product = convert_product(doc("p1", false), CurrencyCode::PHP).unwrap();
        assert_eq!(product.id.as_str(), "p1");
        assert_eq!(product.price.amount, Decimal::new(1275, 2));
        assert!(!product.is_active());
        assert!(product.created_on.is_some());
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let product = convert_product(
            json!({ "_id": "p2", "name": "Salbutamol", "price": 40 }),
            CurrencyCode::PHP,
        )
        .unwrap();
        assert!(product.is_active());
        assert_eq!(product.description, "");
        assert_eq!(product.created_on, None);
    }

    #[test]
    fn test_list_shapes() {
        let bare = convert_products(json!([doc("a", true), doc("b", true)]), CurrencyCode::PHP);
        assert_eq!(bare.unwrap().len(), 2);

        let wrapped = convert_products(json!({ "products": [doc("a", true)] }), CurrencyCode::PHP);
        assert_eq!(wrapped.unwrap()[0].id.as_str(), "a");

        let odd = convert_products(json!({ "message": "No products" }), CurrencyCode::PHP);
        assert!(odd.unwrap().is_empty());

        let broken = convert_products(json!([{ "name": "no id" }]), CurrencyCode::PHP);
        assert!(broken.is_err());
    }

    #[test]
    fn test_body_trims_draft() {
        let draft = ProductDraft {
            name: " Ibuprofen ".to_string(),
            description: "200mg".to_string(),
            price: Decimal::from(8),
        };
        let body = serde_json::to_value(ProductBody::from(&draft)).unwrap();
        assert_eq!(body, json!({ "name": "Ibuprofen", "description": "200mg", "price": 8.0 }));
    }
}
