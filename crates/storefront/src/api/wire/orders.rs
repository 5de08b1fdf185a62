//! Order payloads.

use chrono::{DateTime, Utc};
use generix_core::{
    CurrencyCode, Order, OrderId, OrderLine, Price, ProductId, ProductSnapshot, Quantity, UserId,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use super::{WireRef, from_value, kind_of, take_field};
use crate::error::{ClientError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireOrder {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    user_id: Option<WireRef>,
    #[serde(default)]
    products_ordered: Vec<WireOrderLine>,
    #[serde(default)]
    total_price: Decimal,
    #[serde(default)]
    ordered_on: Option<DateTime<Utc>>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireOrderLine {
    #[serde(alias = "product")]
    product_id: WireRef,
    quantity: i64,
    #[serde(default)]
    subtotal: Decimal,
}

fn convert_order(wire: WireOrder, currency: CurrencyCode) -> Result<Order> {
    let lines = wire
        .products_ordered
        .into_iter()
        .map(|line| {
            let product_id = ProductId::new(line.product_id.id());
            let quantity = Quantity::try_from(line.quantity).map_err(|e| {
                ClientError::DataShape(format!("order {} line {product_id}: {e}", wire.id))
            })?;
            // Populated references already carry a name; bare ids are
            // resolved later through the product cache.
            let product = line.product_id.embedded().and_then(|doc| {
                doc.name.as_ref().map(|name| ProductSnapshot {
                    id: product_id.clone(),
                    name: name.clone(),
                    price: doc.price.map(|p| Price::new(p, currency)),
                })
            });
            Ok(OrderLine {
                product_id,
                quantity,
                subtotal: Price::new(line.subtotal, currency),
                product,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Order {
        id: OrderId::new(wire.id),
        user_id: wire.user_id.map(|u| UserId::new(u.id())),
        lines,
        total_price: Price::new(wire.total_price, currency),
        ordered_on: wire.ordered_on,
        status: wire.status,
    })
}

/// Convert an order list response.
///
/// Accepts `{ Orders: [...] }`, `{ orders: [...] }`, or a bare array; any
/// other shape yields an empty list. Server order is kept.
///
/// # Errors
///
/// Returns `ClientError::DataShape` if an element is not a readable order.
pub fn convert_orders(body: Value, currency: CurrencyCode) -> Result<Vec<Order>> {
    let list = match body {
        Value::Array(list) => list,
        Value::Object(mut object) => match take_field(&mut object, &["Orders", "orders"]) {
            Some(Value::Array(list)) => list,
            _ => {
                tracing::warn!("Order list response has no Orders array");
                return Ok(Vec::new());
            }
        },
        other => {
            tracing::warn!(kind = kind_of(&other), "Order list response is not a list");
            return Ok(Vec::new());
        }
    };

    list.into_iter()
        .map(|item| convert_order(from_value(item, "order")?, currency))
        .collect()
}
