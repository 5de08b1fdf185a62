//! Cart payloads.

use generix_core::{
    Cart, CartItem, CartItemId, CurrencyCode, Price, ProductId, ProductRef, Quantity,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{WireRef, from_value, kind_of, take_field};
use crate::error::{ClientError, Result};

/// Body of `POST /cart/add-to-cart`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest<'a> {
    pub product_id: &'a str,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Body of `PATCH /cart/update-cart-quantity`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityRequest<'a> {
    pub product_id: &'a str,
    pub new_quantity: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCartLine {
    #[serde(rename = "_id", default)]
    id: Option<String>,
    #[serde(alias = "product")]
    product_id: WireRef,
    quantity: i64,
    #[serde(default)]
    subtotal: Option<Decimal>,
}

/// Convert a `get-cart` response into a [`Cart`].
///
/// Accepted shapes: `{ cartItems: [...] }`, `{ items: [...] }`, an object
/// with neither (empty cart), or a bare array of lines. A reported
/// `totalPrice` that disagrees with the line subtotals is logged and
/// otherwise ignored.
///
/// # Errors
///
/// Returns `ClientError::DataShape` for any other top-level shape or for a
/// line that cannot be read.
pub fn convert_cart(body: Value, currency: CurrencyCode) -> Result<Cart> {
    let (lines, reported_total) = match body {
        Value::Array(lines) => (lines, None),
        Value::Object(mut object) => {
            let reported_total = take_field(&mut object, &["totalPrice"]);
            let lines = match take_field(&mut object, &["cartItems", "items"]) {
                None => Vec::new(),
                Some(Value::Array(lines)) => lines,
                Some(other) => {
                    return Err(ClientError::DataShape(format!(
                        "cart items is {}, expected array",
                        kind_of(&other)
                    )));
                }
            };
            (lines, reported_total)
        }
        other => {
            return Err(ClientError::DataShape(format!(
                "cart is {}, expected object",
                kind_of(&other)
            )));
        }
    };

    let items = lines
        .into_iter()
        .map(|line| convert_cart_line(from_value(line, "cart line")?, currency))
        .collect::<Result<Vec<_>>>()?;
    let cart = Cart::new(items, currency);

    if let Some(reported) = reported_total.and_then(|v| from_value::<Decimal>(v, "totalPrice").ok())
        && reported != cart.total_price().amount
    {
        tracing::warn!(
            reported = %reported,
            computed = %cart.total_price().amount,
            "Server cart total disagrees with line subtotals"
        );
    }

    Ok(cart)
}

fn convert_cart_line(line: WireCartLine, currency: CurrencyCode) -> Result<CartItem> {
    let product_id = ProductId::new(line.product_id.id());
    let quantity = Quantity::try_from(line.quantity)
        .map_err(|e| ClientError::DataShape(format!("cart line for {product_id}: {e}")))?;

    let embedded = line.product_id.embedded();
    let unit_amount = match (embedded.and_then(|p| p.price), line.subtotal) {
        (Some(price), _) => price,
        (None, Some(subtotal)) => Price::new(subtotal, currency).per_unit(quantity).amount,
        (None, None) => {
            return Err(ClientError::DataShape(format!(
                "cart line for {product_id} has neither price nor subtotal"
            )));
        }
    };

    let product = ProductRef {
        id: product_id.clone(),
        name: embedded.and_then(|p| p.name.clone()),
    };
    let id = line
        .id
        .map_or_else(|| CartItemId::new(product_id.as_str()), CartItemId::new);

    Ok(CartItem::new(
        id,
        product,
        Price::new(unit_amount, currency),
        quantity,
    ))
}
