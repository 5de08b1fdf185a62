//! Placed orders.

use chrono::{DateTime, Utc};

use crate::catalog::ProductSnapshot;
use crate::types::{OrderId, Price, ProductId, Quantity, UserId};

/// One product within a placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub subtotal: Price,
    /// Filled in by the client from the product cache; orders only carry ids.
    pub product: Option<ProductSnapshot>,
}

impl OrderLine {
    /// Product name, or a placeholder until the snapshot is resolved.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.product
            .as_ref()
            .map_or("[No product name]", |p| p.name.as_str())
    }
}

/// An order as recorded by the server at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    pub lines: Vec<OrderLine>,
    pub total_price: Price,
    pub ordered_on: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

impl Order {
    /// Sum of quantities across lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity.get()))
            .sum()
    }
}

/// Sort orders newest first. Orders without a timestamp go last.
pub fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.ordered_on.cmp(&a.ordered_on));
}
