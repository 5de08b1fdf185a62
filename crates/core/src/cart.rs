//! Cart model and local mutations.
//!
//! A [`Cart`] is a snapshot of the server's cart that the client may edit
//! optimistically. Line subtotals and the cart total are never stored: they
//! are derived from unit price and quantity every time they are read, so a
//! local edit cannot leave them stale.

use thiserror::Error;

use crate::types::{CartItemId, CurrencyCode, Price, ProductId, Quantity};

/// A local mutation that the cart refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// No line in the cart refers to this product.
    #[error("product {0} is not in the cart")]
    UnknownProduct(ProductId),

    /// The requested change would take the quantity below 1.
    #[error("quantity of product {product_id} cannot go below 1")]
    BelowMinimum { product_id: ProductId },

    /// The requested change leaves the quantity where it was.
    #[error("quantity of product {product_id} is unchanged")]
    Unchanged { product_id: ProductId },
}

/// Product reference captured in a cart line.
///
/// The name is a display snapshot taken when the cart was fetched; it is
/// not refreshed if the product is renamed later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRef {
    pub id: ProductId,
    pub name: Option<String>,
}

impl ProductRef {
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
        }
    }

    /// Name for display, with a placeholder when the server sent none.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Product name missing")
    }
}

/// One line of a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    id: CartItemId,
    product: ProductRef,
    unit_price: Price,
    quantity: Quantity,
}

impl CartItem {
    #[must_use]
    pub const fn new(
        id: CartItemId,
        product: ProductRef,
        unit_price: Price,
        quantity: Quantity,
    ) -> Self {
        Self {
            id,
            product,
            unit_price,
            quantity,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &CartItemId {
        &self.id
    }

    #[must_use]
    pub const fn product(&self) -> &ProductRef {
        &self.product
    }

    #[must_use]
    pub const fn unit_price(&self) -> Price {
        self.unit_price
    }

    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// `unit_price × quantity`, rounded to the currency's minor unit.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Outcome of a successful quantity change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityChange {
    pub product_id: ProductId,
    pub previous: Quantity,
    pub current: Quantity,
}

/// A shopping cart: ordered lines in a single currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
    currency: CurrencyCode,
}

impl Default for Cart {
    fn default() -> Self {
        Self::empty(CurrencyCode::default())
    }
}

impl Cart {
    /// A cart with no lines.
    #[must_use]
    pub const fn empty(currency: CurrencyCode) -> Self {
        Self {
            items: Vec::new(),
            currency,
        }
    }

    /// Build a cart from lines.
    ///
    /// Lines that share a product id are kept as separate rows; the first one
    /// is the target of product-keyed mutations.
    #[must_use]
    pub const fn new(items: Vec<CartItem>, currency: CurrencyCode) -> Self {
        Self { items, currency }
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of lines.
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Sum of line subtotals.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items
            .iter()
            .fold(Price::zero(self.currency), |acc, item| {
                acc.plus(item.subtotal())
            })
    }

    /// The line for a product, if present.
    #[must_use]
    pub fn find(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.product.id == product_id)
    }

    fn find_mut(&mut self, product_id: &ProductId) -> Result<&mut CartItem, CartError> {
        self.items
            .iter_mut()
            .find(|item| &item.product.id == product_id)
            .ok_or_else(|| CartError::UnknownProduct(product_id.clone()))
    }

    /// Change a line's quantity by `delta`, clamping at 1.
    ///
    /// # Errors
    ///
    /// - [`CartError::UnknownProduct`] if no line matches.
    /// - [`CartError::BelowMinimum`] if clamping leaves the quantity unchanged
    ///   (for example a decrement at 1).
    /// - [`CartError::Unchanged`] for any other change that leaves the quantity
    ///   where it was, such as a zero delta or an increment at the ceiling.
    ///
    /// The cart is not modified on error.
    pub fn change_quantity(
        &mut self,
        product_id: &ProductId,
        delta: i64,
    ) -> Result<QuantityChange, CartError> {
        let item = self.find_mut(product_id)?;
        let previous = item.quantity;
        let current = previous.saturating_apply(delta);

        if current == previous {
            let product_id = product_id.clone();
            return Err(if delta < 0 {
                CartError::BelowMinimum { product_id }
            } else {
                CartError::Unchanged { product_id }
            });
        }

        item.quantity = current;
        Ok(QuantityChange {
            product_id: product_id.clone(),
            previous,
            current,
        })
    }

    /// Set a line's quantity directly.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownProduct`] if no line matches.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> Result<QuantityChange, CartError> {
        let item = self.find_mut(product_id)?;
        let previous = item.quantity;
        item.quantity = quantity;
        Ok(QuantityChange {
            product_id: product_id.clone(),
            previous,
            current: quantity,
        })
    }

    /// Remove the line for a product and return it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownProduct`] if no line matches.
    pub fn remove(&mut self, product_id: &ProductId) -> Result<CartItem, CartError> {
        let index = self
            .items
            .iter()
            .position(|item| &item.product.id == product_id)
            .ok_or_else(|| CartError::UnknownProduct(product_id.clone()))?;
        Ok(self.items.remove(index))
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn php(amount: i64) -> Price {
        Price::new(Decimal::from(amount), CurrencyCode::PHP)
    }

    fn item(product: &str, unit: i64, quantity: u32) -> CartItem {
        CartItem::new(
            CartItemId::new(format!("line-{product}")),
            ProductRef::new(ProductId::new(product), format!("Product {product}")),
            php(unit),
            Quantity::new(quantity).unwrap(),
        )
    }

    fn assert_invariants(cart: &Cart) {
        let mut sum = Price::zero(cart.currency());
        for line in cart.items() {
            assert_eq!(line.subtotal(), line.unit_price().times(line.quantity()));
            sum = sum.plus(line.subtotal());
        }
        assert_eq!(cart.total_price(), sum);
    }

    #[test]
    fn test_increment_updates_subtotal_and_total() {
        let mut cart = Cart::new(vec![item("a", 100, 2)], CurrencyCode::PHP);
        assert_eq!(cart.total_price(), php(200));

        let change = cart.change_quantity(&ProductId::new("a"), 1).unwrap();
        assert_eq!(change.previous.get(), 2);
        assert_eq!(change.current.get(), 3);

        let line = cart.find(&ProductId::new("a")).unwrap();
        assert_eq!(line.quantity().get(), 3);
        assert_eq!(line.subtotal(), php(300));
        assert_eq!(cart.total_price(), php(300));
    }

    #[test]
    fn test_decrement_at_one_is_rejected_and_leaves_cart_alone() {
        let mut cart = Cart::new(vec![item("a", 50, 1)], CurrencyCode::PHP);
        let before = cart.clone();

        let err = cart.change_quantity(&ProductId::new("a"), -1).unwrap_err();
        assert!(matches!(err, CartError::BelowMinimum { .. }));
        assert_eq!(cart, before);
        assert_eq!(cart.items()[0].quantity(), Quantity::ONE);
    }

    #[test]
    fn test_change_that_keeps_quantity_is_rejected() {
        let mut cart = Cart::new(vec![item("a", 50, 3)], CurrencyCode::PHP);
        let before = cart.clone();

        let err = cart.change_quantity(&ProductId::new("a"), 0).unwrap_err();
        assert!(matches!(err, CartError::Unchanged { .. }));
        assert_eq!(cart, before);

        let mut full = Cart::new(vec![item("a", 1, u32::MAX)], CurrencyCode::PHP);
        let err = full.change_quantity(&ProductId::new("a"), 1).unwrap_err();
        assert!(matches!(err, CartError::Unchanged { .. }));
        assert_eq!(full.items()[0].quantity().get(), u32::MAX);
    }

    #[test]
    fn test_large_decrement_clamps_to_one() {
        let mut cart = Cart::new(vec![item("a", 10, 5)], CurrencyCode::PHP);
        let change = cart.change_quantity(&ProductId::new("a"), -20).unwrap();
        assert_eq!(change.current, Quantity::ONE);
        assert_eq!(cart.total_price(), php(10));
    }

    #[test]
    fn test_unknown_product() {
        let mut cart = Cart::new(vec![item("a", 10, 1)], CurrencyCode::PHP);
        assert_eq!(
            cart.change_quantity(&ProductId::new("zzz"), 1),
            Err(CartError::UnknownProduct(ProductId::new("zzz")))
        );
        assert!(cart.remove(&ProductId::new("zzz")).is_err());
    }

    #[test]
    fn test_invariants_hold_across_mutation_sequence() {
        let mut cart = Cart::new(
            vec![item("a", 100, 2), item("b", 35, 1), item("c", 7, 4)],
            CurrencyCode::PHP,
        );
        let steps: [(&str, i64); 8] = [
            ("a", 1),
            ("b", -1),
            ("c", -3),
            ("c", -1),
            ("b", 5),
            ("a", -2),
            ("a", 10),
            ("c", 2),
        ];

        assert_invariants(&cart);
        for (product, delta) in steps {
            let _ = cart.change_quantity(&ProductId::new(product), delta);
            assert_invariants(&cart);
        }

        cart.remove(&ProductId::new("b")).unwrap();
        assert_invariants(&cart);
    }

    #[test]
    fn test_removing_last_item_yields_zero_total() {
        let mut cart = Cart::new(vec![item("a", 100, 2)], CurrencyCode::PHP);
        let removed = cart.remove(&ProductId::new("a")).unwrap();
        assert_eq!(removed.product().id, ProductId::new("a"));
        assert!(cart.is_empty());
        assert!(cart.total_price().is_zero());
    }

    #[test]
    fn test_clear_non_empty_cart() {
        let mut cart = Cart::new(vec![item("a", 100, 2), item("b", 1, 9)], CurrencyCode::PHP);
        cart.clear();
        assert!(cart.items().is_empty());
        assert_eq!(cart.total_price(), php(0));
    }

    #[test]
    fn test_item_count_sums_quantities() {
        let cart = Cart::new(vec![item("a", 1, 2), item("b", 1, 3)], CurrencyCode::PHP);
        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.line_count(), 2);
    }

    #[test]
    fn test_missing_name_placeholder() {
        let product = ProductRef {
            id: ProductId::new("x"),
            name: None,
        };
        assert_eq!(product.display_name(), "Product name missing");
    }
}
