//! Cart view-model.
//!
//! Holds the last cart snapshot and applies shopper edits to it before the
//! server confirms them. Each edit runs in two steps:
//!
//! 1. *stage* (synchronous): validate, update the local cart, publish it.
//! 2. *commit* (async): call the API, push a notice, and on success refetch
//!    the whole cart so local state converges on the server's.
//!
//! A failed quantity update is not rolled back; the optimistic value stays
//! on screen until the next successful fetch.

use generix_core::{Cart, CurrencyCode, Price, ProductId, Quantity};
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use crate::api::{CartGateway, CheckoutReceipt};
use crate::error::{Result, add_breadcrumb, failure_breadcrumb};
use crate::notice::{Notice, Notices};

const BREADCRUMB: &str = "cart";

// =============================================================================
// Display Types
// =============================================================================

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub subtotal: String,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u64,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| CartItemView {
                    product_id: item.product().id.to_string(),
                    name: item.product().display_name().to_string(),
                    quantity: item.quantity().get(),
                    unit_price: item.unit_price().to_string(),
                    subtotal: item.subtotal().to_string(),
                })
                .collect(),
            total: cart.total_price().to_string(),
            item_count: cart.item_count(),
        }
    }
}

// =============================================================================
// State
// =============================================================================

/// Where the cart stands relative to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartStatus {
    Loading,
    Ready,
    /// The last fetch failed; the cart shown is empty.
    Failed(String),
}

/// Snapshot published to observers after every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartState {
    pub cart: Cart,
    pub status: CartStatus,
}

/// A staged edit waiting to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingChange {
    Quantity {
        product_id: ProductId,
        quantity: Quantity,
    },
    Remove {
        product_id: ProductId,
    },
    Clear,
}

// =============================================================================
// CartViewModel
// =============================================================================

/// Optimistic cart state backed by a [`CartGateway`].
pub struct CartViewModel<G> {
    gateway: G,
    state: CartState,
    notices: Notices,
    publisher: watch::Sender<CartState>,
}

impl<G: CartGateway> CartViewModel<G> {
    /// A view-model with an empty cart in `Loading` status. Call
    /// [`load`](Self::load) to fetch.
    pub fn new(gateway: G, currency: CurrencyCode) -> Self {
        let state = CartState {
            cart: Cart::empty(currency),
            status: CartStatus::Loading,
        };
        let (publisher, _) = watch::channel(state.clone());
        Self {
            gateway,
            state,
            notices: Notices::new(),
            publisher,
        }
    }

    /// Receive every published state, starting with the current one.
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.publisher.subscribe()
    }

    pub const fn cart(&self) -> &Cart {
        &self.state.cart
    }

    pub const fn status(&self) -> &CartStatus {
        &self.state.status
    }

    pub fn view(&self) -> CartView {
        CartView::from(&self.state.cart)
    }

    pub const fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    fn publish(&self) {
        self.publisher.send_replace(self.state.clone());
    }

    fn reset_to_empty(&mut self, message: String) {
        self.state.cart = Cart::empty(self.state.cart.currency());
        self.state.status = CartStatus::Failed(message);
        self.publish();
    }

    /// Fetch the cart from the server, replacing local state.
    ///
    /// On failure the cart is emptied, the status set to `Failed`, and an
    /// error notice pushed. No retry.
    ///
    /// # Errors
    ///
    /// Returns the gateway error after local state has been reset.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<()> {
        self.state.status = CartStatus::Loading;
        self.publish();

        match self.gateway.get_cart().await {
            Ok(cart) => {
                self.state.cart = cart;
                self.state.status = CartStatus::Ready;
                self.publish();
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Failed to fetch cart");
                failure_breadcrumb(BREADCRUMB, "get cart", &err);
                self.reset_to_empty(err.to_string());
                self.notices.error("Could not fetch cart data.");
                Err(err)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Stage
    // -------------------------------------------------------------------------

    /// Apply a quantity delta locally, clamped at 1.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` when the product is not in the cart
    /// or the clamped quantity would not change (a decrement at 1, or a zero
    /// delta). Local state is untouched in both cases.
    pub fn stage_quantity(&mut self, product_id: &ProductId, delta: i64) -> Result<PendingChange> {
        let change = self.state.cart.change_quantity(product_id, delta)?;
        self.publish();
        Ok(PendingChange::Quantity {
            product_id: change.product_id,
            quantity: change.current,
        })
    }

    /// Remove a line locally.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` when the product is not in the cart.
    pub fn stage_remove(&mut self, product_id: &ProductId) -> Result<PendingChange> {
        self.state.cart.remove(product_id)?;
        self.publish();
        Ok(PendingChange::Remove {
            product_id: product_id.clone(),
        })
    }

    /// Empty the cart locally.
    pub fn stage_clear(&mut self) -> PendingChange {
        self.state.cart.clear();
        self.publish();
        PendingChange::Clear
    }

    // -------------------------------------------------------------------------
    // Commit
    // -------------------------------------------------------------------------

    /// Send a staged edit and reconcile on success.
    ///
    /// # Errors
    ///
    /// Returns the gateway error from the mutating call or the refetch. The
    /// optimistic local state is kept when the mutating call fails.
    #[instrument(skip(self))]
    pub async fn commit(&mut self, change: PendingChange) -> Result<()> {
        let sent = match &change {
            PendingChange::Quantity {
                product_id,
                quantity,
            } => self.gateway.update_quantity(product_id, *quantity).await,
            PendingChange::Remove { product_id } => self.gateway.remove_item(product_id).await,
            PendingChange::Clear => self.gateway.clear_cart().await,
        };

        if let Err(err) = sent {
            warn!(error = %err, "Cart update failed; keeping local state");
            match &change {
                PendingChange::Quantity { .. } => {
                    failure_breadcrumb(BREADCRUMB, "update quantity", &err);
                }
                PendingChange::Remove { .. } => {
                    failure_breadcrumb(BREADCRUMB, "remove item", &err);
                    self.notices.error("Failed to remove item from cart");
                }
                PendingChange::Clear => {
                    failure_breadcrumb(BREADCRUMB, "clear cart", &err);
                    self.notices.error("Failed to clear cart");
                }
            }
            return Err(err);
        }

        match &change {
            PendingChange::Quantity {
                product_id,
                quantity,
            } => {
                add_breadcrumb(
                    BREADCRUMB,
                    "Updated quantity",
                    Some(&[
                        ("product_id", product_id.as_str()),
                        ("quantity", &quantity.to_string()),
                    ]),
                );
            }
            PendingChange::Remove { product_id } => {
                add_breadcrumb(
                    BREADCRUMB,
                    "Removed item",
                    Some(&[("product_id", product_id.as_str())]),
                );
                self.notices.success("Item removed from cart!");
            }
            PendingChange::Clear => {
                add_breadcrumb(BREADCRUMB, "Cleared cart", None);
                self.notices.success("Cart cleared successfully!");
            }
        }

        self.load().await
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Change a line's quantity by `delta`: stage, then commit.
    ///
    /// # Errors
    ///
    /// See [`stage_quantity`](Self::stage_quantity) and
    /// [`commit`](Self::commit). A rejected stage makes no network call.
    pub async fn change_quantity(&mut self, product_id: &ProductId, delta: i64) -> Result<()> {
        let change = self.stage_quantity(product_id, delta).inspect_err(|err| {
            info!(product_id = %product_id, delta, error = %err, "Quantity change rejected");
        })?;
        self.commit(change).await
    }

    /// Remove a line: stage, then commit.
    ///
    /// # Errors
    ///
    /// See [`stage_remove`](Self::stage_remove) and [`commit`](Self::commit).
    pub async fn remove(&mut self, product_id: &ProductId) -> Result<()> {
        let change = self.stage_remove(product_id)?;
        self.commit(change).await
    }

    /// Empty the cart: stage, then commit.
    ///
    /// # Errors
    ///
    /// See [`commit`](Self::commit).
    pub async fn clear(&mut self) -> Result<()> {
        let change = self.stage_clear();
        self.commit(change).await
    }

    /// Add a product from the catalog, then refetch.
    ///
    /// # Errors
    ///
    /// Returns the gateway error from the add call or the refetch.
    #[instrument(skip(self, unit_price), fields(product_id = %product_id, quantity = %quantity))]
    pub async fn add_to_cart(
        &mut self,
        product_id: &ProductId,
        quantity: Quantity,
        unit_price: Price,
    ) -> Result<()> {
        if let Err(err) = self
            .gateway
            .add_to_cart(product_id, quantity, unit_price)
            .await
        {
            warn!(error = %err, "Failed to add item to cart");
            failure_breadcrumb(BREADCRUMB, "add to cart", &err);
            self.notices.error("Failed to add item to cart.");
            return Err(err);
        }
        add_breadcrumb(
            BREADCRUMB,
            "Added item",
            Some(&[("product_id", product_id.as_str())]),
        );

        self.load().await?;
        let count = self.state.cart.item_count();
        let plural = if count > 1 { "s" } else { "" };
        self.notices
            .success(format!("Item added! Cart now has {count} item{plural}."));
        Ok(())
    }

    /// Place an order for the current cart.
    ///
    /// On success the local cart is cleared. On failure local state is left
    /// as is and the server's message (or "Checkout failed") is pushed.
    ///
    /// # Errors
    ///
    /// Returns the gateway error.
    #[instrument(skip(self))]
    pub async fn checkout(&mut self) -> Result<CheckoutReceipt> {
        match self.gateway.checkout().await {
            Ok(receipt) => {
                add_breadcrumb(BREADCRUMB, "Checked out", None);
                self.state.cart.clear();
                self.state.status = CartStatus::Ready;
                self.publish();
                self.notices.success("Order placed successfully!");
                Ok(receipt)
            }
            Err(err) => {
                warn!(error = %err, "Checkout failed");
                failure_breadcrumb(BREADCRUMB, "checkout", &err);
                self.notices
                    .error(err.server_message().unwrap_or("Checkout failed"));
                Err(err)
            }
        }
    }
}

impl<G> std::fmt::Debug for CartViewModel<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartViewModel")
            .field("state", &self.state)
            .field("notices", &self.notices.len())
            .finish_non_exhaustive()
    }
}
