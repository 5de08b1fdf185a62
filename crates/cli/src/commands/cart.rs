//! Cart commands.

use generix_core::{ProductId, Quantity};
use generix_storefront::AppState;

use super::{Result, settle};
use crate::output;

pub async fn show(state: &AppState) -> Result<()> {
    let mut cart = state.cart();
    let loaded = cart.load().await;
    settle(cart.drain_notices(), loaded)?;
    output::cart(&cart.view());
    Ok(())
}

/// Look up the product's current price, then add it.
pub async fn add(state: &AppState, product_id: &ProductId, quantity: Quantity) -> Result<()> {
    let product = state.catalog().product(product_id).await?;

    let mut cart = state.cart();
    let added = cart.add_to_cart(product_id, quantity, product.price).await;
    settle(cart.drain_notices(), added)?;
    output::cart(&cart.view());
    Ok(())
}

/// Step a line's quantity. The cart is loaded first so the local edit has
/// a line to apply to.
pub async fn change(state: &AppState, product_id: &ProductId, delta: i64) -> Result<()> {
    let mut cart = state.cart();
    let loaded = cart.load().await;
    settle(cart.drain_notices(), loaded)?;

    let changed = cart.change_quantity(product_id, delta).await;
    settle(cart.drain_notices(), changed)?;
    output::cart(&cart.view());
    Ok(())
}

pub async fn remove(state: &AppState, product_id: &ProductId) -> Result<()> {
    let mut cart = state.cart();
    let loaded = cart.load().await;
    settle(cart.drain_notices(), loaded)?;

    let removed = cart.remove(product_id).await;
    settle(cart.drain_notices(), removed)?;
    output::cart(&cart.view());
    Ok(())
}

pub async fn clear(state: &AppState) -> Result<()> {
    let mut cart = state.cart();
    let cleared = cart.clear().await;
    settle(cart.drain_notices(), cleared)
}

pub async fn checkout(state: &AppState) -> Result<()> {
    let mut cart = state.cart();
    let placed = cart.checkout().await;
    let receipt = settle(cart.drain_notices(), placed)?;
    if let Some(message) = receipt.message {
        output::line(&message);
    }
    Ok(())
}
