//! Order history.

use generix_storefront::AppState;

use super::{CommandError, Result, settle};
use crate::output;

pub async fn history(state: &AppState) -> Result<()> {
    if !state.credentials().is_signed_in() {
        return Err(CommandError::SignedOut);
    }

    let mut orders = state.orders();
    let loaded = orders.load().await;
    settle(orders.drain_notices(), loaded)?;
    output::orders(orders.orders());
    Ok(())
}
