//! Store administration commands.
//!
//! The server decides who may call these; a non-admin token gets the
//! server's rejection as a notice.

use generix_core::{ProductDraft, ProductId, UserId};
use generix_storefront::AppState;

use super::{CommandError, Result, settle};
use crate::output;

fn require_sign_in(state: &AppState) -> Result<()> {
    if state.credentials().is_signed_in() {
        Ok(())
    } else {
        Err(CommandError::SignedOut)
    }
}

pub async fn products(state: &AppState) -> Result<()> {
    require_sign_in(state)?;
    let mut admin = state.admin();
    let loaded = admin.load().await;
    settle(admin.drain_notices(), loaded)?;
    output::products(&admin.products().iter().collect::<Vec<_>>());
    Ok(())
}

pub async fn add(state: &AppState, draft: &ProductDraft) -> Result<()> {
    require_sign_in(state)?;
    let mut admin = state.admin();
    let added = admin.add_product(draft).await;
    settle(admin.drain_notices(), added)
}

pub async fn update(state: &AppState, id: &ProductId, draft: &ProductDraft) -> Result<()> {
    require_sign_in(state)?;
    let mut admin = state.admin();
    let updated = admin.update_product(id, draft).await;
    settle(admin.drain_notices(), updated)
}

/// Toggling works on the loaded list, so the list is fetched first.
pub async fn toggle(state: &AppState, id: &ProductId) -> Result<()> {
    require_sign_in(state)?;
    let mut admin = state.admin();
    let loaded = admin.load().await;
    settle(admin.drain_notices(), loaded)?;

    let toggled = admin.toggle_availability(id).await;
    let availability = settle(admin.drain_notices(), toggled)?;
    output::line(&format!("{id} is now {}", availability.label()));
    Ok(())
}

pub async fn orders(state: &AppState) -> Result<()> {
    require_sign_in(state)?;
    let mut admin = state.admin();
    let fetched = admin.all_orders().await;
    let orders = settle(admin.drain_notices(), fetched)?;
    output::orders(&orders);
    Ok(())
}

pub async fn promote(state: &AppState, user_id: &UserId) -> Result<()> {
    require_sign_in(state)?;
    let mut admin = state.admin();
    let promoted = admin.promote(user_id).await;
    let user = settle(admin.drain_notices(), promoted)?;
    output::user(&user);
    Ok(())
}
