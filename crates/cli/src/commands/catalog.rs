//! Product listing commands.

use generix_core::{ProductId, ProductQuery};
use generix_storefront::AppState;
use generix_storefront::views::Listing;

use super::{Result, settle};
use crate::output;

pub async fn list(state: &AppState, all: bool, query: &ProductQuery) -> Result<()> {
    let listing = if all { Listing::All } else { Listing::Active };

    let mut catalog = state.catalog();
    let loaded = catalog.load(listing).await;
    settle(catalog.drain_notices(), loaded)?;
    output::products(&catalog.visible(query));
    Ok(())
}

pub async fn show(state: &AppState, id: &ProductId) -> Result<()> {
    let product = state.catalog().product(id).await?;
    output::product(&product);
    Ok(())
}
