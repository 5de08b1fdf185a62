//! Order history view-model.

use futures::future::join_all;
use generix_core::{Order, order::sort_newest_first};
use tracing::{debug, instrument, warn};

use crate::api::{CatalogGateway, OrderGateway};
use crate::cache::ProductCache;
use crate::error::{Result, failure_breadcrumb};
use crate::notice::{Notice, Notices};

const BREADCRUMB: &str = "orders";

/// The signed-in shopper's past orders, newest first, with product names
/// resolved through the product cache.
pub struct OrderHistoryViewModel<G> {
    gateway: G,
    cache: ProductCache,
    orders: Vec<Order>,
    error: Option<String>,
    notices: Notices,
}

impl<G: OrderGateway + CatalogGateway> OrderHistoryViewModel<G> {
    pub fn new(gateway: G, cache: ProductCache) -> Self {
        Self {
            gateway,
            cache,
            orders: Vec::new(),
            error: None,
            notices: Notices::new(),
        }
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Message from the last failed load.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Fetch, sort, and enrich the order history.
    ///
    /// # Errors
    ///
    /// Returns the gateway error; the list is left empty and the error
    /// message (the server's, or "Failed to fetch orders") is recorded.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<()> {
        match self.gateway.my_orders().await {
            Ok(mut orders) => {
                sort_newest_first(&mut orders);
                enrich(&self.gateway, &self.cache, &mut orders).await;
                debug!(count = orders.len(), "Loaded order history");
                self.orders = orders;
                self.error = None;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Failed to fetch orders");
                failure_breadcrumb(BREADCRUMB, "my orders", &err);
                let message = err
                    .server_message()
                    .unwrap_or("Failed to fetch orders")
                    .to_string();
                self.orders.clear();
                self.notices.error(message.clone());
                self.error = Some(message);
                Err(err)
            }
        }
    }
}

/// Fill in each line's product snapshot from the cache, fetching misses.
///
/// Lines whose product cannot be loaded keep `product: None` and display a
/// placeholder.
pub async fn enrich<G: CatalogGateway>(gateway: &G, cache: &ProductCache, orders: &mut [Order]) {
    let lookups = orders
        .iter_mut()
        .flat_map(|order| order.lines.iter_mut())
        .filter(|line| line.product.is_none())
        .map(|line| async move {
            line.product = cache.get_or_fetch(gateway, &line.product_id).await;
        });
    join_all(lookups).await;
}
