//! Product snapshot cache.
//!
//! Maps product ids to the name and price shown next to order lines. Entries
//! are loaded on first use through a [`CatalogGateway`] and kept for the
//! lifetime of the cache: no TTL, no capacity bound, no invalidation. Scope
//! it to whatever should share lookups (a session, a command run).

use generix_core::{ProductId, ProductSnapshot};
use moka::future::Cache;
use tracing::{debug, instrument, warn};

use crate::api::CatalogGateway;

/// Lazily populated product id → snapshot map.
///
/// Clones share the same entries.
#[derive(Clone)]
pub struct ProductCache {
    entries: Cache<ProductId, ProductSnapshot>,
}

impl Default for ProductCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProductCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl ProductCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Cache::builder().build(),
        }
    }

    /// Cached snapshot for `id`, fetching it on a miss.
    ///
    /// Concurrent misses for the same id share one request. A failed fetch is
    /// logged, not cached, and reported as `None`.
    #[instrument(skip(self, gateway), fields(product_id = %id))]
    pub async fn get_or_fetch<G: CatalogGateway>(
        &self,
        gateway: &G,
        id: &ProductId,
    ) -> Option<ProductSnapshot> {
        if let Some(hit) = self.entries.get(id).await {
            debug!("Cache hit for product");
            return Some(hit);
        }

        let fetched = self
            .entries
            .try_get_with(id.clone(), async {
                gateway.product(id).await.map(|product| product.snapshot())
            })
            .await;

        match fetched {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                warn!(error = %err, "Failed to fetch product for cache");
                None
            }
        }
    }

    /// Cached snapshot for `id` without fetching.
    pub async fn get(&self, id: &ProductId) -> Option<ProductSnapshot> {
        self.entries.get(id).await
    }

    /// Seed or overwrite an entry, e.g. from a product list already in hand.
    pub async fn insert(&self, snapshot: ProductSnapshot) {
        self.entries.insert(snapshot.id.clone(), snapshot).await;
    }

    /// Number of cached snapshots.
    pub async fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}
