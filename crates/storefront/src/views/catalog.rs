//! Catalog view-model: a fetched product list with local search and sort.

use generix_core::{Product, ProductId, ProductQuery};
use tracing::{instrument, warn};

use crate::api::CatalogGateway;
use crate::cache::ProductCache;
use crate::error::{Result, failure_breadcrumb};
use crate::notice::{Notice, Notices};

const BREADCRUMB: &str = "catalog";

/// Which product listing to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Listing {
    /// Products currently for sale.
    #[default]
    Active,
    /// Every product, archived included.
    All,
}

/// Product list for shoppers.
pub struct CatalogViewModel<G> {
    gateway: G,
    cache: ProductCache,
    products: Vec<Product>,
    notices: Notices,
}

impl<G: CatalogGateway> CatalogViewModel<G> {
    pub fn new(gateway: G, cache: ProductCache) -> Self {
        Self {
            gateway,
            cache,
            products: Vec::new(),
            notices: Notices::new(),
        }
    }

    /// Products in server order, unfiltered.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Fetch active products.
    ///
    /// # Errors
    ///
    /// Returns the gateway error; the list is left empty.
    pub async fn load_active(&mut self) -> Result<()> {
        self.load(Listing::Active).await
    }

    /// Fetch every product, archived included.
    ///
    /// # Errors
    ///
    /// Returns the gateway error; the list is left empty.
    pub async fn load_all(&mut self) -> Result<()> {
        self.load(Listing::All).await
    }

    /// Fetch a listing, replacing the current list. Fetched products also
    /// seed the product cache.
    ///
    /// # Errors
    ///
    /// Returns the gateway error; the list is left empty.
    #[instrument(skip(self))]
    pub async fn load(&mut self, listing: Listing) -> Result<()> {
        let fetched = match listing {
            Listing::Active => self.gateway.active_products().await,
            Listing::All => self.gateway.all_products().await,
        };

        match fetched {
            Ok(products) => {
                for product in &products {
                    self.cache.insert(product.snapshot()).await;
                }
                self.products = products;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Failed to fetch products");
                failure_breadcrumb(BREADCRUMB, "list products", &err);
                self.products.clear();
                self.notices.error("Failed to fetch products!");
                Err(err)
            }
        }
    }

    /// Products passing `query`, in the query's sort order.
    pub fn visible(&self, query: &ProductQuery) -> Vec<&Product> {
        query.apply(&self.products)
    }

    /// A single product, from the list if present, otherwise the server.
    ///
    /// # Errors
    ///
    /// Returns the gateway error when the product has to be fetched and the
    /// fetch fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<Product> {
        if let Some(product) = self.products.iter().find(|p| &p.id == id) {
            return Ok(product.clone());
        }
        let product = self.gateway.product(id).await?;
        self.cache.insert(product.snapshot()).await;
        Ok(product)
    }
}
