//! Administrator view-model: product management and store-wide orders.

use generix_core::{Availability, Order, Product, ProductDraft, ProductId, User, UserId};
use tracing::{instrument, warn};

use crate::api::{AccountGateway, CatalogGateway, OrderGateway};
use crate::cache::ProductCache;
use crate::error::{ClientError, Result, add_breadcrumb, failure_breadcrumb};
use crate::notice::{Notice, Notices};
use crate::views::orders::enrich;

const BREADCRUMB: &str = "admin";

/// Product table and order listing for administrators.
pub struct AdminViewModel<G> {
    gateway: G,
    cache: ProductCache,
    products: Vec<Product>,
    notices: Notices,
}

impl<G> AdminViewModel<G>
where
    G: CatalogGateway + OrderGateway + AccountGateway,
{
    pub fn new(gateway: G, cache: ProductCache) -> Self {
        Self {
            gateway,
            cache,
            products: Vec::new(),
            notices: Notices::new(),
        }
    }

    /// Every product, archived included, in server order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub const fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Fetch all products.
    ///
    /// # Errors
    ///
    /// Returns the gateway error; the current list is kept.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<()> {
        match self.gateway.all_products().await {
            Ok(products) => {
                self.products = products;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Failed to fetch products");
                failure_breadcrumb(BREADCRUMB, "list products", &err);
                self.notices.error("Failed to fetch products!");
                Err(err)
            }
        }
    }

    /// Create a product, then refetch the list.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` for an invalid draft (no request is
    /// made) or the gateway error.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn add_product(&mut self, draft: &ProductDraft) -> Result<()> {
        self.validate(draft)?;
        if let Err(err) = self.gateway.create_product(draft).await {
            return Err(self.failed("create product", "Failed to add product", err));
        }
        add_breadcrumb(BREADCRUMB, "Added product", Some(&[("name", draft.name.as_str())]));
        self.notices.success("Product added successfully!");
        self.load().await
    }

    /// Update a product, then refetch the list.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` for an invalid draft (no request is
    /// made) or the gateway error.
    #[instrument(skip(self, draft), fields(product_id = %id))]
    pub async fn update_product(&mut self, id: &ProductId, draft: &ProductDraft) -> Result<()> {
        self.validate(draft)?;
        if let Err(err) = self.gateway.update_product(id, draft).await {
            return Err(self.failed("update product", "Failed to update product", err));
        }
        add_breadcrumb(BREADCRUMB, "Updated product", Some(&[("product_id", id.as_str())]));
        self.notices.success("Product updated successfully!");
        self.load().await
    }

    /// Flip a product between active and archived.
    ///
    /// The flip is shown immediately; if the server rejects it the flip is
    /// undone. Returns the new availability.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` if the product is not in the loaded
    /// list, or the gateway error.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn toggle_availability(&mut self, id: &ProductId) -> Result<Availability> {
        let target = {
            let product = self
                .products
                .iter_mut()
                .find(|p| &p.id == id)
                .ok_or_else(|| ClientError::Validation(format!("product {id} is not loaded")))?;
            product.availability = product.availability.toggled();
            product.availability
        };

        let sent = match target {
            Availability::Active => self.gateway.activate_product(id).await,
            Availability::Archived => self.gateway.archive_product(id).await,
        };

        if let Err(err) = sent {
            if let Some(product) = self.products.iter_mut().find(|p| &p.id == id) {
                product.availability = target.toggled();
            }
            return Err(self.failed(
                "toggle availability",
                "Failed to update product availability",
                err,
            ));
        }

        add_breadcrumb(
            BREADCRUMB,
            "Toggled availability",
            Some(&[("product_id", id.as_str()), ("availability", target.label())]),
        );
        self.notices.success(if target.is_active() {
            "Product activated successfully!"
        } else {
            "Product disabled successfully!"
        });
        self.load().await?;
        Ok(target)
    }

    /// Every order in the store, with product names resolved.
    ///
    /// # Errors
    ///
    /// Returns the gateway error.
    #[instrument(skip(self))]
    pub async fn all_orders(&mut self) -> Result<Vec<Order>> {
        match self.gateway.all_orders().await {
            Ok(mut orders) => {
                enrich(&self.gateway, &self.cache, &mut orders).await;
                Ok(orders)
            }
            Err(err) => Err(self.failed("all orders", "Failed to fetch orders!", err)),
        }
    }

    /// Grant administrator rights to a user.
    ///
    /// # Errors
    ///
    /// Returns the gateway error; the notice carries the server's message
    /// when there is one.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn promote(&mut self, user_id: &UserId) -> Result<User> {
        match self.gateway.set_as_admin(user_id).await {
            Ok(user) => {
                add_breadcrumb(BREADCRUMB, "Promoted user", Some(&[("user_id", user_id.as_str())]));
                self.notices
                    .success(format!("User {} is now an Admin.", user.first_name));
                Ok(user)
            }
            Err(err) => {
                let message = err
                    .server_message()
                    .unwrap_or("Failed to set user as admin")
                    .to_string();
                Err(self.failed("set as admin", &message, err))
            }
        }
    }

    fn validate(&mut self, draft: &ProductDraft) -> Result<()> {
        draft.validate().map_err(|err| {
            self.notices.error(err.to_string());
            ClientError::from(err)
        })
    }

    fn failed(&mut self, operation: &str, notice: &str, err: ClientError) -> ClientError {
        warn!(error = %err, operation, "Admin operation failed");
        failure_breadcrumb(BREADCRUMB, operation, &err);
        self.notices.error(notice);
        err
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::{FakeShop, order, product, user};

    fn shop() -> FakeShop {
        FakeShop::new().with_products(vec![
            product("p1", "Paracetamol", 5, true),
            product("p2", "Loperamide", 9, false),
        ])
    }

    fn draft(name: &str, price: i64) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            description: "Tablet".to_string(),
            price: Decimal::from(price),
        }
    }

    fn messages(vm: &mut AdminViewModel<FakeShop>) -> Vec<String> {
        vm.drain_notices().into_iter().map(|n| n.message).collect()
    }

    #[tokio::test]
    async fn test_add_and_update_refetch() {
        let shop = shop();
        let mut vm = AdminViewModel::new(shop.clone(), ProductCache::new());
        vm.load().await.unwrap();

        vm.add_product(&draft("Cetirizine", 15)).await.unwrap();
        assert_eq!(vm.products().len(), 3);

        let id = vm.products()[2].id.clone();
        vm.update_product(&id, &draft("Cetirizine 10mg", 16)).await.unwrap();
        assert_eq!(vm.products()[2].name, "Cetirizine 10mg");
        assert_eq!(
            messages(&mut vm),
            ["Product added successfully!", "Product updated successfully!"]
        );
    }

    #[tokio::test]
    async fn test_invalid_draft_makes_no_call() {
        let shop = shop();
        let mut vm = AdminViewModel::new(shop.clone(), ProductCache::new());
        let err = vm.add_product(&draft("", 15)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailure);
        assert_eq!(shop.call_count("create_product"), 0);
        assert_eq!(messages(&mut vm), ["product name is required"]);
    }

    #[tokio::test]
    async fn test_toggle_archives_and_activates() {
        let shop = shop();
        let mut vm = AdminViewModel::new(shop.clone(), ProductCache::new());
        vm.load().await.unwrap();

        let now = vm.toggle_availability(&ProductId::new("p1")).await.unwrap();
        assert_eq!(now, Availability::Archived);
        assert!(!shop.server_products()[0].is_active());

        let now = vm.toggle_availability(&ProductId::new("p2")).await.unwrap();
        assert_eq!(now, Availability::Active);
        assert_eq!(
            messages(&mut vm),
            ["Product disabled successfully!", "Product activated successfully!"]
        );
        assert_eq!(shop.call_count("archive_product"), 1);
        assert_eq!(shop.call_count("activate_product"), 1);
    }

    #[tokio::test]
    async fn test_toggle_failure_reverts() {
        let shop = shop();
        let mut vm = AdminViewModel::new(shop.clone(), ProductCache::new());
        vm.load().await.unwrap();
        shop.fail("archive_product");

        assert!(vm.toggle_availability(&ProductId::new("p1")).await.is_err());
        assert!(vm.products()[0].is_active());
        assert_eq!(messages(&mut vm), ["Failed to update product availability"]);
        assert_eq!(shop.call_count("all_products"), 1);
    }

    #[tokio::test]
    async fn test_all_orders_and_failure() {
        let shop = shop().with_orders(vec![order("o1", 3, &[("p1", 2, 10)])]);
        let mut vm = AdminViewModel::new(shop.clone(), ProductCache::new());

        let orders = vm.all_orders().await.unwrap();
        assert_eq!(orders[0].lines[0].display_name(), "Paracetamol");

        shop.fail("all_orders");
        assert!(vm.all_orders().await.is_err());
        assert_eq!(messages(&mut vm), ["Failed to fetch orders!"]);
    }

    #[tokio::test]
    async fn test_promote() {
        let shop = shop().with_users(vec![user("u7", "Andres", false)]);
        let mut vm = AdminViewModel::new(shop.clone(), ProductCache::new());

        let promoted = vm.promote(&UserId::new("u7")).await.unwrap();
        assert!(promoted.is_admin);
        assert_eq!(messages(&mut vm), ["User Andres is now an Admin."]);

        shop.fail_with("set_as_admin", "User not found");
        assert!(vm.promote(&UserId::new("u8")).await.is_err());
        assert_eq!(messages(&mut vm), ["User not found"]);
    }
}
