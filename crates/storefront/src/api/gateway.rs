//! Seams between the view-models and the remote API.
//!
//! [`HttpGateway`](super::HttpGateway) implements every trait here; tests
//! substitute scripted fakes.

use std::future::Future;

use generix_core::{
    Cart, Order, Price, Product, ProductDraft, ProductId, Quantity, Registration, User, UserId,
};

use crate::error::Result;

/// What the server said after a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckoutReceipt {
    pub message: Option<String>,
}

/// Cart endpoints.
pub trait CartGateway: Send + Sync {
    fn get_cart(&self) -> impl Future<Output = Result<Cart>> + Send;

    fn add_to_cart(
        &self,
        product_id: &ProductId,
        quantity: Quantity,
        unit_price: Price,
    ) -> impl Future<Output = Result<()>> + Send;

    fn update_quantity(
        &self,
        product_id: &ProductId,
        new_quantity: Quantity,
    ) -> impl Future<Output = Result<()>> + Send;

    fn remove_item(&self, product_id: &ProductId) -> impl Future<Output = Result<()>> + Send;

    fn clear_cart(&self) -> impl Future<Output = Result<()>> + Send;

    fn checkout(&self) -> impl Future<Output = Result<CheckoutReceipt>> + Send;
}

/// Product endpoints.
pub trait CatalogGateway: Send + Sync {
    fn active_products(&self) -> impl Future<Output = Result<Vec<Product>>> + Send;

    fn all_products(&self) -> impl Future<Output = Result<Vec<Product>>> + Send;

    fn product(&self, id: &ProductId) -> impl Future<Output = Result<Product>> + Send;

    fn create_product(&self, draft: &ProductDraft) -> impl Future<Output = Result<()>> + Send;

    fn update_product(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> impl Future<Output = Result<()>> + Send;

    fn archive_product(&self, id: &ProductId) -> impl Future<Output = Result<()>> + Send;

    fn activate_product(&self, id: &ProductId) -> impl Future<Output = Result<()>> + Send;
}

/// Order endpoints.
pub trait OrderGateway: Send + Sync {
    fn my_orders(&self) -> impl Future<Output = Result<Vec<Order>>> + Send;

    fn all_orders(&self) -> impl Future<Output = Result<Vec<Order>>> + Send;
}

/// User endpoints.
pub trait AccountGateway: Send + Sync {
    /// Exchange credentials for an access token.
    fn login(&self, email: &str, password: &str) -> impl Future<Output = Result<String>> + Send;

    fn details(&self) -> impl Future<Output = Result<User>> + Send;

    /// Returns the server's confirmation message, if any.
    fn register(
        &self,
        registration: &Registration,
    ) -> impl Future<Output = Result<Option<String>>> + Send;

    fn set_as_admin(&self, user_id: &UserId) -> impl Future<Output = Result<User>> + Send;
}
