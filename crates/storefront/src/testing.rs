//! In-memory gateway for unit tests.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use generix_core::{
    Availability, Cart, CartItem, CartItemId, CurrencyCode, Order, OrderId, OrderLine, Price,
    Product, ProductDraft, ProductId, ProductRef, Quantity, Registration, User, UserId,
};
use rust_decimal::Decimal;

use crate::api::{AccountGateway, CartGateway, CatalogGateway, CheckoutReceipt, OrderGateway};
use crate::error::{ClientError, Result};

pub fn php(amount: i64) -> Price {
    Price::new(Decimal::from(amount), CurrencyCode::PHP)
}

pub fn product(id: &str, name: &str, price: i64, active: bool) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: format!("{name} description"),
        price: php(price),
        availability: Availability::from_active(active),
        created_on: None,
    }
}

pub fn line(product_id: &str, unit: i64, quantity: u32) -> CartItem {
    CartItem::new(
        CartItemId::new(format!("line-{product_id}")),
        ProductRef::new(ProductId::new(product_id), format!("Product {product_id}")),
        php(unit),
        Quantity::new(quantity).unwrap(),
    )
}

pub fn order(id: &str, day: u32, lines: &[(&str, u32, i64)]) -> Order {
    let lines: Vec<OrderLine> = lines
        .iter()
        .map(|(product_id, quantity, subtotal)| OrderLine {
            product_id: ProductId::new(*product_id),
            quantity: Quantity::new(*quantity).unwrap(),
            subtotal: php(*subtotal),
            product: None,
        })
        .collect();
    let total = lines
        .iter()
        .fold(php(0), |acc, line| acc.plus(line.subtotal));
    Order {
        id: OrderId::new(id),
        user_id: Some(UserId::new("u1")),
        lines,
        total_price: total,
        ordered_on: Some(Utc.with_ymd_and_hms(2025, 5, day, 12, 0, 0).unwrap()),
        status: Some("Pending".to_string()),
    }
}

pub fn user(id: &str, first_name: &str, is_admin: bool) -> User {
    User {
        id: UserId::new(id),
        first_name: first_name.to_string(),
        last_name: "Cruz".to_string(),
        email: format!("{}@example.ph", first_name.to_lowercase()),
        mobile_no: Some("09171234567".to_string()),
        is_admin,
    }
}

#[derive(Default)]
struct ShopState {
    cart: Cart,
    products: Vec<Product>,
    orders: Vec<Order>,
    users: Vec<User>,
    calls: Vec<&'static str>,
    /// Operation name → server message returned on failure.
    failing: HashMap<&'static str, Option<String>>,
}

/// Scripted fake of the remote API.
///
/// Behaves like the real server for the happy path; any operation can be
/// switched to fail with [`FakeShop::fail`].
#[derive(Clone, Default)]
pub struct FakeShop {
    state: Arc<Mutex<ShopState>>,
}

impl FakeShop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cart(self, items: Vec<CartItem>) -> Self {
        self.state.lock().unwrap().cart = Cart::new(items, CurrencyCode::PHP);
        self
    }

    pub fn with_products(self, products: Vec<Product>) -> Self {
        self.state.lock().unwrap().products = products;
        self
    }

    pub fn with_orders(self, orders: Vec<Order>) -> Self {
        self.state.lock().unwrap().orders = orders;
        self
    }

    pub fn with_users(self, users: Vec<User>) -> Self {
        self.state.lock().unwrap().users = users;
        self
    }

    pub fn fail(&self, operation: &'static str) {
        self.state.lock().unwrap().failing.insert(operation, None);
    }

    pub fn fail_with(&self, operation: &'static str, message: &str) {
        self.state
            .lock()
            .unwrap()
            .failing
            .insert(operation, Some(message.to_string()));
    }

    pub fn recover(&self, operation: &'static str) {
        self.state.lock().unwrap().failing.remove(operation);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| **c == operation)
            .count()
    }

    pub fn server_cart(&self) -> Cart {
        self.state.lock().unwrap().cart.clone()
    }

    pub fn server_products(&self) -> Vec<Product> {
        self.state.lock().unwrap().products.clone()
    }

    /// Mutate server state directly, e.g. to simulate another client.
    pub fn edit_cart(&self, f: impl FnOnce(&mut Cart)) {
        f(&mut self.state.lock().unwrap().cart);
    }

    /// Record a call and run `f` against the state unless the call is set
    /// to fail.
    fn call<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut ShopState) -> Result<T>,
    ) -> Result<T> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(operation);
        if let Some(message) = state.failing.get(operation) {
            return Err(ClientError::Api {
                status: 500,
                message: message.clone(),
            });
        }
        f(&mut state)
    }
}

fn find_product<'a>(state: &'a mut ShopState, id: &ProductId) -> Result<&'a mut Product> {
    state
        .products
        .iter_mut()
        .find(|p| &p.id == id)
        .ok_or_else(|| ClientError::NotFound(Some(format!("product {id} not found"))))
}

impl CartGateway for FakeShop {
    async fn get_cart(&self) -> Result<Cart> {
        self.call("get_cart", |s| Ok(s.cart.clone()))
    }

    async fn add_to_cart(
        &self,
        product_id: &ProductId,
        quantity: Quantity,
        unit_price: Price,
    ) -> Result<()> {
        self.call("add_to_cart", |s| {
            let delta = i64::from(quantity.get());
            if s.cart.change_quantity(product_id, delta).is_err() {
                let name = s
                    .products
                    .iter()
                    .find(|p| &p.id == product_id)
                    .map(|p| p.name.clone());
                let mut items = s.cart.items().to_vec();
                items.push(CartItem::new(
                    CartItemId::new(format!("line-{product_id}")),
                    ProductRef {
                        id: product_id.clone(),
                        name,
                    },
                    unit_price,
                    quantity,
                ));
                s.cart = Cart::new(items, s.cart.currency());
            }
            Ok(())
        })
    }

    async fn update_quantity(&self, product_id: &ProductId, new_quantity: Quantity) -> Result<()> {
        self.call("update_quantity", |s| {
            s.cart.set_quantity(product_id, new_quantity)?;
            Ok(())
        })
    }

    async fn remove_item(&self, product_id: &ProductId) -> Result<()> {
        self.call("remove_item", |s| {
            s.cart.remove(product_id)?;
            Ok(())
        })
    }

    async fn clear_cart(&self) -> Result<()> {
        self.call("clear_cart", |s| {
            s.cart.clear();
            Ok(())
        })
    }

    async fn checkout(&self) -> Result<CheckoutReceipt> {
        self.call("checkout", |s| {
            if s.cart.is_empty() {
                return Err(ClientError::Api {
                    status: 400,
                    message: Some("Cart is empty".to_string()),
                });
            }
            let lines = s
                .cart
                .items()
                .iter()
                .map(|item| OrderLine {
                    product_id: item.product().id.clone(),
                    quantity: item.quantity(),
                    subtotal: item.subtotal(),
                    product: None,
                })
                .collect();
            let id = OrderId::new(format!("order-{}", s.orders.len() + 1));
            s.orders.push(Order {
                id,
                user_id: None,
                lines,
                total_price: s.cart.total_price(),
                ordered_on: Some(Utc::now()),
                status: Some("Pending".to_string()),
            });
            s.cart.clear();
            Ok(CheckoutReceipt {
                message: Some("Ordered Successfully".to_string()),
            })
        })
    }
}

impl CatalogGateway for FakeShop {
    async fn active_products(&self) -> Result<Vec<Product>> {
        self.call("active_products", |s| {
            Ok(s.products.iter().filter(|p| p.is_active()).cloned().collect())
        })
    }

    async fn all_products(&self) -> Result<Vec<Product>> {
        self.call("all_products", |s| Ok(s.products.clone()))
    }

    async fn product(&self, id: &ProductId) -> Result<Product> {
        self.call("product", |s| find_product(s, id).map(|p| p.clone()))
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<()> {
        self.call("create_product", |s| {
            let id = ProductId::new(format!("p{}", s.products.len() + 1));
            s.products.push(Product {
                id,
                name: draft.name.clone(),
                description: draft.description.clone(),
                price: Price::new(draft.price, CurrencyCode::PHP),
                availability: Availability::Active,
                created_on: Some(Utc::now()),
            });
            Ok(())
        })
    }

    async fn update_product(&self, id: &ProductId, draft: &ProductDraft) -> Result<()> {
        self.call("update_product", |s| {
            let product = find_product(s, id)?;
            product.name.clone_from(&draft.name);
            product.description.clone_from(&draft.description);
            product.price = Price::new(draft.price, CurrencyCode::PHP);
            Ok(())
        })
    }

    async fn archive_product(&self, id: &ProductId) -> Result<()> {
        self.call("archive_product", |s| {
            find_product(s, id)?.availability = Availability::Archived;
            Ok(())
        })
    }

    async fn activate_product(&self, id: &ProductId) -> Result<()> {
        self.call("activate_product", |s| {
            find_product(s, id)?.availability = Availability::Active;
            Ok(())
        })
    }
}

impl OrderGateway for FakeShop {
    async fn my_orders(&self) -> Result<Vec<Order>> {
        self.call("my_orders", |s| Ok(s.orders.clone()))
    }

    async fn all_orders(&self) -> Result<Vec<Order>> {
        self.call("all_orders", |s| Ok(s.orders.clone()))
    }
}

impl AccountGateway for FakeShop {
    async fn login(&self, email: &str, _password: &str) -> Result<String> {
        self.call("login", |s| {
            if s.users.iter().any(|u| u.email == email) {
                Ok(format!("token-for-{email}"))
            } else {
                Err(ClientError::Unauthorized(Some("No Email Found".to_string())))
            }
        })
    }

    async fn details(&self) -> Result<User> {
        self.call("details", |s| {
            s.users
                .first()
                .cloned()
                .ok_or(ClientError::Unauthorized(None))
        })
    }

    async fn register(&self, registration: &Registration) -> Result<Option<String>> {
        self.call("register", |s| {
            let email = registration.validate()?;
            let id = UserId::new(format!("u{}", s.users.len() + 1));
            s.users.push(User {
                id,
                first_name: registration.first_name.clone(),
                last_name: registration.last_name.clone(),
                email: email.to_string(),
                mobile_no: Some(registration.mobile_no.clone()),
                is_admin: false,
            });
            Ok(Some("Registered Successfully".to_string()))
        })
    }

    async fn set_as_admin(&self, user_id: &UserId) -> Result<User> {
        self.call("set_as_admin", |s| {
            let user = s
                .users
                .iter_mut()
                .find(|u| &u.id == user_id)
                .ok_or_else(|| ClientError::NotFound(Some("User not found".to_string())))?;
            user.is_admin = true;
            Ok(user.clone())
        })
    }
}
