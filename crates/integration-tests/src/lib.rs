//! Fake Generix shop API for end-to-end tests.
//!
//! [`FakeApi::start`] serves an in-memory imitation of the remote API on an
//! ephemeral port, nested under `/api` so base-path handling is exercised.
//! Tests point a real [`HttpGateway`](generix_storefront::HttpGateway) at
//! it, seed data, and inject failures per operation.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p generix-integration-tests
//! ```
//!
//! # Behavior
//!
//! - Every route except login, register, and the product reads requires
//!   `Authorization: Bearer <token>`; tokens come from `POST /users/login`.
//! - Admin routes answer 403 for non-admin users.
//! - Prices are JSON numbers; the cart line's subtotal is recomputed from
//!   the product's current price on every write.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use chrono::{DateTime, Duration, Utc};
use generix_storefront::{ApiConfig, AppState, StorefrontConfig};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// How `GET /cart/get-cart` lays out its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CartShape {
    /// `{ cartItems: [...], totalPrice }` with populated product references.
    #[default]
    CartItems,
    /// `{ items: [...], totalPrice }` with bare product ids and unit prices
    /// left out.
    Items,
    /// A bare array of lines.
    BareArray,
}

#[derive(Debug, Clone)]
struct FakeProduct {
    id: String,
    name: String,
    description: String,
    price: Decimal,
    is_active: bool,
    created_on: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct FakeUser {
    id: String,
    first_name: String,
    last_name: String,
    email: String,
    mobile_no: String,
    password: String,
    is_admin: bool,
}

#[derive(Debug, Clone)]
struct FakeLine {
    id: String,
    product_id: String,
    quantity: u32,
    subtotal: Decimal,
}

#[derive(Debug, Clone)]
struct FakeOrder {
    id: String,
    user_id: String,
    lines: Vec<FakeLine>,
    total: Decimal,
    ordered_on: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct ApiState {
    products: Vec<FakeProduct>,
    users: Vec<FakeUser>,
    tokens: HashMap<String, String>,
    carts: HashMap<String, Vec<FakeLine>>,
    orders: Vec<FakeOrder>,
    failures: HashMap<&'static str, (StatusCode, Value)>,
    cart_shape: CartShape,
    requests: Vec<&'static str>,
}

type Shared = Arc<Mutex<ApiState>>;

fn lock(shared: &Shared) -> MutexGuard<'_, ApiState> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

fn reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn message(status: StatusCode, text: &str) -> Response {
    reply(status, json!({ "message": text }))
}

fn number(amount: Decimal) -> Value {
    json!(amount.to_f64().unwrap_or_default())
}

impl ApiState {
    /// Record the call and return the injected failure, if any.
    fn intercept(&mut self, operation: &'static str) -> Option<Response> {
        self.requests.push(operation);
        self.failures
            .get(operation)
            .map(|(status, body)| reply(*status, body.clone()))
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<String, Response> {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .and_then(|token| self.tokens.get(token))
            .cloned()
            .ok_or_else(|| message(StatusCode::UNAUTHORIZED, "Unauthorized"))
    }

    fn authorize_admin(&self, headers: &HeaderMap) -> Result<String, Response> {
        let user_id = self.authorize(headers)?;
        if self.users.iter().any(|u| u.id == user_id && u.is_admin) {
            Ok(user_id)
        } else {
            Err(reply(
                StatusCode::FORBIDDEN,
                json!({ "auth": "Failed", "message": "Action Forbidden" }),
            ))
        }
    }

    fn product(&self, id: &str) -> Option<&FakeProduct> {
        self.products.iter().find(|p| p.id == id)
    }

    fn product_json(product: &FakeProduct) -> Value {
        json!({
            "_id": product.id,
            "name": product.name,
            "description": product.description,
            "price": number(product.price),
            "isActive": product.is_active,
            "createdOn": product.created_on.to_rfc3339(),
        })
    }

    fn user_json(user: &FakeUser) -> Value {
        json!({
            "_id": user.id,
            "firstName": user.first_name,
            "lastName": user.last_name,
            "email": user.email,
            "mobileNo": user.mobile_no,
            "isAdmin": user.is_admin,
        })
    }

    fn line_json(&self, line: &FakeLine, shape: CartShape) -> Value {
        let product_ref = match (shape, self.product(&line.product_id)) {
            (CartShape::Items, _) | (_, None) => json!(line.product_id),
            (_, Some(product)) => json!({ "_id": product.id, "name": product.name }),
        };
        json!({
            "_id": line.id,
            "productId": product_ref,
            "quantity": line.quantity,
            "subtotal": number(line.subtotal),
        })
    }

    fn order_json(&self, order: &FakeOrder) -> Value {
        let lines: Vec<Value> = order
            .lines
            .iter()
            .map(|line| {
                json!({
                    "productId": line.product_id,
                    "quantity": line.quantity,
                    "subtotal": number(line.subtotal),
                })
            })
            .collect();
        json!({
            "_id": order.id,
            "userId": order.user_id,
            "productsOrdered": lines,
            "totalPrice": number(order.total),
            "orderedOn": order.ordered_on.to_rfc3339(),
            "status": "Pending",
        })
    }

    fn reprice(&self, line: &mut FakeLine) {
        let unit = self.product(&line.product_id).map_or(Decimal::ZERO, |p| p.price);
        line.subtotal = unit * Decimal::from(line.quantity);
    }
}

/// An in-memory Generix shop API served over HTTP.
pub struct FakeApi {
    addr: SocketAddr,
    state: Shared,
    server: JoinHandle<()>,
}

impl FakeApi {
    /// Bind an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    #[allow(clippy::unwrap_used)]
    pub async fn start() -> Self {
        let state = Shared::default();
        let app = Router::new()
            .nest("/api", routes())
            .layer(TraceLayer::new_for_http())
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Fake API stopped");
            }
        });
        tracing::debug!(%addr, "Fake API listening");

        Self {
            addr,
            state,
            server,
        }
    }

    /// Base URL including the `/api` prefix, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Client configuration pointing at this server.
    ///
    /// # Panics
    ///
    /// Panics if the base URL does not parse, which cannot happen for a
    /// bound socket address.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn config(&self) -> ApiConfig {
        ApiConfig::new(&self.base_url()).unwrap()
    }

    /// Client state pointing at this server, signed in when a token is
    /// given.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn client(&self, token: Option<&str>) -> AppState {
        let api = match token {
            Some(token) => self.config().with_token(token),
            None => self.config(),
        };
        AppState::new(StorefrontConfig::for_api(api)).unwrap()
    }

    /// Add a product and return its id. Later products are newer.
    pub fn seed_product(&self, name: &str, price: i64, is_active: bool) -> String {
        let mut api = lock(&self.state);
        let offset = i64::try_from(api.products.len()).unwrap_or(0);
        let created_on = Utc::now() + Duration::seconds(offset);
        let id = Uuid::new_v4().simple().to_string();
        api.products.push(FakeProduct {
            id: id.clone(),
            name: name.to_string(),
            description: format!("{name} tablet"),
            price: Decimal::from(price),
            is_active,
            created_on,
        });
        id
    }

    /// Add a user with the given password and return its id. The email is
    /// `<first name in lower case>@example.ph`.
    pub fn seed_user(&self, first_name: &str, password: &str, is_admin: bool) -> String {
        let id = Uuid::new_v4().simple().to_string();
        lock(&self.state).users.push(FakeUser {
            id: id.clone(),
            first_name: first_name.to_string(),
            last_name: "Dela Cruz".to_string(),
            email: format!("{}@example.ph", first_name.to_lowercase()),
            mobile_no: "09171234567".to_string(),
            password: password.to_string(),
            is_admin,
        });
        id
    }

    /// Issue a token for a seeded user without going through login.
    pub fn token_for(&self, user_id: &str) -> String {
        let token = Uuid::new_v4().to_string();
        lock(&self.state)
            .tokens
            .insert(token.clone(), user_id.to_string());
        token
    }

    /// Make every call to `operation` answer with `status` and `body` until
    /// [`recover`](Self::recover) is called.
    pub fn fail(&self, operation: &'static str, status: u16, body: Value) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        lock(&self.state).failures.insert(operation, (status, body));
    }

    pub fn recover(&self, operation: &'static str) {
        lock(&self.state).failures.remove(operation);
    }

    pub fn set_cart_shape(&self, shape: CartShape) {
        lock(&self.state).cart_shape = shape;
    }

    /// Operations received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<&'static str> {
        lock(&self.state).requests.clone()
    }

    #[must_use]
    pub fn request_count(&self, operation: &str) -> usize {
        lock(&self.state)
            .requests
            .iter()
            .filter(|r| **r == operation)
            .count()
    }

    /// The server's cart for a user as `(product id, quantity)` pairs.
    #[must_use]
    pub fn cart_of(&self, user_id: &str) -> Vec<(String, u32)> {
        lock(&self.state)
            .carts
            .get(user_id)
            .map(|lines| {
                lines
                    .iter()
                    .map(|l| (l.product_id.clone(), l.quantity))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether a product is currently active.
    #[must_use]
    pub fn is_active(&self, product_id: &str) -> Option<bool> {
        lock(&self.state).product(product_id).map(|p| p.is_active)
    }

    #[must_use]
    pub fn order_count(&self) -> usize {
        lock(&self.state).orders.len()
    }

    /// Remove a product, leaving any order lines that reference it dangling.
    pub fn delete_product(&self, product_id: &str) {
        lock(&self.state).products.retain(|p| p.id != product_id);
    }
}

impl Drop for FakeApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn routes() -> Router<Shared> {
    Router::new()
        .route("/cart/get-cart", get(get_cart))
        .route("/cart/add-to-cart", post(add_to_cart))
        .route("/cart/update-cart-quantity", patch(update_quantity))
        .route("/cart/{product_id}/remove-from-cart", patch(remove_item))
        .route("/cart/clear-cart", put(clear_cart))
        .route("/orders/checkout", post(checkout))
        .route("/orders/my-orders", get(my_orders))
        .route("/orders/all-orders", get(all_orders))
        .route("/products", post(create_product))
        .route("/products/active", get(active_products))
        .route("/products/all", get(all_products))
        .route("/products/{id}", get(product))
        .route("/products/{id}/update", patch(update_product))
        .route("/products/{id}/archive", patch(archive_product))
        .route("/products/{id}/activate", patch(activate_product))
        .route("/users/login", post(login))
        .route("/users/register", post(register))
        .route("/users/details", get(details))
        .route("/users/{id}/set-as-admin", patch(set_as_admin))
}

// =============================================================================
// Cart
// =============================================================================

async fn get_cart(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    let mut api = lock(&shared);
    if let Some(failure) = api.intercept("get_cart") {
        return failure;
    }
    let user_id = match api.authorize(&headers) {
        Ok(id) => id,
        Err(denied) => return denied,
    };

    let Some(lines) = api.carts.get(&user_id) else {
        return message(StatusCode::OK, "Cart is empty");
    };
    let shape = api.cart_shape;
    let items: Vec<Value> = lines.iter().map(|l| api.line_json(l, shape)).collect();
    let total: Decimal = lines.iter().map(|l| l.subtotal).sum();

    let body = match shape {
        CartShape::CartItems => json!({ "cartItems": items, "totalPrice": number(total) }),
        CartShape::Items => json!({ "items": items, "totalPrice": number(total) }),
        CartShape::BareArray => Value::Array(items),
    };
    reply(StatusCode::OK, body)
}

async fn add_to_cart(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut api = lock(&shared);
    if let Some(failure) = api.intercept("add_to_cart") {
        return failure;
    }
    let user_id = match api.authorize(&headers) {
        Ok(id) => id,
        Err(denied) => return denied,
    };

    let product_id = body["productId"].as_str().unwrap_or_default().to_string();
    let quantity = body["quantity"]
        .as_u64()
        .and_then(|q| u32::try_from(q).ok())
        .filter(|q| *q > 0);
    let Some(quantity) = quantity else {
        return message(StatusCode::BAD_REQUEST, "Quantity must be at least 1");
    };
    if !api.product(&product_id).is_some_and(|p| p.is_active) {
        return message(StatusCode::NOT_FOUND, "Product not found");
    }

    let mut lines = api.carts.remove(&user_id).unwrap_or_default();
    if let Some(line) = lines.iter_mut().find(|l| l.product_id == product_id) {
        line.quantity += quantity;
        api.reprice(line);
    } else {
        let mut line = FakeLine {
            id: Uuid::new_v4().simple().to_string(),
            product_id,
            quantity,
            subtotal: Decimal::ZERO,
        };
        api.reprice(&mut line);
        lines.push(line);
    }
    api.carts.insert(user_id, lines);
    message(StatusCode::CREATED, "Item added to cart successfully")
}

async fn update_quantity(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut api = lock(&shared);
    if let Some(failure) = api.intercept("update_quantity") {
        return failure;
    }
    let user_id = match api.authorize(&headers) {
        Ok(id) => id,
        Err(denied) => return denied,
    };

    let product_id = body["productId"].as_str().unwrap_or_default();
    let Some(quantity) = body["newQuantity"]
        .as_u64()
        .and_then(|q| u32::try_from(q).ok())
        .filter(|q| *q > 0)
    else {
        return message(StatusCode::BAD_REQUEST, "Quantity must be at least 1");
    };

    let mut lines = api.carts.remove(&user_id).unwrap_or_default();
    let found = lines.iter_mut().find(|l| l.product_id == product_id).map(|line| {
        line.quantity = quantity;
        api.reprice(line);
    });
    api.carts.insert(user_id, lines);

    if found.is_some() {
        message(StatusCode::OK, "Item quantity updated successfully")
    } else {
        message(StatusCode::NOT_FOUND, "Item not found in cart")
    }
}

async fn remove_item(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(product_id): Path<String>,
) -> Response {
    let mut api = lock(&shared);
    if let Some(failure) = api.intercept("remove_item") {
        return failure;
    }
    let user_id = match api.authorize(&headers) {
        Ok(id) => id,
        Err(denied) => return denied,
    };

    let lines = api.carts.entry(user_id).or_default();
    let before = lines.len();
    lines.retain(|l| l.product_id != product_id);
    if lines.len() == before {
        message(StatusCode::NOT_FOUND, "Item not found in cart")
    } else {
        message(StatusCode::OK, "Item removed from cart successfully")
    }
}

async fn clear_cart(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    let mut api = lock(&shared);
    if let Some(failure) = api.intercept("clear_cart") {
        return failure;
    }
    let user_id = match api.authorize(&headers) {
        Ok(id) => id,
        Err(denied) => return denied,
    };

    api.carts.insert(user_id, Vec::new());
    message(StatusCode::OK, "Cart cleared successfully")
}

// =============================================================================
// Orders
// =============================================================================

async fn checkout(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    let mut api = lock(&shared);
    if let Some(failure) = api.intercept("checkout") {
        return failure;
    }
    let user_id = match api.authorize(&headers) {
        Ok(id) => id,
        Err(denied) => return denied,
    };

    let lines = api.carts.remove(&user_id).unwrap_or_default();
    if lines.is_empty() {
        return message(StatusCode::BAD_REQUEST, "No items to checkout");
    }
    let total = lines.iter().map(|l| l.subtotal).sum();
    api.orders.push(FakeOrder {
        id: Uuid::new_v4().simple().to_string(),
        user_id,
        lines,
        total,
        ordered_on: Utc::now(),
    });
    message(StatusCode::CREATED, "Ordered Successfully")
}

async fn my_orders(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    let mut api = lock(&shared);
    if let Some(failure) = api.intercept("my_orders") {
        return failure;
    }
    let user_id = match api.authorize(&headers) {
        Ok(id) => id,
        Err(denied) => return denied,
    };

    let orders: Vec<Value> = api
        .orders
        .iter()
        .filter(|o| o.user_id == user_id)
        .map(|o| api.order_json(o))
        .collect();
    reply(StatusCode::OK, json!({ "Orders": orders }))
}

async fn all_orders(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    let mut api = lock(&shared);
    if let Some(failure) = api.intercept("all_orders") {
        return failure;
    }
    if let Err(denied) = api.authorize_admin(&headers) {
        return denied;
    }

    let orders: Vec<Value> = api.orders.iter().map(|o| api.order_json(o)).collect();
    reply(StatusCode::OK, json!({ "Orders": orders }))
}

// =============================================================================
// Products
// =============================================================================

async fn active_products(State(shared): State<Shared>) -> Response {
    let mut api = lock(&shared);
    if let Some(failure) = api.intercept("active_products") {
        return failure;
    }
    let products: Vec<Value> = api
        .products
        .iter()
        .filter(|p| p.is_active)
        .map(ApiState::product_json)
        .collect();
    reply(StatusCode::OK, Value::Array(products))
}

async fn all_products(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    let mut api = lock(&shared);
    if let Some(failure) = api.intercept("all_products") {
        return failure;
    }
    if let Err(denied) = api.authorize_admin(&headers) {
        return denied;
    }
    let products: Vec<Value> = api.products.iter().map(ApiState::product_json).collect();
    reply(StatusCode::OK, json!({ "products": products }))
}

async fn product(State(shared): State<Shared>, Path(id): Path<String>) -> Response {
    let mut api = lock(&shared);
    if let Some(failure) = api.intercept("product") {
        return failure;
    }
    api.product(&id).map_or_else(
        || message(StatusCode::NOT_FOUND, "Product not found"),
        |p| reply(StatusCode::OK, ApiState::product_json(p)),
    )
}

fn read_product_body(body: &Value) -> Option<(String, String, Decimal)> {
    let name = body["name"].as_str()?.trim().to_string();
    let description = body["description"].as_str()?.trim().to_string();
    let price = Decimal::try_from(body["price"].as_f64()?).ok()?;
    (!name.is_empty() && !description.is_empty() && price > Decimal::ZERO)
        .then_some((name, description, price))
}

async fn create_product(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut api = lock(&shared);
    if let Some(failure) = api.intercept("create_product") {
        return failure;
    }
    if let Err(denied) = api.authorize_admin(&headers) {
        return denied;
    }
    let Some((name, description, price)) = read_product_body(&body) else {
        return reply(StatusCode::BAD_REQUEST, json!({ "error": "Invalid product details" }));
    };
    if api.products.iter().any(|p| p.name == name) {
        return reply(StatusCode::CONFLICT, json!({ "error": "Product already exists" }));
    }

    let product = FakeProduct {
        id: Uuid::new_v4().simple().to_string(),
        name,
        description,
        price,
        is_active: true,
        created_on: Utc::now(),
    };
    let body = ApiState::product_json(&product);
    api.products.push(product);
    reply(StatusCode::CREATED, body)
}

async fn update_product(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut api = lock(&shared);
    if let Some(failure) = api.intercept("update_product") {
        return failure;
    }
    if let Err(denied) = api.authorize_admin(&headers) {
        return denied;
    }
    let Some((name, description, price)) = read_product_body(&body) else {
        return reply(StatusCode::BAD_REQUEST, json!({ "error": "Invalid product details" }));
    };
    let Some(product) = api.products.iter_mut().find(|p| p.id == id) else {
        return message(StatusCode::NOT_FOUND, "Product not found");
    };
    product.name = name;
    product.description = description;
    product.price = price;
    message(StatusCode::OK, "Product updated successfully")
}

fn set_active(
    shared: &Shared,
    headers: &HeaderMap,
    operation: &'static str,
    id: &str,
    active: bool,
) -> Response {
    let mut api = lock(shared);
    if let Some(failure) = api.intercept(operation) {
        return failure;
    }
    if let Err(denied) = api.authorize_admin(headers) {
        return denied;
    }
    match api.products.iter_mut().find(|p| p.id == id) {
        Some(product) => {
            product.is_active = active;
            message(StatusCode::OK, "Product availability updated")
        }
        None => message(StatusCode::NOT_FOUND, "Product not found"),
    }
}

async fn archive_product(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    set_active(&shared, &headers, "archive_product", &id, false)
}

async fn activate_product(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    set_active(&shared, &headers, "activate_product", &id, true)
}

// =============================================================================
// Users
// =============================================================================

/// Wrong credentials get a 2xx body without `access`, like the real API.
async fn login(State(shared): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut api = lock(&shared);
    if let Some(failure) = api.intercept("login") {
        return failure;
    }
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let Some((user_id, password_matches)) = api
        .users
        .iter()
        .find(|u| u.email == email)
        .map(|u| (u.id.clone(), u.password == password))
    else {
        return reply(StatusCode::OK, json!({ "error": "No Email Found" }));
    };
    if !password_matches {
        return reply(
            StatusCode::OK,
            json!({ "message": "Email and password do not match" }),
        );
    }

    let token = Uuid::new_v4().to_string();
    api.tokens.insert(token.clone(), user_id);
    reply(StatusCode::OK, json!({ "access": token }))
}

async fn register(State(shared): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut api = lock(&shared);
    if let Some(failure) = api.intercept("register") {
        return failure;
    }
    let field = |name: &str| body[name].as_str().unwrap_or_default().to_string();
    let email = field("email");
    if api.users.iter().any(|u| u.email == email) {
        return reply(StatusCode::OK, json!({ "error": "Email already registered" }));
    }
    api.users.push(FakeUser {
        id: Uuid::new_v4().simple().to_string(),
        first_name: field("firstName"),
        last_name: field("lastName"),
        email,
        mobile_no: field("mobileNo"),
        password: field("password"),
        is_admin: false,
    });
    reply(StatusCode::CREATED, json!({ "message": "Registered Successfully" }))
}

async fn details(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    let mut api = lock(&shared);
    if let Some(failure) = api.intercept("details") {
        return failure;
    }
    let user_id = match api.authorize(&headers) {
        Ok(id) => id,
        Err(denied) => return denied,
    };
    api.users.iter().find(|u| u.id == user_id).map_or_else(
        || message(StatusCode::NOT_FOUND, "User not found"),
        |u| reply(StatusCode::OK, ApiState::user_json(u)),
    )
}

async fn set_as_admin(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut api = lock(&shared);
    if let Some(failure) = api.intercept("set_as_admin") {
        return failure;
    }
    if let Err(denied) = api.authorize_admin(&headers) {
        return denied;
    }
    match api.users.iter_mut().find(|u| u.id == id) {
        Some(user) => {
            user.is_admin = true;
            let updated = ApiState::user_json(user);
            reply(StatusCode::OK, json!({ "updatedUser": updated }))
        }
        None => reply(StatusCode::NOT_FOUND, json!({ "error": "User not found" })),
    }
}
