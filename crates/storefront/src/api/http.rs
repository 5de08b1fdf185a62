//! reqwest-backed implementation of the gateway traits.

use std::sync::Arc;

use generix_core::{
    Cart, CurrencyCode, Order, Price, Product, ProductDraft, ProductId, Quantity, Registration,
    User, UserId,
};
use reqwest::{Method, RequestBuilder, StatusCode, header};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use super::gateway::{AccountGateway, CartGateway, CatalogGateway, CheckoutReceipt, OrderGateway};
use super::wire::{
    self, AddToCartRequest, ErrorBody, LoginRequest, ProductBody, RegisterRequest,
    UpdateQuantityRequest, truncate_body,
};
use crate::config::ApiConfig;
use crate::credentials::CredentialStore;
use crate::error::{ClientError, Result};

/// HTTP client for the remote shop API.
///
/// Cheap to clone; clones share the connection pool and credential store.
#[derive(Clone)]
pub struct HttpGateway {
    inner: Arc<HttpGatewayInner>,
}

struct HttpGatewayInner {
    client: reqwest::Client,
    base_url: Url,
    credentials: CredentialStore,
    currency: CurrencyCode,
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base_url", &self.inner.base_url.as_str())
            .field("credentials", &self.inner.credentials)
            .finish_non_exhaustive()
    }
}

impl HttpGateway {
    /// Create a gateway for the configured API.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Network` if the HTTP client fails to build.
    pub fn new(config: &ApiConfig, credentials: CredentialStore) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("generix/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpGatewayInner {
                client,
                base_url: config.base_url.clone(),
                credentials,
                currency: config.currency,
            }),
        })
    }

    #[must_use]
    pub fn credentials(&self) -> &CredentialStore {
        &self.inner.credentials
    }

    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        self.inner.currency
    }

    /// Base URL joined with path segments. Segments are percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::Config(crate::config::ConfigError::InvalidEnvVar(
                    "GENERIX_API_BASE_URL".to_string(),
                    "cannot be used as a base URL".to_string(),
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Start a request, attaching the bearer token when one is stored.
    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        let mut request = self
            .inner
            .client
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        if let Some(auth) = self.inner.credentials.authorization() {
            request = request.header(header::AUTHORIZATION, auth);
        }
        Ok(request)
    }

    /// Send a request and return the body of a 2xx response.
    async fn execute(&self, request: RequestBuilder) -> Result<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Self::parse_error(status, &body));
        }
        Ok(body)
    }

    /// Send a request and parse the 2xx body as JSON. An empty body is `null`.
    async fn execute_json(&self, request: RequestBuilder) -> Result<Value> {
        let body = self.execute(request).await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate_body(&body),
                "Failed to parse API response"
            );
            ClientError::from(e)
        })
    }

    /// Map a non-success response to an error.
    fn parse_error(status: StatusCode, body: &str) -> ClientError {
        tracing::error!(
            status = %status,
            body = %truncate_body(body),
            "API returned non-success status"
        );

        let message = ErrorBody::parse(body).into_message();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Unauthorized(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            _ => ClientError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

impl CartGateway for HttpGateway {
    #[instrument(skip(self))]
    async fn get_cart(&self) -> Result<Cart> {
        let body = self
            .execute_json(self.request(Method::GET, &["cart", "get-cart"])?)
            .await?;
        let cart = wire::convert_cart(body, self.currency())?;
        debug!(lines = cart.line_count(), total = %cart.total_price(), "Fetched cart");
        Ok(cart)
    }

    #[instrument(skip(self, unit_price), fields(product_id = %product_id, quantity = %quantity))]
    async fn add_to_cart(
        &self,
        product_id: &ProductId,
        quantity: Quantity,
        unit_price: Price,
    ) -> Result<()> {
        let body = AddToCartRequest {
            product_id: product_id.as_str(),
            quantity: quantity.get(),
            price: unit_price.amount,
        };
        let request = self.request(Method::POST, &["cart", "add-to-cart"])?.json(&body);
        self.execute(request).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(product_id = %product_id, new_quantity = %new_quantity))]
    async fn update_quantity(&self, product_id: &ProductId, new_quantity: Quantity) -> Result<()> {
        let body = UpdateQuantityRequest {
            product_id: product_id.as_str(),
            new_quantity: new_quantity.get(),
        };
        let request = self
            .request(Method::PATCH, &["cart", "update-cart-quantity"])?
            .json(&body);
        self.execute(request).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn remove_item(&self, product_id: &ProductId) -> Result<()> {
        let request = self.request(
            Method::PATCH,
            &["cart", product_id.as_str(), "remove-from-cart"],
        )?;
        self.execute(request).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear_cart(&self) -> Result<()> {
        self.execute(self.request(Method::PUT, &["cart", "clear-cart"])?)
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn checkout(&self) -> Result<CheckoutReceipt> {
        let body = self
            .execute(self.request(Method::POST, &["orders", "checkout"])?)
            .await?;
        Ok(CheckoutReceipt {
            message: ErrorBody::parse(&body).message,
        })
    }
}

impl CatalogGateway for HttpGateway {
    #[instrument(skip(self))]
    async fn active_products(&self) -> Result<Vec<Product>> {
        let body = self
            .execute_json(self.request(Method::GET, &["products", "active"])?)
            .await?;
        wire::convert_products(body, self.currency())
    }

    #[instrument(skip(self))]
    async fn all_products(&self) -> Result<Vec<Product>> {
        let body = self
            .execute_json(self.request(Method::GET, &["products", "all"])?)
            .await?;
        wire::convert_products(body, self.currency())
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn product(&self, id: &ProductId) -> Result<Product> {
        let body = self
            .execute_json(self.request(Method::GET, &["products", id.as_str()])?)
            .await?;
        if body.is_null() {
            return Err(ClientError::NotFound(None));
        }
        wire::convert_product(body, self.currency())
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    async fn create_product(&self, draft: &ProductDraft) -> Result<()> {
        let request = self
            .request(Method::POST, &["products"])?
            .json(&ProductBody::from(draft));
        self.execute(request).await?;
        Ok(())
    }

    #[instrument(skip(self, draft), fields(product_id = %id))]
    async fn update_product(&self, id: &ProductId, draft: &ProductDraft) -> Result<()> {
        let request = self
            .request(Method::PATCH, &["products", id.as_str(), "update"])?
            .json(&ProductBody::from(draft));
        self.execute(request).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn archive_product(&self, id: &ProductId) -> Result<()> {
        self.execute(self.request(Method::PATCH, &["products", id.as_str(), "archive"])?)
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn activate_product(&self, id: &ProductId) -> Result<()> {
        self.execute(self.request(Method::PATCH, &["products", id.as_str(), "activate"])?)
            .await?;
        Ok(())
    }
}

impl OrderGateway for HttpGateway {
    #[instrument(skip(self))]
    async fn my_orders(&self) -> Result<Vec<Order>> {
        let body = self
            .execute_json(self.request(Method::GET, &["orders", "my-orders"])?)
            .await?;
        wire::convert_orders(body, self.currency())
    }

    #[instrument(skip(self))]
    async fn all_orders(&self) -> Result<Vec<Order>> {
        let body = self
            .execute_json(self.request(Method::GET, &["orders", "all-orders"])?)
            .await?;
        wire::convert_orders(body, self.currency())
    }
}

impl AccountGateway for HttpGateway {
    #[instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> Result<String> {
        let request = self
            .request(Method::POST, &["users", "login"])?
            .json(&LoginRequest { email, password });
        let body = self.execute_json(request).await?;
        wire::convert_access_token(body)
    }

    #[instrument(skip(self))]
    async fn details(&self) -> Result<User> {
        let body = self
            .execute_json(self.request(Method::GET, &["users", "details"])?)
            .await?;
        wire::convert_user(body)
    }

    #[instrument(skip(self, registration), fields(email = %registration.email))]
    async fn register(&self, registration: &Registration) -> Result<Option<String>> {
        let email = registration.validate()?;
        let request = self
            .request(Method::POST, &["users", "register"])?
            .json(&RegisterRequest::new(registration, email.as_str()));
        let body = self.execute(request).await?;

        // Rejections (e.g. a duplicate email) can arrive with a 2xx status.
        let reply = ErrorBody::parse(&body);
        match (reply.message, reply.error) {
            (None, Some(error)) => Err(ClientError::Validation(error)),
            (message, _) => Ok(message),
        }
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn set_as_admin(&self, user_id: &UserId) -> Result<User> {
        let request = self.request(Method::PATCH, &["users", user_id.as_str(), "set-as-admin"])?;
        let body = self.execute_json(request).await?;
        wire::convert_promoted_user(body)
    }
}
