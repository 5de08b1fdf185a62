//! Remote shop API client.
//!
//! # Architecture
//!
//! - [`gateway`] defines one trait per endpoint group; view-models are
//!   generic over these traits
//! - [`HttpGateway`] implements them with `reqwest`, attaching the bearer
//!   token from the shared [`CredentialStore`](crate::credentials::CredentialStore)
//! - [`wire`] is the only place that looks at raw response JSON
//!
//! # Example
//!
//! ```rust,ignore
//! use generix_storefront::api::{CartGateway, HttpGateway};
//!
//! let gateway = HttpGateway::new(&config.api, credentials)?;
//! let cart = gateway.get_cart().await?;
//! println!("{} lines, total {}", cart.line_count(), cart.total_price());
//! ```

pub mod gateway;
mod http;
pub mod wire;

pub use gateway::{AccountGateway, CartGateway, CatalogGateway, CheckoutReceipt, OrderGateway};
pub use http::HttpGateway;
