//! Generix storefront client library.
//!
//! Talks to the remote Generix shop API and keeps screen state for the
//! front ends:
//!
//! - [`api`] - Gateway traits, the HTTP implementation, and wire decoding
//! - [`views`] - Cart, catalog, order history, admin, and account view-models
//! - [`cache`] - Product snapshot cache used to resolve order lines
//! - [`state`] - Shared state that builds view-models over one gateway
//!
//! The cart follows an optimistic model: edits apply locally and are
//! published at once, the server call follows, and a successful call is
//! reconciled by refetching the server's cart.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cache;
pub mod config;
pub mod credentials;
pub mod error;
pub mod notice;
pub mod state;
pub mod views;

#[cfg(test)]
mod testing;

pub use api::{
    AccountGateway, CartGateway, CatalogGateway, CheckoutReceipt, HttpGateway, OrderGateway,
};
pub use cache::ProductCache;
pub use config::{ApiConfig, ConfigError, StorefrontConfig};
pub use credentials::CredentialStore;
pub use error::{ClientError, ErrorKind, Result};
pub use notice::{Notice, NoticeLevel, Notices};
pub use state::AppState;
