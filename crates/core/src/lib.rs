//! Generix Core - Shared domain types.
//!
//! This crate provides the types used across all Generix components:
//! - `storefront` - Client library talking to the remote shop API
//! - `cli` - The `gx` command-line front end
//! - `integration-tests` - Fake remote API and end-to-end tests
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients. Local cart mutations live here so that the subtotal and total
//! invariants can be tested without a network.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, quantities, emails, and statuses
//! - [`cart`] - Cart lines and the local (optimistic) mutations
//! - [`catalog`] - Products and client-side filtering/sorting
//! - [`order`] - Placed orders
//! - [`account`] - Users and registration validation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod account;
pub mod cart;
pub mod catalog;
pub mod order;
pub mod types;

pub use account::{Registration, RegistrationError, User};
pub use cart::{Cart, CartError, CartItem, ProductRef, QuantityChange};
pub use catalog::{
    DraftError, Product, ProductDraft, ProductQuery, ProductSnapshot, SortKey, UnknownSortKey,
};
pub use order::{Order, OrderLine};
pub use types::*;
