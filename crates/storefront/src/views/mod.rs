//! View-models: screen state held between user actions.
//!
//! Each view-model is generic over the gateway traits it needs, so the
//! same logic runs against [`HttpGateway`](crate::api::HttpGateway) and the
//! in-memory fakes used in tests. Operations record [`Notice`](crate::notice::Notice)s
//! for the user and also return a `Result` for callers that want it.

pub mod account;
pub mod admin;
pub mod cart;
pub mod catalog;
pub mod orders;

pub use account::AccountViewModel;
pub use admin::AdminViewModel;
pub use cart::{CartItemView, CartState, CartStatus, CartView, CartViewModel, PendingChange};
pub use catalog::{CatalogViewModel, Listing};
pub use orders::{OrderHistoryViewModel, enrich};
