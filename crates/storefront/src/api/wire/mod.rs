//! Wire types and conversions for the remote API.
//!
//! The server is loose about response shapes: the cart list may be called
//! `cartItems` or `items`, order lists come wrapped in `Orders`, product
//! references are sometimes ids and sometimes embedded documents. All of
//! that is absorbed here. Bodies are first read as [`serde_json::Value`],
//! dispatched on their top-level shape, and only then deserialized into the
//! typed structs below, so nothing above this module sees a raw response.

pub mod cart;
pub mod orders;
pub mod products;
pub mod users;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ClientError, Result};

pub use cart::{AddToCartRequest, UpdateQuantityRequest, convert_cart};
pub use orders::convert_orders;
pub use products::{ProductBody, convert_product, convert_products};
pub use users::{
    LoginRequest, RegisterRequest, convert_access_token, convert_promoted_user, convert_user,
};

/// Maximum body length written to logs.
pub const LOG_BODY_LIMIT: usize = 500;

/// Truncate a response body for logging.
#[must_use]
pub fn truncate_body(body: &str) -> String {
    body.chars().take(LOG_BODY_LIMIT).collect()
}

/// Error payload; the API uses either `message` or `error`.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Parse an error body, tolerating non-JSON text.
    #[must_use]
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    /// `message`, falling back to `error`, ignoring blank strings.
    #[must_use]
    pub fn into_message(self) -> Option<String> {
        self.message
            .into_iter()
            .chain(self.error)
            .find(|m| !m.trim().is_empty())
    }
}

/// A reference that is either a bare id or an embedded document.
///
/// Embedded documents carry whatever the server populated; only `_id`,
/// `name`, and `price` are read.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireRef {
    Id(String),
    Embedded(WireEmbedded),
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireEmbedded {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<rust_decimal::Decimal>,
}

impl WireRef {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Embedded(doc) => &doc.id,
        }
    }

    #[must_use]
    pub const fn embedded(&self) -> Option<&WireEmbedded> {
        match self {
            Self::Id(_) => None,
            Self::Embedded(doc) => Some(doc),
        }
    }
}

/// Name of a JSON value's type, for shape error messages.
pub(crate) const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Take the first present, non-null key out of an object.
pub(crate) fn take_field(
    object: &mut serde_json::Map<String, Value>,
    keys: &[&str],
) -> Option<Value> {
    keys.iter()
        .filter_map(|key| object.remove(*key))
        .find(|value| !value.is_null())
}

/// Deserialize a value that has already passed shape dispatch.
pub(crate) fn from_value<T: serde::de::DeserializeOwned>(value: Value, what: &str) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ClientError::DataShape(format!("{what}: {e}")))
}
