//! Client error taxonomy with Sentry helpers.
//!
//! Every fallible storefront operation returns [`ClientError`]. View-models
//! catch these at their boundary, log them, leave a breadcrumb, and turn them
//! into a notice; nothing here is fatal.

use generix_core::{CartError, DraftError, EmailError, RegistrationError};
use thiserror::Error;

use crate::config::ConfigError;

/// Coarse classification of a [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request failed or the server answered with a non-2xx status.
    NetworkFailure,
    /// The response body did not have the expected shape.
    DataShapeMismatch,
    /// The client refused the operation before any request was made.
    ValidationFailure,
    /// The client is misconfigured.
    Configuration,
}

/// Storefront client error.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("API error: {status}{}", .message.as_deref().map(|m| format!(" - {m}")).unwrap_or_default())]
    Api { status: u16, message: Option<String> },

    /// Missing or rejected bearer token.
    #[error("Unauthorized{}", .0.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Unauthorized(Option<String>),

    /// Resource not found.
    #[error("Not found{}", .0.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    NotFound(Option<String>),

    /// Response body had an unexpected shape.
    #[error("Unexpected response: {0}")]
    DataShape(String),

    /// Operation blocked client-side.
    #[error("{0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) | Self::Api { .. } | Self::Unauthorized(_) | Self::NotFound(_) => {
                ErrorKind::NetworkFailure
            }
            Self::DataShape(_) => ErrorKind::DataShapeMismatch,
            Self::Validation(_) => ErrorKind::ValidationFailure,
            Self::Config(_) => ErrorKind::Configuration,
        }
    }

    #[must_use]
    pub const fn is_network_failure(&self) -> bool {
        matches!(self.kind(), ErrorKind::NetworkFailure)
    }

    /// The `message` or `error` field the server sent, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } | Self::Unauthorized(message) | Self::NotFound(message) => {
                message.as_deref()
            }
            _ => None,
        }
    }

    /// Text suitable for showing to the shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.server_message()
            .map_or_else(|| self.to_string(), ToString::to_string)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::DataShape(err.to_string())
    }
}

impl From<CartError> for ClientError {
    fn from(err: CartError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<DraftError> for ClientError {
    fn from(err: DraftError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<RegistrationError> for ClientError {
    fn from(err: RegistrationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<EmailError> for ClientError {
    fn from(err: EmailError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Set the Sentry user context after a successful login.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Record a user action so it shows up in later Sentry reports.
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Removed item", Some(&[("product_id", "64f0c2")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data.unwrap_or_default() {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}

/// Breadcrumb at warning level for a failed operation.
pub(crate) fn failure_breadcrumb(category: &str, operation: &str, err: &ClientError) {
    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(format!("{operation} failed: {err}")),
        level: sentry::Level::Warning,
        ..Default::default()
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use generix_core::ProductId;

    use super::*;

    #[test]
    fn test_kind_classification() {
        let api = ClientError::Api {
            status: 500,
            message: None,
        };
        assert_eq!(api.kind(), ErrorKind::NetworkFailure);
        assert!(ClientError::Unauthorized(None).is_network_failure());
        assert_eq!(
            ClientError::DataShape("x".to_string()).kind(),
            ErrorKind::DataShapeMismatch
        );

        let err: ClientError = CartError::BelowMinimum {
            product_id: ProductId::new("p1"),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::ValidationFailure);
        assert!(!err.is_network_failure());
    }

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ClientError::Api {
            status: 400,
            message: Some("Cart is empty".to_string()),
        };
        assert_eq!(err.user_message(), "Cart is empty");
        assert_eq!(err.to_string(), "API error: 400 - Cart is empty");

        let err = ClientError::NotFound(Some("User not found".to_string()));
        assert_eq!(err.server_message(), Some("User not found"));
        assert_eq!(err.user_message(), "User not found");

        let err = ClientError::NotFound(None);
        assert_eq!(err.server_message(), None);
        assert_eq!(err.user_message(), "Not found");
    }

    #[test]
    fn test_json_error_is_shape_mismatch() {
        let err: ClientError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::DataShapeMismatch);
    }
}
