//! Status enums for catalog entities.

use serde::{Deserialize, Serialize};

/// Whether a product is offered in the public catalog.
///
/// The remote API models this as an `isActive` boolean; archiving a product
/// hides it from the active listing without deleting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    #[default]
    Active,
    Archived,
}

impl Availability {
    /// Build from the API's `isActive` flag.
    #[must_use]
    pub const fn from_active(is_active: bool) -> Self {
        if is_active { Self::Active } else { Self::Archived }
    }

    /// Returns `true` for [`Availability::Active`].
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// The other state.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Archived,
            Self::Archived => Self::Active,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}
