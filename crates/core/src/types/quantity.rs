//! Line-item quantities.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A quantity that was zero, negative, or too large.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("quantity must be between 1 and {max}, got {value}", max = u32::MAX)]
pub struct InvalidQuantity {
    /// The rejected value.
    pub value: i64,
}

/// A cart or order line quantity. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// The smallest valid quantity.
    pub const ONE: Self = Self(1);

    /// Create a quantity, returning `None` for zero.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }

    /// The underlying count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Apply a signed delta, clamping at 1 (and at `u32::MAX`).
    ///
    /// Clamping never removes a line: a decrement at 1 stays at 1.
    #[must_use]
    pub fn saturating_apply(self, delta: i64) -> Self {
        let next = i64::from(self.0).saturating_add(delta).max(1);
        Self(u32::try_from(next).unwrap_or(u32::MAX))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<i64> for Quantity {
    type Error = InvalidQuantity;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or(InvalidQuantity { value })
    }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> Self {
        q.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
