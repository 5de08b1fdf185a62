//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::Quantity;

/// A price with currency information.
///
/// Amounts keep full precision until multiplied by a quantity; line totals
/// are rounded to the currency's minor unit so that
/// `unit_price.times(q)` is the value a shopper sees on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., pesos, not centavos).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Price of `quantity` units, rounded to the currency's minor unit.
    #[must_use]
    pub fn times(self, quantity: Quantity) -> Self {
        let total = self.amount * Decimal::from(quantity.get());
        Self::new(
            total.round_dp_with_strategy(
                self.currency_code.minor_units(),
                RoundingStrategy::MidpointAwayFromZero,
            ),
            self.currency_code,
        )
    }

    /// Sum of two prices in the same currency.
    ///
    /// The currency of `self` is kept; callers only add prices drawn from a
    /// single cart or order.
    #[must_use]
    pub fn plus(self, other: Self) -> Self {
        debug_assert_eq!(self.currency_code, other.currency_code);
        Self::new(self.amount + other.amount, self.currency_code)
    }

    /// Price of a single unit given a line total and its quantity.
    #[must_use]
    pub fn per_unit(self, quantity: Quantity) -> Self {
        Self::new(self.amount / Decimal::from(quantity.get()), self.currency_code)
    }

    /// Returns `true` when the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:.prec$}",
            self.currency_code.symbol(),
            self.amount,
            prec = self.currency_code.minor_units() as usize
        )
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    PHP,
    USD,
    EUR,
    GBP,
    JPY,
}

impl CurrencyCode {
    /// Display symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::PHP => "₱",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::JPY => "¥",
        }
    }

    /// Three-letter code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::PHP => "PHP",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::JPY => "JPY",
        }
    }

    /// Number of digits after the decimal point for this currency.
    #[must_use]
    pub const fn minor_units(self) -> u32 {
        match self {
            Self::JPY => 0,
            _ => 2,
        }
    }
}

/// The currency code is not one this client knows how to format.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown currency code: {0}")]
pub struct UnknownCurrency(pub String);

impl FromStr for CurrencyCode {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PHP" => Ok(Self::PHP),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "JPY" => Ok(Self::JPY),
            _ => Err(UnknownCurrency(s.to_string())),
        }
    }
}
