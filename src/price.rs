//! Fixed-scale price representation.
//!
//! Prices are exact decimal values with a fixed scale of 2 (cents), stored
//! as a scaled `i64` so the price trees (`book::tree`) can use a plain
//! integer key instead of comparing floating point. Order sizes are
//! [`rust_decimal::Decimal`] values with up to 8 fractional digits, per the
//! exchange's own size precision.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A price, stored as an exact integer count of cents.
///
/// `Price` never performs binary floating point comparisons: construction
/// from a decimal string rounds to the nearest cent, matching the
/// exchange's own 2-decimal-place price grid for BTC-USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(i64);

impl Price {
    /// Builds a `Price` directly from a whole number of cents.
    pub const fn from_cents(cents: i64) -> Self {
        Price(cents)
    }

    /// The number of cents this price represents.
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Rounds a [`Decimal`] to the nearest cent and wraps it as a `Price`.
    pub fn round_from_decimal(value: Decimal) -> Self {
        let cents = (value * Decimal::from(100)).round();
        Price(cents.to_i64().unwrap_or(i64::MAX))
    }

    /// Returns this price as an exact [`Decimal`] with 2 fractional digits.
    pub fn as_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Adds a decimal offset (in dollars, e.g. a spread in cents expressed
    /// as `0.08`) and rounds the result to the nearest cent.
    pub fn offset(self, delta: Decimal) -> Self {
        Self::round_from_decimal(self.as_decimal() + delta)
    }

    /// Subtracts a decimal offset and rounds the result to the nearest cent.
    pub fn sub_offset(self, delta: Decimal) -> Self {
        Self::round_from_decimal(self.as_decimal() - delta)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_decimal())
    }
}

impl TryFrom<Decimal> for Price {
    type Error = std::convert::Infallible;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Ok(Price::round_from_decimal(value))
    }
}

impl From<Price> for Decimal {
    fn from(value: Price) -> Self {
        value.as_decimal()
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s).map(Price::round_from_decimal)
    }
}
