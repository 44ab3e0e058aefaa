//! Type-safe price representation using decimal arithmetic.
//!
//! All menu prices and delivery fees are quoted in Egyptian pounds. The API
//! sends them as JSON numbers; the storefront converts them to [`Price`] once
//! at the boundary so totals never accumulate float error.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul, Sub};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currency label shown next to every amount.
pub const CURRENCY_LABEL: &str = "EGP";

/// An amount of money in Egyptian pounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from whole piastres (hundredths of a pound).
    #[must_use]
    pub fn from_piastres(piastres: i64) -> Self {
        Self(Decimal::new(piastres, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `percent`% of this amount, unrounded.
    #[must_use]
    pub fn percent(&self, percent: u8) -> Self {
        Self(self.0 * Decimal::from(percent) / Decimal::ONE_HUNDRED)
    }

    /// Format for display, e.g. `"15.00 EGP"`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{:.2} {CURRENCY_LABEL}", self.0.round_dp(2))
    }

    /// Amount with two decimals and no currency, e.g. `"15.00"`.
    ///
    /// Used to prefill numeric form inputs.
    #[must_use]
    pub fn plain(&self) -> String {
        format!("{:.2}", self.0.round_dp(2))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self(self.0 * Decimal::from(rhs))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}
