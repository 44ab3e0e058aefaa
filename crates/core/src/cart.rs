//! Cart pricing, coupons, delivery scheduling and checkout checks.
//!
//! # Totals
//!
//! ```text
//! subtotal        = Σ line totals
//! discount_amount = subtotal × discount% / 100
//! total           = subtotal − discount_amount + delivery_fee
//! ```
//!
//! The delivery fee is flat and always charged; an empty cart still shows it
//! but can never be checked out.

use core::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::Price;

// =============================================================================
// Coupons
// =============================================================================

/// A promotional code and the percentage it takes off the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coupon {
    pub code: &'static str,
    pub percent: u8,
}

/// Coupons the storefront accepts.
///
/// Sample data until the backend exposes a coupon endpoint.
pub const COUPONS: [Coupon; 4] = [
    Coupon {
        code: "WELCOME10",
        percent: 10,
    },
    Coupon {
        code: "FIRSTORDER",
        percent: 15,
    },
    Coupon {
        code: "CHICKEN20",
        percent: 20,
    },
    Coupon {
        code: "SAVE25",
        percent: 25,
    },
];

/// Why a coupon code was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CouponError {
    #[error("Please enter a coupon code")]
    Empty,
    #[error("The coupon code you entered is invalid or has expired")]
    Invalid,
}

/// Look up a coupon by code, ignoring surrounding whitespace and case.
///
/// # Errors
///
/// [`CouponError::Empty`] for blank input, [`CouponError::Invalid`] when no
/// coupon has that code.
pub fn find_coupon(input: &str) -> Result<Coupon, CouponError> {
    let code = input.trim();
    if code.is_empty() {
        return Err(CouponError::Empty);
    }

    COUPONS
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(code))
        .copied()
        .ok_or(CouponError::Invalid)
}

/// A coupon applied to the current cart, as kept in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedCoupon {
    pub code: String,
    pub percent: u8,
}

impl From<Coupon> for AppliedCoupon {
    fn from(coupon: Coupon) -> Self {
        Self {
            code: coupon.code.to_owned(),
            percent: coupon.percent,
        }
    }
}

// =============================================================================
// Totals
// =============================================================================

/// The pricing-relevant part of one cart row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    pub unit_price: Price,
    pub quantity: u32,
    /// Line total as reported by the API, when it sent one.
    pub line_total: Option<Price>,
}

impl CartLine {
    /// The API's line total when present and non-zero, otherwise
    /// `unit_price × quantity`.
    #[must_use]
    pub fn effective_total(&self) -> Price {
        match self.line_total {
            Some(total) if !total.is_zero() => total,
            _ => self.unit_price * self.quantity,
        }
    }
}

/// Price breakdown shown on the cart and checkout pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Price,
    pub discount_percent: u8,
    pub discount_amount: Price,
    pub delivery_fee: Price,
    pub total: Price,
}

impl CartTotals {
    /// Compute totals for `lines` with a percentage discount and flat fee.
    #[must_use]
    pub fn compute(lines: &[CartLine], discount_percent: u8, delivery_fee: Price) -> Self {
        let subtotal: Price = lines.iter().map(CartLine::effective_total).sum();
        let discount_amount = subtotal.percent(discount_percent);

        Self {
            subtotal,
            discount_percent,
            discount_amount,
            delivery_fee,
            total: subtotal - discount_amount + delivery_fee,
        }
    }

    /// Whether a discount line should be shown.
    #[must_use]
    pub const fn has_discount(&self) -> bool {
        self.discount_percent > 0
    }
}

// =============================================================================
// Delivery scheduling
// =============================================================================

/// Hourly delivery windows offered for scheduled orders.
pub const DELIVERY_SLOTS: [&str; 9] = [
    "12:00 PM - 1:00 PM",
    "1:00 PM - 2:00 PM",
    "2:00 PM - 3:00 PM",
    "3:00 PM - 4:00 PM",
    "4:00 PM - 5:00 PM",
    "5:00 PM - 6:00 PM",
    "6:00 PM - 7:00 PM",
    "7:00 PM - 8:00 PM",
    "8:00 PM - 9:00 PM",
];

/// Estimated delivery time for orders placed for immediate delivery.
pub const ASAP_ESTIMATE: &str = "25-35 minutes";

/// When the customer wants the order delivered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DeliveryOption {
    #[default]
    Now,
    /// Scheduled delivery. The slot stays `None` until one is picked.
    Later { slot: Option<String> },
}

impl DeliveryOption {
    /// Build from the cart form's `mode` and `slot` fields.
    ///
    /// Unknown modes fall back to immediate delivery; slots that are not one
    /// of [`DELIVERY_SLOTS`] are dropped.
    #[must_use]
    pub fn from_form(mode: &str, slot: Option<&str>) -> Self {
        if mode != "later" {
            return Self::Now;
        }

        let slot = slot
            .map(str::trim)
            .filter(|s| DELIVERY_SLOTS.contains(s))
            .map(str::to_owned);
        Self::Later { slot }
    }

    /// Whether this is a scheduled delivery.
    #[must_use]
    pub const fn is_later(&self) -> bool {
        matches!(self, Self::Later { .. })
    }

    /// The selected slot, if any.
    #[must_use]
    pub fn slot(&self) -> Option<&str> {
        match self {
            Self::Later { slot } => slot.as_deref(),
            Self::Now => None,
        }
    }

    /// Delivery time recorded on the order: `"ASAP"` or the slot.
    #[must_use]
    pub fn delivery_time(&self) -> String {
        self.slot().unwrap_or("ASAP").to_owned()
    }

    /// Estimate shown to the customer after ordering.
    #[must_use]
    pub fn estimated_delivery(&self) -> String {
        match self {
            Self::Now => ASAP_ESTIMATE.to_owned(),
            Self::Later { slot } => slot.clone().unwrap_or_default(),
        }
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// Why checkout was refused. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    #[error("You have not added a delivery address yet. Please add one to continue with your order.")]
    MissingAddress,
    #[error("Your cart is empty. Please add some items before checking out.")]
    EmptyCart,
    #[error("Please choose a delivery time for your order.")]
    MissingDeliveryTime,
}

/// Check that an order can be placed. The first failing check wins.
///
/// # Errors
///
/// Returns the [`CheckoutError`] for the first unmet precondition.
pub fn validate_checkout(
    has_address: bool,
    item_count: usize,
    delivery: &DeliveryOption,
) -> Result<(), CheckoutError> {
    if !has_address {
        return Err(CheckoutError::MissingAddress);
    }
    if item_count == 0 {
        return Err(CheckoutError::EmptyCart);
    }
    if delivery.is_later() && delivery.slot().is_none() {
        return Err(CheckoutError::MissingDeliveryTime);
    }
    Ok(())
}

/// A short reference number shown to the customer after ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Number of characters in a generated order number.
    pub const LENGTH: usize = 9;

    const CHARSET: &'static [u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

    /// Generate a random order number of uppercase letters and digits.
    #[must_use]
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let number = (0..Self::LENGTH)
            .map(|_| {
                let idx = rng.random_range(0..Self::CHARSET.len());
                Self::CHARSET.get(idx).map_or('0', |b| char::from(*b))
            })
            .collect();
        Self(number)
    }

    /// The order number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
