//! Chicken One Core - Domain types and ordering rules.
//!
//! This crate holds everything the storefront computes locally:
//! - [`types`] - Newtype IDs, prices, emails, and user roles
//! - [`password`] - Password policy used by registration and password reset
//! - [`cart`] - Coupons, cart totals, delivery scheduling, and checkout checks
//! - [`delivery`] - Delivery area form parsing and list filtering
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no session access. Prices, coupons at order time, and roles are
//! owned by the remote API; the rules here only drive what the storefront
//! shows and which requests it is willing to send.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod delivery;
pub mod password;
pub mod types;

pub use cart::{
    ASAP_ESTIMATE, AppliedCoupon, COUPONS, CartLine, CartTotals, CheckoutError, Coupon,
    CouponError, DELIVERY_SLOTS, DeliveryOption, OrderNumber, find_coupon, validate_checkout,
};
pub use delivery::{
    AreaFilter, AreaQuery, DeliveryAreaError, DeliveryAreaForm, DeliveryAreaInput,
    estimated_time_label,
};
pub use password::{PasswordCheck, PasswordRule};
pub use types::*;
