//! Session-backed models for the storefront.
//!
//! The remote API owns every persistent record. What the storefront keeps
//! between requests lives in the session: who is signed in, the checkout
//! choices made on the cart page, and the order being reviewed.

pub mod session;

pub use session::{
    CheckoutState, CurrentUser, Order, OrderLine, OrderStatus, keys as session_keys,
};
