//! Session-related types.
//!
//! Types stored in the session for authentication and checkout state.

use chicken_one_core::{
    AppliedCoupon, CartTotals, DeliveryOption, OrderNumber, Price, has_staff_role,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::AuthResponse;

/// Session-stored user identity.
///
/// Holds the API bearer token, so `Debug` redacts it.
#[derive(Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// API bearer token.
    pub token: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Role names as reported at sign-in.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl std::fmt::Debug for CurrentUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrentUser")
            .field("token", &"[REDACTED]")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("roles", &self.roles)
            .finish()
    }
}

impl CurrentUser {
    /// Build from a sign-in response.
    ///
    /// Returns `None` when the response has no token. `fallback_email` is
    /// used when the API omits the email.
    #[must_use]
    pub fn from_auth(response: AuthResponse, fallback_email: &str) -> Option<Self> {
        let token = response.token.filter(|t| !t.trim().is_empty())?;
        Some(Self {
            token,
            email: response
                .email
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| fallback_email.to_string()),
            first_name: response.first_name,
            last_name: response.last_name,
            roles: response.roles,
        })
    }

    /// First name if known, otherwise the email address.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.email)
    }

    /// Whether the sign-in response carried a staff role.
    ///
    /// Only used for navigation; staff pages re-check against the profile.
    #[must_use]
    pub fn is_staff(&self) -> bool {
        has_staff_role(&self.roles)
    }
}

/// Choices made on the cart page that carry over to checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutState {
    pub coupon: Option<AppliedCoupon>,
    #[serde(default)]
    pub delivery: DeliveryOption,
}

impl CheckoutState {
    /// Discount percentage of the applied coupon, or zero.
    #[must_use]
    pub fn discount_percent(&self) -> u8 {
        self.coupon.as_ref().map_or(0, |c| c.percent)
    }
}

/// Lifecycle state of a locally placed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Preparing,
}

impl OrderStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Preparing => "Preparing",
        }
    }
}

/// One cart row frozen into an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub image_url: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub line_total: Price,
}

/// An order snapshot kept in the session.
///
/// Orders are not sent to the API; the snapshot drives the review and
/// confirmation pages only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub number: OrderNumber,
    pub lines: Vec<OrderLine>,
    pub totals: CartTotals,
    pub delivery: DeliveryOption,
    /// `"ASAP"` or the chosen slot.
    pub delivery_time: String,
    pub coupon_code: Option<String>,
    pub status: OrderStatus,
    pub estimated_delivery: String,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Snapshot the cart into a new order.
    #[must_use]
    pub fn place(
        number: OrderNumber,
        lines: Vec<OrderLine>,
        totals: CartTotals,
        checkout: &CheckoutState,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            number,
            lines,
            totals,
            delivery_time: checkout.delivery.delivery_time(),
            estimated_delivery: checkout.delivery.estimated_delivery(),
            delivery: checkout.delivery.clone(),
            coupon_code: checkout.coupon.as_ref().map(|c| c.code.clone()),
            status: OrderStatus::Preparing,
            created_at,
        }
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the coupon and delivery choices on the cart page.
    pub const CHECKOUT: &str = "checkout";

    /// Key for the order awaiting confirmation.
    pub const PENDING_ORDER: &str = "pending_order";

    /// Key for the most recently confirmed order.
    pub const LAST_ORDER: &str = "last_order";
}
