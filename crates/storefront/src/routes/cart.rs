//! Cart route handlers.
//!
//! Cart rows live in the API. The coupon and delivery choice are kept in the
//! session as [`CheckoutState`] until an order is placed. Every action
//! redirects back to `/cart` with a flash code.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chicken_one_core::{
    CartItemId, CartLine, CartTotals, CheckoutError, CouponError, DELIVERY_SLOTS, DeliveryOption,
    find_coupon,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::{ApiClient, ApiError, CartItem};
use crate::error::{AppError, Result};
use crate::filters;
use crate::layout::{LayoutContext, MessageQuery};
use crate::middleware::RequireAuth;
use crate::models::{CheckoutState, session_keys};
use crate::state::AppState;

/// Category shown for items the API did not categorise.
const DEFAULT_CATEGORY: &str = "meals";

// =============================================================================
// Form Types
// =============================================================================

/// Quantity form data. Kept as text so bad input is ignored, not rejected.
#[derive(Debug, Deserialize)]
pub struct QuantityForm {
    #[serde(default)]
    pub quantity: String,
}

/// Coupon form data.
#[derive(Debug, Deserialize)]
pub struct CouponForm {
    #[serde(default)]
    pub code: String,
}

/// Delivery time form data.
#[derive(Debug, Deserialize)]
pub struct DeliveryForm {
    #[serde(default)]
    pub mode: String,
    pub slot: Option<String>,
}

// =============================================================================
// View Types
// =============================================================================

/// Cart item display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: CartItemId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub prep_time: String,
    pub image_url: String,
    pub options: Vec<String>,
    pub quantity: u32,
    pub decrease_to: u32,
    pub increase_to: u32,
    pub unit_price: String,
    pub line_total: String,
}

impl CartItemView {
    fn new(item: &CartItem, api: &ApiClient) -> Self {
        let menu = item.menu_item.as_ref();
        let category = menu
            .and_then(|m| m.category.as_ref())
            .map(|c| c.name.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        let prep_time = format!(
            "{}-{}",
            menu.and_then(|m| m.preparation_time_start).unwrap_or(0),
            menu.and_then(|m| m.preparation_time_end).unwrap_or(30),
        );

        Self {
            id: item.id,
            name: menu.map_or_else(|| "Unavailable item".to_string(), |m| m.name.clone()),
            description: menu
                .and_then(|m| m.description.clone())
                .unwrap_or_default(),
            category,
            prep_time,
            image_url: api.image_url(menu.and_then(|m| m.image_url.as_deref())),
            options: item
                .menu_item_options
                .iter()
                .filter_map(|o| o.name.clone())
                .collect(),
            quantity: item.quantity,
            decrease_to: item.quantity.saturating_sub(1),
            increase_to: item.quantity.saturating_add(1),
            unit_price: item.unit_price().display(),
            line_total: item.cart_line().effective_total().display(),
        }
    }
}

/// A delivery slot choice for the radio list.
#[derive(Debug, Clone)]
pub struct SlotView {
    pub label: &'static str,
    pub selected: bool,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartTemplate {
    pub layout: LayoutContext,
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub totals: CartTotals,
    pub coupon_code: Option<String>,
    pub deliver_later: bool,
    pub slots: Vec<SlotView>,
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Session helpers
// =============================================================================

/// Read the coupon and delivery choice from the session.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn checkout_state(session: &Session) -> Result<CheckoutState> {
    Ok(session
        .get::<CheckoutState>(session_keys::CHECKOUT)
        .await?
        .unwrap_or_default())
}

async fn save_checkout_state(session: &Session, state: &CheckoutState) -> Result<()> {
    session.insert(session_keys::CHECKOUT, state).await?;
    Ok(())
}

/// Cart totals for the given rows and the session's coupon.
#[must_use]
pub fn totals_for(items: &[CartItem], checkout: &CheckoutState, state: &AppState) -> CartTotals {
    let lines: Vec<CartLine> = items.iter().map(CartItem::cart_line).collect();
    CartTotals::compute(
        &lines,
        checkout.discount_percent(),
        state.config().delivery_fee,
    )
}

// =============================================================================
// Flash Messages
// =============================================================================

/// Flash code for a refused checkout.
#[must_use]
pub const fn checkout_error_code(error: CheckoutError) -> &'static str {
    match error {
        CheckoutError::MissingAddress => "missing_address",
        CheckoutError::EmptyCart => "empty_cart",
        CheckoutError::MissingDeliveryTime => "missing_delivery_time",
    }
}

const fn coupon_error_code(error: CouponError) -> &'static str {
    match error {
        CouponError::Empty => "coupon_empty",
        CouponError::Invalid => "coupon_invalid",
    }
}

fn error_message(code: &str) -> String {
    match code {
        "coupon_empty" => CouponError::Empty.to_string(),
        "coupon_invalid" => CouponError::Invalid.to_string(),
        "missing_address" => CheckoutError::MissingAddress.to_string(),
        "empty_cart" => CheckoutError::EmptyCart.to_string(),
        "missing_delivery_time" => CheckoutError::MissingDeliveryTime.to_string(),
        "update_failed" => "Failed to update the quantity.".to_string(),
        "remove_failed" => "Failed to remove the item.".to_string(),
        _ => "Something went wrong. Please try again.".to_string(),
    }
}

fn success_message(code: &str, checkout: &CheckoutState) -> Option<String> {
    match code {
        "coupon_applied" => Some(format!(
            "Coupon applied! You got {}% off your order!",
            checkout.discount_percent()
        )),
        "coupon_removed" => Some("Coupon removed.".to_string()),
        "item_removed" => Some("The item was removed from your cart.".to_string()),
        _ => None,
    }
}

/// Redirect back to the cart with an error flash, unless the API rejected
/// the token, in which case the user has to sign in again.
fn flash_failure(error: ApiError, code: &str) -> Result<Response> {
    if matches!(error, ApiError::Unauthorized) {
        return Err(AppError::Api(error));
    }
    tracing::warn!(error = %error, code, "Cart update failed");
    Ok(Redirect::to(&format!("/cart?error={code}")).into_response())
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Display the cart page.
#[instrument(skip(state, layout, session, user, query), fields(email = %user.email))]
pub async fn show(
    State(state): State<AppState>,
    layout: LayoutContext,
    session: Session,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<Response> {
    let items = state.api().cart_items(&user.token).await?;
    let checkout = checkout_state(&session).await?;
    let totals = totals_for(&items, &checkout, &state);

    let slots = DELIVERY_SLOTS
        .iter()
        .map(|&label| SlotView {
            label,
            selected: checkout.delivery.slot() == Some(label),
        })
        .collect();

    Ok(CartTemplate {
        layout,
        item_count: items.iter().map(|i| i.quantity).sum(),
        items: items
            .iter()
            .map(|item| CartItemView::new(item, state.api()))
            .collect(),
        totals,
        coupon_code: checkout.coupon.as_ref().map(|c| c.code.clone()),
        deliver_later: checkout.delivery.is_later(),
        slots,
        error: query.error.as_deref().map(error_message),
        success: query
            .success
            .as_deref()
            .and_then(|code| success_message(code, &checkout)),
    }
    .into_response())
}

/// Set an item's quantity. Values below 1 are ignored.
#[instrument(skip(state, user, form), fields(email = %user.email))]
pub async fn update_quantity(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<CartItemId>,
    Form(form): Form<QuantityForm>,
) -> Result<Response> {
    let Some(quantity) = parse_quantity(&form.quantity) else {
        return Ok(Redirect::to("/cart").into_response());
    };

    match state
        .api()
        .update_cart_item(&user.token, id, quantity)
        .await
    {
        Ok(()) => Ok(Redirect::to("/cart").into_response()),
        Err(e) => flash_failure(e, "update_failed"),
    }
}

/// Remove an item from the cart.
#[instrument(skip(state, user), fields(email = %user.email))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<CartItemId>,
) -> Result<Response> {
    match state.api().delete_cart_item(&user.token, id).await {
        Ok(()) => Ok(Redirect::to("/cart?success=item_removed").into_response()),
        Err(e) => flash_failure(e, "remove_failed"),
    }
}

/// Apply a coupon code.
#[instrument(skip(session, form))]
pub async fn apply_coupon(session: Session, Form(form): Form<CouponForm>) -> Result<Response> {
    let coupon = match find_coupon(&form.code) {
        Ok(coupon) => coupon,
        Err(e) => {
            let code = coupon_error_code(e);
            return Ok(Redirect::to(&format!("/cart?error={code}")).into_response());
        }
    };

    let mut checkout = checkout_state(&session).await?;
    checkout.coupon = Some(coupon.into());
    save_checkout_state(&session, &checkout).await?;

    tracing::info!(code = coupon.code, "Coupon applied");
    Ok(Redirect::to("/cart?success=coupon_applied").into_response())
}

/// Remove the applied coupon.
#[instrument(skip(session))]
pub async fn remove_coupon(session: Session) -> Result<Response> {
    let mut checkout = checkout_state(&session).await?;
    checkout.coupon = None;
    save_checkout_state(&session, &checkout).await?;

    Ok(Redirect::to("/cart?success=coupon_removed").into_response())
}

/// Choose between delivery now and a later slot.
#[instrument(skip(session, form))]
pub async fn set_delivery(session: Session, Form(form): Form<DeliveryForm>) -> Result<Response> {
    let mut checkout = checkout_state(&session).await?;
    checkout.delivery = DeliveryOption::from_form(&form.mode, form.slot.as_deref());
    save_checkout_state(&session, &checkout).await?;

    Ok(Redirect::to("/cart").into_response())
}

/// Parse a submitted quantity, keeping only values of at least 1.
fn parse_quantity(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|&q| q >= 1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chicken_one_core::AppliedCoupon;

    use super::*;

    #[test]
    fn test_parse_quantity_ignores_below_one() {
        assert_eq!(parse_quantity("3"), Some(3));
        assert_eq!(parse_quantity(" 1 "), Some(1));
        assert_eq!(parse_quantity("0"), None);
        assert_eq!(parse_quantity("-2"), None);
        assert_eq!(parse_quantity("many"), None);
        assert_eq!(parse_quantity(""), None);
    }

    #[test]
    fn test_checkout_error_codes_map_back_to_messages() {
        for error in [
            CheckoutError::MissingAddress,
            CheckoutError::EmptyCart,
            CheckoutError::MissingDeliveryTime,
        ] {
            assert_eq!(error_message(checkout_error_code(error)), error.to_string());
        }
    }

    #[test]
    fn test_coupon_error_codes_map_back_to_messages() {
        assert_eq!(
            error_message(coupon_error_code(CouponError::Empty)),
            "Please enter a coupon code"
        );
        assert_eq!(
            error_message(coupon_error_code(CouponError::Invalid)),
            CouponError::Invalid.to_string()
        );
    }

    #[test]
    fn test_coupon_applied_message_uses_session_percent() {
        let checkout = CheckoutState {
            coupon: Some(AppliedCoupon::from(find_coupon("chicken20").unwrap())),
            ..CheckoutState::default()
        };
        assert_eq!(
            success_message("coupon_applied", &checkout).as_deref(),
            Some("Coupon applied! You got 20% off your order!")
        );
        assert_eq!(success_message("unknown", &checkout), None);
    }
}
