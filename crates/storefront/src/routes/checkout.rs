//! Checkout route handlers.
//!
//! Checkout snapshots the cart into an [`Order`] held in the session, shows
//! it for review, and on confirmation moves it to the "last order" slot.
//! Orders are not submitted to the API.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use chicken_one_core::{OrderNumber, validate_checkout};
use chrono::Utc;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::CartItem;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::layout::LayoutContext;
use crate::middleware::RequireAuth;
use crate::models::{Order, OrderLine, session_keys};
use crate::routes::cart::{checkout_error_code, checkout_state, totals_for};
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Order review page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/review.html")]
pub struct ReviewTemplate {
    pub layout: LayoutContext,
    pub order: Order,
}

/// Order placed page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmed.html")]
pub struct ConfirmedTemplate {
    pub layout: LayoutContext,
    pub order: Order,
}

fn order_lines(items: &[CartItem], state: &AppState) -> Vec<OrderLine> {
    items
        .iter()
        .map(|item| {
            let menu = item.menu_item.as_ref();
            OrderLine {
                name: menu.map_or_else(|| "Unavailable item".to_string(), |m| m.name.clone()),
                image_url: state
                    .api()
                    .image_url(menu.and_then(|m| m.image_url.as_deref())),
                quantity: item.quantity,
                unit_price: item.unit_price(),
                line_total: item.cart_line().effective_total(),
            }
        })
        .collect()
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Validate the cart and snapshot it for review.
///
/// Checks run in order: delivery address, non-empty cart, delivery slot.
#[instrument(skip(state, session, user), fields(email = %user.email))]
pub async fn start(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<Response> {
    let items = state.api().cart_items(&user.token).await?;
    let checkout = checkout_state(&session).await?;
    let has_address = state.api().has_address(&user.token).await;

    if let Err(e) = validate_checkout(has_address, items.len(), &checkout.delivery) {
        tracing::info!(reason = %e, "Checkout refused");
        let code = checkout_error_code(e);
        return Ok(Redirect::to(&format!("/cart?error={code}")).into_response());
    }

    let totals = totals_for(&items, &checkout, &state);
    let number = OrderNumber::generate(&mut rand::rng());
    let order = Order::place(
        number,
        order_lines(&items, &state),
        totals,
        &checkout,
        Utc::now(),
    );

    session.insert(session_keys::PENDING_ORDER, &order).await?;

    tracing::info!(order_number = %order.number, "Order awaiting confirmation");
    Ok(Redirect::to("/checkout/review").into_response())
}

/// Display the pending order for confirmation.
#[instrument(skip(layout, session))]
pub async fn review(layout: LayoutContext, session: Session) -> Result<Response> {
    let Some(order) = session.get::<Order>(session_keys::PENDING_ORDER).await? else {
        return Ok(Redirect::to("/cart").into_response());
    };

    Ok(ReviewTemplate { layout, order }.into_response())
}

/// Confirm the pending order.
#[instrument(skip(session))]
pub async fn confirm(session: Session) -> Result<Response> {
    let Some(order) = session
        .remove::<Order>(session_keys::PENDING_ORDER)
        .await?
    else {
        return Ok(Redirect::to("/cart").into_response());
    };

    session.insert(session_keys::LAST_ORDER, &order).await?;
    session.remove_value(session_keys::CHECKOUT).await?;

    add_breadcrumb(
        "checkout",
        "Order confirmed",
        Some(&[("order_number", order.number.as_str())]),
    );
    tracing::info!(
        order_number = %order.number,
        total = %order.totals.total,
        "Order confirmed"
    );

    Ok(Redirect::to("/orders/confirmation").into_response())
}

/// Display the most recently confirmed order.
#[instrument(skip(layout, session))]
pub async fn confirmation(layout: LayoutContext, session: Session) -> Result<Response> {
    let Some(order) = session.get::<Order>(session_keys::LAST_ORDER).await? else {
        return Ok(Redirect::to("/").into_response());
    };

    Ok(ConfirmedTemplate { layout, order }.into_response())
}
