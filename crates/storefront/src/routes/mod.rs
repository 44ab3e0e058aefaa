//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Home page
//!
//! # Auth
//! GET  /login                         - Sign-in page
//! POST /login                         - Sign in (rate limited)
//! GET  /register                      - Registration page
//! POST /register                      - Create account (rate limited)
//! POST /logout                        - Sign out
//! GET  /auth/verify-email-address     - Confirm email (?email&code)
//! GET  /auth/forgot-password          - Request a reset link
//! POST /auth/forgot-password          - Send reset link (rate limited)
//! GET  /reset-password                - Reset form (?email&code)
//! POST /reset-password                - Set new password (rate limited)
//! GET  /auth/google/success           - Finish Google sign-in
//!
//! # Account (requires auth)
//! GET  /profile                       - Profile
//!
//! # Cart (requires auth)
//! GET  /cart                          - Cart page
//! POST /cart/items/{id}/quantity      - Set quantity
//! POST /cart/items/{id}/delete        - Remove item
//! POST /cart/coupon                   - Apply coupon
//! POST /cart/coupon/remove            - Remove coupon
//! POST /cart/delivery                 - Delivery now or later
//!
//! # Checkout (requires auth)
//! POST /checkout                      - Validate cart, snapshot order
//! GET  /checkout/review               - Review pending order
//! POST /checkout/confirm              - Confirm order
//! GET  /orders/confirmation           - Order placed
//!
//! # Admin (requires staff role)
//! GET  /admin/delivery-fees           - Delivery areas (?search&filter)
//! POST /admin/delivery-fees           - Create area
//! GET  /admin/delivery-fees/{id}/edit - Edit area
//! POST /admin/delivery-fees/{id}      - Update area
//! POST /admin/delivery-fees/{id}/delete - Delete area
//! POST /admin/delivery-fees/{id}/toggle - Toggle active
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod delivery_fees;
pub mod home;
pub mod profile;
pub mod sso;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the sign-in, registration and password recovery routes.
///
/// Form submissions share one per-IP rate limiter.
pub fn auth_routes() -> Router<AppState> {
    let limiter = auth_rate_limiter();

    Router::new()
        .route(
            "/login",
            get(auth::login_page).merge(post(auth::login).layer(limiter.clone())),
        )
        .route(
            "/register",
            get(auth::register_page).merge(post(auth::register).layer(limiter.clone())),
        )
        .route("/logout", post(auth::logout))
        .route("/auth/verify-email-address", get(auth::verify_email))
        .route(
            "/auth/forgot-password",
            get(auth::forgot_password_page)
                .merge(post(auth::forgot_password).layer(limiter.clone())),
        )
        .route(
            "/reset-password",
            get(auth::reset_password_page).merge(post(auth::reset_password).layer(limiter)),
        )
        .route("/auth/google/success", get(sso::google_success))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items/{id}/quantity", post(cart::update_quantity))
        .route("/items/{id}/delete", post(cart::remove))
        .route("/coupon", post(cart::apply_coupon))
        .route("/coupon/remove", post(cart::remove_coupon))
        .route("/delivery", post(cart::set_delivery))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", post(checkout::start))
        .route("/checkout/review", get(checkout::review))
        .route("/checkout/confirm", post(checkout::confirm))
        .route("/orders/confirmation", get(checkout::confirmation))
}

/// Create the delivery fee admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/delivery-fees",
            get(delivery_fees::index).post(delivery_fees::create),
        )
        .route("/delivery-fees/{id}", post(delivery_fees::update))
        .route("/delivery-fees/{id}/edit", get(delivery_fees::edit))
        .route("/delivery-fees/{id}/delete", post(delivery_fees::delete))
        .route("/delivery-fees/{id}/toggle", post(delivery_fees::toggle))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .merge(auth_routes())
        .route("/profile", get(profile::show))
        .nest("/cart", cart_routes())
        .merge(checkout_routes())
        .nest("/admin", admin_routes())
}
