//! Integration tests for the route guard, staff gating and page chrome.

use chicken_one_integration_tests::backend::{
    CUSTOMER_EMAIL, CUSTOMER_PASSWORD, STAFF_EMAIL, STAFF_PASSWORD,
};
use chicken_one_integration_tests::{TestContext, location};

#[tokio::test]
async fn test_public_pages_render_for_visitors() {
    let ctx = TestContext::start().await;

    for path in [
        "/",
        "/login",
        "/register",
        "/auth/forgot-password",
        "/reset-password",
        "/health",
        "/health/ready",
    ] {
        let response = ctx.get(path).await;
        assert_eq!(response.status(), 200, "{path} should be public");
    }
}

#[tokio::test]
async fn test_private_pages_send_visitors_home() {
    let ctx = TestContext::start().await;

    for path in [
        "/cart",
        "/profile",
        "/checkout/review",
        "/orders/confirmation",
        "/admin/delivery-fees",
    ] {
        let response = ctx.get(path).await;
        assert_eq!(response.status(), 303, "{path} should be guarded");
        assert_eq!(location(&response), "/", "{path} should redirect home");
    }

    let response = ctx.post_form("/cart/coupon", &[("code", "SAVE25")]).await;
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_stylesheet_is_served() {
    let ctx = TestContext::start().await;

    let response = ctx.get("/static/css/main.css").await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_home_has_chrome_and_security_headers() {
    let ctx = TestContext::start().await;

    let response = ctx.get("/").await;
    assert_eq!(response.headers()["x-frame-options"], "DENY");
    assert!(response.headers().contains_key("x-request-id"));

    let body = response.text().await.expect("Failed to read response");
    assert!(body.contains(r#"class="navbar""#));
    assert!(body.contains("Main Courses"));
    assert!(body.contains(r#"class="footer""#));
}

#[tokio::test]
async fn test_customer_cannot_open_staff_pages() {
    let ctx = TestContext::start().await;
    ctx.sign_in(CUSTOMER_EMAIL, CUSTOMER_PASSWORD).await;

    let response = ctx.get("/admin/delivery-fees").await;
    assert_eq!(location(&response), "/");

    let response = ctx.post_form("/admin/delivery-fees/1/delete", &[]).await;
    assert_eq!(location(&response), "/");
    assert_eq!(ctx.backend.state().areas.len(), 2);

    let home = ctx.page("/").await;
    assert!(!home.contains("Delivery Fees"));
}

#[tokio::test]
async fn test_staff_sees_admin_link_and_profile_role() {
    let ctx = TestContext::start().await;
    ctx.sign_in(STAFF_EMAIL, STAFF_PASSWORD).await;

    let home = ctx.page("/").await;
    assert!(home.contains(r#"href="/admin/delivery-fees""#));

    let profile = ctx.page("/profile").await;
    assert!(profile.contains("<dd>Staff</dd>"));
    assert!(profile.contains("Manage delivery fees"));
    assert!(!profile.contains(r#"class="navbar""#));
}

#[tokio::test]
async fn test_expired_token_asks_to_sign_in_again() {
    let ctx = TestContext::start().await;
    ctx.sign_in(CUSTOMER_EMAIL, CUSTOMER_PASSWORD).await;
    ctx.backend.revoke_tokens();

    let response = ctx.get("/cart").await;
    assert_eq!(location(&response), "/login?error=session_expired");

    let body = ctx.page("/login?error=session_expired").await;
    assert!(body.contains("Your session has expired. Please sign in again."));
}
