//! Integration tests for sign-in, registration and password recovery.
//!
//! Each test stays within the per-IP budget of five auth form posts.

use chicken_one_integration_tests::backend::{
    CONFIRM_CODE, CUSTOMER_EMAIL, CUSTOMER_PASSWORD, EXPIRED_RESET_CODE, PROVIDER_TOKEN, RESET_CODE,
};
use chicken_one_integration_tests::{TestContext, location};

// ============================================================================
// Sign-in
// ============================================================================

#[tokio::test]
async fn test_login_page_has_no_chrome() {
    let ctx = TestContext::start().await;

    let body = ctx.page("/login").await;
    assert!(body.contains("Welcome back"));
    assert!(body.contains("Continue with Google"));
    assert!(!body.contains(r#"class="navbar""#));
}

#[tokio::test]
async fn test_sign_in_and_out() {
    let ctx = TestContext::start().await;

    ctx.sign_in(CUSTOMER_EMAIL, CUSTOMER_PASSWORD).await;
    let home = ctx.page("/").await;
    assert!(home.contains(r#"<summary class="nav-user">Mona</summary>"#));

    let response = ctx.post_form("/logout", &[]).await;
    assert_eq!(location(&response), "/");

    let response = ctx.get("/cart").await;
    assert_eq!(location(&response), "/");
    assert!(ctx.page("/").await.contains("Get Started"));
}

#[tokio::test]
async fn test_wrong_password_is_reported() {
    let ctx = TestContext::start().await;

    let response = ctx
        .post_form(
            "/login",
            &[("email", CUSTOMER_EMAIL), ("password", "Wrong#Pass1")],
        )
        .await;
    assert_eq!(location(&response), "/login?error=credentials");

    let body = ctx.page("/login?error=credentials").await;
    assert!(body.contains("Invalid email or password."));
}

#[tokio::test]
async fn test_login_form_is_checked_before_calling_the_api() {
    let ctx = TestContext::start().await;

    let response = ctx
        .post_form("/login", &[("email", ""), ("password", "x")])
        .await;
    assert_eq!(location(&response), "/login?error=missing_fields");

    let response = ctx
        .post_form("/login", &[("email", "not-an-email"), ("password", "x")])
        .await;
    assert_eq!(location(&response), "/login?error=invalid_email");
}

#[tokio::test]
async fn test_sixth_auth_post_is_rate_limited() {
    let ctx = TestContext::start().await;

    for _ in 0..5 {
        let response = ctx
            .post_form("/login", &[("email", ""), ("password", "")])
            .await;
        assert!(response.status().is_redirection());
    }

    let response = ctx
        .post_form("/login", &[("email", ""), ("password", "")])
        .await;
    assert_eq!(response.status(), 429);

    // Pages themselves are not limited.
    assert_eq!(ctx.get("/login").await.status(), 200);
}

// ============================================================================
// Registration & confirmation
// ============================================================================

#[tokio::test]
async fn test_register_confirm_and_sign_in() {
    let ctx = TestContext::start().await;
    let email = "salma@chickenone.app";

    let weak = ctx
        .post_form(
            "/register",
            &[
                ("first_name", "Salma"),
                ("last_name", "Adel"),
                ("email", email),
                ("password", "short"),
                ("password_confirm", "short"),
            ],
        )
        .await;
    assert_eq!(weak.status(), 200);
    let body = weak.text().await.expect("Failed to read response");
    assert!(body.contains("Password does not meet requirements"));
    assert!(body.contains(r#"value="Salma""#));
    assert!(body.contains(r#"<li class="unmet">At least 8 characters</li>"#));

    let response = ctx
        .post_form(
            "/register",
            &[
                ("first_name", "Salma"),
                ("last_name", "Adel"),
                ("email", email),
                ("phone_number", "01000000000"),
                ("password", "Golden#Crust4"),
                ("password_confirm", "Golden#Crust4"),
            ],
        )
        .await;
    assert_eq!(location(&response), "/login?success=registered");
    assert!(
        !ctx.backend
            .state()
            .accounts
            .iter()
            .any(|a| a.email == email && a.confirmed)
    );

    let confirmed = ctx
        .page(&format!(
            "/auth/verify-email-address?email={email}&code={CONFIRM_CODE}"
        ))
        .await;
    assert!(confirmed.contains("Your email is confirmed. You can sign in now."));

    ctx.sign_in(email, "Golden#Crust4").await;
}

#[tokio::test]
async fn test_register_shows_api_message() {
    let ctx = TestContext::start().await;

    let response = ctx
        .post_form(
            "/register",
            &[
                ("first_name", "Mona"),
                ("last_name", "Tester"),
                ("email", CUSTOMER_EMAIL),
                ("password", "Another#Pass2"),
                ("password_confirm", "Another#Pass2"),
            ],
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("Failed to read response");
    assert!(body.contains("Email is already registered"));
}

#[tokio::test]
async fn test_bad_confirmation_links() {
    let ctx = TestContext::start().await;

    let body = ctx
        .page(&format!(
            "/auth/verify-email-address?email={CUSTOMER_EMAIL}&code=000000"
        ))
        .await;
    assert!(body.contains("Invalid confirmation code"));

    let body = ctx.page("/auth/verify-email-address?code=123").await;
    assert!(body.contains("This confirmation link is incomplete."));
}

// ============================================================================
// Password recovery
// ============================================================================

#[tokio::test]
async fn test_forgot_password_sends_link() {
    let ctx = TestContext::start().await;

    let response = ctx
        .post_form("/auth/forgot-password", &[("email", "")])
        .await;
    assert_eq!(
        location(&response),
        "/auth/forgot-password?error=missing_email"
    );

    let response = ctx
        .post_form("/auth/forgot-password", &[("email", CUSTOMER_EMAIL)])
        .await;
    assert_eq!(location(&response), "/auth/forgot-password?success=sent");
    assert_eq!(ctx.backend.state().reset_requests, vec![CUSTOMER_EMAIL]);

    let body = ctx.page("/auth/forgot-password?success=sent").await;
    assert!(body.contains("a reset link is on its way"));
}

#[tokio::test]
async fn test_reset_link_must_carry_email_and_code() {
    let ctx = TestContext::start().await;

    let body = ctx.page("/reset-password").await;
    assert!(body.contains("This reset link is invalid or incomplete."));
    assert!(body.contains(r#"href="/auth/forgot-password""#));
    assert!(!body.contains(r#"name="new_password""#));

    let body = ctx
        .page(&format!(
            "/reset-password?email={CUSTOMER_EMAIL}&code={RESET_CODE}"
        ))
        .await;
    assert!(body.contains(r#"name="new_password""#));
    assert!(body.contains(&format!(r#"name="code" value="{RESET_CODE}""#)));
}

#[tokio::test]
async fn test_reset_password_flow() {
    let ctx = TestContext::start().await;
    let new_password = "Fresh#Fries8";

    let mismatch = ctx
        .post_form(
            "/reset-password",
            &[
                ("email", CUSTOMER_EMAIL),
                ("code", RESET_CODE),
                ("new_password", new_password),
                ("confirm_password", "Fresh#Fries9"),
            ],
        )
        .await;
    let body = mismatch.text().await.expect("Failed to read response");
    assert!(body.contains("Password does not meet requirements"));
    assert!(body.contains(r#"<li class="unmet">Passwords match</li>"#));

    let wrong_code = ctx
        .post_form(
            "/reset-password",
            &[
                ("email", CUSTOMER_EMAIL),
                ("code", "999999"),
                ("new_password", new_password),
                ("confirm_password", new_password),
            ],
        )
        .await;
    let body = wrong_code.text().await.expect("Failed to read response");
    assert!(body.contains("Invalid or expired reset code"));

    let done = ctx
        .post_form(
            "/reset-password",
            &[
                ("email", CUSTOMER_EMAIL),
                ("code", RESET_CODE),
                ("new_password", new_password),
                ("confirm_password", new_password),
            ],
        )
        .await;
    let body = done.text().await.expect("Failed to read response");
    assert!(body.contains("Password has been reset successfully"));
    assert!(body.contains("Go to Sign In"));

    ctx.sign_in(CUSTOMER_EMAIL, new_password).await;
}

#[tokio::test]
async fn test_expired_reset_code_shows_api_message() {
    let ctx = TestContext::start().await;

    let response = ctx
        .post_form(
            "/reset-password",
            &[
                ("email", CUSTOMER_EMAIL),
                ("code", EXPIRED_RESET_CODE),
                ("new_password", "Fresh#Fries8"),
                ("confirm_password", "Fresh#Fries8"),
            ],
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("Failed to read response");
    assert!(body.contains("Reset code expired"));
}

// ============================================================================
// Identity provider
// ============================================================================

#[tokio::test]
async fn test_google_return_without_provider_session_fails() {
    let ctx = TestContext::start().await;

    let response = ctx.get("/auth/google/success").await;
    assert_eq!(location(&response), "/login?error=google_failed");

    let body = ctx.page("/login?error=google_failed").await;
    assert!(body.contains("Unable to login with Google. Please try again."));
}

#[tokio::test]
async fn test_google_return_signs_in() {
    let ctx = TestContext::start().await;
    ctx.set_cookie(&format!("__session={PROVIDER_TOKEN}"));

    let response = ctx.get("/auth/google/success").await;
    assert_eq!(location(&response), "/");

    let profile = ctx.page("/profile").await;
    assert!(profile.contains(CUSTOMER_EMAIL));
}

#[tokio::test]
async fn test_google_return_with_rejected_token_fails() {
    let ctx = TestContext::start().await;
    ctx.set_cookie("__session=someone-else");

    let response = ctx.get("/auth/google/success").await;
    assert_eq!(location(&response), "/login?error=google_failed");
    assert_eq!(ctx.get("/profile").await.status(), 303);
}
