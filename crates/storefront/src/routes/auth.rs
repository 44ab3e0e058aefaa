//! Authentication route handlers.
//!
//! Handles sign-in, registration, email confirmation and password recovery
//! against the Chicken One auth endpoints. Sign-in stores a [`CurrentUser`]
//! in the server session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chicken_one_core::{Email, PasswordCheck, PasswordRule};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::{ApiError, RegisterRequest};
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::layout::{LayoutContext, MessageQuery};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::state::AppState;

const RESET_SUCCESS_DEFAULT: &str = "Your password has been reset successfully.";
const RESET_FAILURE_DEFAULT: &str = "An error occurred while resetting your password.";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

/// Forgot password form data.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    #[serde(default)]
    pub email: String,
}

/// Reset password form data. `email` and `code` ride along as hidden fields.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// The `email` and `code` pair from a confirmation or reset link.
#[derive(Debug, Default, Deserialize)]
pub struct LinkQuery {
    pub email: Option<String>,
    pub code: Option<String>,
}

impl LinkQuery {
    fn parts(&self) -> Option<(&str, &str)> {
        let email = self.email.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let code = self.code.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        Some((email, code))
    }
}

// =============================================================================
// View Types
// =============================================================================

/// One line of the password requirement checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleView {
    pub label: &'static str,
    pub met: bool,
}

fn checklist(check: &PasswordCheck) -> Vec<RuleView> {
    PasswordRule::ALL
        .iter()
        .map(|&rule| RuleView {
            label: rule.label(),
            met: check.passes(rule),
        })
        .collect()
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub layout: LayoutContext,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub layout: LayoutContext,
    pub error: Option<String>,
    pub form: RegisterForm,
    pub rules: Vec<RuleView>,
}

/// Email confirmation result page.
#[derive(Template, WebTemplate)]
#[template(path = "auth/verify_email.html")]
pub struct VerifyEmailTemplate {
    pub layout: LayoutContext,
    pub error: Option<String>,
    pub success: Option<&'static str>,
}

/// Forgot password page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/forgot_password.html")]
pub struct ForgotPasswordTemplate {
    pub layout: LayoutContext,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// Reset password page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/reset_password.html")]
pub struct ResetPasswordTemplate {
    pub layout: LayoutContext,
    pub email: String,
    pub code: String,
    /// False when the link is missing its email or code.
    pub link_valid: bool,
    /// Set once the API accepted the new password.
    pub completed: bool,
    pub error: Option<String>,
    pub success: Option<String>,
    pub rules: Vec<RuleView>,
}

// =============================================================================
// Flash Messages
// =============================================================================

fn login_error(code: &str) -> &'static str {
    match code {
        "missing_fields" => "Please enter your email and password.",
        "invalid_email" => "Please enter a valid email address.",
        "credentials" => "Invalid email or password.",
        "session" => "We could not sign you in. Please try again.",
        "session_expired" => "Your session has expired. Please sign in again.",
        "google_failed" => "Unable to login with Google. Please try again.",
        "unavailable" => "Please check your connection or try again later.",
        _ => "Something went wrong. Please try again.",
    }
}

fn login_success(code: &str) -> Option<&'static str> {
    match code {
        "registered" => Some("Account created! Check your email to confirm your address."),
        "confirmed" => Some("Your email is confirmed. You can sign in now."),
        _ => None,
    }
}

fn forgot_error(code: &str) -> &'static str {
    match code {
        "missing_email" => "Please enter your email address.",
        "invalid_email" => "Please enter a valid email address.",
        _ => "We could not send the reset link. Please try again.",
    }
}

fn forgot_success(code: &str) -> Option<&'static str> {
    (code == "sent").then_some("If an account exists for that email, a reset link is on its way.")
}

/// Flash code for a failed sign-in call.
fn login_failure_code(error: &ApiError) -> &'static str {
    match error {
        ApiError::Http(_) => "unavailable",
        _ => "credentials",
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(layout: LayoutContext, Query(query): Query<MessageQuery>) -> Response {
    LoginTemplate {
        layout,
        error: query.error.as_deref().map(login_error),
        success: query.success.as_deref().and_then(login_success),
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    if form.email.trim().is_empty() || form.password.is_empty() {
        return Redirect::to("/login?error=missing_fields").into_response();
    }

    let Ok(email) = Email::parse(&form.email) else {
        return Redirect::to("/login?error=invalid_email").into_response();
    };

    let response = match state.api().login(email.as_str(), &form.password).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            let code = login_failure_code(&e);
            return Redirect::to(&format!("/login?error={code}")).into_response();
        }
    };

    let Some(user) = CurrentUser::from_auth(response, email.as_str()) else {
        return Redirect::to("/login?error=credentials").into_response();
    };

    if let Err(e) = set_current_user(&session, &user).await {
        tracing::error!("Failed to set session: {}", e);
        return Redirect::to("/login?error=session").into_response();
    }

    set_sentry_user(&user.email);
    tracing::info!(email = %user.email, "User signed in");
    Redirect::to("/").into_response()
}

/// Handle logout.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }
    clear_sentry_user();
    Redirect::to("/").into_response()
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(layout: LayoutContext) -> Response {
    RegisterTemplate {
        layout,
        error: None,
        form: RegisterForm::default(),
        rules: checklist(&PasswordCheck::evaluate("", "")),
    }
    .into_response()
}

/// Handle registration form submission.
///
/// Failures re-render the form with the entered values; success sends the
/// visitor to sign in once they have confirmed their email.
#[instrument(skip(state, layout, form))]
pub async fn register(
    State(state): State<AppState>,
    layout: LayoutContext,
    Form(form): Form<RegisterForm>,
) -> Response {
    let check = PasswordCheck::evaluate(&form.password, &form.password_confirm);
    let rerender = |form: RegisterForm, error: String| {
        RegisterTemplate {
            layout: layout.clone(),
            error: Some(error),
            rules: checklist(&check),
            form: RegisterForm {
                password: String::new(),
                password_confirm: String::new(),
                ..form
            },
        }
        .into_response()
    };

    if form.first_name.trim().is_empty()
        || form.last_name.trim().is_empty()
        || form.email.trim().is_empty()
        || form.password.is_empty()
    {
        return rerender(form, "Please fill in all required fields.".to_string());
    }

    let email = match Email::parse(&form.email) {
        Ok(email) => email,
        Err(e) => return rerender(form, format!("Please check your email: {e}.")),
    };

    if !check.is_valid() {
        return rerender(
            form,
            "Password does not meet requirements. Please make sure all password rules are satisfied."
                .to_string(),
        );
    }

    let phone = form.phone_number.trim();
    let request = RegisterRequest {
        first_name: form.first_name.trim(),
        last_name: form.last_name.trim(),
        email: email.as_str(),
        phone_number: (!phone.is_empty()).then_some(phone),
        password: &form.password,
    };

    match state.api().register(&request).await {
        Ok(()) => {
            tracing::info!(email = %email, "Account registered");
            Redirect::to("/login?success=registered").into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Registration failed");
            let message = e
                .user_message()
                .unwrap_or("Registration failed. Please try again.")
                .to_string();
            rerender(form, message)
        }
    }
}

// =============================================================================
// Email Confirmation
// =============================================================================

/// Confirm an email address from the link sent after registration.
#[instrument(skip(state, layout, query))]
pub async fn verify_email(
    State(state): State<AppState>,
    layout: LayoutContext,
    Query(query): Query<LinkQuery>,
) -> Response {
    let Some((email, code)) = query.parts() else {
        return VerifyEmailTemplate {
            layout,
            error: Some("This confirmation link is incomplete.".to_string()),
            success: None,
        }
        .into_response();
    };

    match state.api().confirm_email(email, code).await {
        Ok(()) => {
            tracing::info!(email = %email, "Email confirmed");
            VerifyEmailTemplate {
                layout,
                error: None,
                success: Some("Your email is confirmed. You can sign in now."),
            }
            .into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Email confirmation failed");
            VerifyEmailTemplate {
                layout,
                error: Some(
                    e.user_message()
                        .unwrap_or("We could not confirm your email. The link may have expired.")
                        .to_string(),
                ),
                success: None,
            }
            .into_response()
        }
    }
}

// =============================================================================
// Password Reset Routes
// =============================================================================

/// Display the forgot password page.
pub async fn forgot_password_page(
    layout: LayoutContext,
    Query(query): Query<MessageQuery>,
) -> Response {
    ForgotPasswordTemplate {
        layout,
        error: query.error.as_deref().map(forgot_error),
        success: query.success.as_deref().and_then(forgot_success),
    }
    .into_response()
}

/// Handle forgot password form submission.
#[instrument(skip(state, form))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Form(form): Form<ForgotPasswordForm>,
) -> Response {
    if form.email.trim().is_empty() {
        return Redirect::to("/auth/forgot-password?error=missing_email").into_response();
    }

    let Ok(email) = Email::parse(&form.email) else {
        return Redirect::to("/auth/forgot-password?error=invalid_email").into_response();
    };

    match state.api().forgot_password(email.as_str()).await {
        Ok(()) => Redirect::to("/auth/forgot-password?success=sent").into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Password recovery request failed");
            Redirect::to("/auth/forgot-password?error=failed").into_response()
        }
    }
}

/// Display the reset password form for a link's `email` and `code`.
pub async fn reset_password_page(layout: LayoutContext, Query(query): Query<LinkQuery>) -> Response {
    let link_valid = query.parts().is_some();

    ResetPasswordTemplate {
        layout,
        email: query.email.unwrap_or_default(),
        code: query.code.unwrap_or_default(),
        link_valid,
        completed: false,
        error: (!link_valid).then(|| "This reset link is invalid or incomplete.".to_string()),
        success: None,
        rules: checklist(&PasswordCheck::evaluate("", "")),
    }
    .into_response()
}

/// Handle reset password form submission.
///
/// Nothing is sent to the API until every password rule passes.
#[instrument(skip(state, layout, form))]
pub async fn reset_password(
    State(state): State<AppState>,
    layout: LayoutContext,
    Form(form): Form<ResetPasswordForm>,
) -> Response {
    let check = PasswordCheck::evaluate(&form.new_password, &form.confirm_password);
    let link_valid = !form.email.trim().is_empty() && !form.code.trim().is_empty();

    let mut page = ResetPasswordTemplate {
        layout,
        email: form.email.trim().to_string(),
        code: form.code.trim().to_string(),
        link_valid,
        completed: false,
        error: None,
        success: None,
        rules: checklist(&check),
    };

    if !link_valid {
        page.error = Some("This reset link is invalid or incomplete.".to_string());
        return page.into_response();
    }

    if !check.is_valid() {
        page.error = Some(
            "Password does not meet requirements. Please make sure all password rules are satisfied."
                .to_string(),
        );
        return page.into_response();
    }

    match state
        .api()
        .reset_password(&page.email, &page.code, &form.new_password)
        .await
    {
        Ok(response) => {
            tracing::info!(email = %page.email, "Password reset");
            page.completed = true;
            page.success = Some(
                response
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| RESET_SUCCESS_DEFAULT.to_string()),
            );
        }
        Err(e) => {
            tracing::warn!(error = %e, "Password reset failed");
            page.error = Some(e.user_message().unwrap_or(RESET_FAILURE_DEFAULT).to_string());
        }
    }

    page.into_response()
}
