//! Third-party sign-in return route.
//!
//! The hosted identity provider handles the Google handshake and leaves its
//! session JWT in the `__session` cookie on our domain. We trade that JWT for
//! an API token and sign the user in.

use axum::{
    extract::State,
    http::{HeaderMap, header::COOKIE},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::{Session, cookie::Cookie};
use tracing::instrument;

use crate::error::set_sentry_user;
use crate::middleware::set_current_user;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Cookie in which the identity provider stores its session JWT.
pub const PROVIDER_SESSION_COOKIE: &str = "__session";

const FAILURE_REDIRECT: &str = "/login?error=google_failed";

/// Read the identity provider's session token from the request cookies.
fn provider_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == PROVIDER_SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Complete a Google sign-in.
#[instrument(skip_all)]
pub async fn google_success(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Response {
    let Some(provider_token) = provider_token(&headers) else {
        tracing::warn!("Google sign-in returned without a provider session");
        return Redirect::to(FAILURE_REDIRECT).into_response();
    };

    let response = match state.api().clerk_login(&provider_token).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, "Provider token exchange failed");
            return Redirect::to(FAILURE_REDIRECT).into_response();
        }
    };

    let fallback_email = response.email.clone().unwrap_or_default();
    let Some(user) = CurrentUser::from_auth(response, &fallback_email) else {
        tracing::warn!("Provider token exchange returned no API token");
        return Redirect::to(FAILURE_REDIRECT).into_response();
    };

    if let Err(e) = set_current_user(&session, &user).await {
        tracing::error!("Failed to set session: {}", e);
        return Redirect::to(FAILURE_REDIRECT).into_response();
    }

    set_sentry_user(&user.email);
    tracing::info!(email = %user.email, "User signed in with Google");
    Redirect::to("/").into_response()
}
