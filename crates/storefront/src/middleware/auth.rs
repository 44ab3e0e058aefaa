//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring a signed-in user or a staff member in
//! route handlers, plus the guard that keeps anonymous visitors on public
//! pages.

use axum::{
    extract::{FromRequestParts, Request},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::api::Profile;
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Extractor that requires a signed-in user.
///
/// If nobody is signed in, returns a redirect to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication or staff access is required.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to login page.
    RedirectToLogin,
    /// Redirect to the home page (signed in, but not allowed here).
    RedirectHome,
    /// Session layer missing from the stack.
    NoSession,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::RedirectHome => Redirect::to("/").into_response(),
            Self::NoSession => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::NoSession)?;

        current_user(session)
            .await
            .map(Self)
            .ok_or(AuthRejection::RedirectToLogin)
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request if nobody is
/// signed in.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => current_user(session).await,
            None => None,
        };

        Ok(Self(user))
    }
}

/// Extractor that requires a staff member (Admin, Restaurant or Branch).
///
/// Roles are read from a fresh profile fetch rather than the session, so a
/// revoked role takes effect immediately. Anyone else is sent home.
pub struct RequireStaff {
    pub user: CurrentUser,
    pub profile: Profile,
}

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;

        let profile = match state.api().profile(&user.token).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(error = %e, "Profile check failed for staff page");
                return Err(AuthRejection::RedirectHome);
            }
        };

        if !chicken_one_core::has_staff_role(&profile.roles) {
            tracing::info!(email = %profile.email, "Non-staff user refused");
            return Err(AuthRejection::RedirectHome);
        }

        Ok(Self { user, profile })
    }
}

/// Read the signed-in user from the session.
pub async fn current_user(session: &Session) -> Option<CurrentUser> {
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

/// Helper to set the current user in the session.
///
/// Cycles the session ID first so a pre-login ID cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear everything from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

// =============================================================================
// Route guard
// =============================================================================

/// Pages anyone may open without signing in.
const PUBLIC_ROUTES: &[&str] = &[
    "/",
    "/login",
    "/register",
    "/auth",
    "/auth/verify-email-address",
    "/reset-password",
    "/product",
];

/// Infrastructure prefixes that are never guarded.
const PUBLIC_PREFIXES: &[&str] = &["/static", "/health"];

/// Whether `path` is reachable without a session user.
///
/// A route matches exactly or as a prefix followed by `/`, so `/product/7`
/// is public but `/products` is not. `/` only matches itself.
#[must_use]
pub fn is_public_path(path: &str) -> bool {
    let matches = |route: &str| {
        path == route
            || (route != "/"
                && path
                    .strip_prefix(route)
                    .is_some_and(|rest| rest.starts_with('/')))
    };

    PUBLIC_ROUTES.iter().any(|r| matches(r)) || PUBLIC_PREFIXES.iter().any(|p| matches(p))
}

/// Middleware that redirects anonymous requests for private pages to `/`.
pub async fn auth_guard_middleware(request: Request, next: Next) -> Response {
    let path = request.uri().path();
    if is_public_path(path) {
        return next.run(request).await;
    }

    let signed_in = match request.extensions().get::<Session>() {
        Some(session) => current_user(session).await.is_some(),
        None => false,
    };

    if signed_in {
        next.run(request).await
    } else {
        tracing::debug!(path = %path, "Anonymous request to private page");
        Redirect::to("/").into_response()
    }
}
