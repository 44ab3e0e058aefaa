//! Page chrome shared by every template.
//!
//! Handlers take a [`LayoutContext`] extractor and pass it to their template;
//! `base.html` reads it to decide whether to draw the navbar and footer and
//! who to greet.

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::Deserialize;

use crate::middleware::{CspNonce, OptionalAuth};

/// Flash codes carried on a redirect.
///
/// Each route module maps its own codes to user-facing text.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Pages rendered without navbar and footer.
const CHROMELESS_ROUTES: &[&str] = &[
    "/login",
    "/register",
    "/auth/verify-email-address",
    "/reset-password",
    "/profile",
];

/// Whether the navbar and footer are drawn on `path`.
#[must_use]
pub fn shows_chrome(path: &str) -> bool {
    !CHROMELESS_ROUTES.contains(&path)
}

/// Per-request data for the base layout.
#[derive(Debug, Clone, Default)]
pub struct LayoutContext {
    pub show_chrome: bool,
    /// Greeting name of the signed-in user.
    pub user_name: Option<String>,
    pub is_staff: bool,
    /// CSP nonce for the inline script in `base.html`.
    pub nonce: String,
    pub current_path: String,
}

impl LayoutContext {
    #[must_use]
    pub const fn signed_in(&self) -> bool {
        self.user_name.is_some()
    }
}

impl<S> FromRequestParts<S> for LayoutContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CspNonce(nonce) = CspNonce::from_request_parts(parts, state).await?;
        let OptionalAuth(user) = OptionalAuth::from_request_parts(parts, state).await?;
        let path = parts.uri.path().to_string();

        Ok(Self {
            show_chrome: shows_chrome(&path),
            user_name: user.as_ref().map(|u| u.display_name().to_string()),
            is_staff: user.as_ref().is_some_and(crate::models::CurrentUser::is_staff),
            nonce,
            current_path: path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_pages_hide_chrome() {
        for path in [
            "/login",
            "/register",
            "/auth/verify-email-address",
            "/reset-password",
            "/profile",
        ] {
            assert!(!shows_chrome(path), "{path} should hide chrome");
        }
    }

    #[test]
    fn test_other_pages_show_chrome() {
        for path in ["/", "/cart", "/admin/delivery-fees", "/auth/forgot-password"] {
            assert!(shows_chrome(path), "{path} should show chrome");
        }
    }
}
