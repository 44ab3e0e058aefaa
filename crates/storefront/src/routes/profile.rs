//! Profile page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use chicken_one_core::has_staff_role;
use tracing::instrument;

use crate::api::Profile;
use crate::error::Result;
use crate::filters;
use crate::layout::LayoutContext;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub layout: LayoutContext,
    pub profile: Profile,
    pub full_name: String,
    pub is_staff: bool,
}

/// Display the signed-in user's profile.
#[instrument(skip(state, layout, user), fields(email = %user.email))]
pub async fn show(
    State(state): State<AppState>,
    layout: LayoutContext,
    RequireAuth(user): RequireAuth,
) -> Result<Response> {
    let profile = state.api().profile(&user.token).await?;

    Ok(ProfileTemplate {
        layout,
        full_name: profile.full_name(),
        is_staff: has_staff_role(&profile.roles),
        profile,
    }
    .into_response())
}
