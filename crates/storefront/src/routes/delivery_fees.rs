//! Delivery fee management for staff.
//!
//! One page lists every delivery area with search and a status filter, next
//! to a form that either creates a new area or edits the selected one.
//! Only users whose profile carries a staff role get in; see
//! [`RequireStaff`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chicken_one_core::{
    AreaFilter, AreaQuery, BranchId, DeliveryAreaForm, DeliveryAreaId, DeliveryAreaInput, Price,
    estimated_time_label,
};
use serde::Deserialize;
use tracing::instrument;

use crate::api::{ApiError, Branch, DeliveryArea};
use crate::error::{AppError, Result};
use crate::filters;
use crate::layout::LayoutContext;
use crate::middleware::RequireStaff;
use crate::state::AppState;

const LIST_PATH: &str = "/admin/delivery-fees";
const UNKNOWN_BRANCH: &str = "Unknown branch";
const SAVE_FAILED: &str = "Failed to save the delivery area.";

// =============================================================================
// Query Types
// =============================================================================

/// List page query: search, status filter and flash codes.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub filter: AreaFilter,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl ListQuery {
    fn area_query(&self) -> AreaQuery {
        AreaQuery {
            filter: self.filter,
            search: self.search.clone(),
        }
    }
}

// =============================================================================
// View Types
// =============================================================================

/// Delivery area row for templates.
#[derive(Debug, Clone)]
pub struct AreaView {
    pub id: DeliveryAreaId,
    pub area_name: String,
    pub branch_name: String,
    pub fee: String,
    pub time_label: String,
    pub is_active: bool,
    pub created_at: Option<String>,
}

impl AreaView {
    fn new(area: &DeliveryArea, branches: &[Branch]) -> Self {
        Self {
            id: area.id,
            area_name: area.area_name.clone(),
            branch_name: branch_name(branches, area.branch_id).to_string(),
            fee: Price::new(area.fee).display(),
            time_label: estimated_time_label(area.estimated_time_min, area.estimated_time_max),
            is_active: area.is_active,
            created_at: area
                .created_at
                .as_deref()
                .map(|s| s.split('T').next().unwrap_or(s).to_string()),
        }
    }
}

/// Branch choice in the form's select.
#[derive(Debug, Clone)]
pub struct BranchOption {
    pub id: BranchId,
    pub name: String,
    pub selected: bool,
}

/// Status filter tab.
#[derive(Debug, Clone)]
pub struct FilterTab {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// The create/edit form beside the list.
#[derive(Debug, Clone)]
pub struct FormView {
    /// Set when editing an existing area.
    pub editing: Option<DeliveryAreaId>,
    pub action: String,
    pub values: DeliveryAreaForm,
    pub is_active: bool,
}

impl FormView {
    fn create() -> Self {
        Self {
            editing: None,
            action: LIST_PATH.to_string(),
            values: DeliveryAreaForm::default(),
            is_active: true,
        }
    }

    fn edit(area: &DeliveryArea) -> Self {
        Self {
            editing: Some(area.id),
            action: format!("{LIST_PATH}/{}", area.id),
            values: DeliveryAreaForm {
                branch_id: area.branch_id.to_string(),
                area_name: area.area_name.clone(),
                fee: Price::new(area.fee).plain(),
                estimated_time_min: area.estimated_time_min.to_string(),
                estimated_time_max: area.estimated_time_max.to_string(),
                is_active: area.is_active.then(|| "on".to_string()),
            },
            is_active: area.is_active,
        }
    }

    /// Echo a rejected submission back into the form.
    fn resubmit(editing: Option<DeliveryAreaId>, values: DeliveryAreaForm) -> Self {
        let action = editing.map_or_else(|| LIST_PATH.to_string(), |id| format!("{LIST_PATH}/{id}"));
        Self {
            editing,
            action,
            is_active: values.is_active.is_some(),
            values,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Delivery fee management page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/delivery_fees.html")]
pub struct DeliveryFeesTemplate {
    pub layout: LayoutContext,
    pub areas: Vec<AreaView>,
    pub total_count: usize,
    pub active_count: usize,
    pub search: String,
    pub filters: Vec<FilterTab>,
    pub narrowed: bool,
    pub branches: Vec<BranchOption>,
    pub form: FormView,
    pub error: Option<String>,
    pub success: Option<&'static str>,
}

// =============================================================================
// Helpers
// =============================================================================

/// Branch name for an ID, or a placeholder when the branch is unknown.
fn branch_name(branches: &[Branch], id: BranchId) -> &str {
    branches
        .iter()
        .find(|b| b.id == id)
        .map_or(UNKNOWN_BRANCH, |b| b.name.as_str())
}

fn error_message(code: &str) -> &'static str {
    match code {
        "not_found" => "That delivery area no longer exists.",
        "delete_failed" => "Failed to delete the delivery area.",
        "toggle_failed" => "Failed to update the delivery area status.",
        _ => "Something went wrong. Please try again.",
    }
}

fn success_message(code: &str) -> Option<&'static str> {
    match code {
        "created" => Some("A new delivery area was added."),
        "updated" => Some("The delivery area was updated."),
        "deleted" => Some("The delivery area was deleted."),
        "status_updated" => Some("The delivery area status was updated."),
        _ => None,
    }
}

fn filter_tabs(selected: AreaFilter) -> Vec<FilterTab> {
    AreaFilter::ALL
        .iter()
        .map(|&f| FilterTab {
            value: f.as_str(),
            label: f.label(),
            selected: f == selected,
        })
        .collect()
}

/// Redirect to the list with an error flash; an expired token still sends
/// the user to sign in.
fn flash_failure(error: ApiError, code: &str) -> Result<Response> {
    if matches!(error, ApiError::Unauthorized) {
        return Err(AppError::Api(error));
    }
    tracing::warn!(error = %error, code, "Delivery area update failed");
    Ok(Redirect::to(&format!("{LIST_PATH}?error={code}")).into_response())
}

/// Everything the page shows apart from the form.
struct PageData {
    areas: Vec<DeliveryArea>,
    branches: Vec<Branch>,
}

impl PageData {
    async fn load(state: &AppState, token: &str) -> Result<Self> {
        let areas = state.api().delivery_fees(token).await?;
        let branches = match state.api().branches(token).await {
            Ok(branches) => branches,
            Err(ApiError::Unauthorized) => return Err(ApiError::Unauthorized.into()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load branches");
                Vec::new()
            }
        };
        Ok(Self { areas, branches })
    }

    fn render(
        self,
        layout: LayoutContext,
        query: &AreaQuery,
        form: FormView,
        error: Option<String>,
        success: Option<&'static str>,
    ) -> Response {
        let selected_branch = form.values.branch_id.trim().parse::<BranchId>().ok();
        let branches = self
            .branches
            .iter()
            .map(|b| BranchOption {
                id: b.id,
                name: b.name.clone(),
                selected: Some(b.id) == selected_branch,
            })
            .collect();

        DeliveryFeesTemplate {
            layout,
            total_count: self.areas.len(),
            active_count: self.areas.iter().filter(|a| a.is_active).count(),
            areas: self
                .areas
                .iter()
                .filter(|a| query.matches(&a.area_name, a.is_active))
                .map(|a| AreaView::new(a, &self.branches))
                .collect(),
            search: query.search.clone(),
            filters: filter_tabs(query.filter),
            narrowed: query.is_narrowed(),
            branches,
            form,
            error,
            success,
        }
        .into_response()
    }
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Display the delivery area list with an empty form.
#[instrument(skip(state, layout, staff, query), fields(email = %staff.profile.email))]
pub async fn index(
    State(state): State<AppState>,
    layout: LayoutContext,
    staff: RequireStaff,
    Query(query): Query<ListQuery>,
) -> Result<Response> {
    let page = PageData::load(&state, &staff.user.token).await?;

    Ok(page.render(
        layout,
        &query.area_query(),
        FormView::create(),
        query.error.as_deref().map(|c| error_message(c).to_string()),
        query.success.as_deref().and_then(success_message),
    ))
}

/// Display the list with the form filled in for one area.
#[instrument(skip(state, layout, staff, query), fields(email = %staff.profile.email))]
pub async fn edit(
    State(state): State<AppState>,
    layout: LayoutContext,
    staff: RequireStaff,
    Path(id): Path<DeliveryAreaId>,
    Query(query): Query<ListQuery>,
) -> Result<Response> {
    let page = PageData::load(&state, &staff.user.token).await?;

    let Some(form) = page.areas.iter().find(|a| a.id == id).map(FormView::edit) else {
        return Ok(Redirect::to(&format!("{LIST_PATH}?error=not_found")).into_response());
    };

    Ok(page.render(layout, &query.area_query(), form, None, None))
}

/// Create a delivery area.
#[instrument(skip(state, layout, staff, form), fields(email = %staff.profile.email))]
pub async fn create(
    State(state): State<AppState>,
    layout: LayoutContext,
    staff: RequireStaff,
    Form(form): Form<DeliveryAreaForm>,
) -> Result<Response> {
    save(&state, layout, &staff, None, form).await
}

/// Update a delivery area.
#[instrument(skip(state, layout, staff, form), fields(email = %staff.profile.email))]
pub async fn update(
    State(state): State<AppState>,
    layout: LayoutContext,
    staff: RequireStaff,
    Path(id): Path<DeliveryAreaId>,
    Form(form): Form<DeliveryAreaForm>,
) -> Result<Response> {
    save(&state, layout, &staff, Some(id), form).await
}

/// Validate and send a create or update; failures re-render the form.
async fn save(
    state: &AppState,
    layout: LayoutContext,
    staff: &RequireStaff,
    editing: Option<DeliveryAreaId>,
    form: DeliveryAreaForm,
) -> Result<Response> {
    let token = &staff.user.token;

    let message = match DeliveryAreaInput::parse(&form) {
        Err(e) => e.to_string(),
        Ok(input) => {
            let sent = match editing {
                Some(id) => state.api().update_delivery_fee(token, id, &input).await,
                None => state.api().add_delivery_fee(token, &input).await,
            };

            match sent {
                Ok(()) => {
                    let code = if editing.is_some() { "updated" } else { "created" };
                    tracing::info!(area = %input.area_name, code, "Delivery area saved");
                    return Ok(Redirect::to(&format!("{LIST_PATH}?success={code}")).into_response());
                }
                Err(ApiError::Unauthorized) => return Err(ApiError::Unauthorized.into()),
                Err(e) => {
                    tracing::warn!(error = %e, "Delivery area save failed");
                    e.user_message().unwrap_or(SAVE_FAILED).to_string()
                }
            }
        }
    };

    let page = PageData::load(state, token).await?;
    Ok(page.render(
        layout,
        &AreaQuery::default(),
        FormView::resubmit(editing, form),
        Some(message),
        None,
    ))
}

/// Delete a delivery area.
#[instrument(skip(state, staff), fields(email = %staff.profile.email))]
pub async fn delete(
    State(state): State<AppState>,
    staff: RequireStaff,
    Path(id): Path<DeliveryAreaId>,
) -> Result<Response> {
    match state.api().delete_delivery_fee(&staff.user.token, id).await {
        Ok(()) => Ok(Redirect::to(&format!("{LIST_PATH}?success=deleted")).into_response()),
        Err(e) => flash_failure(e, "delete_failed"),
    }
}

/// Flip a delivery area between active and inactive.
#[instrument(skip(state, staff), fields(email = %staff.profile.email))]
pub async fn toggle(
    State(state): State<AppState>,
    staff: RequireStaff,
    Path(id): Path<DeliveryAreaId>,
) -> Result<Response> {
    match state.api().toggle_delivery_fee(&staff.user.token, id).await {
        Ok(()) => Ok(Redirect::to(&format!("{LIST_PATH}?success=status_updated")).into_response()),
        Err(e) => flash_failure(e, "toggle_failed"),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn branches() -> Vec<Branch> {
        vec![
            Branch {
                id: BranchId::new(1),
                name: "Nasr City".to_string(),
            },
            Branch {
                id: BranchId::new(2),
                name: "Maadi".to_string(),
            },
        ]
    }

    fn area(id: i32, branch: i32, active: bool) -> DeliveryArea {
        DeliveryArea {
            id: DeliveryAreaId::new(id),
            branch_id: BranchId::new(branch),
            area_name: "Zamalek".to_string(),
            fee: Decimal::new(2500, 2),
            estimated_time_min: 20,
            estimated_time_max: 35,
            is_active: active,
            created_at: Some("2026-03-14T09:30:00Z".to_string()),
        }
    }

    #[test]
    fn test_branch_name_falls_back_for_unknown_branch() {
        let branches = branches();
        assert_eq!(branch_name(&branches, BranchId::new(2)), "Maadi");
        assert_eq!(branch_name(&branches, BranchId::new(9)), "Unknown branch");
        assert_eq!(branch_name(&[], BranchId::new(1)), "Unknown branch");
    }

    #[test]
    fn test_area_view_formats_fee_time_and_date() {
        let view = AreaView::new(&area(4, 1, true), &branches());
        assert_eq!(view.branch_name, "Nasr City");
        assert_eq!(view.fee, "25.00 EGP");
        assert_eq!(view.time_label, "20-35 min");
        assert_eq!(view.created_at.as_deref(), Some("2026-03-14"));
    }

    #[test]
    fn test_edit_form_prefills_values() {
        let form = FormView::edit(&area(4, 2, false));
        assert_eq!(form.editing, Some(DeliveryAreaId::new(4)));
        assert_eq!(form.action, "/admin/delivery-fees/4");
        assert_eq!(form.values.branch_id, "2");
        assert_eq!(form.values.fee, "25.00");
        assert_eq!(form.values.estimated_time_max, "35");
        assert!(!form.is_active);
    }

    #[test]
    fn test_resubmitted_form_keeps_checkbox_state() {
        let values = DeliveryAreaForm {
            area_name: "Dokki".to_string(),
            is_active: None,
            ..DeliveryAreaForm::default()
        };
        let form = FormView::resubmit(None, values);
        assert_eq!(form.action, "/admin/delivery-fees");
        assert!(!form.is_active);
        assert_eq!(form.values.area_name, "Dokki");
    }

    #[test]
    fn test_filter_tabs_mark_selection() {
        let tabs = filter_tabs(AreaFilter::Inactive);
        assert_eq!(tabs.len(), 3);
        assert!(tabs.iter().filter(|t| t.selected).all(|t| t.value == "inactive"));
        assert_eq!(tabs.iter().filter(|t| t.selected).count(), 1);
    }

    #[test]
    fn test_flash_codes() {
        assert_eq!(success_message("created"), Some("A new delivery area was added."));
        assert_eq!(success_message("bogus"), None);
        assert_eq!(
            error_message("toggle_failed"),
            "Failed to update the delivery area status."
        );
    }
}
