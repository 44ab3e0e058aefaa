//! Integration tests for staff delivery area management.
//!
//! Seeded areas: Zamalek (Downtown, active) and Degla (Maadi, inactive).

use chicken_one_integration_tests::backend::{STAFF_EMAIL, STAFF_PASSWORD};
use chicken_one_integration_tests::{TestContext, location};

const LIST: &str = "/admin/delivery-fees";

async fn signed_in_staff() -> TestContext {
    let ctx = TestContext::start().await;
    ctx.sign_in(STAFF_EMAIL, STAFF_PASSWORD).await;
    ctx
}

fn area_form<'a>(branch: &'a str, name: &'a str, fee: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("branch_id", branch),
        ("area_name", name),
        ("fee", fee),
        ("estimated_time_min", "20"),
        ("estimated_time_max", "40"),
        ("is_active", "on"),
    ]
}

// ============================================================================
// List, search & filter
// ============================================================================

#[tokio::test]
async fn test_list_shows_areas_with_branch_names() {
    let ctx = signed_in_staff().await;

    let body = ctx.page(LIST).await;
    assert!(body.contains("2 areas &middot; 1 active"));
    assert!(body.contains("Zamalek"));
    assert!(body.contains("Degla"));
    assert!(body.contains("<dd>Downtown</dd>"));
    assert!(body.contains("<dd>Maadi</dd>"));
    assert!(body.contains("25.00 EGP"));
    assert!(body.contains("20-35 min"));
    assert!(body.contains("<dd>2026-09-01</dd>"));
    assert!(body.contains("Add delivery area"));
}

#[tokio::test]
async fn test_search_and_status_filter() {
    let ctx = signed_in_staff().await;

    let body = ctx.page(&format!("{LIST}?search=zam")).await;
    assert!(body.contains("Zamalek"));
    assert!(!body.contains("Degla"));

    let body = ctx.page(&format!("{LIST}?filter=inactive")).await;
    assert!(body.contains("Degla"));
    assert!(!body.contains("Zamalek"));
    // Counts always cover every area.
    assert!(body.contains("2 areas &middot; 1 active"));

    let body = ctx
        .page(&format!("{LIST}?filter=active&search=degla"))
        .await;
    assert!(body.contains("No delivery areas match your search."));
}

#[tokio::test]
async fn test_branches_are_cached_between_pages() {
    let ctx = signed_in_staff().await;

    ctx.page(LIST).await;
    ctx.page(LIST).await;
    ctx.page(&format!("{LIST}/1/edit")).await;
    assert_eq!(ctx.backend.state().branch_fetches, 1);
}

// ============================================================================
// Create, update, delete, toggle
// ============================================================================

#[tokio::test]
async fn test_create_area() {
    let ctx = signed_in_staff().await;

    let response = ctx
        .post_form(LIST, &area_form("2", "  Nasr City ", "22.50"))
        .await;
    assert_eq!(location(&response), format!("{LIST}?success=created"));

    {
        let state = ctx.backend.state();
        let area = state
            .areas
            .iter()
            .find(|a| a.area_name == "Nasr City")
            .expect("area should be created");
        assert_eq!(area.branch_id, 2);
        assert!((area.fee - 22.5).abs() < f64::EPSILON);
        assert!(area.is_active);
    }

    let body = ctx.page(&format!("{LIST}?success=created")).await;
    assert!(body.contains("A new delivery area was added."));
    assert!(body.contains("3 areas &middot; 2 active"));
}

#[tokio::test]
async fn test_invalid_form_is_rerendered_without_calling_the_api() {
    let ctx = signed_in_staff().await;

    let response = ctx.post_form(LIST, &area_form("1", "Heliopolis", "cheap")).await;
    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("Failed to read response");
    assert!(body.contains("Fee must be a number"));
    assert!(body.contains(r#"value="Heliopolis""#));
    assert!(body.contains(r#"<option value="1" selected>Downtown</option>"#));

    let response = ctx.post_form(LIST, &area_form("1", "", "10")).await;
    let body = response.text().await.expect("Failed to read response");
    assert!(body.contains("Please fill in all required fields"));

    let response = ctx.post_form(LIST, &area_form("1", "Heliopolis", "-15")).await;
    let body = response.text().await.expect("Failed to read response");
    assert!(body.contains("Fee cannot be negative"));

    assert_eq!(ctx.backend.state().areas.len(), 2);
}

#[tokio::test]
async fn test_api_rejection_message_is_shown() {
    let ctx = signed_in_staff().await;

    let response = ctx.post_form(LIST, &area_form("1", "zamalek", "30")).await;
    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("Failed to read response");
    assert!(body.contains("Delivery area already exists"));
    assert_eq!(ctx.backend.state().areas.len(), 2);
}

#[tokio::test]
async fn test_edit_and_update_area() {
    let ctx = signed_in_staff().await;

    let body = ctx.page(&format!("{LIST}/2/edit")).await;
    assert!(body.contains("Edit delivery area"));
    assert!(body.contains(&format!(r#"action="{LIST}/2""#)));
    assert!(body.contains(r#"value="15.50""#));
    assert!(body.contains(r#"<option value="2" selected>Maadi</option>"#));

    let mut form = area_form("2", "Degla", "18");
    form.retain(|(name, _)| *name != "is_active");
    let response = ctx.post_form(&format!("{LIST}/2"), &form).await;
    assert_eq!(location(&response), format!("{LIST}?success=updated"));

    let state = ctx.backend.state();
    let area = state
        .areas
        .iter()
        .find(|a| a.id == 2)
        .expect("area 2 should exist");
    assert!((area.fee - 18.0).abs() < f64::EPSILON);
    assert_eq!(area.estimated_time_max, 40);
    assert!(!area.is_active);
}

#[tokio::test]
async fn test_edit_unknown_area() {
    let ctx = signed_in_staff().await;

    let response = ctx.get(&format!("{LIST}/404/edit")).await;
    assert_eq!(location(&response), format!("{LIST}?error=not_found"));
    assert!(
        ctx.page(&format!("{LIST}?error=not_found"))
            .await
            .contains("That delivery area no longer exists.")
    );
}

#[tokio::test]
async fn test_toggle_and_delete() {
    let ctx = signed_in_staff().await;

    let response = ctx.post_form(&format!("{LIST}/1/toggle"), &[]).await;
    assert_eq!(location(&response), format!("{LIST}?success=status_updated"));
    assert!(!ctx.backend.state().areas[0].is_active);

    let body = ctx.page(&format!("{LIST}?success=status_updated")).await;
    assert!(body.contains("The delivery area status was updated."));
    assert!(body.contains("2 areas &middot; 0 active"));

    let response = ctx.post_form(&format!("{LIST}/1/delete"), &[]).await;
    assert_eq!(location(&response), format!("{LIST}?success=deleted"));
    assert!(ctx.backend.state().areas.iter().all(|a| a.id != 1));

    let response = ctx.post_form(&format!("{LIST}/1/delete"), &[]).await;
    assert_eq!(location(&response), format!("{LIST}?error=delete_failed"));
}
