//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the URL of the fingerprinted stylesheet.
///
/// The hash is computed at build time from the CSS file content; when the
/// build could not hash it, the plain file is linked instead.
///
/// Usage in templates: `{{ ""|stylesheet }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn stylesheet(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(match env!("CSS_HASH") {
        "" => "/static/css/main.css".to_string(),
        hash => format!("/static/css/derived/main.{hash}.css"),
    })
}

/// Collapses a count into a singular or plural noun.
///
/// Usage in templates: `{{ count }} {{ count|items }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn items(count: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(if count.to_string() == "1" {
        "item"
    } else {
        "items"
    })
}
