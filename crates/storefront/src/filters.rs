//! Custom Askama template filters.

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

/// Human label for a catalog category ("electronics" -> "Electronics").
///
/// Usage in templates: `{{ category|category_label }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn category_label(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(bazaar_core::catalog::category_label(&value.to_string()))
}
