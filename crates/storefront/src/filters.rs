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

/// Upper-cases a country code for display.
///
/// Usage in templates: `{{ country|country_label }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn country_label(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(value.to_string().to_ascii_uppercase())
}
