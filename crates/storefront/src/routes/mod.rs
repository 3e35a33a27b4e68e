//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Liveness
//! GET  /health/ready                        - Readiness (Medusa reachable)
//! GET  /                                    - Redirect to the default country
//! GET  /static/*                            - Static assets
//!
//! # Country-scoped pages
//! GET  /{country}                           - Home (latest arrivals carousel)
//! GET  /{country}/store                     - Listing page (filters, sort, grid)
//! GET  /{country}/store/grid                - Listing fragment (HTMX)
//! GET  /{country}/products/{handle}         - Product detail
//! GET  /{country}/products/{handle}/quick-view - Quick view fragment (HTMX)
//! ```

pub mod health;
pub mod home;
pub mod products;
pub mod store;
pub mod views;

use axum::{
    Router,
    extract::State,
    middleware,
    response::{IntoResponse, Redirect},
    routing::get,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::error::{AppError, Result};
use crate::medusa::StoreRegion;
use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Directory served under `/static`.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Create the country-scoped page routes.
pub fn country_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/store", get(store::index))
        .route("/store/grid", get(store::grid))
        .route("/products/{handle}", get(products::show))
        .route("/products/{handle}/quick-view", get(products::quick_view))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_redirect))
        .nest("/{country}", country_routes())
}

/// The full application: routes, static files and middleware.
///
/// Sentry layers are added by the binary so tests can drive this router
/// without a Sentry client.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .fallback(not_found)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root_redirect(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&format!("/{}", state.config().default_country_code))
}

async fn not_found() -> impl IntoResponse {
    AppError::NotFound("page".to_string())
}

// =============================================================================
// Region resolution
// =============================================================================

/// Normalize a `{country}` path segment to a lowercase ISO 3166-1 alpha-2
/// code.
///
/// # Errors
///
/// Returns `NotFound` for anything that is not two ASCII letters, without
/// asking Medusa.
pub fn country_code(segment: &str) -> Result<String> {
    if segment.len() == 2 && segment.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(segment.to_ascii_lowercase())
    } else {
        Err(AppError::NotFound(format!("country '{segment}'")))
    }
}

/// Find the region serving a country.
///
/// # Errors
///
/// Returns `NotFound` when no region serves the country, or the Medusa error
/// when regions cannot be loaded.
pub async fn region_for(state: &AppState, country: &str) -> Result<StoreRegion> {
    state
        .storefront()
        .region_for_country(country)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("country '{country}'")))
}
