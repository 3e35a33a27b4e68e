//! Product listing route handlers.
//!
//! The full page and the HTMX fragment share [`load_listing`]; the fragment
//! also tells HTMX which canonical URL to push, so the address bar always
//! shows the normalized filter state.
//!
//! Each rendered page gets a view id that its fragment requests send back in
//! [`LISTING_VIEW_HEADER`]. Requests carrying the same id share one
//! [`ListingSession`], so when a newer state supersedes one still in flight
//! the older response is answered with `204 No Content` and HTMX leaves the
//! listing alone.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::listing::{
    FetchOutcome, FilterState, ListingRenderer, ListingSession, ListingView, ProductQuery,
};
use crate::medusa::StoreClient;
use crate::state::AppState;

use super::views::{
    ChipView, FilterSectionView, GridView, LinkView, ListingPaths, SortOptionView, chips,
    filter_sections, sort_options,
};
use super::{country_code, region_for};

/// Header telling HTMX which URL to push into history.
pub const HX_PUSH_URL: &str = "hx-push-url";

/// Request header naming the listing view a fragment request comes from.
pub const LISTING_VIEW_HEADER: &str = "x-listing-view";

const MAX_VIEW_ID_LEN: usize = 64;

/// A breadcrumb trail entry; the last one has no link.
#[derive(Clone)]
pub struct Breadcrumb {
    pub label: &'static str,
    pub href: Option<String>,
}

/// Everything inside `#listing`: sidebar, chips, sort and grid.
#[derive(Clone)]
pub struct ListingSectionView {
    pub view_id: String,
    pub grid_path: String,
    pub sections: Vec<FilterSectionView>,
    pub chips: Vec<ChipView>,
    pub clear: Option<LinkView>,
    pub sort_options: Vec<SortOptionView>,
    pub grid: GridView,
    /// Shown while a fragment request is in flight.
    pub loading: GridView,
}

/// Listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "store/index.html")]
pub struct StoreTemplate {
    pub country: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub listing: ListingSectionView,
}

/// Listing fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/listing.html")]
pub struct ListingFragmentTemplate {
    pub listing: ListingSectionView,
}

/// Display the listing page.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Path(country): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<StoreTemplate> {
    let country = country_code(&country)?;
    let filters = FilterState::from_query(query.as_deref().unwrap_or_default());
    let view_id = Uuid::new_v4().to_string();
    let session = ListingSession::new(state.storefront().clone(), state.listing_cache().clone());
    let listing = load_listing(&state, &session, &country, &filters, view_id)
        .await?
        .ok_or_else(|| AppError::Internal("Listing superseded on first load".to_string()))?;

    Ok(StoreTemplate {
        breadcrumbs: vec![
            Breadcrumb {
                label: "Home",
                href: Some(format!("/{country}")),
            },
            Breadcrumb {
                label: "Store",
                href: None,
            },
        ],
        country,
        listing,
    })
}

/// Display the listing fragment (for HTMX).
///
/// Responds with `HX-Push-Url` set to the canonical page URL of the state,
/// or with `204 No Content` when a newer request from the same view has
/// replaced this one.
#[instrument(skip(state, headers))]
pub async fn grid(
    State(state): State<AppState>,
    Path(country): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Result<Response> {
    let country = country_code(&country)?;
    let filters = FilterState::from_query(query.as_deref().unwrap_or_default());

    let canonical = filters.to_query_string();
    add_breadcrumb("listing", "Changed listing", Some(&[("query", &canonical)]));

    let loaded = match view_id(&headers) {
        Some(view_id) => {
            let session = state
                .listing_views()
                .session(&view_id, state.storefront(), state.listing_cache())
                .await;
            load_listing(&state, &session, &country, &filters, view_id).await?
        }
        None => {
            let session =
                ListingSession::new(state.storefront().clone(), state.listing_cache().clone());
            load_listing(&state, &session, &country, &filters, Uuid::new_v4().to_string()).await?
        }
    };

    let Some(listing) = loaded else {
        debug!(query = %canonical, "Listing request superseded");
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let push_url = filters.href(&ListingPaths::for_country(&country).page);
    Ok((
        [(HX_PUSH_URL, push_url)],
        ListingFragmentTemplate { listing },
    )
        .into_response())
}

/// The view id a fragment request carries, if it is well formed.
fn view_id(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(LISTING_VIEW_HEADER)?.to_str().ok()?;
    let valid = !value.is_empty()
        && value.len() <= MAX_VIEW_ID_LEN
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    valid.then(|| value.to_string())
}

/// Resolve the region, fetch the page through `session` and build the
/// listing view.
///
/// Upstream failures become the error view; only an unknown country is an
/// error here. Returns `None` when the session dropped the result because a
/// newer query took over.
async fn load_listing(
    state: &AppState,
    session: &ListingSession<StoreClient>,
    country: &str,
    filters: &FilterState,
    view_id: String,
) -> Result<Option<ListingSectionView>> {
    let page_size = state.config().listing.page_size;
    let mut renderer = ListingRenderer::new(page_size, filters.page());

    match region_for(state, country).await {
        Ok(region) => {
            let query = ProductQuery::build(filters, page_size, &region.id);
            match session.fetch(query).await {
                FetchOutcome::Committed(fetched) => {
                    renderer.resolve(&fetched);
                }
                FetchOutcome::Stale => return Ok(None),
            }
        }
        Err(AppError::Medusa(e)) => {
            tracing::warn!(error = %e, country, "Region lookup failed");
            return Ok(Some(section(
                filters,
                country,
                view_id,
                page_size,
                ListingView::Error {
                    message: e.user_message().to_string(),
                },
            )));
        }
        Err(e) => return Err(e),
    }

    Ok(Some(section(
        filters,
        country,
        view_id,
        page_size,
        renderer.into_view(),
    )))
}

fn section(
    filters: &FilterState,
    country: &str,
    view_id: String,
    page_size: u32,
    view: ListingView,
) -> ListingSectionView {
    let paths = ListingPaths::for_country(country);
    let clear = (!filters.selection().is_empty()).then(|| LinkView {
        href: filters.clear_href(&paths.page),
        hx_get: filters.clear_href(&paths.grid),
    });

    ListingSectionView {
        sections: filter_sections(filters, &paths),
        chips: chips(filters, &paths),
        clear,
        sort_options: sort_options(filters, &paths),
        grid: GridView::new(view, filters, country),
        loading: GridView::new(
            ListingRenderer::new(page_size, filters.page()).into_view(),
            filters,
            country,
        ),
        view_id,
        grid_path: paths.grid,
    }
}
