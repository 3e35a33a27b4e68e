//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, header},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::listing::ProductQuery;
use crate::state::AppState;
use crate::widgets::{Carousel, DRAG_THRESHOLD_PX, visible_for_width};

use super::views::ProductCardView;
use super::{country_code, region_for};

/// Client hint carrying the layout viewport width in CSS pixels.
pub const VIEWPORT_WIDTH_HINT: &str = "sec-ch-viewport-width";

/// Assumed viewport width when the browser sends no hint.
const DEFAULT_VIEWPORT_WIDTH: u32 = 1280;

/// Home page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct HomeParams {
    /// First visible carousel card, for navigation without script.
    pub slide: Option<usize>,
}

/// Viewport width from the client hint, if the browser sent a usable one.
///
/// The hint may be fractional.
fn viewport_width(headers: &HeaderMap) -> u32 {
    headers
        .get(VIEWPORT_WIDTH_HINT)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|w| w.is_finite() && *w > 0.0)
        .map_or(DEFAULT_VIEWPORT_WIDTH, |w| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let width = w.min(f64::from(u32::MAX)) as u32;
            width
        })
}

// =============================================================================
// Carousel View
// =============================================================================

/// One pagination dot.
#[derive(Clone)]
pub struct DotView {
    pub index: usize,
    pub active: bool,
    pub href: String,
}

/// The "Latest Arrivals" carousel.
#[derive(Clone, Default)]
pub struct CarouselView {
    pub cards: Vec<ProductCardView>,
    pub dots: Vec<DotView>,
    pub shows_navigation: bool,
    pub interval_ms: u128,
    /// First visible card.
    pub index: usize,
    pub visible: usize,
    pub prev_href: String,
    pub next_href: String,
    pub drag_threshold_px: i32,
}

impl CarouselView {
    fn new(
        country: &str,
        cards: Vec<ProductCardView>,
        interval_ms: u128,
        visible: usize,
        slide: usize,
    ) -> Self {
        let mut carousel = Carousel::new(cards.len(), visible);
        carousel.go_to(slide);

        let href = |c: Carousel| format!("/{country}?slide={}", c.index());
        let mut prev = carousel;
        prev.prev();
        let mut next = carousel;
        next.next();

        let dots = (0..carousel.dot_count())
            .map(|index| {
                let mut target = carousel;
                target.go_to_dot(index);
                DotView {
                    index,
                    active: index == carousel.active_dot(),
                    href: href(target),
                }
            })
            .collect();

        Self {
            cards,
            dots,
            shows_navigation: carousel.shows_navigation(),
            interval_ms,
            index: carousel.index(),
            visible: carousel.visible(),
            prev_href: href(prev),
            next_href: href(next),
            drag_threshold_px: DRAG_THRESHOLD_PX,
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub country: String,
    pub store_href: String,
    pub carousel: CarouselView,
    /// Set when the latest arrivals could not be loaded.
    pub error: Option<String>,
    pub retry_href: String,
}

/// Display the home page.
///
/// A failed fetch only replaces the carousel with an error panel; the rest
/// of the page renders normally. The carousel is laid out for the viewport
/// width the browser hints at, and the response asks for that hint.
#[instrument(skip(state, headers))]
pub async fn home(
    State(state): State<AppState>,
    Path(country): Path<String>,
    Query(params): Query<HomeParams>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    let country = country_code(&country)?;
    let visible = visible_for_width(viewport_width(&headers));
    let listing = &state.config().listing;

    let loaded = match region_for(&state, &country).await {
        Ok(region) => state
            .listing_cache()
            .get_or_fetch(
                state.storefront(),
                &ProductQuery::latest(listing.carousel_size, &region.id),
            )
            .await
            .map_err(|e| e.user_message().to_string()),
        Err(AppError::Medusa(e)) => Err(e.user_message().to_string()),
        Err(e) => return Err(e),
    };

    let (carousel, error) = match loaded {
        Ok(page) => {
            let cards = page
                .products
                .iter()
                .map(|p| ProductCardView::new(&country, p))
                .collect();
            let carousel = CarouselView::new(
                &country,
                cards,
                listing.carousel_interval.as_millis(),
                visible,
                params.slide.unwrap_or_default(),
            );
            (carousel, None)
        }
        Err(message) => {
            tracing::warn!(country = %country, "Latest arrivals unavailable");
            (CarouselView::default(), Some(message))
        }
    };

    Ok((
        [
            (header::HeaderName::from_static("accept-ch"), VIEWPORT_WIDTH_HINT),
            (header::VARY, VIEWPORT_WIDTH_HINT),
        ],
        HomeTemplate {
            store_href: format!("/{country}/store"),
            retry_href: format!("/{country}"),
            country,
            carousel,
            error,
        },
    ))
}
