//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use elorad_core::{Handle, ProductId, RegionId};
use tracing::{instrument, warn};

use crate::error::{AppError, Result};
use crate::filters;
use crate::listing::ProductQuery;
use crate::medusa::{ProductDetail, ProductSummary};
use crate::state::AppState;

use super::store::Breadcrumb;
use super::views::ProductCardView;
use super::{country_code, region_for};

/// Cards in the "You might also like" section.
const RELATED_PRODUCTS: u32 = 4;

/// Body `overflow` while the quick view is open. `storefront.js` applies it
/// and restores the page once the last open modal closes.
const MODAL_BODY_OVERFLOW: &str = "hidden";

/// Variant display data for templates.
#[derive(Clone)]
pub struct VariantView {
    pub id: String,
    pub title: String,
    pub price: Option<String>,
    pub in_stock: bool,
}

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub title: String,
    pub href: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub price: Option<String>,
    pub original_price: Option<String>,
    pub discount_percent: Option<u32>,
    pub variants: Vec<VariantView>,
}

impl ProductView {
    fn new(country: &str, product: ProductDetail) -> Self {
        let discounted = product.summary.price.filter(|p| p.is_discounted());
        let mut images = product.images;
        if images.is_empty()
            && let Some(thumbnail) = product.summary.thumbnail
        {
            images.push(thumbnail);
        }

        Self {
            href: format!("/{country}/products/{}", product.summary.handle),
            title: product.summary.title,
            subtitle: product.subtitle,
            description: product.description,
            images,
            tags: product.tags,
            price: product.summary.price.map(|p| p.calculated.display()),
            original_price: discounted.map(|p| p.original.display()),
            discount_percent: discounted.map(|p| p.percentage_diff),
            variants: product
                .variants
                .into_iter()
                .map(|v| VariantView {
                    id: v.id.to_string(),
                    title: v.title,
                    price: v.price.map(|p| p.display()),
                    in_stock: v.in_stock,
                })
                .collect(),
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub country: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub product: ProductView,
    /// Other products from the same collection; empty hides the section.
    pub related: Vec<ProductCardView>,
}

/// Quick view fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/quick_view.html")]
pub struct QuickViewTemplate {
    pub product: ProductView,
    /// Body `overflow` while the modal is open.
    pub body_overflow: &'static str,
}

async fn load_product(
    state: &AppState,
    country: &str,
    handle: &str,
) -> Result<(RegionId, ProductDetail)> {
    let handle =
        Handle::parse(handle).map_err(|_| AppError::NotFound(format!("product '{handle}'")))?;
    let region = region_for(state, country).await?;
    let product = state
        .storefront()
        .get_product_by_handle(&handle, &region.id)
        .await?;
    Ok((region.id, product))
}

/// Products sharing the collection and tags of `product`, through the
/// listing cache.
///
/// A failed lookup only hides the section.
async fn load_related(
    state: &AppState,
    country: &str,
    product: &ProductDetail,
    region_id: &RegionId,
) -> Vec<ProductCardView> {
    // One extra, since the product itself usually matches
    let query = ProductQuery::related(product, RELATED_PRODUCTS + 1, region_id);
    match state
        .listing_cache()
        .get_or_fetch(state.storefront(), &query)
        .await
    {
        Ok(page) => related_cards(country, &page.products, &product.summary.id),
        Err(e) => {
            warn!(error = %e, product = %product.summary.id, "Related products lookup failed");
            Vec::new()
        }
    }
}

fn related_cards(
    country: &str,
    products: &[ProductSummary],
    current: &ProductId,
) -> Vec<ProductCardView> {
    products
        .iter()
        .filter(|p| &p.id != current)
        .take(RELATED_PRODUCTS as usize)
        .map(|p| ProductCardView::new(country, p))
        .collect()
}

/// Display product detail page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path((country, handle)): Path<(String, String)>,
) -> Result<ProductShowTemplate> {
    let country = country_code(&country)?;
    let (region_id, detail) = load_product(&state, &country, &handle).await?;
    let related = load_related(&state, &country, &detail, &region_id).await;
    let product = ProductView::new(&country, detail);

    Ok(ProductShowTemplate {
        breadcrumbs: vec![
            Breadcrumb {
                label: "Home",
                href: Some(format!("/{country}")),
            },
            Breadcrumb {
                label: "Store",
                href: Some(format!("/{country}/store")),
            },
        ],
        country,
        product,
        related,
    })
}

/// Display quick view fragment (for HTMX).
///
/// The fragment carries the body overflow the page must apply while it is
/// open; the client script restores it on every close path.
#[instrument(skip(state))]
pub async fn quick_view(
    State(state): State<AppState>,
    Path((country, handle)): Path<(String, String)>,
) -> Result<QuickViewTemplate> {
    let country = country_code(&country)?;
    let (_, detail) = load_product(&state, &country, &handle).await?;

    Ok(QuickViewTemplate {
        product: ProductView::new(&country, detail),
        body_overflow: MODAL_BODY_OVERFLOW,
    })
}
