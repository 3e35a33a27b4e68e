//! Medusa API types.
//!
//! `Store*` types mirror the Store API JSON. [`ProductSummary`] and
//! [`ProductDetail`] are the shapes templates render; see the
//! conversions module for how one becomes the other.

use elorad_core::{CollectionId, Price, ProductId, RegionId, VariantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Store API responses
// =============================================================================

/// Response of `GET /store/products`.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreProductListResponse {
    pub products: Vec<StoreProduct>,
    pub count: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
}

/// Response of `GET /store/regions`.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreRegionListResponse {
    pub regions: Vec<StoreRegion>,
}

/// A product as returned by the Store API.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreProduct {
    pub id: ProductId,
    pub title: String,
    pub handle: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub images: Vec<StoreImage>,
    #[serde(default)]
    pub variants: Vec<StoreVariant>,
    #[serde(default)]
    pub tags: Vec<StoreTag>,
    pub collection_id: Option<CollectionId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreImage {
    pub id: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreTag {
    pub id: Option<String>,
    pub value: String,
}

/// A product variant with its region-calculated price.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreVariant {
    pub id: VariantId,
    pub title: Option<String>,
    pub sku: Option<String>,
    pub inventory_quantity: Option<i64>,
    pub manage_inventory: Option<bool>,
    pub allow_backorder: Option<bool>,
    pub calculated_price: Option<CalculatedPrice>,
}

/// Price computed by Medusa for the requested region.
#[derive(Debug, Clone, Deserialize)]
pub struct CalculatedPrice {
    pub calculated_amount: Option<Decimal>,
    pub original_amount: Option<Decimal>,
    pub currency_code: String,
}

/// A pricing region and the countries it serves.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreRegion {
    pub id: RegionId,
    pub name: String,
    pub currency_code: String,
    #[serde(default)]
    pub countries: Vec<StoreCountry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreCountry {
    pub iso_2: String,
    pub display_name: Option<String>,
}

impl StoreRegion {
    /// Whether the region serves a country (ISO 3166-1 alpha-2, any case).
    #[must_use]
    pub fn serves(&self, country_code: &str) -> bool {
        self.countries
            .iter()
            .any(|c| c.iso_2.eq_ignore_ascii_case(country_code))
    }
}

// =============================================================================
// Render types
// =============================================================================

/// The cheapest variant price of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheapestPrice {
    pub calculated: Price,
    pub original: Price,
    /// Discount off the original price, in whole percent.
    pub percentage_diff: u32,
}

impl CheapestPrice {
    /// Whether the calculated price is below the original one.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.calculated.amount < self.original.amount
    }
}

/// A product card in a listing or carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub title: String,
    pub handle: String,
    pub thumbnail: Option<String>,
    pub price: Option<CheapestPrice>,
}

/// A product on its detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductDetail {
    pub summary: ProductSummary,
    pub collection_id: Option<CollectionId>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub variants: Vec<VariantDetail>,
}

/// A purchasable variant on the detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantDetail {
    pub id: VariantId,
    pub title: String,
    pub price: Option<Price>,
    pub in_stock: bool,
}
