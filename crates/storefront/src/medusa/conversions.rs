//! Conversions from Store API responses to render types.

use elorad_core::{CurrencyCode, Price};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::types::{
    CalculatedPrice, CheapestPrice, ProductDetail, ProductSummary, StoreProduct, StoreVariant,
    VariantDetail,
};

/// Convert a calculated price into a display price.
///
/// Returns `None` when Medusa has no price for the region or reports a
/// currency the storefront does not support.
fn convert_price(price: &CalculatedPrice) -> Option<(Price, Price)> {
    let currency: CurrencyCode = price.currency_code.parse().ok()?;
    let calculated = price.calculated_amount?;
    let original = price.original_amount.unwrap_or(calculated);
    Some((
        Price::new(calculated, currency),
        Price::new(original, currency),
    ))
}

/// Pick the variant with the lowest calculated price.
pub fn cheapest_price(variants: &[StoreVariant]) -> Option<CheapestPrice> {
    let (calculated, original) = variants
        .iter()
        .filter_map(|v| v.calculated_price.as_ref().and_then(convert_price))
        .min_by(|a, b| a.0.amount.cmp(&b.0.amount))?;

    let percentage_diff = if original.amount > calculated.amount && !original.amount.is_zero() {
        let diff = (original.amount - calculated.amount) / original.amount * Decimal::ONE_HUNDRED;
        diff.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .unwrap_or(0)
    } else {
        0
    };

    Some(CheapestPrice {
        calculated,
        original,
        percentage_diff,
    })
}

/// Whether a variant can be added to a cart.
fn variant_in_stock(variant: &StoreVariant) -> bool {
    if !variant.manage_inventory.unwrap_or(false) || variant.allow_backorder.unwrap_or(false) {
        return true;
    }
    variant.inventory_quantity.unwrap_or(0) > 0
}

impl From<&StoreProduct> for ProductSummary {
    fn from(product: &StoreProduct) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            handle: product.handle.clone(),
            thumbnail: product
                .thumbnail
                .clone()
                .or_else(|| product.images.first().map(|i| i.url.clone())),
            price: cheapest_price(&product.variants),
        }
    }
}

impl From<StoreProduct> for ProductDetail {
    fn from(product: StoreProduct) -> Self {
        let summary = ProductSummary::from(&product);

        let variants = product
            .variants
            .iter()
            .map(|v| VariantDetail {
                id: v.id.clone(),
                title: v.title.clone().unwrap_or_default(),
                price: v
                    .calculated_price
                    .as_ref()
                    .and_then(convert_price)
                    .map(|(calculated, _)| calculated),
                in_stock: variant_in_stock(v),
            })
            .collect();

        Self {
            summary,
            collection_id: product.collection_id,
            subtitle: product.subtitle,
            description: product.description,
            images: product.images.into_iter().map(|i| i.url).collect(),
            tags: product.tags.into_iter().map(|t| t.value).collect(),
            variants,
        }
    }
}
