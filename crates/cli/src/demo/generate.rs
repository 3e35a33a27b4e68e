//! Seeded product generation.

use std::collections::BTreeMap;

use elorad_core::{CollectionId, Handle, ProductStatus, RegionId, SalesChannelId};
use elorad_storefront::medusa::admin::{
    IdRef, NewImage, NewOption, NewPrice, NewProduct, NewVariant, PriceRules,
};
use rand::Rng;
use rand::rngs::StdRng;

use super::SeedPlan;
use crate::commands::seed::SeedError;

const ADJECTIVES: &[&str] = &[
    "Cosy", "Playful", "Classic", "Everyday", "Breezy", "Snug", "Sunny", "Tiny", "Little",
    "Bright", "Soft", "Ribbed", "Striped", "Gingham", "Floral", "Checked", "Relaxed", "Ruffled",
    "Pleated", "Quilted", "Embroidered", "Organic", "Washed", "Festive",
];

const MATERIALS: &[&str] = &[
    "Cotton", "Linen", "Denim", "Fleece", "Knit", "Corduroy", "Chambray", "Muslin", "Jersey",
    "Poplin", "Wool", "Seersucker",
];

const NOUNS: &[&str] = &[
    "Romper", "Dungarees", "Dress", "Cardigan", "Hoodie", "Onesie", "Shorts", "Tee", "Jumpsuit",
    "Skirt", "Pyjamas", "Jacket", "Sweater", "Leggings", "Blouse", "Overalls", "Bodysuit",
    "Joggers", "Pinafore", "Sleepsuit", "Polo", "Vest", "Bib", "Beanie",
];

const DESCRIPTIONS: &[&str] = &[
    "Designed for everyday use and built to last.",
    "A dependable pick with a clean, understated finish.",
    "Made in small batches with attention to every detail.",
    "Lightweight, easy to care for and ready for anything.",
    "A customer favourite that pairs well with the rest of the range.",
];

const PRICE_UNITS: std::ops::RangeInclusive<u64> = 5..=200;
const WEIGHT_GRAMS: std::ops::RangeInclusive<u32> = 50..=500;
const STOCK: std::ops::RangeInclusive<u32> = 10..=100;

/// Kobo per naira.
const NGN_MINOR_PER_UNIT: u64 = 100;

/// Everything about a product that does not depend on Medusa IDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub handle: Handle,
    pub collection: String,
    pub collection_id: CollectionId,
    pub image_url: String,
    pub option_values: Vec<String>,
    pub default_option: String,
    pub sku: String,
    /// Whole naira; sent multiplied into kobo.
    pub ngn_units: u64,
    pub usd_units: u64,
    pub weight: u32,
    pub stocked_quantity: u32,
}

fn pick<'a>(rng: &mut StdRng, words: &[&'a str]) -> &'a str {
    words
        .get(rng.random_range(0..words.len()))
        .copied()
        .unwrap_or_default()
}

/// Eight lowercase hex characters.
fn short_id(rng: &mut StdRng) -> String {
    format!("{:08x}", rng.random::<u32>())
}

/// Generate `count` drafts from a plan.
///
/// # Errors
///
/// Returns an error if a generated handle is invalid.
pub fn generate(plan: &SeedPlan, count: usize, rng: &mut StdRng) -> Result<Vec<ProductDraft>, SeedError> {
    let collections: Vec<_> = plan.collections.iter().collect();
    let mut drafts = Vec::with_capacity(count);

    for _ in 0..count {
        let Some(&(name, collection)) = collections.get(rng.random_range(0..collections.len()))
        else {
            return Err(SeedError::Plan("no collections".to_string()));
        };

        let material = pick(rng, MATERIALS);
        let product_name = format!("{} {material} {}", pick(rng, ADJECTIVES), pick(rng, NOUNS));
        let handle = Handle::slugify(&product_name)?.with_suffix(&short_id(rng))?;

        drafts.push(ProductDraft {
            title: format!("{} {product_name}", pick(rng, ADJECTIVES)),
            subtitle: material.to_string(),
            description: pick(rng, DESCRIPTIONS).to_string(),
            handle,
            collection: name.clone(),
            collection_id: collection.id.clone(),
            image_url: format!(
                "https://loremflickr.com/640/480/{}?lock={}",
                collection.image_category,
                rng.random_range(1..=10_000u32)
            ),
            option_values: collection.options.clone(),
            default_option: collection.default_option.clone(),
            sku: format!("SKU-{}", short_id(rng).to_uppercase()),
            ngn_units: rng.random_range(PRICE_UNITS),
            usd_units: rng.random_range(PRICE_UNITS),
            weight: rng.random_range(WEIGHT_GRAMS),
            stocked_quantity: rng.random_range(STOCK),
        });
    }

    Ok(drafts)
}

impl ProductDraft {
    /// Admin API payload for this draft.
    #[must_use]
    pub fn to_new_product(
        &self,
        option_title: &str,
        region_id: &RegionId,
        sales_channel_id: &SalesChannelId,
    ) -> NewProduct {
        NewProduct {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            description: self.description.clone(),
            handle: self.handle.clone(),
            is_giftcard: false,
            status: ProductStatus::Published,
            images: vec![NewImage {
                url: self.image_url.clone(),
            }],
            collection_id: self.collection_id.clone(),
            options: vec![NewOption {
                title: option_title.to_string(),
                values: self.option_values.clone(),
            }],
            variants: vec![NewVariant {
                title: "Default Variant".to_string(),
                sku: self.sku.clone(),
                manage_inventory: true,
                options: BTreeMap::from([(option_title.to_string(), self.default_option.clone())]),
                prices: vec![
                    NewPrice {
                        amount: self.ngn_units * NGN_MINOR_PER_UNIT,
                        currency_code: "ngn".to_string(),
                        rules: Some(PriceRules {
                            region_id: region_id.clone(),
                        }),
                    },
                    NewPrice {
                        amount: self.usd_units,
                        currency_code: "usd".to_string(),
                        rules: None,
                    },
                ],
            }],
            weight: self.weight,
            sales_channels: vec![IdRef {
                id: sales_channel_id.clone(),
            }],
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;

    use super::*;
    use crate::demo::DEFAULT_PLAN;

    fn plan() -> SeedPlan {
        SeedPlan::parse(DEFAULT_PLAN).unwrap()
    }

    fn drafts(seed: u64, count: usize) -> Vec<ProductDraft> {
        generate(&plan(), count, &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn test_same_seed_same_products() {
        assert_eq!(drafts(42, 20), drafts(42, 20));
        assert_ne!(drafts(42, 20), drafts(43, 20));
    }

    #[test]
    fn test_draft_fields_in_range() {
        let plan = plan();
        for draft in drafts(7, 100) {
            assert!(PRICE_UNITS.contains(&draft.ngn_units));
            assert!(PRICE_UNITS.contains(&draft.usd_units));
            assert!(WEIGHT_GRAMS.contains(&draft.weight));
            assert!(STOCK.contains(&draft.stocked_quantity));
            assert!(draft.sku.starts_with("SKU-"));
            assert_eq!(draft.sku.len(), 12);

            let collection = &plan.collections[&draft.collection];
            assert_eq!(draft.collection_id, collection.id);
            assert!(draft.option_values.contains(&draft.default_option));
            assert!(draft.title.contains(&draft.subtitle));
        }
    }

    #[test]
    fn test_titles_name_garments() {
        for draft in drafts(11, 50) {
            let noun = draft.title.rsplit(' ').next().unwrap();
            assert!(NOUNS.contains(&noun), "{}", draft.title);
            assert!(MATERIALS.contains(&draft.subtitle.as_str()), "{}", draft.subtitle);
        }
    }

    #[test]
    fn test_handles_are_unique_and_suffixed() {
        let drafts = drafts(1, 200);
        let handles: HashSet<_> = drafts.iter().map(|d| d.handle.as_str()).collect();
        assert_eq!(handles.len(), drafts.len());

        for draft in &drafts {
            let (_, suffix) = draft.handle.as_str().rsplit_once('-').unwrap();
            assert_eq!(suffix.len(), 8);
            assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn test_new_product_payload() {
        let draft = drafts(3, 1).remove(0);
        let product = draft.to_new_product(
            "Type",
            &RegionId::new("reg_ng"),
            &SalesChannelId::new("sc_default"),
        );

        assert_eq!(product.status, ProductStatus::Published);
        assert_eq!(product.options[0].title, "Type");

        let variant = &product.variants[0];
        assert_eq!(variant.title, "Default Variant");
        assert_eq!(variant.options["Type"], draft.default_option);

        let ngn = &variant.prices[0];
        assert_eq!(ngn.amount, draft.ngn_units * 100);
        assert_eq!(ngn.rules.as_ref().unwrap().region_id.as_str(), "reg_ng");

        let usd = &variant.prices[1];
        assert_eq!(usd.amount, draft.usd_units);
        assert!(usd.rules.is_none());

        assert_eq!(product.sales_channels[0].id.as_str(), "sc_default");
    }
}
