//! Store API query construction.
//!
//! [`ProductQuery::build`] maps a [`FilterState`] onto `GET /store/products`
//! parameters. It is pure: the same state, page size and region always give
//! the same parameters in the same order, which is what makes
//! [`ProductQuery::cache_key`] usable for memoization.

use elorad_core::{CollectionId, FilterGroup, Handle, PriceBucket, RegionId, SortOption};
use url::form_urlencoded;

use crate::medusa::ProductDetail;

use super::state::FilterState;

/// Projection for listing cards: calculated prices and stock.
pub const LISTING_FIELDS: &str = "*variants.calculated_price,+variants.inventory_quantity";

/// Projection for the detail page.
pub const DETAIL_FIELDS: &str = "*variants.calculated_price,+variants.inventory_quantity,+variants.manage_inventory,+variants.allow_backorder,*images,*tags";

/// Tag prefix for age filters.
const AGE_TAG_PREFIX: &str = "age-";

/// Tag prefix for color filters.
const COLOR_TAG_PREFIX: &str = "color-";

/// How the price filter is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceFilter {
    /// A parsed bucket, sent as `price_range[min]` and `price_range[max]`.
    Bounds(PriceBucket),
    /// A token that is not a bucket, passed through for Medusa to judge.
    Raw(String),
}

/// A `GET /store/products` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub limit: u32,
    pub offset: u64,
    pub region_id: RegionId,
    pub fields: &'static str,
    pub handle: Option<String>,
    pub collection_ids: Vec<CollectionId>,
    pub category_ids: Vec<String>,
    pub tags: Vec<String>,
    pub price: Option<PriceFilter>,
    pub sort: SortOption,
    /// Sends `is_giftcard=false`.
    pub exclude_giftcards: bool,
}

impl ProductQuery {
    /// Build the listing query for a filter state.
    #[must_use]
    pub fn build(state: &FilterState, page_size: u32, region_id: &RegionId) -> Self {
        let cursor = state.cursor(page_size);
        let selection = state.selection();

        let category_ids = selection
            .values(FilterGroup::Categories)
            .map(str::to_string)
            .collect();

        let tags = selection
            .values(FilterGroup::Ages)
            .map(|v| format!("{AGE_TAG_PREFIX}{v}"))
            .chain(
                selection
                    .values(FilterGroup::Colors)
                    .map(|v| format!("{COLOR_TAG_PREFIX}{v}")),
            )
            .chain(selection.values(FilterGroup::Tags).map(str::to_string))
            .collect();

        let price = selection
            .first(FilterGroup::PriceRange)
            .map(|token| match PriceBucket::parse(token) {
                Some(bucket) => PriceFilter::Bounds(bucket),
                None => PriceFilter::Raw(token.to_string()),
            });

        Self {
            limit: cursor.size(),
            offset: cursor.offset(),
            region_id: region_id.clone(),
            fields: LISTING_FIELDS,
            handle: None,
            collection_ids: Vec::new(),
            category_ids,
            tags,
            price,
            sort: state.sort(),
            exclude_giftcards: false,
        }
    }

    /// Newest products, first page.
    #[must_use]
    pub fn latest(limit: u32, region_id: &RegionId) -> Self {
        Self::build(&FilterState::default(), limit, region_id)
    }

    /// A single product by handle, with detail fields.
    #[must_use]
    pub fn by_handle(handle: &Handle, region_id: &RegionId) -> Self {
        Self {
            fields: DETAIL_FIELDS,
            handle: Some(handle.as_str().to_string()),
            ..Self::build(&FilterState::default(), 1, region_id)
        }
    }

    /// Products sharing a product's collection and tags.
    ///
    /// The product itself may come back in the page; callers drop it.
    #[must_use]
    pub fn related(product: &ProductDetail, limit: u32, region_id: &RegionId) -> Self {
        Self {
            collection_ids: product.collection_id.iter().cloned().collect(),
            tags: product.tags.clone(),
            exclude_giftcards: true,
            ..Self::build(&FilterState::default(), limit, region_id)
        }
    }

    /// Query parameters in their fixed order.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
            ("region_id", self.region_id.to_string()),
            ("fields", self.fields.to_string()),
        ];

        if let Some(handle) = &self.handle {
            params.push(("handle", handle.clone()));
        }

        params.extend(
            self.collection_ids
                .iter()
                .map(|id| ("collection_id[]", id.to_string())),
        );
        params.extend(self.category_ids.iter().map(|id| ("category_id[]", id.clone())));
        params.extend(self.tags.iter().map(|tag| ("tags[]", tag.clone())));

        match &self.price {
            Some(PriceFilter::Bounds(bucket)) => {
                params.push(("price_range[min]", bucket.min.to_string()));
                if let Some(max) = bucket.max {
                    params.push(("price_range[max]", max.to_string()));
                }
            }
            Some(PriceFilter::Raw(token)) => params.push(("price_range", token.clone())),
            None => {}
        }

        if self.exclude_giftcards {
            params.push(("is_giftcard", "false".to_string()));
        }

        if let Some(order) = self.sort.api_order() {
            params.push(("order", order.to_string()));
        }

        params
    }

    /// Serialized query, used as the memoization key.
    ///
    /// Includes the sort token so that price sorts, which send no `order`,
    /// stay distinct.
    #[must_use]
    pub fn cache_key(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.extend_pairs(self.params());
        serializer.append_pair("sortBy", self.sort.as_str());
        serializer.finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use elorad_core::ProductId;

    use super::*;
    use crate::medusa::ProductSummary;

    fn region() -> RegionId {
        RegionId::new("reg_ng")
    }

    fn detail(collection: Option<&str>, tags: &[&str]) -> ProductDetail {
        ProductDetail {
            summary: ProductSummary {
                id: ProductId::new("prod_1"),
                title: "Linen Romper".to_string(),
                handle: "linen-romper".to_string(),
                thumbnail: None,
                price: None,
            },
            collection_id: collection.map(CollectionId::new),
            subtitle: None,
            description: None,
            images: Vec::new(),
            tags: tags.iter().map(ToString::to_string).collect(),
            variants: Vec::new(),
        }
    }

    fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> Vec<&'a str> {
        params
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    #[test]
    fn test_default_state() {
        let query = ProductQuery::build(&FilterState::default(), 12, &region());
        let params = query.params();

        assert_eq!(
            params,
            vec![
                ("limit", "12".to_string()),
                ("offset", "0".to_string()),
                ("region_id", "reg_ng".to_string()),
                ("fields", LISTING_FIELDS.to_string()),
                ("order", "-created_at".to_string()),
            ]
        );
    }

    #[test]
    fn test_offset_follows_page() {
        let state = FilterState::from_query("page=3");
        let query = ProductQuery::build(&state, 12, &region());
        assert_eq!(query.offset, 24);
        assert_eq!(query.limit, 12);
    }

    #[test]
    fn test_filter_mapping() {
        let state = FilterState::from_query(
            "categories=pcat_girls&ages=2-4y&colors=red,blue&tags=organic&price_range=50-100",
        );
        let params = ProductQuery::build(&state, 12, &region()).params();

        assert_eq!(param(&params, "category_id[]"), vec!["pcat_girls"]);
        assert_eq!(
            param(&params, "tags[]"),
            vec!["age-2-4y", "color-blue", "color-red", "organic"]
        );
        assert_eq!(param(&params, "price_range[min]"), vec!["50"]);
        assert_eq!(param(&params, "price_range[max]"), vec!["100"]);
    }

    #[test]
    fn test_open_ended_price_omits_max() {
        let state = FilterState::from_query("price_range=200-1000");
        let params = ProductQuery::build(&state, 12, &region()).params();

        assert_eq!(param(&params, "price_range[min]"), vec!["200"]);
        assert!(param(&params, "price_range[max]").is_empty());
    }

    #[test]
    fn test_unparseable_price_is_passed_through() {
        let query = ProductQuery {
            price: Some(PriceFilter::Raw("cheap".to_string())),
            ..ProductQuery::latest(12, &region())
        };

        assert_eq!(param(&query.params(), "price_range"), vec!["cheap"]);
    }

    #[test]
    fn test_price_sort_sends_no_order() {
        let state = FilterState::from_query("sortBy=price_low");
        let params = ProductQuery::build(&state, 12, &region()).params();
        assert!(param(&params, "order").is_empty());
    }

    #[test]
    fn test_popularity_order() {
        let state = FilterState::from_query("sortBy=popularity");
        let params = ProductQuery::build(&state, 12, &region()).params();
        assert_eq!(param(&params, "order"), vec!["-updated_at"]);
    }

    #[test]
    fn test_cache_key_is_deterministic() {
        let a = FilterState::from_query("colors=red,blue&ages=2-4y");
        let b = FilterState::from_query("ages=2-4y&colors=blue,red");

        let key_a = ProductQuery::build(&a, 12, &region()).cache_key();
        let key_b = ProductQuery::build(&b, 12, &region()).cache_key();
        assert_eq!(key_a, key_b);
    }

    #[test]
    fn test_cache_key_distinguishes_price_sorts() {
        let asc = FilterState::from_query("sortBy=price_low");
        let desc = FilterState::from_query("sortBy=price_high");

        assert_ne!(
            ProductQuery::build(&asc, 12, &region()).cache_key(),
            ProductQuery::build(&desc, 12, &region()).cache_key()
        );
    }

    #[test]
    fn test_cache_key_changes_with_region() {
        let state = FilterState::default();
        assert_ne!(
            ProductQuery::build(&state, 12, &region()).cache_key(),
            ProductQuery::build(&state, 12, &RegionId::new("reg_us")).cache_key()
        );
    }

    #[test]
    fn test_related_filters_by_collection_and_tags() {
        let product = detail(Some("pcol_girls"), &["color-red", "age-2-4y"]);
        let params = ProductQuery::related(&product, 5, &region()).params();

        assert_eq!(param(&params, "collection_id[]"), vec!["pcol_girls"]);
        assert_eq!(param(&params, "tags[]"), vec!["color-red", "age-2-4y"]);
        assert_eq!(param(&params, "is_giftcard"), vec!["false"]);
        assert_eq!(param(&params, "limit"), vec!["5"]);
        assert!(param(&params, "category_id[]").is_empty());
    }

    #[test]
    fn test_related_without_collection() {
        let product = detail(None, &[]);
        let params = ProductQuery::related(&product, 5, &region()).params();

        assert!(param(&params, "collection_id[]").is_empty());
        assert!(param(&params, "tags[]").is_empty());
    }

    #[test]
    fn test_listing_sends_no_giftcard_filter() {
        let params = ProductQuery::latest(12, &region()).params();
        assert!(param(&params, "is_giftcard").is_empty());
        assert!(param(&params, "collection_id[]").is_empty());
    }

    #[test]
    fn test_by_handle() {
        let handle = Handle::parse("linen-romper").unwrap();
        let query = ProductQuery::by_handle(&handle, &region());
        let params = query.params();

        assert_eq!(param(&params, "handle"), vec!["linen-romper"]);
        assert_eq!(param(&params, "limit"), vec!["1"]);
        assert_eq!(param(&params, "fields"), vec![DETAIL_FIELDS]);
    }
}
