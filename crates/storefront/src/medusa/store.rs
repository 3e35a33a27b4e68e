//! Medusa Store API client.
//!
//! Authenticates with the publishable key. Regions and product details are
//! cached with `moka` (5 minute TTL); listing pages are memoized one layer
//! up, keyed by the full query.

use std::sync::Arc;
use std::time::Duration;

use elorad_core::{Handle, RegionId};
use moka::future::Cache;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::config::MedusaConfig;
use crate::listing::fetch::ProductPage;
use crate::listing::query::ProductQuery;

use super::cache::{CacheKey, CacheValue};
use super::types::{
    ProductDetail, ProductSummary, StoreProductListResponse, StoreRegion, StoreRegionListResponse,
};
use super::{MedusaError, decode_response};

/// Header carrying the publishable API key.
const PUBLISHABLE_KEY_HEADER: &str = "x-publishable-api-key";

// =============================================================================
// StoreClient
// =============================================================================

/// Client for the Medusa Store API.
///
/// Cheap to clone; all clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct StoreClient {
    inner: Arc<StoreClientInner>,
}

struct StoreClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl StoreClient {
    /// Create a new Store API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend URL or key is malformed, or the HTTP
    /// client fails to build.
    pub fn new(config: &MedusaConfig) -> Result<Self, MedusaError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            PUBLISHABLE_KEY_HEADER,
            HeaderValue::from_str(&config.publishable_key)
                .map_err(|e| MedusaError::InvalidKey(e.to_string()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(10))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(StoreClientInner {
                client,
                base_url: base_url(&config.backend_url)?,
                cache,
            }),
        })
    }

    /// Issue a GET against the Store API and decode the JSON body.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, MedusaError> {
        let mut url = self.inner.base_url.join(path)?;
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }

        debug!(url = %url, "Medusa Store API request");
        let response = self.inner.client.get(url).send().await?;
        decode_response(response).await
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Fetch one page of products.
    ///
    /// Not cached here; see [`crate::listing::fetch::QueryCache`].
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, query), fields(key = %query.cache_key()))]
    pub async fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, MedusaError> {
        let response: StoreProductListResponse =
            self.get("store/products", &query.params()).await?;

        Ok(ProductPage {
            products: response.products.iter().map(ProductSummary::from).collect(),
            count: response.count,
        })
    }

    /// Get a product by its handle, priced for a region.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no product has the handle, or an error if the
    /// API request fails.
    #[instrument(skip(self), fields(handle = %handle, region_id = %region_id))]
    pub async fn get_product_by_handle(
        &self,
        handle: &Handle,
        region_id: &RegionId,
    ) -> Result<ProductDetail, MedusaError> {
        let cache_key = CacheKey::Product {
            handle: handle.clone(),
            region_id: region_id.clone(),
        };

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let query = ProductQuery::by_handle(handle, region_id);
        let response: StoreProductListResponse =
            self.get("store/products", &query.params()).await?;

        let product = response
            .products
            .into_iter()
            .next()
            .map(ProductDetail::from)
            .ok_or_else(|| MedusaError::NotFound(format!("Product not found: {handle}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    // =========================================================================
    // Region Methods
    // =========================================================================

    /// List all regions.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_regions(&self) -> Result<Vec<StoreRegion>, MedusaError> {
        if let Some(CacheValue::Regions(regions)) = self.inner.cache.get(&CacheKey::Regions).await
        {
            debug!("Cache hit for regions");
            return Ok(regions);
        }

        let response: StoreRegionListResponse = self.get("store/regions", &[]).await?;

        self.inner
            .cache
            .insert(CacheKey::Regions, CacheValue::Regions(response.regions.clone()))
            .await;

        Ok(response.regions)
    }

    /// Find the region serving a country code.
    ///
    /// # Errors
    ///
    /// Returns an error if the regions cannot be fetched.
    #[instrument(skip(self))]
    pub async fn region_for_country(
        &self,
        country_code: &str,
    ) -> Result<Option<StoreRegion>, MedusaError> {
        let regions = self.list_regions().await?;
        Ok(regions.into_iter().find(|r| r.serves(country_code)))
    }

    /// Drop cached regions and products so the next request refetches.
    pub fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
    }

    /// Whether the backend answers its health check.
    pub async fn is_healthy(&self) -> bool {
        let Ok(url) = self.inner.base_url.join("health") else {
            return false;
        };

        match self.inner.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!(error = %e, "Medusa health check failed");
                false
            }
        }
    }
}

/// Parse the backend URL so relative paths join under it.
pub(super) fn base_url(backend_url: &str) -> Result<Url, MedusaError> {
    Ok(Url::parse(&format!("{}/", backend_url.trim_end_matches('/')))?)
}
