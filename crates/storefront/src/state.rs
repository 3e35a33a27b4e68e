//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::config::StorefrontConfig;
use crate::listing::{ListingViews, QueryCache};
use crate::medusa::{MedusaError, StoreClient};

/// Listing views tracked at once.
const LISTING_VIEW_CAPACITY: u64 = 10_000;

/// How long an untouched listing view keeps its session.
const LISTING_VIEW_IDLE: Duration = Duration::from_secs(30 * 60);

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// Medusa client, the listing cache and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    storefront: StoreClient,
    listing_cache: QueryCache,
    listing_views: ListingViews<StoreClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the Medusa backend URL or publishable key is
    /// invalid.
    pub fn new(config: StorefrontConfig) -> Result<Self, MedusaError> {
        let storefront = StoreClient::new(&config.medusa)?;
        let listing_cache =
            QueryCache::new(config.listing.cache_capacity, config.listing.cache_ttl);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                storefront,
                listing_cache,
                listing_views: ListingViews::new(LISTING_VIEW_CAPACITY, LISTING_VIEW_IDLE),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Medusa Store API client.
    #[must_use]
    pub fn storefront(&self) -> &StoreClient {
        &self.inner.storefront
    }

    /// Memoized listing pages, shared by every listing view.
    #[must_use]
    pub fn listing_cache(&self) -> &QueryCache {
        &self.inner.listing_cache
    }

    /// Forget cached regions, products and listing pages, e.g. after the
    /// catalog was reseeded.
    pub fn reload_caches(&self) {
        self.inner.storefront.invalidate_cache();
        self.inner.listing_cache.invalidate_all();
        tracing::info!("Storefront caches cleared");
    }

    /// Fetch sessions of the listing views open in browsers.
    #[must_use]
    pub fn listing_views(&self) -> &ListingViews<StoreClient> {
        &self.inner.listing_views
    }
}
