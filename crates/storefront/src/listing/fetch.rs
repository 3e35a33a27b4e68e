//! Listing fetches: memoization and last-query-wins state.
//!
//! [`QueryCache`] suppresses repeated identical requests: results are keyed
//! by [`ProductQuery::cache_key`] and concurrent misses for the same key
//! share one upstream call. Failures are never memoized.
//!
//! [`ListingSession`] drives one listing view through
//! `Idle → Loading → Success | Error`. A result is committed only if its
//! query is still the active one when it arrives; anything older is
//! reported as [`FetchOutcome::Stale`] and dropped. [`ListingViews`] keeps
//! one session per listing open in a browser, so overlapping requests from
//! the same view race against each other and not against other visitors.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use elorad_core::PriceOrder;
use moka::future::Cache;
use tracing::{debug, instrument, warn};

use crate::medusa::{MedusaError, ProductSummary, StoreClient};

use super::query::ProductQuery;

/// One page of listing results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPage {
    pub products: Vec<ProductSummary>,
    /// Total matches across all pages.
    pub count: u64,
}

impl ProductPage {
    /// An empty result.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            products: Vec::new(),
            count: 0,
        }
    }

    /// Order products by their cheapest price. Products without a price
    /// sort last in both directions.
    fn sort_by_price(&mut self, order: PriceOrder) {
        self.products.sort_by(|a, b| {
            let a = a.price.map(|p| p.calculated.amount);
            let b = b.price.map(|p| p.calculated.amount);
            match (a, b) {
                (Some(a), Some(b)) => match order {
                    PriceOrder::Ascending => a.cmp(&b),
                    PriceOrder::Descending => b.cmp(&a),
                },
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
        });
    }
}

/// Something that can answer a product listing query.
pub trait ListingSource: Send + Sync {
    /// Fetch one page of products.
    fn list_products(
        &self,
        query: &ProductQuery,
    ) -> impl Future<Output = Result<ProductPage, MedusaError>> + Send;
}

impl ListingSource for StoreClient {
    async fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, MedusaError> {
        Self::list_products(self, query).await
    }
}

// =============================================================================
// QueryCache
// =============================================================================

/// Memoized listing pages keyed by serialized query.
#[derive(Clone)]
pub struct QueryCache {
    cache: Cache<String, ProductPage>,
}

impl QueryCache {
    /// Create a cache holding up to `capacity` pages for `ttl` each.
    #[must_use]
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Return the memoized page for a query, fetching it on a miss.
    ///
    /// Price sorts are applied here, and pages longer than the query limit
    /// are truncated.
    ///
    /// # Errors
    ///
    /// Returns the source's error, shared with any concurrent callers that
    /// waited on the same fetch.
    #[instrument(skip(self, source, query), fields(key = %query.cache_key()))]
    pub async fn get_or_fetch<S: ListingSource>(
        &self,
        source: &S,
        query: &ProductQuery,
    ) -> Result<ProductPage, Arc<MedusaError>> {
        self.cache
            .try_get_with(query.cache_key(), async {
                debug!("Listing cache miss");
                let mut page = source.list_products(query).await?;

                let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
                if page.products.len() > limit {
                    warn!(
                        returned = page.products.len(),
                        limit, "Medusa returned more products than requested"
                    );
                    page.products.truncate(limit);
                }

                if let Some(order) = query.sort.local_order() {
                    page.sort_by_price(order);
                }

                Ok(page)
            })
            .await
    }

    /// Whether a query's page is memoized.
    #[must_use]
    pub fn contains(&self, query: &ProductQuery) -> bool {
        self.cache.contains_key(&query.cache_key())
    }

    /// Forget every memoized page, e.g. after a region change.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

// =============================================================================
// ListingSession
// =============================================================================

/// Fetch lifecycle of a listing view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchState {
    #[default]
    Idle,
    Loading {
        query: ProductQuery,
    },
    Success {
        query: ProductQuery,
        page: ProductPage,
    },
    Error {
        query: ProductQuery,
        message: String,
    },
}

/// What happened to a fetch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result was committed as the view state.
    Committed(FetchState),
    /// A newer query became active first; the result was dropped.
    Stale,
}

/// Per-view fetch controller.
pub struct ListingSession<S> {
    source: S,
    cache: QueryCache,
    active: Mutex<Option<String>>,
    state: Mutex<FetchState>,
}

impl<S: ListingSource> ListingSession<S> {
    /// Create an idle session.
    #[must_use]
    pub fn new(source: S, cache: QueryCache) -> Self {
        Self {
            source,
            cache,
            active: Mutex::new(None),
            state: Mutex::new(FetchState::Idle),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> FetchState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_state(&self, state: FetchState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Make `query` the active one and fetch it.
    ///
    /// The result is committed only if no other query became active while
    /// this one was in flight.
    pub async fn fetch(&self, query: ProductQuery) -> FetchOutcome {
        let key = query.cache_key();
        {
            let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
            *active = Some(key.clone());
            self.set_state(FetchState::Loading {
                query: query.clone(),
            });
        }

        let result = self.cache.get_or_fetch(&self.source, &query).await;

        let active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if active.as_deref() != Some(key.as_str()) {
            debug!(key = %key, "Dropping stale listing result");
            return FetchOutcome::Stale;
        }

        let next = match result {
            Ok(page) => FetchState::Success { query, page },
            Err(e) => {
                warn!(error = %e, key = %key, "Listing fetch failed");
                FetchState::Error {
                    query,
                    message: e.user_message().to_string(),
                }
            }
        };
        self.set_state(next.clone());
        drop(active);

        FetchOutcome::Committed(next)
    }
}

// =============================================================================
// ListingViews
// =============================================================================

/// Sessions of the listing views open in browsers, keyed by view id.
///
/// Idle views are evicted; a view that comes back after eviction simply
/// starts a fresh session.
#[derive(Clone)]
pub struct ListingViews<S> {
    sessions: Cache<String, Arc<ListingSession<S>>>,
}

impl<S: ListingSource + Clone + 'static> ListingViews<S> {
    #[must_use]
    pub fn new(capacity: u64, idle: Duration) -> Self {
        Self {
            sessions: Cache::builder()
                .max_capacity(capacity)
                .time_to_idle(idle)
                .build(),
        }
    }

    /// The session for a view, created on first use.
    pub async fn session(
        &self,
        view_id: &str,
        source: &S,
        cache: &QueryCache,
    ) -> Arc<ListingSession<S>> {
        self.sessions
            .get_with(view_id.to_string(), async {
                Arc::new(ListingSession::new(source.clone(), cache.clone()))
            })
            .await
    }
}
