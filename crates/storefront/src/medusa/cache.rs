//! Cache types for Store API responses.

use elorad_core::{Handle, RegionId};

use super::types::{ProductDetail, StoreRegion};

/// Cache key for regions and product details.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Regions,
    Product { handle: Handle, region_id: RegionId },
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Regions(Vec<StoreRegion>),
    Product(Box<ProductDetail>),
}
