//! Core types for Elorad.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod filter;
pub mod handle;
pub mod id;
pub mod pagination;
pub mod price;
pub mod sort;
pub mod status;

pub use filter::{
    FilterChip, FilterGroup, FilterSelection, PRICE_SENTINEL_MAX, PriceBucket, value_label,
};
pub use handle::{Handle, HandleError};
pub use id::*;
pub use pagination::{PageCursor, PageItem, PageWindow, total_pages};
pub use price::{CurrencyCode, Price};
pub use sort::{PriceOrder, SortOption};
pub use status::ProductStatus;
