//! Listing sort options.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sort order for a product listing.
///
/// The URL token (`sortBy=price_low`) is the stable contract with the
/// browser; [`SortOption::api_order`] is what Medusa receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOption {
    /// Newest first.
    #[default]
    #[serde(rename = "created_at")]
    Newest,
    /// Cheapest first.
    #[serde(rename = "price_low")]
    PriceAsc,
    /// Most expensive first.
    #[serde(rename = "price_high")]
    PriceDesc,
    /// Most recently active first.
    #[serde(rename = "popularity")]
    Popularity,
}

/// Direction for ordering a fetched page by price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceOrder {
    Ascending,
    Descending,
}

impl SortOption {
    /// All options, in the order shown in the sort dropdown.
    pub const ALL: [Self; 4] = [
        Self::Newest,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::Popularity,
    ];

    /// URL token for the `sortBy` parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "created_at",
            Self::PriceAsc => "price_low",
            Self::PriceDesc => "price_high",
            Self::Popularity => "popularity",
        }
    }

    /// Parse a URL token. Unknown tokens yield `None`.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == token)
    }

    /// Dropdown label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Newest => "Newest",
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
            Self::Popularity => "Popularity",
        }
    }

    /// Value for the Store API `order` parameter.
    ///
    /// The Store API cannot order by calculated price, so price sorts send
    /// no order and are applied to the fetched page instead.
    #[must_use]
    pub const fn api_order(self) -> Option<&'static str> {
        match self {
            Self::Newest => Some("-created_at"),
            Self::Popularity => Some("-updated_at"),
            Self::PriceAsc | Self::PriceDesc => None,
        }
    }

    /// Ordering to apply locally after the page has been fetched.
    #[must_use]
    pub const fn local_order(self) -> Option<PriceOrder> {
        match self {
            Self::PriceAsc => Some(PriceOrder::Ascending),
            Self::PriceDesc => Some(PriceOrder::Descending),
            Self::Newest | Self::Popularity => None,
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_round_trip() {
        for sort in SortOption::ALL {
            assert_eq!(SortOption::parse(sort.as_str()), Some(sort));
        }
    }

    #[test]
    fn test_unknown_token() {
        assert_eq!(SortOption::parse("cheapest"), None);
        assert_eq!(SortOption::parse(""), None);
    }

    #[test]
    fn test_default_is_newest() {
        assert_eq!(SortOption::default(), SortOption::Newest);
        assert_eq!(SortOption::default().api_order(), Some("-created_at"));
    }

    #[test]
    fn test_price_sorts_are_local() {
        assert_eq!(SortOption::PriceAsc.api_order(), None);
        assert_eq!(
            SortOption::PriceAsc.local_order(),
            Some(PriceOrder::Ascending)
        );
        assert_eq!(
            SortOption::PriceDesc.local_order(),
            Some(PriceOrder::Descending)
        );
        assert_eq!(SortOption::Newest.local_order(), None);
    }
}
