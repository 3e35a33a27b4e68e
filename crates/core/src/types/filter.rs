//! Listing filter selections.
//!
//! A [`FilterSelection`] maps each [`FilterGroup`] to the set of option values
//! the shopper picked. It lives only in the URL and in the view being
//! rendered; nothing here is ever persisted.
//!
//! An empty value set is equivalent to the group being absent, so the map
//! never stores one. Values are kept sorted, which makes two selections with
//! the same content compare equal regardless of the order they were built in.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound that means "and above" in a price range token (`"200-1000"`).
pub const PRICE_SENTINEL_MAX: u64 = 1000;

/// One axis of product filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterGroup {
    Categories,
    Ages,
    Colors,
    PriceRange,
    Tags,
}

impl FilterGroup {
    /// All groups, in URL and sidebar order.
    pub const ALL: [Self; 5] = [
        Self::Categories,
        Self::Ages,
        Self::Colors,
        Self::PriceRange,
        Self::Tags,
    ];

    /// Query-string key for this group.
    #[must_use]
    pub const fn url_key(self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Ages => "ages",
            Self::Colors => "colors",
            Self::PriceRange => "price_range",
            Self::Tags => "tags",
        }
    }

    /// Look up a group by its query-string key.
    #[must_use]
    pub fn from_url_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.url_key() == key)
    }

    /// Human label shown on active-filter chips.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Categories => "Category",
            Self::Ages => "Age",
            Self::Colors => "Color",
            Self::PriceRange => "Price",
            Self::Tags => "Feature",
        }
    }

    /// Whether the group holds at most one value.
    #[must_use]
    pub const fn is_single_valued(self) -> bool {
        matches!(self, Self::PriceRange)
    }
}

impl fmt::Display for FilterGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url_key())
    }
}

/// The shopper's active filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    groups: BTreeMap<FilterGroup, BTreeSet<String>>,
}

/// A single active filter value, flattened for the active-filter bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChip {
    pub group: FilterGroup,
    pub value: String,
    pub group_label: &'static str,
    pub value_label: String,
}

impl FilterSelection {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the values of one group.
    ///
    /// Values are trimmed; empty values and values containing `,` are
    /// dropped since they cannot survive the comma-joined URL form. Single
    /// valued groups keep only the first usable value. If nothing usable
    /// remains, the group is removed.
    pub fn set<I, S>(&mut self, group: FilterGroup, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cleaned = values
            .into_iter()
            .map(|v| v.as_ref().trim().to_string())
            .filter(|v| !v.is_empty() && !v.contains(','));

        let set: BTreeSet<String> = if group.is_single_valued() {
            cleaned.next().into_iter().collect()
        } else {
            cleaned.collect()
        };

        if set.is_empty() {
            self.groups.remove(&group);
        } else {
            self.groups.insert(group, set);
        }
    }

    /// Remove a single value from a group.
    ///
    /// Removing the last value removes the group.
    pub fn remove(&mut self, group: FilterGroup, value: &str) {
        let remaining: Vec<String> = self
            .values(group)
            .filter(|v| *v != value)
            .map(str::to_string)
            .collect();
        self.set(group, remaining);
    }

    /// Remove every group.
    pub fn clear(&mut self) {
        self.groups.clear();
    }

    /// Values selected in a group, in sorted order.
    pub fn values(&self, group: FilterGroup) -> impl Iterator<Item = &str> {
        self.groups
            .get(&group)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// First value of a group, mainly for single-valued groups.
    #[must_use]
    pub fn first(&self, group: FilterGroup) -> Option<&str> {
        self.values(group).next()
    }

    /// Whether a group currently contains a value.
    #[must_use]
    pub fn contains(&self, group: FilterGroup, value: &str) -> bool {
        self.groups
            .get(&group)
            .is_some_and(|set| set.contains(value))
    }

    /// Whether no filter is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate over active groups and their values.
    pub fn iter(&self) -> impl Iterator<Item = (FilterGroup, &BTreeSet<String>)> {
        self.groups.iter().map(|(g, v)| (*g, v))
    }

    /// Flatten into chips for the active-filter bar.
    #[must_use]
    pub fn chips(&self) -> Vec<FilterChip> {
        self.iter()
            .flat_map(|(group, values)| {
                values.iter().map(move |value| FilterChip {
                    group,
                    value: value.clone(),
                    group_label: group.label(),
                    value_label: value_label(group, value),
                })
            })
            .collect()
    }
}

/// Readable label for a filter value.
///
/// Price ranges render as `$min - $max` (or `$min+` when open-ended);
/// everything else converts kebab-case to Title Case.
#[must_use]
pub fn value_label(group: FilterGroup, value: &str) -> String {
    if group == FilterGroup::PriceRange
        && let Some(bucket) = PriceBucket::parse(value)
    {
        return bucket.label();
    }

    value
        .split('-')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A parsed price range token.
///
/// Accepts `"min-max"` and `"min+"`. A max at or above
/// [`PRICE_SENTINEL_MAX`] means there is no upper limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PriceBucket {
    pub min: u64,
    pub max: Option<u64>,
}

impl PriceBucket {
    /// Parse a price range token. Returns `None` for malformed input.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();

        if let Some(min) = token.strip_suffix('+') {
            let min = min.trim().parse().ok()?;
            return Some(Self { min, max: None });
        }

        let (min, max) = token.split_once('-')?;
        let min: u64 = min.trim().parse().ok()?;
        let max: u64 = max.trim().parse().ok()?;

        if min > max {
            return None;
        }

        Some(Self {
            min,
            max: (max < PRICE_SENTINEL_MAX).then_some(max),
        })
    }

    /// Whether the bucket has no upper limit.
    #[must_use]
    pub const fn is_open_ended(&self) -> bool {
        self.max.is_none()
    }

    /// Display label, e.g. `"$50 - $100"` or `"$200+"`.
    #[must_use]
    pub fn label(&self) -> String {
        match self.max {
            Some(max) => format!("${} - ${max}", self.min),
            None => format!("${}+", self.min),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_and_sorts() {
        let mut sel = FilterSelection::new();
        sel.set(FilterGroup::Colors, ["red", "black"]);
        sel.set(FilterGroup::Colors, ["blue", "white"]);

        let colors: Vec<_> = sel.values(FilterGroup::Colors).collect();
        assert_eq!(colors, vec!["blue", "white"]);
    }

    #[test]
    fn test_set_empty_removes_group() {
        let mut sel = FilterSelection::new();
        sel.set(FilterGroup::Tags, ["organic"]);
        sel.set(FilterGroup::Tags, Vec::<String>::new());

        assert!(sel.is_empty());
        assert_eq!(sel.first(FilterGroup::Tags), None);
    }

    #[test]
    fn test_set_drops_unusable_values() {
        let mut sel = FilterSelection::new();
        sel.set(FilterGroup::Ages, ["", "  ", "a,b", " 2-4y "]);

        let ages: Vec<_> = sel.values(FilterGroup::Ages).collect();
        assert_eq!(ages, vec!["2-4y"]);
    }

    #[test]
    fn test_price_range_is_single_valued() {
        let mut sel = FilterSelection::new();
        sel.set(FilterGroup::PriceRange, ["50-100", "0-50"]);

        let prices: Vec<_> = sel.values(FilterGroup::PriceRange).collect();
        assert_eq!(prices, vec!["50-100"]);
    }

    #[test]
    fn test_remove_single_value() {
        let mut sel = FilterSelection::new();
        sel.set(FilterGroup::Colors, ["red", "black"]);
        sel.remove(FilterGroup::Colors, "red");
        assert!(sel.contains(FilterGroup::Colors, "black"));
        assert!(!sel.contains(FilterGroup::Colors, "red"));

        sel.remove(FilterGroup::Colors, "black");
        assert!(sel.is_empty());
    }

    #[test]
    fn test_insertion_order_irrelevant() {
        let mut a = FilterSelection::new();
        a.set(FilterGroup::Colors, ["red", "blue"]);
        a.set(FilterGroup::Ages, ["2-4y"]);

        let mut b = FilterSelection::new();
        b.set(FilterGroup::Ages, ["2-4y"]);
        b.set(FilterGroup::Colors, ["blue", "red"]);

        assert_eq!(a, b);
    }

    #[test]
    fn test_chips_labels() {
        let mut sel = FilterSelection::new();
        sel.set(FilterGroup::Categories, ["baby-girls"]);
        sel.set(FilterGroup::PriceRange, ["200-1000"]);

        let chips = sel.chips();
        assert_eq!(chips.len(), 2);
        assert_eq!(chips[0].group_label, "Category");
        assert_eq!(chips[0].value_label, "Baby Girls");
        assert_eq!(chips[1].group_label, "Price");
        assert_eq!(chips[1].value_label, "$200+");
    }

    #[test]
    fn test_group_url_keys_round_trip() {
        for group in FilterGroup::ALL {
            assert_eq!(FilterGroup::from_url_key(group.url_key()), Some(group));
        }
        assert_eq!(FilterGroup::from_url_key("priceRange"), None);
    }

    #[test]
    fn test_price_bucket_bounded() {
        let bucket = PriceBucket::parse("50-100");
        assert_eq!(
            bucket,
            Some(PriceBucket {
                min: 50,
                max: Some(100)
            })
        );
    }

    #[test]
    fn test_price_bucket_sentinel_is_open_ended() {
        let bucket = PriceBucket::parse("200-1000");
        assert_eq!(bucket, Some(PriceBucket { min: 200, max: None }));
        assert!(bucket.is_some_and(|b| b.is_open_ended()));
    }

    #[test]
    fn test_price_bucket_plus_form() {
        assert_eq!(
            PriceBucket::parse("100+"),
            Some(PriceBucket { min: 100, max: None })
        );
    }

    #[test]
    fn test_price_bucket_malformed() {
        assert_eq!(PriceBucket::parse("cheap"), None);
        assert_eq!(PriceBucket::parse("100-50"), None);
        assert_eq!(PriceBucket::parse("-50"), None);
        assert_eq!(PriceBucket::parse(""), None);
    }

    #[test]
    fn test_price_bucket_labels() {
        assert_eq!(
            PriceBucket { min: 50, max: Some(100) }.label(),
            "$50 - $100"
        );
        assert_eq!(PriceBucket { min: 100, max: None }.label(), "$100+");
    }
}
