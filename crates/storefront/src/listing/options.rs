//! Options offered in the filter sidebar.
//!
//! Groups without options here (categories, tags) are still honored when
//! they arrive in the URL; they just have no sidebar checkboxes.

use elorad_core::FilterGroup;

/// One selectable filter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOption {
    pub value: &'static str,
    pub label: &'static str,
    /// Swatch color for color filters.
    pub swatch: Option<&'static str>,
}

impl FilterOption {
    const fn plain(value: &'static str, label: &'static str) -> Self {
        Self {
            value,
            label,
            swatch: None,
        }
    }

    const fn color(value: &'static str, label: &'static str, hex: &'static str) -> Self {
        Self {
            value,
            label,
            swatch: Some(hex),
        }
    }
}

/// A sidebar section.
#[derive(Debug, Clone, Copy)]
pub struct FilterSection {
    pub group: FilterGroup,
    pub title: &'static str,
    pub options: &'static [FilterOption],
}

const AGES: &[FilterOption] = &[
    FilterOption::plain("toddlers", "Toddlers (1-3 years)"),
    FilterOption::plain("kids", "Kids (4-8 years)"),
    FilterOption::plain("preteens", "Pre-Teens (9-12 years)"),
    FilterOption::plain("teens", "Teens (13-16 years)"),
];

const COLORS: &[FilterOption] = &[
    FilterOption::color("black", "Black", "#000000"),
    FilterOption::color("white", "White", "#FFFFFF"),
    FilterOption::color("gray", "Gray", "#808080"),
    FilterOption::color("blue", "Blue", "#0000FF"),
    FilterOption::color("red", "Red", "#FF0000"),
];

const PRICE_RANGES: &[FilterOption] = &[
    FilterOption::plain("0-50", "Under $50"),
    FilterOption::plain("50-100", "$50 - $100"),
    FilterOption::plain("100+", "$100+"),
];

/// Sidebar sections in display order.
pub const SECTIONS: &[FilterSection] = &[
    FilterSection {
        group: FilterGroup::Ages,
        title: "Age",
        options: AGES,
    },
    FilterSection {
        group: FilterGroup::Colors,
        title: "Colors",
        options: COLORS,
    },
    FilterSection {
        group: FilterGroup::PriceRange,
        title: "Price Range",
        options: PRICE_RANGES,
    },
];

#[cfg(test)]
mod tests {
    use elorad_core::PriceBucket;

    use super::*;

    #[test]
    fn test_price_options_are_buckets() {
        for option in PRICE_RANGES {
            assert!(PriceBucket::parse(option.value).is_some(), "{}", option.value);
        }
    }

    #[test]
    fn test_values_survive_the_url() {
        for section in SECTIONS {
            for option in section.options {
                assert!(!option.value.contains(','));
                assert_eq!(option.value.trim(), option.value);
            }
        }
    }
}
