//! Listing filter state and its URL form.
//!
//! [`FilterState`] is the single source of truth for a listing view. It
//! reads from and writes to the browser query string:
//!
//! | Key | Form |
//! |---|---|
//! | `sortBy` | sort token, omitted for the default |
//! | `page` | 1-based page, omitted for page 1 |
//! | `categories`, `ages`, `colors`, `tags` | comma-separated values |
//! | `price_range` | one `min-max` or `min+` token |
//!
//! Mutations return a [`Navigation`] carrying the rewritten query; the route
//! layer turns that into a link, a redirect or an `HX-Push-Url` header.

use elorad_core::{FilterGroup, FilterSelection, PageCursor, PriceBucket, SortOption};
use url::form_urlencoded;

/// Query-string key for the sort option.
pub const SORT_KEY: &str = "sortBy";

/// Query-string key for the page number.
pub const PAGE_KEY: &str = "page";

/// Filters, sort and page of a listing view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    selection: FilterSelection,
    sort: SortOption,
    page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            selection: FilterSelection::new(),
            sort: SortOption::default(),
            page: 1,
        }
    }
}

/// A URL rewrite produced by a state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    query: String,
}

impl Navigation {
    /// The new query string, without the leading `?`.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Full link for a listing rooted at `base_path`.
    #[must_use]
    pub fn href(&self, base_path: &str) -> String {
        join_href(base_path, &self.query)
    }
}

impl FilterState {
    /// Parse a query string (with or without a leading `?`).
    ///
    /// Unknown keys are ignored. Malformed values degrade to the default:
    /// an unknown `sortBy`, a non-numeric `page` and a `price_range` that is
    /// not a price bucket are all treated as absent. When a key repeats, the
    /// last occurrence wins.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut state = Self::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                SORT_KEY => state.sort = SortOption::parse(value.trim()).unwrap_or_default(),
                PAGE_KEY => {
                    state.page = value
                        .trim()
                        .parse::<i64>()
                        .map_or(1, |page| PageCursor::new(page, 1).page());
                }
                other => {
                    if let Some(group) = FilterGroup::from_url_key(other) {
                        state.set_group(group, value.split(','));
                    }
                }
            }
        }

        state
    }

    /// Active filters.
    #[must_use]
    pub const fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    /// Active sort option.
    #[must_use]
    pub const fn sort(&self) -> SortOption {
        self.sort
    }

    /// Current 1-based page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Pagination cursor for a page size.
    #[must_use]
    pub fn cursor(&self, page_size: u32) -> PageCursor {
        PageCursor::new(i64::from(self.page()), page_size)
    }

    /// Whether nothing differs from the default view.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.selection.is_empty() && self.sort == SortOption::default() && self.page() == 1
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Replace the values of one group and go back to page 1.
    ///
    /// An empty `values` removes the group.
    pub fn apply<I, S>(&mut self, group: FilterGroup, values: I) -> Navigation
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_group(group, values);
        self.page = 1;
        self.navigation()
    }

    /// Remove a single value from a group.
    pub fn remove(&mut self, group: FilterGroup, value: &str) -> Navigation {
        let remaining: Vec<String> = self
            .selection
            .values(group)
            .filter(|v| *v != value)
            .map(str::to_string)
            .collect();
        self.apply(group, remaining)
    }

    /// Empty every group and reset sort and page.
    pub fn clear(&mut self) -> Navigation {
        self.selection.clear();
        self.sort = SortOption::default();
        self.page = 1;
        self.navigation()
    }

    /// Change the sort option and go back to page 1.
    pub fn set_sort(&mut self, sort: SortOption) -> Navigation {
        self.sort = sort;
        self.page = 1;
        self.navigation()
    }

    /// Move to another page, keeping filters and sort.
    pub fn go_to_page(&mut self, page: i64) -> Navigation {
        self.page = PageCursor::new(page, 1).page();
        self.navigation()
    }

    /// Price ranges that are not price buckets are dropped, so the URL
    /// never carries a value `from_query` would discard.
    fn set_group<I, S>(&mut self, group: FilterGroup, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if group == FilterGroup::PriceRange {
            let buckets: Vec<String> = values
                .into_iter()
                .map(|v| v.as_ref().trim().to_string())
                .filter(|v| PriceBucket::parse(v).is_some())
                .collect();
            self.selection.set(group, buckets);
        } else {
            self.selection.set(group, values);
        }
    }

    fn navigation(&self) -> Navigation {
        Navigation {
            query: self.to_query_string(),
        }
    }

    // =========================================================================
    // URL form
    // =========================================================================

    /// Serialize to a query string, omitting defaults.
    ///
    /// Keys appear in a fixed order (`sortBy`, filter groups, `page`), so
    /// equal states always produce the same string.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());

        if self.sort != SortOption::default() {
            serializer.append_pair(SORT_KEY, self.sort.as_str());
        }

        for group in FilterGroup::ALL {
            let joined = self.selection.values(group).collect::<Vec<_>>().join(",");
            if !joined.is_empty() {
                serializer.append_pair(group.url_key(), &joined);
            }
        }

        if self.page() > 1 {
            serializer.append_pair(PAGE_KEY, &self.page().to_string());
        }

        serializer.finish()
    }

    /// Link to this state under `base_path`.
    #[must_use]
    pub fn href(&self, base_path: &str) -> String {
        join_href(base_path, &self.to_query_string())
    }

    /// Link that toggles one filter value on or off.
    #[must_use]
    pub fn toggle_href(&self, base_path: &str, group: FilterGroup, value: &str) -> String {
        let mut next = self.clone();
        let navigation = if self.selection.contains(group, value) {
            next.remove(group, value)
        } else if group.is_single_valued() {
            next.apply(group, [value])
        } else {
            let mut values: Vec<&str> = self.selection.values(group).collect();
            values.push(value);
            next.apply(group, values)
        };
        navigation.href(base_path)
    }

    /// Link that removes one filter value.
    #[must_use]
    pub fn remove_href(&self, base_path: &str, group: FilterGroup, value: &str) -> String {
        self.clone().remove(group, value).href(base_path)
    }

    /// Link that selects a sort option.
    #[must_use]
    pub fn sort_href(&self, base_path: &str, sort: SortOption) -> String {
        self.clone().set_sort(sort).href(base_path)
    }

    /// Link to another page of the same listing.
    #[must_use]
    pub fn page_href(&self, base_path: &str, page: u32) -> String {
        self.clone().go_to_page(i64::from(page)).href(base_path)
    }

    /// Link that clears every filter.
    #[must_use]
    pub fn clear_href(&self, base_path: &str) -> String {
        self.clone().clear().href(base_path)
    }
}

fn join_href(base_path: &str, query: &str) -> String {
    if query.is_empty() {
        base_path.to_string()
    } else {
        format!("{base_path}?{query}")
    }
}
