//! Flat view models shared by the page and fragment templates.
//!
//! Templates only see strings, booleans and vectors; every link is built
//! here from [`FilterState`] so the HTML never assembles URLs itself.

use elorad_core::{PageItem, SortOption};

use crate::listing::options::SECTIONS;
use crate::listing::{FilterState, ListingView};
use crate::medusa::ProductSummary;

/// Paths for one country's listing.
#[derive(Debug, Clone)]
pub struct ListingPaths {
    /// Full page, e.g. `/ng/store`.
    pub page: String,
    /// HTMX fragment, e.g. `/ng/store/grid`.
    pub grid: String,
}

impl ListingPaths {
    #[must_use]
    pub fn for_country(country: &str) -> Self {
        Self {
            page: format!("/{country}/store"),
            grid: format!("/{country}/store/grid"),
        }
    }
}

/// A link that works with and without HTMX.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkView {
    pub href: String,
    pub hx_get: String,
}

impl LinkView {
    fn to(state: &FilterState, paths: &ListingPaths) -> Self {
        Self {
            href: state.href(&paths.page),
            hx_get: state.href(&paths.grid),
        }
    }
}

// =============================================================================
// Product cards
// =============================================================================

/// A product card.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub title: String,
    pub href: String,
    pub quick_view_href: String,
    pub thumbnail: Option<String>,
    pub price: Option<String>,
    /// Set only when the product is discounted.
    pub original_price: Option<String>,
    pub discount_percent: Option<u32>,
}

impl ProductCardView {
    #[must_use]
    pub fn new(country: &str, product: &ProductSummary) -> Self {
        let discounted = product.price.filter(|p| p.is_discounted());
        Self {
            title: product.title.clone(),
            href: format!("/{country}/products/{}", product.handle),
            quick_view_href: format!("/{country}/products/{}/quick-view", product.handle),
            thumbnail: product.thumbnail.clone(),
            price: product.price.map(|p| p.calculated.display()),
            original_price: discounted.map(|p| p.original.display()),
            discount_percent: discounted.map(|p| p.percentage_diff),
        }
    }
}

// =============================================================================
// Sidebar, chips and sort
// =============================================================================

/// One checkbox-style option in the sidebar.
#[derive(Debug, Clone)]
pub struct FilterOptionView {
    pub label: &'static str,
    pub swatch: Option<&'static str>,
    pub checked: bool,
    pub link: LinkView,
}

/// A sidebar section.
#[derive(Debug, Clone)]
pub struct FilterSectionView {
    pub title: &'static str,
    pub key: &'static str,
    pub options: Vec<FilterOptionView>,
}

/// An active-filter chip with its remove link.
#[derive(Debug, Clone)]
pub struct ChipView {
    pub label: String,
    pub link: LinkView,
}

/// An entry in the sort dropdown.
#[derive(Debug, Clone)]
pub struct SortOptionView {
    pub label: &'static str,
    pub selected: bool,
    pub link: LinkView,
}

#[must_use]
pub fn filter_sections(state: &FilterState, paths: &ListingPaths) -> Vec<FilterSectionView> {
    SECTIONS
        .iter()
        .map(|section| FilterSectionView {
            title: section.title,
            key: section.group.url_key(),
            options: section
                .options
                .iter()
                .map(|option| FilterOptionView {
                    label: option.label,
                    swatch: option.swatch,
                    checked: state.selection().contains(section.group, option.value),
                    link: LinkView {
                        href: state.toggle_href(&paths.page, section.group, option.value),
                        hx_get: state.toggle_href(&paths.grid, section.group, option.value),
                    },
                })
                .collect(),
        })
        .collect()
}

#[must_use]
pub fn chips(state: &FilterState, paths: &ListingPaths) -> Vec<ChipView> {
    state
        .selection()
        .chips()
        .into_iter()
        .map(|chip| ChipView {
            label: format!("{}: {}", chip.group_label, chip.value_label),
            link: LinkView {
                href: state.remove_href(&paths.page, chip.group, &chip.value),
                hx_get: state.remove_href(&paths.grid, chip.group, &chip.value),
            },
        })
        .collect()
}

#[must_use]
pub fn sort_options(state: &FilterState, paths: &ListingPaths) -> Vec<SortOptionView> {
    SortOption::ALL
        .iter()
        .map(|&sort| SortOptionView {
            label: sort.label(),
            selected: state.sort() == sort,
            link: LinkView {
                href: state.sort_href(&paths.page, sort),
                hx_get: state.sort_href(&paths.grid, sort),
            },
        })
        .collect()
}

// =============================================================================
// Grid
// =============================================================================

/// A pagination entry; gaps have no link.
#[derive(Debug, Clone)]
pub struct PageLinkView {
    pub number: u32,
    pub is_current: bool,
    pub link: Option<LinkView>,
}

/// Pagination control.
#[derive(Debug, Clone, Default)]
pub struct PaginationView {
    pub visible: bool,
    pub prev: Option<LinkView>,
    pub next: Option<LinkView>,
    pub pages: Vec<PageLinkView>,
}

/// The listing grid in any of its states.
#[derive(Debug, Clone, Default)]
pub struct GridView {
    pub is_empty: bool,
    pub is_error: bool,
    pub error_message: String,
    /// One entry per skeleton card.
    pub skeletons: Vec<u32>,
    pub products: Vec<ProductCardView>,
    pub total_count: u64,
    pub pagination: PaginationView,
    /// Re-issues the current query.
    pub retry: Option<LinkView>,
    pub clear: Option<LinkView>,
    pub continue_href: String,
}

impl GridView {
    #[must_use]
    pub fn new(view: ListingView, state: &FilterState, country: &str) -> Self {
        let paths = ListingPaths::for_country(country);
        let base = Self {
            continue_href: format!("/{country}"),
            ..Self::default()
        };

        match view {
            ListingView::Loading { skeletons } => Self {
                skeletons: (0..skeletons).collect(),
                ..base
            },
            ListingView::Empty => Self {
                is_empty: true,
                clear: Some(LinkView {
                    href: state.clear_href(&paths.page),
                    hx_get: state.clear_href(&paths.grid),
                }),
                ..base
            },
            ListingView::Error { message } => Self {
                is_error: true,
                error_message: message,
                retry: Some(LinkView::to(state, &paths)),
                ..base
            },
            ListingView::Populated {
                products,
                pagination,
                total_count,
            } => {
                let page_link = |page: u32| LinkView {
                    href: state.page_href(&paths.page, page),
                    hx_get: state.page_href(&paths.grid, page),
                };
                Self {
                    products: products
                        .iter()
                        .map(|p| ProductCardView::new(country, p))
                        .collect(),
                    total_count,
                    pagination: PaginationView {
                        visible: pagination.is_visible(),
                        prev: pagination.prev().map(page_link),
                        next: pagination.next().map(page_link),
                        pages: pagination
                            .items
                            .iter()
                            .map(|item| match *item {
                                PageItem::Page(number) => PageLinkView {
                                    number,
                                    is_current: number == pagination.current,
                                    link: Some(page_link(number)),
                                },
                                PageItem::Gap => PageLinkView {
                                    number: 0,
                                    is_current: false,
                                    link: None,
                                },
                            })
                            .collect(),
                    },
                    ..base
                }
            }
        }
    }
}
