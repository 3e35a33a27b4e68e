//! Listing view state machine.
//!
//! ```text
//!            ┌─────────────► Empty
//! Loading ───┼─────────────► Populated
//!            └─────────────► Error
//! ```
//!
//! A renderer resolves once; results arriving after that are ignored. The
//! next page, filter change or retry is a new request with a new renderer,
//! and its `Loading` view is what the listing shows while that request is in
//! flight.

use elorad_core::{PageWindow, total_pages};

use crate::medusa::ProductSummary;

use super::fetch::FetchState;

/// What the listing grid shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingView {
    /// Placeholder cards while a fetch is in flight.
    Loading { skeletons: u32 },
    /// The query matched nothing.
    Empty,
    /// A page of products and, when there is more than one page, the
    /// pagination control.
    Populated {
        products: Vec<ProductSummary>,
        pagination: PageWindow,
        total_count: u64,
    },
    /// The fetch failed.
    Error { message: String },
}

/// Drives a [`ListingView`] from fetch states.
#[derive(Debug, Clone)]
pub struct ListingRenderer {
    page_size: u32,
    page: u32,
    view: ListingView,
}

impl ListingRenderer {
    /// Start in `Loading` for a page of a listing.
    #[must_use]
    pub const fn new(page_size: u32, page: u32) -> Self {
        Self {
            page_size,
            page,
            view: ListingView::Loading {
                skeletons: page_size,
            },
        }
    }

    #[must_use]
    pub const fn view(&self) -> &ListingView {
        &self.view
    }

    #[must_use]
    pub fn into_view(self) -> ListingView {
        self.view
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.view, ListingView::Loading { .. })
    }

    /// Resolve a loading view from a fetch state.
    ///
    /// Only `Success` and `Error` resolve; anything else, or any state
    /// arriving when the view is not loading, is ignored. Returns whether
    /// the view changed.
    pub fn resolve(&mut self, state: &FetchState) -> bool {
        if !self.is_loading() {
            return false;
        }

        self.view = match state {
            FetchState::Success { page, .. } if page.products.is_empty() => ListingView::Empty,
            FetchState::Success { page, .. } => ListingView::Populated {
                products: page.products.clone(),
                pagination: PageWindow::new(self.page, total_pages(page.count, self.page_size)),
                total_count: page.count,
            },
            FetchState::Error { message, .. } => ListingView::Error {
                message: message.clone(),
            },
            FetchState::Idle | FetchState::Loading { .. } => return false,
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use elorad_core::{PageItem, RegionId};

    use super::*;
    use crate::listing::fetch::ProductPage;
    use crate::listing::query::ProductQuery;

    fn query() -> ProductQuery {
        ProductQuery::latest(12, &RegionId::new("reg_ng"))
    }

    fn summary(handle: &str) -> ProductSummary {
        ProductSummary {
            id: handle.into(),
            title: handle.to_string(),
            handle: handle.to_string(),
            thumbnail: None,
            price: None,
        }
    }

    fn success(count: u64, len: usize) -> FetchState {
        FetchState::Success {
            query: query(),
            page: ProductPage {
                products: (0..len).map(|i| summary(&format!("p-{i}"))).collect(),
                count,
            },
        }
    }

    #[test]
    fn test_starts_with_skeletons() {
        let renderer = ListingRenderer::new(12, 1);
        assert_eq!(renderer.view(), &ListingView::Loading { skeletons: 12 });
    }

    #[test]
    fn test_zero_results_render_empty() {
        let mut renderer = ListingRenderer::new(12, 1);
        assert!(renderer.resolve(&success(0, 0)));
        assert_eq!(renderer.view(), &ListingView::Empty);
    }

    #[test]
    fn test_populated_with_pagination() {
        let mut renderer = ListingRenderer::new(12, 2);
        renderer.resolve(&success(30, 12));

        let ListingView::Populated {
            products,
            pagination,
            total_count,
        } = renderer.view()
        else {
            panic!("expected populated view");
        };
        assert_eq!(products.len(), 12);
        assert_eq!(*total_count, 30);
        assert_eq!(pagination.total_pages, 3);
        assert_eq!(
            pagination.items,
            vec![PageItem::Page(1), PageItem::Page(2), PageItem::Page(3)]
        );
    }

    #[test]
    fn test_single_page_hides_pagination() {
        let mut renderer = ListingRenderer::new(12, 1);
        renderer.resolve(&success(5, 5));

        let ListingView::Populated { pagination, .. } = renderer.view() else {
            panic!("expected populated view");
        };
        assert!(!pagination.is_visible());
    }

    #[test]
    fn test_error_is_final() {
        let mut renderer = ListingRenderer::new(12, 1);
        assert!(renderer.resolve(&FetchState::Error {
            query: query(),
            message: "We couldn't load products right now. Please try again.".to_string(),
        }));
        assert!(matches!(renderer.view(), ListingView::Error { .. }));

        assert!(!renderer.resolve(&success(5, 5)));
        assert!(!renderer.is_loading());
    }

    #[test]
    fn test_resolved_view_ignores_late_results() {
        let mut renderer = ListingRenderer::new(12, 1);
        renderer.resolve(&success(0, 0));

        assert!(!renderer.resolve(&success(5, 5)));
        assert_eq!(renderer.view(), &ListingView::Empty);
    }

    #[test]
    fn test_loading_states_do_not_resolve() {
        let mut renderer = ListingRenderer::new(12, 1);
        assert!(!renderer.resolve(&FetchState::Idle));
        assert!(!renderer.resolve(&FetchState::Loading { query: query() }));
        assert!(renderer.is_loading());
    }
}
