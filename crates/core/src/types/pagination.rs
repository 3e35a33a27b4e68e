//! Offset pagination for product listings.
//!
//! Pages are 1-based. A [`PageCursor`] turns the page number into the
//! offset Medusa expects; [`PageWindow`] decides which page links the
//! pagination control shows.

use serde::{Deserialize, Serialize};

/// Current page and page size of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageCursor {
    page: u32,
    size: u32,
}

impl PageCursor {
    /// Create a cursor. Page numbers below 1 are clamped to 1, and a page
    /// size of 0 is treated as 1.
    #[must_use]
    pub fn new(page: i64, size: u32) -> Self {
        let page = u32::try_from(page.max(1)).unwrap_or(u32::MAX);
        Self {
            page,
            size: size.max(1),
        }
    }

    /// The first page.
    #[must_use]
    pub fn first(size: u32) -> Self {
        Self::new(1, size)
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Page size (API `limit`).
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Number of items to skip: `(page - 1) * size`.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.size as u64
    }
}

/// Number of pages needed for `total_count` items: `ceil(total / size)`.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // clamped to u32::MAX first
pub const fn total_pages(total_count: u64, size: u32) -> u32 {
    if size == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(size as u64);
    if pages > u32::MAX as u64 {
        u32::MAX
    } else {
        pages as u32
    }
}

/// One entry in the pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    /// A link to a page.
    Page(u32),
    /// An ellipsis standing for skipped pages.
    Gap,
}

/// Page links around the current page.
///
/// Always shows the first and last page plus the current page and its
/// direct neighbours; runs of skipped pages collapse into a single
/// [`PageItem::Gap`]. Never yields a page above `total_pages`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub current: u32,
    pub total_pages: u32,
    pub items: Vec<PageItem>,
}

impl PageWindow {
    /// Build the window for a page within `total_pages`.
    ///
    /// A current page beyond the last page is clamped to the last page.
    #[must_use]
    pub fn new(current: u32, total_pages: u32) -> Self {
        if total_pages <= 1 {
            return Self {
                current: 1,
                total_pages,
                items: Vec::new(),
            };
        }

        let current = current.clamp(1, total_pages);
        let mut shown = [
            1,
            current.saturating_sub(1).max(1),
            current,
            current.saturating_add(1).min(total_pages),
            total_pages,
        ];
        shown.sort_unstable();

        let mut items = Vec::with_capacity(7);
        let mut last_shown = 0;
        for page in shown {
            if page == last_shown {
                continue;
            }
            if page - last_shown > 1 && last_shown != 0 {
                items.push(PageItem::Gap);
            }
            items.push(PageItem::Page(page));
            last_shown = page;
        }

        Self {
            current,
            total_pages,
            items,
        }
    }

    /// Whether the control should render at all.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.total_pages > 1
    }

    /// Previous page, if any.
    #[must_use]
    pub const fn prev(&self) -> Option<u32> {
        if self.current > 1 {
            Some(self.current - 1)
        } else {
            None
        }
    }

    /// Next page, if any.
    #[must_use]
    pub const fn next(&self) -> Option<u32> {
        if self.current < self.total_pages {
            Some(self.current + 1)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_offset() {
        assert_eq!(PageCursor::new(1, 12).offset(), 0);
        assert_eq!(PageCursor::new(2, 12).offset(), 12);
        assert_eq!(PageCursor::new(5, 8).offset(), 32);
    }

    #[test]
    fn test_page_below_one_is_clamped() {
        assert_eq!(PageCursor::new(0, 12).page(), 1);
        assert_eq!(PageCursor::new(-3, 12).page(), 1);
        assert_eq!(PageCursor::new(-3, 12).offset(), 0);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 12), 0);
        assert_eq!(total_pages(1, 12), 1);
        assert_eq!(total_pages(12, 12), 1);
        assert_eq!(total_pages(13, 12), 2);
        assert_eq!(total_pages(100, 12), 9);
    }

    #[test]
    fn test_window_hidden_for_single_page() {
        let window = PageWindow::new(1, 1);
        assert!(!window.is_visible());
        assert!(window.items.is_empty());
    }

    #[test]
    fn test_window_small() {
        let window = PageWindow::new(2, 3);
        assert_eq!(
            window.items,
            vec![PageItem::Page(1), PageItem::Page(2), PageItem::Page(3)]
        );
    }

    #[test]
    fn test_window_with_gaps() {
        let window = PageWindow::new(5, 9);
        assert_eq!(
            window.items,
            vec![
                PageItem::Page(1),
                PageItem::Gap,
                PageItem::Page(4),
                PageItem::Page(5),
                PageItem::Page(6),
                PageItem::Gap,
                PageItem::Page(9),
            ]
        );
        assert_eq!(window.prev(), Some(4));
        assert_eq!(window.next(), Some(6));
    }

    #[test]
    fn test_window_clamps_current() {
        let window = PageWindow::new(40, 4);
        assert_eq!(window.current, 4);
        assert_eq!(window.next(), None);
    }

    #[test]
    fn test_window_at_u32_max() {
        let window = PageWindow::new(u32::MAX, u32::MAX);
        assert_eq!(
            window.items,
            vec![
                PageItem::Page(1),
                PageItem::Gap,
                PageItem::Page(u32::MAX - 1),
                PageItem::Page(u32::MAX),
            ]
        );
        assert_eq!(window.next(), None);
        assert_eq!(window.prev(), Some(u32::MAX - 1));
    }

    #[test]
    fn test_window_edges_have_no_gap() {
        assert_eq!(
            PageWindow::new(1, 2).items,
            vec![PageItem::Page(1), PageItem::Page(2)]
        );
        assert_eq!(
            PageWindow::new(3, 4).items,
            vec![
                PageItem::Page(1),
                PageItem::Page(2),
                PageItem::Page(3),
                PageItem::Page(4),
            ]
        );
        assert_eq!(
            PageWindow::new(1, 1_000_000).items,
            vec![
                PageItem::Page(1),
                PageItem::Page(2),
                PageItem::Gap,
                PageItem::Page(1_000_000),
            ]
        );
    }

    proptest! {
        #[test]
        fn prop_offset_law(page in 1i64..10_000, size in 1u32..500) {
            let cursor = PageCursor::new(page, size);
            #[allow(clippy::cast_sign_loss)]
            let expected = (page as u64 - 1) * u64::from(size);
            prop_assert_eq!(cursor.offset(), expected);
        }

        #[test]
        fn prop_low_pages_act_as_first(page in i64::MIN..1, size in 1u32..500) {
            prop_assert_eq!(PageCursor::new(page, size), PageCursor::first(size));
        }

        #[test]
        fn prop_window_never_exceeds_total(current in 0u32..200, count in 0u64..5_000, size in 1u32..50) {
            let pages = total_pages(count, size);
            let window = PageWindow::new(current, pages);
            for item in &window.items {
                if let PageItem::Page(n) = item {
                    prop_assert!(*n >= 1 && *n <= pages);
                }
            }
        }

        #[test]
        fn prop_window_is_ascending_and_bounded(current in any::<u32>(), pages in 2u32..=u32::MAX) {
            let window = PageWindow::new(current, pages);
            prop_assert!(window.items.len() <= 7);
            prop_assert_eq!(window.items.first(), Some(&PageItem::Page(1)));
            prop_assert_eq!(window.items.last(), Some(&PageItem::Page(pages)));

            let numbers: Vec<u32> = window
                .items
                .iter()
                .filter_map(|item| match item {
                    PageItem::Page(n) => Some(*n),
                    PageItem::Gap => None,
                })
                .collect();
            prop_assert!(numbers.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(numbers.contains(&window.current));
        }
    }
}
