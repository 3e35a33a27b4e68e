//! Product carousel position.
//!
//! [`Carousel`] is the position model the home page renders from: which
//! slide comes first, where the arrows and dots lead, and how many dots
//! there are. Without script those are plain links back to the page; with
//! it, `storefront.js` takes over the same rules and adds the timer, which
//! pauses while the shopper hovers or touches the track.

/// Horizontal drag distance, in pixels, that turns into a slide.
pub const DRAG_THRESHOLD_PX: i32 = 100;

/// Number of cards visible at a viewport width.
#[must_use]
pub const fn visible_for_width(width_px: u32) -> usize {
    if width_px < 640 {
        1
    } else if width_px < 1024 {
        2
    } else {
        4
    }
}

/// Carousel position over `len` items, `visible` at a time.
///
/// The index is the first visible item. It ranges over
/// `0..=len - visible`, and stepping past either end wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    visible: usize,
    index: usize,
}

impl Carousel {
    #[must_use]
    pub const fn new(len: usize, visible: usize) -> Self {
        Self {
            len,
            visible: if visible == 0 { 1 } else { visible },
            index: 0,
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub const fn visible(&self) -> usize {
        self.visible
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Last reachable index.
    #[must_use]
    pub const fn max_index(&self) -> usize {
        self.len.saturating_sub(self.visible)
    }

    /// Whether arrows and dots are shown; false when everything fits.
    #[must_use]
    pub const fn shows_navigation(&self) -> bool {
        self.len > self.visible
    }

    /// Jump to an index, clamped to the last reachable one.
    pub const fn go_to(&mut self, index: usize) {
        self.index = if index > self.max_index() {
            self.max_index()
        } else {
            index
        };
    }

    pub const fn next(&mut self) {
        if !self.shows_navigation() {
            return;
        }
        self.index = if self.index >= self.max_index() {
            0
        } else {
            self.index + 1
        };
    }

    pub const fn prev(&mut self) {
        if !self.shows_navigation() {
            return;
        }
        self.index = if self.index == 0 {
            self.max_index()
        } else {
            self.index - 1
        };
    }

    /// Number of pagination dots.
    #[must_use]
    pub const fn dot_count(&self) -> usize {
        self.len.div_ceil(self.visible)
    }

    /// Dot for the current index.
    #[must_use]
    pub const fn active_dot(&self) -> usize {
        self.index / self.visible
    }

    /// Jump to a dot. The last dot may land short of a full page, so the
    /// index is clamped to the last reachable one.
    pub const fn go_to_dot(&mut self, dot: usize) {
        self.go_to(dot.saturating_mul(self.visible));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_for_width() {
        assert_eq!(visible_for_width(375), 1);
        assert_eq!(visible_for_width(639), 1);
        assert_eq!(visible_for_width(640), 2);
        assert_eq!(visible_for_width(1023), 2);
        assert_eq!(visible_for_width(1024), 4);
        assert_eq!(visible_for_width(1920), 4);
    }

    #[test]
    fn test_next_wraps_single_visible() {
        let mut carousel = Carousel::new(3, 1);
        carousel.next();
        carousel.next();
        assert_eq!(carousel.index(), 2);
        carousel.next();
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn test_prev_wraps_to_last_start() {
        let mut carousel = Carousel::new(8, 4);
        carousel.prev();
        assert_eq!(carousel.index(), 4);
        carousel.next();
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn test_everything_fits() {
        let mut carousel = Carousel::new(3, 4);
        assert!(!carousel.shows_navigation());
        carousel.next();
        carousel.prev();
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn test_dots() {
        let mut carousel = Carousel::new(8, 2);
        assert_eq!(carousel.dot_count(), 4);
        carousel.go_to_dot(2);
        assert_eq!(carousel.index(), 4);
        assert_eq!(carousel.active_dot(), 2);

        let mut carousel = Carousel::new(7, 4);
        assert_eq!(carousel.dot_count(), 2);
        carousel.go_to_dot(1);
        assert_eq!(carousel.index(), 3);
    }

    #[test]
    fn test_go_to_clamps() {
        let mut carousel = Carousel::new(8, 4);
        carousel.go_to(2);
        assert_eq!(carousel.index(), 2);
        carousel.go_to(usize::MAX);
        assert_eq!(carousel.index(), 4);

        let mut empty = Carousel::new(0, 4);
        empty.go_to(3);
        assert_eq!(empty.index(), 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_zero_visible_treated_as_one() {
        let carousel = Carousel::new(3, 0);
        assert_eq!(carousel.visible(), 1);
        assert_eq!(carousel.dot_count(), 3);
    }
}
