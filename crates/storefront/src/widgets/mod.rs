//! Presentation widgets backing the home carousel.

pub mod carousel;

pub use carousel::{Carousel, DRAG_THRESHOLD_PX, visible_for_width};
