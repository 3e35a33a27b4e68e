//! Product listing pipeline.
//!
//! ```text
//! URL query ──► FilterState ──► ProductQuery ──► QueryCache / Store API
//!                   ▲                                    │
//!                   │                                    ▼
//!              Navigation ◄── templates ◄── ListingRenderer ◄── ListingSession
//! ```
//!
//! - [`state`]: filters, sort and page, and their URL form
//! - [`query`]: Store API parameters for a state
//! - [`fetch`]: memoized fetches and last-query-wins sessions
//! - [`render`]: loading, empty, populated and error views
//! - [`options`]: what the filter sidebar offers

pub mod fetch;
pub mod options;
pub mod query;
pub mod render;
pub mod state;

pub use fetch::{
    FetchOutcome, FetchState, ListingSession, ListingSource, ListingViews, ProductPage, QueryCache,
};
pub use query::ProductQuery;
pub use render::{ListingRenderer, ListingView};
pub use state::{FilterState, Navigation};
