//! Elorad Storefront library.
//!
//! The storefront as a library, so the binary, the seeder CLI and the
//! integration tests share one router and one Medusa client.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod listing;
pub mod medusa;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod widgets;
