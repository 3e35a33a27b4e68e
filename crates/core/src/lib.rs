//! Elorad Core - Shared types library.
//!
//! This crate provides the domain types used across all Elorad components:
//! - `storefront` - Public-facing storefront in front of the Medusa backend
//! - `cli` - Command-line tools (demo data seeding)
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Everything that needs to agree between the URL, the listing
//! pipeline and the seeder lives here.
//!
//! # Modules
//!
//! - [`types`] - Medusa IDs, handles, prices, product status, listing filters,
//!   sort options and pagination

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
