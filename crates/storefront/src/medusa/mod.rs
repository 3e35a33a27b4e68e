//! Medusa Store and Admin API clients.
//!
//! # Architecture
//!
//! - Plain JSON over REST with `reqwest`
//! - Medusa is the source of truth for catalog, pricing and inventory;
//!   nothing is synced locally
//! - Regions and product details are cached in memory via `moka`; listing
//!   pages go through [`crate::listing::fetch::QueryCache`]
//!
//! # APIs
//!
//! ## Store API
//! - Publishable key in the `x-publishable-api-key` header
//! - Product listings, product detail, regions
//!
//! ## Admin API
//! - Secret API key over HTTP Basic auth
//! - Only used by the demo-data seeder
//!
//! # Example
//!
//! ```rust,ignore
//! use elorad_storefront::medusa::StoreClient;
//!
//! let client = StoreClient::new(&config.medusa)?;
//! let region = client.region_for_country("ng").await?;
//! ```

pub mod admin;
mod cache;
mod conversions;
mod store;
pub mod types;

pub use admin::AdminClient;
pub use store::StoreClient;
pub use types::*;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur when interacting with the Medusa APIs.
#[derive(Debug, Error)]
pub enum MedusaError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Medusa.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// An entity the caller depends on does not exist.
    #[error("Missing entity: {0}")]
    MissingEntity(String),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// An API key cannot be sent as a header.
    #[error("Invalid API key format: {0}")]
    InvalidKey(String),
}

impl MedusaError {
    /// Message safe to show to shoppers.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "We couldn't find what you were looking for.",
            Self::RateLimited(_) => "The store is busy right now. Please try again in a moment.",
            _ => "We couldn't load products right now. Please try again.",
        }
    }
}

/// Error body returned by Medusa (`{"type": "...", "message": "..."}`).
#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Check status and decode a Medusa JSON response.
///
/// 429 becomes [`MedusaError::RateLimited`] using `Retry-After`; 404 becomes
/// [`MedusaError::NotFound`]; any other non-success status becomes
/// [`MedusaError::Api`] carrying Medusa's message when it sent one.
async fn decode_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, MedusaError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1);
        return Err(MedusaError::RateLimited(retry_after));
    }

    // Body as text first for better error diagnostics
    let response_text = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ApiErrorBody>(&response_text)
            .map(|body| body.message)
            .unwrap_or_else(|_| response_text.chars().take(200).collect());

        if status == StatusCode::NOT_FOUND {
            return Err(MedusaError::NotFound(message));
        }

        tracing::error!(
            status = %status,
            body = %response_text.chars().take(500).collect::<String>(),
            "Medusa API returned non-success status"
        );
        return Err(MedusaError::Api {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&response_text).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %response_text.chars().take(500).collect::<String>(),
            "Failed to parse Medusa response"
        );
        MedusaError::Parse(e)
    })
}
