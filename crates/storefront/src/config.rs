//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `MEDUSA_BACKEND_URL` - Medusa backend URL (e.g., <http://localhost:9000>)
//! - `MEDUSA_PUBLISHABLE_KEY` - Store API publishable key (`pk_...`)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 8000)
//! - `DEFAULT_COUNTRY_CODE` - Country used for `/` (default: ng)
//! - `LISTING_PAGE_SIZE` - Products per grid page (default: 12)
//! - `CAROUSEL_PAGE_SIZE` - Products in the latest-arrivals carousel (default: 8)
//! - `LISTING_CACHE_TTL_SECS` - Listing memoization lifetime (default: 60)
//! - `LISTING_CACHE_CAPACITY` - Max memoized listing pages (default: 1000)
//! - `CAROUSEL_INTERVAL_MS` - Carousel auto-advance interval (default: 5000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate (default: 0.0)
//!
//! ## Seeder (`elorad` CLI)
//! - `MEDUSA_BACKEND_URL` - Medusa backend URL
//! - `MEDUSA_ADMIN_API_KEY` - Admin secret API key (`sk_...`)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Country code used when the URL does not carry one
    pub default_country_code: String,
    /// Medusa Store API configuration
    pub medusa: MedusaConfig,
    /// Listing pipeline tuning
    pub listing: ListingConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Medusa Store API configuration.
#[derive(Debug, Clone)]
pub struct MedusaConfig {
    /// Backend base URL, without trailing slash
    pub backend_url: String,
    /// Publishable API key sent as `x-publishable-api-key`
    pub publishable_key: String,
}

/// Listing pipeline settings.
#[derive(Debug, Clone)]
pub struct ListingConfig {
    /// Products per grid page
    pub page_size: u32,
    /// Products fetched for the latest-arrivals carousel
    pub carousel_size: u32,
    /// How long a memoized listing page stays valid
    pub cache_ttl: Duration,
    /// Maximum memoized listing pages
    pub cache_capacity: u64,
    /// Carousel auto-advance interval
    pub carousel_interval: Duration,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: 12,
            carousel_size: 8,
            cache_ttl: Duration::from_secs(60),
            cache_capacity: 1000,
            carousel_interval: Duration::from_millis(5000),
        }
    }
}

/// Medusa Admin API configuration, used by the seeder.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct MedusaAdminConfig {
    /// Backend base URL, without trailing slash
    pub backend_url: String,
    /// Secret API key (`sk_...`)
    pub api_key: SecretString,
}

impl std::fmt::Debug for MedusaAdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MedusaAdminConfig")
            .field("backend_url", &self.backend_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_parsed_or_default::<IpAddr>("STOREFRONT_HOST", "127.0.0.1")?;
        let port = get_parsed_or_default::<u16>("STOREFRONT_PORT", "8000")?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        let default_country_code =
            get_env_or_default("DEFAULT_COUNTRY_CODE", "ng").to_ascii_lowercase();

        let medusa = MedusaConfig::from_env()?;
        let listing = ListingConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            default_country_code,
            medusa,
            listing,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_parsed_or_default("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: get_parsed_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl MedusaConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            backend_url: get_backend_url()?,
            publishable_key: get_required_env("MEDUSA_PUBLISHABLE_KEY")?,
        })
    }
}

impl ListingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let page_size = get_parsed_or_default::<u32>("LISTING_PAGE_SIZE", "12")?;
        let carousel_size = get_parsed_or_default::<u32>("CAROUSEL_PAGE_SIZE", "8")?;
        if page_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "LISTING_PAGE_SIZE".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        if carousel_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CAROUSEL_PAGE_SIZE".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            page_size,
            carousel_size,
            cache_ttl: Duration::from_secs(get_parsed_or_default("LISTING_CACHE_TTL_SECS", "60")?),
            cache_capacity: get_parsed_or_default("LISTING_CACHE_CAPACITY", "1000")?,
            carousel_interval: Duration::from_millis(get_parsed_or_default(
                "CAROUSEL_INTERVAL_MS",
                "5000",
            )?),
        })
    }
}

impl MedusaAdminConfig {
    /// Load the Admin API configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if variables are missing or the API key looks
    /// like a placeholder or has too little entropy.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            backend_url: get_backend_url()?,
            api_key: get_validated_secret("MEDUSA_ADMIN_API_KEY")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get the Medusa backend URL, validated and without trailing slash.
fn get_backend_url() -> Result<String, ConfigError> {
    let raw = get_required_env("MEDUSA_BACKEND_URL")?;
    url::Url::parse(&raw).map_err(|e| {
        ConfigError::InvalidEnvVar("MEDUSA_BACKEND_URL".to_string(), e.to_string())
    })?;
    Ok(raw.trim_end_matches('/').to_string())
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an environment variable parsed into `T`, falling back to a default.
fn get_parsed_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real API keys are random; low entropy means a hand-typed value
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key generated by Medusa."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
