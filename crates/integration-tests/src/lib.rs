//! Integration test support for Elorad.
//!
//! [`FakeMedusa`] serves just enough of the Medusa Store API on an ephemeral
//! port for the storefront router to run against it, and records every
//! product query it receives. [`TestContext`] wires a storefront
//! [`AppState`] to it.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p elorad-integration-tests
//! ```

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    body::Body,
    extract::{RawQuery, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use elorad_storefront::config::{ListingConfig, MedusaConfig, StorefrontConfig};
use elorad_storefront::routes;
use elorad_storefront::state::AppState;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::ServiceExt;

/// Products in the fake catalog.
pub const CATALOG_SIZE: u64 = 30;

/// How the fake answers `GET /store/products`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// A catalog of [`CATALOG_SIZE`] products.
    Normal,
    /// No products at all.
    Empty,
    /// HTTP 500 with a Medusa error body.
    Fail,
}

#[derive(Clone)]
struct FakeState {
    mode: Arc<Mutex<Mode>>,
    product_queries: Arc<Mutex<Vec<String>>>,
    /// Product requests filtering on a tag wait this long before answering.
    tag_delays: Arc<Mutex<Vec<(String, Duration)>>>,
}

/// A fake Medusa backend listening on localhost.
pub struct FakeMedusa {
    addr: SocketAddr,
    state: FakeState,
    server: tokio::task::JoinHandle<()>,
}

impl FakeMedusa {
    /// Start the fake on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start(mode: Mode) -> Self {
        let state = FakeState {
            mode: Arc::new(Mutex::new(mode)),
            product_queries: Arc::new(Mutex::new(Vec::new())),
            tag_delays: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new()
            .route("/health", get(|| async { "OK" }))
            .route("/store/regions", get(regions))
            .route("/store/products", get(products))
            .with_state(state.clone());

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("bind fake Medusa");
        let addr = listener.local_addr().expect("fake Medusa address");
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Base URL, without trailing slash.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Change how product requests are answered.
    pub fn set_mode(&self, mode: Mode) {
        *self.state.mode.lock().unwrap_or_else(PoisonError::into_inner) = mode;
    }

    /// Delay answers to product requests that filter on `tag`.
    pub fn delay_tag(&self, tag: &str, delay: Duration) {
        self.state
            .tag_delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((tag.to_string(), delay));
    }

    /// Raw query strings of every `GET /store/products` so far.
    #[must_use]
    pub fn product_queries(&self) -> Vec<String> {
        self.state
            .product_queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Decoded parameters of every product query so far.
    #[must_use]
    pub fn product_params(&self) -> Vec<Vec<(String, String)>> {
        self.product_queries()
            .iter()
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .collect()
    }

    /// Decoded parameters of the most recent product query.
    #[must_use]
    pub fn last_product_params(&self) -> Vec<(String, String)> {
        self.product_params().pop().unwrap_or_default()
    }
}

impl Drop for FakeMedusa {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn regions() -> Json<Value> {
    Json(json!({
        "regions": [
            {
                "id": "reg_ng",
                "name": "Nigeria",
                "currency_code": "ngn",
                "countries": [{ "iso_2": "ng", "display_name": "Nigeria" }]
            },
            {
                "id": "reg_us",
                "name": "United States",
                "currency_code": "usd",
                "countries": [{ "iso_2": "us", "display_name": "United States" }]
            }
        ]
    }))
}

async fn products(State(state): State<FakeState>, RawQuery(query): RawQuery) -> Response {
    let query = query.unwrap_or_default();
    state
        .product_queries
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(query.clone());

    let mode = *state.mode.lock().unwrap_or_else(PoisonError::into_inner);
    let params: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    let param = |key: &str| {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    };

    let delay = state
        .tag_delays
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .filter(|(tag, _)| params.iter().any(|(k, v)| k == "tags[]" && v == tag))
        .map(|(_, delay)| *delay)
        .max();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    match mode {
        Mode::Fail => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "type": "unknown_error", "message": "An unknown error occurred." })),
        )
            .into_response(),
        Mode::Empty => Json(json!({ "products": [], "count": 0, "offset": 0, "limit": 0 }))
            .into_response(),
        Mode::Normal => {
            if let Some(handle) = param("handle") {
                // "product-{n}" matches the catalog entry, anything else is prod_1
                let n = handle
                    .strip_prefix("product-")
                    .and_then(|n| n.parse().ok())
                    .unwrap_or(1);
                let products: Vec<Value> = if handle == "missing-product" {
                    Vec::new()
                } else {
                    vec![product(&handle, n)]
                };
                let count = products.len();
                return Json(json!({ "products": products, "count": count, "offset": 0, "limit": 1 }))
                    .into_response();
            }

            let limit: u64 = param("limit").and_then(|v| v.parse().ok()).unwrap_or(12);
            let offset: u64 = param("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
            let products: Vec<Value> = (offset..CATALOG_SIZE.min(offset + limit))
                .map(|i| product(&format!("product-{i}"), i))
                .collect();

            Json(json!({
                "products": products,
                "count": CATALOG_SIZE,
                "offset": offset,
                "limit": limit
            }))
            .into_response()
        }
    }
}

fn product(handle: &str, n: u64) -> Value {
    let amount = 1000 + n * 250;
    json!({
        "id": format!("prod_{n}"),
        "title": format!("Product {n}"),
        "handle": handle,
        "subtitle": "Cotton",
        "description": "A demo product.",
        "thumbnail": format!("https://loremflickr.com/640/480/clothes?lock={n}"),
        "images": [{ "id": format!("img_{n}"), "url": format!("https://loremflickr.com/640/480/clothes?lock={n}") }],
        "tags": [{ "id": "ptag_1", "value": "color-red" }],
        "collection_id": "pcol_01JSPP3HZF23D9V25Z80WBNNZZ",
        "variants": [{
            "id": format!("variant_{n}"),
            "title": "Default Variant",
            "sku": format!("SKU-{n:08}"),
            "inventory_quantity": 10,
            "manage_inventory": true,
            "allow_backorder": false,
            "calculated_price": {
                "calculated_amount": amount,
                "original_amount": amount + 500,
                "currency_code": "ngn"
            }
        }]
    })
}

// =============================================================================
// TestContext
// =============================================================================

/// A storefront router backed by a [`FakeMedusa`].
pub struct TestContext {
    pub medusa: FakeMedusa,
    pub state: AppState,
    pub app: Router,
}

/// A collected response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: String,
}

impl TestContext {
    /// Start a fake backend and build the storefront against it.
    ///
    /// # Panics
    ///
    /// Panics if the storefront state cannot be built.
    pub async fn new(mode: Mode) -> Self {
        let medusa = FakeMedusa::start(mode).await;
        let config = StorefrontConfig {
            host: Ipv4Addr::LOCALHOST.into(),
            port: 0,
            base_url: "http://localhost".to_string(),
            default_country_code: "ng".to_string(),
            medusa: MedusaConfig {
                backend_url: medusa.url(),
                publishable_key: "pk_test_integration".to_string(),
            },
            listing: ListingConfig {
                cache_ttl: Duration::from_secs(60),
                ..ListingConfig::default()
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let state = AppState::new(config).expect("storefront state");
        Self {
            medusa,
            app: routes::app(state.clone()),
            state,
        }
    }

    /// Send a GET through the router.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.get_with_headers(uri, &[]).await
    }

    /// Send a GET with extra request headers.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn get_with_headers(&self, uri: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut request = Request::builder().uri(uri);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = self
            .app
            .clone()
            .oneshot(request.body(Body::empty()).expect("request"))
            .await
            .expect("infallible router");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
