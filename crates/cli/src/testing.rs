//! A fake Medusa Admin API for seeding tests.
//!
//! [`FakeAdmin`] keeps products and stock levels in memory, answers the
//! lookups and batch writes the seeder makes, and records every write so
//! tests can check what was sent.

use std::collections::BTreeMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    Json, Router,
    extract::{RawQuery, State},
    routing::{get, post},
};
use elorad_storefront::config::MedusaAdminConfig;
use elorad_storefront::medusa::AdminClient;
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Default)]
struct Store {
    missing_region: bool,
    /// Handle to SKU of every product the backend knows.
    products: BTreeMap<String, String>,
    /// Size of every `POST /admin/products/batch`.
    product_batches: Vec<usize>,
    /// Every stock level created, as sent.
    levels: Vec<Value>,
}

type Shared = Arc<Mutex<Store>>;

/// A fake Admin API listening on localhost.
pub struct FakeAdmin {
    addr: SocketAddr,
    store: Shared,
    server: tokio::task::JoinHandle<()>,
}

impl FakeAdmin {
    /// Start the fake on an ephemeral port.
    pub async fn start() -> Self {
        let store = Shared::default();

        let app = Router::new()
            .route("/admin/sales-channels", get(sales_channels))
            .route("/admin/regions", get(regions))
            .route("/admin/stock-locations", get(stock_locations))
            .route("/admin/products", get(products))
            .route("/admin/products/batch", post(create_products))
            .route("/admin/inventory-items", get(inventory_items))
            .route(
                "/admin/inventory-items/location-levels/batch",
                post(create_levels),
            )
            .with_state(Arc::clone(&store));

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("bind fake Admin API");
        let addr = listener.local_addr().expect("fake Admin API address");
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            addr,
            store,
            server,
        }
    }

    /// A client authenticated against the fake.
    pub fn client(&self) -> AdminClient {
        AdminClient::new(&MedusaAdminConfig {
            backend_url: format!("http://{}", self.addr),
            api_key: SecretString::from("sk_test"),
        })
        .expect("admin client")
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make region lookups come back empty.
    pub fn remove_region(&self) {
        self.lock().missing_region = true;
    }

    /// Add a product the seeder did not create.
    pub fn insert_product(&self, handle: &str, sku: &str) {
        self.lock()
            .products
            .insert(handle.to_string(), sku.to_string());
    }

    /// Sizes of the product batches posted so far.
    pub fn product_batches(&self) -> Vec<usize> {
        self.lock().product_batches.clone()
    }

    /// Number of products the backend knows.
    pub fn product_count(&self) -> usize {
        self.lock().products.len()
    }

    /// `inventory_item_id` of every stock level created so far.
    pub fn level_items(&self) -> Vec<String> {
        self.lock()
            .levels
            .iter()
            .filter_map(|l| l["inventory_item_id"].as_str().map(str::to_string))
            .collect()
    }
}

impl Drop for FakeAdmin {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Inventory item id the fake assigns to a SKU.
pub fn inventory_item_id(sku: &str) -> String {
    format!("iitem_{sku}")
}

fn params(query: Option<&str>) -> Vec<(String, String)> {
    url::form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .into_owned()
        .collect()
}

fn values(params: &[(String, String)], key: &str) -> Vec<String> {
    params
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
        .collect()
}

/// The entity named in the query, as if it existed.
fn named(query: Option<&str>, id: &str) -> Value {
    let name = values(&params(query), "name").pop().unwrap_or_default();
    json!({ "id": id, "name": name })
}

async fn sales_channels(RawQuery(query): RawQuery) -> Json<Value> {
    Json(json!({ "sales_channels": [named(query.as_deref(), "sc_default")] }))
}

async fn regions(State(store): State<Shared>, RawQuery(query): RawQuery) -> Json<Value> {
    let missing = store
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .missing_region;
    let regions = if missing {
        Vec::new()
    } else {
        vec![named(query.as_deref(), "reg_ng")]
    };
    Json(json!({ "regions": regions }))
}

async fn stock_locations(RawQuery(query): RawQuery) -> Json<Value> {
    Json(json!({ "stock_locations": [named(query.as_deref(), "sloc_lagos")] }))
}

async fn products(State(store): State<Shared>, RawQuery(query): RawQuery) -> Json<Value> {
    let store = store.lock().unwrap_or_else(PoisonError::into_inner);
    let found: Vec<Value> = values(&params(query.as_deref()), "handle[]")
        .into_iter()
        .filter(|h| store.products.contains_key(h))
        .map(|h| json!({ "id": format!("prod_{h}"), "handle": h }))
        .collect();
    Json(json!({ "products": found }))
}

async fn create_products(State(store): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut store = store.lock().unwrap_or_else(PoisonError::into_inner);
    let batch = body["create"].as_array().cloned().unwrap_or_default();
    store.product_batches.push(batch.len());

    let mut created = Vec::new();
    for product in batch {
        let handle = product["handle"].as_str().unwrap_or_default().to_string();
        let sku = product["variants"][0]["sku"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        store.products.insert(handle.clone(), sku);
        created.push(json!({ "id": format!("prod_{handle}"), "handle": handle }));
    }
    Json(json!({ "created": created }))
}

async fn inventory_items(State(store): State<Shared>, RawQuery(query): RawQuery) -> Json<Value> {
    let store = store.lock().unwrap_or_else(PoisonError::into_inner);
    let items: Vec<Value> = values(&params(query.as_deref()), "sku[]")
        .into_iter()
        .filter(|sku| store.products.values().any(|s| s == sku))
        .map(|sku| json!({ "id": inventory_item_id(&sku), "sku": sku }))
        .collect();
    Json(json!({ "inventory_items": items }))
}

async fn create_levels(State(store): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut store = store.lock().unwrap_or_else(PoisonError::into_inner);
    let levels = body["create"].as_array().cloned().unwrap_or_default();
    store.levels.extend(levels);
    Json(json!({}))
}
