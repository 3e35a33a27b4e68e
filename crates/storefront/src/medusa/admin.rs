//! Medusa Admin API client.
//!
//! Used by the `elorad` seeder to look up the sales channel, region and
//! stock location it writes against, create products in bulk and stock
//! their inventory.

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use elorad_core::{
    CollectionId, Handle, InventoryItemId, ProductId, ProductStatus, RegionId, SalesChannelId,
    StockLocationId,
};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use crate::config::MedusaAdminConfig;

use super::store::base_url;
use super::{MedusaError, decode_response};

/// Handles and SKUs are looked up in chunks to keep URLs short.
const LOOKUP_CHUNK: usize = 50;

// =============================================================================
// Request and response types
// =============================================================================

/// A named admin entity (sales channel, region, stock location).
#[derive(Debug, Clone, Deserialize)]
pub struct NamedEntity<Id> {
    pub id: Id,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct SalesChannelList {
    sales_channels: Vec<NamedEntity<SalesChannelId>>,
}

#[derive(Debug, Deserialize)]
struct RegionList {
    regions: Vec<NamedEntity<RegionId>>,
}

#[derive(Debug, Deserialize)]
struct StockLocationList {
    stock_locations: Vec<NamedEntity<StockLocationId>>,
}

#[derive(Debug, Deserialize)]
struct ProductHandleList {
    products: Vec<CreatedProduct>,
}

#[derive(Debug, Deserialize)]
struct InventoryItemList {
    inventory_items: Vec<InventoryItem>,
}

#[derive(Debug, Deserialize)]
struct BatchProductsResponse {
    #[serde(default)]
    created: Vec<CreatedProduct>,
}

/// A product returned by the Admin API after creation or lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedProduct {
    pub id: ProductId,
    pub handle: String,
}

/// An inventory item and the SKU it tracks.
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryItem {
    pub id: InventoryItemId,
    pub sku: Option<String>,
}

/// Product payload for `POST /admin/products/batch`.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub handle: Handle,
    pub is_giftcard: bool,
    pub status: ProductStatus,
    pub images: Vec<NewImage>,
    pub collection_id: CollectionId,
    pub options: Vec<NewOption>,
    pub variants: Vec<NewVariant>,
    pub weight: u32,
    pub sales_channels: Vec<IdRef<SalesChannelId>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewImage {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewOption {
    pub title: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewVariant {
    pub title: String,
    pub sku: String,
    pub manage_inventory: bool,
    /// Option title to chosen value.
    pub options: BTreeMap<String, String>,
    pub prices: Vec<NewPrice>,
}

/// A variant price.
///
/// Medusa stores `amount` as given. The demo seeder sends NGN in kobo and
/// USD in whole dollars.
#[derive(Debug, Clone, Serialize)]
pub struct NewPrice {
    pub amount: u64,
    pub currency_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<PriceRules>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceRules {
    pub region_id: RegionId,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdRef<Id> {
    pub id: Id,
}

/// Payload for one stock level.
#[derive(Debug, Clone, Serialize)]
pub struct NewInventoryLevel {
    pub inventory_item_id: InventoryItemId,
    pub location_id: StockLocationId,
    pub stocked_quantity: u32,
}

// =============================================================================
// AdminClient
// =============================================================================

/// Client for the Medusa Admin API.
#[derive(Clone)]
pub struct AdminClient {
    client: reqwest::Client,
    base_url: Url,
}

impl AdminClient {
    /// Create a new Admin API client.
    ///
    /// The secret key is sent as the HTTP Basic username with an empty
    /// password.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend URL is malformed or the HTTP client
    /// fails to build.
    pub fn new(config: &MedusaAdminConfig) -> Result<Self, MedusaError> {
        let mut headers = HeaderMap::new();

        let credentials = BASE64.encode(format!("{}:", config.api_key.expose_secret()));
        let mut auth_value = HeaderValue::from_str(&format!("Basic {credentials}"))
            .map_err(|e| MedusaError::InvalidKey(e.to_string()))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url(&config.backend_url)?,
        })
    }

    fn url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, MedusaError> {
        let mut url = self.base_url.join(path)?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, MedusaError> {
        let url = self.url(path, params)?;
        debug!(url = %url, "Medusa Admin API request");
        let response = self.client.get(url).send().await?;
        decode_response(response).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, MedusaError> {
        let url = self.url(path, &[])?;
        debug!(url = %url, "Medusa Admin API request");
        let response = self.client.post(url).json(body).send().await?;
        decode_response(response).await
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Find a sales channel by exact name.
    ///
    /// # Errors
    ///
    /// Returns `MissingEntity` if no sales channel has the name.
    #[instrument(skip(self))]
    pub async fn find_sales_channel(
        &self,
        name: &str,
    ) -> Result<NamedEntity<SalesChannelId>, MedusaError> {
        let list: SalesChannelList = self.get("admin/sales-channels", &[("name", name)]).await?;
        exact_match(list.sales_channels, name, "Sales channel")
    }

    /// Find a region by exact name.
    ///
    /// # Errors
    ///
    /// Returns `MissingEntity` if no region has the name.
    #[instrument(skip(self))]
    pub async fn find_region(&self, name: &str) -> Result<NamedEntity<RegionId>, MedusaError> {
        let list: RegionList = self.get("admin/regions", &[("name", name)]).await?;
        exact_match(list.regions, name, "Region")
    }

    /// Find a stock location by exact name.
    ///
    /// # Errors
    ///
    /// Returns `MissingEntity` if no stock location has the name.
    #[instrument(skip(self))]
    pub async fn find_stock_location(
        &self,
        name: &str,
    ) -> Result<NamedEntity<StockLocationId>, MedusaError> {
        let list: StockLocationList = self
            .get("admin/stock-locations", &[("name", name)])
            .await?;
        exact_match(list.stock_locations, name, "Stock location")
    }

    /// Which of the given handles already belong to a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, handles), fields(count = handles.len()))]
    pub async fn existing_handles(&self, handles: &[Handle]) -> Result<HashSet<String>, MedusaError> {
        let mut existing = HashSet::new();

        for chunk in handles.chunks(LOOKUP_CHUNK) {
            let limit = chunk.len().to_string();
            let mut params: Vec<(&str, &str)> = vec![("fields", "id,handle"), ("limit", limit.as_str())];
            params.extend(chunk.iter().map(|h| ("handle[]", h.as_str())));

            let list: ProductHandleList = self.get("admin/products", &params).await?;
            existing.extend(list.products.into_iter().map(|p| p.handle));
        }

        Ok(existing)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Create products in one batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, products), fields(count = products.len()))]
    pub async fn create_products(
        &self,
        products: &[NewProduct],
    ) -> Result<Vec<CreatedProduct>, MedusaError> {
        if products.is_empty() {
            return Ok(Vec::new());
        }

        let body = serde_json::json!({ "create": products });
        let response: BatchProductsResponse = self.post("admin/products/batch", &body).await?;
        Ok(response.created)
    }

    /// Inventory items tracking the given SKUs.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, skus), fields(count = skus.len()))]
    pub async fn inventory_items_by_sku(
        &self,
        skus: &[String],
    ) -> Result<Vec<InventoryItem>, MedusaError> {
        let mut items = Vec::new();

        for chunk in skus.chunks(LOOKUP_CHUNK) {
            let limit = chunk.len().to_string();
            let mut params: Vec<(&str, &str)> = vec![("fields", "id,sku"), ("limit", limit.as_str())];
            params.extend(chunk.iter().map(|s| ("sku[]", s.as_str())));

            let list: InventoryItemList = self.get("admin/inventory-items", &params).await?;
            items.extend(list.inventory_items);
        }

        Ok(items)
    }

    /// Create stock levels in one batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, levels), fields(count = levels.len()))]
    pub async fn create_inventory_levels(
        &self,
        levels: &[NewInventoryLevel],
    ) -> Result<(), MedusaError> {
        if levels.is_empty() {
            return Ok(());
        }

        let body = serde_json::json!({ "create": levels });
        let _: serde_json::Value = self
            .post("admin/inventory-items/location-levels/batch", &body)
            .await?;
        Ok(())
    }
}

/// Pick the entity whose name matches exactly; Medusa's `name` filter may
/// be fuzzy.
fn exact_match<Id>(
    entities: Vec<NamedEntity<Id>>,
    name: &str,
    kind: &str,
) -> Result<NamedEntity<Id>, MedusaError> {
    entities
        .into_iter()
        .find(|e| e.name == name)
        .ok_or_else(|| MedusaError::MissingEntity(format!("{kind} '{name}' not found")))
}
