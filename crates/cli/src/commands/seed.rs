//! Seed a Medusa backend with a demo catalog.
//!
//! Products are generated from a seed, so the same seed always yields the
//! same handles. Handles that already exist are skipped, which makes a
//! repeated run a no-op, and stock levels are only created for the
//! inventory items of products created by this run.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;

use elorad_core::HandleError;
use elorad_storefront::config::{ConfigError, MedusaAdminConfig};
use elorad_storefront::medusa::admin::NewInventoryLevel;
use elorad_storefront::medusa::{AdminClient, MedusaError};
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{info, warn};

use crate::demo::{ProductDraft, SeedPlan, generate};

/// Products sent per batch request.
const CREATE_BATCH: usize = 25;

/// Errors that abort seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Medusa error: {0}")]
    Medusa(#[source] MedusaError),

    /// A sales channel, region or stock location the plan names is missing.
    #[error("{0}. Please create it first.")]
    MissingEntity(String),

    #[error("Invalid seed plan: {0}")]
    Plan(String),

    #[error("Failed to read seed plan: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse seed plan: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Generated an invalid handle: {0}")]
    Handle(#[from] HandleError),
}

impl From<MedusaError> for SeedError {
    fn from(e: MedusaError) -> Self {
        match e {
            MedusaError::MissingEntity(message) => Self::MissingEntity(message),
            other => Self::Medusa(other),
        }
    }
}

/// Options for `elorad seed demo`.
#[derive(Debug, Clone, Default)]
pub struct DemoOptions {
    pub plan: Option<PathBuf>,
    pub count: Option<usize>,
    pub seed: Option<u64>,
    pub dry_run: bool,
}

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub seed: u64,
    pub generated: usize,
    pub skipped: usize,
    pub created: usize,
    pub inventory_levels: usize,
}

/// Seed the demo catalog.
///
/// # Errors
///
/// Returns an error if the plan is invalid, the admin configuration is
/// missing, a required entity does not exist, or any Admin API call fails.
pub async fn demo(options: DemoOptions) -> Result<SeedSummary, SeedError> {
    let plan = SeedPlan::load(options.plan.as_deref()).await?;
    let count = options.count.unwrap_or(plan.count);
    let seed = options.seed.unwrap_or_else(rand::random);
    info!(seed, count, "Generating demo products (rerun with --seed {seed} to reproduce)");

    let drafts = generate(&plan, count, &mut StdRng::seed_from_u64(seed))?;

    if options.dry_run {
        log_plan(&plan, &drafts);
        return Ok(SeedSummary {
            seed,
            generated: drafts.len(),
            ..SeedSummary::default()
        });
    }

    let client = AdminClient::new(&MedusaAdminConfig::from_env()?)?;
    seed_with(&client, &plan, seed, drafts).await
}

/// Write drafts through the Admin API.
async fn seed_with(
    client: &AdminClient,
    plan: &SeedPlan,
    seed: u64,
    drafts: Vec<ProductDraft>,
) -> Result<SeedSummary, SeedError> {
    // Fail before writing anything if the plan's targets are missing
    let sales_channel = client.find_sales_channel(&plan.sales_channel).await?;
    let region = client.find_region(&plan.region).await?;
    let location = client.find_stock_location(&plan.stock_location).await?;
    info!(
        sales_channel = %sales_channel.id,
        region = %region.id,
        stock_location = %location.id,
        "Resolved seed targets"
    );

    let generated = drafts.len();
    let handles: Vec<_> = drafts.iter().map(|d| d.handle.clone()).collect();
    let existing = client.existing_handles(&handles).await?;
    let fresh = without_existing(drafts, &existing);
    let skipped = generated - fresh.len();
    if skipped > 0 {
        info!(skipped, "Skipping products whose handles already exist");
    }

    let mut created_handles = HashSet::new();
    for batch in fresh.chunks(CREATE_BATCH) {
        let payload: Vec<_> = batch
            .iter()
            .map(|d| d.to_new_product(&plan.option_title, &region.id, &sales_channel.id))
            .collect();
        let created = client.create_products(&payload).await?;
        info!(created = created.len(), "Created product batch");
        created_handles.extend(created.into_iter().map(|p| p.handle));
    }

    let created: Vec<_> = fresh
        .into_iter()
        .filter(|d| created_handles.contains(d.handle.as_str()))
        .collect();

    info!("Seeding inventory levels...");
    let stock_by_sku: HashMap<_, _> = created
        .iter()
        .map(|d| (d.sku.clone(), d.stocked_quantity))
        .collect();
    let skus: Vec<_> = stock_by_sku.keys().cloned().collect();
    let items = client.inventory_items_by_sku(&skus).await?;

    let levels: Vec<_> = items
        .into_iter()
        .filter_map(|item| {
            let quantity = item.sku.as_ref().and_then(|sku| stock_by_sku.get(sku))?;
            Some(NewInventoryLevel {
                inventory_item_id: item.id,
                location_id: location.id.clone(),
                stocked_quantity: *quantity,
            })
        })
        .collect();

    if levels.len() < created.len() {
        warn!(
            expected = created.len(),
            found = levels.len(),
            "Some created products have no inventory item"
        );
    }
    client.create_inventory_levels(&levels).await?;

    let summary = SeedSummary {
        seed,
        generated,
        skipped,
        created: created.len(),
        inventory_levels: levels.len(),
    };
    info!(?summary, "Finished seeding demo data");
    Ok(summary)
}

fn without_existing(drafts: Vec<ProductDraft>, existing: &HashSet<String>) -> Vec<ProductDraft> {
    drafts
        .into_iter()
        .filter(|d| !existing.contains(d.handle.as_str()))
        .collect()
}

fn log_plan(plan: &SeedPlan, drafts: &[ProductDraft]) {
    info!(
        sales_channel = %plan.sales_channel,
        region = %plan.region,
        stock_location = %plan.stock_location,
        "Dry run: nothing will be written"
    );

    let mut per_collection: BTreeMap<&str, usize> = BTreeMap::new();
    for draft in drafts {
        *per_collection.entry(draft.collection.as_str()).or_default() += 1;
    }
    for (collection, count) in &per_collection {
        info!(collection, count, "Planned products");
    }
    for draft in drafts.iter().take(5) {
        info!(handle = %draft.handle, title = %draft.title, sku = %draft.sku, "Sample product");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::demo::DEFAULT_PLAN;
    use crate::testing::{FakeAdmin, inventory_item_id};

    fn plan() -> SeedPlan {
        SeedPlan::parse(DEFAULT_PLAN).unwrap()
    }

    fn drafts(count: usize) -> Vec<ProductDraft> {
        generate(&plan(), count, &mut StdRng::seed_from_u64(5)).unwrap()
    }

    #[test]
    fn test_missing_entity_maps_to_seed_error() {
        let err: SeedError =
            MedusaError::MissingEntity("Region 'Nigeria' not found".to_string()).into();
        assert!(matches!(err, SeedError::MissingEntity(_)));
        assert_eq!(err.to_string(), "Region 'Nigeria' not found. Please create it first.");

        let err: SeedError = MedusaError::RateLimited(3).into();
        assert!(matches!(err, SeedError::Medusa(_)));
    }

    #[test]
    fn test_without_existing() {
        let plan = SeedPlan::parse(DEFAULT_PLAN).unwrap();
        let drafts = generate(&plan, 5, &mut StdRng::seed_from_u64(9)).unwrap();
        let existing: HashSet<String> = drafts
            .iter()
            .take(2)
            .map(|d| d.handle.as_str().to_string())
            .collect();

        let fresh = without_existing(drafts.clone(), &existing);
        assert_eq!(fresh.len(), 3);
        assert!(fresh.iter().all(|d| !existing.contains(d.handle.as_str())));
    }

    #[tokio::test]
    async fn test_dry_run_needs_no_backend() {
        let summary = demo(DemoOptions {
            count: Some(10),
            seed: Some(1),
            dry_run: true,
            ..DemoOptions::default()
        })
        .await
        .unwrap();

        assert_eq!(summary.generated, 10);
        assert_eq!(summary.created, 0);
        assert_eq!(summary.seed, 1);
    }

    #[tokio::test]
    async fn test_rerun_with_same_seed_writes_nothing() {
        let fake = FakeAdmin::start().await;
        let client = fake.client();

        let first = seed_with(&client, &plan(), 5, drafts(30)).await.unwrap();
        assert_eq!(first.created, 30);
        assert_eq!(first.inventory_levels, 30);
        assert_eq!(fake.product_batches(), vec![25, 5]);

        let second = seed_with(&client, &plan(), 5, drafts(30)).await.unwrap();
        assert_eq!(second.generated, 30);
        assert_eq!(second.skipped, 30);
        assert_eq!(second.created, 0);
        assert_eq!(second.inventory_levels, 0);
        assert_eq!(fake.product_batches(), vec![25, 5]);
        assert_eq!(fake.level_items().len(), 30);
        assert_eq!(fake.product_count(), 30);
    }

    #[tokio::test]
    async fn test_missing_region_fails_before_writing() {
        let fake = FakeAdmin::start().await;
        fake.remove_region();

        let err = seed_with(&fake.client(), &plan(), 5, drafts(10))
            .await
            .unwrap_err();

        assert!(matches!(err, SeedError::MissingEntity(_)));
        assert_eq!(err.to_string(), "Region 'Nigeria' not found. Please create it first.");
        assert!(fake.product_batches().is_empty());
        assert!(fake.level_items().is_empty());
        assert_eq!(fake.product_count(), 0);
    }

    #[tokio::test]
    async fn test_stock_only_for_products_created_this_run() {
        let fake = FakeAdmin::start().await;
        let drafts = drafts(30);
        for draft in drafts.iter().take(10) {
            fake.insert_product(draft.handle.as_str(), &draft.sku);
        }

        let summary = seed_with(&fake.client(), &plan(), 5, drafts.clone())
            .await
            .unwrap();
        assert_eq!(summary.skipped, 10);
        assert_eq!(summary.created, 20);
        assert_eq!(summary.inventory_levels, 20);

        let stocked: HashSet<String> = fake.level_items().into_iter().collect();
        let expected: HashSet<String> = drafts[10..]
            .iter()
            .map(|d| inventory_item_id(&d.sku))
            .collect();
        assert_eq!(stocked, expected);
        assert!(
            drafts[..10]
                .iter()
                .all(|d| !stocked.contains(&inventory_item_id(&d.sku)))
        );
    }

    #[tokio::test]
    async fn test_products_posted_in_batches_of_25() {
        let fake = FakeAdmin::start().await;

        let summary = seed_with(&fake.client(), &plan(), 5, drafts(60))
            .await
            .unwrap();

        assert_eq!(summary.created, 60);
        assert_eq!(fake.product_batches(), vec![CREATE_BATCH, CREATE_BATCH, 10]);
    }
}
