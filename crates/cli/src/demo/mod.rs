//! Demo catalog plan and product generation.
//!
//! A [`SeedPlan`] names the Medusa entities products are attached to and
//! the collections they are spread across. [`generate`] turns a plan and a
//! seed into [`ProductDraft`]s without touching the network, so a dry run
//! and a real run with the same seed see the same products.

mod generate;

use std::collections::BTreeMap;
use std::path::Path;

use elorad_core::CollectionId;
use serde::Deserialize;

pub use generate::{ProductDraft, generate};

use crate::commands::seed::SeedError;

/// Plan bundled with the binary.
pub const DEFAULT_PLAN: &str = include_str!("../../seed/demo.yaml");

/// What to seed and where.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedPlan {
    pub sales_channel: String,
    pub region: String,
    pub stock_location: String,
    /// Title of the single product option, e.g. `Type`.
    pub option_title: String,
    /// Products to generate unless overridden on the command line.
    pub count: usize,
    /// Keyed by collection name; sorted so generation is reproducible.
    pub collections: BTreeMap<String, CollectionPlan>,
}

/// One collection products may land in.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionPlan {
    pub id: CollectionId,
    /// Values of the product option.
    pub options: Vec<String>,
    /// Value the single variant is created with.
    pub default_option: String,
    /// Keyword for the placeholder image.
    pub image_category: String,
}

impl SeedPlan {
    /// Parse and validate a plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or the plan is inconsistent.
    pub fn parse(yaml: &str) -> Result<Self, SeedError> {
        let plan: Self = serde_yaml::from_str(yaml)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Load a plan file, or the bundled plan when no path is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the plan is invalid.
    pub async fn load(path: Option<&Path>) -> Result<Self, SeedError> {
        match path {
            Some(path) => Self::parse(&tokio::fs::read_to_string(path).await?),
            None => Self::parse(DEFAULT_PLAN),
        }
    }

    fn validate(&self) -> Result<(), SeedError> {
        if self.collections.is_empty() {
            return Err(SeedError::Plan("no collections".to_string()));
        }

        for (name, collection) in &self.collections {
            if collection.options.is_empty() {
                return Err(SeedError::Plan(format!("collection '{name}' has no options")));
            }
            if !collection.options.contains(&collection.default_option) {
                return Err(SeedError::Plan(format!(
                    "collection '{name}': default option '{}' is not one of its options",
                    collection.default_option
                )));
            }
        }

        Ok(())
    }
}
