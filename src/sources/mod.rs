//! Collaborator contracts
//!
//! The scan pipeline reaches profiles, product data, the allergen registry and
//! the presenter only through these traits. The calculation modules never
//! depend on them.

pub mod food_safety;
pub mod store;

use serde::Serialize;
use thiserror::Error;

use crate::allergy::{AllergenRiskMap, AllergyAdvisory};
use crate::db::DbError;
use crate::nutrition::{BiometricProfile, LabelNutrients, NutrientRatioSet};

pub use food_safety::{FoodSafetyClient, FoodSafetyConfig};

/// Collaborator failures
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response from {service}: {detail}")]
    Malformed { service: &'static str, detail: String },

    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

/// A product resolved from a barcode, with its label data
#[derive(Debug, Clone, Serialize)]
pub struct ScannedProduct {
    pub barcode: String,
    pub name: String,
    pub report_no: String,
    pub nutrients: LabelNutrients,
    pub allergens: Vec<String>,
}

/// Outcome of a barcode lookup
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProductLookup {
    /// No product is registered under the barcode
    NotFound,
    /// The product exists but has no certified nutrition record
    NutrientsUnavailable { name: String, report_no: String },
    Found(ScannedProduct),
}

/// Supplies the biometric profile for a user
pub trait ProfileSource {
    fn profile(&self, user_name: &str) -> Result<Option<BiometricProfile>, SourceError>;
}

/// Supplies nutrient readings and allergens for a barcode
pub trait ProductNutrientSource {
    fn lookup(&self, barcode: &str) -> Result<ProductLookup, SourceError>;
}

/// Supplies a user's risk tiers for a set of candidate allergens
pub trait AllergenRegistry {
    fn risk_map(&self, user_name: &str, candidates: &[String]) -> Result<AllergenRiskMap, SourceError>;
}

/// Renders ratios and an advisory for the user
pub trait AdvisoryPresenter {
    fn present(&self, ratios: &NutrientRatioSet, advisory: &AllergyAdvisory) -> Result<String, SourceError>;
}
