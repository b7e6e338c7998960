//! Allergen advisory module
//!
//! Risk-tier classification of a product's allergens against a user's registry.

pub mod classifier;
pub mod text;

pub use classifier::{classify, AdvisoryEntry, AllergenRiskMap, AllergyAdvisory, RiskTier};
pub use text::{is_valid_allergen_name, normalize_allergens, split_allergen_text};
