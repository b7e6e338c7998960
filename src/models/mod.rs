//! Data models
//!
//! Rust structs for stored profiles and registered allergens.

mod allergy;
mod profile;

pub use allergy::{AllergyEntry, AllergyEntryCreate};
pub use profile::{UserProfile, UserProfileSet};
