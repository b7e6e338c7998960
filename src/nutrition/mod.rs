//! Nutrition calculation module
//!
//! Daily requirement estimation, percent-of-daily-value ratios, and label parsing.
//! Everything here is a pure function of its inputs.

pub mod label;
pub mod nutrients;
pub mod profile;
pub mod ratio;
pub mod requirements;

pub use label::{parse_nutrient_text, LabelNutrients};
pub use nutrients::{
    round_to, DailyNutrientTarget, NutrientKey, NutrientRatioSet, ObservedNutrients,
};
pub use profile::{ActivityLevel, BiometricProfile, ProfileError, Sex};
pub use ratio::{compute_ratios, nutrient_ratio};
pub use requirements::{basal_metabolic_rate, estimate_daily_target, sodium_target_mg};
