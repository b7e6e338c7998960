//! Biometric profile types
//!
//! Inputs to the daily requirement estimator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Biological sex, selects the BMR coefficient set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" | "남성" | "남" => Some(Sex::Male),
            "female" | "f" | "여성" | "여" => Some(Sex::Female),
            _ => None,
        }
    }
}

/// Physical activity level, selects the energy multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Exercise 1-3 days/week
    Light,
    /// Exercise 3-5 days/week
    Moderate,
    /// Exercise 6-7 days/week
    Active,
    /// Hard daily training or physical labor
    VeryActive,
}

impl ActivityLevel {
    /// All levels from least to most intense
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }

    /// Strict parse; also accepts the Korean survey labels
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(|c: char| c == '-' || c == ' ', "_").as_str() {
            "sedentary" | "비활동적" => Some(ActivityLevel::Sedentary),
            "light" | "lightly_active" | "저활동적" => Some(ActivityLevel::Light),
            "moderate" | "moderately_active" | "활동적" => Some(ActivityLevel::Moderate),
            "active" | "매우활동적" => Some(ActivityLevel::Active),
            "very_active" | "extra_active" | "극도활동적" => Some(ActivityLevel::VeryActive),
            _ => None,
        }
    }

    /// Parse, falling back to sedentary for unrecognized text
    pub fn from_str_lenient(s: &str) -> Self {
        Self::from_str(s).unwrap_or_else(|| {
            tracing::warn!("Unknown activity level '{}', using sedentary", s);
            ActivityLevel::Sedentary
        })
    }

    /// Multiplier applied to BMR to get daily energy expenditure
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    /// Whether this level raises the sodium allowance
    pub fn is_high_intensity(&self) -> bool {
        matches!(self, ActivityLevel::Active | ActivityLevel::VeryActive)
    }
}

/// Biometric inputs for one person
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiometricProfile {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub sex: Sex,
    pub activity_level: ActivityLevel,
}

/// Reasons a profile is rejected at the storage boundary
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("weight_kg must be greater than 0 and at most {max}, got {value}")]
    Weight { value: f64, max: f64 },

    #[error("height_cm must be greater than 0 and at most {max}, got {value}")]
    Height { value: f64, max: f64 },

    #[error("age_years must be at most {max}, got {value}")]
    Age { value: u32, max: u32 },
}

pub const MAX_WEIGHT_KG: f64 = 500.0;
pub const MAX_HEIGHT_CM: f64 = 300.0;
pub const MAX_AGE_YEARS: u32 = 130;

impl BiometricProfile {
    /// Check biometric ranges
    ///
    /// The estimator itself never calls this; profiles are checked where they
    /// enter the system (tool calls, profile storage).
    pub fn validate(&self) -> Result<(), ProfileError> {
        // NaN fails both comparisons, so it is rejected too
        if !(self.weight_kg > 0.0 && self.weight_kg <= MAX_WEIGHT_KG) {
            return Err(ProfileError::Weight {
                value: self.weight_kg,
                max: MAX_WEIGHT_KG,
            });
        }
        if !(self.height_cm > 0.0 && self.height_cm <= MAX_HEIGHT_CM) {
            return Err(ProfileError::Height {
                value: self.height_cm,
                max: MAX_HEIGHT_CM,
            });
        }
        if self.age_years > MAX_AGE_YEARS {
            return Err(ProfileError::Age {
                value: self.age_years,
                max: MAX_AGE_YEARS,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> BiometricProfile {
        BiometricProfile {
            weight_kg: 70.0,
            height_cm: 175.0,
            age_years: 30,
            sex: Sex::Male,
            activity_level: ActivityLevel::Moderate,
        }
    }

    #[test]
    fn test_activity_from_str() {
        assert_eq!(ActivityLevel::from_str("very active"), Some(ActivityLevel::VeryActive));
        assert_eq!(ActivityLevel::from_str("Very-Active"), Some(ActivityLevel::VeryActive));
        assert_eq!(ActivityLevel::from_str("활동적"), Some(ActivityLevel::Moderate));
        assert_eq!(ActivityLevel::from_str("매우활동적"), Some(ActivityLevel::Active));
        assert_eq!(ActivityLevel::from_str("couch"), None);
    }

    #[test]
    fn test_activity_lenient_defaults_to_sedentary() {
        let level = ActivityLevel::from_str_lenient("marathoner");
        assert_eq!(level, ActivityLevel::Sedentary);
        assert_eq!(level.multiplier(), 1.2);
    }

    #[test]
    fn test_multipliers_increase_with_intensity() {
        let multipliers: Vec<f64> = ActivityLevel::ALL.iter().map(|l| l.multiplier()).collect();
        assert!(multipliers.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_sex_from_str() {
        assert_eq!(Sex::from_str("Male"), Some(Sex::Male));
        assert_eq!(Sex::from_str("여성"), Some(Sex::Female));
        assert_eq!(Sex::from_str("other"), None);
    }

    #[test]
    fn test_validate() {
        assert!(profile().validate().is_ok());

        let mut p = profile();
        p.weight_kg = -3.0;
        assert!(matches!(p.validate(), Err(ProfileError::Weight { .. })));

        let mut p = profile();
        p.height_cm = f64::NAN;
        assert!(matches!(p.validate(), Err(ProfileError::Height { .. })));

        let mut p = profile();
        p.age_years = 200;
        assert!(matches!(p.validate(), Err(ProfileError::Age { .. })));
    }
}
