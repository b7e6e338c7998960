//! Nutrient keys and per-nutrient value sets
//!
//! The five tracked nutrients form a closed set. Every value set below carries
//! exactly one field per key, so no stage of the scan pipeline can introduce or
//! drop a nutrient.

use serde::{Deserialize, Serialize};

/// One of the five nutrients compared against a daily target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutrientKey {
    EnergyKcal,
    SodiumMg,
    SugarG,
    SaturatedFatG,
    TransFatG,
}

impl NutrientKey {
    /// All keys in reporting order
    pub const ALL: [NutrientKey; 5] = [
        NutrientKey::EnergyKcal,
        NutrientKey::SodiumMg,
        NutrientKey::SugarG,
        NutrientKey::SaturatedFatG,
        NutrientKey::TransFatG,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientKey::EnergyKcal => "energy_kcal",
            NutrientKey::SodiumMg => "sodium_mg",
            NutrientKey::SugarG => "sugar_g",
            NutrientKey::SaturatedFatG => "saturated_fat_g",
            NutrientKey::TransFatG => "trans_fat_g",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            NutrientKey::EnergyKcal => "Energy",
            NutrientKey::SodiumMg => "Sodium",
            NutrientKey::SugarG => "Sugar",
            NutrientKey::SaturatedFatG => "Saturated Fat",
            NutrientKey::TransFatG => "Trans Fat",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            NutrientKey::EnergyKcal => "kcal",
            NutrientKey::SodiumMg => "mg",
            NutrientKey::SugarG | NutrientKey::SaturatedFatG | NutrientKey::TransFatG => "g",
        }
    }

    /// Decimal places a daily target for this nutrient is rounded to
    pub fn target_precision(&self) -> u32 {
        match self {
            NutrientKey::EnergyKcal | NutrientKey::SodiumMg => 0,
            NutrientKey::SugarG | NutrientKey::SaturatedFatG | NutrientKey::TransFatG => 1,
        }
    }
}

/// Round to a fixed number of decimal places (half away from zero)
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

fn is_valid_amount(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Recommended daily intake derived from a biometric profile
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DailyNutrientTarget {
    pub energy_kcal: f64,
    pub sodium_mg: f64,
    pub sugar_g: f64,
    pub saturated_fat_g: f64,
    pub trans_fat_g: f64,
}

impl DailyNutrientTarget {
    /// First nutrient whose target is negative or not finite
    pub fn invalid_key(&self) -> Option<NutrientKey> {
        NutrientKey::ALL
            .into_iter()
            .find(|k| !is_valid_amount(self.get(*k)))
    }

    pub fn get(&self, key: NutrientKey) -> f64 {
        match key {
            NutrientKey::EnergyKcal => self.energy_kcal,
            NutrientKey::SodiumMg => self.sodium_mg,
            NutrientKey::SugarG => self.sugar_g,
            NutrientKey::SaturatedFatG => self.saturated_fat_g,
            NutrientKey::TransFatG => self.trans_fat_g,
        }
    }
}

/// Nutrient readings from a scanned product
///
/// `None` marks a value the product data did not supply.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ObservedNutrients {
    #[serde(default)]
    pub energy_kcal: Option<f64>,
    #[serde(default)]
    pub sodium_mg: Option<f64>,
    #[serde(default)]
    pub sugar_g: Option<f64>,
    #[serde(default)]
    pub saturated_fat_g: Option<f64>,
    #[serde(default)]
    pub trans_fat_g: Option<f64>,
}

impl ObservedNutrients {
    /// All five values unknown
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn get(&self, key: NutrientKey) -> Option<f64> {
        match key {
            NutrientKey::EnergyKcal => self.energy_kcal,
            NutrientKey::SodiumMg => self.sodium_mg,
            NutrientKey::SugarG => self.sugar_g,
            NutrientKey::SaturatedFatG => self.saturated_fat_g,
            NutrientKey::TransFatG => self.trans_fat_g,
        }
    }

    /// Builder-style setter
    pub fn with(mut self, key: NutrientKey, value: f64) -> Self {
        let slot = match key {
            NutrientKey::EnergyKcal => &mut self.energy_kcal,
            NutrientKey::SodiumMg => &mut self.sodium_mg,
            NutrientKey::SugarG => &mut self.sugar_g,
            NutrientKey::SaturatedFatG => &mut self.saturated_fat_g,
            NutrientKey::TransFatG => &mut self.trans_fat_g,
        };
        *slot = Some(value);
        self
    }

    /// Number of nutrients with a known value
    /// First known reading that is negative or not finite
    pub fn invalid_key(&self) -> Option<NutrientKey> {
        NutrientKey::ALL
            .into_iter()
            .find(|k| self.get(*k).is_some_and(|v| !is_valid_amount(v)))
    }

    pub fn known_count(&self) -> usize {
        NutrientKey::ALL
            .iter()
            .filter(|k| self.get(**k).is_some())
            .count()
    }
}

/// Percent of daily target per nutrient (one decimal place)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutrientRatioSet {
    pub energy_kcal: f64,
    pub sodium_mg: f64,
    pub sugar_g: f64,
    pub saturated_fat_g: f64,
    pub trans_fat_g: f64,
}

impl NutrientRatioSet {
    pub fn get(&self, key: NutrientKey) -> f64 {
        match key {
            NutrientKey::EnergyKcal => self.energy_kcal,
            NutrientKey::SodiumMg => self.sodium_mg,
            NutrientKey::SugarG => self.sugar_g,
            NutrientKey::SaturatedFatG => self.saturated_fat_g,
            NutrientKey::TransFatG => self.trans_fat_g,
        }
    }

    /// Ratios in reporting order
    pub fn iter(&self) -> impl Iterator<Item = (NutrientKey, f64)> + '_ {
        NutrientKey::ALL.into_iter().map(move |k| (k, self.get(k)))
    }

    pub fn all_zero(&self) -> bool {
        self.iter().all(|(_, v)| v == 0.0)
    }
}
