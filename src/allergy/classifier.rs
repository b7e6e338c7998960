//! Allergen risk classification
//!
//! Joins a product's allergen list against the allergens a user registered,
//! producing one advisory entry per registered allergen the product contains.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// How severe an allergen is for a specific user
///
/// Stored as free text; labels that match none of the known groups are kept
/// verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskTier {
    HighRisk,
    Risk,
    Caution,
    Other(String),
}

impl RiskTier {
    pub const HIGH_RISK_LABEL: &'static str = "High Risk Group";
    pub const RISK_LABEL: &'static str = "Risk Group";
    pub const CAUTION_LABEL: &'static str = "Caution Group";

    /// The three tiers a user can register, most severe first
    pub fn known() -> [RiskTier; 3] {
        [RiskTier::HighRisk, RiskTier::Risk, RiskTier::Caution]
    }

    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            Self::HIGH_RISK_LABEL => RiskTier::HighRisk,
            Self::RISK_LABEL => RiskTier::Risk,
            Self::CAUTION_LABEL => RiskTier::Caution,
            other => RiskTier::Other(other.to_string()),
        }
    }

    /// Lenient parse for user input ("high", "high_risk", full label, ...)
    pub fn parse_input(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(|c: char| c == '-' || c == ' ', "_").as_str() {
            "high_risk_group" | "high_risk" | "high" => Some(RiskTier::HighRisk),
            "risk_group" | "risk" => Some(RiskTier::Risk),
            "caution_group" | "caution" => Some(RiskTier::Caution),
            _ => None,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            RiskTier::HighRisk => Self::HIGH_RISK_LABEL,
            RiskTier::Risk => Self::RISK_LABEL,
            RiskTier::Caution => Self::CAUTION_LABEL,
            RiskTier::Other(label) => label.as_str(),
        }
    }

    /// Advice shown next to an allergen in this tier
    pub fn message(&self) -> &'static str {
        match self {
            RiskTier::HighRisk => "do not consume",
            RiskTier::Risk => "exercise caution",
            RiskTier::Caution => "for reference",
            RiskTier::Other(_) => "unknown risk level",
        }
    }

    /// Sort rank, most severe first; unrecognized tiers sort last
    pub fn severity_rank(&self) -> u8 {
        match self {
            RiskTier::HighRisk => 0,
            RiskTier::Risk => 1,
            RiskTier::Caution => 2,
            RiskTier::Other(_) => 3,
        }
    }
}

impl From<String> for RiskTier {
    fn from(label: String) -> Self {
        RiskTier::from_label(&label)
    }
}

impl From<RiskTier> for String {
    fn from(tier: RiskTier) -> Self {
        tier.label().to_string()
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Allergen name -> risk tier for one user
///
/// Names are opaque and case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllergenRiskMap {
    tiers: HashMap<String, RiskTier>,
}

impl AllergenRiskMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, allergen: impl Into<String>, tier: RiskTier) {
        self.tiers.insert(allergen.into(), tier);
    }

    pub fn get(&self, allergen: &str) -> Option<&RiskTier> {
        self.tiers.get(allergen)
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, RiskTier)> for AllergenRiskMap {
    fn from_iter<I: IntoIterator<Item = (S, RiskTier)>>(iter: I) -> Self {
        Self {
            tiers: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// One warning line in an advisory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryEntry {
    pub allergen: String,
    pub tier: RiskTier,
    pub message: String,
}

/// Warnings for a product, in the order allergens appear on the product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllergyAdvisory {
    pub entries: Vec<AdvisoryEntry>,
}

impl AllergyAdvisory {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The most severe tier present, if any
    pub fn highest_tier(&self) -> Option<&RiskTier> {
        self.entries
            .iter()
            .map(|e| &e.tier)
            .min_by_key(|t| t.severity_rank())
    }

    pub fn iter(&self) -> impl Iterator<Item = &AdvisoryEntry> {
        self.entries.iter()
    }
}

/// Build the advisory for a product's allergen list
///
/// Names are trimmed and deduplicated (first appearance wins). Allergens the
/// user never registered are dropped rather than reported.
pub fn classify<S: AsRef<str>>(product_allergens: &[S], risk_map: &AllergenRiskMap) -> AllergyAdvisory {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for raw in product_allergens {
        let allergen = raw.as_ref().trim();
        if allergen.is_empty() || !seen.insert(allergen) {
            continue;
        }

        if let Some(tier) = risk_map.get(allergen) {
            if let RiskTier::Other(label) = tier {
                tracing::warn!("Allergen '{}' has unrecognized risk tier '{}'", allergen, label);
            }
            entries.push(AdvisoryEntry {
                allergen: allergen.to_string(),
                tier: tier.clone(),
                message: tier.message().to_string(),
            });
        }
    }

    AllergyAdvisory { entries }
}
