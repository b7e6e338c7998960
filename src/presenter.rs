//! Plain-text advisory presenter
//!
//! Renders ratios and allergen warnings as short lines suitable for a console
//! or a speech engine. Ratios are announced as whole percentages and zero
//! ratios are skipped.

use crate::allergy::AllergyAdvisory;
use crate::nutrition::NutrientRatioSet;
use crate::sources::{AdvisoryPresenter, SourceError};

/// Line used when every ratio rounds down to zero
pub const ZERO_INTAKE_LINE: &str = "0 calories";
/// Line used when no registered allergen was found
pub const NO_ALLERGEN_LINE: &str = "No registered allergens found.";

#[derive(Debug, Clone, Copy, Default)]
pub struct TextPresenter;

impl TextPresenter {
    /// Daily value sentence, e.g. "Daily value: Energy 13%, Sodium 60%"
    pub fn render_ratios(&self, ratios: &NutrientRatioSet) -> String {
        let parts: Vec<String> = ratios
            .iter()
            .map(|(key, ratio)| (key, ratio.trunc() as i64))
            .filter(|(_, percent)| *percent != 0)
            .map(|(key, percent)| format!("{} {}%", key.display_name(), percent))
            .collect();

        if parts.is_empty() {
            ZERO_INTAKE_LINE.to_string()
        } else {
            format!("Daily value: {}", parts.join(", "))
        }
    }

    /// One line per advisory entry, most severe wording from the tier
    pub fn render_advisory(&self, advisory: &AllergyAdvisory) -> Vec<String> {
        if advisory.is_empty() {
            return vec![NO_ALLERGEN_LINE.to_string()];
        }

        advisory
            .iter()
            .map(|e| format!("- {}: {} ({})", e.allergen, e.message, e.tier))
            .collect()
    }
}

impl AdvisoryPresenter for TextPresenter {
    fn present(&self, ratios: &NutrientRatioSet, advisory: &AllergyAdvisory) -> Result<String, SourceError> {
        let mut lines = vec![self.render_ratios(ratios)];
        if !advisory.is_empty() {
            lines.push("Contains registered allergens:".to_string());
        }
        lines.extend(self.render_advisory(advisory));
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allergy::{classify, AllergenRiskMap, RiskTier};

    #[test]
    fn test_render_ratios_skips_zeros() {
        let ratios = NutrientRatioSet {
            energy_kcal: 13.6,
            sodium_mg: 60.0,
            sugar_g: 0.4,
            saturated_fat_g: 0.0,
            trans_fat_g: 0.0,
        };
        assert_eq!(
            TextPresenter.render_ratios(&ratios),
            "Daily value: Energy 13%, Sodium 60%"
        );
        assert_eq!(TextPresenter.render_ratios(&NutrientRatioSet::default()), ZERO_INTAKE_LINE);
    }

    #[test]
    fn test_present_with_advisory() {
        let mut map = AllergenRiskMap::new();
        map.insert("milk", RiskTier::HighRisk);
        let advisory = classify(&["milk"], &map);
        let ratios = NutrientRatioSet {
            energy_kcal: 25.0,
            ..Default::default()
        };

        let text = TextPresenter.present(&ratios, &advisory).unwrap();
        assert_eq!(
            text,
            "Daily value: Energy 25%\nContains registered allergens:\n- milk: do not consume (High Risk Group)"
        );
    }

    #[test]
    fn test_present_without_advisory() {
        let text = TextPresenter
            .present(&NutrientRatioSet::default(), &AllergyAdvisory::default())
            .unwrap();
        assert_eq!(text, format!("{}\n{}", ZERO_INTAKE_LINE, NO_ALLERGEN_LINE));
    }
}
