//! Percent-of-daily-value comparison

use super::nutrients::{round_to, DailyNutrientTarget, NutrientKey, NutrientRatioSet, ObservedNutrients};

/// Ratio of one observed value to its target, as a percentage
///
/// Unknown observations and zero targets report 0.
pub fn nutrient_ratio(observed: Option<f64>, target: f64) -> f64 {
    match observed {
        Some(value) if target != 0.0 => round_to(value / target * 100.0, 1),
        _ => 0.0,
    }
}

/// Compare a product's nutrients against a daily target, key by key
pub fn compute_ratios(observed: &ObservedNutrients, target: &DailyNutrientTarget) -> NutrientRatioSet {
    let ratio = |key: NutrientKey| nutrient_ratio(observed.get(key), target.get(key));

    NutrientRatioSet {
        energy_kcal: ratio(NutrientKey::EnergyKcal),
        sodium_mg: ratio(NutrientKey::SodiumMg),
        sugar_g: ratio(NutrientKey::SugarG),
        saturated_fat_g: ratio(NutrientKey::SaturatedFatG),
        trans_fat_g: ratio(NutrientKey::TransFatG),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> DailyNutrientTarget {
        DailyNutrientTarget {
            energy_kcal: 2000.0,
            sodium_mg: 2000.0,
            sugar_g: 50.0,
            saturated_fat_g: 22.2,
            trans_fat_g: 2.2,
        }
    }

    #[test]
    fn test_partial_observation() {
        let observed = ObservedNutrients::unknown().with(NutrientKey::EnergyKcal, 500.0);
        let ratios = compute_ratios(&observed, &target());
        assert_eq!(ratios.energy_kcal, 25.0);
        assert_eq!(ratios.sodium_mg, 0.0);
        assert_eq!(ratios.sugar_g, 0.0);
    }

    #[test]
    fn test_observed_equal_to_target_is_100() {
        let t = target();
        let observed = NutrientKey::ALL
            .iter()
            .fold(ObservedNutrients::unknown(), |acc, k| acc.with(*k, t.get(*k)));
        let ratios = compute_ratios(&observed, &t);
        for (key, ratio) in ratios.iter() {
            assert_eq!(ratio, 100.0, "{:?}", key);
        }
    }

    #[test]
    fn test_zero_target_guards_division() {
        let mut t = target();
        t.trans_fat_g = 0.0;
        let observed = ObservedNutrients::unknown().with(NutrientKey::TransFatG, 1.5);
        assert_eq!(compute_ratios(&observed, &t).trans_fat_g, 0.0);
        assert_eq!(nutrient_ratio(Some(0.0), 0.0), 0.0);
    }

    #[test]
    fn test_ratio_can_exceed_100_and_rounds() {
        assert_eq!(nutrient_ratio(Some(1200.0), 2000.0 / 3.0), 180.0);
        assert_eq!(nutrient_ratio(Some(1.0), 3.0), 33.3);
        assert_eq!(nutrient_ratio(Some(3350.0), 2000.0), 167.5);
    }
}
