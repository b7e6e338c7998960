//! Daily nutrient requirement estimation
//!
//! Energy comes from the revised Harris-Benedict BMR scaled by an activity
//! multiplier. Sugar and fat limits are fixed shares of that energy budget:
//!
//! - added sugar: 10% of calories at 4 kcal/g
//! - saturated fat: 10% of calories at 9 kcal/g
//! - trans fat: 1% of calories at 9 kcal/g
//!
//! Sodium is a flat allowance by age and activity.

use super::nutrients::{round_to, DailyNutrientTarget, NutrientKey};
use super::profile::{ActivityLevel, BiometricProfile, Sex};

/// Share of calories allowed from added sugar
pub const SUGAR_ENERGY_SHARE: f64 = 0.10;
/// Share of calories allowed from saturated fat
pub const SATURATED_FAT_ENERGY_SHARE: f64 = 0.10;
/// Share of calories allowed from trans fat
pub const TRANS_FAT_ENERGY_SHARE: f64 = 0.01;

pub const KCAL_PER_G_CARB: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Sodium allowance for adults under the senior threshold
pub const SODIUM_BASE_MG: f64 = 2000.0;
/// Sodium allowance from the senior threshold on
pub const SODIUM_SENIOR_MG: f64 = 1500.0;
/// Sodium increase for active and very active people
pub const SODIUM_ACTIVE_FACTOR: f64 = 1.2;
pub const SENIOR_AGE_YEARS: u32 = 65;

/// Basal metabolic rate in kcal/day (revised Harris-Benedict)
///
/// Inputs are not range-checked; out-of-range biometrics flow through the
/// arithmetic unchanged.
pub fn basal_metabolic_rate(profile: &BiometricProfile) -> f64 {
    let w = profile.weight_kg;
    let h = profile.height_cm;
    let a = f64::from(profile.age_years);

    match profile.sex {
        Sex::Male => 88.362 + 13.397 * w + 4.799 * h - 5.677 * a,
        Sex::Female => 447.593 + 9.247 * w + 3.098 * h - 4.330 * a,
    }
}

/// Daily sodium allowance in mg
///
/// Seniors get the reduced allowance regardless of activity.
pub fn sodium_target_mg(age_years: u32, activity_level: ActivityLevel) -> f64 {
    if age_years >= SENIOR_AGE_YEARS {
        SODIUM_SENIOR_MG
    } else if activity_level.is_high_intensity() {
        SODIUM_BASE_MG * SODIUM_ACTIVE_FACTOR
    } else {
        SODIUM_BASE_MG
    }
}

/// Compute the recommended daily intake for a profile
///
/// Macro limits derive from the unrounded energy figure; every field is
/// rounded to its reporting precision only at the end.
pub fn estimate_daily_target(profile: &BiometricProfile) -> DailyNutrientTarget {
    let energy_kcal = basal_metabolic_rate(profile) * profile.activity_level.multiplier();
    let sodium_mg = sodium_target_mg(profile.age_years, profile.activity_level);

    let sugar_g = energy_kcal * SUGAR_ENERGY_SHARE / KCAL_PER_G_CARB;
    let saturated_fat_g = energy_kcal * SATURATED_FAT_ENERGY_SHARE / KCAL_PER_G_FAT;
    let trans_fat_g = energy_kcal * TRANS_FAT_ENERGY_SHARE / KCAL_PER_G_FAT;

    DailyNutrientTarget {
        energy_kcal: round_to(energy_kcal, NutrientKey::EnergyKcal.target_precision()),
        sodium_mg: round_to(sodium_mg, NutrientKey::SodiumMg.target_precision()),
        sugar_g: round_to(sugar_g, NutrientKey::SugarG.target_precision()),
        saturated_fat_g: round_to(saturated_fat_g, NutrientKey::SaturatedFatG.target_precision()),
        trans_fat_g: round_to(trans_fat_g, NutrientKey::TransFatG.target_precision()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(sex: Sex, age_years: u32, activity_level: ActivityLevel) -> BiometricProfile {
        BiometricProfile {
            weight_kg: 70.0,
            height_cm: 175.0,
            age_years,
            sex,
            activity_level,
        }
    }

    #[test]
    fn test_bmr_male() {
        // 88.362 + 937.79 + 839.825 - 170.31
        let bmr = basal_metabolic_rate(&profile(Sex::Male, 30, ActivityLevel::Moderate));
        assert!((bmr - 1695.667).abs() < 0.001);
    }

    #[test]
    fn test_bmr_female() {
        // 447.593 + 647.29 + 542.15 - 129.9
        let bmr = basal_metabolic_rate(&profile(Sex::Female, 30, ActivityLevel::Moderate));
        assert!((bmr - 1507.133).abs() < 0.001);
    }

    #[test]
    fn test_reference_male_moderate() {
        let target = estimate_daily_target(&profile(Sex::Male, 30, ActivityLevel::Moderate));
        assert_eq!(target.energy_kcal, 2628.0);
        assert_eq!(target.sodium_mg, 2000.0);
        assert_eq!(target.sugar_g, 65.7);
        assert_eq!(target.saturated_fat_g, 29.2);
        assert_eq!(target.trans_fat_g, 2.9);
    }

    #[test]
    fn test_energy_monotonic_in_activity() {
        for sex in [Sex::Male, Sex::Female] {
            let energies: Vec<f64> = ActivityLevel::ALL
                .iter()
                .map(|level| estimate_daily_target(&profile(sex, 40, *level)).energy_kcal)
                .collect();
            assert!(energies.windows(2).all(|w| w[0] <= w[1]), "{:?}", energies);
        }
    }

    #[test]
    fn test_sodium_senior_ignores_activity() {
        for level in ActivityLevel::ALL {
            assert_eq!(sodium_target_mg(65, level), 1500.0);
            assert_eq!(estimate_daily_target(&profile(Sex::Female, 80, level)).sodium_mg, 1500.0);
        }
    }

    #[test]
    fn test_sodium_active_adults() {
        for level in ActivityLevel::ALL {
            let expected = if level.is_high_intensity() { 2400.0 } else { 2000.0 };
            let target = estimate_daily_target(&profile(Sex::Male, 64, level));
            assert_eq!(target.sodium_mg, expected, "{:?}", level);
        }
    }

    #[test]
    fn test_sugar_and_saturated_fat_share_of_energy() {
        for sex in [Sex::Male, Sex::Female] {
            for level in ActivityLevel::ALL {
                let t = estimate_daily_target(&profile(sex, 25, level));
                let allocated = t.sugar_g * KCAL_PER_G_CARB + t.saturated_fat_g * KCAL_PER_G_FAT;
                assert!((allocated - t.energy_kcal * 0.20).abs() < 1.0);
            }
        }
    }

    #[test]
    fn test_negative_biometrics_pass_through() {
        let mut p = profile(Sex::Male, 30, ActivityLevel::Sedentary);
        p.weight_kg = -200.0;
        let target = estimate_daily_target(&p);
        assert!(target.energy_kcal < 0.0);
        assert_eq!(target.sodium_mg, 2000.0);
    }
}
