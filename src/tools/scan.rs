//! Scan MCP Tools
//!
//! Daily target -> ratios -> allergen advisory for one product and one user.

use serde::Serialize;

use crate::allergy::{classify, normalize_allergens, AllergenRiskMap, AllergyAdvisory, RiskTier};
use crate::nutrition::{
    compute_ratios, estimate_daily_target, BiometricProfile, DailyNutrientTarget,
    NutrientRatioSet, ObservedNutrients,
};
use crate::sources::{
    AdvisoryPresenter, AllergenRegistry, ProductLookup, ProductNutrientSource, ProfileSource,
    SourceError,
};

/// Result of checking one product against one profile
#[derive(Debug, Clone, Serialize)]
pub struct ProductAssessment {
    pub target: DailyNutrientTarget,
    pub observed: ObservedNutrients,
    pub ratios: NutrientRatioSet,
    pub advisory: AllergyAdvisory,
    pub highest_risk: Option<RiskTier>,
    pub summary: String,
}

/// Response for scan_barcode
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub barcode: String,
    /// found | not_found | nutrients_unavailable
    pub status: &'static str,
    pub product_name: Option<String>,
    pub report_no: Option<String>,
    pub allergens: Vec<String>,
    pub assessment: Option<ProductAssessment>,
}

/// Run the three calculation stages and render the result
pub fn assess(
    profile: &BiometricProfile,
    observed: &ObservedNutrients,
    allergens: &[String],
    risk_map: &AllergenRiskMap,
    presenter: &dyn AdvisoryPresenter,
) -> Result<ProductAssessment, SourceError> {
    let target = estimate_daily_target(profile);
    let ratios = compute_ratios(observed, &target);
    let advisory = classify(allergens, risk_map);
    let summary = presenter.present(&ratios, &advisory)?;

    Ok(ProductAssessment {
        target,
        observed: *observed,
        ratios,
        highest_risk: advisory.highest_tier().cloned(),
        advisory,
        summary,
    })
}

/// Assess a product for a stored user
pub fn assess_for_user<P, R>(
    profiles: &P,
    registry: &R,
    presenter: &dyn AdvisoryPresenter,
    user_name: &str,
    observed: &ObservedNutrients,
    allergens: &[String],
) -> Result<ProductAssessment, String>
where
    P: ProfileSource + ?Sized,
    R: AllergenRegistry + ?Sized,
{
    let user_name = user_name.trim();
    if let Some(key) = observed.invalid_key() {
        return Err(format!("{} must be a non-negative number", key.as_str()));
    }
    let allergens = normalize_allergens(allergens);
    let profile = profiles
        .profile(user_name)
        .map_err(|e| format!("Failed to load profile: {}", e))?
        .ok_or_else(|| format!("No profile found for '{}'", user_name))?;

    let risk_map = registry
        .risk_map(user_name, &allergens)
        .map_err(|e| format!("Failed to load allergen registry: {}", e))?;

    assess(&profile, observed, &allergens, &risk_map, presenter)
        .map_err(|e| format!("Failed to present assessment: {}", e))
}

/// Look up a barcode and assess the product for a stored user
pub fn scan_barcode<P, S, R>(
    profiles: &P,
    products: &S,
    registry: &R,
    presenter: &dyn AdvisoryPresenter,
    user_name: &str,
    barcode: &str,
) -> Result<ScanResponse, String>
where
    P: ProfileSource + ?Sized,
    S: ProductNutrientSource + ?Sized,
    R: AllergenRegistry + ?Sized,
{
    let barcode = barcode.trim();
    if !crate::sources::food_safety::is_valid_barcode(barcode) {
        return Err(format!("Invalid barcode '{}'. Barcodes contain digits only", barcode));
    }

    // Fail on a missing profile before spending a network round trip
    if profiles
        .profile(user_name.trim())
        .map_err(|e| format!("Failed to load profile: {}", e))?
        .is_none()
    {
        return Err(format!("No profile found for '{}'", user_name.trim()));
    }

    let lookup = products
        .lookup(barcode)
        .map_err(|e| format!("Product lookup failed: {}", e))?;

    let response = match lookup {
        ProductLookup::NotFound => ScanResponse {
            barcode: barcode.to_string(),
            status: "not_found",
            product_name: None,
            report_no: None,
            allergens: Vec::new(),
            assessment: None,
        },
        ProductLookup::NutrientsUnavailable { name, report_no } => ScanResponse {
            barcode: barcode.to_string(),
            status: "nutrients_unavailable",
            product_name: Some(name),
            report_no: Some(report_no),
            allergens: Vec::new(),
            assessment: None,
        },
        ProductLookup::Found(product) => {
            let observed = product.nutrients.observed();
            let assessment = assess_for_user(
                profiles,
                registry,
                presenter,
                user_name,
                &observed,
                &product.allergens,
            )?;
            tracing::info!(
                "Scanned '{}' for '{}': {} advisory entries",
                product.name,
                user_name.trim(),
                assessment.advisory.len()
            );
            ScanResponse {
                barcode: product.barcode,
                status: "found",
                product_name: Some(product.name),
                report_no: Some(product.report_no),
                allergens: product.allergens,
                assessment: Some(assessment),
            }
        }
    };

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::{parse_nutrient_text, ActivityLevel, NutrientKey, Sex};
    use crate::presenter::TextPresenter;
    use crate::sources::ScannedProduct;

    struct FixedProfile(Option<BiometricProfile>);

    impl ProfileSource for FixedProfile {
        fn profile(&self, _user_name: &str) -> Result<Option<BiometricProfile>, SourceError> {
            Ok(self.0)
        }
    }

    struct FixedRegistry(AllergenRiskMap);

    impl AllergenRegistry for FixedRegistry {
        fn risk_map(&self, _user_name: &str, _candidates: &[String]) -> Result<AllergenRiskMap, SourceError> {
            Ok(self.0.clone())
        }
    }

    struct FixedProduct(ProductLookup);

    impl ProductNutrientSource for FixedProduct {
        fn lookup(&self, _barcode: &str) -> Result<ProductLookup, SourceError> {
            Ok(self.0.clone())
        }
    }

    struct Offline;

    impl ProductNutrientSource for Offline {
        fn lookup(&self, _barcode: &str) -> Result<ProductLookup, SourceError> {
            Err(SourceError::NotConfigured("food-safety API"))
        }
    }

    fn profile() -> BiometricProfile {
        BiometricProfile {
            weight_kg: 70.0,
            height_cm: 175.0,
            age_years: 30,
            sex: Sex::Male,
            activity_level: ActivityLevel::Moderate,
        }
    }

    fn registry() -> FixedRegistry {
        let mut map = AllergenRiskMap::new();
        map.insert("우유", RiskTier::HighRisk);
        map.insert("대두", RiskTier::Caution);
        FixedRegistry(map)
    }

    fn product() -> ScannedProduct {
        ScannedProduct {
            barcode: "8801234567890".to_string(),
            name: "초코우유".to_string(),
            report_no: "19750001001123".to_string(),
            nutrients: parse_nutrient_text("열량 262.8kcal, 나트륨 200mg, 당류 32.85g"),
            allergens: vec!["우유".to_string(), "대두".to_string(), "밀".to_string()],
        }
    }

    #[test]
    fn test_assess() {
        let observed = ObservedNutrients::unknown()
            .with(NutrientKey::EnergyKcal, 262.8)
            .with(NutrientKey::SodiumMg, 200.0);
        let allergens = vec!["우유".to_string(), "우유".to_string(), "땅콩".to_string()];

        let result = assess(&profile(), &observed, &allergens, &registry().0, &TextPresenter).unwrap();
        assert_eq!(result.target.energy_kcal, 2628.0);
        assert_eq!(result.ratios.energy_kcal, 10.0);
        assert_eq!(result.ratios.sodium_mg, 10.0);
        assert_eq!(result.ratios.sugar_g, 0.0);
        assert_eq!(result.advisory.len(), 1);
        assert_eq!(result.highest_risk, Some(RiskTier::HighRisk));
        assert!(result.summary.contains("우유: do not consume"));
    }

    #[test]
    fn test_assess_for_missing_user() {
        let err = assess_for_user(
            &FixedProfile(None),
            &registry(),
            &TextPresenter,
            "ghost",
            &ObservedNutrients::unknown(),
            &[],
        )
        .unwrap_err();
        assert!(err.contains("ghost"));
    }

    #[test]
    fn test_assess_for_user_rejects_negative_amounts() {
        let observed = ObservedNutrients::unknown().with(NutrientKey::SodiumMg, -100.0);
        let err = assess_for_user(
            &FixedProfile(Some(profile())),
            &registry(),
            &TextPresenter,
            "jiwoo",
            &observed,
            &[],
        )
        .unwrap_err();
        assert!(err.contains("sodium_mg"));
    }

    #[test]
    fn test_scan_found() {
        let response = scan_barcode(
            &FixedProfile(Some(profile())),
            &FixedProduct(ProductLookup::Found(product())),
            &registry(),
            &TextPresenter,
            "jiwoo",
            " 8801234567890 ",
        )
        .unwrap();

        assert_eq!(response.status, "found");
        let assessment = response.assessment.unwrap();
        assert_eq!(assessment.ratios.sugar_g, 50.0);
        let names: Vec<&str> = assessment.advisory.iter().map(|e| e.allergen.as_str()).collect();
        assert_eq!(names, vec!["우유", "대두"]);
    }

    #[test]
    fn test_scan_not_found_and_unavailable() {
        let not_found = scan_barcode(
            &FixedProfile(Some(profile())),
            &FixedProduct(ProductLookup::NotFound),
            &registry(),
            &TextPresenter,
            "jiwoo",
            "123",
        )
        .unwrap();
        assert_eq!(not_found.status, "not_found");
        assert!(not_found.assessment.is_none());

        let unavailable = scan_barcode(
            &FixedProfile(Some(profile())),
            &FixedProduct(ProductLookup::NutrientsUnavailable {
                name: "초코우유".to_string(),
                report_no: "1".to_string(),
            }),
            &registry(),
            &TextPresenter,
            "jiwoo",
            "123",
        )
        .unwrap();
        assert_eq!(unavailable.status, "nutrients_unavailable");
        assert_eq!(unavailable.product_name.as_deref(), Some("초코우유"));
    }

    #[test]
    fn test_scan_rejects_bad_barcode_and_missing_profile() {
        let products = FixedProduct(ProductLookup::NotFound);
        assert!(scan_barcode(&FixedProfile(Some(profile())), &products, &registry(), &TextPresenter, "u", "12ab").is_err());
        assert!(scan_barcode(&FixedProfile(None), &products, &registry(), &TextPresenter, "u", "123").is_err());
    }

    #[test]
    fn test_scan_source_failure() {
        let err = scan_barcode(&FixedProfile(Some(profile())), &Offline, &registry(), &TextPresenter, "u", "123")
            .unwrap_err();
        assert!(err.contains("not configured"));
    }
}
