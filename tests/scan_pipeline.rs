//! End-to-end check of the scan pipeline against an in-memory database

use nutriscan::allergy::RiskTier;
use nutriscan::db::Database;
use nutriscan::nutrition::parse_nutrient_text;
use nutriscan::presenter::TextPresenter;
use nutriscan::sources::{ProductLookup, ProductNutrientSource, ScannedProduct, SourceError};
use nutriscan::tools::allergies::register_allergen;
use nutriscan::tools::profiles::{set_profile, ProfileInput};
use nutriscan::tools::scan::{assess_for_user, scan_barcode};

struct ShelfProduct;

impl ProductNutrientSource for ShelfProduct {
    fn lookup(&self, barcode: &str) -> Result<ProductLookup, SourceError> {
        Ok(ProductLookup::Found(ScannedProduct {
            barcode: barcode.to_string(),
            name: "Peanut Cookies".to_string(),
            report_no: "20110001001".to_string(),
            nutrients: parse_nutrient_text("열량 525.6kcal 나트륨 1,200mg 당류 25g 포화지방 0g"),
            allergens: vec![
                "peanut".to_string(),
                "wheat".to_string(),
                "milk".to_string(),
                "peanut".to_string(),
            ],
        }))
    }
}

fn seeded() -> Database {
    let db = Database::in_memory().unwrap();
    set_profile(
        &db,
        "jiwoo",
        ProfileInput {
            weight_kg: 70.0,
            height_cm: 175.0,
            age_years: 30,
            sex: "male".to_string(),
            activity_level: "moderate".to_string(),
        },
    )
    .unwrap();
    register_allergen(&db, "jiwoo", "peanut", "High Risk Group").unwrap();
    register_allergen(&db, "jiwoo", "wheat", "Caution Group").unwrap();
    register_allergen(&db, "jiwoo", "shellfish", "Risk Group").unwrap();
    db
}

#[test]
fn test_barcode_scan_end_to_end() {
    let db = seeded();
    let response = scan_barcode(&db, &ShelfProduct, &db, &TextPresenter, "jiwoo", "8801234567890").unwrap();

    assert_eq!(response.status, "found");
    let assessment = response.assessment.unwrap();

    assert_eq!(assessment.target.energy_kcal, 2628.0);
    assert_eq!(assessment.target.sodium_mg, 2000.0);
    assert!((assessment.ratios.energy_kcal - 20.0).abs() < 1e-9);
    assert!((assessment.ratios.sodium_mg - 60.0).abs() < 1e-9);
    assert_eq!(assessment.ratios.saturated_fat_g, 0.0);
    assert_eq!(assessment.ratios.trans_fat_g, 0.0);

    let found: Vec<(&str, &RiskTier)> = assessment
        .advisory
        .iter()
        .map(|e| (e.allergen.as_str(), &e.tier))
        .collect();
    assert_eq!(found, vec![("peanut", &RiskTier::HighRisk), ("wheat", &RiskTier::Caution)]);
    assert_eq!(assessment.highest_risk, Some(RiskTier::HighRisk));

    assert!(assessment.summary.starts_with("Daily value: Energy 20%, Sodium 60%"));
    assert!(assessment.summary.contains("- peanut: do not consume (High Risk Group)"));
    assert!(!assessment.summary.contains("milk"));
}

#[test]
fn test_assessment_without_matches() {
    let db = seeded();
    let assessment = assess_for_user(
        &db,
        &db,
        &TextPresenter,
        "jiwoo",
        &Default::default(),
        &["soy".to_string()],
    )
    .unwrap();

    assert!(assessment.ratios.all_zero());
    assert!(assessment.advisory.is_empty());
    assert_eq!(assessment.highest_risk, None);
    assert_eq!(assessment.summary, "0 calories\nNo registered allergens found.");
}

#[test]
fn test_unknown_user_is_rejected() {
    let db = seeded();
    let err = scan_barcode(&db, &ShelfProduct, &db, &TextPresenter, "stranger", "8801234567890").unwrap_err();
    assert!(err.contains("stranger"));
}

#[test]
fn test_padded_allergen_names_still_match_registry() {
    let db = seeded();
    let allergens = vec![
        " peanut ".to_string(),
        "".to_string(),
        "peanut".to_string(),
        "wheat\t".to_string(),
    ];
    let assessment = assess_for_user(
        &db,
        &db,
        &TextPresenter,
        " jiwoo ",
        &Default::default(),
        &allergens,
    )
    .unwrap();

    let found: Vec<&str> = assessment.advisory.iter().map(|e| e.allergen.as_str()).collect();
    assert_eq!(found, vec!["peanut", "wheat"]);
    assert_eq!(assessment.highest_risk, Some(RiskTier::HighRisk));
}
