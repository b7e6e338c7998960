//! Nutrition label text parsing
//!
//! Certified product records carry nutrition facts as free text, e.g.
//! `"열량 250kcal, 탄수화물 30g, 단백질 5g, 지방 12g, 나트륨 1,200mg, 포화지방 3.5g"`.
//! Each label is followed by whitespace and a number that may contain
//! thousands separators.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::nutrients::ObservedNutrients;

/// Nutrient values read off a product label
///
/// A label missing from the text stays `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LabelNutrients {
    pub energy_kcal: Option<f64>,
    pub carbohydrates_g: Option<f64>,
    pub protein_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub sodium_mg: Option<f64>,
    pub saturated_fat_g: Option<f64>,
    pub sugar_g: Option<f64>,
    pub trans_fat_g: Option<f64>,
}

impl LabelNutrients {
    /// The five nutrients compared against a daily target
    pub fn observed(&self) -> ObservedNutrients {
        ObservedNutrients {
            energy_kcal: self.energy_kcal,
            sodium_mg: self.sodium_mg,
            sugar_g: self.sugar_g,
            saturated_fat_g: self.saturated_fat_g,
            trans_fat_g: self.trans_fat_g,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One pattern per label, stored in a static `LazyLock`
struct LabelPatterns {
    energy: Regex,
    carbohydrates: Regex,
    protein: Regex,
    fat: Regex,
    sodium: Regex,
    saturated_fat: Regex,
    sugar: Regex,
    trans_fat: Regex,
}

/// The label at a word start, whitespace, then a number with optional
/// thousands separators and decimals.
///
/// The word-start guard keeps `지방` from matching inside `포화지방`.
fn label_pattern(label: &str) -> Regex {
    Regex::new(&format!(
        r"(?:^|[^\p{{L}}\p{{N}}]){}\s+([0-9][0-9,]*(?:\.[0-9]+)?)",
        regex::escape(label)
    ))
    .expect("label pattern is a valid regex")
}

static PATTERNS: LazyLock<LabelPatterns> = LazyLock::new(|| LabelPatterns {
    energy: label_pattern("열량"),
    carbohydrates: label_pattern("탄수화물"),
    protein: label_pattern("단백질"),
    fat: label_pattern("지방"),
    sodium: label_pattern("나트륨"),
    saturated_fat: label_pattern("포화지방"),
    sugar: label_pattern("당류"),
    trans_fat: label_pattern("트랜스지방"),
});

/// Parse a nutrition facts string
pub fn parse_nutrient_text(text: &str) -> LabelNutrients {
    let p = &*PATTERNS;
    LabelNutrients {
        energy_kcal: find_labeled_value(&p.energy, text),
        carbohydrates_g: find_labeled_value(&p.carbohydrates, text),
        protein_g: find_labeled_value(&p.protein, text),
        fat_g: find_labeled_value(&p.fat, text),
        sodium_mg: find_labeled_value(&p.sodium, text),
        saturated_fat_g: find_labeled_value(&p.saturated_fat, text),
        sugar_g: find_labeled_value(&p.sugar, text),
        trans_fat_g: find_labeled_value(&p.trans_fat, text),
    }
}

/// First value captured by `pattern`, with separators removed
fn find_labeled_value(pattern: &Regex, text: &str) -> Option<f64> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| m.as_str().replace(',', "").parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "총 내용량 100g, 열량 250kcal, 탄수화물 30g, 당류 12g, 단백질 5g, \
                          지방 12g, 포화지방 3.5g, 트랜스지방 0g, 콜레스테롤 10mg, 나트륨 1,200mg";

    #[test]
    fn test_parse_full_label() {
        let n = parse_nutrient_text(SAMPLE);
        assert_eq!(n.energy_kcal, Some(250.0));
        assert_eq!(n.carbohydrates_g, Some(30.0));
        assert_eq!(n.sugar_g, Some(12.0));
        assert_eq!(n.protein_g, Some(5.0));
        assert_eq!(n.fat_g, Some(12.0));
        assert_eq!(n.saturated_fat_g, Some(3.5));
        assert_eq!(n.trans_fat_g, Some(0.0));
        assert_eq!(n.sodium_mg, Some(1200.0));
    }

    #[test]
    fn test_fat_does_not_match_inside_compound_labels() {
        let n = parse_nutrient_text("포화지방 3g, 트랜스지방 0.5g");
        assert_eq!(n.fat_g, None);
        assert_eq!(n.saturated_fat_g, Some(3.0));
        assert_eq!(n.trans_fat_g, Some(0.5));
    }

    #[test]
    fn test_missing_labels_are_unknown() {
        let n = parse_nutrient_text("열량 90kcal");
        assert_eq!(n.energy_kcal, Some(90.0));
        assert_eq!(n.sodium_mg, None);

        let observed = n.observed();
        assert_eq!(observed.energy_kcal, Some(90.0));
        assert_eq!(observed.known_count(), 1);
    }

    #[test]
    fn test_label_without_number_is_unknown() {
        let n = parse_nutrient_text("나트륨 미량, 당류 -");
        assert_eq!(n.sodium_mg, None);
        assert_eq!(n.sugar_g, None);
        assert!(parse_nutrient_text("").is_empty());
    }

    #[test]
    fn test_trailing_separator_is_ignored() {
        let n = parse_nutrient_text("열량 120, 나트륨 80.");
        assert_eq!(n.energy_kcal, Some(120.0));
        assert_eq!(n.sodium_mg, Some(80.0));
    }

    #[test]
    fn test_number_stops_after_first_decimal_part() {
        let n = parse_nutrient_text("포화지방 3.5.2g, 나트륨 1,200.5mg");
        assert_eq!(n.saturated_fat_g, Some(3.5));
        assert_eq!(n.sodium_mg, Some(1200.5));
    }

    #[test]
    fn test_label_must_be_followed_by_whitespace() {
        let n = parse_nutrient_text("열량250kcal, 당류(12g)");
        assert_eq!(n.energy_kcal, None);
        assert_eq!(n.sugar_g, None);
    }
}
