//! Allergy text helpers
//!
//! Product records list allergens as one string (`"우유, 대두; 밀"`), and users
//! register allergens by free-text name.

use std::collections::HashSet;

/// Placeholders product records use when no allergy info was filed
const NO_INFO_MARKERS: &[&str] = &[
    "알레르기 정보 없음",
    "알러지 정보 없음",
    "정보 없음",
    "없음",
    "none",
    "n/a",
];

/// Split a product's allergy string into individual allergen names
///
/// Splits on runs of `,` and `;`, trims each name, and drops empties.
/// Duplicates are kept; the classifier collapses them.
pub fn split_allergen_text(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if NO_INFO_MARKERS
        .iter()
        .any(|marker| trimmed.eq_ignore_ascii_case(marker))
    {
        return Vec::new();
    }

    trimmed
        .split(|c: char| c == ',' || c == ';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trimmed, non-empty allergen names with duplicates removed, in first-seen order
pub fn normalize_allergens<S: AsRef<str>>(allergens: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    allergens
        .iter()
        .map(|a| a.as_ref().trim())
        .filter(|a| !a.is_empty() && seen.insert(*a))
        .map(str::to_string)
        .collect()
}

/// Whether a registered allergen name is acceptable
///
/// Letters of any script, whitespace, `-` and `/` are allowed.
pub fn is_valid_allergen_name(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_alphabetic() || c.is_whitespace() || c == '-' || c == '/')
}
