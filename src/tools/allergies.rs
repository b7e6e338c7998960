//! Allergy Registry MCP Tools
//!
//! Register, list, and remove the allergens a user wants to be warned about.

use serde::Serialize;

use crate::allergy::{is_valid_allergen_name, RiskTier};
use crate::db::Database;
use crate::models::{AllergyEntry, AllergyEntryCreate};

/// Response for register_allergen
#[derive(Debug, Serialize)]
pub struct RegisterAllergenResponse {
    pub id: i64,
    pub user_name: String,
    pub allergen: String,
    pub risk_level: RiskTier,
    pub updated_at: String,
}

/// Allergens of one tier
#[derive(Debug, Serialize)]
pub struct AllergenGroup {
    pub risk_level: RiskTier,
    pub allergens: Vec<String>,
}

/// Response for list_allergens, grouped most severe first
#[derive(Debug, Serialize)]
pub struct ListAllergensResponse {
    pub user_name: String,
    pub groups: Vec<AllergenGroup>,
    pub total: usize,
}

/// Response for delete_allergen / clear_user_allergens
#[derive(Debug, Serialize)]
pub struct DeleteAllergensResponse {
    pub success: bool,
    pub user_name: String,
    pub deleted: usize,
}

/// Register an allergen for a user (re-registering replaces the tier)
pub fn register_allergen(
    db: &Database,
    user_name: &str,
    allergen: &str,
    risk_level: &str,
) -> Result<RegisterAllergenResponse, String> {
    let user_name = user_name.trim();
    if user_name.is_empty() {
        return Err("user_name cannot be empty".to_string());
    }

    let allergen = allergen.trim();
    if !is_valid_allergen_name(allergen) {
        return Err(format!(
            "Invalid allergen name '{}'. Use letters, spaces, '-' or '/'",
            allergen
        ));
    }

    let risk_level = RiskTier::parse_input(risk_level).ok_or_else(|| {
        format!(
            "Invalid risk_level '{}'. Use High Risk Group, Risk Group, or Caution Group",
            risk_level
        )
    })?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let entry = AllergyEntry::register(
        &conn,
        &AllergyEntryCreate {
            user_name: user_name.to_string(),
            allergen: allergen.to_string(),
            risk_level,
        },
    )
    .map_err(|e| format!("Failed to register allergen: {}", e))?;

    tracing::info!("Registered '{}' as {} for '{}'", entry.allergen, entry.risk_level, entry.user_name);

    Ok(RegisterAllergenResponse {
        id: entry.id,
        user_name: entry.user_name,
        allergen: entry.allergen,
        risk_level: entry.risk_level,
        updated_at: entry.updated_at,
    })
}

/// List a user's allergens grouped by tier
pub fn list_allergens(db: &Database, user_name: &str) -> Result<ListAllergensResponse, String> {
    let user_name = user_name.trim();
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let entries = AllergyEntry::list_for_user(&conn, user_name)
        .map_err(|e| format!("Failed to list allergens: {}", e))?;

    Ok(ListAllergensResponse {
        user_name: user_name.to_string(),
        total: entries.len(),
        groups: group_by_tier(entries),
    })
}

/// Group entries by tier: the three known tiers first (always present), then
/// any unrecognized tiers in first-seen order
fn group_by_tier(entries: Vec<AllergyEntry>) -> Vec<AllergenGroup> {
    let mut groups: Vec<AllergenGroup> = RiskTier::known()
        .into_iter()
        .map(|risk_level| AllergenGroup {
            risk_level,
            allergens: Vec::new(),
        })
        .collect();

    for entry in entries {
        match groups.iter_mut().find(|g| g.risk_level == entry.risk_level) {
            Some(group) => group.allergens.push(entry.allergen),
            None => groups.push(AllergenGroup {
                risk_level: entry.risk_level,
                allergens: vec![entry.allergen],
            }),
        }
    }

    groups
}

/// Remove one allergen from a user's registry
pub fn delete_allergen(db: &Database, user_name: &str, allergen: &str) -> Result<DeleteAllergensResponse, String> {
    let user_name = user_name.trim();
    let allergen = allergen.trim();
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let deleted = AllergyEntry::delete(&conn, user_name, allergen)
        .map_err(|e| format!("Failed to delete allergen: {}", e))?;

    if !deleted {
        return Err(format!("'{}' is not registered for '{}'", allergen, user_name));
    }

    Ok(DeleteAllergensResponse {
        success: true,
        user_name: user_name.to_string(),
        deleted: 1,
    })
}

/// Remove every allergen a user registered
pub fn clear_user_allergens(db: &Database, user_name: &str) -> Result<DeleteAllergensResponse, String> {
    let user_name = user_name.trim();
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let deleted = AllergyEntry::delete_for_user(&conn, user_name)
        .map_err(|e| format!("Failed to clear allergens: {}", e))?;

    tracing::info!("Cleared {} allergens for '{}'", deleted, user_name);

    Ok(DeleteAllergensResponse {
        success: true,
        user_name: user_name.to_string(),
        deleted,
    })
}
