//! NutriScan MCP Server Implementation
//!
//! Exposes the profile, allergen registry and scan tools over MCP.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::allergy::{classify, normalize_allergens, split_allergen_text, AllergenRiskMap, RiskTier};
use crate::db::Database;
use crate::nutrition::{compute_ratios, DailyNutrientTarget, ObservedNutrients};
use crate::presenter::TextPresenter;
use crate::sources::{AdvisoryPresenter, FoodSafetyClient, FoodSafetyConfig, SourceError};
use crate::tools::allergies;
use crate::tools::profiles::{self, ProfileInput};
use crate::tools::scan;
use crate::tools::status::{StatusTracker, SCAN_INSTRUCTIONS};

/// NutriScan MCP Service
#[derive(Clone)]
pub struct NutriScanService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    /// None when either food-safety key is missing
    food_safety: Option<FoodSafetyConfig>,
    tool_router: ToolRouter<NutriScanService>,
}

impl NutriScanService {
    pub fn new(database_path: PathBuf, database: Database, food_safety: Option<FoodSafetyConfig>) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(
                database_path,
                food_safety.is_some(),
            ))),
            database,
            food_safety,
            tool_router: Self::tool_router(),
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Parameter types
// ============================================================================

fn default_activity_level() -> String {
    "sedentary".to_string()
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProfileParams {
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Height in centimeters
    pub height_cm: f64,
    /// Age in whole years
    pub age_years: u32,
    /// male or female
    pub sex: String,
    /// sedentary, light, moderate, active, or very_active (unknown values count as sedentary)
    #[serde(default = "default_activity_level")]
    pub activity_level: String,
}

impl From<ProfileParams> for ProfileInput {
    fn from(p: ProfileParams) -> Self {
        ProfileInput {
            weight_kg: p.weight_kg,
            height_cm: p.height_cm,
            age_years: p.age_years,
            sex: p.sex,
            activity_level: p.activity_level,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetProfileParams {
    /// User the profile belongs to
    pub user_name: String,
    #[serde(flatten)]
    pub profile: ProfileParams,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UserParams {
    pub user_name: String,
}

/// Nutrient amounts for one serving. Omit values that are not known.
#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct NutrientAmountsParams {
    pub energy_kcal: Option<f64>,
    pub sodium_mg: Option<f64>,
    pub sugar_g: Option<f64>,
    pub saturated_fat_g: Option<f64>,
    pub trans_fat_g: Option<f64>,
}

impl TryFrom<NutrientAmountsParams> for ObservedNutrients {
    type Error = String;

    fn try_from(p: NutrientAmountsParams) -> Result<Self, Self::Error> {
        let observed = ObservedNutrients {
            energy_kcal: p.energy_kcal,
            sodium_mg: p.sodium_mg,
            sugar_g: p.sugar_g,
            saturated_fat_g: p.saturated_fat_g,
            trans_fat_g: p.trans_fat_g,
        };
        match observed.invalid_key() {
            Some(key) => Err(format!("{} must be a non-negative number", key.as_str())),
            None => Ok(observed),
        }
    }
}

/// Explicit daily targets
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DailyTargetParams {
    pub energy_kcal: f64,
    pub sodium_mg: f64,
    pub sugar_g: f64,
    pub saturated_fat_g: f64,
    pub trans_fat_g: f64,
}

impl TryFrom<DailyTargetParams> for DailyNutrientTarget {
    type Error = String;

    fn try_from(p: DailyTargetParams) -> Result<Self, Self::Error> {
        let target = DailyNutrientTarget {
            energy_kcal: p.energy_kcal,
            sodium_mg: p.sodium_mg,
            sugar_g: p.sugar_g,
            saturated_fat_g: p.saturated_fat_g,
            trans_fat_g: p.trans_fat_g,
        };
        match target.invalid_key() {
            Some(key) => Err(format!("target {} must be a non-negative number", key.as_str())),
            None => Ok(target),
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ComputeRatiosParams {
    /// Nutrient amounts in the product
    #[serde(default)]
    pub observed: NutrientAmountsParams,
    /// Explicit targets. Takes precedence over user_name.
    pub target: Option<DailyTargetParams>,
    /// Use this stored user's daily target
    pub user_name: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ClassifyAllergensParams {
    /// Allergen names as listed on the product
    #[serde(default)]
    pub allergens: Vec<String>,
    /// Raw allergen text from a label, split on ',' or ';'
    pub allergy_text: Option<String>,
    /// Allergen -> risk level. Takes precedence over user_name.
    pub risk_map: Option<HashMap<String, String>>,
    /// Use this stored user's allergen registry
    pub user_name: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RegisterAllergenParams {
    pub user_name: String,
    /// Allergen name exactly as it appears on product labels
    pub allergen: String,
    /// High Risk Group, Risk Group, or Caution Group (high/risk/caution also accepted)
    pub risk_level: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteAllergenParams {
    pub user_name: String,
    pub allergen: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AssessProductParams {
    pub user_name: String,
    #[serde(default)]
    pub nutrients: NutrientAmountsParams,
    #[serde(default)]
    pub allergens: Vec<String>,
    /// Raw allergen text from a label, split on ',' or ';'
    pub allergy_text: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ScanBarcodeParams {
    pub user_name: String,
    /// Product barcode, digits only
    pub barcode: String,
}

/// Listed allergens followed by any parsed from free text, trimmed and deduplicated
fn collect_allergens(mut allergens: Vec<String>, allergy_text: Option<&str>) -> Vec<String> {
    if let Some(text) = allergy_text {
        allergens.extend(split_allergen_text(text));
    }
    normalize_allergens(&allergens)
}

fn risk_map_from_params(raw: HashMap<String, String>) -> Result<AllergenRiskMap, String> {
    raw.into_iter()
        .map(|(allergen, level)| {
            RiskTier::parse_input(&level)
                .map(|tier| (allergen.trim().to_string(), tier))
                .ok_or_else(|| format!("Invalid risk level '{}' for '{}'", level, allergen))
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct RatiosResponse {
    target: DailyNutrientTarget,
    ratios: crate::nutrition::NutrientRatioSet,
    summary: String,
}

#[derive(Debug, Serialize)]
struct ClassifyResponse {
    allergens: Vec<String>,
    advisory: crate::allergy::AllergyAdvisory,
    highest_risk: Option<RiskTier>,
    lines: Vec<String>,
}

// ============================================================================
// Tools
// ============================================================================

#[tool_router]
impl NutriScanService {
    #[tool(description = "Get the current status of the NutriScan service including build number, database size, and whether barcode scanning is configured")]
    async fn get_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        json_result(&status)
    }

    #[tool(description = "Get instructions for setting up a profile, registering allergens, and checking products. Call this first.")]
    fn scan_instructions(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(SCAN_INSTRUCTIONS)]))
    }

    // ========================================================================
    // Calculators
    // ========================================================================

    #[tool(description = "Estimate daily energy, sodium, sugar, saturated fat and trans fat targets from weight, height, age, sex and activity level")]
    fn estimate_daily_target(&self, Parameters(p): Parameters<ProfileParams>) -> Result<CallToolResult, McpError> {
        let response = profiles::estimate(p.into()).map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&response)
    }

    #[tool(description = "Compute percent of daily value for each nutrient. Provide either explicit targets or a stored user_name.")]
    fn compute_nutrient_ratios(&self, Parameters(p): Parameters<ComputeRatiosParams>) -> Result<CallToolResult, McpError> {
        let observed =
            ObservedNutrients::try_from(p.observed).map_err(|e| McpError::invalid_params(e, None))?;

        let target: DailyNutrientTarget = match (p.target, p.user_name) {
            (Some(target), _) => DailyNutrientTarget::try_from(target).map_err(|e| McpError::invalid_params(e, None))?,
            (None, Some(user_name)) => profiles::get_profile(&self.database, &user_name)
                .map_err(|e| McpError::internal_error(e, None))?
                .map(|stored| stored.target)
                .ok_or_else(|| {
                    McpError::invalid_params(format!("No profile found for '{}'", user_name.trim()), None)
                })?,
            (None, None) => {
                return Err(McpError::invalid_params("Provide target or user_name", None));
            }
        };

        let ratios = compute_ratios(&observed, &target);
        json_result(&RatiosResponse {
            summary: TextPresenter.render_ratios(&ratios),
            target,
            ratios,
        })
    }

    #[tool(description = "Classify a product's allergens into risk tiers. Provide either an explicit risk_map or a stored user_name. Allergens not in the map are not reported.")]
    fn classify_allergens(&self, Parameters(p): Parameters<ClassifyAllergensParams>) -> Result<CallToolResult, McpError> {
        let allergens = collect_allergens(p.allergens, p.allergy_text.as_deref());

        let risk_map = match (p.risk_map, p.user_name) {
            (Some(raw), _) => risk_map_from_params(raw).map_err(|e| McpError::invalid_params(e, None))?,
            (None, Some(user_name)) => {
                use crate::sources::AllergenRegistry;
                self.database
                    .risk_map(user_name.trim(), &allergens)
                    .map_err(|e| McpError::internal_error(e.to_string(), None))?
            }
            (None, None) => {
                return Err(McpError::invalid_params("Provide risk_map or user_name", None));
            }
        };

        let advisory = classify(&allergens, &risk_map);
        json_result(&ClassifyResponse {
            lines: TextPresenter.render_advisory(&advisory),
            highest_risk: advisory.highest_tier().cloned(),
            allergens,
            advisory,
        })
    }

    // ========================================================================
    // Profiles
    // ========================================================================

    #[tool(description = "Create or replace a user's biometric profile and return the resulting daily targets")]
    fn set_profile(&self, Parameters(p): Parameters<SetProfileParams>) -> Result<CallToolResult, McpError> {
        let response = profiles::set_profile(&self.database, &p.user_name, p.profile.into())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&response)
    }

    #[tool(description = "Get a user's stored profile with its daily targets")]
    fn get_profile(&self, Parameters(p): Parameters<UserParams>) -> Result<CallToolResult, McpError> {
        let result = profiles::get_profile(&self.database, &p.user_name)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(profile) => json_result(&profile),
            None => json_result(&serde_json::json!({
                "error": "Profile not found",
                "user_name": p.user_name,
            })),
        }
    }

    #[tool(description = "List all stored user profiles")]
    fn list_profiles(&self) -> Result<CallToolResult, McpError> {
        let response = profiles::list_profiles(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&response)
    }

    #[tool(description = "Delete a user's profile")]
    fn delete_profile(&self, Parameters(p): Parameters<UserParams>) -> Result<CallToolResult, McpError> {
        let response = profiles::delete_profile(&self.database, &p.user_name)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&response)
    }

    // ========================================================================
    // Allergen registry
    // ========================================================================

    #[tool(description = "Register an allergen for a user with a risk level. Re-registering replaces the risk level.")]
    fn register_allergen(&self, Parameters(p): Parameters<RegisterAllergenParams>) -> Result<CallToolResult, McpError> {
        let response = allergies::register_allergen(&self.database, &p.user_name, &p.allergen, &p.risk_level)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&response)
    }

    #[tool(description = "List a user's registered allergens grouped by risk level, most severe first")]
    fn list_allergens(&self, Parameters(p): Parameters<UserParams>) -> Result<CallToolResult, McpError> {
        let response = allergies::list_allergens(&self.database, &p.user_name)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&response)
    }

    #[tool(description = "Remove one allergen from a user's registry")]
    fn delete_allergen(&self, Parameters(p): Parameters<DeleteAllergenParams>) -> Result<CallToolResult, McpError> {
        let response = allergies::delete_allergen(&self.database, &p.user_name, &p.allergen)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&response)
    }

    #[tool(description = "Remove every allergen a user registered")]
    fn clear_user_allergens(&self, Parameters(p): Parameters<UserParams>) -> Result<CallToolResult, McpError> {
        let response = allergies::clear_user_allergens(&self.database, &p.user_name)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&response)
    }

    // ========================================================================
    // Scanning
    // ========================================================================

    #[tool(description = "Check a product for a stored user from nutrient amounts and allergens you already have (no barcode lookup)")]
    fn assess_product(&self, Parameters(p): Parameters<AssessProductParams>) -> Result<CallToolResult, McpError> {
        let allergens = collect_allergens(p.allergens, p.allergy_text.as_deref());
        let observed =
            ObservedNutrients::try_from(p.nutrients).map_err(|e| McpError::invalid_params(e, None))?;

        let assessment = scan::assess_for_user(
            &self.database,
            &self.database,
            &TextPresenter,
            &p.user_name,
            &observed,
            &allergens,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&assessment)
    }

    #[tool(description = "Look up a barcode in the food-safety registry and check the product for a stored user. Requires both food-safety API keys.")]
    async fn scan_barcode(&self, Parameters(p): Parameters<ScanBarcodeParams>) -> Result<CallToolResult, McpError> {
        let config = self.food_safety.clone().ok_or_else(|| {
            McpError::internal_error(SourceError::NotConfigured("Barcode scanning").to_string(), None)
        })?;
        let database = self.database.clone();

        // The HTTP client blocks, so the whole lookup runs off the async runtime
        let response = tokio::task::spawn_blocking(move || {
            let client = FoodSafetyClient::new(config).map_err(|e| e.to_string())?;
            let presenter: &dyn AdvisoryPresenter = &TextPresenter;
            scan::scan_barcode(&database, &client, &database, presenter, &p.user_name, &p.barcode)
        })
        .await
        .map_err(|e| McpError::internal_error(format!("Scan task failed: {}", e), None))?
        .map_err(|e| McpError::internal_error(e, None))?;

        json_result(&response)
    }
}

#[tool_handler]
impl ServerHandler for NutriScanService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutriscan".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("NutriScan".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "NutriScan - grocery scan assistant. Store a user's profile with set_profile and \
                 their allergens with register_allergen, then check products with scan_barcode \
                 or assess_product. Ratios are percent of the user's daily value. Call \
                 scan_instructions for details."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_allergens_appends_text() {
        let allergens = collect_allergens(vec!["milk".to_string()], Some("egg; wheat,"));
        assert_eq!(allergens, vec!["milk", "egg", "wheat"]);

        let padded = collect_allergens(vec![" milk ".to_string(), "".to_string()], Some("milk, egg"));
        assert_eq!(padded, vec!["milk", "egg"]);
        assert_eq!(collect_allergens(Vec::new(), None), Vec::<String>::new());
    }

    #[test]
    fn test_negative_amounts_are_rejected() {
        let ok = NutrientAmountsParams {
            sodium_mg: Some(400.0),
            ..Default::default()
        };
        assert_eq!(ObservedNutrients::try_from(ok).unwrap().sodium_mg, Some(400.0));

        let negative = NutrientAmountsParams {
            sodium_mg: Some(-100.0),
            ..Default::default()
        };
        let err = ObservedNutrients::try_from(negative).unwrap_err();
        assert!(err.contains("sodium_mg"));

        let target = DailyTargetParams {
            energy_kcal: 2000.0,
            sodium_mg: 2000.0,
            sugar_g: -50.0,
            saturated_fat_g: 22.2,
            trans_fat_g: 2.2,
        };
        let err = DailyNutrientTarget::try_from(target).unwrap_err();
        assert!(err.contains("sugar_g"));
    }

    #[test]
    fn test_risk_map_from_params() {
        let mut raw = HashMap::new();
        raw.insert(" peanut ".to_string(), "high".to_string());
        let map = risk_map_from_params(raw).unwrap();
        assert_eq!(map.get("peanut"), Some(&RiskTier::HighRisk));

        let mut bad = HashMap::new();
        bad.insert("peanut".to_string(), "lethal".to_string());
        assert!(risk_map_from_params(bad).is_err());
    }

    #[test]
    fn test_set_profile_params_flatten() {
        let p: SetProfileParams = serde_json::from_value(serde_json::json!({
            "user_name": "jiwoo",
            "weight_kg": 55.0,
            "height_cm": 162.0,
            "age_years": 28,
            "sex": "female"
        }))
        .unwrap();
        assert_eq!(p.profile.activity_level, "sedentary");
    }
}
