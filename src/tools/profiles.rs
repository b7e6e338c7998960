//! Profile MCP Tools
//!
//! Store biometric profiles and estimate daily targets from them.

use serde::Serialize;

use crate::db::Database;
use crate::models::{UserProfile, UserProfileSet};
use crate::nutrition::{
    basal_metabolic_rate, estimate_daily_target, ActivityLevel, BiometricProfile,
    DailyNutrientTarget, Sex,
};

/// Raw profile fields as received from a caller
#[derive(Debug, Clone)]
pub struct ProfileInput {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub sex: String,
    /// Unrecognized levels fall back to sedentary
    pub activity_level: String,
}

impl ProfileInput {
    /// Parse and range-check into a biometric profile
    pub fn into_profile(self) -> Result<BiometricProfile, String> {
        let sex = Sex::from_str(&self.sex)
            .ok_or_else(|| format!("Invalid sex '{}'. Use male or female", self.sex))?;

        let profile = BiometricProfile {
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            age_years: self.age_years,
            sex,
            activity_level: ActivityLevel::from_str_lenient(&self.activity_level),
        };
        profile.validate().map_err(|e| e.to_string())?;
        Ok(profile)
    }
}

/// Response for estimate_daily_target
#[derive(Debug, Serialize)]
pub struct DailyTargetResponse {
    pub profile: BiometricProfile,
    pub bmr_kcal: f64,
    pub activity_multiplier: f64,
    pub target: DailyNutrientTarget,
}

impl DailyTargetResponse {
    pub fn for_profile(profile: BiometricProfile) -> Self {
        Self {
            bmr_kcal: crate::nutrition::round_to(basal_metabolic_rate(&profile), 1),
            activity_multiplier: profile.activity_level.multiplier(),
            target: estimate_daily_target(&profile),
            profile,
        }
    }
}

/// Response for set_profile / get_profile
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_name: String,
    pub profile: BiometricProfile,
    pub target: DailyNutrientTarget,
    pub updated_at: String,
}

impl From<UserProfile> for ProfileResponse {
    fn from(stored: UserProfile) -> Self {
        let profile = stored.biometrics();
        Self {
            user_name: stored.user_name,
            target: estimate_daily_target(&profile),
            profile,
            updated_at: stored.updated_at,
        }
    }
}

/// Response for list_profiles
#[derive(Debug, Serialize)]
pub struct ListProfilesResponse {
    pub profiles: Vec<ProfileResponse>,
    pub total: usize,
}

/// Response for delete_profile
#[derive(Debug, Serialize)]
pub struct DeleteProfileResponse {
    pub success: bool,
    pub user_name: String,
}

fn validate_user_name(user_name: &str) -> Result<&str, String> {
    let trimmed = user_name.trim();
    if trimmed.is_empty() {
        return Err("user_name cannot be empty".to_string());
    }
    Ok(trimmed)
}

/// Estimate daily targets for an ad-hoc profile
pub fn estimate(input: ProfileInput) -> Result<DailyTargetResponse, String> {
    let profile = input.into_profile()?;
    Ok(DailyTargetResponse::for_profile(profile))
}

/// Create or replace a user's profile
pub fn set_profile(db: &Database, user_name: &str, input: ProfileInput) -> Result<ProfileResponse, String> {
    let user_name = validate_user_name(user_name)?;
    let biometrics = input.into_profile()?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let stored = UserProfile::upsert(
        &conn,
        &UserProfileSet {
            user_name: user_name.to_string(),
            biometrics,
        },
    )
    .map_err(|e| format!("Failed to save profile: {}", e))?;

    tracing::info!("Saved profile for '{}'", stored.user_name);
    Ok(stored.into())
}

/// Get a user's profile with its current daily target
pub fn get_profile(db: &Database, user_name: &str) -> Result<Option<ProfileResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let stored = UserProfile::get_by_user(&conn, user_name.trim())
        .map_err(|e| format!("Failed to get profile: {}", e))?;
    Ok(stored.map(ProfileResponse::from))
}

/// List all stored profiles
pub fn list_profiles(db: &Database) -> Result<ListProfilesResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let profiles: Vec<ProfileResponse> = UserProfile::list(&conn)
        .map_err(|e| format!("Failed to list profiles: {}", e))?
        .into_iter()
        .map(ProfileResponse::from)
        .collect();

    Ok(ListProfilesResponse {
        total: profiles.len(),
        profiles,
    })
}

/// Delete a user's profile
pub fn delete_profile(db: &Database, user_name: &str) -> Result<DeleteProfileResponse, String> {
    let user_name = validate_user_name(user_name)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let deleted = UserProfile::delete(&conn, user_name)
        .map_err(|e| format!("Failed to delete profile: {}", e))?;

    if !deleted {
        return Err(format!("No profile found for '{}'", user_name));
    }

    Ok(DeleteProfileResponse {
        success: true,
        user_name: user_name.to_string(),
    })
}
