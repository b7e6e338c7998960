//! SQLite-backed profile source and allergen registry

use crate::allergy::AllergenRiskMap;
use crate::db::Database;
use crate::models::{AllergyEntry, UserProfile};
use crate::nutrition::BiometricProfile;

use super::{AllergenRegistry, ProfileSource, SourceError};

impl ProfileSource for Database {
    fn profile(&self, user_name: &str) -> Result<Option<BiometricProfile>, SourceError> {
        let profile = self.with_conn(|conn| UserProfile::get_by_user(conn, user_name))?;
        Ok(profile.map(|p| p.biometrics()))
    }
}

impl AllergenRegistry for Database {
    fn risk_map(&self, user_name: &str, candidates: &[String]) -> Result<AllergenRiskMap, SourceError> {
        let map = self.with_conn(|conn| AllergyEntry::risk_map(conn, user_name, candidates))?;
        tracing::debug!(
            "Registry matched {} of {} allergens for '{}'",
            map.len(),
            candidates.len(),
            user_name
        );
        Ok(map)
    }
}
