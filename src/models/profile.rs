//! User profile model
//!
//! Stored biometrics for a named user.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::nutrition::{ActivityLevel, BiometricProfile, Sex};

/// A stored user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub user_name: String,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub sex: Sex,
    /// Raw stored text; unrecognized values estimate as sedentary
    pub activity_level: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating or replacing a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfileSet {
    pub user_name: String,
    pub biometrics: BiometricProfile,
}

impl UserProfile {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let sex_str: String = row.get("sex")?;
        // CHECK constraint limits stored values to male/female
        let sex = Sex::from_str(&sex_str).unwrap_or(Sex::Female);

        Ok(Self {
            id: row.get("id")?,
            user_name: row.get("user_name")?,
            weight_kg: row.get("weight_kg")?,
            height_cm: row.get("height_cm")?,
            age_years: row.get("age_years")?,
            sex,
            activity_level: row.get("activity_level")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Biometrics for the estimator
    pub fn biometrics(&self) -> BiometricProfile {
        BiometricProfile {
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            age_years: self.age_years,
            sex: self.sex,
            activity_level: ActivityLevel::from_str_lenient(&self.activity_level),
        }
    }

    /// Create or replace the profile for a user
    pub fn upsert(conn: &Connection, data: &UserProfileSet) -> DbResult<Self> {
        let b = &data.biometrics;
        conn.execute(
            r#"
            INSERT INTO user_profiles (user_name, weight_kg, height_cm, age_years, sex, activity_level)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(user_name) DO UPDATE SET
                weight_kg = excluded.weight_kg,
                height_cm = excluded.height_cm,
                age_years = excluded.age_years,
                sex = excluded.sex,
                activity_level = excluded.activity_level,
                updated_at = datetime('now')
            "#,
            params![
                data.user_name,
                b.weight_kg,
                b.height_cm,
                b.age_years,
                b.sex.as_str(),
                b.activity_level.as_str(),
            ],
        )?;

        Self::get_by_user(conn, &data.user_name)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a profile by user name
    pub fn get_by_user(conn: &Connection, user_name: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM user_profiles WHERE user_name = ?1")?;

        match stmt.query_row([user_name], Self::from_row) {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all profiles by user name
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM user_profiles ORDER BY user_name")?;
        let profiles = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(profiles)
    }

    /// Delete a profile; returns whether a row was removed
    pub fn delete(conn: &Connection, user_name: &str) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM user_profiles WHERE user_name = ?1", [user_name])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn set(user_name: &str, activity_level: ActivityLevel) -> UserProfileSet {
        UserProfileSet {
            user_name: user_name.to_string(),
            biometrics: BiometricProfile {
                weight_kg: 62.5,
                height_cm: 160.0,
                age_years: 41,
                sex: Sex::Female,
                activity_level,
            },
        }
    }

    #[test]
    fn test_upsert_and_get() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| {
            let created = UserProfile::upsert(conn, &set("jiwoo", ActivityLevel::Light))?;
            assert_eq!(created.user_name, "jiwoo");
            assert_eq!(created.activity_level, "light");

            let updated = UserProfile::upsert(conn, &set("jiwoo", ActivityLevel::Active))?;
            assert_eq!(updated.id, created.id);
            assert_eq!(updated.biometrics().activity_level, ActivityLevel::Active);
            assert_eq!(UserProfile::list(conn)?.len(), 1);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_unknown_stored_activity_reads_as_sedentary() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| {
            UserProfile::upsert(conn, &set("minsu", ActivityLevel::Moderate))?;
            conn.execute(
                "UPDATE user_profiles SET activity_level = 'weekend warrior' WHERE user_name = 'minsu'",
                [],
            )?;
            let profile = UserProfile::get_by_user(conn, "minsu")?.unwrap();
            assert_eq!(profile.biometrics().activity_level, ActivityLevel::Sedentary);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_delete() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| {
            UserProfile::upsert(conn, &set("a", ActivityLevel::Light))?;
            assert!(UserProfile::delete(conn, "a")?);
            assert!(!UserProfile::delete(conn, "a")?);
            assert!(UserProfile::get_by_user(conn, "a")?.is_none());
            Ok(())
        })
        .unwrap();
    }
}
