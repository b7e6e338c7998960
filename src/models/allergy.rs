//! Allergy registry model
//!
//! Allergens a user registered, each with a risk tier.

use rusqlite::{params, params_from_iter, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::allergy::{AllergenRiskMap, RiskTier};
use crate::db::DbResult;

/// A registered allergen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllergyEntry {
    pub id: i64,
    pub user_name: String,
    pub allergen: String,
    pub risk_level: RiskTier,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for registering an allergen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllergyEntryCreate {
    pub user_name: String,
    pub allergen: String,
    pub risk_level: RiskTier,
}

impl AllergyEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let risk_level: String = row.get("risk_level")?;
        Ok(Self {
            id: row.get("id")?,
            user_name: row.get("user_name")?,
            allergen: row.get("allergen")?,
            risk_level: RiskTier::from_label(&risk_level),
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Register an allergen, replacing the tier if already registered
    pub fn register(conn: &Connection, data: &AllergyEntryCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO allergy_info (user_name, allergen, risk_level)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_name, allergen) DO UPDATE SET
                risk_level = excluded.risk_level,
                updated_at = datetime('now')
            "#,
            params![data.user_name, data.allergen, data.risk_level.label()],
        )?;

        Self::get(conn, &data.user_name, &data.allergen)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get one registered allergen
    pub fn get(conn: &Connection, user_name: &str, allergen: &str) -> DbResult<Option<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM allergy_info WHERE user_name = ?1 AND allergen = ?2")?;

        match stmt.query_row(params![user_name, allergen], Self::from_row) {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All allergens registered by a user, in registration order
    pub fn list_for_user(conn: &Connection, user_name: &str) -> DbResult<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM allergy_info WHERE user_name = ?1 ORDER BY id")?;
        let entries = stmt
            .query_map([user_name], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Remove one registered allergen; returns whether a row was removed
    pub fn delete(conn: &Connection, user_name: &str, allergen: &str) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM allergy_info WHERE user_name = ?1 AND allergen = ?2",
            params![user_name, allergen],
        )?;
        Ok(rows > 0)
    }

    /// Remove everything a user registered; returns the number of rows removed
    pub fn delete_for_user(conn: &Connection, user_name: &str) -> DbResult<usize> {
        let rows = conn.execute("DELETE FROM allergy_info WHERE user_name = ?1", [user_name])?;
        Ok(rows)
    }

    /// Risk map for a user, restricted to the candidate allergen names
    pub fn risk_map(conn: &Connection, user_name: &str, candidates: &[String]) -> DbResult<AllergenRiskMap> {
        if candidates.is_empty() {
            return Ok(AllergenRiskMap::new());
        }

        let placeholders = (0..candidates.len())
            .map(|i| format!("?{}", i + 2))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT allergen, risk_level FROM allergy_info WHERE user_name = ?1 AND allergen IN ({})",
            placeholders
        );

        let mut stmt = conn.prepare(&sql)?;
        let args = std::iter::once(user_name).chain(candidates.iter().map(String::as_str));
        let map = stmt
            .query_map(params_from_iter(args), |row| {
                let allergen: String = row.get(0)?;
                let risk_level: String = row.get(1)?;
                Ok((allergen, RiskTier::from_label(&risk_level)))
            })?
            .collect::<Result<AllergenRiskMap, _>>()?;
        Ok(map)
    }
}
