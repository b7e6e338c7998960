//! Runtime configuration
//!
//! Everything comes from environment variables:
//!
//! - `NUTRISCAN_DATABASE_PATH` - SQLite file (default `<project>/data/nutriscan.db`)
//! - `NUTRISCAN_BARCODE_API_KEY` - barcode registry service key
//! - `NUTRISCAN_NUTRITION_API_KEY` - certified-label service key
//! - `NUTRISCAN_HTTP_TIMEOUT_SECS` - request timeout (default 10)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::sources::FoodSafetyConfig;

pub const DATABASE_PATH_VAR: &str = "NUTRISCAN_DATABASE_PATH";
pub const BARCODE_API_KEY_VAR: &str = "NUTRISCAN_BARCODE_API_KEY";
pub const NUTRITION_API_KEY_VAR: &str = "NUTRISCAN_NUTRITION_API_KEY";
pub const HTTP_TIMEOUT_VAR: &str = "NUTRISCAN_HTTP_TIMEOUT_SECS";

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive whole number of seconds, got '{value}'")]
    InvalidTimeout { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub barcode_api_key: Option<String>,
    pub nutrition_api_key: Option<String>,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let http_timeout = match non_empty(HTTP_TIMEOUT_VAR) {
            Some(value) => {
                let secs = value
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| ConfigError::InvalidTimeout {
                        var: HTTP_TIMEOUT_VAR,
                        value: value.clone(),
                    })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            database_path: non_empty(DATABASE_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(default_database_path),
            barcode_api_key: non_empty(BARCODE_API_KEY_VAR),
            nutrition_api_key: non_empty(NUTRITION_API_KEY_VAR),
            http_timeout,
        })
    }

    /// Food-safety client settings, if both service keys are present
    pub fn food_safety(&self) -> Option<FoodSafetyConfig> {
        match (&self.barcode_api_key, &self.nutrition_api_key) {
            (Some(barcode), Some(nutrition)) => Some(FoodSafetyConfig::new(
                barcode.clone(),
                nutrition.clone(),
                self.http_timeout,
            )),
            _ => None,
        }
    }
}

/// `data/nutriscan.db` next to the project root when run from target/
pub fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(project) = path.parent().and_then(|p| p.parent()) {
            path = project.to_path_buf();
        }
    }

    path.push("data");
    path.push("nutriscan.db");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|var| map.get(var).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert!(cfg.database_path.ends_with("data/nutriscan.db"));
        assert_eq!(cfg.http_timeout, Duration::from_secs(10));
        assert!(cfg.food_safety().is_none());
    }

    #[test]
    fn test_explicit_values() {
        let cfg = config(&[
            (DATABASE_PATH_VAR, "/tmp/scan.db"),
            (BARCODE_API_KEY_VAR, "abc"),
            (NUTRITION_API_KEY_VAR, "def"),
            (HTTP_TIMEOUT_VAR, "3"),
        ])
        .unwrap();
        assert_eq!(cfg.database_path, PathBuf::from("/tmp/scan.db"));
        let fs = cfg.food_safety().unwrap();
        assert_eq!(fs.barcode_api_key, "abc");
        assert_eq!(fs.label_api_key, "def");
        assert_eq!(fs.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_one_key_disables_scanning() {
        let cfg = config(&[(BARCODE_API_KEY_VAR, "abc"), (NUTRITION_API_KEY_VAR, " ")]).unwrap();
        assert!(cfg.food_safety().is_none());
    }

    #[test]
    fn test_bad_timeout() {
        assert!(matches!(
            config(&[(HTTP_TIMEOUT_VAR, "soon")]),
            Err(ConfigError::InvalidTimeout { .. })
        ));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        assert!(matches!(
            config(&[(HTTP_TIMEOUT_VAR, "0")]),
            Err(ConfigError::InvalidTimeout { .. })
        ));
    }
}
