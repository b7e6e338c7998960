//! NutriScan Library
//!
//! Grocery scan assistant: daily nutrient targets from a biometric profile,
//! percent-of-daily-value ratios for a product, and allergen risk advisories.

pub mod allergy;
pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod presenter;
pub mod sources;
pub mod tools;
