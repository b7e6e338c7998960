//! NutriScan Tools module
//!
//! Tool implementations behind the MCP server and the CLI binaries.

pub mod allergies;
pub mod profiles;
pub mod scan;
pub mod status;
