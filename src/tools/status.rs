//! Status Tool
//!
//! Runtime status of the NutriScan service.

use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Usage guide returned by the scan_instructions tool
pub const SCAN_INSTRUCTIONS: &str = r#"
# NutriScan Instructions

1. **Profile first.** Call `set_profile` with the user's weight (kg), height (cm),
   age, sex (male/female) and activity level
   (sedentary, light, moderate, active, very_active). Unknown activity levels are
   treated as sedentary.
2. **Register allergens.** Call `register_allergen` for each allergen the user
   wants to be warned about, with a risk level:
   - High Risk Group -> "do not consume"
   - Risk Group -> "exercise caution"
   - Caution Group -> "for reference"
   Allergen names are matched exactly as written on the product (case-sensitive).
3. **Check a product.**
   - With a barcode: `scan_barcode` (requires the food-safety API keys).
   - With label values in hand: `assess_product`. Leave unknown nutrients out;
     they report 0% instead of guessing.

Ratios are percent of the user's daily value. They can exceed 100.
Allergens the user never registered are not reported.
"#;

/// Current service status
#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub barcode_scanning_enabled: bool,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Tracks service uptime and reports status
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    barcode_scanning_enabled: bool,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, barcode_scanning_enabled: bool) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            barcode_scanning_enabled,
        }
    }

    pub fn get_status(&self) -> ServiceStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));
        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        ServiceStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            barcode_scanning_enabled: self.barcode_scanning_enabled,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
