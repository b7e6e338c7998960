//! Build metadata
//!
//! `build.rs` stamps each compile with a build number and timestamp; the
//! status tool and the startup banner report them.

use serde::Serialize;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const UNKNOWN_TIMESTAMP: &str = "unknown";

/// Build metadata reported by the status tool
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    /// 0 when built without `build.rs` stamping
    pub build_number: u64,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self::from_stamps(
            option_env!("NUTRISCAN_BUILD_NUMBER"),
            option_env!("NUTRISCAN_BUILD_TIMESTAMP"),
        )
    }

    fn from_stamps(build_number: Option<&str>, build_timestamp: Option<&'static str>) -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: VERSION,
            build_number: build_number
                .and_then(|n| n.trim().parse().ok())
                .unwrap_or(0),
            build_timestamp: build_timestamp
                .filter(|t| !t.is_empty())
                .unwrap_or(UNKNOWN_TIMESTAMP),
        }
    }

    /// Banner shown on stderr before the server takes over stdio
    pub fn banner(&self) -> String {
        let rule = "=".repeat(47);
        format!(
            "{rule}\n  NutriScan - grocery scan assistant\n  {} v{} (build {})\n  Compiled: {}\n{rule}",
            self.name, self.version, self.build_number, self.build_timestamp
        )
    }
}

pub fn print_startup_banner() {
    eprintln!("{}", BuildInfo::current().banner());
}
