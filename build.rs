//! Build script for NutriScan
//!
//! Bumps the local build counter and embeds build metadata for the startup banner.

use std::fs;
use std::path::Path;

const BUILD_NUMBER_FILE: &str = "build_number.txt";

fn read_build_number(path: &Path) -> u64 {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn main() {
    println!("cargo:rerun-if-changed=src");

    let path = Path::new(BUILD_NUMBER_FILE);
    let build = read_build_number(path) + 1;

    // Read-only source trees (vendored builds) just skip the counter bump
    if let Err(e) = fs::write(path, build.to_string()) {
        println!("cargo:warning=Could not persist build number: {}", e);
    }

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    println!("cargo:rustc-env=NUTRISCAN_BUILD_NUMBER={}", build);
    println!("cargo:rustc-env=NUTRISCAN_BUILD_TIMESTAMP={}", timestamp);
}
