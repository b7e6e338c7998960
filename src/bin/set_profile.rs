//! Utility to store a user's biometric profile in the database
//!
//! Usage: set_profile <user> <weight_kg> <height_cm> <age> <male|female> [activity_level]

use nutriscan::config::Config;
use nutriscan::db::{self, Database};
use nutriscan::tools::profiles::{self, ProfileInput};

const USAGE: &str = "Usage: set_profile <user> <weight_kg> <height_cm> <age> <male|female> [activity_level]";

fn parse_arg<T: std::str::FromStr>(args: &[String], index: usize, name: &str) -> Result<T, String> {
    let raw = args.get(index).ok_or_else(|| USAGE.to_string())?;
    raw.parse::<T>()
        .map_err(|_| format!("Invalid {} '{}'", name, raw))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 5 {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    }

    let input = ProfileInput {
        weight_kg: parse_arg(&args, 1, "weight_kg")?,
        height_cm: parse_arg(&args, 2, "height_cm")?,
        age_years: parse_arg(&args, 3, "age")?,
        sex: args[4].clone(),
        activity_level: args.get(5).cloned().unwrap_or_else(|| "sedentary".to_string()),
    };

    let config = Config::from_env()?;
    println!("Database path: {}", config.database_path.display());
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::new(&config.database_path)?;
    database.with_conn(db::run_migrations)?;

    let saved = profiles::set_profile(&database, &args[0], input)?;
    println!("Profile set for {}:", saved.user_name);
    println!(
        "  {} kg, {} cm, {} years, {}, {}",
        saved.profile.weight_kg,
        saved.profile.height_cm,
        saved.profile.age_years,
        saved.profile.sex.as_str(),
        saved.profile.activity_level.as_str()
    );
    println!("Daily targets:");
    println!("  Energy:        {} kcal", saved.target.energy_kcal);
    println!("  Sodium:        {} mg", saved.target.sodium_mg);
    println!("  Sugar:         {} g", saved.target.sugar_g);
    println!("  Saturated fat: {} g", saved.target.saturated_fat_g);
    println!("  Trans fat:     {} g", saved.target.trans_fat_g);

    Ok(())
}
