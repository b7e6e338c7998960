//! Utility to manage a user's allergen registry
//!
//! Usage:
//!   manage_allergens add <user> <risk_level> <allergen>[,<allergen>...]
//!   manage_allergens delete <user> <allergen>
//!   manage_allergens list <user>
//!   manage_allergens clear <user>

use nutriscan::allergy::split_allergen_text;
use nutriscan::config::Config;
use nutriscan::db::{self, Database};
use nutriscan::tools::allergies;

const USAGE: &str = "Usage:
  manage_allergens add <user> <risk_level> <allergen>[,<allergen>...]
  manage_allergens delete <user> <allergen>
  manage_allergens list <user>
  manage_allergens clear <user>";

fn usage() -> ! {
    eprintln!("{}", USAGE);
    std::process::exit(2);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (command, user) = match (args.first(), args.get(1)) {
        (Some(command), Some(user)) => (command.as_str(), user.as_str()),
        _ => usage(),
    };

    let config = Config::from_env()?;
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let database = Database::new(&config.database_path)?;
    database.with_conn(db::run_migrations)?;

    match command {
        "add" => {
            let (risk_level, text) = match (args.get(2), args.get(3)) {
                (Some(risk_level), Some(_)) => (risk_level, args[3..].join(" ")),
                _ => usage(),
            };
            for allergen in split_allergen_text(&text) {
                match allergies::register_allergen(&database, user, &allergen, risk_level) {
                    Ok(entry) => println!("Registered {} as {}", entry.allergen, entry.risk_level),
                    Err(e) => eprintln!("Skipped {}: {}", allergen, e),
                }
            }
        }
        "delete" => {
            let allergen = args.get(2).unwrap_or_else(|| usage());
            allergies::delete_allergen(&database, user, allergen)?;
            println!("Deleted {} for {}", allergen, user);
        }
        "list" => {
            let listed = allergies::list_allergens(&database, user)?;
            println!("{} allergens registered for {}", listed.total, listed.user_name);
            for group in listed.groups.iter().filter(|g| !g.allergens.is_empty()) {
                println!("  {}: {}", group.risk_level, group.allergens.join(", "));
            }
        }
        "clear" => {
            let cleared = allergies::clear_user_allergens(&database, user)?;
            println!("Cleared {} allergens for {}", cleared.deleted, cleared.user_name);
        }
        _ => usage(),
    }

    Ok(())
}
