//! Utility to set a user's role in the database
//!
//! Usage: `set_user_role <email> <user|admin>`

use lifemon::config::{default_database_path, Settings};
use lifemon::models::{Role, User};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [email, role] = args.as_slice() else {
        eprintln!("Usage: set_user_role <email> <user|admin>");
        std::process::exit(2);
    };

    let Some(role) = Role::from_str(role) else {
        eprintln!("Invalid role '{}': expected user or admin", role);
        std::process::exit(2);
    };

    // The full settings need a JWT secret; fall back to the default path without one
    let db_path = Settings::load()
        .map(|settings| settings.database_path())
        .unwrap_or_else(|_| default_database_path());
    println!("Database path: {}", db_path.display());

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let database = lifemon::db::Database::new(&db_path)?;

    // Run migrations
    database.with_conn(|conn| {
        lifemon::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let updated = database.with_conn(|conn| {
        let Some(user) = User::get_by_email(conn, email)? else {
            return Ok(None);
        };
        User::set_role(conn, user.id, role)
    })?;

    match updated {
        Some(user) => {
            println!("Role updated:");
            println!("  Name: {}", user.nama);
            println!("  Email: {}", user.email);
            println!("  Role: {}", user.role.as_str());
            println!("  Updated: {}", user.updated_at);
            Ok(())
        }
        None => {
            eprintln!("No user with email {}", email);
            std::process::exit(1);
        }
    }
}
