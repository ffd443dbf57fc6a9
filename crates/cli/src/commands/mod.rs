//! CLI subcommands.

pub mod migrate;
pub mod seed;
pub mod user;

use secrecy::SecretString;

/// Read the database URL the same way the server does.
///
/// # Errors
///
/// Returns an error if neither `BISTRO_DATABASE_URL` nor `DATABASE_URL` is set.
pub fn database_url() -> Result<SecretString, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    std::env::var("BISTRO_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "BISTRO_DATABASE_URL not set".into())
}
