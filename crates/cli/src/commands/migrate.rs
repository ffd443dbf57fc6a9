//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! bistro-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `BISTRO_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//!
//! Migrations live in `crates/server/migrations/` and are embedded at
//! compile time.

use bistro_server::db;
use tracing::info;

use super::database_url;

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails or
/// a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = database_url()?;

    info!("Connecting to database...");
    let pool = db::create_pool(&database_url)
        .await
        .map_err(MigrationError::from)?;

    info!("Running migrations...");
    sqlx::migrate!("../server/migrations")
        .run(&pool)
        .await
        .map_err(MigrationError::from)?;

    info!("Migrations complete!");
    Ok(())
}
