//! Embedded schema migrations, applied at startup.

use diesel::prelude::*;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use super::pool::PoolError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply pending migrations over a short-lived synchronous connection.
///
/// Runs before the async pool is built, so it blocks; call it from startup
/// only.
pub fn run_pending_migrations(database_url: &str) -> Result<(), PoolError> {
    let mut connection =
        PgConnection::establish(database_url).map_err(|e| PoolError::build(e.to_string()))?;
    connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| PoolError::build(e.to_string()))?;
    Ok(())
}
