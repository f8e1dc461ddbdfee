//! Init command implementation.

use crate::error::Result;
use crate::output::Formatter;
use nbevents_store::SqliteStore;
use std::path::Path;

/// Execute the init command.
///
/// Opening the store creates any missing tables.
pub fn execute_init(db_path: &Path, formatter: &Formatter) -> Result<()> {
    SqliteStore::new(db_path)?;
    tracing::info!(path = %db_path.display(), "Initialized database");
    println!(
        "{}",
        formatter.success(&format!("Database ready at {}", db_path.display()))
    );
    Ok(())
}
