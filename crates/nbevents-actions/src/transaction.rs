//! Running a correction as one unit of work

use crate::error::store_error;
use crate::ActionError;
use nbevents_domain::traits::UnitOfWork;
use std::fmt::Display;
use tracing::warn;

/// Run `f` inside a transaction on `store`
///
/// Commits when `f` succeeds and rolls back when it fails, so a failed
/// correction leaves no created item or relationship behind.
pub fn apply_in_transaction<S, T, F>(store: &mut S, f: F) -> Result<T, ActionError>
where
    S: UnitOfWork,
    S::Error: Display,
    F: FnOnce(&mut S) -> Result<T, ActionError>,
{
    store.begin().map_err(store_error)?;

    let result = f(store).and_then(|value| {
        store.commit().map_err(store_error)?;
        Ok(value)
    });

    if let Err(e) = &result {
        warn!("Rolling back correction: {}", e);
        if let Err(rollback_error) = store.rollback() {
            warn!("Rollback failed: {}", rollback_error);
        }
    }

    result
}
