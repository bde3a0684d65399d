//! Schema migrations for the `kv_store` slice table.
//!
//! # Responsibility
//! - Register table-layout migrations in strictly increasing order.
//! - Bring a journal file up to date in one transaction before any slice is
//!   read from it.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - Migrations cover the table layout only; slice payloads carry no version.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_kv_store.sql"),
}];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Migrations newer than `from_version`, in apply order.
fn pending_after(from_version: u32) -> impl Iterator<Item = &'static Migration> {
    MIGRATIONS
        .iter()
        .filter(move |migration| migration.version > from_version)
}

/// Applies all pending migrations on the provided connection.
///
/// Rejects files whose `user_version` is newer than this build knows.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version =
        conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in pending_after(current_version) {
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        current_version, latest
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{latest_version, pending_after};

    #[test]
    fn fresh_file_gets_every_migration_and_current_file_none() {
        assert_eq!(pending_after(0).count(), 1);
        assert_eq!(pending_after(latest_version()).count(), 0);
    }
}
