//! Schema steps for the document store.
//!
//! Each step is a named SQL script. Pending steps run inside one
//! transaction and bump `PRAGMA user_version` as they go, so a failing step
//! leaves the file at its previous version.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "markdown",
        sql: include_str!("0001_markdown.sql"),
    },
    Migration {
        version: 2,
        name: "preferences",
        sql: include_str!("0002_preferences.sql"),
    },
];

/// Schema version a fully migrated connection reports.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file is ahead of this build.
/// - `Migration` naming the first step that failed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    apply_migration_list(conn, MIGRATIONS)
}

/// Reads `PRAGMA user_version`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

fn apply_migration_list(conn: &mut Connection, migrations: &[Migration]) -> DbResult<()> {
    let from_version = current_user_version(conn)?;
    let target = migrations.last().map_or(0, |migration| migration.version);

    if from_version > target {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: target,
        });
    }

    let pending: Vec<&Migration> = migrations
        .iter()
        .filter(|migration| migration.version > from_version)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in pending {
        tx.execute_batch(migration.sql)
            .and_then(|()| {
                tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))
            })
            .map_err(|source| DbError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            })?;
        debug!(
            "event=db_migrate_step module=db status=ok version={} name={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={from_version} to_version={target}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{apply_migration_list, current_user_version, Migration, MIGRATIONS};
    use crate::db::DbError;
    use rusqlite::Connection;

    #[test]
    fn failing_step_is_reported_and_rolls_back_earlier_steps() {
        let mut conn = Connection::open_in_memory().unwrap();
        let broken = [
            MIGRATIONS[0],
            Migration {
                version: 2,
                name: "broken",
                sql: "CREATE TABLE markdown (id INTEGER);",
            },
        ];

        match apply_migration_list(&mut conn, &broken) {
            Err(DbError::Migration { version, name, .. }) => {
                assert_eq!(version, 2);
                assert_eq!(name, "broken");
            }
            other => panic!("expected migration error, got {other:?}"),
        }
        assert_eq!(current_user_version(&conn).unwrap(), 0);
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'markdown';",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 0);
    }

    #[test]
    fn only_pending_steps_run() {
        let steps = [
            Migration {
                version: 1,
                name: "first",
                sql: "CREATE TABLE first (x INTEGER);",
            },
            Migration {
                version: 2,
                name: "second",
                sql: "CREATE TABLE second (x INTEGER);",
            },
        ];
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migration_list(&mut conn, &steps[..1]).unwrap();
        assert_eq!(current_user_version(&conn).unwrap(), 1);

        // Step 1 has no IF NOT EXISTS, so running it again would fail.
        apply_migration_list(&mut conn, &steps).unwrap();
        assert_eq!(current_user_version(&conn).unwrap(), 2);
        apply_migration_list(&mut conn, &steps).unwrap();
    }

    #[test]
    fn versions_are_strictly_increasing() {
        assert!(MIGRATIONS
            .windows(2)
            .all(|pair| pair[0].version < pair[1].version));
    }
}
