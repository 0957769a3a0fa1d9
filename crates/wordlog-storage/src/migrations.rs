//! Database migrations
//!
//! Schema: a single `vocabulary` table. Existing tables are never dropped or
//! altered, and no index is added to one, so backups written by older builds
//! open unchanged apart from the `schema_version` bookkeeping table.

use crate::Result;
use rusqlite::{Connection, OptionalExtension};

const SCHEMA_VERSION: i32 = 1;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
    }

    set_schema_version(conn, SCHEMA_VERSION)?;
    Ok(())
}

pub(crate) fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let found: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn get_schema_version(conn: &Connection) -> Result<i32> {
    let result: std::result::Result<i32, _> =
        conn.query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        });

    match result {
        Ok(v) => Ok(v),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(rusqlite::Error::SqliteFailure(_, _)) => {
            // Table doesn't exist yet
            conn.execute(
                "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
                [],
            )?;
            conn.execute("INSERT INTO schema_version (version) VALUES (0)", [])?;
            Ok(0)
        }
        Err(e) => Err(e.into()),
    }
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

fn migrate_v1(conn: &Connection) -> Result<()> {
    if table_exists(conn, "vocabulary")? {
        tracing::info!("Vocabulary table already exists");
    } else {
        tracing::info!("Running migration v1: vocabulary table");

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS vocabulary (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                word TEXT UNIQUE,
                created_at INTEGER,
                lookup_count INTEGER DEFAULT 1,
                is_favorite INTEGER DEFAULT 0
            );
            CREATE INDEX IF NOT EXISTS idx_vocabulary_created ON vocabulary(created_at);
        "#,
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute(
            "INSERT INTO vocabulary (word, created_at) VALUES ('kept', 10)",
            [],
        )
        .unwrap();

        run_migrations(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM vocabulary", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_existing_table_without_version_is_kept() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE vocabulary (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                word TEXT UNIQUE,
                created_at INTEGER,
                lookup_count INTEGER DEFAULT 1,
                is_favorite INTEGER DEFAULT 0
            );
            INSERT INTO vocabulary (word, created_at, lookup_count, is_favorite)
                VALUES ('legacy', 1700000000, 4, 1);
        "#,
        )
        .unwrap();

        run_migrations(&conn).unwrap();

        let (count, favorite): (i64, i64) = conn
            .query_row(
                "SELECT lookup_count, is_favorite FROM vocabulary WHERE word = 'legacy'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(count, 4);
        assert_eq!(favorite, 1);
        assert_eq!(index_count(&conn), 0);
    }

    fn index_count(conn: &Connection) -> i64 {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = 'idx_vocabulary_created'",
            [],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_table_exists() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(!table_exists(&conn, "vocabulary").unwrap());
        run_migrations(&conn).unwrap();
        assert!(table_exists(&conn, "vocabulary").unwrap());
        assert_eq!(index_count(&conn), 1);
    }
}
