//! Whole-file maintenance: reset, export and import of the store file.
//!
//! Reset and import hold the connection lock from close to reopen, so no
//! other operation sees the store half replaced. If the reopen step fails the
//! slot stays empty and [`Database::reopen`] can recover it later.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::database::{close_slot, connect, Database};
use crate::migrations::{run_migrations, table_exists};
use crate::{Result, StorageError};

impl Database {
    /// Delete every entry by replacing the store with an empty one.
    pub fn reset(&self) -> Result<()> {
        let mut slot = self.conn.lock();
        close_slot(&mut slot)?;

        if let Some(path) = self.path() {
            if let Err(err) = remove_store_files(path) {
                tracing::error!(path = %path.display(), error = %err, "Failed to delete store file");
                *slot = connect(Some(path)).ok();
                return Err(err);
            }
        }

        *slot = Some(connect(self.path())?);

        tracing::info!("Vocabulary store reset");
        Ok(())
    }

    /// Copy the store file verbatim to `destination`.
    pub fn export_to<P: AsRef<Path>>(&self, destination: P) -> Result<PathBuf> {
        let source = self.path().ok_or(StorageError::NotFileBacked)?;
        let destination = destination.as_ref();

        // Held for the copy so no write lands halfway through.
        let slot = self.conn.lock();
        if let Some(conn) = slot.as_ref() {
            // Fold the WAL into the main file so the copy is complete.
            conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
        }

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::copy(source, destination)?;

        tracing::info!(
            source = %source.display(),
            destination = %destination.display(),
            "Exported vocabulary store"
        );

        Ok(destination.to_path_buf())
    }

    /// Replace the store file with the contents of `source`.
    ///
    /// The source is staged next to the store file and checked before the
    /// current store is touched. The swap itself is a rename.
    pub fn import_from<P: AsRef<Path>>(&self, source: P) -> Result<()> {
        let path = self.path().ok_or(StorageError::NotFileBacked)?;
        let source = source.as_ref();
        let staged = sibling(path, ".import");

        if let Err(err) = stage_import(source, &staged) {
            discard(&staged);
            return Err(err);
        }

        let mut slot = self.conn.lock();
        if let Err(err) = close_slot(&mut slot) {
            discard(&staged);
            return Err(err);
        }

        let swapped = remove_sidecars(path).and_then(|()| Ok(fs::rename(&staged, path)?));
        if let Err(err) = swapped {
            tracing::error!(path = %path.display(), error = %err, "Failed to swap in imported store");
            discard(&staged);
            *slot = connect(Some(path)).ok();
            return Err(err);
        }

        *slot = Some(connect(Some(path))?);

        tracing::info!(source = %source.display(), "Imported vocabulary store");
        Ok(())
    }
}

/// Copy `source` to `staged` and make sure it is a usable vocabulary store.
fn stage_import(source: &Path, staged: &Path) -> Result<()> {
    fs::copy(source, staged)?;

    let conn = Connection::open(staged)?;
    let readable: std::result::Result<i64, _> =
        conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| row.get(0));
    if let Err(err) = readable {
        return Err(StorageError::InvalidImport(err.to_string()));
    }

    let had_table = table_exists(&conn, "vocabulary")?;
    run_migrations(&conn)?;
    if !had_table {
        tracing::warn!(source = %source.display(), "Imported file had no vocabulary table");
    }

    conn.close().map_err(|(_, err)| StorageError::from(err))?;
    Ok(())
}

/// Sidecars go first so a failure leaves the main file in place.
fn remove_store_files(path: &Path) -> Result<()> {
    remove_sidecars(path)?;
    remove_if_exists(path)
}

/// Drop WAL and shared-memory files so they are never replayed onto a
/// different main file.
fn remove_sidecars(path: &Path) -> Result<()> {
    remove_if_exists(&sibling(path, "-wal"))?;
    remove_if_exists(&sibling(path, "-shm"))?;
    Ok(())
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn discard(path: &Path) {
    if let Err(err) = remove_if_exists(path) {
        tracing::warn!(path = %path.display(), error = %err, "Failed to remove staged import");
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
