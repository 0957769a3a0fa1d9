//! Database connection and operations

use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::migrations::run_migrations;
use crate::{Result, StorageError};

/// Handle to the vocabulary store.
///
/// The connection slot is empty only after [`Database::close`] or after a
/// reset/import whose reopen step failed. Every operation then fails with
/// [`StorageError::Closed`] until [`Database::reopen`] succeeds.
pub struct Database {
    path: Option<PathBuf>,
    pub(crate) conn: Arc<Mutex<Option<Connection>>>,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = connect(Some(&path))?;

        tracing::info!(path = %path.display(), "Opened vocabulary store");

        Ok(Self {
            path: Some(path),
            conn: Arc::new(Mutex::new(Some(conn))),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = connect(None)?;

        Ok(Self {
            path: None,
            conn: Arc::new(Mutex::new(Some(conn))),
        })
    }

    /// Location of the store file, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.conn.lock().is_some()
    }

    pub fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock();
        match conn.as_ref() {
            Some(conn) => f(conn),
            None => Err(StorageError::Closed),
        }
    }

    pub fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let mut slot = self.conn.lock();
        let conn = slot.as_mut().ok_or(StorageError::Closed)?;
        let tx = conn.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }

    /// Close the connection. Later operations fail until [`Database::reopen`].
    pub fn close(&self) -> Result<()> {
        let mut slot = self.conn.lock();
        close_slot(&mut slot)?;
        tracing::info!("Closed vocabulary store");
        Ok(())
    }

    /// Open the store again if the connection slot is empty.
    pub fn reopen(&self) -> Result<()> {
        let mut slot = self.conn.lock();
        if slot.is_none() {
            *slot = Some(connect(self.path.as_deref())?);
            tracing::info!("Reopened vocabulary store");
        }
        Ok(())
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            conn: Arc::clone(&self.conn),
        }
    }
}

/// Open a connection and make sure the schema exists.
pub(crate) fn connect(path: Option<&Path>) -> Result<Connection> {
    let conn = match path {
        Some(path) => {
            let conn = Connection::open(path)?;

            // WAL mode for better concurrent performance
            let _: String =
                conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
            conn
        }
        None => Connection::open_in_memory()?,
    };

    run_migrations(&conn)?;
    Ok(conn)
}

/// Close whatever connection sits in the slot. On failure the connection is
/// put back so the store stays usable.
pub(crate) fn close_slot(slot: &mut Option<Connection>) -> Result<()> {
    if let Some(conn) = slot.take() {
        if let Err((conn, err)) = conn.close() {
            *slot = Some(conn);
            return Err(err.into());
        }
    }
    Ok(())
}
