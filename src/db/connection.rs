use rusqlite::Connection;
use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::ServerError;

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

// Per-thread connection slots, keyed by database path.
thread_local! {
    static DB_CONNS: RefCell<HashMap<PathBuf, Connection>> = RefCell::new(HashMap::new());
}

/// Cheap, cloneable handle to the SQLite record store.
///
/// Each worker thread lazily opens its own connection on first use.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open or fetch this thread's connection and run `f(conn)`.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&mut Connection) -> Result<T, ServerError>,
    {
        DB_CONNS
            .try_with(|cell| {
                let mut slots = cell.borrow_mut();
                let conn = match slots.entry(self.path.clone()) {
                    Entry::Occupied(slot) => slot.into_mut(),
                    Entry::Vacant(slot) => slot.insert(open(&self.path)?),
                };
                f(conn)
            })
            .map_err(|_| ServerError::StoreUnavailable("connection slot unavailable".into()))?
    }
}

fn open(path: &Path) -> Result<Connection, ServerError> {
    let conn = Connection::open(path).map_err(|e| {
        ServerError::StoreUnavailable(format!("open {} failed: {e}", path.display()))
    })?;
    conn.busy_timeout(Duration::from_secs(2))?;
    Ok(conn)
}

/// Apply `sql/schema.sql`. Idempotent.
pub fn init_db(db: &Database) -> Result<(), ServerError> {
    db.with_conn(|conn| {
        conn.execute_batch(SCHEMA_SQL).map_err(|e| {
            ServerError::StoreUnavailable(format!("failed to apply schema: {e}"))
        })?;
        Ok(())
    })?;

    tracing::info!(path = %db.path().display(), "database schema ready");
    Ok(())
}
