use crate::services::user_repository::SqliteUserRepository;
use lazy_static::lazy_static;
use rusqlite::Connection;
use std::error::Error;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Runtime;

lazy_static! {
    // SQLite calls block; they never run on the actix executor threads.
    // A single connection serializes everything anyway, so the pool stays small.
    static ref DB_RUNTIME: Runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .max_blocking_threads(4)
        .thread_name("db-worker")
        .enable_all()
        .build()
        .expect("Failed to create database runtime");
}

/// Schema of the single storage table; created on open if absent
pub const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS user_model (
    id    INTEGER PRIMARY KEY,
    name  VARCHAR(80) NOT NULL UNIQUE,
    email VARCHAR(80) NOT NULL UNIQUE
);";

#[derive(Debug)]
pub enum DatabaseError {
    Sqlite(rusqlite::Error),
    Poisoned,
    Worker(String),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseError::Sqlite(err) => write!(f, "SQLite error: {}", err),
            DatabaseError::Poisoned => write!(f, "database connection lock poisoned"),
            DatabaseError::Worker(msg) => write!(f, "database worker failed: {}", msg),
        }
    }
}

impl Error for DatabaseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DatabaseError::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        DatabaseError::Sqlite(err)
    }
}

/// Handle to the SQLite database.
///
/// Wraps a single connection; the storage engine is not shared across
/// threads, so every access goes through the mutex on the `db-worker` pool.
/// Cloning is cheap and shares the same connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens (or creates) the database file and ensures the schema exists
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        log::info!("🔧 Opening SQLite database at {}", path.display());

        let conn = Connection::open(path)?;
        Self::bootstrap(conn)
    }

    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        log::debug!("🔧 Opening in-memory SQLite database");

        let conn = Connection::open_in_memory()?;
        Self::bootstrap(conn)
    }

    fn bootstrap(conn: Connection) -> Result<Self, DatabaseError> {
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch(SCHEMA_SQL)?;
        log::info!("✅ Database schema ready");

        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    /// Runs `f` against the user repository on the `db-worker` pool.
    ///
    /// The connection stays locked for the whole closure, so a
    /// check-then-write sequence inside `f` cannot interleave with another
    /// request from this process.
    pub async fn run<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&SqliteUserRepository<'_>) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<DatabaseError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        DB_RUNTIME
            .spawn_blocking(move || {
                let guard = conn.lock().map_err(|_| E::from(DatabaseError::Poisoned))?;
                let repo = SqliteUserRepository::new(&guard);
                f(&repo)
            })
            .await
            .map_err(|e| E::from(DatabaseError::Worker(e.to_string())))?
    }

    /// Closes the connection if this is the last handle.
    pub fn close(self) -> Result<(), DatabaseError> {
        match Arc::try_unwrap(self.conn) {
            Ok(mutex) => {
                let conn = mutex.into_inner().map_err(|_| DatabaseError::Poisoned)?;
                conn.close().map_err(|(_, err)| DatabaseError::Sqlite(err))?;
                log::info!("🔒 Database connection closed");
                Ok(())
            }
            Err(_) => {
                log::warn!("⚠️  Database still shared at shutdown; closing on last drop");
                Ok(())
            }
        }
    }
}
