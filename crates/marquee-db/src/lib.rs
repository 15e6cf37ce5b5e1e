pub mod catalog;
pub mod error;
pub mod lifecycle;
pub mod migrations;
pub mod models;
pub mod notifications;
pub mod users;
pub mod wishlist;

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::{debug, info, warn};

pub use error::{DbError, Result};

/// Transaction visibility level requested by a caller.
///
/// SQLite has a single serializable isolation model, so a level is realised
/// through the moment the write lock is taken. `RepeatableRead` and stronger
/// take it at `BEGIN`, which pins the snapshot every statement of the
/// transaction reads from and serializes concurrent writers on the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsolationLevel {
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    pub fn as_sql(self) -> &'static str {
        match self {
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::Serializable => "SERIALIZABLE",
        }
    }

    fn behavior(self) -> TransactionBehavior {
        match self {
            IsolationLevel::ReadCommitted => TransactionBehavior::Deferred,
            IsolationLevel::RepeatableRead => TransactionBehavior::Immediate,
            IsolationLevel::Serializable => TransactionBehavior::Exclusive,
        }
    }
}

/// Handle to the on-disk database. Holds no open connection: every
/// operation acquires its own and drops it when done.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
    busy_timeout: Duration,
}

impl Database {
    pub fn open(path: &Path, busy_timeout: Duration) -> Result<Self> {
        let db = Self {
            path: path.to_path_buf(),
            busy_timeout,
        };

        let conn = db.connect()?;
        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;
        migrations::run(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a fresh connection. Lock waits beyond the busy timeout surface as
    /// [`DbError::LockTimeout`].
    pub fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(self.busy_timeout)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(conn)
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.connect()?;
        f(&conn)
    }

    /// Run `f` inside one transaction at `level`.
    ///
    /// Commits when `f` returns `Ok`, rolls back when it returns `Err`. A
    /// panic inside `f` drops the transaction guard, which also rolls back.
    /// The connection is released on every path.
    pub fn transaction<F, T>(&self, level: IsolationLevel, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(level.behavior())?;
        debug!(isolation = level.as_sql(), "transaction started");

        match f(&tx) {
            Ok(value) => {
                tx.commit()?;
                debug!("transaction committed");
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!("Rollback failed after {}: {}", e, rollback_err);
                } else {
                    debug!("transaction rolled back: {}", e);
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::time::Duration;

    use chrono::NaiveDate;
    use marquee_types::api::Session;
    use marquee_types::models::{Event, Location};
    use tempfile::TempDir;

    use crate::Database;

    /// A database in a temp dir; the dir lives as long as the fixture.
    pub struct Fixture {
        pub db: Database,
        _dir: TempDir,
    }

    pub fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("test.db"), Duration::from_secs(5)).unwrap();
        Fixture { db, _dir: dir }
    }

    pub fn session(username: &str) -> Session {
        Session {
            username: username.to_string(),
            is_admin: false,
        }
    }

    pub fn add_user(db: &Database, username: &str) {
        db.create_user(username, username, "hash", false).unwrap();
    }

    pub fn add_location(db: &Database, name: &str, city: &str, state: &str) {
        db.create_location(&Location {
            location_name: name.to_string(),
            city: city.to_string(),
            state: state.to_string(),
        })
        .unwrap();
    }

    pub fn add_event(db: &Database, title: &str, location: &str) {
        db.create_event(&Event {
            event_title: title.to_string(),
            event_url: format!("https://tickets.example/{}", title.replace(' ', "-")),
            datetime_local: NaiveDate::from_ymd_opt(2025, 6, 14)
                .unwrap()
                .and_hms_opt(20, 0, 0)
                .unwrap(),
            location_name: location.to_string(),
            promoter_name: "Live Nation".to_string(),
        })
        .unwrap();
    }

    pub fn count(db: &Database, sql: &str) -> i64 {
        db.with_conn(|conn| Ok(conn.query_row(sql, [], |row| row.get(0))?))
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture;

    #[test]
    fn isolation_level_names() {
        assert_eq!(IsolationLevel::RepeatableRead.as_sql(), "REPEATABLE READ");
        assert_eq!(IsolationLevel::ReadCommitted.as_sql(), "READ COMMITTED");
    }

    #[test]
    fn transaction_commits_on_ok() {
        let fx = fixture();
        fx.db
            .transaction(IsolationLevel::RepeatableRead, |tx| {
                tx.execute(
                    "INSERT INTO locations (location_name, city, state) VALUES ('Arena', 'Austin', 'TX')",
                    [],
                )?;
                Ok(())
            })
            .unwrap();

        assert_eq!(crate::testing::count(&fx.db, "SELECT COUNT(*) FROM locations"), 1);
    }

    #[test]
    fn transaction_rolls_back_on_err() {
        let fx = fixture();
        let result: Result<()> = fx.db.transaction(IsolationLevel::RepeatableRead, |tx| {
            tx.execute(
                "INSERT INTO locations (location_name, city, state) VALUES ('Arena', 'Austin', 'TX')",
                [],
            )?;
            Err(DbError::Fatal("boom".into()))
        });

        assert!(result.is_err());
        assert_eq!(crate::testing::count(&fx.db, "SELECT COUNT(*) FROM locations"), 0);
    }

    #[test]
    fn held_write_lock_surfaces_lock_timeout() {
        let fx = fixture();
        let db = Database::open(fx.db.path(), Duration::from_millis(50)).unwrap();

        let mut holder = fx.db.connect().unwrap();
        let _guard = holder
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .unwrap();

        let err = db
            .transaction(IsolationLevel::RepeatableRead, |_| Ok(()))
            .unwrap_err();
        assert!(matches!(err, DbError::LockTimeout(_)), "got {err:?}");
        assert!(err.is_retryable());
    }
}
