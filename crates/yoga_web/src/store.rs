//! Process-wide registration store handle.
//!
//! # Responsibility
//! - Own the single SQLite connection for the server's lifetime.
//! - Serialize each request's lookup-then-insert behind one lock.
//!
//! # Invariants
//! - The connection is opened before the router exists and closed only
//!   through [`Store::close`].

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use yoga_core::db::{close_db, open_db, open_db_in_memory, DbResult};
use yoga_core::{
    NewParticipant, Participant, RegistrationError, RegistrationOutcome, RegistrationService,
    RepoResult, SqliteParticipantRepository,
};

pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Opens (creating and migrating if needed) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        open_db(path).map(Self::from_connection)
    }

    /// Opens a fresh in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        open_db_in_memory().map(Self::from_connection)
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Runs the registration decision for `submission` as of today.
    pub fn register(
        &self,
        submission: &NewParticipant,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        self.with_service(|service| service.register_today(submission))
    }

    /// Every stored registration for `name`, most recent first.
    pub fn history(&self, name: &str) -> RepoResult<Vec<Participant>> {
        self.with_service(|service| service.history(name))
    }

    /// Closes the underlying connection.
    pub fn close(self) -> DbResult<()> {
        let conn = self
            .conn
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        close_db(conn)
    }

    fn with_service<T>(
        &self,
        run: impl FnOnce(&RegistrationService<SqliteParticipantRepository<'_>>) -> T,
    ) -> T {
        // A panic mid-request leaves no partial SQLite state behind the lock.
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let service = RegistrationService::new(SqliteParticipantRepository::new(&conn));
        run(&service)
    }
}
