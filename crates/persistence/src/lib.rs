// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for SafeLink.
//!
//! This crate stores cases, the actor directory and the per-year sequence
//! counters in `SQLite` through Diesel. Migrations are embedded and run when
//! a database is opened.
//!
//! ## Storage Rules
//!
//! - Timestamps are fixed-width UTC text, so ordering by the column orders
//!   by time.
//! - Case updates write only the columns that changed.
//! - Sequence values are allocated by a single upsert statement.
//! - Actors are soft-deleted; cases are deleted outright.
//!
//! ## Testing Philosophy
//!
//! - Tests run against unique shared-cache in-memory databases
//! - Concurrency tests use a temporary file database with WAL enabled
//! - No external infrastructure is required

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use safelink::CaseChanges;
use safelink_domain::{
    ActorDraft, ActorFilter, ActorId, ActorProfile, CaseFilter, CaseId, CaseRecord, HumanId,
    NewCase, Pagination,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// How long a file-database statement waits on a lock before failing.
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

use backend::PersistenceBackend;

/// Type alias for backward compatibility.
/// All new code should use `Persistence` directly.
pub type SqlitePersistence = Persistence;

/// Persistence adapter for cases, actors and sequence counters.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared-cache database, so tests are
    /// isolated from each other.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String =
            format!("file:memdb_safelink_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database,
    /// running any pending migrations.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path_to_str(path.as_ref())?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        conn.set_busy_timeout(DEFAULT_BUSY_TIMEOUT_MS)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Opens an additional connection to a file database that has already
    /// been initialized. Migrations are not run.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open_existing<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path_to_str(path.as_ref())?;

        let mut conn: SqliteConnection = backend::sqlite::connect(path_str)?;
        conn.set_busy_timeout(DEFAULT_BUSY_TIMEOUT_MS)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    // ========================================================================
    // Sequence Counters
    // ========================================================================

    /// Atomically increments a counter and returns the new value.
    ///
    /// # Arguments
    ///
    /// * `key` - The counter key
    /// * `now` - The time of allocation
    ///
    /// # Errors
    ///
    /// Returns an error if the counter cannot be incremented.
    pub fn next_sequence(
        &mut self,
        key: &str,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::sequence::next_sequence(&mut self.conn, key, now)
    }

    /// Reads a counter without incrementing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn current_sequence(&mut self, key: &str) -> Result<Option<i64>, PersistenceError> {
        mutations::sequence::current_sequence(&mut self.conn, key)
    }

    // ========================================================================
    // Cases
    // ========================================================================

    /// Inserts a new case.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DuplicateIdentifier` if the human
    /// identifier is taken, or another error if the write fails.
    pub fn insert_case(&mut self, case: &NewCase) -> Result<CaseRecord, PersistenceError> {
        mutations::cases::insert_case(&mut self.conn, case)
    }

    /// Writes the changed columns of a case and returns the stored result.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the case does not exist.
    pub fn update_case(
        &mut self,
        case_id: CaseId,
        changes: &CaseChanges,
    ) -> Result<CaseRecord, PersistenceError> {
        mutations::cases::update_case(&mut self.conn, case_id, changes)
    }

    /// Permanently deletes a case.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the case does not exist.
    pub fn delete_case(&mut self, case_id: CaseId) -> Result<(), PersistenceError> {
        mutations::cases::delete_case(&mut self.conn, case_id)
    }

    /// Retrieves a case by human identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_case_by_human_id(
        &mut self,
        human_id: &HumanId,
    ) -> Result<Option<CaseRecord>, PersistenceError> {
        queries::cases::get_case_by_human_id(&mut self.conn, human_id)
    }

    /// Retrieves a case by internal identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_case_by_id(
        &mut self,
        case_id: CaseId,
    ) -> Result<Option<CaseRecord>, PersistenceError> {
        queries::cases::get_case_by_id(&mut self.conn, case_id)
    }

    /// Lists one page of cases matching a filter, with the total match count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_cases(
        &mut self,
        filter: &CaseFilter,
        pagination: &Pagination,
    ) -> Result<(Vec<CaseRecord>, i64), PersistenceError> {
        queries::cases::list_cases(&mut self.conn, filter, pagination)
    }

    /// Lists every case filed by a reporter, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_cases_for_reporter(
        &mut self,
        reporter_id: ActorId,
    ) -> Result<Vec<CaseRecord>, PersistenceError> {
        queries::cases::list_cases_for_reporter(&mut self.conn, reporter_id)
    }

    /// Retrieves a reporter's most recent non-terminal case.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn latest_active_case_for_reporter(
        &mut self,
        reporter_id: ActorId,
    ) -> Result<Option<CaseRecord>, PersistenceError> {
        queries::cases::latest_active_case_for_reporter(&mut self.conn, reporter_id)
    }

    // ========================================================================
    // Actors
    // ========================================================================

    /// Creates an actor from a normalized draft.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DuplicateEmail` if the email is taken.
    pub fn create_actor(
        &mut self,
        draft: &ActorDraft,
        now: OffsetDateTime,
    ) -> Result<ActorProfile, PersistenceError> {
        mutations::actors::create_actor(&mut self.conn, draft, now)
    }

    /// Rewrites a live actor from a modified profile.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the actor does not exist, or
    /// `PersistenceError::DuplicateEmail` if the new email is taken.
    pub fn update_actor(
        &mut self,
        profile: &ActorProfile,
    ) -> Result<ActorProfile, PersistenceError> {
        mutations::actors::update_actor(&mut self.conn, profile)
    }

    /// Soft-deletes a live actor.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the actor does not exist or
    /// was already deleted.
    pub fn soft_delete_actor(
        &mut self,
        actor_id: ActorId,
        now: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        mutations::actors::soft_delete_actor(&mut self.conn, actor_id, now)
    }

    /// Retrieves a live actor by identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_actor(
        &mut self,
        actor_id: ActorId,
    ) -> Result<Option<ActorProfile>, PersistenceError> {
        queries::actors::get_actor(&mut self.conn, actor_id)
    }

    /// Retrieves a live actor by normalized email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_actor_by_email(
        &mut self,
        email: &str,
    ) -> Result<Option<ActorProfile>, PersistenceError> {
        queries::actors::get_actor_by_email(&mut self.conn, email)
    }

    /// Lists one page of actors matching a filter, with the total match count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_actors(
        &mut self,
        filter: &ActorFilter,
        pagination: &Pagination,
    ) -> Result<(Vec<ActorProfile>, i64), PersistenceError> {
        queries::actors::list_actors(&mut self.conn, filter, pagination)
    }

    /// Lists active officers sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_active_officers(
        &mut self,
        text: Option<&str>,
    ) -> Result<Vec<ActorProfile>, PersistenceError> {
        queries::actors::list_active_officers(&mut self.conn, text)
    }
}

fn path_to_str(path: &Path) -> Result<&str, PersistenceError> {
    path.to_str()
        .ok_or_else(|| PersistenceError::InitializationError("Invalid database path".to_string()))
}
