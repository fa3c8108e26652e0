// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! This module isolates connection setup, migrations and the few helpers
//! that cannot be expressed in Diesel DSL. All domain queries and
//! mutations live in `queries/` and `mutations/`.

pub mod sqlite;

use diesel::{Connection, SqliteConnection};

use crate::error::PersistenceError;

/// Trait for backend-specific operations.
///
/// Query and mutation modules call these through the connection so that
/// they never issue raw `PRAGMA` statements themselves.
pub trait PersistenceBackend: Connection {
    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError>;

    /// Sets how long a statement waits on a locked database before failing.
    ///
    /// # Errors
    ///
    /// Returns an error if the setting cannot be applied.
    fn set_busy_timeout(&mut self, millis: u32) -> Result<(), PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(self)
    }

    fn set_busy_timeout(&mut self, millis: u32) -> Result<(), PersistenceError> {
        sqlite::set_busy_timeout(self, millis)
    }
}
