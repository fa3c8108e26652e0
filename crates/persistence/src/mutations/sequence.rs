// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-key monotonically increasing counters.
//!
//! The increment is a single upsert statement, so two connections can
//! never be handed the same value for one key.

use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::debug;

use crate::data_models::format_timestamp;
use crate::diesel_schema::sequence_counters;
use crate::error::PersistenceError;

/// Atomically increments the counter for `key` and returns the new value.
///
/// A key seen for the first time starts at 1.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `key` - The counter key, such as `incident:2024`
/// * `now` - Recorded as the counter's last update time
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn next_sequence(
    conn: &mut SqliteConnection,
    key: &str,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let stamp: String = format_timestamp(now)?;

    let value: i64 = diesel::insert_into(sequence_counters::table)
        .values((
            sequence_counters::counter_key.eq(key),
            sequence_counters::seq.eq(1_i64),
            sequence_counters::updated_at.eq(&stamp),
        ))
        .on_conflict(sequence_counters::counter_key)
        .do_update()
        .set((
            sequence_counters::seq.eq(sequence_counters::seq + 1_i64),
            sequence_counters::updated_at.eq(&stamp),
        ))
        .returning(sequence_counters::seq)
        .get_result(conn)?;

    debug!(key, value, "Allocated sequence value");
    Ok(value)
}

/// Reads the current value of a counter without changing it.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the key has never been incremented.
pub fn current_sequence(
    conn: &mut SqliteConnection,
    key: &str,
) -> Result<Option<i64>, PersistenceError> {
    sequence_counters::table
        .find(key)
        .select(sequence_counters::seq)
        .first(conn)
        .optional()
        .map_err(Into::into)
}
