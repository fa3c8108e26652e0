// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Case writes.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use safelink::CaseChanges;
use safelink_domain::{CaseId, CaseRecord, NewCase};
use tracing::{debug, info};

use crate::data_models::{IncidentChangeset, IncidentRow, NewIncidentRow, image_count};
use crate::diesel_schema::incidents;
use crate::error::PersistenceError;

/// Inserts a new case and returns it with its internal identity.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `case` - The content built from the reporter's draft
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateIdentifier` if the human identifier
/// is already taken, `PersistenceError::MissingReference` if the reporter
/// does not exist, or another error if the write fails.
pub fn insert_case(
    conn: &mut SqliteConnection,
    case: &NewCase,
) -> Result<CaseRecord, PersistenceError> {
    let row: NewIncidentRow = NewIncidentRow::from_case(case)?;

    let inserted: IncidentRow = diesel::insert_into(incidents::table)
        .values(&row)
        .returning(IncidentRow::as_returning())
        .get_result(conn)
        .map_err(|e| match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                PersistenceError::DuplicateIdentifier(row.human_id.clone())
            }
            other => PersistenceError::from(other),
        })?;

    info!(
        case_id = inserted.incident_id,
        human_id = %inserted.human_id,
        "Inserted case"
    );
    inserted.into_record()
}

/// Writes the changed columns of a case and returns the stored result.
///
/// Only columns present in `changes` are written. Appended images are
/// merged with the list stored at write time, inside the same immediate
/// transaction, so concurrent appends are never lost.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `case_id` - The case to update
/// * `changes` - Field-level changes produced by a transition
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the case does not exist, or
/// another error if the write fails.
pub fn update_case(
    conn: &mut SqliteConnection,
    case_id: CaseId,
    changes: &CaseChanges,
) -> Result<CaseRecord, PersistenceError> {
    conn.immediate_transaction(|conn| {
        if !changes.is_empty() {
            let mut changeset: IncidentChangeset = IncidentChangeset::from_changes(changes)?;

            if !changes.appended_images.is_empty() {
                let stored: String = incidents::table
                    .find(case_id.value())
                    .select(incidents::images_json)
                    .first(conn)
                    .optional()?
                    .ok_or_else(|| not_found(case_id))?;
                let mut images: Vec<String> = serde_json::from_str(&stored)
                    .map_err(|e| PersistenceError::CorruptRecord(format!("images_json: {e}")))?;
                images.extend(changes.appended_images.iter().cloned());
                changeset.images_count = Some(image_count(images.len())?);
                changeset.images_json = Some(serde_json::to_string(&images)?);
            }

            let rows: usize = diesel::update(incidents::table.find(case_id.value()))
                .set(&changeset)
                .execute(conn)?;
            if rows == 0 {
                return Err(not_found(case_id));
            }
            debug!(case_id = case_id.value(), "Updated case");
        }

        incidents::table
            .find(case_id.value())
            .select(IncidentRow::as_select())
            .first(conn)
            .optional()?
            .ok_or_else(|| not_found(case_id))?
            .into_record()
    })
}

/// Deletes a case.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the case does not exist.
pub fn delete_case(conn: &mut SqliteConnection, case_id: CaseId) -> Result<(), PersistenceError> {
    let rows: usize = diesel::delete(incidents::table.find(case_id.value())).execute(conn)?;
    if rows == 0 {
        return Err(not_found(case_id));
    }
    info!(case_id = case_id.value(), "Deleted case");
    Ok(())
}

fn not_found(case_id: CaseId) -> PersistenceError {
    PersistenceError::NotFound(format!("Case {case_id}"))
}
