// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor directory writes.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use safelink_domain::{ActorDraft, ActorId, ActorProfile};
use time::OffsetDateTime;
use tracing::info;

use crate::data_models::{ActorChangeset, ActorRow, NewActorRow, format_timestamp};
use crate::diesel_schema::actors;
use crate::error::PersistenceError;

fn map_write_error(email: &str) -> impl FnOnce(DieselError) -> PersistenceError + '_ {
    move |e| match e {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            PersistenceError::DuplicateEmail(email.to_string())
        }
        other => PersistenceError::from(other),
    }
}

/// Creates an actor from a normalized draft.
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateEmail` if a live actor already uses
/// the email, or another error if the write fails.
pub fn create_actor(
    conn: &mut SqliteConnection,
    draft: &ActorDraft,
    now: OffsetDateTime,
) -> Result<ActorProfile, PersistenceError> {
    let row: NewActorRow = NewActorRow::from_draft(draft, now)?;

    let inserted: ActorRow = diesel::insert_into(actors::table)
        .values(&row)
        .returning(ActorRow::as_returning())
        .get_result(conn)
        .map_err(map_write_error(&draft.email))?;

    info!(actor_id = inserted.actor_id, role = %inserted.role, "Created actor");
    inserted.into_profile()
}

/// Rewrites a live actor's mutable columns from a modified profile.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the actor does not exist or was
/// deleted, `PersistenceError::DuplicateEmail` if the new email is taken,
/// or another error if the write fails.
pub fn update_actor(
    conn: &mut SqliteConnection,
    profile: &ActorProfile,
) -> Result<ActorProfile, PersistenceError> {
    let changeset: ActorChangeset = ActorChangeset::from_profile(profile)?;

    let updated: Option<ActorRow> = diesel::update(
        actors::table
            .filter(actors::actor_id.eq(profile.id.value()))
            .filter(actors::deleted_at.is_null()),
    )
    .set(&changeset)
    .returning(ActorRow::as_returning())
    .get_result(conn)
    .optional()
    .map_err(map_write_error(&profile.email))?;

    updated
        .ok_or_else(|| not_found(profile.id))?
        .into_profile()
}

/// Marks a live actor as deleted. The row is kept so references from
/// existing cases remain valid.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the actor does not exist or was
/// already deleted.
pub fn soft_delete_actor(
    conn: &mut SqliteConnection,
    actor_id: ActorId,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let stamp: String = format_timestamp(now)?;

    let rows: usize = diesel::update(
        actors::table
            .filter(actors::actor_id.eq(actor_id.value()))
            .filter(actors::deleted_at.is_null()),
    )
    .set((
        actors::deleted_at.eq(Some(stamp.clone())),
        actors::is_active.eq(0),
        actors::updated_at.eq(&stamp),
    ))
    .execute(conn)?;

    if rows == 0 {
        return Err(not_found(actor_id));
    }
    info!(actor_id = actor_id.value(), "Soft-deleted actor");
    Ok(())
}

fn not_found(actor_id: ActorId) -> PersistenceError {
    PersistenceError::NotFound(format!("Actor {actor_id}"))
}
