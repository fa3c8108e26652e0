// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor directory queries. Soft-deleted actors are never returned.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use safelink_domain::{ActorFilter, ActorId, ActorProfile, Pagination, Role};
use tracing::debug;

use crate::data_models::ActorRow;
use crate::diesel_schema::actors;
use crate::error::PersistenceError;
use crate::queries::like_pattern;

type BoxedActors<'a> = actors::BoxedQuery<'a, Sqlite>;

fn live() -> BoxedActors<'static> {
    actors::table
        .filter(actors::deleted_at.is_null())
        .into_boxed()
}

fn filtered(filter: &ActorFilter) -> BoxedActors<'static> {
    let mut query: BoxedActors<'static> = live();

    if let Some(role) = filter.role {
        query = query.filter(actors::role.eq(role.as_str()));
    }
    if filter.exclude_admins {
        query = query.filter(actors::role.ne(Role::Admin.as_str()));
    }
    if let Some(is_verified) = filter.is_verified {
        query = query.filter(actors::is_verified.eq(i32::from(is_verified)));
    }
    if let Some(is_active) = filter.is_active {
        query = query.filter(actors::is_active.eq(i32::from(is_active)));
    }
    if let Some(text) = &filter.text {
        let pattern: String = like_pattern(text);
        query = query.filter(
            actors::email
                .like(pattern.clone())
                .escape('\\')
                .or(actors::full_name.like(pattern.clone()).escape('\\'))
                .or(actors::contact
                    .like(pattern.clone())
                    .escape('\\')
                    .assume_not_null())
                .or(actors::address
                    .like(pattern.clone())
                    .escape('\\')
                    .assume_not_null())
                .or(actors::department
                    .like(pattern.clone())
                    .escape('\\')
                    .assume_not_null())
                .or(actors::badge_number
                    .like(pattern.clone())
                    .escape('\\')
                    .assume_not_null())
                .or(actors::nic.like(pattern).escape('\\').assume_not_null()),
        );
    }

    query
}

fn into_profiles(rows: Vec<ActorRow>) -> Result<Vec<ActorProfile>, PersistenceError> {
    rows.into_iter().map(ActorRow::into_profile).collect()
}

/// Retrieves a live actor by identity.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the actor does not exist or was deleted.
pub fn get_actor(
    conn: &mut SqliteConnection,
    actor_id: ActorId,
) -> Result<Option<ActorProfile>, PersistenceError> {
    live()
        .filter(actors::actor_id.eq(actor_id.value()))
        .select(ActorRow::as_select())
        .first(conn)
        .optional()?
        .map(ActorRow::into_profile)
        .transpose()
}

/// Retrieves a live actor by normalized email.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no live actor uses this email.
pub fn get_actor_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<ActorProfile>, PersistenceError> {
    live()
        .filter(actors::email.eq(email.to_string()))
        .select(ActorRow::as_select())
        .first(conn)
        .optional()?
        .map(ActorRow::into_profile)
        .transpose()
}

/// Lists actors matching a filter, most recently updated first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `filter` - The directory criteria
/// * `pagination` - The requested page
///
/// # Returns
///
/// The page of actors and the total number of matching actors.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_actors(
    conn: &mut SqliteConnection,
    filter: &ActorFilter,
    pagination: &Pagination,
) -> Result<(Vec<ActorProfile>, i64), PersistenceError> {
    debug!(
        page = pagination.page(),
        limit = pagination.limit(),
        "Listing actors"
    );

    let total: i64 = filtered(filter).count().get_result(conn)?;
    let rows: Vec<ActorRow> = filtered(filter)
        .order((actors::updated_at.desc(), actors::actor_id.desc()))
        .limit(i64::from(pagination.limit()))
        .offset(pagination.offset())
        .select(ActorRow::as_select())
        .load(conn)?;

    Ok((into_profiles(rows)?, total))
}

/// Lists active officers for assignment pickers, sorted by name.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `text` - Optional substring over email, name, badge number and department
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_active_officers(
    conn: &mut SqliteConnection,
    text: Option<&str>,
) -> Result<Vec<ActorProfile>, PersistenceError> {
    let mut query: BoxedActors<'static> = live()
        .filter(actors::role.eq(Role::Officer.as_str()))
        .filter(actors::is_active.eq(1));

    if let Some(text) = text {
        let pattern: String = like_pattern(text);
        query = query.filter(
            actors::email
                .like(pattern.clone())
                .escape('\\')
                .or(actors::full_name.like(pattern.clone()).escape('\\'))
                .or(actors::badge_number
                    .like(pattern.clone())
                    .escape('\\')
                    .assume_not_null())
                .or(actors::department
                    .like(pattern)
                    .escape('\\')
                    .assume_not_null()),
        );
    }

    let rows: Vec<ActorRow> = query
        .order((actors::full_name.asc(), actors::actor_id.asc()))
        .select(ActorRow::as_select())
        .load(conn)?;
    into_profiles(rows)
}
