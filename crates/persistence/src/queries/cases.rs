// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Case queries.
//!
//! Listings are sorted newest first by creation time, ties broken by
//! newest internal identity.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use safelink_domain::{
    ActorId, BoundingBox, CaseFilter, CaseId, CaseRecord, CaseStatus, HumanId, Pagination,
    StatusFilter,
};
use tracing::debug;

use crate::data_models::{IncidentRow, format_timestamp};
use crate::diesel_schema::incidents;
use crate::error::PersistenceError;
use crate::queries::like_pattern;

type BoxedIncidents<'a> = incidents::BoxedQuery<'a, Sqlite>;

/// Builds the filtered, unsorted, unpaged query for a case filter.
///
/// The geo filter is reduced to its bounding box here; callers apply the
/// exact distance in process.
fn filtered(filter: &CaseFilter) -> Result<BoxedIncidents<'static>, PersistenceError> {
    let mut query: BoxedIncidents<'static> = incidents::table.into_boxed();

    if let Some(reporter_id) = filter.reporter_id {
        query = query.filter(incidents::reporter_id.eq(reporter_id.value()));
    }

    if let StatusFilter::OneOf(statuses) = &filter.statuses {
        let names: Vec<&'static str> = statuses.iter().map(CaseStatus::as_str).collect();
        query = query.filter(incidents::status.eq_any(names));
    }

    if let Some(text) = &filter.text {
        let pattern: String = like_pattern(text);
        query = query.filter(
            incidents::human_id
                .like(pattern.clone())
                .escape('\\')
                .or(incidents::incident_type.like(pattern.clone()).escape('\\'))
                .or(incidents::priority.like(pattern.clone()).escape('\\'))
                .or(incidents::description
                    .like(pattern.clone())
                    .escape('\\')
                    .assume_not_null())
                .or(incidents::location_text
                    .like(pattern)
                    .escape('\\')
                    .assume_not_null()),
        );
    }

    if let Some(since) = filter.since {
        query = query.filter(incidents::created_at.ge(format_timestamp(since)?));
    }

    if let Some(near) = filter.near {
        let bounds: BoundingBox = near.center.bounding_box(near.radius_meters);
        query = query
            .filter(
                incidents::longitude.between(bounds.min_longitude, bounds.max_longitude),
            )
            .filter(incidents::latitude.between(bounds.min_latitude, bounds.max_latitude));
    }

    Ok(query)
}

fn into_records(rows: Vec<IncidentRow>) -> Result<Vec<CaseRecord>, PersistenceError> {
    rows.into_iter().map(IncidentRow::into_record).collect()
}

/// Lists cases matching a filter, one page at a time.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `filter` - The listing criteria
/// * `pagination` - The requested page
///
/// # Returns
///
/// The page of cases and the total number of matching cases.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_cases(
    conn: &mut SqliteConnection,
    filter: &CaseFilter,
    pagination: &Pagination,
) -> Result<(Vec<CaseRecord>, i64), PersistenceError> {
    debug!(
        page = pagination.page(),
        limit = pagination.limit(),
        "Listing cases"
    );

    if let Some(near) = filter.near {
        // The exact radius can only be applied after loading, so the page is
        // cut in process.
        let rows: Vec<IncidentRow> = filtered(filter)?
            .order((incidents::created_at.desc(), incidents::incident_id.desc()))
            .select(IncidentRow::as_select())
            .load(conn)?;
        let matching: Vec<CaseRecord> = into_records(rows)?
            .into_iter()
            .filter(|case| near.contains(&case.location))
            .collect();
        let total: i64 = i64::try_from(matching.len()).unwrap_or(i64::MAX);
        let offset: usize = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
        let limit: usize = usize::try_from(pagination.limit()).unwrap_or(usize::MAX);
        let page: Vec<CaseRecord> = matching.into_iter().skip(offset).take(limit).collect();
        return Ok((page, total));
    }

    let total: i64 = filtered(filter)?.count().get_result(conn)?;
    let rows: Vec<IncidentRow> = filtered(filter)?
        .order((incidents::created_at.desc(), incidents::incident_id.desc()))
        .limit(i64::from(pagination.limit()))
        .offset(pagination.offset())
        .select(IncidentRow::as_select())
        .load(conn)?;

    Ok((into_records(rows)?, total))
}

/// Retrieves a case by its human-readable identifier.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no case has this identifier.
pub fn get_case_by_human_id(
    conn: &mut SqliteConnection,
    human_id: &HumanId,
) -> Result<Option<CaseRecord>, PersistenceError> {
    debug!(human_id = %human_id, "Looking up case by human id");

    incidents::table
        .filter(incidents::human_id.eq(human_id.to_string()))
        .select(IncidentRow::as_select())
        .first(conn)
        .optional()?
        .map(IncidentRow::into_record)
        .transpose()
}

/// Retrieves a case by its internal identity.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the case does not exist.
pub fn get_case_by_id(
    conn: &mut SqliteConnection,
    case_id: CaseId,
) -> Result<Option<CaseRecord>, PersistenceError> {
    debug!(case_id = case_id.value(), "Looking up case by id");

    incidents::table
        .find(case_id.value())
        .select(IncidentRow::as_select())
        .first(conn)
        .optional()?
        .map(IncidentRow::into_record)
        .transpose()
}

/// Lists every case filed by a reporter, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_cases_for_reporter(
    conn: &mut SqliteConnection,
    reporter_id: ActorId,
) -> Result<Vec<CaseRecord>, PersistenceError> {
    let rows: Vec<IncidentRow> = incidents::table
        .filter(incidents::reporter_id.eq(reporter_id.value()))
        .order((incidents::created_at.desc(), incidents::incident_id.desc()))
        .select(IncidentRow::as_select())
        .load(conn)?;
    into_records(rows)
}

/// Retrieves the reporter's most recently created non-terminal case.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the reporter has no active case.
pub fn latest_active_case_for_reporter(
    conn: &mut SqliteConnection,
    reporter_id: ActorId,
) -> Result<Option<CaseRecord>, PersistenceError> {
    let active: Vec<&'static str> = CaseStatus::ACTIVE.iter().map(CaseStatus::as_str).collect();

    incidents::table
        .filter(incidents::reporter_id.eq(reporter_id.value()))
        .filter(incidents::status.eq_any(active))
        .order((incidents::created_at.desc(), incidents::incident_id.desc()))
        .select(IncidentRow::as_select())
        .first(conn)
        .optional()?
        .map(IncidentRow::into_record)
        .transpose()
}
