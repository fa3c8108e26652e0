// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staff dispatch listing and the officer picker.

use safelink_domain::{
    Actor, ActorProfile, CaseFilter, CaseRecord, CoordinateInput, GeoRadius, Geolocation,
    PageLimits, Pagination, StatusFilter, normalize_search_text, parse_since,
};
use safelink_persistence::SqlitePersistence;
use tracing::debug;

use crate::auth::AuthorizationService;
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    IncidentInfo, ListCasesQuery, ListCasesResponse, OfficerInfo, OfficersQuery,
    OfficersResponse, parse_int,
};

/// Lists cases for the dispatch view.
///
/// Without a `status` parameter only open, assigned and en-route cases are
/// shown. Results are newest first and carry the total match count.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The resolved caller
/// * `query` - Raw query parameters
///
/// # Errors
///
/// Returns an error if the caller is not staff, a radius search has
/// unreadable coordinates, or the query fails.
pub fn list_cases(
    persistence: &mut SqlitePersistence,
    actor: &Actor,
    query: &ListCasesQuery,
) -> Result<ListCasesResponse, ApiError> {
    AuthorizationService::authorize_staff(actor, "list_cases")?;

    let filter: CaseFilter = CaseFilter {
        reporter_id: None,
        statuses: StatusFilter::parse_dispatch(query.status.as_deref()),
        text: normalize_search_text(query.q.as_deref()),
        since: query.since.as_deref().and_then(parse_since),
        near: radius_filter(query)?,
    };
    let pagination: Pagination = Pagination::clamped(
        query.page.as_deref().and_then(parse_int),
        query.limit.as_deref().and_then(parse_int),
        PageLimits::DISPATCH,
    );

    let (cases, total): (Vec<CaseRecord>, i64) = persistence
        .list_cases(&filter, &pagination)
        .map_err(translate_persistence_error)?;

    debug!(
        actor_id = %actor.id,
        total,
        returned = cases.len(),
        "Listed dispatch cases"
    );
    Ok(ListCasesResponse {
        success: true,
        items: cases.iter().map(IncidentInfo::from).collect(),
        total,
        page: pagination.page(),
        limit: pagination.limit(),
    })
}

/// Lists active officers, sorted by name.
///
/// # Errors
///
/// Returns an error if the caller is not staff or the query fails.
pub fn list_officers(
    persistence: &mut SqlitePersistence,
    actor: &Actor,
    query: &OfficersQuery,
) -> Result<OfficersResponse, ApiError> {
    AuthorizationService::authorize_staff(actor, "list_officers")?;

    let text: Option<String> = normalize_search_text(query.q.as_deref());
    let officers: Vec<ActorProfile> = persistence
        .list_active_officers(text.as_deref())
        .map_err(translate_persistence_error)?;

    Ok(OfficersResponse {
        success: true,
        items: officers.into_iter().map(OfficerInfo::from).collect(),
    })
}

/// A radius search applies only when center and radius are all present.
fn radius_filter(query: &ListCasesQuery) -> Result<Option<GeoRadius>, ApiError> {
    let (Some(lat), Some(lng), Some(radius)) = (
        query.lat.as_deref(),
        query.lng.as_deref(),
        query.radius_meters.as_deref(),
    ) else {
        return Ok(None);
    };

    let center: Geolocation =
        Geolocation::parse(Some(&CoordinateInput::from(lat)), Some(&CoordinateInput::from(lng)))
            .map_err(translate_domain_error)?;
    let radius_meters: f64 = radius
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|meters| meters.is_finite() && *meters >= 0.0)
        .ok_or_else(|| ApiError::InvalidInput {
            field: String::from("radiusMeters"),
            message: format!("'{radius}' is not a non-negative distance"),
        })?;

    Ok(Some(GeoRadius {
        center,
        radius_meters,
    }))
}
