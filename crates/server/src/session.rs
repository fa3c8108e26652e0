// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller resolution at the server boundary.
//!
//! Credentials are verified upstream. The authenticating proxy forwards the
//! resolved actor id in the `X-Actor-Id` header and these extractors turn
//! it back into a live directory entry.

use axum::{extract::FromRequestParts, http::request::Parts};
use safelink_api::{ApiError, AuthenticationService, AuthorizationService};
use safelink_domain::{ActorId, ActorProfile};
use tracing::{debug, warn};

use crate::AppState;
use crate::error::HttpError;

/// Header carrying the authenticated actor id.
pub const ACTOR_HEADER: &str = "X-Actor-Id";

/// Extractor for the resolved caller.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     CurrentActor(profile): CurrentActor,
/// ) -> Result<Json<Response>, HttpError> {
///     let actor: Actor = profile.actor();
///     Ok(Json(Response { ... }))
/// }
/// ```
///
/// # Errors
///
/// Rejects with 401 if the header is missing or malformed, or the actor is
/// unknown, deleted or inactive.
pub struct CurrentActor(pub ActorProfile);

impl FromRequestParts<AppState> for CurrentActor {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw: &str = parts
            .headers
            .get(ACTOR_HEADER)
            .ok_or_else(|| {
                debug!("Missing actor header");
                HttpError::unauthenticated("Missing X-Actor-Id header")
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid actor header encoding");
                HttpError::unauthenticated("Invalid X-Actor-Id header")
            })?;

        let actor_id: ActorId = raw.trim().parse::<i64>().map(ActorId::new).map_err(|_| {
            warn!(header = %raw, "Actor header is not an id");
            HttpError::unauthenticated("Invalid X-Actor-Id header")
        })?;

        let mut persistence = state.persistence.lock().await;
        let profile: ActorProfile = AuthenticationService::resolve_actor(&mut persistence, actor_id)
            .map_err(ApiError::from)?;
        drop(persistence);

        debug!(actor_id = %profile.id, role = %profile.role, "Caller resolved");
        Ok(Self(profile))
    }
}

/// Extractor for callers allowed on the administrative routes.
///
/// Rejects with 403 unless the caller is an authority or an admin.
pub struct StaffActor(pub ActorProfile);

impl FromRequestParts<AppState> for StaffActor {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentActor(profile) = CurrentActor::from_request_parts(parts, state).await?;
        AuthorizationService::authorize_staff(&profile.actor(), "admin_access")
            .map_err(ApiError::from)?;
        Ok(Self(profile))
    }
}
