// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor directory management.

use std::str::FromStr;

use safelink_domain::{
    Actor, ActorDraft, ActorFilter, ActorId, ActorProfile, PageLimits, Pagination, Role,
    normalize_email, normalize_search_text,
};
use safelink_persistence::SqlitePersistence;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::auth::AuthorizationService;
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::handlers::non_empty;
use crate::request_response::{
    ActorResponse, CreateActorRequest, DeleteResponse, ListActorsQuery, ListActorsResponse,
    LooseValue, Specializations, UpdateActorRequest, UpdateProfileRequest, WhoAmIResponse,
    parse_flag, parse_int,
};

/// Display name of the bootstrap administrator.
pub const SEED_ADMIN_NAME: &str = "System Admin";

/// Returns the caller's own directory entry.
///
/// # Errors
///
/// Returns `NotFound` if the caller's entry disappeared since it was
/// resolved, or an error if the query fails.
pub fn whoami(
    persistence: &mut SqlitePersistence,
    actor: &Actor,
) -> Result<WhoAmIResponse, ApiError> {
    let user: ActorProfile = load_actor(persistence, actor.id)?;
    Ok(WhoAmIResponse {
        success: true,
        user,
    })
}

/// Lists directory entries, most recently updated first.
///
/// Authorities never see admin entries.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The resolved caller
/// * `query` - Raw query parameters
///
/// # Errors
///
/// Returns an error if the caller is not staff, the role filter is not a
/// known role, or the query fails.
pub fn list_actors(
    persistence: &mut SqlitePersistence,
    actor: &Actor,
    query: &ListActorsQuery,
) -> Result<ListActorsResponse, ApiError> {
    AuthorizationService::authorize_staff(actor, "list_actors")?;

    let filter: ActorFilter = ActorFilter {
        role: parse_role(query.role.as_deref())?,
        is_verified: query.is_verified.as_deref().and_then(parse_flag),
        is_active: query.is_active.as_deref().and_then(parse_flag),
        text: normalize_search_text(query.q.as_deref()),
        exclude_admins: !actor.role.is_admin(),
    };
    let pagination: Pagination = Pagination::clamped(
        query.page.as_deref().and_then(parse_int),
        query.limit.as_deref().and_then(parse_int),
        PageLimits::ACTORS,
    );

    let (items, total): (Vec<ActorProfile>, i64) = persistence
        .list_actors(&filter, &pagination)
        .map_err(translate_persistence_error)?;

    debug!(actor_id = %actor.id, total, "Listed actors");
    Ok(ListActorsResponse {
        success: true,
        items,
        total,
        page: pagination.page(),
        limit: pagination.limit(),
    })
}

/// Creates a directory entry.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The resolved caller
/// * `request` - The new entry
/// * `now` - The creation time
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not staff, or is an authority creating an admin
/// - The role, email or full name is invalid
/// - A live entry already uses the email
pub fn create_actor(
    persistence: &mut SqlitePersistence,
    actor: &Actor,
    request: &CreateActorRequest,
    now: OffsetDateTime,
) -> Result<ActorResponse, ApiError> {
    AuthorizationService::authorize_staff(actor, "create_actor")?;
    let role: Role = parse_role(request.role.as_deref())?.unwrap_or_default();
    AuthorizationService::authorize_role_assignment(actor, role, "create_actor")?;

    let is_verified: bool = request
        .is_verified
        .as_ref()
        .and_then(LooseValue::as_flag)
        .unwrap_or(false);
    let draft: ActorDraft = ActorDraft {
        email: request.email.clone(),
        full_name: request.full_name.clone(),
        contact: non_empty(request.contact.as_deref()),
        address: non_empty(request.address.as_deref()),
        nic: non_empty(request.nic.as_deref()),
        role,
        department: non_empty(request.department.as_deref()),
        badge_number: non_empty(request.badge_number.as_deref()),
        specializations: request
            .specializations
            .clone()
            .map(Specializations::into_list)
            .unwrap_or_default(),
        is_verified,
        is_active: request
            .is_active
            .as_ref()
            .and_then(LooseValue::as_flag)
            .unwrap_or(true),
        verified_by: is_verified.then_some(actor.id),
    }
    .normalized()
    .map_err(translate_domain_error)?;

    let created: ActorProfile = persistence
        .create_actor(&draft, now)
        .map_err(translate_persistence_error)?;

    info!(
        actor_id = %actor.id,
        created_id = %created.id,
        role = %created.role,
        "Actor created"
    );
    Ok(ActorResponse {
        success: true,
        user: created,
    })
}

/// Changes a directory entry. Absent fields are left as they are.
///
/// Moving an entry away from the officer role clears its department,
/// badge number and specializations. Changing `isVerified` records or
/// clears who verified the entry.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The resolved caller
/// * `target_id` - The entry to change
/// * `request` - The requested changes
/// * `now` - The update time
///
/// # Errors
///
/// Returns an error if the caller may not touch the target or grant the
/// requested role, a field is invalid, the target is gone, or the email is
/// already used.
pub fn update_actor(
    persistence: &mut SqlitePersistence,
    actor: &Actor,
    target_id: ActorId,
    request: &UpdateActorRequest,
    now: OffsetDateTime,
) -> Result<ActorResponse, ApiError> {
    AuthorizationService::authorize_staff(actor, "update_actor")?;
    let mut profile: ActorProfile = load_actor(persistence, target_id)?;
    AuthorizationService::authorize_touch_actor(actor, &profile, "update_actor")?;

    if let Some(role) = parse_role(request.role.as_deref())? {
        AuthorizationService::authorize_role_assignment(actor, role, "update_actor")?;
        profile.role = role;
    }
    if let Some(email) = &request.email {
        profile.email = normalize_email(email).map_err(translate_domain_error)?;
    }
    apply_profile_fields(&mut profile, &ProfileFields::from(request))?;

    if let Some(is_verified) = request.is_verified.as_ref().and_then(LooseValue::as_flag)
        && is_verified != profile.is_verified
    {
        profile.is_verified = is_verified;
        profile.verified_by = is_verified.then_some(actor.id);
    }
    if let Some(is_active) = request.is_active.as_ref().and_then(LooseValue::as_flag) {
        profile.is_active = is_active;
    }
    profile.updated_at = now;

    let updated: ActorProfile = persistence
        .update_actor(&profile)
        .map_err(translate_persistence_error)?;

    info!(actor_id = %actor.id, target_id = %updated.id, role = %updated.role, "Actor updated");
    Ok(ActorResponse {
        success: true,
        user: updated,
    })
}

/// Changes the caller's own profile. Absent fields are left as they are.
///
/// Officer fields only apply to officers; anyone else has them cleared.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The resolved caller
/// * `request` - The requested changes
/// * `now` - The update time
///
/// # Errors
///
/// Returns an error if `fullName` is blank, the caller's entry is gone,
/// or the update fails.
pub fn update_own_profile(
    persistence: &mut SqlitePersistence,
    actor: &Actor,
    request: &UpdateProfileRequest,
    now: OffsetDateTime,
) -> Result<ActorResponse, ApiError> {
    let mut profile: ActorProfile = load_actor(persistence, actor.id)?;
    apply_profile_fields(&mut profile, &ProfileFields::from(request))?;
    profile.updated_at = now;

    let updated: ActorProfile = persistence
        .update_actor(&profile)
        .map_err(translate_persistence_error)?;

    info!(actor_id = %actor.id, "Profile updated");
    Ok(ActorResponse {
        success: true,
        user: updated,
    })
}

/// Soft-deletes a directory entry and frees its email.
///
/// # Errors
///
/// Returns an error if the caller may not touch the target, or the target
/// does not exist or was already deleted.
pub fn delete_actor(
    persistence: &mut SqlitePersistence,
    actor: &Actor,
    target_id: ActorId,
    now: OffsetDateTime,
) -> Result<DeleteResponse, ApiError> {
    AuthorizationService::authorize_staff(actor, "delete_actor")?;
    let target: ActorProfile = load_actor(persistence, target_id)?;
    AuthorizationService::authorize_touch_actor(actor, &target, "delete_actor")?;

    persistence
        .soft_delete_actor(target.id, now)
        .map_err(translate_persistence_error)?;

    info!(actor_id = %actor.id, target_id = %target.id, "Actor deleted");
    Ok(DeleteResponse {
        success: true,
        message: format!("User {} deleted", target.email),
    })
}

/// Creates the bootstrap administrator unless a live entry already uses
/// the email.
///
/// # Returns
///
/// * `Ok(Some(_))` with the new admin
/// * `Ok(None)` if the email was already registered
///
/// # Errors
///
/// Returns an error if the email is invalid or storage fails.
pub fn seed_admin(
    persistence: &mut SqlitePersistence,
    email: &str,
    now: OffsetDateTime,
) -> Result<Option<ActorProfile>, ApiError> {
    let email: String = normalize_email(email).map_err(translate_domain_error)?;
    if persistence
        .get_actor_by_email(&email)
        .map_err(translate_persistence_error)?
        .is_some()
    {
        debug!(email = %email, "Seed admin already present");
        return Ok(None);
    }

    let draft: ActorDraft = ActorDraft {
        email,
        full_name: String::from(SEED_ADMIN_NAME),
        role: Role::Admin,
        is_verified: true,
        is_active: true,
        ..ActorDraft::default()
    };
    let admin: ActorProfile = persistence
        .create_actor(&draft, now)
        .map_err(translate_persistence_error)?;

    info!(actor_id = %admin.id, email = %admin.email, "Seed admin created");
    Ok(Some(admin))
}

fn load_actor(
    persistence: &mut SqlitePersistence,
    actor_id: ActorId,
) -> Result<ActorProfile, ApiError> {
    persistence
        .get_actor(actor_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::NotFound {
            resource_type: String::from("User"),
            message: format!("No user with id {actor_id}"),
        })
}

fn parse_role(raw: Option<&str>) -> Result<Option<Role>, ApiError> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(Role::from_str)
        .transpose()
        .map_err(translate_domain_error)
}

/// Descriptive fields shared by the admin and self-service updates.
struct ProfileFields<'a> {
    full_name: Option<&'a str>,
    contact: Option<&'a str>,
    address: Option<&'a str>,
    nic: Option<&'a str>,
    department: Option<&'a str>,
    badge_number: Option<&'a str>,
    specializations: Option<&'a Specializations>,
}

impl<'a> From<&'a UpdateActorRequest> for ProfileFields<'a> {
    fn from(request: &'a UpdateActorRequest) -> Self {
        Self {
            full_name: request.full_name.as_deref(),
            contact: request.contact.as_deref(),
            address: request.address.as_deref(),
            nic: request.nic.as_deref(),
            department: request.department.as_deref(),
            badge_number: request.badge_number.as_deref(),
            specializations: request.specializations.as_ref(),
        }
    }
}

impl<'a> From<&'a UpdateProfileRequest> for ProfileFields<'a> {
    fn from(request: &'a UpdateProfileRequest) -> Self {
        Self {
            full_name: request.full_name.as_deref(),
            contact: request.contact.as_deref(),
            address: request.address.as_deref(),
            nic: request.nic.as_deref(),
            department: request.department.as_deref(),
            badge_number: request.badge_number.as_deref(),
            specializations: request.specializations.as_ref(),
        }
    }
}

fn apply_profile_fields(
    profile: &mut ActorProfile,
    fields: &ProfileFields<'_>,
) -> Result<(), ApiError> {
    if let Some(full_name) = fields.full_name {
        profile.full_name = non_empty(Some(full_name)).ok_or_else(|| ApiError::InvalidInput {
            field: String::from("fullName"),
            message: String::from("must not be empty"),
        })?;
    }
    if let Some(contact) = fields.contact {
        profile.contact = non_empty(Some(contact));
    }
    if let Some(address) = fields.address {
        profile.address = non_empty(Some(address));
    }
    if let Some(nic) = fields.nic {
        profile.nic = non_empty(Some(nic));
    }

    if profile.role == Role::Officer {
        if let Some(department) = fields.department {
            profile.department = non_empty(Some(department));
        }
        if let Some(badge_number) = fields.badge_number {
            profile.badge_number = non_empty(Some(badge_number));
        }
        if let Some(specializations) = fields.specializations {
            profile.specializations = specializations.clone().into_list();
        }
    } else {
        profile.department = None;
        profile.badge_number = None;
        profile.specializations.clear();
    }
    Ok(())
}
