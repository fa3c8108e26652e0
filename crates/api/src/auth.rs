// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization services.
//!
//! Credentials are verified upstream. Authentication here only resolves an
//! already-established actor identity against the directory; authorization
//! is the case and actor policy.

use safelink_domain::{Actor, ActorId, ActorProfile, CaseRecord, Role};
use safelink_persistence::SqlitePersistence;
use tracing::{debug, warn};

use crate::error::AuthError;

/// Case operations subject to the authorization policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseOperation {
    Read,
    Update,
    AppendImages,
    Delete,
    Assign,
    SetEta,
}

impl CaseOperation {
    /// Returns whether only staff may perform this operation, even on their
    /// own case.
    #[must_use]
    pub const fn is_staff_only(self) -> bool {
        matches!(self, Self::Assign | Self::SetEta)
    }

    /// Action name used in errors and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Read => "read_case",
            Self::Update => "update_case",
            Self::AppendImages => "append_images",
            Self::Delete => "delete_case",
            Self::Assign => "assign_case",
            Self::SetEta => "set_eta",
        }
    }
}

/// Authorization service for the case and actor policies.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Returns whether `actor` may perform `operation` on `case`.
    ///
    /// Staff may do anything. Everyone else is limited to the
    /// non-staff operations on cases they reported.
    ///
    /// # Arguments
    ///
    /// * `actor` - The resolved caller
    /// * `case` - The target case
    /// * `operation` - The attempted operation
    #[must_use]
    pub fn can_mutate(actor: &Actor, case: &CaseRecord, operation: CaseOperation) -> bool {
        if actor.is_staff() {
            return true;
        }
        !operation.is_staff_only() && case.is_reported_by(actor.id)
    }

    /// Checks if an actor may perform `operation` on `case`.
    ///
    /// # Arguments
    ///
    /// * `actor` - The resolved caller
    /// * `case` - The target case
    /// * `operation` - The attempted operation
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Forbidden` if the policy denies the operation.
    pub fn authorize_case(
        actor: &Actor,
        case: &CaseRecord,
        operation: CaseOperation,
    ) -> Result<(), AuthError> {
        if Self::can_mutate(actor, case, operation) {
            return Ok(());
        }

        warn!(
            actor_id = %actor.id,
            role = %actor.role,
            human_id = %case.human_id,
            action = operation.name(),
            "Case operation denied"
        );
        let reason: &str = if operation.is_staff_only() {
            "requires an authority or admin role"
        } else {
            "is only allowed on cases you reported"
        };
        Err(AuthError::Forbidden {
            action: String::from(operation.name()),
            reason: String::from(reason),
        })
    }

    /// Checks that an actor is staff (`authority` or `admin`).
    ///
    /// # Arguments
    ///
    /// * `actor` - The resolved caller
    /// * `action` - The attempted action, for the error
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Forbidden` for any other role.
    pub fn authorize_staff(actor: &Actor, action: &str) -> Result<(), AuthError> {
        if actor.is_staff() {
            return Ok(());
        }

        warn!(actor_id = %actor.id, role = %actor.role, action, "Staff action denied");
        Err(AuthError::Forbidden {
            action: action.to_string(),
            reason: String::from("requires an authority or admin role"),
        })
    }

    /// Returns whether `actor` may modify or delete `target`.
    ///
    /// Admins may touch anyone. Authorities may touch anyone except admins.
    ///
    /// # Arguments
    ///
    /// * `actor` - The resolved caller
    /// * `target` - The actor being modified
    #[must_use]
    pub const fn can_touch_actor(actor: &Actor, target: &ActorProfile) -> bool {
        match actor.role {
            Role::Admin => true,
            Role::Authority => !target.role.is_admin(),
            Role::User | Role::Officer => false,
        }
    }

    /// Checks that `actor` may modify or delete `target`.
    ///
    /// # Arguments
    ///
    /// * `actor` - The resolved caller
    /// * `target` - The actor being modified
    /// * `action` - The attempted action, for the error
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Forbidden` if the policy denies the change.
    pub fn authorize_touch_actor(
        actor: &Actor,
        target: &ActorProfile,
        action: &str,
    ) -> Result<(), AuthError> {
        if Self::can_touch_actor(actor, target) {
            return Ok(());
        }

        warn!(
            actor_id = %actor.id,
            target_id = %target.id,
            target_role = %target.role,
            action,
            "Actor change denied"
        );
        Err(AuthError::Forbidden {
            action: action.to_string(),
            reason: format!("may not modify a {} account", target.role),
        })
    }

    /// Checks that `actor` may give someone `role`.
    ///
    /// Only an admin may create or promote an admin.
    ///
    /// # Arguments
    ///
    /// * `actor` - The resolved caller
    /// * `role` - The role being assigned
    /// * `action` - The attempted action, for the error
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Forbidden` on an escalation attempt.
    pub fn authorize_role_assignment(
        actor: &Actor,
        role: Role,
        action: &str,
    ) -> Result<(), AuthError> {
        if !role.is_admin() || actor.role.is_admin() {
            return Ok(());
        }

        warn!(actor_id = %actor.id, role = %actor.role, action, "Admin escalation denied");
        Err(AuthError::Forbidden {
            action: action.to_string(),
            reason: String::from("only an admin may assign the admin role"),
        })
    }
}

/// Resolves upstream identities against the actor directory.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Loads the profile behind an authenticated identity.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `actor_id` - The identity forwarded by the authentication collaborator
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` if the actor does not exist,
    /// was deleted, is inactive, or the lookup itself fails.
    pub fn resolve_actor(
        persistence: &mut SqlitePersistence,
        actor_id: ActorId,
    ) -> Result<ActorProfile, AuthError> {
        let profile: ActorProfile = persistence
            .get_actor(actor_id)
            .map_err(|e| {
                warn!(actor_id = %actor_id, error = %e, "Actor lookup failed");
                AuthError::AuthenticationFailed {
                    reason: String::from("Actor lookup failed"),
                }
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: format!("Unknown actor {actor_id}"),
            })?;

        if !profile.can_authenticate() {
            warn!(actor_id = %actor_id, "Inactive actor rejected");
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Account is disabled"),
            });
        }

        debug!(actor_id = %actor_id, role = %profile.role, "Actor resolved");
        Ok(profile)
    }
}
