// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{ActorId, Role};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The resolved caller of an operation, as supplied by authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub role: Role,
    pub is_verified: bool,
    pub is_active: bool,
}

impl Actor {
    #[must_use]
    pub const fn new(id: ActorId, role: Role) -> Self {
        Self {
            id,
            role,
            is_verified: true,
            is_active: true,
        }
    }

    #[must_use]
    pub const fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

/// An actor confirmed to be an active officer at the moment of assignment.
///
/// This is the only way to obtain an officer reference for a case, so an
/// assignment cannot name anyone else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedOfficer(ActorId);

impl VerifiedOfficer {
    /// Confirms that `candidate` is an active officer.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OfficerNotFound` if the candidate is not an
    /// officer or is inactive.
    pub const fn verify(candidate: &Actor) -> Result<Self, DomainError> {
        if matches!(candidate.role, Role::Officer) && candidate.is_active {
            Ok(Self(candidate.id))
        } else {
            Err(DomainError::OfficerNotFound {
                officer_id: candidate.id.value(),
            })
        }
    }

    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.0
    }
}

/// Full directory entry for an actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorProfile {
    pub id: ActorId,
    pub email: String,
    pub full_name: String,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub nic: Option<String>,
    pub role: Role,
    pub department: Option<String>,
    pub badge_number: Option<String>,
    pub specializations: Vec<String>,
    pub is_verified: bool,
    pub is_active: bool,
    pub verified_by: Option<ActorId>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub deleted_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl ActorProfile {
    /// The authorization view of this profile.
    #[must_use]
    pub const fn actor(&self) -> Actor {
        Actor {
            id: self.id,
            role: self.role,
            is_verified: self.is_verified,
            is_active: self.is_active,
        }
    }

    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Whether this profile may act as an authenticated caller.
    #[must_use]
    pub const fn can_authenticate(&self) -> bool {
        self.is_active && !self.is_deleted()
    }
}

/// Input for a new directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActorDraft {
    pub email: String,
    pub full_name: String,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub nic: Option<String>,
    pub role: Role,
    pub department: Option<String>,
    pub badge_number: Option<String>,
    pub specializations: Vec<String>,
    pub is_verified: bool,
    pub is_active: bool,
    pub verified_by: Option<ActorId>,
}

impl ActorDraft {
    /// Normalizes and validates the draft.
    ///
    /// Emails are trimmed and lowercased. Officer-only fields are cleared
    /// when the role is not `officer`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidActorField` if the email or full name is
    /// empty, or the email has no `@`.
    pub fn normalized(mut self) -> Result<Self, DomainError> {
        self.email = normalize_email(&self.email)?;
        self.full_name = self.full_name.trim().to_string();
        if self.full_name.is_empty() {
            return Err(DomainError::InvalidActorField {
                field: "fullName",
                message: String::from("must not be empty"),
            });
        }
        if self.role != Role::Officer {
            self.clear_officer_fields();
        }
        Ok(self)
    }

    /// Clears department, badge number and specializations.
    pub fn clear_officer_fields(&mut self) {
        self.department = None;
        self.badge_number = None;
        self.specializations.clear();
    }
}

/// Trims and lowercases an email address.
///
/// # Errors
///
/// Returns `DomainError::InvalidActorField` if the result is empty or has
/// no `@`.
pub fn normalize_email(raw: &str) -> Result<String, DomainError> {
    let email: String = raw.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(DomainError::InvalidActorField {
            field: "email",
            message: format!("'{raw}' is not a valid email address"),
        });
    }
    Ok(email)
}
