// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::geolocation::Geolocation;
use crate::human_id::HumanId;
use crate::types::{ActorId, CaseId, CaseStatus, IncidentType, Priority};
use time::OffsetDateTime;

/// Reporter-supplied content of a new case, before an identifier exists.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseDraft {
    pub reporter_id: ActorId,
    pub incident_type: IncidentType,
    pub description: Option<String>,
    pub location: Geolocation,
    pub location_text: Option<String>,
    /// Media URIs uploaded together with the report.
    pub images: Vec<String>,
    pub priority: Priority,
    pub status: CaseStatus,
    pub casualties: Option<u32>,
    pub bystander: Option<bool>,
}

/// Every stored attribute of a case except its internal identity.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCase {
    pub human_id: HumanId,
    pub reporter_id: ActorId,
    pub incident_type: IncidentType,
    pub description: Option<String>,
    pub location: Geolocation,
    pub location_text: Option<String>,
    pub images: Vec<String>,
    pub priority: Priority,
    pub status: CaseStatus,
    pub assigned_officer_id: Option<ActorId>,
    pub eta_minutes: Option<u32>,
    pub assignment_note: Option<String>,
    pub casualties: Option<u32>,
    pub bystander: Option<bool>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl NewCase {
    /// Cached image count, always the length of `images`.
    #[must_use]
    pub fn images_count(&self) -> usize {
        self.images.len()
    }
}

/// A stored emergency case.
///
/// The image list is private so that it can only grow by appending, and
/// the image count is derived from it rather than stored beside it.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseRecord {
    pub case_id: CaseId,
    pub human_id: HumanId,
    pub reporter_id: ActorId,
    pub incident_type: IncidentType,
    pub description: Option<String>,
    pub location: Geolocation,
    pub location_text: Option<String>,
    images: Vec<String>,
    pub priority: Priority,
    pub status: CaseStatus,
    pub assigned_officer_id: Option<ActorId>,
    pub eta_minutes: Option<u32>,
    pub assignment_note: Option<String>,
    pub casualties: Option<u32>,
    pub bystander: Option<bool>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl CaseRecord {
    /// Attaches a storage identity to case content.
    #[must_use]
    pub fn new(case_id: CaseId, case: NewCase) -> Self {
        Self {
            case_id,
            human_id: case.human_id,
            reporter_id: case.reporter_id,
            incident_type: case.incident_type,
            description: case.description,
            location: case.location,
            location_text: case.location_text,
            images: case.images,
            priority: case.priority,
            status: case.status,
            assigned_officer_id: case.assigned_officer_id,
            eta_minutes: case.eta_minutes,
            assignment_note: case.assignment_note,
            casualties: case.casualties,
            bystander: case.bystander,
            created_at: case.created_at,
            updated_at: case.updated_at,
        }
    }

    #[must_use]
    pub fn images(&self) -> &[String] {
        &self.images
    }

    #[must_use]
    pub fn images_count(&self) -> usize {
        self.images.len()
    }

    /// Appends media references after the existing ones.
    pub fn append_images<I>(&mut self, uris: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.images.extend(uris);
    }

    /// Whether `actor_id` filed this case.
    #[must_use]
    pub fn is_reported_by(&self, actor_id: ActorId) -> bool {
        self.reporter_id == actor_id
    }
}

/// Converts a client-supplied count to a non-negative value.
///
/// Values above `u32::MAX` saturate.
///
/// # Arguments
///
/// * `field` - The field name, used in the error
/// * `value` - The supplied value
///
/// # Errors
///
/// Returns `DomainError::NegativeValue` if `value` is below zero.
pub fn non_negative(field: &'static str, value: i64) -> Result<u32, DomainError> {
    if value < 0 {
        return Err(DomainError::NegativeValue { field, value });
    }
    Ok(u32::try_from(value).unwrap_or(u32::MAX))
}
