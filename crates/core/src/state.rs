// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use safelink_domain::{
    ActorId, CaseRecord, CaseStatus, FieldUpdate, Geolocation, IncidentType, Priority,
};
use time::OffsetDateTime;

/// Field-level difference between two versions of a case.
///
/// Only fields that changed are `Some`. Persistence writes exactly these
/// columns, so concurrent edits to different fields do not overwrite each
/// other.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CaseChanges {
    pub incident_type: Option<IncidentType>,
    pub description: Option<FieldUpdate<String>>,
    pub location: Option<Geolocation>,
    pub location_text: Option<FieldUpdate<String>>,
    /// Media references added after the existing ones.
    pub appended_images: Vec<String>,
    pub priority: Option<Priority>,
    pub status: Option<CaseStatus>,
    pub assigned_officer_id: Option<FieldUpdate<ActorId>>,
    pub eta_minutes: Option<FieldUpdate<u32>>,
    pub assignment_note: Option<FieldUpdate<String>>,
    pub casualties: Option<FieldUpdate<u32>>,
    pub bystander: Option<FieldUpdate<bool>>,
    /// Set whenever any other field changed.
    pub updated_at: Option<OffsetDateTime>,
}

fn changed<T: PartialEq + Clone>(before: &T, after: &T) -> Option<T> {
    (before != after).then(|| after.clone())
}

fn changed_nullable<T: PartialEq + Clone>(
    before: Option<&T>,
    after: Option<&T>,
) -> Option<FieldUpdate<T>> {
    (before != after).then(|| FieldUpdate::from(after.cloned()))
}

impl CaseChanges {
    /// Computes the changes that turn `before` into `after`.
    ///
    /// Images are append-only, so only the tail beyond the previous length
    /// is recorded.
    ///
    /// # Arguments
    ///
    /// * `before` - The case as it was loaded
    /// * `after` - The case after a command was applied
    #[must_use]
    pub fn between(before: &CaseRecord, after: &CaseRecord) -> Self {
        let appended_images: Vec<String> = after
            .images()
            .get(before.images_count()..)
            .map(<[String]>::to_vec)
            .unwrap_or_default();

        let mut changes: Self = Self {
            incident_type: changed(&before.incident_type, &after.incident_type),
            description: changed_nullable(before.description.as_ref(), after.description.as_ref()),
            location: changed(&before.location, &after.location),
            location_text: changed_nullable(
                before.location_text.as_ref(),
                after.location_text.as_ref(),
            ),
            appended_images,
            priority: changed(&before.priority, &after.priority),
            status: changed(&before.status, &after.status),
            assigned_officer_id: changed_nullable(
                before.assigned_officer_id.as_ref(),
                after.assigned_officer_id.as_ref(),
            ),
            eta_minutes: changed_nullable(before.eta_minutes.as_ref(), after.eta_minutes.as_ref()),
            assignment_note: changed_nullable(
                before.assignment_note.as_ref(),
                after.assignment_note.as_ref(),
            ),
            casualties: changed_nullable(before.casualties.as_ref(), after.casualties.as_ref()),
            bystander: changed_nullable(before.bystander.as_ref(), after.bystander.as_ref()),
            updated_at: None,
        };
        if !changes.is_empty() {
            changes.updated_at = Some(after.updated_at);
        }
        changes
    }

    /// Returns whether no case field changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.incident_type.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.location_text.is_none()
            && self.appended_images.is_empty()
            && self.priority.is_none()
            && self.status.is_none()
            && self.assigned_officer_id.is_none()
            && self.eta_minutes.is_none()
            && self.assignment_note.is_none()
            && self.casualties.is_none()
            && self.bystander.is_none()
    }
}

/// The result of a successful case transition.
///
/// Transitions are pure: the input case is never modified, and nothing is
/// persisted until the caller writes `changes`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    /// The case after the transition.
    pub case: CaseRecord,
    /// What changed, for a partial write.
    pub changes: CaseChanges,
    /// The status before the transition.
    pub previous_status: CaseStatus,
}

impl TransitionResult {
    /// Returns whether the status moved somewhere the nominal lifecycle
    /// does not lead.
    #[must_use]
    pub const fn is_off_lifecycle(&self) -> bool {
        match self.changes.status {
            Some(status) => !self.previous_status.is_forward_edge(status),
            None => false,
        }
    }
}
