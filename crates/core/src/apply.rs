// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{CaseChanges, TransitionResult};
use safelink_domain::{
    CaseDraft, CasePatch, CaseRecord, CaseStatus, HumanId, NewCase, ReporterPatch, StaffPatch,
};
use time::OffsetDateTime;

/// Builds the content of a new case from a draft and an issued identifier.
///
/// Nothing is persisted here. The identifier must already have been
/// allocated, so a case without a valid identifier cannot be produced.
///
/// # Arguments
///
/// * `draft` - Normalized reporter content
/// * `human_id` - The identifier issued by the sequence allocator
/// * `now` - Creation time
#[must_use]
pub fn apply_create(draft: CaseDraft, human_id: HumanId, now: OffsetDateTime) -> NewCase {
    NewCase {
        human_id,
        reporter_id: draft.reporter_id,
        incident_type: draft.incident_type,
        description: draft.description,
        location: draft.location,
        location_text: draft.location_text,
        images: draft.images,
        priority: draft.priority,
        status: draft.status,
        assigned_officer_id: None,
        eta_minutes: None,
        assignment_note: None,
        casualties: draft.casualties,
        bystander: draft.bystander,
        created_at: now,
        updated_at: now,
    }
}

/// Applies a command to a case, producing the new case and the changes.
///
/// # Arguments
///
/// * `case` - The current case (immutable)
/// * `command` - The command to apply
/// * `now` - Time of the change, recorded as `updated_at` if anything changed
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new case and field-level changes
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns `CoreError::NoFiles` if an image append carries no references.
pub fn apply(
    case: &CaseRecord,
    command: Command,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    let mut next: CaseRecord = case.clone();

    match command {
        Command::Update {
            patch: CasePatch::Reporter(patch),
        } => apply_reporter_patch(&mut next, patch),
        Command::Update {
            patch: CasePatch::Staff(patch),
        } => apply_staff_patch(&mut next, patch),
        Command::Assign {
            officer,
            eta_minutes,
            note,
        } => {
            next.assigned_officer_id = Some(officer.id());
            next.eta_minutes = eta_minutes;
            next.assignment_note = Some(note);
            next.status = CaseStatus::Assigned;
        }
        Command::SetEta { eta_minutes } => {
            next.eta_minutes = eta_minutes;
        }
        Command::AppendImages { uris } => {
            if uris.is_empty() {
                return Err(CoreError::NoFiles);
            }
            next.append_images(uris);
        }
    }

    next.updated_at = now;
    let changes: CaseChanges = CaseChanges::between(case, &next);
    if changes.is_empty() {
        next.updated_at = case.updated_at;
    }

    Ok(TransitionResult {
        case: next,
        changes,
        previous_status: case.status,
    })
}

fn apply_reporter_patch(case: &mut CaseRecord, patch: ReporterPatch) {
    if let Some(incident_type) = patch.incident_type {
        case.incident_type = incident_type;
    }
    if let Some(description) = patch.description {
        case.description = description.into_option();
    }
    if let Some(priority) = patch.priority {
        case.priority = priority;
    }
    if let Some(status) = patch.status {
        case.status = status;
    }
    if let Some(casualties) = patch.casualties {
        case.casualties = Some(casualties);
    }
    if let Some(bystander) = patch.bystander {
        case.bystander = Some(bystander);
    }
}

fn apply_staff_patch(case: &mut CaseRecord, patch: StaffPatch) {
    if let Some(incident_type) = patch.incident_type {
        case.incident_type = incident_type;
    }
    if let Some(description) = patch.description {
        case.description = description.into_option();
    }
    if let Some(priority) = patch.priority {
        case.priority = priority;
    }
    if let Some(status) = patch.status {
        case.status = status;
    }
    if let Some(eta_minutes) = patch.eta_minutes {
        case.eta_minutes = eta_minutes.into_option();
    }
    if let Some(note) = patch.assignment_note {
        case.assignment_note = note.into_option();
    }
    if let Some(officer) = patch.assigned_officer {
        case.assigned_officer_id = officer.map(|verified| verified.id()).into_option();
    }
    if let Some(location_text) = patch.location_text {
        case.location_text = location_text.into_option();
    }
    if let Some(casualties) = patch.casualties {
        case.casualties = casualties.into_option();
    }
    if let Some(bystander) = patch.bystander {
        case.bystander = bystander.into_option();
    }
    if let Some(location) = patch.location {
        case.location = location;
    }
}

