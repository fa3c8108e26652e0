// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for the case lifecycle.
//!
//! Every mutation follows the same shape: resolve the case, authorize,
//! run the pure transition, then write only the changed fields in one
//! persistence call.

use std::str::FromStr;

use safelink::{Command, TransitionResult, apply, apply_create};
use safelink_domain::{
    Actor, ActorId, ActorProfile, CaseDraft, CasePatch, CaseRecord, CaseRef, CaseStatus,
    FieldUpdate, Geolocation, HumanId, IncidentType, Priority, ReporterPatch, StaffPatch,
    VerifiedOfficer, counter_key, non_negative,
};
use safelink_persistence::SqlitePersistence;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::auth::{AuthorizationService, CaseOperation};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::media::{MediaStore, UploadPolicy, UploadedFile};
use crate::request_response::{
    ActiveCaseResponse, AssignRequest, CaseResponse, CreateCaseRequest, DeleteResponse,
    ImagesResponse, IncidentInfo, LooseValue, MyCasesResponse, OfficerSummary, ReporterSummary,
    SetEtaRequest, UpdateCaseRequest,
};

/// Files a new case.
///
/// Coordinates are validated before an identifier is allocated, so a
/// rejected request never advances the year's counter.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The resolved caller
/// * `request` - The case payload
/// * `now` - The creation time
///
/// # Errors
///
/// Returns an error if:
/// - The coordinates are missing or not finite
/// - A staff-supplied `reporterId` does not name a live actor
/// - `casualties` is negative
/// - The counter or insert fails
pub fn create_case(
    persistence: &mut SqlitePersistence,
    actor: &Actor,
    request: &CreateCaseRequest,
    now: OffsetDateTime,
) -> Result<CaseResponse, ApiError> {
    file_case(persistence, actor, request, None, now)
}

/// Files a new case together with the images uploaded in the same request.
///
/// The request is fully validated, including the upload policy, before any
/// file reaches the media store or an identifier is allocated. An empty
/// file list files the case without images.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `media` - Where raw bytes are stored
/// * `policy` - Upload limits
/// * `actor` - The resolved caller
/// * `request` - The case payload
/// * `files` - The uploaded files, in order
/// * `now` - The creation time
///
/// # Errors
///
/// Returns the errors of [`create_case`], plus an error if a file breaks
/// the policy or storage fails.
pub fn create_case_with_images(
    persistence: &mut SqlitePersistence,
    media: &dyn MediaStore,
    policy: &UploadPolicy,
    actor: &Actor,
    request: &CreateCaseRequest,
    files: &[UploadedFile],
    now: OffsetDateTime,
) -> Result<CaseResponse, ApiError> {
    let upload: Option<ImageUpload<'_>> = (!files.is_empty()).then_some(ImageUpload {
        media,
        policy,
        files,
    });
    file_case(persistence, actor, request, upload, now)
}

/// Files uploaded alongside a new case.
struct ImageUpload<'a> {
    media: &'a dyn MediaStore,
    policy: &'a UploadPolicy,
    files: &'a [UploadedFile],
}

fn file_case(
    persistence: &mut SqlitePersistence,
    actor: &Actor,
    request: &CreateCaseRequest,
    upload: Option<ImageUpload<'_>>,
    now: OffsetDateTime,
) -> Result<CaseResponse, ApiError> {
    let location: Geolocation = request.location().map_err(translate_domain_error)?;

    let (reporter_id, status): (ActorId, CaseStatus) = if actor.is_staff() {
        let reporter_id: ActorId = match &request.reporter_id {
            Some(raw) if !raw.is_null() => resolve_reporter(persistence, raw)?,
            _ => actor.id,
        };
        let status: CaseStatus = request
            .status
            .as_deref()
            .map(CaseStatus::normalize)
            .unwrap_or_default();
        (reporter_id, status)
    } else {
        (actor.id, CaseStatus::Open)
    };

    let casualties: Option<u32> = request
        .casualties
        .as_ref()
        .and_then(LooseValue::as_int)
        .map(|value| non_negative("casualties", value))
        .transpose()
        .map_err(translate_domain_error)?;

    let images: Vec<String> = match upload {
        Some(upload) => {
            upload.policy.validate(upload.files)?;
            upload
                .files
                .iter()
                .map(|file| upload.media.store(file, now))
                .collect::<Result<_, _>>()?
        }
        None => Vec::new(),
    };

    let draft: CaseDraft = CaseDraft {
        reporter_id,
        incident_type: IncidentType::normalize(request.incident_type.as_deref().unwrap_or("")),
        description: non_empty(request.description.as_deref()),
        location,
        location_text: non_empty(request.address.as_deref())
            .or_else(|| non_empty(request.location_text.as_deref())),
        images,
        priority: Priority::normalize(request.priority.as_deref().unwrap_or("")),
        status,
        casualties,
        bystander: request.bystander.as_ref().and_then(LooseValue::as_flag),
    };

    let human_id: HumanId = allocate_human_id(persistence, now)?;
    let case: CaseRecord = persistence
        .insert_case(&apply_create(draft, human_id, now))
        .map_err(translate_persistence_error)?;

    info!(
        human_id = %case.human_id,
        case_id = %case.case_id,
        reporter_id = %case.reporter_id,
        actor_id = %actor.id,
        images = case.images_count(),
        "Case created"
    );
    Ok(CaseResponse::new(&case))
}

/// Reads one case.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The resolved caller
/// * `case_ref` - A human identifier or internal identity
///
/// # Errors
///
/// Returns `NotFound` for an unknown reference and `Forbidden` when a
/// non-staff caller did not report the case.
pub fn get_case(
    persistence: &mut SqlitePersistence,
    actor: &Actor,
    case_ref: &str,
) -> Result<CaseResponse, ApiError> {
    let case: CaseRecord = resolve_case(persistence, case_ref)?;
    AuthorizationService::authorize_case(actor, &case, CaseOperation::Read)?;

    let officer: Option<ActorProfile> = lookup_actor(persistence, case.assigned_officer_id)?;
    let mut response: CaseResponse = CaseResponse::new(&case);
    response.assigned_officer_name = officer.as_ref().map(|profile| profile.full_name.clone());
    if actor.is_staff() {
        let reporter: Option<ActorProfile> = lookup_actor(persistence, Some(case.reporter_id))?;
        response.reporter = reporter.as_ref().map(ReporterSummary::from);
        response.assigned_officer = officer.as_ref().map(OfficerSummary::from);
    }
    Ok(response)
}

/// Lists every case the caller reported, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_my_cases(
    persistence: &mut SqlitePersistence,
    actor: &Actor,
) -> Result<MyCasesResponse, ApiError> {
    let cases: Vec<CaseRecord> = persistence
        .list_cases_for_reporter(actor.id)
        .map_err(translate_persistence_error)?;
    Ok(MyCasesResponse {
        success: true,
        items: cases.iter().map(IncidentInfo::from).collect(),
    })
}

/// Returns the caller's most recently created non-terminal case.
///
/// # Returns
///
/// * `Ok(Some(_))` with the active case
/// * `Ok(None)` if the caller has no active case
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn active_case(
    persistence: &mut SqlitePersistence,
    actor: &Actor,
) -> Result<Option<ActiveCaseResponse>, ApiError> {
    let Some(case) = persistence
        .latest_active_case_for_reporter(actor.id)
        .map_err(translate_persistence_error)?
    else {
        return Ok(None);
    };
    let officer: Option<ActorProfile> = lookup_actor(persistence, case.assigned_officer_id)?;
    Ok(Some(ActiveCaseResponse {
        success: true,
        incident: IncidentInfo::from(&case),
        incident_id: case.human_id.to_string(),
        status: case.status.as_str().to_string(),
        eta_minutes: case.eta_minutes,
        assigned_officer_name: officer.map(|profile| profile.full_name),
    }))
}

/// Loads a live actor for a response summary. Deleted actors read as absent.
fn lookup_actor(
    persistence: &mut SqlitePersistence,
    actor_id: Option<ActorId>,
) -> Result<Option<ActorProfile>, ApiError> {
    match actor_id {
        Some(actor_id) => persistence
            .get_actor(actor_id)
            .map_err(translate_persistence_error),
        None => Ok(None),
    }
}

/// Changes fields of a case.
///
/// Staff get the full field set with strict status parsing. Reporters get
/// a restricted set; their status input is normalized instead of rejected.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The resolved caller
/// * `case_ref` - A human identifier or internal identity
/// * `request` - The requested changes
/// * `now` - The update time
///
/// # Errors
///
/// Returns an error if the case is unknown, the caller is not allowed,
/// a staff status is not enumerated, a named officer is not an active
/// officer, or a count is negative.
pub fn update_case(
    persistence: &mut SqlitePersistence,
    actor: &Actor,
    case_ref: &str,
    request: &UpdateCaseRequest,
    now: OffsetDateTime,
) -> Result<CaseResponse, ApiError> {
    let case: CaseRecord = resolve_case(persistence, case_ref)?;
    AuthorizationService::authorize_case(actor, &case, CaseOperation::Update)?;

    let patch: CasePatch = if actor.is_staff() {
        CasePatch::Staff(staff_patch(persistence, request)?)
    } else {
        CasePatch::Reporter(reporter_patch(request)?)
    };

    let updated: CaseRecord = commit(persistence, actor, &case, Command::Update { patch }, now)?;
    Ok(CaseResponse::new(&updated))
}

/// Assigns an officer and moves the case to `assigned`.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The resolved caller
/// * `case_ref` - A human identifier or internal identity
/// * `request` - The officer, ETA and note
/// * `now` - The assignment time
///
/// # Errors
///
/// Returns an error if the case is unknown, the caller is not staff, the
/// officer is missing or is not an active officer, or the ETA is negative.
pub fn assign_case(
    persistence: &mut SqlitePersistence,
    actor: &Actor,
    case_ref: &str,
    request: &AssignRequest,
    now: OffsetDateTime,
) -> Result<CaseResponse, ApiError> {
    let case: CaseRecord = resolve_case(persistence, case_ref)?;
    AuthorizationService::authorize_case(actor, &case, CaseOperation::Assign)?;

    let officer_id: i64 = request
        .officer_id
        .as_ref()
        .and_then(LooseValue::as_int)
        .ok_or_else(|| ApiError::InvalidInput {
            field: String::from("officerId"),
            message: String::from("officerId is required"),
        })?;
    let officer: VerifiedOfficer = verify_officer(persistence, officer_id)?;

    let command: Command = Command::Assign {
        officer,
        eta_minutes: eta_from(request.eta_minutes.as_ref())?,
        note: request
            .note
            .as_ref()
            .map(LooseValue::as_text)
            .unwrap_or_default(),
    };
    let updated: CaseRecord = commit(persistence, actor, &case, command, now)?;
    Ok(CaseResponse::new(&updated))
}

/// Changes only the ETA of a case. An absent value clears it.
///
/// # Errors
///
/// Returns an error if the case is unknown, the caller is not staff, or
/// the ETA is negative.
pub fn set_eta(
    persistence: &mut SqlitePersistence,
    actor: &Actor,
    case_ref: &str,
    request: &SetEtaRequest,
    now: OffsetDateTime,
) -> Result<CaseResponse, ApiError> {
    let case: CaseRecord = resolve_case(persistence, case_ref)?;
    AuthorizationService::authorize_case(actor, &case, CaseOperation::SetEta)?;

    let command: Command = Command::SetEta {
        eta_minutes: eta_from(request.eta_minutes.as_ref())?,
    };
    let updated: CaseRecord = commit(persistence, actor, &case, command, now)?;
    Ok(CaseResponse::new(&updated))
}

/// Stores uploaded images and appends their URIs to a case.
///
/// Nothing is written to the media store until the case is resolved, the
/// caller authorized and every file accepted by `policy`.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `media` - Where raw bytes are stored
/// * `policy` - Upload limits
/// * `actor` - The resolved caller
/// * `case_ref` - A human identifier or internal identity
/// * `files` - The uploaded files, in order
/// * `now` - The upload time
///
/// # Errors
///
/// Returns an error if the case is unknown, the caller is not allowed, no
/// files were sent, a file breaks the policy, or storage fails.
pub fn append_images(
    persistence: &mut SqlitePersistence,
    media: &dyn MediaStore,
    policy: &UploadPolicy,
    actor: &Actor,
    case_ref: &str,
    files: &[UploadedFile],
    now: OffsetDateTime,
) -> Result<ImagesResponse, ApiError> {
    let case: CaseRecord = resolve_case(persistence, case_ref)?;
    AuthorizationService::authorize_case(actor, &case, CaseOperation::AppendImages)?;
    if files.is_empty() {
        return Err(ApiError::NoFiles);
    }
    policy.validate(files)?;

    let uris: Vec<String> = files
        .iter()
        .map(|file| media.store(file, now))
        .collect::<Result<_, _>>()?;
    debug!(human_id = %case.human_id, count = uris.len(), "Stored case images");

    let updated: CaseRecord = commit(
        persistence,
        actor,
        &case,
        Command::AppendImages { uris: uris.clone() },
        now,
    )?;
    Ok(ImagesResponse {
        success: true,
        images: uris,
        incident: IncidentInfo::from(&updated),
    })
}

/// Permanently removes a case.
///
/// # Errors
///
/// Returns `NotFound` for an unknown reference, including a second delete,
/// and `Forbidden` when a non-staff caller did not report the case.
pub fn delete_case(
    persistence: &mut SqlitePersistence,
    actor: &Actor,
    case_ref: &str,
) -> Result<DeleteResponse, ApiError> {
    let case: CaseRecord = resolve_case(persistence, case_ref)?;
    AuthorizationService::authorize_case(actor, &case, CaseOperation::Delete)?;

    persistence
        .delete_case(case.case_id)
        .map_err(translate_persistence_error)?;

    info!(human_id = %case.human_id, actor_id = %actor.id, "Case deleted");
    Ok(DeleteResponse {
        success: true,
        message: format!("Incident {} deleted", case.human_id),
    })
}

/// Looks up a case by human identifier or internal identity.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if nothing matches.
pub(crate) fn resolve_case(
    persistence: &mut SqlitePersistence,
    case_ref: &str,
) -> Result<CaseRecord, ApiError> {
    let reference: CaseRef = CaseRef::resolve(case_ref);
    let found: Option<CaseRecord> = match &reference {
        CaseRef::ByHumanId(human_id) => persistence.get_case_by_human_id(human_id),
        CaseRef::ByInternalId(case_id) => persistence.get_case_by_id(*case_id),
        CaseRef::Unresolved(_) => Ok(None),
    }
    .map_err(translate_persistence_error)?;

    found.ok_or_else(|| {
        debug!(case_ref = %reference, "Case not found");
        ApiError::NotFound {
            resource_type: String::from("Incident"),
            message: format!("No incident matches '{}'", case_ref.trim()),
        }
    })
}

/// Runs a transition and writes its changes.
fn commit(
    persistence: &mut SqlitePersistence,
    actor: &Actor,
    case: &CaseRecord,
    command: Command,
    now: OffsetDateTime,
) -> Result<CaseRecord, ApiError> {
    let command_name: &str = command.name();
    let result: TransitionResult = apply(case, command, now).map_err(translate_core_error)?;

    if result.is_off_lifecycle() {
        warn!(
            human_id = %case.human_id,
            actor_id = %actor.id,
            from = %result.previous_status,
            to = %result.case.status,
            "Status change skips the nominal lifecycle"
        );
    }

    if result.changes.is_empty() {
        debug!(human_id = %case.human_id, command = command_name, "No case fields changed");
        return Ok(result.case);
    }

    let updated: CaseRecord = persistence
        .update_case(case.case_id, &result.changes)
        .map_err(translate_persistence_error)?;

    info!(
        human_id = %updated.human_id,
        actor_id = %actor.id,
        command = command_name,
        status = %updated.status,
        "Case updated"
    );
    Ok(updated)
}

fn allocate_human_id(
    persistence: &mut SqlitePersistence,
    now: OffsetDateTime,
) -> Result<HumanId, ApiError> {
    let year: i32 = now.year();
    let sequence: i64 = persistence
        .next_sequence(&counter_key(year), now)
        .map_err(translate_persistence_error)?;
    HumanId::new(year, sequence).map_err(translate_domain_error)
}

/// Confirms that `officer_id` names a live, active officer.
pub(crate) fn verify_officer(
    persistence: &mut SqlitePersistence,
    officer_id: i64,
) -> Result<VerifiedOfficer, ApiError> {
    let candidate: Option<ActorProfile> = persistence
        .get_actor(ActorId::new(officer_id))
        .map_err(translate_persistence_error)?;
    let Some(candidate) = candidate else {
        warn!(officer_id, "Assignment target does not exist");
        return Err(ApiError::OfficerNotFound { officer_id });
    };
    VerifiedOfficer::verify(&candidate.actor()).map_err(|e| {
        warn!(officer_id, role = %candidate.role, "Assignment target is not an active officer");
        translate_domain_error(e)
    })
}

fn resolve_reporter(
    persistence: &mut SqlitePersistence,
    raw: &LooseValue,
) -> Result<ActorId, ApiError> {
    let invalid = || ApiError::InvalidInput {
        field: String::from("reporterId"),
        message: format!("'{}' is not an existing actor", raw.as_text()),
    };
    let reporter_id: ActorId = raw.as_int().map(ActorId::new).ok_or_else(invalid)?;
    persistence
        .get_actor(reporter_id)
        .map_err(translate_persistence_error)?
        .map(|profile| profile.id)
        .ok_or_else(invalid)
}

fn reporter_patch(request: &UpdateCaseRequest) -> Result<ReporterPatch, ApiError> {
    let casualties: Option<u32> = request
        .casualties
        .as_ref()
        .map(|value| non_negative("casualties", value.as_int().unwrap_or(0)))
        .transpose()
        .map_err(translate_domain_error)?;

    Ok(ReporterPatch {
        incident_type: request.incident_type.as_deref().map(IncidentType::normalize),
        description: request
            .description
            .as_ref()
            .map(|value| FieldUpdate::Set(value.as_text())),
        priority: request.priority.as_deref().map(Priority::normalize),
        status: request
            .status
            .as_ref()
            .map(|value| CaseStatus::normalize(&value.as_text())),
        casualties,
        bystander: request.bystander.as_ref().map(LooseValue::is_true),
    })
}

fn staff_patch(
    persistence: &mut SqlitePersistence,
    request: &UpdateCaseRequest,
) -> Result<StaffPatch, ApiError> {
    let status: Option<CaseStatus> = request
        .status
        .as_ref()
        .map(|value| CaseStatus::from_str(&value.as_text()))
        .transpose()
        .map_err(translate_domain_error)?;

    let priority: Option<Priority> = request
        .priority
        .as_deref()
        .map(Priority::from_str)
        .transpose()
        .map_err(translate_domain_error)?;

    let assigned_officer: Option<FieldUpdate<VerifiedOfficer>> =
        match request.assigned_officer_id.as_ref() {
            None => None,
            Some(LooseValue::Null) => Some(FieldUpdate::Clear),
            Some(value) => {
                let officer_id: i64 = value.as_int().ok_or_else(|| ApiError::InvalidInput {
                    field: String::from("assignedOfficerId"),
                    message: format!("'{}' is not an actor identifier", value.as_text()),
                })?;
                Some(FieldUpdate::Set(verify_officer(persistence, officer_id)?))
            }
        };

    Ok(StaffPatch {
        incident_type: request.incident_type.as_deref().map(IncidentType::normalize),
        description: request.description.as_ref().map(nullable_text),
        priority,
        status,
        eta_minutes: request
            .eta_minutes
            .as_ref()
            .map(|value| nullable_count("etaMinutes", value))
            .transpose()?,
        assignment_note: request.assignment_note.as_ref().map(nullable_text),
        assigned_officer,
        location_text: request.location_text.as_ref().map(nullable_text),
        casualties: request
            .casualties
            .as_ref()
            .map(|value| nullable_count("casualties", value))
            .transpose()?,
        bystander: request
            .bystander
            .as_ref()
            .map(|value| FieldUpdate::Set(value.is_true())),
        location: request.location(),
    })
}

/// `null` clears; anything else sets its text form.
fn nullable_text(value: &LooseValue) -> FieldUpdate<String> {
    if value.is_null() {
        FieldUpdate::Clear
    } else {
        FieldUpdate::Set(value.as_text())
    }
}

/// An unreadable count clears the field; a negative one is rejected.
fn nullable_count(field: &'static str, value: &LooseValue) -> Result<FieldUpdate<u32>, ApiError> {
    value
        .as_int()
        .map(|count| non_negative(field, count))
        .transpose()
        .map(FieldUpdate::from)
        .map_err(translate_domain_error)
}

fn eta_from(value: Option<&LooseValue>) -> Result<Option<u32>, ApiError> {
    value
        .and_then(LooseValue::as_int)
        .map(|minutes| non_negative("etaMinutes", minutes))
        .transpose()
        .map_err(translate_domain_error)
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToString::to_string)
}
