// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Route handlers.
//!
//! Each handler resolves the caller, locks persistence for the duration of
//! one API call and renders the result. Business rules live in
//! `safelink_api`.

use axum::{
    Json,
    extract::{
        FromRequest, Multipart, Path, Query, Request, State as AxumState,
        multipart::MultipartRejection, rejection::JsonRejection,
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use safelink_api::{
    ActorResponse, ApiError, AssignRequest, CaseResponse, CreateActorRequest, CreateCaseRequest,
    DeleteResponse, ImagesResponse, ListActorsQuery, ListActorsResponse, ListCasesQuery,
    ListCasesResponse, MyCasesResponse, OfficersQuery, OfficersResponse, SetEtaRequest,
    UpdateActorRequest, UpdateCaseRequest, UpdateProfileRequest, UploadedFile, WhoAmIResponse,
};
use safelink_domain::ActorId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::AppState;
use crate::error::HttpError;
use crate::session::{CurrentActor, StaffActor};

/// Multipart field carrying image files.
const IMAGES_FIELD: &str = "images";

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub version: String,
}

/// Handler for GET `/api/health`.
#[allow(clippy::unused_async)]
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        status: String::from("healthy"),
        timestamp: OffsetDateTime::now_utc(),
        version: String::from(env!("CARGO_PKG_VERSION")),
    })
}

/// Handler for GET `/api/profile/me`.
pub async fn handle_whoami(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(caller): CurrentActor,
) -> Result<Json<WhoAmIResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: WhoAmIResponse = safelink_api::whoami(&mut persistence, &caller.actor())?;
    Ok(Json(response))
}

/// Handler for PATCH and PUT `/api/profile/me`.
pub async fn handle_update_profile(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(caller): CurrentActor,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<ActorResponse>, HttpError> {
    let Json(request) = payload?;
    info!(actor_id = %caller.id, "Handling update_profile request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ActorResponse = safelink_api::update_own_profile(
        &mut persistence,
        &caller.actor(),
        &request,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

// ============================================================================
// Cases
// ============================================================================

/// Handler for POST `/api/emergency` and `/api/admin/emergency/incidents`.
///
/// Accepts a JSON body, or a multipart form whose text parts are the case
/// fields and whose `images` parts are uploaded with the report.
pub async fn handle_create_case(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(caller): CurrentActor,
    request: Request,
) -> Result<(StatusCode, Json<CaseResponse>), HttpError> {
    let (payload, files): (CreateCaseRequest, Vec<UploadedFile>) = if is_multipart(&request) {
        let multipart: Multipart = Multipart::from_request(request, &app_state)
            .await
            .map_err(multipart_rejection)?;
        let (fields, files) = read_form(multipart).await?;
        let payload: CreateCaseRequest = serde_json::from_value(Value::Object(fields))
            .map_err(|e| HttpError::validation(e.to_string()))?;
        (payload, files)
    } else {
        let Json(payload) = Json::<CreateCaseRequest>::from_request(request, &app_state).await?;
        (payload, Vec::new())
    };
    info!(actor_id = %caller.id, files = files.len(), "Handling create_case request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CaseResponse = safelink_api::create_case_with_images(
        &mut persistence,
        app_state.media.as_ref(),
        &app_state.upload_policy,
        &caller.actor(),
        &payload,
        &files,
        OffsetDateTime::now_utc(),
    )?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Admin variant of [`handle_create_case`].
pub async fn handle_admin_create_case(
    state: AxumState<AppState>,
    StaffActor(caller): StaffActor,
    request: Request,
) -> Result<(StatusCode, Json<CaseResponse>), HttpError> {
    handle_create_case(state, CurrentActor(caller), request).await
}

/// Handler for GET `/api/emergency/my`.
pub async fn handle_list_my_cases(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(caller): CurrentActor,
) -> Result<Json<MyCasesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: MyCasesResponse = safelink_api::list_my_cases(&mut persistence, &caller.actor())?;
    Ok(Json(response))
}

/// Handler for GET `/api/emergency/my/active`.
///
/// Answers 204 when the caller has no active case.
pub async fn handle_active_case(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(caller): CurrentActor,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let active = safelink_api::active_case(&mut persistence, &caller.actor())?;
    drop(persistence);

    Ok(active.map_or_else(
        || StatusCode::NO_CONTENT.into_response(),
        |response| Json(response).into_response(),
    ))
}

/// Handler for GET `/api/emergency/{ref}`.
pub async fn handle_get_case(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(caller): CurrentActor,
    Path(case_ref): Path<String>,
) -> Result<Json<CaseResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: CaseResponse =
        safelink_api::get_case(&mut persistence, &caller.actor(), &case_ref)?;
    Ok(Json(response))
}

/// Admin variant of [`handle_get_case`].
pub async fn handle_admin_get_case(
    state: AxumState<AppState>,
    StaffActor(caller): StaffActor,
    case_ref: Path<String>,
) -> Result<Json<CaseResponse>, HttpError> {
    handle_get_case(state, CurrentActor(caller), case_ref).await
}

/// Handler for PATCH `/api/emergency/{ref}`.
pub async fn handle_update_case(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(caller): CurrentActor,
    Path(case_ref): Path<String>,
    payload: Result<Json<UpdateCaseRequest>, JsonRejection>,
) -> Result<Json<CaseResponse>, HttpError> {
    let Json(request) = payload?;
    info!(actor_id = %caller.id, case_ref = %case_ref, "Handling update_case request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CaseResponse = safelink_api::update_case(
        &mut persistence,
        &caller.actor(),
        &case_ref,
        &request,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

/// Admin variant of [`handle_update_case`].
pub async fn handle_admin_update_case(
    state: AxumState<AppState>,
    StaffActor(caller): StaffActor,
    case_ref: Path<String>,
    payload: Result<Json<UpdateCaseRequest>, JsonRejection>,
) -> Result<Json<CaseResponse>, HttpError> {
    handle_update_case(state, CurrentActor(caller), case_ref, payload).await
}

/// Handler for DELETE `/api/emergency/{ref}`.
pub async fn handle_delete_case(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(caller): CurrentActor,
    Path(case_ref): Path<String>,
) -> Result<Json<DeleteResponse>, HttpError> {
    info!(actor_id = %caller.id, case_ref = %case_ref, "Handling delete_case request");

    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteResponse =
        safelink_api::delete_case(&mut persistence, &caller.actor(), &case_ref)?;
    Ok(Json(response))
}

/// Admin variant of [`handle_delete_case`].
pub async fn handle_admin_delete_case(
    state: AxumState<AppState>,
    StaffActor(caller): StaffActor,
    case_ref: Path<String>,
) -> Result<Json<DeleteResponse>, HttpError> {
    handle_delete_case(state, CurrentActor(caller), case_ref).await
}

/// Handler for POST `/api/admin/emergency/incidents/{ref}/assign`.
pub async fn handle_assign_case(
    AxumState(app_state): AxumState<AppState>,
    StaffActor(caller): StaffActor,
    Path(case_ref): Path<String>,
    payload: Result<Json<AssignRequest>, JsonRejection>,
) -> Result<Json<CaseResponse>, HttpError> {
    let Json(request) = payload?;
    info!(actor_id = %caller.id, case_ref = %case_ref, "Handling assign_case request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CaseResponse = safelink_api::assign_case(
        &mut persistence,
        &caller.actor(),
        &case_ref,
        &request,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

/// Handler for POST `/api/admin/emergency/incidents/{ref}/eta`.
pub async fn handle_set_eta(
    AxumState(app_state): AxumState<AppState>,
    StaffActor(caller): StaffActor,
    Path(case_ref): Path<String>,
    payload: Result<Json<SetEtaRequest>, JsonRejection>,
) -> Result<Json<CaseResponse>, HttpError> {
    let Json(request) = payload?;

    let mut persistence = app_state.persistence.lock().await;
    let response: CaseResponse = safelink_api::set_eta(
        &mut persistence,
        &caller.actor(),
        &case_ref,
        &request,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

/// Handler for POST `/api/emergency/{ref}/images`.
///
/// Reads every `images` part of a multipart body. A request that is not
/// multipart is treated as carrying no files so that lookup and
/// authorization errors still take precedence.
pub async fn handle_append_images(
    AxumState(app_state): AxumState<AppState>,
    CurrentActor(caller): CurrentActor,
    Path(case_ref): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ImagesResponse>), HttpError> {
    let files: Vec<UploadedFile> = match multipart {
        Ok(multipart) => read_form(multipart).await?.1,
        Err(rejection) => {
            debug!(error = %rejection, "Image upload is not multipart");
            Vec::new()
        }
    };
    info!(
        actor_id = %caller.id,
        case_ref = %case_ref,
        files = files.len(),
        "Handling append_images request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ImagesResponse = safelink_api::append_images(
        &mut persistence,
        app_state.media.as_ref(),
        &app_state.upload_policy,
        &caller.actor(),
        &case_ref,
        &files,
        OffsetDateTime::now_utc(),
    )?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Admin variant of [`handle_append_images`].
pub async fn handle_admin_append_images(
    state: AxumState<AppState>,
    StaffActor(caller): StaffActor,
    case_ref: Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ImagesResponse>), HttpError> {
    handle_append_images(state, CurrentActor(caller), case_ref, multipart).await
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"))
}

fn multipart_rejection(rejection: MultipartRejection) -> HttpError {
    debug!(error = %rejection, "Rejected multipart body");
    HttpError::validation(rejection.body_text())
}

/// Splits a multipart body into text fields and `images` files.
///
/// Text parts become JSON strings; unnamed parts are skipped.
async fn read_form(
    mut multipart: Multipart,
) -> Result<(Map<String, Value>, Vec<UploadedFile>), HttpError> {
    let mut fields: Map<String, Value> = Map::new();
    let mut files: Vec<UploadedFile> = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HttpError::validation(e.body_text()))?
    {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };
        if name == IMAGES_FIELD {
            let file_name: String = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| HttpError::validation(e.body_text()))?;
            files.push(UploadedFile::new(file_name, bytes.to_vec()));
        } else {
            let text: String = field
                .text()
                .await
                .map_err(|e| HttpError::validation(e.body_text()))?;
            fields.insert(name, Value::String(text));
        }
    }
    Ok((fields, files))
}

// ============================================================================
// Dispatch directory
// ============================================================================

/// Handler for GET `/api/admin/emergency/incidents`.
pub async fn handle_list_cases(
    AxumState(app_state): AxumState<AppState>,
    StaffActor(caller): StaffActor,
    Query(query): Query<ListCasesQuery>,
) -> Result<Json<ListCasesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListCasesResponse =
        safelink_api::list_cases(&mut persistence, &caller.actor(), &query)?;
    Ok(Json(response))
}

/// Handler for GET `/api/admin/emergency/officers`.
pub async fn handle_list_officers(
    AxumState(app_state): AxumState<AppState>,
    StaffActor(caller): StaffActor,
    Query(query): Query<OfficersQuery>,
) -> Result<Json<OfficersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: OfficersResponse =
        safelink_api::list_officers(&mut persistence, &caller.actor(), &query)?;
    Ok(Json(response))
}

// ============================================================================
// Actor directory
// ============================================================================

/// Handler for GET `/api/admin/users`.
pub async fn handle_list_actors(
    AxumState(app_state): AxumState<AppState>,
    StaffActor(caller): StaffActor,
    Query(query): Query<ListActorsQuery>,
) -> Result<Json<ListActorsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListActorsResponse =
        safelink_api::list_actors(&mut persistence, &caller.actor(), &query)?;
    Ok(Json(response))
}

/// Handler for POST `/api/admin/users`.
pub async fn handle_create_actor(
    AxumState(app_state): AxumState<AppState>,
    StaffActor(caller): StaffActor,
    payload: Result<Json<CreateActorRequest>, JsonRejection>,
) -> Result<Json<ActorResponse>, HttpError> {
    let Json(request) = payload?;

    let mut persistence = app_state.persistence.lock().await;
    let response: ActorResponse = safelink_api::create_actor(
        &mut persistence,
        &caller.actor(),
        &request,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

/// Handler for PATCH `/api/admin/users/{id}`.
pub async fn handle_update_actor(
    AxumState(app_state): AxumState<AppState>,
    StaffActor(caller): StaffActor,
    Path(target): Path<String>,
    payload: Result<Json<UpdateActorRequest>, JsonRejection>,
) -> Result<Json<ActorResponse>, HttpError> {
    let Json(request) = payload?;
    let target_id: ActorId = parse_actor_id(&target)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: ActorResponse = safelink_api::update_actor(
        &mut persistence,
        &caller.actor(),
        target_id,
        &request,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

/// Handler for DELETE `/api/admin/users/{id}`.
pub async fn handle_delete_actor(
    AxumState(app_state): AxumState<AppState>,
    StaffActor(caller): StaffActor,
    Path(target): Path<String>,
) -> Result<Json<DeleteResponse>, HttpError> {
    let target_id: ActorId = parse_actor_id(&target)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteResponse = safelink_api::delete_actor(
        &mut persistence,
        &caller.actor(),
        target_id,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

fn parse_actor_id(raw: &str) -> Result<ActorId, HttpError> {
    raw.trim().parse::<i64>().map(ActorId::new).map_err(|_| {
        HttpError::from(ApiError::InvalidInput {
            field: String::from("id"),
            message: format!("'{raw}' is not a user id"),
        })
    })
}
