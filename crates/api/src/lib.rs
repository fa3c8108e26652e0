// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the incident case subsystem.
//!
//! Handlers take a resolved `Actor`, enforce the authorization policy,
//! drive the pure lifecycle engine and translate every lower-layer error
//! into `ApiError`. Nothing here knows about HTTP.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod actors;
mod auth;
mod directory;
mod error;
mod handlers;
mod media;
mod request_response;

#[cfg(test)]
mod tests;

pub use actors::{
    SEED_ADMIN_NAME, create_actor, delete_actor, list_actors, seed_admin, update_actor,
    update_own_profile, whoami,
};
pub use auth::{AuthenticationService, AuthorizationService, CaseOperation};
pub use directory::{list_cases, list_officers};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    active_case, append_images, assign_case, create_case, create_case_with_images, delete_case,
    get_case, list_my_cases, set_eta, update_case,
};
pub use media::{
    DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_FILES, MediaError, MediaStore, UploadPolicy, UploadedFile,
    stored_file_name,
};
pub use request_response::{
    ActiveCaseResponse, ActorResponse, AssignRequest, CaseResponse, CreateActorRequest,
    CreateCaseRequest, DeleteResponse, ImagesResponse, IncidentInfo, ListActorsQuery,
    ListActorsResponse, ListCasesQuery, ListCasesResponse, LocationInfo, LooseValue,
    MyCasesResponse, OfficerInfo, OfficerSummary, OfficersQuery, OfficersResponse,
    ReporterSummary, SetEtaRequest, Specializations, UpdateActorRequest, UpdateCaseRequest,
    UpdateProfileRequest, WhoAmIResponse, parse_flag, parse_int,
};
