// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::sync::Mutex;

use safelink_domain::{ActorDraft, ActorProfile, Role};
use safelink_persistence::SqlitePersistence;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{
    CaseResponse, CreateCaseRequest, LooseValue, MediaError, MediaStore, UploadedFile, create_case,
};

pub fn now() -> OffsetDateTime {
    datetime!(2024-05-01 08:00:00 UTC)
}

pub fn create_test_persistence() -> SqlitePersistence {
    SqlitePersistence::new_in_memory().expect("in-memory database")
}

pub fn create_test_actor(
    persistence: &mut SqlitePersistence,
    email: &str,
    role: Role,
) -> ActorProfile {
    let draft: ActorDraft = ActorDraft {
        email: email.to_string(),
        full_name: format!("Test {role}"),
        role,
        is_verified: true,
        is_active: true,
        ..ActorDraft::default()
    };
    persistence.create_actor(&draft, now()).expect("actor")
}

pub fn create_test_reporter(persistence: &mut SqlitePersistence) -> ActorProfile {
    create_test_actor(persistence, "reporter@example.com", Role::User)
}

pub fn create_test_authority(persistence: &mut SqlitePersistence) -> ActorProfile {
    create_test_actor(persistence, "dispatch@example.com", Role::Authority)
}

pub fn create_test_admin(persistence: &mut SqlitePersistence) -> ActorProfile {
    create_test_actor(persistence, "admin@example.com", Role::Admin)
}

pub fn create_test_officer(persistence: &mut SqlitePersistence, email: &str) -> ActorProfile {
    let draft: ActorDraft = ActorDraft {
        email: email.to_string(),
        full_name: String::from("Officer Perera"),
        role: Role::Officer,
        department: Some(String::from("Colombo Central")),
        badge_number: Some(String::from("B-100")),
        is_verified: true,
        is_active: true,
        ..ActorDraft::default()
    };
    persistence.create_actor(&draft, now()).expect("officer")
}

pub fn create_test_case_request() -> CreateCaseRequest {
    CreateCaseRequest {
        incident_type: Some(String::from("medical")),
        description: Some(String::from("  Collapsed on the platform  ")),
        lat: Some(LooseValue::Number(6.93)),
        lng: Some(LooseValue::Number(79.86)),
        address: Some(String::from("Fort station")),
        ..CreateCaseRequest::default()
    }
}

/// Files a standard case as `reporter`.
pub fn file_test_case(
    persistence: &mut SqlitePersistence,
    reporter: &ActorProfile,
) -> CaseResponse {
    create_case(
        persistence,
        &reporter.actor(),
        &create_test_case_request(),
        now(),
    )
    .expect("case")
}

pub fn create_test_file(name: &str) -> UploadedFile {
    UploadedFile::new(name.to_string(), vec![0xFF, 0xD8, 0xFF])
}

/// Keeps stored file names in memory and returns predictable URIs.
#[derive(Default)]
pub struct MemoryMediaStore {
    pub stored: Mutex<Vec<String>>,
}

impl MemoryMediaStore {
    pub fn stored(&self) -> Vec<String> {
        self.stored.lock().unwrap().clone()
    }
}

impl MediaStore for MemoryMediaStore {
    fn store(&self, file: &UploadedFile, _now: OffsetDateTime) -> Result<String, MediaError> {
        self.stored.lock().unwrap().push(file.file_name.clone());
        Ok(format!("https://media.test/{}", file.file_name))
    }
}

/// Fails every write.
pub struct FailingMediaStore;

impl MediaStore for FailingMediaStore {
    fn store(&self, _file: &UploadedFile, _now: OffsetDateTime) -> Result<String, MediaError> {
        Err(MediaError::Storage(String::from("disk full")))
    }
}
