// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use safelink::apply_create;
use safelink_domain::{
    ActorDraft, ActorProfile, CaseDraft, CaseStatus, Geolocation, HumanId, IncidentType, NewCase,
    Priority, Role,
};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::SqlitePersistence;

pub fn created_at() -> OffsetDateTime {
    datetime!(2024-05-01 08:00:00 UTC)
}

pub fn create_test_persistence() -> SqlitePersistence {
    SqlitePersistence::new_in_memory().expect("in-memory database")
}

pub fn create_test_actor_draft(email: &str, role: Role) -> ActorDraft {
    ActorDraft {
        email: email.to_string(),
        full_name: format!("Test {}", role.as_str()),
        role,
        is_verified: true,
        is_active: true,
        ..ActorDraft::default()
    }
}

pub fn create_test_reporter(persistence: &mut SqlitePersistence) -> ActorProfile {
    persistence
        .create_actor(
            &create_test_actor_draft("reporter@example.com", Role::User),
            created_at(),
        )
        .expect("reporter")
}

pub fn create_test_officer(persistence: &mut SqlitePersistence, email: &str) -> ActorProfile {
    let mut draft: ActorDraft = create_test_actor_draft(email, Role::Officer);
    draft.badge_number = Some(String::from("B-100"));
    draft.department = Some(String::from("Colombo Central"));
    persistence.create_actor(&draft, created_at()).expect("officer")
}

pub fn create_test_new_case(
    reporter: &ActorProfile,
    sequence: i64,
    created: OffsetDateTime,
) -> NewCase {
    create_test_new_case_at(reporter, sequence, created, [79.86, 6.93])
}

pub fn create_test_new_case_at(
    reporter: &ActorProfile,
    sequence: i64,
    created: OffsetDateTime,
    coordinates: [f64; 2],
) -> NewCase {
    let draft: CaseDraft = CaseDraft {
        reporter_id: reporter.id,
        incident_type: IncidentType::Medical,
        description: Some(String::from("Collapsed on the platform")),
        location: Geolocation::from_coordinates(coordinates).unwrap(),
        location_text: Some(String::from("Fort station")),
        images: Vec::new(),
        priority: Priority::Normal,
        status: CaseStatus::Open,
        casualties: None,
        bystander: Some(true),
    };
    let human_id: HumanId = HumanId::new(2024, sequence).unwrap();
    apply_create(draft, human_id, created)
}
