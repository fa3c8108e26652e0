// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::apply_create;
use safelink_domain::{
    Actor, ActorId, CaseDraft, CaseId, CaseRecord, CaseStatus, Geolocation, HumanId, IncidentType,
    Priority, Role, VerifiedOfficer,
};
use time::OffsetDateTime;
use time::macros::datetime;

pub const REPORTER_ID: i64 = 1;
pub const OFFICER_ID: i64 = 7;

pub fn created_at() -> OffsetDateTime {
    datetime!(2024-05-01 08:00:00 UTC)
}

pub fn later() -> OffsetDateTime {
    datetime!(2024-05-01 08:05:00 UTC)
}

pub fn create_test_draft() -> CaseDraft {
    CaseDraft {
        reporter_id: ActorId::new(REPORTER_ID),
        incident_type: IncidentType::Medical,
        description: Some(String::from("Collapsed on the platform")),
        location: Geolocation::from_coordinates([79.86, 6.93]).unwrap(),
        location_text: Some(String::from("Fort station")),
        images: Vec::new(),
        priority: Priority::Normal,
        status: CaseStatus::Open,
        casualties: None,
        bystander: Some(true),
    }
}

pub fn create_test_case() -> CaseRecord {
    let human_id: HumanId = HumanId::new(2024, 1).unwrap();
    CaseRecord::new(
        CaseId::new(1),
        apply_create(create_test_draft(), human_id, created_at()),
    )
}

pub fn create_test_officer() -> VerifiedOfficer {
    let officer: Actor = Actor::new(ActorId::new(OFFICER_ID), Role::Officer);
    VerifiedOfficer::verify(&officer).unwrap()
}
