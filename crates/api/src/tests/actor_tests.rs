// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for actor directory management.

use safelink_domain::{ActorId, ActorProfile, Role};
use time::Duration;

use super::helpers::{
    create_test_actor, create_test_admin, create_test_authority, create_test_officer,
    create_test_persistence, create_test_reporter, now,
};
use crate::{
    ActorResponse, ApiError, CreateActorRequest, ListActorsQuery, ListActorsResponse, LooseValue,
    SEED_ADMIN_NAME, Specializations, UpdateActorRequest, UpdateProfileRequest, create_actor,
    delete_actor, list_actors, seed_admin, update_actor, update_own_profile, whoami,
};

fn create_request(email: &str, role: &str) -> CreateActorRequest {
    CreateActorRequest {
        email: email.to_string(),
        full_name: String::from("  Nimal Fernando "),
        role: Some(role.to_string()),
        department: Some(String::from("Traffic")),
        badge_number: Some(String::from("T-7")),
        specializations: Some(Specializations::Text(String::from("traffic, , first aid"))),
        ..CreateActorRequest::default()
    }
}

fn emails(response: &ListActorsResponse) -> Vec<&str> {
    response
        .items
        .iter()
        .map(|profile| profile.email.as_str())
        .collect()
}

#[test]
fn test_create_officer_keeps_officer_fields() {
    let mut persistence = create_test_persistence();
    let authority: ActorProfile = create_test_authority(&mut persistence);

    let response: ActorResponse = create_actor(
        &mut persistence,
        &authority.actor(),
        &create_request("  Nimal@Example.COM ", "officer"),
        now(),
    )
    .unwrap();

    assert!(response.success);
    let created: ActorProfile = response.user;
    assert_eq!(created.email, "nimal@example.com");
    assert_eq!(created.full_name, "Nimal Fernando");
    assert_eq!(created.role, Role::Officer);
    assert_eq!(created.department.as_deref(), Some("Traffic"));
    assert_eq!(created.badge_number.as_deref(), Some("T-7"));
    assert_eq!(created.specializations, vec!["traffic", "first aid"]);
    assert!(created.is_active);
    assert!(!created.is_verified);
    assert_eq!(created.verified_by, None);
}

#[test]
fn test_create_non_officer_drops_officer_fields() {
    let mut persistence = create_test_persistence();
    let authority: ActorProfile = create_test_authority(&mut persistence);

    let created: ActorProfile = create_actor(
        &mut persistence,
        &authority.actor(),
        &CreateActorRequest {
            role: None,
            is_verified: Some(LooseValue::from(true)),
            is_active: Some(LooseValue::from("0")),
            ..create_request("citizen@example.com", "user")
        },
        now(),
    )
    .unwrap()
    .user;

    assert_eq!(created.role, Role::User);
    assert_eq!(created.department, None);
    assert_eq!(created.badge_number, None);
    assert!(created.specializations.is_empty());
    assert!(created.is_verified);
    assert_eq!(created.verified_by, Some(authority.id));
    assert!(!created.is_active);
}

#[test]
fn test_create_rejects_bad_input() {
    let mut persistence = create_test_persistence();
    let authority: ActorProfile = create_test_authority(&mut persistence);

    let bad_role = create_actor(
        &mut persistence,
        &authority.actor(),
        &create_request("a@example.com", "mayor"),
        now(),
    );
    assert!(matches!(bad_role, Err(ApiError::InvalidInput { field, .. }) if field == "role"));

    let bad_email = create_actor(
        &mut persistence,
        &authority.actor(),
        &create_request("not-an-email", "user"),
        now(),
    );
    assert!(matches!(bad_email, Err(ApiError::InvalidInput { field, .. }) if field == "email"));

    let blank_name = create_actor(
        &mut persistence,
        &authority.actor(),
        &CreateActorRequest {
            full_name: String::from("   "),
            ..create_request("b@example.com", "user")
        },
        now(),
    );
    assert!(
        matches!(blank_name, Err(ApiError::InvalidInput { field, .. }) if field == "fullName")
    );
}

#[test]
fn test_create_requires_staff_and_admin_for_admins() {
    let mut persistence = create_test_persistence();
    let reporter: ActorProfile = create_test_reporter(&mut persistence);
    let authority: ActorProfile = create_test_authority(&mut persistence);
    let admin: ActorProfile = create_test_admin(&mut persistence);

    let by_user = create_actor(
        &mut persistence,
        &reporter.actor(),
        &create_request("a@example.com", "user"),
        now(),
    );
    assert!(matches!(by_user, Err(ApiError::Forbidden { .. })));

    let admin_by_authority = create_actor(
        &mut persistence,
        &authority.actor(),
        &create_request("root@example.com", "admin"),
        now(),
    );
    assert!(matches!(admin_by_authority, Err(ApiError::Forbidden { .. })));

    let admin_by_admin: ActorProfile = create_actor(
        &mut persistence,
        &admin.actor(),
        &create_request("root@example.com", "admin"),
        now(),
    )
    .unwrap()
    .user;
    assert_eq!(admin_by_admin.role, Role::Admin);
}

#[test]
fn test_duplicate_email_is_a_conflict() {
    let mut persistence = create_test_persistence();
    let authority: ActorProfile = create_test_authority(&mut persistence);
    create_test_reporter(&mut persistence);

    let result = create_actor(
        &mut persistence,
        &authority.actor(),
        &create_request("REPORTER@example.com", "user"),
        now(),
    );

    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_authority_cannot_touch_admins() {
    let mut persistence = create_test_persistence();
    let authority: ActorProfile = create_test_authority(&mut persistence);
    let admin: ActorProfile = create_test_admin(&mut persistence);

    let update = update_actor(
        &mut persistence,
        &authority.actor(),
        admin.id,
        &UpdateActorRequest {
            full_name: Some(String::from("Renamed")),
            ..UpdateActorRequest::default()
        },
        now(),
    );
    assert!(matches!(update, Err(ApiError::Forbidden { .. })));

    let delete = delete_actor(&mut persistence, &authority.actor(), admin.id, now());
    assert!(matches!(delete, Err(ApiError::Forbidden { .. })));

    let unchanged: ActorProfile = persistence.get_actor(admin.id).unwrap().unwrap();
    assert_eq!(unchanged, admin);
}

#[test]
fn test_authority_cannot_promote_to_admin() {
    let mut persistence = create_test_persistence();
    let reporter: ActorProfile = create_test_reporter(&mut persistence);
    let authority: ActorProfile = create_test_authority(&mut persistence);

    let result = update_actor(
        &mut persistence,
        &authority.actor(),
        reporter.id,
        &UpdateActorRequest {
            role: Some(String::from("admin")),
            ..UpdateActorRequest::default()
        },
        now(),
    );

    assert!(matches!(result, Err(ApiError::Forbidden { .. })));
}

#[test]
fn test_update_role_change_manages_officer_fields() {
    let mut persistence = create_test_persistence();
    let reporter: ActorProfile = create_test_reporter(&mut persistence);
    let authority: ActorProfile = create_test_authority(&mut persistence);

    let promoted: ActorProfile = update_actor(
        &mut persistence,
        &authority.actor(),
        reporter.id,
        &UpdateActorRequest {
            role: Some(String::from("officer")),
            badge_number: Some(String::from("B-300")),
            specializations: Some(Specializations::List(vec![
                String::from("rescue"),
                String::from(" "),
            ])),
            ..UpdateActorRequest::default()
        },
        now(),
    )
    .unwrap()
    .user;
    assert_eq!(promoted.role, Role::Officer);
    assert_eq!(promoted.badge_number.as_deref(), Some("B-300"));
    assert_eq!(promoted.specializations, vec!["rescue"]);

    let demoted: ActorProfile = update_actor(
        &mut persistence,
        &authority.actor(),
        reporter.id,
        &UpdateActorRequest {
            role: Some(String::from("user")),
            badge_number: Some(String::from("B-999")),
            ..UpdateActorRequest::default()
        },
        now(),
    )
    .unwrap()
    .user;
    assert_eq!(demoted.role, Role::User);
    assert_eq!(demoted.badge_number, None);
    assert!(demoted.specializations.is_empty());
}

#[test]
fn test_update_leaves_absent_fields_and_rejects_blank_name() {
    let mut persistence = create_test_persistence();
    let authority: ActorProfile = create_test_authority(&mut persistence);
    let officer: ActorProfile = create_test_officer(&mut persistence, "o@example.com");

    let updated: ActorProfile = update_actor(
        &mut persistence,
        &authority.actor(),
        officer.id,
        &UpdateActorRequest {
            contact: Some(String::from(" 0771234567 ")),
            ..UpdateActorRequest::default()
        },
        now(),
    )
    .unwrap()
    .user;
    assert_eq!(updated.contact.as_deref(), Some("0771234567"));
    assert_eq!(updated.full_name, officer.full_name);
    assert_eq!(updated.department, officer.department);
    assert_eq!(updated.badge_number, officer.badge_number);

    let blank = update_actor(
        &mut persistence,
        &authority.actor(),
        officer.id,
        &UpdateActorRequest {
            full_name: Some(String::from("  ")),
            ..UpdateActorRequest::default()
        },
        now(),
    );
    assert!(matches!(blank, Err(ApiError::InvalidInput { field, .. }) if field == "fullName"));
}

#[test]
fn test_verification_toggle_tracks_verifier() {
    let mut persistence = create_test_persistence();
    let authority: ActorProfile = create_test_authority(&mut persistence);
    let pending: ActorProfile = create_actor(
        &mut persistence,
        &authority.actor(),
        &create_request("pending@example.com", "user"),
        now(),
    )
    .unwrap()
    .user;

    let verified: ActorProfile = update_actor(
        &mut persistence,
        &authority.actor(),
        pending.id,
        &UpdateActorRequest {
            is_verified: Some(LooseValue::from("true")),
            ..UpdateActorRequest::default()
        },
        now(),
    )
    .unwrap()
    .user;
    assert!(verified.is_verified);
    assert_eq!(verified.verified_by, Some(authority.id));

    let revoked: ActorProfile = update_actor(
        &mut persistence,
        &authority.actor(),
        pending.id,
        &UpdateActorRequest {
            is_verified: Some(LooseValue::from(0)),
            ..UpdateActorRequest::default()
        },
        now(),
    )
    .unwrap()
    .user;
    assert!(!revoked.is_verified);
    assert_eq!(revoked.verified_by, None);
}

#[test]
fn test_update_unknown_actor_is_not_found() {
    let mut persistence = create_test_persistence();
    let authority: ActorProfile = create_test_authority(&mut persistence);

    let result = update_actor(
        &mut persistence,
        &authority.actor(),
        ActorId::new(4_242),
        &UpdateActorRequest::default(),
        now(),
    );

    assert!(matches!(result, Err(ApiError::NotFound { .. })));
}

#[test]
fn test_delete_is_soft_and_frees_the_email() {
    let mut persistence = create_test_persistence();
    let reporter: ActorProfile = create_test_reporter(&mut persistence);
    let authority: ActorProfile = create_test_authority(&mut persistence);

    let response = delete_actor(&mut persistence, &authority.actor(), reporter.id, now()).unwrap();
    assert!(response.success);
    assert_eq!(response.message, "User reporter@example.com deleted");

    let again = delete_actor(&mut persistence, &authority.actor(), reporter.id, now());
    assert!(matches!(again, Err(ApiError::NotFound { .. })));
    assert!(persistence.get_actor(reporter.id).unwrap().is_none());

    let reused: ActorProfile = create_actor(
        &mut persistence,
        &authority.actor(),
        &create_request("reporter@example.com", "user"),
        now(),
    )
    .unwrap()
    .user;
    assert_ne!(reused.id, reporter.id);
}

#[test]
fn test_list_hides_admins_from_authorities() {
    let mut persistence = create_test_persistence();
    create_test_reporter(&mut persistence);
    let authority: ActorProfile = create_test_authority(&mut persistence);
    let admin: ActorProfile = create_test_admin(&mut persistence);

    let for_authority: ListActorsResponse =
        list_actors(&mut persistence, &authority.actor(), &ListActorsQuery::default()).unwrap();
    assert_eq!(for_authority.total, 2);
    assert_eq!(
        emails(&for_authority),
        vec!["dispatch@example.com", "reporter@example.com"]
    );
    assert_eq!(for_authority.limit, 20);

    let for_admin: ListActorsResponse =
        list_actors(&mut persistence, &admin.actor(), &ListActorsQuery::default()).unwrap();
    assert_eq!(for_admin.total, 3);
}

#[test]
fn test_list_filters() {
    let mut persistence = create_test_persistence();
    create_test_reporter(&mut persistence);
    let authority: ActorProfile = create_test_authority(&mut persistence);
    create_test_officer(&mut persistence, "o@example.com");
    let mut inactive: ActorProfile =
        create_test_actor(&mut persistence, "inactive@example.com", Role::User);
    inactive.is_active = false;
    persistence.update_actor(&inactive).unwrap();

    let officers: ListActorsResponse = list_actors(
        &mut persistence,
        &authority.actor(),
        &ListActorsQuery {
            role: Some(String::from("officer")),
            ..ListActorsQuery::default()
        },
    )
    .unwrap();
    assert_eq!(emails(&officers), vec!["o@example.com"]);

    let inactive_only: ListActorsResponse = list_actors(
        &mut persistence,
        &authority.actor(),
        &ListActorsQuery {
            is_active: Some(String::from("false")),
            ..ListActorsQuery::default()
        },
    )
    .unwrap();
    assert_eq!(emails(&inactive_only), vec!["inactive@example.com"]);

    let by_text: ListActorsResponse = list_actors(
        &mut persistence,
        &authority.actor(),
        &ListActorsQuery {
            q: Some(String::from("DISPATCH")),
            ..ListActorsQuery::default()
        },
    )
    .unwrap();
    assert_eq!(emails(&by_text), vec!["dispatch@example.com"]);

    let bad_role = list_actors(
        &mut persistence,
        &authority.actor(),
        &ListActorsQuery {
            role: Some(String::from("mayor")),
            ..ListActorsQuery::default()
        },
    );
    assert!(matches!(bad_role, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_list_requires_staff() {
    let mut persistence = create_test_persistence();
    let officer: ActorProfile = create_test_officer(&mut persistence, "o@example.com");

    let result = list_actors(&mut persistence, &officer.actor(), &ListActorsQuery::default());

    assert!(matches!(result, Err(ApiError::Forbidden { .. })));
}

#[test]
fn test_seed_admin_is_idempotent() {
    let mut persistence = create_test_persistence();

    let seeded: ActorProfile = seed_admin(&mut persistence, " Root@Example.com ", now())
        .unwrap()
        .unwrap();
    assert_eq!(seeded.email, "root@example.com");
    assert_eq!(seeded.full_name, SEED_ADMIN_NAME);
    assert_eq!(seeded.role, Role::Admin);
    assert!(seeded.is_verified);
    assert!(seeded.is_active);

    assert!(
        seed_admin(&mut persistence, "root@example.com", now())
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_whoami_returns_own_entry() {
    let mut persistence = create_test_persistence();
    let officer: ActorProfile = create_test_officer(&mut persistence, "o@example.com");

    let response = whoami(&mut persistence, &officer.actor()).unwrap();

    assert!(response.success);
    assert_eq!(response.user, officer);
}

#[test]
fn test_own_profile_update_changes_descriptive_fields_only() {
    let mut persistence = create_test_persistence();
    let reporter: ActorProfile = create_test_reporter(&mut persistence);
    let request: UpdateProfileRequest = UpdateProfileRequest {
        full_name: Some(String::from("  Kamala Silva ")),
        contact: Some(String::from("0771234567")),
        address: Some(String::from("  ")),
        nic: Some(String::from("901234567V")),
        department: Some(String::from("Traffic")),
        badge_number: Some(String::from("T-1")),
        specializations: Some(Specializations::Text(String::from("first aid"))),
    };

    let response: ActorResponse = update_own_profile(
        &mut persistence,
        &reporter.actor(),
        &request,
        now() + Duration::hours(1),
    )
    .unwrap();

    assert_eq!(response.user.full_name, "Kamala Silva");
    assert_eq!(response.user.contact.as_deref(), Some("0771234567"));
    assert_eq!(response.user.address, None);
    assert_eq!(response.user.nic.as_deref(), Some("901234567V"));
    assert_eq!(response.user.department, None);
    assert_eq!(response.user.badge_number, None);
    assert!(response.user.specializations.is_empty());
    assert_eq!(response.user.role, Role::User);
    assert_eq!(response.user.email, reporter.email);
    assert_eq!(response.user.updated_at, now() + Duration::hours(1));

    let stored = whoami(&mut persistence, &reporter.actor()).unwrap();
    assert_eq!(stored.user, response.user);
}

#[test]
fn test_own_profile_update_keeps_officer_fields_for_officers() {
    let mut persistence = create_test_persistence();
    let officer: ActorProfile = create_test_officer(&mut persistence, "o@example.com");
    let request: UpdateProfileRequest = UpdateProfileRequest {
        department: Some(String::from("Kandy North")),
        specializations: Some(Specializations::List(vec![
            String::from("rescue"),
            String::from(" "),
        ])),
        ..UpdateProfileRequest::default()
    };

    let response: ActorResponse =
        update_own_profile(&mut persistence, &officer.actor(), &request, now()).unwrap();

    assert_eq!(response.user.department.as_deref(), Some("Kandy North"));
    assert_eq!(response.user.badge_number.as_deref(), Some("B-100"));
    assert_eq!(response.user.specializations, vec![String::from("rescue")]);
    assert_eq!(response.user.full_name, officer.full_name);
}

#[test]
fn test_own_profile_update_rejects_blank_name() {
    let mut persistence = create_test_persistence();
    let reporter: ActorProfile = create_test_reporter(&mut persistence);
    let request: UpdateProfileRequest = UpdateProfileRequest {
        full_name: Some(String::from("   ")),
        contact: Some(String::from("0770000000")),
        ..UpdateProfileRequest::default()
    };

    let result = update_own_profile(&mut persistence, &reporter.actor(), &request, now());

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
    let stored = whoami(&mut persistence, &reporter.actor()).unwrap();
    assert_eq!(stored.user, reporter);
}
