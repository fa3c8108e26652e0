// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the authorization policy and actor resolution.

use safelink_domain::{Actor, ActorId, ActorProfile, Role};

use super::helpers::{
    MemoryMediaStore, create_test_actor, create_test_admin, create_test_authority,
    create_test_file, create_test_officer, create_test_persistence, create_test_reporter,
    file_test_case, now,
};
use crate::{
    ApiError, AssignRequest, AuthError, AuthenticationService, AuthorizationService,
    CaseOperation, LooseValue, SetEtaRequest, UpdateCaseRequest, UploadPolicy, append_images,
    assign_case, delete_case, get_case, set_eta, update_case,
};

const ALL_OPERATIONS: [CaseOperation; 6] = [
    CaseOperation::Read,
    CaseOperation::Update,
    CaseOperation::AppendImages,
    CaseOperation::Delete,
    CaseOperation::Assign,
    CaseOperation::SetEta,
];

fn assert_forbidden<T: std::fmt::Debug>(result: Result<T, ApiError>, expected_action: &str) {
    match result {
        Err(ApiError::Forbidden { action, .. }) => assert_eq!(action, expected_action),
        other => panic!("Expected Forbidden, got: {other:?}"),
    }
}

#[test]
fn test_staff_may_do_everything() {
    let mut persistence = create_test_persistence();
    let reporter: ActorProfile = create_test_reporter(&mut persistence);
    let authority: ActorProfile = create_test_authority(&mut persistence);
    let admin: ActorProfile = create_test_admin(&mut persistence);
    file_test_case(&mut persistence, &reporter);
    let case = persistence
        .get_case_by_human_id(&"INC-2024-00001".parse().unwrap())
        .unwrap()
        .unwrap();

    for staff in [&authority, &admin] {
        for operation in ALL_OPERATIONS {
            assert!(AuthorizationService::can_mutate(
                &staff.actor(),
                &case,
                operation
            ));
        }
    }
}

#[test]
fn test_reporter_is_limited_to_own_cases_and_non_staff_operations() {
    let mut persistence = create_test_persistence();
    let reporter: ActorProfile = create_test_reporter(&mut persistence);
    let stranger: ActorProfile =
        create_test_actor(&mut persistence, "stranger@example.com", Role::User);
    file_test_case(&mut persistence, &reporter);
    let case = persistence
        .get_case_by_human_id(&"INC-2024-00001".parse().unwrap())
        .unwrap()
        .unwrap();

    for operation in ALL_OPERATIONS {
        assert_eq!(
            AuthorizationService::can_mutate(&reporter.actor(), &case, operation),
            !operation.is_staff_only(),
            "{operation:?}"
        );
        assert!(!AuthorizationService::can_mutate(
            &stranger.actor(),
            &case,
            operation
        ));
    }
}

#[test]
fn test_officer_is_not_staff_for_cases() {
    let mut persistence = create_test_persistence();
    let reporter: ActorProfile = create_test_reporter(&mut persistence);
    let officer: ActorProfile = create_test_officer(&mut persistence, "o@example.com");
    file_test_case(&mut persistence, &reporter);

    assert_forbidden(
        get_case(&mut persistence, &officer.actor(), "INC-2024-00001"),
        "read_case",
    );
    assert_forbidden(
        update_case(
            &mut persistence,
            &officer.actor(),
            "INC-2024-00001",
            &UpdateCaseRequest::default(),
            now(),
        ),
        "update_case",
    );
}

#[test]
fn test_stranger_is_forbidden_on_every_case_operation() {
    let mut persistence = create_test_persistence();
    let reporter: ActorProfile = create_test_reporter(&mut persistence);
    let stranger: ActorProfile =
        create_test_actor(&mut persistence, "stranger@example.com", Role::User);
    let created = file_test_case(&mut persistence, &reporter);
    let media: MemoryMediaStore = MemoryMediaStore::default();

    assert_forbidden(
        get_case(&mut persistence, &stranger.actor(), "INC-2024-00001"),
        "read_case",
    );
    assert_forbidden(
        update_case(
            &mut persistence,
            &stranger.actor(),
            "INC-2024-00001",
            &UpdateCaseRequest {
                description: Some(LooseValue::from("hijacked")),
                ..UpdateCaseRequest::default()
            },
            now(),
        ),
        "update_case",
    );
    assert_forbidden(
        append_images(
            &mut persistence,
            &media,
            &UploadPolicy::default(),
            &stranger.actor(),
            "INC-2024-00001",
            &[create_test_file("a.jpg")],
            now(),
        ),
        "append_images",
    );
    assert_forbidden(
        delete_case(&mut persistence, &stranger.actor(), "INC-2024-00001"),
        "delete_case",
    );

    assert!(media.stored().is_empty());
    let unchanged = get_case(&mut persistence, &reporter.actor(), "INC-2024-00001").unwrap();
    assert_eq!(unchanged, created);
}

#[test]
fn test_reporter_cannot_assign_or_set_eta_on_own_case() {
    let mut persistence = create_test_persistence();
    let reporter: ActorProfile = create_test_reporter(&mut persistence);
    let officer: ActorProfile = create_test_officer(&mut persistence, "o@example.com");
    file_test_case(&mut persistence, &reporter);

    assert_forbidden(
        assign_case(
            &mut persistence,
            &reporter.actor(),
            "INC-2024-00001",
            &AssignRequest {
                officer_id: Some(LooseValue::from(officer.id.value())),
                ..AssignRequest::default()
            },
            now(),
        ),
        "assign_case",
    );
    assert_forbidden(
        set_eta(
            &mut persistence,
            &reporter.actor(),
            "INC-2024-00001",
            &SetEtaRequest {
                eta_minutes: Some(LooseValue::from(4)),
            },
            now(),
        ),
        "set_eta",
    );
}

#[test]
fn test_not_found_takes_precedence_over_forbidden() {
    let mut persistence = create_test_persistence();
    let stranger: ActorProfile =
        create_test_actor(&mut persistence, "stranger@example.com", Role::User);

    let result = get_case(&mut persistence, &stranger.actor(), "INC-2024-00042");

    assert!(matches!(result, Err(ApiError::NotFound { .. })));
}

#[test]
fn test_only_staff_pass_the_staff_check() {
    for (role, allowed) in [
        (Role::User, false),
        (Role::Officer, false),
        (Role::Authority, true),
        (Role::Admin, true),
    ] {
        let actor: Actor = Actor::new(ActorId::new(1), role);
        assert_eq!(
            AuthorizationService::authorize_staff(&actor, "list_cases").is_ok(),
            allowed,
            "{role}"
        );
    }
}

#[test]
fn test_can_touch_actor_matrix() {
    let mut persistence = create_test_persistence();
    let user: ActorProfile = create_test_reporter(&mut persistence);
    let officer: ActorProfile = create_test_officer(&mut persistence, "o@example.com");
    let authority: ActorProfile = create_test_authority(&mut persistence);
    let admin: ActorProfile = create_test_admin(&mut persistence);
    let targets: [&ActorProfile; 4] = [&user, &officer, &authority, &admin];

    for target in targets {
        assert!(AuthorizationService::can_touch_actor(&admin.actor(), target));
        assert_eq!(
            AuthorizationService::can_touch_actor(&authority.actor(), target),
            target.role != Role::Admin
        );
        assert!(!AuthorizationService::can_touch_actor(&user.actor(), target));
        assert!(!AuthorizationService::can_touch_actor(
            &officer.actor(),
            target
        ));
    }
}

#[test]
fn test_only_admin_may_assign_admin_role() {
    let authority: Actor = Actor::new(ActorId::new(1), Role::Authority);
    let admin: Actor = Actor::new(ActorId::new(2), Role::Admin);

    assert!(matches!(
        AuthorizationService::authorize_role_assignment(&authority, Role::Admin, "update_actor"),
        Err(AuthError::Forbidden { .. })
    ));
    assert!(
        AuthorizationService::authorize_role_assignment(&authority, Role::Officer, "update_actor")
            .is_ok()
    );
    assert!(
        AuthorizationService::authorize_role_assignment(&admin, Role::Admin, "update_actor")
            .is_ok()
    );
}

#[test]
fn test_resolve_actor_accepts_live_active_actors() {
    let mut persistence = create_test_persistence();
    let reporter: ActorProfile = create_test_reporter(&mut persistence);

    let resolved: ActorProfile =
        AuthenticationService::resolve_actor(&mut persistence, reporter.id).unwrap();

    assert_eq!(resolved, reporter);
}

#[test]
fn test_resolve_actor_rejects_unknown_inactive_and_deleted() {
    let mut persistence = create_test_persistence();
    let mut inactive: ActorProfile =
        create_test_actor(&mut persistence, "inactive@example.com", Role::User);
    inactive.is_active = false;
    persistence.update_actor(&inactive).unwrap();
    let deleted: ActorProfile =
        create_test_actor(&mut persistence, "deleted@example.com", Role::User);
    persistence.soft_delete_actor(deleted.id, now()).unwrap();

    for actor_id in [ActorId::new(9_999), inactive.id, deleted.id] {
        let result = AuthenticationService::resolve_actor(&mut persistence, actor_id);
        assert!(
            matches!(result, Err(AuthError::AuthenticationFailed { .. })),
            "{actor_id}"
        );
    }
}
