// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Actor, ActorDraft, ActorId, DomainError, Role, VerifiedOfficer};

fn create_test_actor(id: i64, role: Role, is_active: bool) -> Actor {
    Actor {
        id: ActorId::new(id),
        role,
        is_verified: true,
        is_active,
    }
}

#[test]
fn test_active_officer_verifies() {
    let officer: Actor = create_test_actor(4, Role::Officer, true);
    let verified: VerifiedOfficer = VerifiedOfficer::verify(&officer).unwrap();
    assert_eq!(verified.id(), ActorId::new(4));
}

#[test]
fn test_inactive_officer_is_rejected() {
    let officer: Actor = create_test_actor(4, Role::Officer, false);
    assert_eq!(
        VerifiedOfficer::verify(&officer),
        Err(DomainError::OfficerNotFound { officer_id: 4 })
    );
}

#[test]
fn test_non_officer_is_rejected() {
    for role in [Role::User, Role::Authority, Role::Admin] {
        let actor: Actor = create_test_actor(5, role, true);
        assert!(VerifiedOfficer::verify(&actor).is_err());
    }
}

#[test]
fn test_draft_normalizes_email_and_wipes_officer_fields() {
    let draft: ActorDraft = ActorDraft {
        email: String::from("  Jane@Example.COM "),
        full_name: String::from(" Jane Perera "),
        role: Role::User,
        department: Some(String::from("Traffic")),
        badge_number: Some(String::from("B-12")),
        specializations: vec![String::from("first aid")],
        ..ActorDraft::default()
    };
    let normalized: ActorDraft = draft.normalized().unwrap();

    assert_eq!(normalized.email, "jane@example.com");
    assert_eq!(normalized.full_name, "Jane Perera");
    assert_eq!(normalized.department, None);
    assert_eq!(normalized.badge_number, None);
    assert!(normalized.specializations.is_empty());
}

#[test]
fn test_draft_keeps_officer_fields_for_officers() {
    let draft: ActorDraft = ActorDraft {
        email: String::from("o@example.com"),
        full_name: String::from("Officer O"),
        role: Role::Officer,
        badge_number: Some(String::from("B-12")),
        ..ActorDraft::default()
    };
    let normalized: ActorDraft = draft.normalized().unwrap();
    assert_eq!(normalized.badge_number.as_deref(), Some("B-12"));
}

#[test]
fn test_draft_requires_email_and_name() {
    let no_email: ActorDraft = ActorDraft {
        email: String::from("not-an-email"),
        full_name: String::from("Name"),
        ..ActorDraft::default()
    };
    assert!(matches!(
        no_email.normalized(),
        Err(DomainError::InvalidActorField { field: "email", .. })
    ));

    let no_name: ActorDraft = ActorDraft {
        email: String::from("a@b.c"),
        full_name: String::from("   "),
        ..ActorDraft::default()
    };
    assert!(matches!(
        no_name.normalized(),
        Err(DomainError::InvalidActorField { field: "fullName", .. })
    ));
}
