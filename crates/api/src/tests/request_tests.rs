// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for lenient request decoding.

use safelink_domain::{CoordinateInput, Geolocation};

use crate::{
    CreateCaseRequest, LooseValue, Specializations, UpdateCaseRequest, parse_flag, parse_int,
};

#[test]
fn test_parse_int_reads_leading_digits() {
    assert_eq!(parse_int("42"), Some(42));
    assert_eq!(parse_int("  15min"), Some(15));
    assert_eq!(parse_int("+4"), Some(4));
    assert_eq!(parse_int("-7 days"), Some(-7));
    assert_eq!(parse_int(""), None);
    assert_eq!(parse_int("-"), None);
    assert_eq!(parse_int("soon"), None);
}

#[test]
fn test_parse_flag() {
    assert_eq!(parse_flag("true"), Some(true));
    assert_eq!(parse_flag(" 1 "), Some(true));
    assert_eq!(parse_flag("false"), Some(false));
    assert_eq!(parse_flag("0"), Some(false));
    assert_eq!(parse_flag("yes"), None);
}

#[test]
fn test_loose_int() {
    assert_eq!(LooseValue::Number(3.9).as_int(), Some(3));
    assert_eq!(LooseValue::Number(-2.7).as_int(), Some(-2));
    assert_eq!(LooseValue::Number(f64::NAN).as_int(), None);
    assert_eq!(LooseValue::from("12 minutes").as_int(), Some(12));
    assert_eq!(LooseValue::from("later").as_int(), None);
    assert_eq!(LooseValue::Bool(true).as_int(), None);
    assert_eq!(LooseValue::Null.as_int(), None);
}

#[test]
fn test_loose_flags() {
    assert_eq!(LooseValue::from(true).as_flag(), Some(true));
    assert_eq!(LooseValue::from(0).as_flag(), Some(false));
    assert_eq!(LooseValue::from(1).as_flag(), Some(true));
    assert_eq!(LooseValue::Number(0.5).as_flag(), None);
    assert_eq!(LooseValue::from(2).as_flag(), None);
    assert_eq!(LooseValue::from("false").as_flag(), Some(false));
    assert_eq!(LooseValue::Null.as_flag(), None);

    assert!(LooseValue::from("true").is_true());
    assert!(!LooseValue::from("1").is_true());
    assert!(!LooseValue::from(1).is_true());
}

#[test]
fn test_loose_text_treats_falsy_values_as_empty() {
    assert_eq!(LooseValue::Null.as_text(), "");
    assert_eq!(LooseValue::from(false).as_text(), "");
    assert_eq!(LooseValue::from(0).as_text(), "");
    assert_eq!(LooseValue::from("").as_text(), "");
    assert_eq!(LooseValue::from(true).as_text(), "true");
    assert_eq!(LooseValue::from(5).as_text(), "5");
    assert_eq!(LooseValue::Number(2.5).as_text(), "2.5");
    assert_eq!(LooseValue::from("Bring stretcher").as_text(), "Bring stretcher");
}

#[test]
fn test_update_request_keeps_null_distinct_from_absent() {
    let request: UpdateCaseRequest = serde_json::from_str(
        r#"{"description": null, "etaMinutes": "15", "bystander": true, "priority": null}"#,
    )
    .unwrap();

    assert_eq!(request.description, Some(LooseValue::Null));
    assert_eq!(request.eta_minutes, Some(LooseValue::from("15")));
    assert_eq!(request.bystander, Some(LooseValue::Bool(true)));
    assert_eq!(request.assignment_note, None);
    assert_eq!(request.casualties, None);
    assert_eq!(request.priority, None);
    assert_eq!(request.incident_type, None);
}

#[test]
fn test_update_request_location_sources() {
    let from_object: UpdateCaseRequest =
        serde_json::from_str(r#"{"location": {"type": "Point", "coordinates": [79.86, 6.93]}}"#)
            .unwrap();
    let location: Geolocation = from_object.location().unwrap();
    assert!((location.longitude() - 79.86).abs() < 1e-9);
    assert!((location.latitude() - 6.93).abs() < 1e-9);

    let both: UpdateCaseRequest = serde_json::from_str(
        r#"{"lat": "7.5", "lng": 80.5, "location": {"coordinates": [79.86, 6.93]}}"#,
    )
    .unwrap();
    let location: Geolocation = both.location().unwrap();
    assert!((location.latitude() - 7.5).abs() < 1e-9);
    assert!((location.longitude() - 80.5).abs() < 1e-9);

    let malformed: UpdateCaseRequest =
        serde_json::from_str(r#"{"location": {"coordinates": ["east", 6.93]}}"#).unwrap();
    assert_eq!(malformed.location(), None);

    let short: UpdateCaseRequest =
        serde_json::from_str(r#"{"location": {"coordinates": [79.86]}}"#).unwrap();
    assert_eq!(short.location(), None);

    assert_eq!(UpdateCaseRequest::default().location(), None);

    let unusable_lat: UpdateCaseRequest = serde_json::from_str(
        r#"{"lat": {"deg": 7}, "lng": 80.5, "location": {"coordinates": [79.86, 6.93]}}"#,
    )
    .unwrap();
    let location: Geolocation = unusable_lat.location().unwrap();
    assert!((location.latitude() - 6.93).abs() < 1e-9);
}

#[test]
fn test_structured_values_are_unusable_scalars() {
    let value: LooseValue = serde_json::from_str(r#"{"minutes": 5}"#).unwrap();

    assert!(matches!(value, LooseValue::Structured(_)));
    assert_eq!(value.as_int(), None);
    assert_eq!(value.as_flag(), None);
    assert_eq!(value.as_text(), "");
    assert_eq!(value.as_coordinate(), None);
    assert_eq!(LooseValue::Bool(true).as_coordinate(), None);
    assert_eq!(
        LooseValue::from(" 6.93 ").as_coordinate(),
        Some(CoordinateInput::from(" 6.93 "))
    );
}

#[test]
fn test_create_request_accepts_mixed_scalar_types() {
    let request: CreateCaseRequest = serde_json::from_str(
        r#"{
            "type": "fire",
            "lat": "6.93",
            "lng": 79.86,
            "casualties": "2",
            "bystander": 1,
            "locationText": "Pettah market"
        }"#,
    )
    .unwrap();

    assert_eq!(request.incident_type.as_deref(), Some("fire"));
    assert_eq!(request.lat, Some(LooseValue::from("6.93")));
    assert_eq!(request.lng, Some(LooseValue::Number(79.86)));
    assert!(request.location().is_ok());
    assert_eq!(request.casualties, Some(LooseValue::from("2")));
    assert_eq!(
        request.bystander.as_ref().and_then(LooseValue::as_flag),
        Some(true)
    );
    assert_eq!(request.location_text.as_deref(), Some("Pettah market"));
    assert_eq!(request.reporter_id, None);
}

#[test]
fn test_specializations_from_list_or_text() {
    let from_text: Specializations = serde_json::from_str(r#""rescue, first aid ,""#).unwrap();
    assert_eq!(from_text.into_list(), vec!["rescue", "first aid"]);

    let from_list: Specializations = serde_json::from_str(r#"[" k9 ", "", "traffic"]"#).unwrap();
    assert_eq!(from_list.into_list(), vec!["k9", "traffic"]);
}
