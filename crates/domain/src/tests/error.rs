// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::DomainError;

#[test]
fn test_invalid_status_display_names_value() {
    let error: DomainError = DomainError::InvalidStatus(String::from("flying"));
    assert_eq!(error.to_string(), "Invalid status: 'flying'");
}

#[test]
fn test_sequence_out_of_range_display() {
    let error: DomainError = DomainError::SequenceOutOfRange {
        year: 2024,
        sequence: 100_000,
    };
    assert!(error.to_string().contains("100000"));
    assert!(error.to_string().contains("2024"));
}

#[test]
fn test_negative_value_display_names_field() {
    let error: DomainError = DomainError::NegativeValue {
        field: "etaMinutes",
        value: -3,
    };
    assert_eq!(
        error.to_string(),
        "Field 'etaMinutes' must not be negative (got -3)"
    );
}

#[test]
fn test_errors_implement_std_error() {
    let error: Box<dyn std::error::Error> =
        Box::new(DomainError::OfficerNotFound { officer_id: 9 });
    assert_eq!(error.to_string(), "Officer 9 not found or not active");
}
