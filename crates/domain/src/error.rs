// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Latitude or longitude is missing or not a finite number.
    InvalidCoordinates {
        /// Description of what was wrong with the coordinates.
        reason: String,
    },
    /// Status value is not one of the enumerated case statuses.
    InvalidStatus(String),
    /// Incident type value is not one of the enumerated types.
    InvalidIncidentType(String),
    /// Priority value is not one of the enumerated priorities.
    InvalidPriority(String),
    /// Role value is not one of the enumerated actor roles.
    InvalidRole(String),
    /// A human-readable case identifier does not match `INC-YYYY-NNNNN`.
    InvalidHumanId(String),
    /// A sequence number cannot be rendered as a five-digit identifier.
    SequenceOutOfRange {
        /// The calendar year of the counter.
        year: i32,
        /// The sequence value that was issued.
        sequence: i64,
    },
    /// A numeric field that must be non-negative received a negative value.
    NegativeValue {
        /// The field name.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },
    /// The assignment target is not an active officer.
    OfficerNotFound {
        /// The actor identifier that was supplied.
        officer_id: i64,
    },
    /// A required actor profile field is empty or invalid.
    InvalidActorField {
        /// The field name.
        field: &'static str,
        /// Description of the problem.
        message: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCoordinates { reason } => write!(f, "Invalid coordinates: {reason}"),
            Self::InvalidStatus(value) => write!(f, "Invalid status: '{value}'"),
            Self::InvalidIncidentType(value) => write!(f, "Invalid incident type: '{value}'"),
            Self::InvalidPriority(value) => write!(f, "Invalid priority: '{value}'"),
            Self::InvalidRole(value) => write!(f, "Invalid role: '{value}'"),
            Self::InvalidHumanId(value) => {
                write!(f, "Invalid case identifier '{value}': expected INC-YYYY-NNNNN")
            }
            Self::SequenceOutOfRange { year, sequence } => {
                write!(
                    f,
                    "Sequence {sequence} for year {year} does not fit a five-digit identifier"
                )
            }
            Self::NegativeValue { field, value } => {
                write!(f, "Field '{field}' must not be negative (got {value})")
            }
            Self::OfficerNotFound { officer_id } => {
                write!(f, "Officer {officer_id} not found or not active")
            }
            Self::InvalidActorField { field, message } => {
                write!(f, "Invalid actor field '{field}': {message}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
