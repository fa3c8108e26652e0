// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use safelink::CoreError;
use safelink_domain::DomainError;
use safelink_persistence::PersistenceError;
use tracing::error;

use crate::media::MediaError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The caller could not be resolved to a usable actor.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The authorization policy denied the operation.
    Forbidden {
        /// The action that was attempted.
        action: String,
        /// Why the action was denied.
        reason: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Forbidden { action, reason } => {
                write!(f, "Forbidden: '{action}' {reason}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The caller could not be resolved to a usable actor.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The authorization policy denied the operation.
    Forbidden {
        /// The action that was attempted.
        action: String,
        /// Why the action was denied.
        reason: String,
    },
    /// Latitude or longitude is missing or not a finite number.
    InvalidCoordinates {
        /// What was wrong with the coordinates.
        reason: String,
    },
    /// A staff update named a status outside the enumerated set.
    InvalidStatus {
        /// The rejected value.
        value: String,
    },
    /// A requested resource was not found.
    NotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The assignment target is not an active officer.
    OfficerNotFound {
        /// The identifier that was supplied.
        officer_id: i64,
    },
    /// An image append carried no files.
    NoFiles,
    /// The allocated case identifier is already taken.
    DuplicateIdentifier {
        /// The colliding identifier.
        human_id: String,
    },
    /// Storage is temporarily unavailable; the caller may retry.
    Transient {
        /// A description of the failure.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// The request conflicts with existing directory state.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Forbidden { action, reason } => {
                write!(f, "Forbidden: '{action}' {reason}")
            }
            Self::InvalidCoordinates { reason } => write!(f, "Invalid coordinates: {reason}"),
            Self::InvalidStatus { value } => write!(f, "Invalid status: '{value}'"),
            Self::NotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::OfficerNotFound { officer_id } => {
                write!(f, "Officer {officer_id} is not an active officer")
            }
            Self::NoFiles => write!(f, "No files were uploaded"),
            Self::DuplicateIdentifier { human_id } => {
                write!(f, "Case identifier {human_id} already exists")
            }
            Self::Transient { message } => write!(f, "Storage unavailable: {message}"),
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Forbidden { action, reason } => Self::Forbidden { action, reason },
        }
    }
}

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::Storage(message) => {
                error!(error = %message, "Media storage failed");
                Self::Internal { message }
            }
            other => Self::InvalidInput {
                field: String::from("images"),
                message: other.to_string(),
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// # Arguments
///
/// * `err` - The domain error to translate
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidCoordinates { reason } => ApiError::InvalidCoordinates { reason },
        DomainError::InvalidStatus(value) => ApiError::InvalidStatus { value },
        DomainError::OfficerNotFound { officer_id } => ApiError::OfficerNotFound { officer_id },
        DomainError::InvalidIncidentType(value) => ApiError::InvalidInput {
            field: String::from("type"),
            message: format!("'{value}' is not a known incident type"),
        },
        DomainError::InvalidPriority(value) => ApiError::InvalidInput {
            field: String::from("priority"),
            message: format!("'{value}' is not a known priority"),
        },
        DomainError::InvalidRole(value) => ApiError::InvalidInput {
            field: String::from("role"),
            message: format!("'{value}' is not a known role"),
        },
        DomainError::InvalidHumanId(value) => ApiError::InvalidInput {
            field: String::from("ref"),
            message: format!("'{value}' is not a case identifier"),
        },
        DomainError::NegativeValue { field, value } => ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("must not be negative, got {value}"),
        },
        DomainError::InvalidActorField { field, message } => ApiError::InvalidInput {
            field: field.to_string(),
            message,
        },
        err @ DomainError::SequenceOutOfRange { .. } => {
            error!(error = %err, "Case sequence exhausted");
            ApiError::Internal {
                message: err.to_string(),
            }
        }
    }
}

/// Translates a core error into an API error.
///
/// # Arguments
///
/// * `err` - The core error to translate
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::NoFiles => ApiError::NoFiles,
    }
}

/// Translates a persistence error into an API error.
///
/// Storage details are logged here and never reach the caller.
///
/// # Arguments
///
/// * `err` - The persistence error to translate
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(message) => ApiError::NotFound {
            resource_type: String::from("Record"),
            message,
        },
        PersistenceError::DuplicateIdentifier(human_id) => {
            error!(human_id = %human_id, "Allocated case identifier collided");
            ApiError::DuplicateIdentifier { human_id }
        }
        PersistenceError::DuplicateEmail(email) => ApiError::Conflict {
            message: format!("Email {email} is already registered"),
        },
        PersistenceError::MissingReference(message) => ApiError::InvalidInput {
            field: String::from("reference"),
            message,
        },
        err if err.is_transient() => ApiError::Transient {
            message: err.to_string(),
        },
        err => {
            error!(error = %err, "Storage failure");
            ApiError::Internal {
                message: String::from("Storage failure"),
            }
        }
    }
}
