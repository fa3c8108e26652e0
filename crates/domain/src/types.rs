// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Classification of a reported emergency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IncidentType {
    Medical,
    Fire,
    Crime,
    Accident,
    /// Catch-all for anything that does not match a known type.
    #[default]
    Other,
}

impl IncidentType {
    /// All incident types, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Medical,
        Self::Fire,
        Self::Crime,
        Self::Accident,
        Self::Other,
    ];

    /// Normalizes free-form client input into an incident type.
    ///
    /// Matching is case-insensitive. The legacy value `police` maps to
    /// `Crime` and anything unrecognized maps to `Other`.
    ///
    /// # Arguments
    ///
    /// * `value` - The raw type string supplied by a client
    #[must_use]
    pub fn normalize(value: &str) -> Self {
        let lowered: String = value.trim().to_ascii_lowercase();
        if lowered == "police" {
            return Self::Crime;
        }
        lowered.parse().unwrap_or(Self::Other)
    }

    /// Returns the stored string form of this type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Medical => "medical",
            Self::Fire => "fire",
            Self::Crime => "crime",
            Self::Accident => "accident",
            Self::Other => "other",
        }
    }
}

impl FromStr for IncidentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == s)
            .ok_or_else(|| DomainError::InvalidIncidentType(s.to_string()))
    }
}

impl std::fmt::Display for IncidentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dispatch priority of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

impl Priority {
    /// All priorities, lowest first.
    pub const ALL: [Self; 4] = [Self::Low, Self::Normal, Self::High, Self::Critical];

    /// Normalizes client input; unrecognized values become `Normal`.
    ///
    /// # Arguments
    ///
    /// * `value` - The raw priority string supplied by a client
    #[must_use]
    pub fn normalize(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    /// Returns the stored string form of this priority.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Strict, case-insensitive parsing used for staff input.
impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered: String = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == lowered)
            .ok_or_else(|| DomainError::InvalidPriority(s.to_string()))
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a case.
///
/// The nominal progression is `open → assigned → en_route → arrived →
/// resolved`, with `cancelled` reachable from any non-terminal state.
/// Edges are advisory: any authorized actor may set any status directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    #[default]
    Open,
    Assigned,
    EnRoute,
    Arrived,
    Resolved,
    Cancelled,
}

impl CaseStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Open,
        Self::Assigned,
        Self::EnRoute,
        Self::Arrived,
        Self::Resolved,
        Self::Cancelled,
    ];

    /// Non-terminal statuses. A reporter's active case is one of these.
    pub const ACTIVE: [Self; 4] = [Self::Open, Self::Assigned, Self::EnRoute, Self::Arrived];

    /// Statuses shown by the dispatch list when no filter is supplied.
    pub const DISPATCH_DEFAULT: [Self; 3] = [Self::Open, Self::Assigned, Self::EnRoute];

    /// Parses a status leniently, the way reporter input and creation do.
    ///
    /// The legacy value `created` and any unrecognized value map to `Open`.
    ///
    /// # Arguments
    ///
    /// * `value` - The raw status string supplied by a client
    #[must_use]
    pub fn normalize(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    /// Returns the stored string form of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Assigned => "assigned",
            Self::EnRoute => "en_route",
            Self::Arrived => "arrived",
            Self::Resolved => "resolved",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns whether no further progression is expected from this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Cancelled)
    }

    /// Returns whether moving to `target` follows an edge of the nominal
    /// state machine. Re-setting the same status counts as an edge.
    ///
    /// # Arguments
    ///
    /// * `target` - The status being moved to
    #[must_use]
    pub const fn is_forward_edge(&self, target: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        matches!(
            (self, target),
            (Self::Open, Self::Open | Self::Assigned)
                | (Self::Assigned, Self::Assigned | Self::EnRoute)
                | (Self::EnRoute, Self::EnRoute | Self::Arrived)
                | (Self::Arrived, Self::Arrived | Self::Resolved)
                | (_, Self::Cancelled)
        )
    }
}

/// Strict, case-insensitive parsing used for staff input.
impl FromStr for CaseStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered: String = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == lowered)
            .ok_or_else(|| DomainError::InvalidStatus(s.to_string()))
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of an authenticated actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A citizen reporter.
    #[default]
    User,
    /// A field responder who can be assigned to cases.
    Officer,
    /// Dispatch staff.
    Authority,
    /// Unrestricted administrator.
    Admin,
}

impl Role {
    pub const ALL: [Self; 4] = [Self::User, Self::Officer, Self::Authority, Self::Admin];

    /// Returns whether this role may triage and mutate any case.
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        matches!(self, Self::Authority | Self::Admin)
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns the stored string form of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Officer => "officer",
            Self::Authority => "authority",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered: String = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == lowered)
            .ok_or_else(|| DomainError::InvalidRole(s.to_string()))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Internal storage identity of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseId(i64);

impl CaseId {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of an actor in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(i64);

impl ActorId {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
