// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-caller patch structures.
//!
//! Each caller class has its own struct naming exactly the fields it may
//! change. A field that is `None` is left untouched; clearable fields carry
//! a `FieldUpdate` saying whether to set or clear them.

use crate::actor::VerifiedOfficer;
use crate::geolocation::Geolocation;
use crate::types::{CaseStatus, IncidentType, Priority};

/// A change to a nullable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    Set(T),
    Clear,
}

impl<T> FieldUpdate<T> {
    /// The value the field holds after the update.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Clear => None,
        }
    }

    #[must_use]
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> FieldUpdate<U> {
        match self {
            Self::Set(value) => FieldUpdate::Set(f(value)),
            Self::Clear => FieldUpdate::Clear,
        }
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Clear, Self::Set)
    }
}

/// Fields a reporter may change on their own case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReporterPatch {
    pub incident_type: Option<IncidentType>,
    pub description: Option<FieldUpdate<String>>,
    pub priority: Option<Priority>,
    /// Already normalized; reporters cannot submit an invalid status.
    pub status: Option<CaseStatus>,
    pub casualties: Option<u32>,
    pub bystander: Option<bool>,
}

impl ReporterPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.incident_type.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.casualties.is_none()
            && self.bystander.is_none()
    }
}

/// Fields staff may change on any case.
///
/// The reporter and the human identifier are immutable and so have no
/// field here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaffPatch {
    pub incident_type: Option<IncidentType>,
    pub description: Option<FieldUpdate<String>>,
    pub priority: Option<Priority>,
    pub status: Option<CaseStatus>,
    pub eta_minutes: Option<FieldUpdate<u32>>,
    pub assignment_note: Option<FieldUpdate<String>>,
    pub assigned_officer: Option<FieldUpdate<VerifiedOfficer>>,
    pub location_text: Option<FieldUpdate<String>>,
    pub casualties: Option<FieldUpdate<u32>>,
    pub bystander: Option<FieldUpdate<bool>>,
    /// A location can be replaced but never cleared.
    pub location: Option<Geolocation>,
}

impl StaffPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.incident_type.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.eta_minutes.is_none()
            && self.assignment_note.is_none()
            && self.assigned_officer.is_none()
            && self.location_text.is_none()
            && self.casualties.is_none()
            && self.bystander.is_none()
            && self.location.is_none()
    }
}

/// A patch tagged with the caller class that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum CasePatch {
    Reporter(ReporterPatch),
    Staff(StaffPatch),
}

impl CasePatch {
    #[must_use]
    pub const fn status(&self) -> Option<CaseStatus> {
        match self {
            Self::Reporter(patch) => patch.status,
            Self::Staff(patch) => patch.status,
        }
    }
}
