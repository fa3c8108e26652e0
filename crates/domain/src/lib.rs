// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod actor;
mod case;
mod error;
mod geolocation;
mod human_id;
mod patch;
mod query;
mod types;

#[cfg(test)]
mod tests;

pub use actor::{Actor, ActorDraft, ActorProfile, VerifiedOfficer, normalize_email};
pub use case::{CaseDraft, CaseRecord, NewCase, non_negative};
pub use error::DomainError;
pub use geolocation::{BoundingBox, CoordinateInput, Geolocation};
pub use human_id::{CaseRef, HumanId, MAX_SEQUENCE, counter_key};
pub use patch::{CasePatch, FieldUpdate, ReporterPatch, StaffPatch};
pub use query::{
    ActorFilter, CaseFilter, GeoRadius, PageLimits, Pagination, StatusFilter,
    normalize_search_text, parse_since,
};
pub use types::{ActorId, CaseId, CaseStatus, IncidentType, Priority, Role};
