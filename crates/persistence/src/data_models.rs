// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversions to and from domain values.

use diesel::prelude::*;
use num_traits::ToPrimitive;
use safelink::CaseChanges;
use safelink_domain::{
    ActorDraft, ActorId, ActorProfile, CaseId, CaseRecord, FieldUpdate, Geolocation, HumanId,
    NewCase,
};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::diesel_schema::{actors, incidents};
use crate::error::PersistenceError;

/// Fixed-width UTC timestamp layout, so lexical order is time order.
const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z");

/// Formats a timestamp for storage.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, PersistenceError> {
    timestamp
        .to_offset(UtcOffset::UTC)
        .format(TIMESTAMP_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns an error if the text is not in the storage layout.
pub fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, PersistenceError> {
    PrimitiveDateTime::parse(raw, TIMESTAMP_FORMAT)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|e| PersistenceError::CorruptRecord(format!("timestamp '{raw}': {e}")))
}

fn corrupt<E: std::fmt::Display>(column: &str) -> impl FnOnce(E) -> PersistenceError + '_ {
    move |e| PersistenceError::CorruptRecord(format!("{column}: {e}"))
}

fn to_count(column: &str, value: Option<i64>) -> Result<Option<u32>, PersistenceError> {
    value
        .map(|raw| {
            raw.to_u32().ok_or_else(|| {
                PersistenceError::CorruptRecord(format!("{column}: {raw} is out of range"))
            })
        })
        .transpose()
}

fn flag(value: bool) -> i32 {
    i32::from(value)
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = incidents)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct IncidentRow {
    pub incident_id: i64,
    pub human_id: String,
    pub reporter_id: i64,
    pub incident_type: String,
    pub description: Option<String>,
    pub longitude: f64,
    pub latitude: f64,
    pub location_text: Option<String>,
    pub images_json: String,
    pub images_count: i32,
    pub priority: String,
    pub status: String,
    pub assigned_officer_id: Option<i64>,
    pub eta_minutes: Option<i64>,
    pub assignment_note: Option<String>,
    pub casualties: Option<i64>,
    pub bystander: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

impl IncidentRow {
    /// Converts a stored row into a case record.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` if any column holds a value
    /// the domain does not accept.
    pub fn into_record(self) -> Result<CaseRecord, PersistenceError> {
        let human_id: HumanId = self.human_id.parse().map_err(corrupt("human_id"))?;
        let images: Vec<String> =
            serde_json::from_str(&self.images_json).map_err(corrupt("images_json"))?;
        if image_count(images.len())? != self.images_count {
            return Err(PersistenceError::CorruptRecord(format!(
                "images_count: {} does not match {} stored images",
                self.images_count,
                images.len()
            )));
        }
        let case: NewCase = NewCase {
            human_id,
            reporter_id: ActorId::new(self.reporter_id),
            incident_type: self.incident_type.parse().map_err(corrupt("incident_type"))?,
            description: self.description,
            location: Geolocation::from_coordinates([self.longitude, self.latitude])
                .map_err(corrupt("location"))?,
            location_text: self.location_text,
            images,
            priority: self.priority.parse().map_err(corrupt("priority"))?,
            status: self.status.parse().map_err(corrupt("status"))?,
            assigned_officer_id: self.assigned_officer_id.map(ActorId::new),
            eta_minutes: to_count("eta_minutes", self.eta_minutes)?,
            assignment_note: self.assignment_note,
            casualties: to_count("casualties", self.casualties)?,
            bystander: self.bystander.map(|value| value != 0),
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        };
        Ok(CaseRecord::new(CaseId::new(self.incident_id), case))
    }
}

#[derive(Insertable)]
#[diesel(table_name = incidents)]
pub struct NewIncidentRow {
    pub human_id: String,
    pub reporter_id: i64,
    pub incident_type: String,
    pub description: Option<String>,
    pub longitude: f64,
    pub latitude: f64,
    pub location_text: Option<String>,
    pub images_json: String,
    pub images_count: i32,
    pub priority: String,
    pub status: String,
    pub assigned_officer_id: Option<i64>,
    pub eta_minutes: Option<i64>,
    pub assignment_note: Option<String>,
    pub casualties: Option<i64>,
    pub bystander: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

impl NewIncidentRow {
    /// Builds an insertable row from new case content.
    ///
    /// # Errors
    ///
    /// Returns an error if images or timestamps cannot be serialized.
    pub fn from_case(case: &NewCase) -> Result<Self, PersistenceError> {
        Ok(Self {
            human_id: case.human_id.to_string(),
            reporter_id: case.reporter_id.value(),
            incident_type: case.incident_type.as_str().to_string(),
            description: case.description.clone(),
            longitude: case.location.longitude(),
            latitude: case.location.latitude(),
            location_text: case.location_text.clone(),
            images_json: serde_json::to_string(&case.images)?,
            images_count: image_count(case.images.len())?,
            priority: case.priority.as_str().to_string(),
            status: case.status.as_str().to_string(),
            assigned_officer_id: case.assigned_officer_id.map(|id| id.value()),
            eta_minutes: case.eta_minutes.map(i64::from),
            assignment_note: case.assignment_note.clone(),
            casualties: case.casualties.map(i64::from),
            bystander: case.bystander.map(flag),
            created_at: format_timestamp(case.created_at)?,
            updated_at: format_timestamp(case.updated_at)?,
        })
    }
}

/// Converts an image list length to the stored count.
///
/// # Errors
///
/// Returns an error if the count does not fit the column.
pub fn image_count(len: usize) -> Result<i32, PersistenceError> {
    len.to_i32()
        .ok_or_else(|| PersistenceError::SerializationError(format!("{len} images is too many")))
}

/// Partial update of an incident row. `None` leaves a column untouched;
/// `Some(None)` writes NULL.
#[derive(AsChangeset, Default)]
#[diesel(table_name = incidents)]
#[allow(clippy::option_option)]
pub struct IncidentChangeset {
    pub incident_type: Option<String>,
    pub description: Option<Option<String>>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub location_text: Option<Option<String>>,
    pub images_json: Option<String>,
    pub images_count: Option<i32>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub assigned_officer_id: Option<Option<i64>>,
    pub eta_minutes: Option<Option<i64>>,
    pub assignment_note: Option<Option<String>>,
    pub casualties: Option<Option<i64>>,
    pub bystander: Option<Option<i32>>,
    pub updated_at: Option<String>,
}

impl IncidentChangeset {
    /// Maps field-level case changes onto columns. Appended images are not
    /// included; they are merged with the stored list inside a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the update timestamp cannot be formatted.
    pub fn from_changes(changes: &CaseChanges) -> Result<Self, PersistenceError> {
        Ok(Self {
            incident_type: changes
                .incident_type
                .map(|value| value.as_str().to_string()),
            description: changes.description.clone().map(FieldUpdate::into_option),
            longitude: changes.location.map(|location| location.longitude()),
            latitude: changes.location.map(|location| location.latitude()),
            location_text: changes.location_text.clone().map(FieldUpdate::into_option),
            images_json: None,
            images_count: None,
            priority: changes.priority.map(|value| value.as_str().to_string()),
            status: changes.status.map(|value| value.as_str().to_string()),
            assigned_officer_id: changes
                .assigned_officer_id
                .map(|u| u.into_option().map(|id| id.value())),
            eta_minutes: changes
                .eta_minutes
                .map(|u| u.into_option().map(i64::from)),
            assignment_note: changes.assignment_note.clone().map(FieldUpdate::into_option),
            casualties: changes.casualties.map(|u| u.into_option().map(i64::from)),
            bystander: changes.bystander.map(|u| u.into_option().map(flag)),
            updated_at: changes.updated_at.map(format_timestamp).transpose()?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = actors)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ActorRow {
    pub actor_id: i64,
    pub email: String,
    pub full_name: String,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub nic: Option<String>,
    pub role: String,
    pub department: Option<String>,
    pub badge_number: Option<String>,
    pub specializations_json: String,
    pub is_verified: i32,
    pub is_active: i32,
    pub verified_by: Option<i64>,
    pub deleted_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl ActorRow {
    /// Converts a stored row into an actor profile.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` if any column holds a value
    /// the domain does not accept.
    pub fn into_profile(self) -> Result<ActorProfile, PersistenceError> {
        Ok(ActorProfile {
            id: ActorId::new(self.actor_id),
            email: self.email,
            full_name: self.full_name,
            contact: self.contact,
            address: self.address,
            nic: self.nic,
            role: self.role.parse().map_err(corrupt("role"))?,
            department: self.department,
            badge_number: self.badge_number,
            specializations: serde_json::from_str(&self.specializations_json)
                .map_err(corrupt("specializations_json"))?,
            is_verified: self.is_verified != 0,
            is_active: self.is_active != 0,
            verified_by: self.verified_by.map(ActorId::new),
            deleted_at: self.deleted_at.as_deref().map(parse_timestamp).transpose()?,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = actors)]
pub struct NewActorRow {
    pub email: String,
    pub full_name: String,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub nic: Option<String>,
    pub role: String,
    pub department: Option<String>,
    pub badge_number: Option<String>,
    pub specializations_json: String,
    pub is_verified: i32,
    pub is_active: i32,
    pub verified_by: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl NewActorRow {
    /// Builds an insertable row from a normalized draft.
    ///
    /// # Errors
    ///
    /// Returns an error if specializations or timestamps cannot be serialized.
    pub fn from_draft(draft: &ActorDraft, now: OffsetDateTime) -> Result<Self, PersistenceError> {
        let stamp: String = format_timestamp(now)?;
        Ok(Self {
            email: draft.email.clone(),
            full_name: draft.full_name.clone(),
            contact: draft.contact.clone(),
            address: draft.address.clone(),
            nic: draft.nic.clone(),
            role: draft.role.as_str().to_string(),
            department: draft.department.clone(),
            badge_number: draft.badge_number.clone(),
            specializations_json: serde_json::to_string(&draft.specializations)?,
            is_verified: flag(draft.is_verified),
            is_active: flag(draft.is_active),
            verified_by: draft.verified_by.map(|id| id.value()),
            created_at: stamp.clone(),
            updated_at: stamp,
        })
    }
}

/// Full rewrite of an actor's mutable columns.
#[derive(AsChangeset)]
#[diesel(table_name = actors)]
#[diesel(treat_none_as_null = true)]
pub struct ActorChangeset {
    pub email: String,
    pub full_name: String,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub nic: Option<String>,
    pub role: String,
    pub department: Option<String>,
    pub badge_number: Option<String>,
    pub specializations_json: String,
    pub is_verified: i32,
    pub is_active: i32,
    pub verified_by: Option<i64>,
    pub updated_at: String,
}

impl ActorChangeset {
    /// Builds the changeset for a modified profile.
    ///
    /// # Errors
    ///
    /// Returns an error if specializations or timestamps cannot be serialized.
    pub fn from_profile(profile: &ActorProfile) -> Result<Self, PersistenceError> {
        Ok(Self {
            email: profile.email.clone(),
            full_name: profile.full_name.clone(),
            contact: profile.contact.clone(),
            address: profile.address.clone(),
            nic: profile.nic.clone(),
            role: profile.role.as_str().to_string(),
            department: profile.department.clone(),
            badge_number: profile.badge_number.clone(),
            specializations_json: serde_json::to_string(&profile.specializations)?,
            is_verified: flag(profile.is_verified),
            is_active: flag(profile.is_active),
            verified_by: profile.verified_by.map(|id| id.value()),
            updated_at: format_timestamp(profile.updated_at)?,
        })
    }
}
