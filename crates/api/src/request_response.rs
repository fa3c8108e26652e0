// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Request fields arrive from loosely typed clients, so numeric and boolean
//! inputs are accepted as either JSON values or strings and interpreted by
//! the handlers.

use num_traits::cast::ToPrimitive;
use safelink_domain::{ActorProfile, CaseRecord, CoordinateInput, DomainError, Geolocation};
use time::OffsetDateTime;

/// A scalar that may arrive as a JSON number, boolean, string or null.
///
/// Objects and arrays are kept as `Structured` so that a misplaced value
/// reads as unusable instead of failing the whole body.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum LooseValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Structured(serde_json::Value),
}

impl LooseValue {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Reads an integer the lenient way clients expect: numbers are
    /// truncated and strings contribute their leading digits (`"15min"` is
    /// 15).
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Number(value) if value.is_finite() => value.trunc().to_i64(),
            Self::Text(text) => parse_int(text),
            _ => None,
        }
    }

    /// True only for `true` and `"true"`.
    #[must_use]
    pub fn is_true(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Text(text) => text == "true",
            _ => false,
        }
    }

    /// Reads a boolean flag from `true`/`false`, `1`/`0` or their string
    /// forms. Anything else is `None`.
    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::Number(value) if value.fract() == 0.0 => match value.to_i64() {
                Some(1) => Some(true),
                Some(0) => Some(false),
                _ => None,
            },
            Self::Text(text) => parse_flag(text),
            _ => None,
        }
    }

    /// Text form of the value. Null, `false`, zero and the empty string all
    /// become an empty string.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Null | Self::Bool(false) | Self::Structured(_) => String::new(),
            Self::Bool(true) => String::from("true"),
            Self::Number(value) if *value == 0.0 || value.is_nan() => String::new(),
            Self::Number(value) => format!("{value}"),
            Self::Text(text) => text.clone(),
        }
    }

    /// Coordinate form of a number or string. Anything else is `None`.
    #[must_use]
    pub fn as_coordinate(&self) -> Option<CoordinateInput> {
        match self {
            Self::Number(value) => Some(CoordinateInput::Number(*value)),
            Self::Text(text) => Some(CoordinateInput::Text(text.clone())),
            Self::Null | Self::Bool(_) | Self::Structured(_) => None,
        }
    }
}

impl From<i64> for LooseValue {
    fn from(value: i64) -> Self {
        Self::Number(value.to_f64().unwrap_or(f64::NAN))
    }
}

impl From<f64> for LooseValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for LooseValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<bool> for LooseValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Parses the leading integer of a string, ignoring leading whitespace and
/// any trailing non-digits.
#[must_use]
pub fn parse_int(text: &str) -> Option<i64> {
    let trimmed: &str = text.trim_start();
    let (negative, rest): (bool, &str) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end: usize = rest
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len());
    let value: i64 = rest.get(..end)?.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Parses `true`/`false`/`1`/`0` query flags.
#[must_use]
pub fn parse_flag(text: &str) -> Option<bool> {
    match text.trim() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Keeps an explicit JSON `null` distinct from an absent field.
fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// ============================================================================
// Case requests
// ============================================================================

/// API request to file a new case.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCaseRequest {
    #[serde(rename = "type")]
    pub incident_type: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    /// Honored for staff only.
    pub status: Option<String>,
    pub lat: Option<LooseValue>,
    pub lng: Option<LooseValue>,
    /// Preferred over `location_text` when both are present.
    pub address: Option<String>,
    pub location_text: Option<String>,
    pub casualties: Option<LooseValue>,
    pub bystander: Option<LooseValue>,
    /// Honored for staff only; reporters always file for themselves.
    pub reporter_id: Option<LooseValue>,
}

impl CreateCaseRequest {
    /// Parses the reported position.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if either coordinate is
    /// missing or is not a finite number.
    pub fn location(&self) -> Result<Geolocation, DomainError> {
        parse_coordinates(self.lat.as_ref(), self.lng.as_ref())
    }
}

fn parse_coordinates(
    lat: Option<&LooseValue>,
    lng: Option<&LooseValue>,
) -> Result<Geolocation, DomainError> {
    let latitude: Option<CoordinateInput> = lat.and_then(LooseValue::as_coordinate);
    let longitude: Option<CoordinateInput> = lng.and_then(LooseValue::as_coordinate);
    Geolocation::parse(latitude.as_ref(), longitude.as_ref())
}

/// API request to change fields of an existing case.
///
/// Which fields are honored depends on the caller. An explicit `null`
/// clears a clearable field for staff.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCaseRequest {
    #[serde(rename = "type")]
    pub incident_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<LooseValue>,
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub status: Option<LooseValue>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub eta_minutes: Option<LooseValue>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub assignment_note: Option<LooseValue>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub assigned_officer_id: Option<LooseValue>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub location_text: Option<LooseValue>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub casualties: Option<LooseValue>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub bystander: Option<LooseValue>,
    pub lat: Option<LooseValue>,
    pub lng: Option<LooseValue>,
    /// A GeoJSON-like `{ "coordinates": [lng, lat] }` object. Ignored when
    /// malformed.
    pub location: Option<serde_json::Value>,
}

impl UpdateCaseRequest {
    /// The new location, if either coordinate form is well formed.
    ///
    /// Separate `lat`/`lng` win over the location object.
    #[must_use]
    pub fn location(&self) -> Option<Geolocation> {
        if let Ok(location) = parse_coordinates(self.lat.as_ref(), self.lng.as_ref()) {
            return Some(location);
        }
        let coordinates: &Vec<serde_json::Value> =
            self.location.as_ref()?.get("coordinates")?.as_array()?;
        let longitude: f64 = coordinates.first()?.as_f64()?;
        let latitude: f64 = coordinates.get(1)?.as_f64()?;
        Geolocation::from_coordinates([longitude, latitude]).ok()
    }
}

/// API request to assign a responder.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub officer_id: Option<LooseValue>,
    pub eta_minutes: Option<LooseValue>,
    pub note: Option<LooseValue>,
}

/// API request to change only the ETA. A missing or unreadable value clears it.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetEtaRequest {
    pub eta_minutes: Option<LooseValue>,
}

/// Query parameters of the dispatch listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCasesQuery {
    pub q: Option<String>,
    pub since: Option<String>,
    pub status: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    /// Center of a radius search; applies only with `lng` and `radius_meters`.
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius_meters: Option<String>,
}

/// Query parameters of the officer picker.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OfficersQuery {
    pub q: Option<String>,
}

// ============================================================================
// Actor requests
// ============================================================================

/// Officer specializations, as a list or a comma-separated string.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Specializations {
    List(Vec<String>),
    Text(String),
}

impl Specializations {
    /// Trimmed, non-empty entries.
    #[must_use]
    pub fn into_list(self) -> Vec<String> {
        let raw: Vec<String> = match self {
            Self::List(items) => items,
            Self::Text(text) => text.split(',').map(ToString::to_string).collect(),
        };
        raw.into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    }
}

/// Query parameters of the actor directory listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListActorsQuery {
    pub role: Option<String>,
    pub is_verified: Option<String>,
    pub is_active: Option<String>,
    pub q: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// API request to create a directory entry.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActorRequest {
    pub email: String,
    pub full_name: String,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub nic: Option<String>,
    /// Defaults to `user`.
    pub role: Option<String>,
    pub department: Option<String>,
    pub badge_number: Option<String>,
    pub specializations: Option<Specializations>,
    pub is_verified: Option<LooseValue>,
    /// Defaults to active.
    pub is_active: Option<LooseValue>,
}

/// API request to change a directory entry. Absent fields are untouched.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActorRequest {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub nic: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub badge_number: Option<String>,
    pub specializations: Option<Specializations>,
    pub is_verified: Option<LooseValue>,
    pub is_active: Option<LooseValue>,
}

/// API request to change the caller's own profile.
///
/// Role, email and account flags are not self-service and have no field
/// here.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub nic: Option<String>,
    pub department: Option<String>,
    pub badge_number: Option<String>,
    pub specializations: Option<Specializations>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LocationInfo {
    pub longitude: f64,
    pub latitude: f64,
}

/// Outward representation of a case.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentInfo {
    /// Internal identity.
    pub id: i64,
    pub human_id: String,
    pub reporter_id: i64,
    #[serde(rename = "type")]
    pub incident_type: String,
    pub description: Option<String>,
    pub location: LocationInfo,
    pub location_text: Option<String>,
    pub images: Vec<String>,
    pub images_count: usize,
    pub priority: String,
    pub status: String,
    pub assigned_officer_id: Option<i64>,
    pub eta_minutes: Option<u32>,
    pub assignment_note: Option<String>,
    pub casualties: Option<u32>,
    pub bystander: Option<bool>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<&CaseRecord> for IncidentInfo {
    fn from(case: &CaseRecord) -> Self {
        Self {
            id: case.case_id.value(),
            human_id: case.human_id.to_string(),
            reporter_id: case.reporter_id.value(),
            incident_type: case.incident_type.as_str().to_string(),
            description: case.description.clone(),
            location: LocationInfo {
                longitude: case.location.longitude(),
                latitude: case.location.latitude(),
            },
            location_text: case.location_text.clone(),
            images: case.images().to_vec(),
            images_count: case.images_count(),
            priority: case.priority.as_str().to_string(),
            status: case.status.as_str().to_string(),
            assigned_officer_id: case.assigned_officer_id.map(|id| id.value()),
            eta_minutes: case.eta_minutes,
            assignment_note: case.assignment_note.clone(),
            casualties: case.casualties,
            bystander: case.bystander,
            created_at: case.created_at,
            updated_at: case.updated_at,
        }
    }
}

/// Contact details of the person who reported a case.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReporterSummary {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub contact: Option<String>,
}

impl From<&ActorProfile> for ReporterSummary {
    fn from(profile: &ActorProfile) -> Self {
        Self {
            id: profile.id.value(),
            full_name: profile.full_name.clone(),
            email: profile.email.clone(),
            contact: profile.contact.clone(),
        }
    }
}

/// The responder assigned to a case.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficerSummary {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub badge_number: Option<String>,
    pub department: Option<String>,
}

impl From<&ActorProfile> for OfficerSummary {
    fn from(profile: &ActorProfile) -> Self {
        Self {
            id: profile.id.value(),
            full_name: profile.full_name.clone(),
            email: profile.email.clone(),
            badge_number: profile.badge_number.clone(),
            department: profile.department.clone(),
        }
    }
}

/// API response carrying one case.
///
/// Reads fill in the people involved: every caller sees the assigned
/// officer's name, staff also get the reporter and officer details.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseResponse {
    pub success: bool,
    pub incident: IncidentInfo,
    /// The human-readable identifier.
    pub incident_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_officer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter: Option<ReporterSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_officer: Option<OfficerSummary>,
}

impl CaseResponse {
    #[must_use]
    pub fn new(case: &CaseRecord) -> Self {
        Self {
            success: true,
            incident: IncidentInfo::from(case),
            incident_id: case.human_id.to_string(),
            assigned_officer_name: None,
            reporter: None,
            assigned_officer: None,
        }
    }
}

/// API response for the caller's active case.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveCaseResponse {
    pub success: bool,
    pub incident: IncidentInfo,
    pub incident_id: String,
    pub status: String,
    pub eta_minutes: Option<u32>,
    pub assigned_officer_name: Option<String>,
}

/// API response for the dispatch listing.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ListCasesResponse {
    pub success: bool,
    pub items: Vec<IncidentInfo>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

/// API response listing the caller's own cases.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MyCasesResponse {
    pub success: bool,
    pub items: Vec<IncidentInfo>,
}

/// API response for an image append.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImagesResponse {
    pub success: bool,
    /// URIs added by this request.
    pub images: Vec<String>,
    pub incident: IncidentInfo,
}

/// API response for a deletion.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

/// API response carrying one directory entry.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ActorResponse {
    pub success: bool,
    pub user: ActorProfile,
}

/// API response for the "who am I" endpoint.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WhoAmIResponse {
    pub success: bool,
    pub user: ActorProfile,
}

/// API response for the actor directory listing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListActorsResponse {
    pub success: bool,
    pub items: Vec<ActorProfile>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

/// Officer summary for assignment pickers.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficerInfo {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub badge_number: Option<String>,
    pub department: Option<String>,
}

impl From<ActorProfile> for OfficerInfo {
    fn from(profile: ActorProfile) -> Self {
        Self {
            id: profile.id.value(),
            full_name: profile.full_name,
            email: profile.email,
            badge_number: profile.badge_number,
            department: profile.department,
        }
    }
}

/// API response for the officer picker.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OfficersResponse {
    pub success: bool,
    pub items: Vec<OfficerInfo>,
}
