// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::geolocation::Geolocation;
use crate::types::{ActorId, CaseStatus, Role};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Page size bounds for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl PageLimits {
    /// Staff dispatch listing.
    pub const DISPATCH: Self = Self {
        default_limit: 100,
        max_limit: 500,
    };

    /// Actor directory listing.
    pub const ACTORS: Self = Self {
        default_limit: 20,
        max_limit: 100,
    };
}

/// A 1-indexed page request with a clamped page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Pagination {
    /// Builds a page request from raw client values.
    ///
    /// A missing or zero page becomes 1. A missing or zero limit becomes the
    /// default; anything else is clamped into `[1, max_limit]`.
    ///
    /// # Arguments
    ///
    /// * `page` - The requested page, if any
    /// * `limit` - The requested page size, if any
    /// * `limits` - Bounds for this listing
    #[must_use]
    pub fn clamped(page: Option<i64>, limit: Option<i64>, limits: PageLimits) -> Self {
        let page: u32 = match page {
            Some(requested) if requested > 1 => u32::try_from(requested).unwrap_or(u32::MAX),
            _ => 1,
        };
        let limit: u32 = match limit {
            None | Some(0) => limits.default_limit,
            Some(requested) => {
                let bounded: i64 = requested.clamp(1, i64::from(limits.max_limit));
                u32::try_from(bounded).unwrap_or(limits.max_limit)
            }
        };
        Self { page, limit }
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

/// Which statuses a case listing includes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    Any,
    /// Only these statuses. An empty set matches nothing.
    OneOf(Vec<CaseStatus>),
}

impl StatusFilter {
    /// Parses the dispatch view's `status` parameter.
    ///
    /// A missing or blank value selects the default dispatch statuses. A
    /// comma-separated list selects the named statuses; unknown names are
    /// dropped and so match nothing.
    ///
    /// # Arguments
    ///
    /// * `raw` - The raw query parameter
    #[must_use]
    pub fn parse_dispatch(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
            return Self::OneOf(CaseStatus::DISPATCH_DEFAULT.to_vec());
        };
        let mut statuses: Vec<CaseStatus> = Vec::new();
        for status in raw.split(',').filter_map(|part| part.parse::<CaseStatus>().ok()) {
            if !statuses.contains(&status) {
                statuses.push(status);
            }
        }
        Self::OneOf(statuses)
    }

    #[must_use]
    pub fn allows(&self, status: CaseStatus) -> bool {
        match self {
            Self::Any => true,
            Self::OneOf(statuses) => statuses.contains(&status),
        }
    }
}

/// A circle around a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoRadius {
    pub center: Geolocation,
    pub radius_meters: f64,
}

impl GeoRadius {
    #[must_use]
    pub fn contains(&self, point: &Geolocation) -> bool {
        self.center.distance_meters(point) <= self.radius_meters
    }
}

/// Criteria for case listings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CaseFilter {
    /// Restrict to cases filed by this actor.
    pub reporter_id: Option<ActorId>,
    pub statuses: StatusFilter,
    /// Case-insensitive substring over identifier, type, priority,
    /// description and location text.
    pub text: Option<String>,
    /// Lower bound on creation time, inclusive.
    pub since: Option<OffsetDateTime>,
    pub near: Option<GeoRadius>,
}

/// Criteria for actor directory listings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActorFilter {
    pub role: Option<Role>,
    pub is_verified: Option<bool>,
    pub is_active: Option<bool>,
    /// Case-insensitive substring over email, name, contact, address,
    /// department, badge number and NIC.
    pub text: Option<String>,
    pub exclude_admins: bool,
}

/// Trims free-text search input, treating blank input as absent.
#[must_use]
pub fn normalize_search_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

/// Parses a `since` bound as RFC 3339 or as a plain `YYYY-MM-DD` date.
///
/// Returns `None` for anything else.
#[must_use]
pub fn parse_since(raw: &str) -> Option<OffsetDateTime> {
    let trimmed: &str = raw.trim();
    if let Ok(timestamp) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Some(timestamp);
    }
    Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}
