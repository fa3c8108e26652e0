// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::CaseId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Highest sequence that still renders as five digits.
pub const MAX_SEQUENCE: i64 = 99_999;

const PREFIX: &str = "INC-";

/// Returns the sequence counter key for a calendar year.
#[must_use]
pub fn counter_key(year: i32) -> String {
    format!("incident:{year}")
}

/// Year-scoped, human-readable case identifier of the form `INC-YYYY-NNNNN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HumanId {
    year: i32,
    sequence: i64,
}

impl HumanId {
    /// Composes an identifier from a year and an issued sequence number.
    ///
    /// # Arguments
    ///
    /// * `year` - The four-digit calendar year
    /// * `sequence` - The sequence number issued by the allocator
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SequenceOutOfRange` if the sequence is not in
    /// `1..=99999` or the year is not four digits.
    pub const fn new(year: i32, sequence: i64) -> Result<Self, DomainError> {
        if sequence < 1 || sequence > MAX_SEQUENCE || year < 0 || year > 9999 {
            return Err(DomainError::SequenceOutOfRange { year, sequence });
        }
        Ok(Self { year, sequence })
    }

    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn sequence(&self) -> i64 {
        self.sequence
    }
}

impl std::fmt::Display for HumanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{PREFIX}{:04}-{:05}", self.year, self.sequence)
    }
}

impl FromStr for HumanId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidHumanId(s.to_string());
        let rest: &str = s.strip_prefix(PREFIX).ok_or_else(invalid)?;
        let (year, sequence) = rest.split_once('-').ok_or_else(invalid)?;
        let all_digits = |part: &str, width: usize| {
            part.len() == width && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !all_digits(year, 4) || !all_digits(sequence, 5) {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let sequence: i64 = sequence.parse().map_err(|_| invalid())?;
        // INC-2024-00000 matches the pattern and is still a valid lookup key
        Ok(Self { year, sequence })
    }
}

impl Serialize for HumanId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HumanId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: String = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// How a client-supplied case reference resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseRef {
    /// The reference matched the `INC-YYYY-NNNNN` pattern.
    ByHumanId(HumanId),
    /// The reference is a positive internal identity.
    ByInternalId(CaseId),
    /// The reference can never match a case.
    Unresolved(String),
}

impl CaseRef {
    /// Classifies a raw path or query reference.
    ///
    /// # Arguments
    ///
    /// * `raw` - The reference as received from the client
    #[must_use]
    pub fn resolve(raw: &str) -> Self {
        let trimmed: &str = raw.trim();
        if let Ok(human_id) = trimmed.parse::<HumanId>() {
            return Self::ByHumanId(human_id);
        }
        let internal: Option<i64> = trimmed
            .bytes()
            .all(|b| b.is_ascii_digit())
            .then(|| trimmed.parse::<i64>().ok())
            .flatten()
            .filter(|id| *id > 0);
        match internal {
            Some(id) => Self::ByInternalId(CaseId::new(id)),
            None => Self::Unresolved(raw.to_string()),
        }
    }
}

impl std::fmt::Display for CaseRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ByHumanId(human_id) => write!(f, "{human_id}"),
            Self::ByInternalId(id) => write!(f, "#{id}"),
            Self::Unresolved(raw) => write!(f, "{raw}"),
        }
    }
}
