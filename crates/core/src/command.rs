// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use safelink_domain::{CasePatch, VerifiedOfficer};

/// A command represents intent to change an existing case, as data only.
///
/// Creation and deletion are not commands: creation needs an identifier
/// from the sequence allocator first, and deletion removes the record.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Apply a caller-class patch.
    Update {
        /// The fields to change.
        patch: CasePatch,
    },
    /// Assign a responder. Always moves the case to `assigned`.
    Assign {
        /// The officer, already confirmed active.
        officer: VerifiedOfficer,
        /// Estimated minutes to arrival. `None` clears any previous estimate.
        eta_minutes: Option<u32>,
        /// Free-text dispatch note.
        note: String,
    },
    /// Change only the ETA. `None` clears it.
    SetEta {
        /// Estimated minutes to arrival.
        eta_minutes: Option<u32>,
    },
    /// Append media references after the existing ones.
    AppendImages {
        /// Retrievable URIs returned by the media store.
        uris: Vec<String>,
    },
}

impl Command {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Update { .. } => "Update",
            Self::Assign { .. } => "Assign",
            Self::SetEta { .. } => "SetEta",
            Self::AppendImages { .. } => "AppendImages",
        }
    }
}
