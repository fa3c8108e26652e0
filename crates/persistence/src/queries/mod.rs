// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `cases` - Case lookups, dispatch listings and reporter views
//! - `actors` - Actor directory lookups and listings

pub mod actors;
pub mod cases;

/// Escapes `LIKE` wildcards and wraps the text for a substring match.
pub(crate) fn like_pattern(text: &str) -> String {
    let mut escaped: String = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
