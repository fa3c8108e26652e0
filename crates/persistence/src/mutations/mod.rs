// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation modules for persistence layer.
//!
//! ## Module Organization
//!
//! - `sequence` - Atomic per-year identifier counter
//! - `cases` - Case insert, partial update and delete
//! - `actors` - Actor directory writes and soft deletion

pub mod actors;
pub mod cases;
pub mod sequence;
