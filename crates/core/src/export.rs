// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Export selection for the rendering collaborator.
//!
//! The core's only obligation is to supply a correctly filtered, ordered
//! list of notes; PDF/byte output is generated externally.

use crate::note::{Note, UserRecord};
use crate::query::list_notes;

/// Notes for export: optionally filtered by id, `created_at` descending.
pub fn export_notes(user: &UserRecord, only_ids: Option<&[u64]>) -> Vec<Note> {
    let notes = list_notes(user);
    match only_ids {
        None => notes,
        Some(ids) => notes.into_iter().filter(|n| ids.contains(&n.id)).collect(),
    }
}

/// Header line for one exported note.
pub fn header_line(note: &Note) -> String {
    format!(
        "#{} - {} ({}) - {}",
        note.id,
        note.title,
        note.category,
        note.created_at.to_rfc3339()
    )
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
