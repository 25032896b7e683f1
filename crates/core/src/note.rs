// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Core note types for the memo assistant.
//!
//! This module contains the fundamental data types: Note, Reminder,
//! UserRecord, and StoreSnapshot.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default category for notes created through the full keyed flow.
pub const DEFAULT_CATEGORY: &str = "General";

/// Category for notes created through the terse single-line flow.
pub const QUICK_CATEGORY: &str = "Quick Notes";

/// Title used when neither a title nor content is supplied.
pub const UNTITLED: &str = "Untitled Note";

/// Maximum number of characters taken from content when deriving a title.
pub const TITLE_PREVIEW_LEN: usize = 50;

/// A titled, categorized text record owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Unique within the owning user; monotonically assigned, never reused.
    pub id: u64,
    /// Short display name.
    pub title: String,
    /// The note body.
    pub content: String,
    /// Free-form grouping label.
    pub category: String,
    /// When the note was created. Immutable.
    pub created_at: DateTime<Utc>,
}

/// A scheduled one-time notification tied to a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    /// The note this reminder belongs to.
    pub note_id: u64,
    /// Absolute fire time.
    pub fire_at: DateTime<Utc>,
}

/// Per-user aggregate of notes, reminders, and the id counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Stored notes in insertion order. Display order is always re-derived
    /// by `created_at` descending.
    pub notes: Vec<Note>,
    /// Next note id to allocate. Starts at 1, incremented on every
    /// allocation, never rolled back.
    pub next_id: u64,
    /// Pending reminders.
    pub reminders: Vec<Reminder>,
    /// Ids of pinned notes.
    pub pinned: Vec<u64>,
    /// Locale tag. Not consulted by core logic.
    pub lang: String,
}

impl UserRecord {
    /// Creates an empty record with the id counter at 1.
    pub fn new() -> Self {
        UserRecord {
            notes: Vec::new(),
            next_id: 1,
            reminders: Vec::new(),
            pinned: Vec::new(),
            lang: "en".to_string(),
        }
    }
}

impl Default for UserRecord {
    fn default() -> Self {
        UserRecord::new()
    }
}

/// Whole-store snapshot, the unit of load/save for the persistence gateway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// All known users keyed by user id.
    pub users: HashMap<String, UserRecord>,
}

/// Derives a display title from note content.
///
/// Takes the first [`TITLE_PREVIEW_LEN`] characters, appending an ellipsis
/// when truncated. Empty content yields [`UNTITLED`].
pub fn derive_title(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return UNTITLED.to_string();
    }
    let mut preview: String = trimmed.chars().take(TITLE_PREVIEW_LEN).collect();
    if trimmed.chars().count() > TITLE_PREVIEW_LEN {
        preview.push('…');
    }
    preview
}

#[cfg(test)]
#[path = "note_tests.rs"]
mod tests;
