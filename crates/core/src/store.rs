// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory note store with per-user records.
//!
//! [`NoteStore`] owns the whole in-memory state and is the only thing that
//! talks to the persistence gateway. Every successful mutation is flushed
//! through the gateway; a failed flush is logged and swallowed, and the
//! in-memory state stays authoritative for the current process lifetime.
//!
//! Callers in multi-threaded contexts (the daemon loop plus reminder timer
//! threads) must wrap the store in a mutex; concurrent `add_note` calls
//! without serialization could double-assign `next_id`.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::clock::{Clock, SystemClock};
use crate::note::{derive_title, Note, Reminder, StoreSnapshot, UserRecord, DEFAULT_CATEGORY, QUICK_CATEGORY};
use crate::persist::SnapshotStore;

/// `clear_all` resets the id namespace: the next note after a clear gets
/// id 1 again. Kept as observed behavior; reminders for the cleared notes
/// are dropped (and their timers cancelled) so a reused id cannot collide
/// with a stale reminder.
pub const RESET_ID_NAMESPACE_ON_CLEAR: bool = true;

/// In-memory collection of notes per user with id allocation.
pub struct NoteStore {
    users: HashMap<String, UserRecord>,
    gateway: Box<dyn SnapshotStore>,
    clock: Arc<dyn Clock>,
}

impl NoteStore {
    /// Opens a store, loading the initial state through the gateway.
    pub fn open(gateway: Box<dyn SnapshotStore>) -> Self {
        Self::with_clock(gateway, Arc::new(SystemClock))
    }

    /// Opens a store with a custom clock source.
    pub fn with_clock(gateway: Box<dyn SnapshotStore>, clock: Arc<dyn Clock>) -> Self {
        let snapshot = gateway.load();
        NoteStore { users: snapshot.users, gateway, clock }
    }

    /// Idempotently creates a record for the user. Triggers a persistence
    /// write on creation; a no-op if the user already exists.
    pub fn ensure_user(&mut self, user_id: &str) {
        if !self.users.contains_key(user_id) {
            self.users.insert(user_id.to_string(), UserRecord::new());
            self.persist();
        }
    }

    /// Returns the record for a user, if any.
    pub fn user(&self, user_id: &str) -> Option<&UserRecord> {
        self.users.get(user_id)
    }

    /// All user ids currently known to the store.
    pub fn user_ids(&self) -> Vec<String> {
        self.users.keys().cloned().collect()
    }

    /// Creates a note and returns its id.
    ///
    /// An empty title is derived from the content (first 50 chars, ellipsis
    /// when truncated, "Untitled Note" when the content is empty too). An
    /// empty category defaults to "General".
    pub fn add_note(&mut self, user_id: &str, title: &str, content: &str, category: &str) -> u64 {
        self.add_with_default(user_id, title, content, category, DEFAULT_CATEGORY)
    }

    /// Creates a note from the terse single-line flow: the text is the
    /// content, the title is derived, and the category is "Quick Notes".
    pub fn add_quick_note(&mut self, user_id: &str, text: &str) -> u64 {
        self.add_with_default(user_id, "", text, "", QUICK_CATEGORY)
    }

    fn add_with_default(
        &mut self,
        user_id: &str,
        title: &str,
        content: &str,
        category: &str,
        default_category: &str,
    ) -> u64 {
        self.ensure_user(user_id);
        let created_at = self.clock.now();
        let user = self.users.entry(user_id.to_string()).or_default();

        // Never len()+1: a deleted id must not be reissued.
        let id = user.next_id;
        user.next_id += 1;

        let title = if title.trim().is_empty() {
            derive_title(content)
        } else {
            title.trim().to_string()
        };
        let category = if category.trim().is_empty() {
            default_category.to_string()
        } else {
            category.trim().to_string()
        };

        user.notes.push(Note {
            id,
            title,
            content: content.to_string(),
            category,
            created_at,
        });
        self.persist();
        id
    }

    /// Linear lookup of a note by id within the user's notes.
    pub fn get_note(&self, user_id: &str, note_id: u64) -> Option<&Note> {
        self.users.get(user_id)?.notes.iter().find(|n| n.id == note_id)
    }

    /// Rewrites a note's category. Returns true iff the note was found.
    /// The new category is not validated; an empty string is allowed.
    pub fn update_category(&mut self, user_id: &str, note_id: u64, new_category: &str) -> bool {
        let Some(user) = self.users.get_mut(user_id) else {
            return false;
        };
        let Some(note) = user.notes.iter_mut().find(|n| n.id == note_id) else {
            return false;
        };
        note.category = new_category.to_string();
        self.persist();
        true
    }

    /// Hard-deletes a note. Returns true iff a note with that id existed;
    /// a second delete of the same id returns false. Any pending reminder
    /// record for the note is dropped with it.
    pub fn delete_note(&mut self, user_id: &str, note_id: u64) -> bool {
        let Some(user) = self.users.get_mut(user_id) else {
            return false;
        };
        let before = user.notes.len();
        user.notes.retain(|n| n.id != note_id);
        if user.notes.len() == before {
            return false;
        }
        user.reminders.retain(|r| r.note_id != note_id);
        user.pinned.retain(|&id| id != note_id);
        self.persist();
        true
    }

    /// Removes all of a user's notes, reminders, and pins, and resets the
    /// id namespace (see [`RESET_ID_NAMESPACE_ON_CLEAR`]).
    pub fn clear_all(&mut self, user_id: &str) {
        let Some(user) = self.users.get_mut(user_id) else {
            return;
        };
        *user = UserRecord { lang: user.lang.clone(), ..UserRecord::new() };
        self.persist();
    }

    /// Pins a note. Returns true iff the note exists and was not pinned.
    pub fn pin_note(&mut self, user_id: &str, note_id: u64) -> bool {
        if self.get_note(user_id, note_id).is_none() {
            return false;
        }
        let Some(user) = self.users.get_mut(user_id) else {
            return false;
        };
        if user.pinned.contains(&note_id) {
            return false;
        }
        user.pinned.push(note_id);
        self.persist();
        true
    }

    /// Unpins a note. Returns true iff it was pinned.
    pub fn unpin_note(&mut self, user_id: &str, note_id: u64) -> bool {
        let Some(user) = self.users.get_mut(user_id) else {
            return false;
        };
        let before = user.pinned.len();
        user.pinned.retain(|&id| id != note_id);
        let removed = user.pinned.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Sets the user's locale tag.
    pub fn set_lang(&mut self, user_id: &str, lang: &str) {
        self.ensure_user(user_id);
        if let Some(user) = self.users.get_mut(user_id) {
            user.lang = lang.to_string();
            self.persist();
        }
    }

    /// Records a reminder for a note. Returns false if the note is absent.
    pub fn add_reminder(&mut self, user_id: &str, note_id: u64, fire_at: DateTime<Utc>) -> bool {
        if self.get_note(user_id, note_id).is_none() {
            return false;
        }
        let Some(user) = self.users.get_mut(user_id) else {
            return false;
        };
        user.reminders.push(Reminder { note_id, fire_at });
        self.persist();
        true
    }

    /// Drops the reminder record for a note (after firing or cancellation).
    pub fn remove_reminder(&mut self, user_id: &str, note_id: u64) {
        let Some(user) = self.users.get_mut(user_id) else {
            return;
        };
        let before = user.reminders.len();
        user.reminders.retain(|r| r.note_id != note_id);
        if user.reminders.len() != before {
            self.persist();
        }
    }

    /// All pending reminders across users, for startup recovery.
    pub fn all_reminders(&self) -> Vec<(String, Reminder)> {
        self.users
            .iter()
            .flat_map(|(uid, user)| {
                user.reminders.iter().map(move |r| (uid.clone(), r.clone()))
            })
            .collect()
    }

    /// A point-in-time copy of the whole store.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot { users: self.users.clone() }
    }

    /// The clock this store stamps creations with.
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    fn persist(&self) {
        let snapshot = StoreSnapshot { users: self.users.clone() };
        if let Err(e) = self.gateway.save(&snapshot) {
            tracing::warn!("failed to persist store: {e}");
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
