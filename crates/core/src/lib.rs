// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! memo-core: Shared library for the memo note-taking assistant
//!
//! This crate provides the core data structures, the note store, query and
//! pagination helpers, reminder scheduling, and the persistence gateway
//! used by the memod daemon.

pub mod clock;
pub mod compose;
pub mod error;
pub mod export;
pub mod note;
pub mod persist;
pub mod query;
pub mod reminder;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use compose::{parse_draft, NoteDraft};
pub use error::{Error, Result};
pub use note::{Note, Reminder, StoreSnapshot, UserRecord};
pub use persist::{EphemeralStore, JsonFileStore, SnapshotStore};
pub use query::{paginate, Page};
pub use reminder::{Notifier, ReminderScheduler};
pub use store::NoteStore;
