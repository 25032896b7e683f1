// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot reminder scheduling.
//!
//! Each pending reminder is a background timer thread parked on a
//! cancellation channel. Firing locks the shared store, resolves the note
//! (a note deleted in the meantime silently no-ops), drops the spent
//! reminder record, and invokes the injected [`Notifier`] outside the lock.
//! Delivery is at-most-once, best-effort: notifier failures are logged and
//! swallowed, and nothing is retried.
//!
//! Timers are keyed by `(user_id, note_id)` so note deletion can cancel
//! the pending task instead of leaving an orphaned timer.

use std::collections::HashMap;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;

use chrono::{DateTime, TimeDelta, Utc};

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::store::NoteStore;

/// Outbound delivery seam. The daemon injects its transport here.
pub trait Notifier: Send + Sync {
    /// Delivers one reminder text to the user. Errors are logged by the
    /// scheduler and never propagated into the timer thread.
    fn notify(&self, user_id: &str, text: &str) -> Result<()>;
}

type TimerKey = (String, u64);

/// Schedules and fires delayed notifications tied to notes.
pub struct ReminderScheduler {
    store: Arc<Mutex<NoteStore>>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    timers: Mutex<HashMap<TimerKey, mpsc::Sender<()>>>,
}

impl ReminderScheduler {
    /// Creates a scheduler over the shared store with the system clock.
    pub fn new(store: Arc<Mutex<NoteStore>>, notifier: Arc<dyn Notifier>) -> Arc<Self> {
        Self::with_clock(store, notifier, Arc::new(SystemClock))
    }

    /// Creates a scheduler with a custom clock source.
    pub fn with_clock(
        store: Arc<Mutex<NoteStore>>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Arc<Self> {
        Arc::new(ReminderScheduler {
            store,
            notifier,
            clock,
            timers: Mutex::new(HashMap::new()),
        })
    }

    /// Schedules a one-shot reminder at an absolute fire time.
    ///
    /// A fire time at or before now fires synchronously on the caller's
    /// thread. Scheduling again for the same `(user, note)` replaces the
    /// pending timer.
    pub fn schedule(self: &Arc<Self>, user_id: &str, note_id: u64, fire_at: DateTime<Utc>) {
        let delay = fire_at - self.clock.now();
        if delay <= TimeDelta::zero() {
            self.fire(user_id, note_id);
            return;
        }
        let Ok(delay) = delay.to_std() else {
            self.fire(user_id, note_id);
            return;
        };

        let (tx, rx) = mpsc::channel::<()>();
        self.lock_timers().insert((user_id.to_string(), note_id), tx);

        let scheduler = Arc::clone(self);
        let uid = user_id.to_string();
        thread::spawn(move || {
            match rx.recv_timeout(delay) {
                Err(RecvTimeoutError::Timeout) => {
                    scheduler.lock_timers().remove(&(uid.clone(), note_id));
                    scheduler.fire(&uid, note_id);
                }
                // Anything else means the handle was signalled or dropped:
                // the timer was cancelled or replaced.
                _ => {}
            }
        });
    }

    /// Cancels the pending timer for a note. Returns true iff one existed.
    ///
    /// Only the timer is cancelled here; the reminder record lives in the
    /// store and is removed by the caller that owns the mutation.
    pub fn cancel(&self, user_id: &str, note_id: u64) -> bool {
        self.lock_timers()
            .remove(&(user_id.to_string(), note_id))
            .is_some()
    }

    /// Cancels every pending timer for a user (used by clear-all).
    pub fn cancel_user(&self, user_id: &str) {
        self.lock_timers().retain(|(uid, _), _| uid != user_id);
    }

    /// True iff a timer is pending for the note.
    pub fn is_scheduled(&self, user_id: &str, note_id: u64) -> bool {
        self.lock_timers()
            .contains_key(&(user_id.to_string(), note_id))
    }

    /// Re-registers every persisted reminder at its original absolute fire
    /// time. Overdue reminders fire immediately, which is the recovery
    /// path after process downtime.
    pub fn schedule_all_on_startup(self: &Arc<Self>) {
        let reminders = self
            .store
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .all_reminders();
        for (user_id, reminder) in reminders {
            self.schedule(&user_id, reminder.note_id, reminder.fire_at);
        }
    }

    fn fire(&self, user_id: &str, note_id: u64) {
        let text = {
            let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
            let text = store.get_note(user_id, note_id).map(|note| {
                format!(
                    "Reminder - Note #{}: {}\n{}",
                    note.id, note.title, note.content
                )
            });
            // Fired or orphaned, either way the record is spent.
            store.remove_reminder(user_id, note_id);
            text
        };
        // Note deleted in the meantime: silent no-op.
        let Some(text) = text else { return };
        if let Err(e) = self.notifier.notify(user_id, &text) {
            tracing::warn!("failed to deliver reminder for note #{note_id}: {e}");
        }
    }

    fn lock_timers(&self) -> std::sync::MutexGuard<'_, HashMap<TimerKey, mpsc::Sender<()>>> {
        self.timers.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "reminder_tests.rs"]
mod tests;
