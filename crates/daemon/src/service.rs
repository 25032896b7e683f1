// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Request dispatch into the note core.
//!
//! Thin adapter that executes IPC query, mutation, and event operations
//! against the shared [`NoteStore`] under its mutex, and keeps the reminder
//! scheduler in step with note lifecycle (deletes and clears cancel pending
//! timers).

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use memo_core::compose::parse_draft;
use memo_core::persist::SnapshotStore;
use memo_core::query;
use memo_core::reminder::{Notifier, ReminderScheduler};
use memo_core::store::NoteStore;
use memo_ipc::{
    DaemonRequest, DaemonResponse, DaemonStatus, EventKind, InboundEvent, MutateOp, MutateResult,
    PageRef, QueryOp, QueryResult,
};

/// Fixed listing page size, matching the chat UI.
pub const PAGE_SIZE: usize = 5;

/// Daemon-side service owning the shared store and scheduler.
pub struct Service {
    store: Arc<Mutex<NoteStore>>,
    scheduler: Arc<ReminderScheduler>,
    start_time: Instant,
}

impl Service {
    /// Builds the service over a persistence gateway and a notifier.
    pub fn new(gateway: Box<dyn SnapshotStore>, notifier: Arc<dyn Notifier>) -> Self {
        let store = Arc::new(Mutex::new(NoteStore::open(gateway)));
        let scheduler = ReminderScheduler::new(Arc::clone(&store), notifier);
        Service { store, scheduler, start_time: Instant::now() }
    }

    /// Re-registers persisted reminders after a restart. Overdue ones fire
    /// immediately.
    pub fn recover_reminders(&self) {
        self.scheduler.schedule_all_on_startup();
    }

    /// Executes one request and returns the response to frame back.
    pub fn handle(&self, request: DaemonRequest) -> DaemonResponse {
        match request {
            DaemonRequest::Ping => DaemonResponse::Pong,
            DaemonRequest::Status => {
                let users = self.lock_store().user_ids().len();
                DaemonResponse::Status(DaemonStatus::new(
                    std::process::id(),
                    self.start_time.elapsed().as_secs(),
                    users,
                ))
            }
            DaemonRequest::Shutdown => DaemonResponse::ShuttingDown,
            DaemonRequest::Hello { version: _ } => DaemonResponse::Hello {
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            DaemonRequest::Event(event) => self.handle_event(event),
            DaemonRequest::Query(op) => self.handle_query(op),
            DaemonRequest::Mutate(op) => self.handle_mutate(op),
        }
    }

    fn handle_query(&self, op: QueryOp) -> DaemonResponse {
        let store = self.lock_store();
        match op {
            QueryOp::GetNote { user_id, note_id } => match store.get_note(&user_id, note_id) {
                Some(note) => DaemonResponse::QueryResult(QueryResult::Note { note: note.clone() }),
                None => DaemonResponse::Error {
                    message: format!("note not found: #{note_id}"),
                },
            },
            QueryOp::ListNotes { user_id, page } => {
                let notes = match store.user(&user_id) {
                    Some(user) => {
                        query::filter_by_category(query::list_notes(user), page.category.as_deref())
                    }
                    None => Vec::new(),
                };
                let paged = query::paginate(&notes, PAGE_SIZE, page.page);
                DaemonResponse::QueryResult(QueryResult::NotePage {
                    notes: paged.items,
                    total_pages: paged.total_pages,
                    page: paged.page,
                })
            }
            QueryOp::SearchNotes { user_id, query: q } => {
                let notes = store
                    .user(&user_id)
                    .map(|user| query::search(user, &q))
                    .unwrap_or_default();
                DaemonResponse::QueryResult(QueryResult::Notes { notes })
            }
            QueryOp::ListCategories { user_id } => {
                let categories = store
                    .user(&user_id)
                    .map(query::categories)
                    .unwrap_or_default();
                DaemonResponse::QueryResult(QueryResult::Categories { categories })
            }
            QueryOp::ListPinned { user_id } => {
                let notes = store
                    .user(&user_id)
                    .map(query::pinned_notes)
                    .unwrap_or_default();
                DaemonResponse::QueryResult(QueryResult::Notes { notes })
            }
            QueryOp::ExportNotes { user_id, only_ids } => {
                let notes = store
                    .user(&user_id)
                    .map(|user| memo_core::export::export_notes(user, only_ids.as_deref()))
                    .unwrap_or_default();
                DaemonResponse::QueryResult(QueryResult::Notes { notes })
            }
        }
    }

    fn handle_mutate(&self, op: MutateOp) -> DaemonResponse {
        match op {
            MutateOp::EnsureUser { user_id } => {
                self.lock_store().ensure_user(&user_id);
                DaemonResponse::MutateResult(MutateResult::Ok)
            }
            MutateOp::AddNote { user_id, title, content, category } => {
                let note_id = self
                    .lock_store()
                    .add_note(&user_id, &title, &content, &category);
                DaemonResponse::MutateResult(MutateResult::Created { note_id })
            }
            MutateOp::ComposeNote { user_id, text } => self.compose(&user_id, &text),
            MutateOp::UpdateCategory { user_id, note_id, category } => {
                let changed = self
                    .lock_store()
                    .update_category(&user_id, note_id, &category);
                DaemonResponse::MutateResult(MutateResult::Changed { changed })
            }
            MutateOp::DeleteNote { user_id, note_id } => {
                // Cancel first so a due timer cannot fire mid-delete.
                self.scheduler.cancel(&user_id, note_id);
                let changed = self.lock_store().delete_note(&user_id, note_id);
                DaemonResponse::MutateResult(MutateResult::Changed { changed })
            }
            MutateOp::ClearAll { user_id } => {
                self.scheduler.cancel_user(&user_id);
                self.lock_store().clear_all(&user_id);
                DaemonResponse::MutateResult(MutateResult::Ok)
            }
            MutateOp::PinNote { user_id, note_id } => {
                let changed = self.lock_store().pin_note(&user_id, note_id);
                DaemonResponse::MutateResult(MutateResult::Changed { changed })
            }
            MutateOp::UnpinNote { user_id, note_id } => {
                let changed = self.lock_store().unpin_note(&user_id, note_id);
                DaemonResponse::MutateResult(MutateResult::Changed { changed })
            }
            MutateOp::SetLang { user_id, lang } => {
                self.lock_store().set_lang(&user_id, &lang);
                DaemonResponse::MutateResult(MutateResult::Ok)
            }
            MutateOp::ScheduleReminder { user_id, note_id, fire_at } => {
                let recorded = self.lock_store().add_reminder(&user_id, note_id, fire_at);
                if !recorded {
                    return DaemonResponse::Error {
                        message: format!("note not found: #{note_id}"),
                    };
                }
                // The store lock is released: a past-due fire happens inline
                // and takes the lock itself.
                self.scheduler.schedule(&user_id, note_id, fire_at);
                DaemonResponse::MutateResult(MutateResult::Ok)
            }
            MutateOp::CancelReminder { user_id, note_id } => {
                let changed = self.scheduler.cancel(&user_id, note_id);
                self.lock_store().remove_reminder(&user_id, note_id);
                DaemonResponse::MutateResult(MutateResult::Changed { changed })
            }
        }
    }

    fn handle_event(&self, event: InboundEvent) -> DaemonResponse {
        match event.kind {
            EventKind::Command => match event.payload.trim().trim_start_matches('/') {
                "start" => self.handle_mutate(MutateOp::EnsureUser { user_id: event.user_id }),
                "clear" => self.handle_mutate(MutateOp::ClearAll { user_id: event.user_id }),
                other => DaemonResponse::Error {
                    message: format!("unknown command: '{other}'"),
                },
            },
            EventKind::FreeText => self.compose(&event.user_id, &event.payload),
            EventKind::ButtonPress => match serde_json::from_str::<PageRef>(&event.payload) {
                Ok(page) => self.handle_query(QueryOp::ListNotes {
                    user_id: event.user_id,
                    page,
                }),
                Err(e) => DaemonResponse::Error {
                    message: format!("malformed page payload: {e}"),
                },
            },
        }
    }

    /// Routes free text through the note-creation mini-format.
    fn compose(&self, user_id: &str, text: &str) -> DaemonResponse {
        let draft = parse_draft(text);
        let mut store = self.lock_store();
        let note_id = if draft.is_terse() {
            store.add_quick_note(user_id, &draft.content)
        } else {
            store.add_note(
                user_id,
                draft.title.as_deref().unwrap_or(""),
                &draft.content,
                draft.category.as_deref().unwrap_or(""),
            )
        };
        DaemonResponse::MutateResult(MutateResult::Created { note_id })
    }

    fn lock_store(&self) -> MutexGuard<'_, NoteStore> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
