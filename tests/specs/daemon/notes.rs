// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use memo_ipc::{
    DaemonRequest, DaemonResponse, EventKind, InboundEvent, MutateOp, MutateResult, PageRef,
    QueryOp, QueryResult,
};
use yare::parameterized;

use super::common::{Daemon, TempDir};

fn list(daemon: &Daemon, user: &str, page: PageRef) -> (usize, usize, usize) {
    match daemon.request(&DaemonRequest::Query(QueryOp::ListNotes {
        user_id: user.to_string(),
        page,
    })) {
        DaemonResponse::QueryResult(QueryResult::NotePage { notes, total_pages, page }) => {
            (notes.len(), total_pages, page)
        }
        other => panic!("expected NotePage, got {other:?}"),
    }
}

#[test]
fn add_then_get_round_trips() {
    let temp = TempDir::new().unwrap();
    let mut daemon = Daemon::start(temp.path());
    let id = daemon.add_note("alice", "Groceries", "milk\neggs", "Shopping");

    match daemon.request(&DaemonRequest::Query(QueryOp::GetNote {
        user_id: "alice".into(),
        note_id: id,
    })) {
        DaemonResponse::QueryResult(QueryResult::Note { note }) => {
            assert_eq!(note.id, id);
            assert_eq!(note.title, "Groceries");
            assert_eq!(note.content, "milk\neggs");
            assert_eq!(note.category, "Shopping");
        }
        other => panic!("expected Note, got {other:?}"),
    }
    daemon.shutdown();
}

#[test]
fn listing_is_newest_first() {
    let temp = TempDir::new().unwrap();
    let mut daemon = Daemon::start(temp.path());
    daemon.add_note("alice", "first", "x", "");
    daemon.add_note("alice", "second", "y", "");
    daemon.add_note("alice", "third", "z", "");

    match daemon.request(&DaemonRequest::Query(QueryOp::ListNotes {
        user_id: "alice".into(),
        page: PageRef::first(),
    })) {
        DaemonResponse::QueryResult(QueryResult::NotePage { notes, .. }) => {
            let titles: Vec<&str> = notes.iter().map(|n| n.title.as_str()).collect();
            assert_eq!(titles, ["third", "second", "first"]);
        }
        other => panic!("expected NotePage, got {other:?}"),
    }
    daemon.shutdown();
}

#[parameterized(
    first_page = { 0, 5, 0 },
    last_page = { 2, 2, 2 },
    beyond_end_clamps = { 9, 2, 2 },
)]
fn pagination_over_twelve_notes(requested: usize, expect_len: usize, expect_page: usize) {
    let temp = TempDir::new().unwrap();
    let mut daemon = Daemon::start(temp.path());
    for i in 0..12 {
        daemon.add_note("alice", &format!("n{i}"), "x", "");
    }
    let (len, total_pages, page) = list(
        &daemon,
        "alice",
        PageRef { page: requested, category: None },
    );
    assert_eq!(total_pages, 3);
    assert_eq!(len, expect_len);
    assert_eq!(page, expect_page);
    daemon.shutdown();
}

#[test]
fn category_filter_narrows_listing() {
    let temp = TempDir::new().unwrap();
    let mut daemon = Daemon::start(temp.path());
    daemon.add_note("alice", "a", "x", "Work");
    daemon.add_note("alice", "b", "y", "Home");
    daemon.add_note("alice", "c", "z", "Work");

    let (len, total_pages, _) = list(
        &daemon,
        "alice",
        PageRef { page: 0, category: Some("Work".into()) },
    );
    assert_eq!(len, 2);
    assert_eq!(total_pages, 1);
    daemon.shutdown();
}

#[test]
fn search_is_case_insensitive_and_empty_query_matches_nothing() {
    let temp = TempDir::new().unwrap();
    let mut daemon = Daemon::start(temp.path());
    daemon.add_note("alice", "Home Office", "standing desk", "Work");

    let search = |q: &str| match daemon.request(&DaemonRequest::Query(QueryOp::SearchNotes {
        user_id: "alice".into(),
        query: q.to_string(),
    })) {
        DaemonResponse::QueryResult(QueryResult::Notes { notes }) => notes.len(),
        other => panic!("expected Notes, got {other:?}"),
    };

    assert_eq!(search("home"), 1);
    assert_eq!(search("DESK"), 1);
    assert_eq!(search(""), 0);
    assert_eq!(search("missing"), 0);
    daemon.shutdown();
}

#[test]
fn categories_are_sorted_and_deduplicated() {
    let temp = TempDir::new().unwrap();
    let mut daemon = Daemon::start(temp.path());
    daemon.add_note("alice", "a", "x", "Work");
    daemon.add_note("alice", "b", "y", "Home");
    daemon.add_note("alice", "c", "z", "Work");

    match daemon.request(&DaemonRequest::Query(QueryOp::ListCategories {
        user_id: "alice".into(),
    })) {
        DaemonResponse::QueryResult(QueryResult::Categories { categories }) => {
            assert_eq!(categories, ["Home", "Work"]);
        }
        other => panic!("expected Categories, got {other:?}"),
    }
    daemon.shutdown();
}

#[test]
fn delete_and_clear_reset_state() {
    let temp = TempDir::new().unwrap();
    let mut daemon = Daemon::start(temp.path());
    let a = daemon.add_note("alice", "a", "x", "");
    daemon.add_note("alice", "b", "y", "");

    let response = daemon.request(&DaemonRequest::Mutate(MutateOp::DeleteNote {
        user_id: "alice".into(),
        note_id: a,
    }));
    assert_eq!(
        response,
        DaemonResponse::MutateResult(MutateResult::Changed { changed: true })
    );

    // Ids keep climbing after a delete.
    let c = daemon.add_note("alice", "c", "z", "");
    assert_eq!(c, 3);

    daemon.request(&DaemonRequest::Mutate(MutateOp::ClearAll { user_id: "alice".into() }));
    let (len, total_pages, _) = list(&daemon, "alice", PageRef::first());
    assert_eq!(len, 0);
    assert_eq!(total_pages, 0);

    // A cleared account numbers from 1 again.
    assert_eq!(daemon.add_note("alice", "d", "w", ""), 1);
    daemon.shutdown();
}

#[test]
fn free_text_event_becomes_a_note() {
    let temp = TempDir::new().unwrap();
    let mut daemon = Daemon::start(temp.path());

    let response = daemon.request(&DaemonRequest::Event(InboundEvent {
        user_id: "alice".into(),
        kind: EventKind::FreeText,
        payload: "Title: Groceries\nCategory: Shopping\nmilk".into(),
    }));
    let id = match response {
        DaemonResponse::MutateResult(MutateResult::Created { note_id }) => note_id,
        other => panic!("expected Created, got {other:?}"),
    };
    match daemon.request(&DaemonRequest::Query(QueryOp::GetNote {
        user_id: "alice".into(),
        note_id: id,
    })) {
        DaemonResponse::QueryResult(QueryResult::Note { note }) => {
            assert_eq!(note.title, "Groceries");
            assert_eq!(note.category, "Shopping");
        }
        other => panic!("expected Note, got {other:?}"),
    }
    daemon.shutdown();
}

#[test]
fn users_do_not_see_each_other() {
    let temp = TempDir::new().unwrap();
    let mut daemon = Daemon::start(temp.path());
    daemon.add_note("alice", "mine", "x", "");
    daemon.add_note("bob", "theirs", "y", "");

    let (len, _, _) = list(&daemon, "alice", PageRef::first());
    assert_eq!(len, 1);
    let (len, _, _) = list(&daemon, "bob", PageRef::first());
    assert_eq!(len, 1);
    daemon.shutdown();
}
