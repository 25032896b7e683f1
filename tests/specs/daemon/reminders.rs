// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::time::{Duration as StdDuration, Instant};

use chrono::{Duration, Utc};
use memo_ipc::{DaemonRequest, DaemonResponse, MutateOp, MutateResult};

use super::common::{read_outbox, Daemon, TempDir};

fn wait_for_outbox(daemon: &Daemon, want: usize) -> Vec<serde_json::Value> {
    let deadline = Instant::now() + StdDuration::from_secs(5);
    loop {
        let outbox = read_outbox(daemon.state_dir());
        if outbox.len() >= want || Instant::now() >= deadline {
            return outbox;
        }
        std::thread::sleep(StdDuration::from_millis(25));
    }
}

#[test]
fn past_due_reminder_is_delivered_immediately() {
    let temp = TempDir::new().unwrap();
    let mut daemon = Daemon::start(temp.path());
    let id = daemon.add_note("alice", "Dentist", "2pm appointment", "");

    let response = daemon.request(&DaemonRequest::Mutate(MutateOp::ScheduleReminder {
        user_id: "alice".into(),
        note_id: id,
        fire_at: Utc::now() - Duration::minutes(1),
    }));
    assert_eq!(response, DaemonResponse::MutateResult(MutateResult::Ok));

    let outbox = read_outbox(daemon.state_dir());
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0]["user_id"], "alice");
    let text = outbox[0]["text"].as_str().unwrap();
    assert!(text.contains(&format!("Reminder - Note #{id}: Dentist")));
    assert!(text.contains("2pm appointment"));
    daemon.shutdown();
}

#[test]
fn near_future_reminder_fires_once() {
    let temp = TempDir::new().unwrap();
    let mut daemon = Daemon::start(temp.path());
    let id = daemon.add_note("alice", "Standup", "join the call", "");

    daemon.request(&DaemonRequest::Mutate(MutateOp::ScheduleReminder {
        user_id: "alice".into(),
        note_id: id,
        fire_at: Utc::now() + Duration::milliseconds(100),
    }));

    let outbox = wait_for_outbox(&daemon, 1);
    assert_eq!(outbox.len(), 1);

    // No second delivery arrives.
    std::thread::sleep(StdDuration::from_millis(300));
    assert_eq!(read_outbox(daemon.state_dir()).len(), 1);
    daemon.shutdown();
}

#[test]
fn cancelled_reminder_never_fires() {
    let temp = TempDir::new().unwrap();
    let mut daemon = Daemon::start(temp.path());
    let id = daemon.add_note("alice", "Skip", "nothing", "");

    daemon.request(&DaemonRequest::Mutate(MutateOp::ScheduleReminder {
        user_id: "alice".into(),
        note_id: id,
        fire_at: Utc::now() + Duration::milliseconds(150),
    }));
    let response = daemon.request(&DaemonRequest::Mutate(MutateOp::CancelReminder {
        user_id: "alice".into(),
        note_id: id,
    }));
    assert_eq!(
        response,
        DaemonResponse::MutateResult(MutateResult::Changed { changed: true })
    );

    std::thread::sleep(StdDuration::from_millis(400));
    assert!(read_outbox(daemon.state_dir()).is_empty());
    daemon.shutdown();
}

#[test]
fn deleting_the_note_cancels_its_reminder() {
    let temp = TempDir::new().unwrap();
    let mut daemon = Daemon::start(temp.path());
    let id = daemon.add_note("alice", "Doomed", "nothing", "");

    daemon.request(&DaemonRequest::Mutate(MutateOp::ScheduleReminder {
        user_id: "alice".into(),
        note_id: id,
        fire_at: Utc::now() + Duration::milliseconds(150),
    }));
    daemon.request(&DaemonRequest::Mutate(MutateOp::DeleteNote {
        user_id: "alice".into(),
        note_id: id,
    }));

    std::thread::sleep(StdDuration::from_millis(400));
    assert!(read_outbox(daemon.state_dir()).is_empty());
    daemon.shutdown();
}

#[test]
fn overdue_reminder_is_delivered_after_restart() {
    let temp = TempDir::new().unwrap();

    let mut daemon = Daemon::start(temp.path());
    let id = daemon.add_note("alice", "Missed", "it already passed", "");
    // Far enough out that it cannot fire before shutdown.
    daemon.request(&DaemonRequest::Mutate(MutateOp::ScheduleReminder {
        user_id: "alice".into(),
        note_id: id,
        fire_at: Utc::now() + Duration::milliseconds(300),
    }));
    daemon.shutdown();
    assert!(read_outbox(temp.path()).is_empty());

    // By the time the daemon is back, the fire time is in the past.
    std::thread::sleep(StdDuration::from_millis(400));
    let mut daemon = Daemon::start(temp.path());
    let outbox = wait_for_outbox(&daemon, 1);
    assert_eq!(outbox.len(), 1);
    assert!(outbox[0]["text"]
        .as_str()
        .unwrap()
        .contains(&format!("Note #{id}: Missed")));
    daemon.shutdown();
}

#[test]
fn future_reminder_survives_restart_and_fires_on_time() {
    let temp = TempDir::new().unwrap();

    let mut daemon = Daemon::start(temp.path());
    let id = daemon.add_note("alice", "Later", "still coming", "");
    daemon.request(&DaemonRequest::Mutate(MutateOp::ScheduleReminder {
        user_id: "alice".into(),
        note_id: id,
        fire_at: Utc::now() + Duration::seconds(2),
    }));
    daemon.shutdown();

    let mut daemon = Daemon::start(temp.path());
    assert!(read_outbox(daemon.state_dir()).is_empty());
    let outbox = wait_for_outbox(&daemon, 1);
    assert_eq!(outbox.len(), 1);
    daemon.shutdown();
}
