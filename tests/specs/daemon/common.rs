// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test files,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::io::{BufRead, BufReader};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use memo_ipc::{framing, DaemonRequest, DaemonResponse, MutateOp, MutateResult, QueryOp};

pub use tempfile::TempDir;

/// A running daemon bound to a temp state directory. Shut down on drop.
pub struct Daemon {
    child: Child,
    state_dir: PathBuf,
    stopped: bool,
}

impl Daemon {
    /// Spawns the daemon in durable mode and waits for READY.
    pub fn start(state_dir: &Path) -> Daemon {
        Self::spawn(state_dir, false)
    }

    /// Spawns the daemon with the in-memory store.
    pub fn start_ephemeral(state_dir: &Path) -> Daemon {
        Self::spawn(state_dir, true)
    }

    fn spawn(state_dir: &Path, ephemeral: bool) -> Daemon {
        #[allow(deprecated)]
        let bin = assert_cmd::cargo::cargo_bin("memod");
        let mut cmd = Command::new(bin);
        cmd.arg("--state-dir")
            .arg(state_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        if ephemeral {
            cmd.arg("--ephemeral");
        }
        let mut child = cmd.spawn().expect("failed to spawn memod");

        // Wait for the READY line before connecting.
        let stdout = child.stdout.take().expect("no stdout handle");
        let mut reader = BufReader::new(stdout);
        let mut line = String::new();
        reader.read_line(&mut line).expect("daemon exited early");
        assert_eq!(line.trim(), "READY");

        Daemon {
            child,
            state_dir: state_dir.to_path_buf(),
            stopped: false,
        }
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Sends one framed request over a fresh connection and reads the reply.
    pub fn request(&self, request: &DaemonRequest) -> DaemonResponse {
        let socket = self.state_dir.join("daemon.sock");
        let mut stream = UnixStream::connect(&socket).expect("connect to daemon");
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        framing::write_message(&mut stream, request).expect("write request");
        framing::read_message(&mut stream).expect("read response")
    }

    /// Adds a note and returns its id.
    pub fn add_note(&self, user: &str, title: &str, content: &str, category: &str) -> u64 {
        let response = self.request(&DaemonRequest::Mutate(MutateOp::AddNote {
            user_id: user.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            category: category.to_string(),
        }));
        match response {
            DaemonResponse::MutateResult(MutateResult::Created { note_id }) => note_id,
            other => panic!("expected Created, got {other:?}"),
        }
    }

    /// Requests shutdown and waits for the process to exit.
    pub fn shutdown(&mut self) {
        if self.stopped {
            return;
        }
        let response = self.request(&DaemonRequest::Shutdown);
        assert_eq!(response, DaemonResponse::ShuttingDown);
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if self.child.try_wait().expect("wait on daemon").is_some() {
                self.stopped = true;
                return;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        panic!("daemon did not exit after shutdown");
    }
}

impl Drop for Daemon {
    fn drop(&mut self) {
        if !self.stopped {
            // Best effort: the socket may already be gone if a test killed it.
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Reads the delivery log, one JSON value per line.
pub fn read_outbox(state_dir: &Path) -> Vec<serde_json::Value> {
    let path = state_dir.join("outbox.jsonl");
    match std::fs::read_to_string(path) {
        Ok(text) => text
            .lines()
            .map(|line| serde_json::from_str(line).expect("outbox line is JSON"))
            .collect(),
        Err(_) => Vec::new(),
    }
}
