// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Outbound reminder delivery.
//!
//! The daemon has no chat network of its own; delivered reminders are
//! appended to `outbox.jsonl` in the state directory, one JSON record per
//! line, for the transport collaborator to pick up.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use memo_core::{Notifier, Result};

/// One delivered reminder line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxRecord {
    /// The recipient.
    pub user_id: String,
    /// The rendered reminder text.
    pub text: String,
    /// When the daemon wrote the line.
    pub delivered_at: DateTime<Utc>,
}

/// Notifier that appends delivered reminders to a JSONL outbox file.
pub struct OutboxNotifier {
    path: PathBuf,
}

impl OutboxNotifier {
    /// Creates a notifier writing to the given outbox path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        OutboxNotifier { path: path.into() }
    }
}

impl Notifier for OutboxNotifier {
    fn notify(&self, user_id: &str, text: &str) -> Result<()> {
        let record = OutboxRecord {
            user_id: user_id.to_string(),
            text: text.to_string(),
            delivered_at: Utc::now(),
        };
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let json = serde_json::to_string(&record)?;
        writeln!(file, "{json}")?;
        file.sync_all()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
