// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence gateway for whole-store snapshots.
//!
//! The store talks to its backing medium only through [`SnapshotStore`].
//! Two deployment modes exist and are an explicit configuration choice:
//! durable (JSON file, every mutation flushed) and ephemeral (no-op saves,
//! state lost on restart).

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::note::StoreSnapshot;

/// Load/save contract for the whole-store snapshot.
///
/// Loads are fail-open: a missing or unreadable medium yields the empty
/// default snapshot. Save failures are surfaced to the caller, which logs
/// and swallows them; in-memory state stays authoritative for the life of
/// the process.
pub trait SnapshotStore: Send + Sync {
    /// Reads the snapshot, falling back to the empty default on any error.
    fn load(&self) -> StoreSnapshot;

    /// Writes the snapshot to the backing medium.
    fn save(&self, snapshot: &StoreSnapshot) -> Result<()>;
}

/// Durable mode: snapshot stored as a single JSON file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a gateway backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> StoreSnapshot {
        if !self.path.exists() {
            return StoreSnapshot::default();
        }
        match fs::read_to_string(&self.path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    tracing::error!("failed to parse {}: {e}", self.path.display());
                    StoreSnapshot::default()
                }
            },
            Err(e) => {
                tracing::error!("failed to read {}: {e}", self.path.display());
                StoreSnapshot::default()
            }
        }
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<()> {
        // Write-then-rename so a crash mid-save never truncates the store.
        let tmp = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(snapshot)?;
        let mut file = File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Ephemeral mode: saves are a no-op and loads are always empty.
#[derive(Debug, Default)]
pub struct EphemeralStore;

impl SnapshotStore for EphemeralStore {
    fn load(&self) -> StoreSnapshot {
        StoreSnapshot::default()
    }

    fn save(&self, _snapshot: &StoreSnapshot) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "persist_tests.rs"]
mod tests;
