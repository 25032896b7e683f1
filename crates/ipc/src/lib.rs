// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared IPC protocol between the bot transport and the memod daemon.
//!
//! This crate defines the inbound event contract, the query/mutation
//! operations, and the framing protocol used on the daemon socket.
//! Messages are serialized as JSON with length-prefixed framing.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Re-export the note model from core (canonical definition).
pub use memo_core::Note;

/// Error returned by `FromStr` impls for IPC model types.
#[derive(Debug, Clone)]
pub enum ParseError {
    /// Invalid event kind string.
    InvalidEventKind(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidEventKind(s) => write!(f, "invalid event kind: '{}'", s),
        }
    }
}

impl std::error::Error for ParseError {}

// ============================================================================
// Inbound event contract
// ============================================================================

/// Kind of inbound chat event, as classified by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A slash-style command ("start", "clear", ...).
    Command,
    /// Arbitrary message text; routed through the note-creation parser.
    FreeText,
    /// An inline button press; the payload is a JSON [`PageRef`].
    ButtonPress,
}

impl EventKind {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Command => "command",
            EventKind::FreeText => "free_text",
            EventKind::ButtonPress => "button_press",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, ParseError> {
        match s.to_lowercase().as_str() {
            "command" => Ok(EventKind::Command),
            "free_text" => Ok(EventKind::FreeText),
            "button_press" => Ok(EventKind::ButtonPress),
            _ => Err(ParseError::InvalidEventKind(s.to_string())),
        }
    }
}

/// One inbound chat event, already stripped of transport envelopes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundEvent {
    /// The originating user.
    pub user_id: String,
    /// How the transport classified the event.
    pub kind: EventKind,
    /// Command name, message text, or encoded button payload.
    pub payload: String,
}

/// Structured page-navigation payload carried by button presses.
///
/// The transport may stringify this however it likes on the wire to the
/// chat network; the core only ever sees the structured pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRef {
    /// Requested page index (clamped by the query engine).
    pub page: usize,
    /// Category filter; `None` or `"All"` means no filtering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl PageRef {
    /// First page, no category filter.
    pub fn first() -> Self {
        PageRef { page: 0, category: None }
    }
}

// ============================================================================
// Protocol types
// ============================================================================

/// Request sent from the transport to the daemon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum DaemonRequest {
    /// Get daemon status.
    Status,
    /// Graceful shutdown.
    Shutdown,
    /// Ping to check if daemon is alive.
    Ping,
    /// Version handshake request.
    Hello { version: String },
    /// A raw inbound chat event for the daemon to route.
    Event(InboundEvent),
    /// Note query operation.
    Query(QueryOp),
    /// Note mutation operation.
    Mutate(MutateOp),
}

/// Query operations for reading a user's notes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op")]
pub enum QueryOp {
    /// Get a single note by id.
    GetNote { user_id: String, note_id: u64 },
    /// List one page of notes, optionally filtered by category.
    ListNotes { user_id: String, page: PageRef },
    /// Case-insensitive substring search.
    SearchNotes { user_id: String, query: String },
    /// Distinct categories across the user's notes.
    ListCategories { user_id: String },
    /// The pinned subset.
    ListPinned { user_id: String },
    /// Notes for the export collaborator, optionally filtered by id.
    ExportNotes {
        user_id: String,
        only_ids: Option<Vec<u64>>,
    },
}

/// Mutation operations for writing a user's notes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op")]
pub enum MutateOp {
    /// Lazily create the user record.
    EnsureUser { user_id: String },
    /// Create a note from explicit fields.
    AddNote {
        user_id: String,
        title: String,
        content: String,
        category: String,
    },
    /// Create a note from free text via the mini-format parser.
    ComposeNote { user_id: String, text: String },
    /// Rewrite a note's category.
    UpdateCategory {
        user_id: String,
        note_id: u64,
        category: String,
    },
    /// Hard-delete a note (cancels its pending reminder).
    DeleteNote { user_id: String, note_id: u64 },
    /// Remove all notes and reset the id namespace.
    ClearAll { user_id: String },
    /// Pin a note.
    PinNote { user_id: String, note_id: u64 },
    /// Unpin a note.
    UnpinNote { user_id: String, note_id: u64 },
    /// Set the user's locale tag.
    SetLang { user_id: String, lang: String },
    /// Record and schedule a reminder for a note.
    ScheduleReminder {
        user_id: String,
        note_id: u64,
        fire_at: DateTime<Utc>,
    },
    /// Cancel a pending reminder.
    CancelReminder { user_id: String, note_id: u64 },
}

/// Response sent from the daemon to the transport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum DaemonResponse {
    /// Status response.
    Status(DaemonStatus),
    /// Shutdown acknowledged.
    ShuttingDown,
    /// Pong response.
    Pong,
    /// Error response; rendered to the user as a short failure notice.
    Error { message: String },
    /// Version handshake response.
    Hello { version: String },
    /// Query result.
    QueryResult(QueryResult),
    /// Mutation acknowledgment.
    MutateResult(MutateResult),
}

/// Results from query operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "result")]
pub enum QueryResult {
    /// Single note.
    Note { note: Note },
    /// One page of notes with paging math applied.
    NotePage {
        notes: Vec<Note>,
        total_pages: usize,
        page: usize,
    },
    /// Flat list of notes.
    Notes { notes: Vec<Note> },
    /// Distinct category names.
    Categories { categories: Vec<String> },
}

/// Results from mutation operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "result")]
pub enum MutateResult {
    /// Mutation succeeded.
    Ok,
    /// A note was created.
    Created { note_id: u64 },
    /// Mutation targeting one note; true iff it existed and changed.
    Changed { changed: bool },
}

/// Daemon status information.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DaemonStatus {
    /// Current daemon PID.
    pub pid: u32,
    /// Uptime in seconds.
    pub uptime_secs: u64,
    /// Number of user records in the store.
    pub users: usize,
}

impl DaemonStatus {
    /// Create a new status with the given parameters.
    pub fn new(pid: u32, uptime_secs: u64, users: usize) -> Self {
        Self { pid, uptime_secs, users }
    }
}

// ============================================================================
// Message framing
// ============================================================================

/// IPC message framing.
///
/// Messages are framed as:
/// - 4 bytes: message length (big-endian u32)
/// - N bytes: JSON-encoded message
pub mod framing {
    use std::io::{Read, Write};

    use serde::de::DeserializeOwned;
    use serde::Serialize;

    /// Maximum message size (1MB) to prevent malformed messages from causing hangs.
    const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

    /// Write a serializable message to the given writer.
    pub fn write_message<W: Write, T: Serialize>(
        writer: &mut W,
        message: &T,
    ) -> std::io::Result<()> {
        let json = serde_json::to_vec(message)
            .map_err(|e| std::io::Error::other(format!("serialize error: {}", e)))?;
        let len =
            u32::try_from(json.len()).map_err(|_| std::io::Error::other("message too large"))?;
        writer.write_all(&len.to_be_bytes())?;
        writer.write_all(&json)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a deserializable message from the given reader.
    pub fn read_message<R: Read, T: DeserializeOwned>(reader: &mut R) -> std::io::Result<T> {
        let mut len_buf = [0u8; 4];
        reader.read_exact(&mut len_buf)?;
        let len = u32::from_be_bytes(len_buf) as usize;

        if len > MAX_MESSAGE_SIZE {
            return Err(std::io::Error::other(format!(
                "message too large: {} bytes (max {})",
                len, MAX_MESSAGE_SIZE
            )));
        }

        let mut buf = vec![0u8; len];
        reader.read_exact(&mut buf)?;

        serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::other(format!("deserialize error: {}", e)))
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
