// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for memo-core operations.

use thiserror::Error;

/// All possible errors that can occur in memo-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("note not found: #{0}")]
    NoteNotFound(u64),

    #[error("invalid category: '{0}'")]
    InvalidCategory(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("scheduling error: {0}")]
    Scheduling(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for memo-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
