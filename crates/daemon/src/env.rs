// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Environment variable handling for the daemon.

use std::path::PathBuf;

/// Environment variable name constants, generated at build time.
pub mod names {
    include!(concat!(env!("OUT_DIR"), "/env_names.rs"));
}

/// Explicit state directory override, if set.
pub fn state_dir() -> Option<PathBuf> {
    std::env::var(names::MEMOD_STATE_DIR).ok().map(PathBuf::from)
}

/// XDG state base directory, if set.
pub fn xdg_state_home() -> Option<PathBuf> {
    std::env::var(names::XDG_STATE_HOME).ok().map(PathBuf::from)
}

/// True when the ephemeral deployment mode is requested via environment.
pub fn ephemeral() -> bool {
    std::env::var(names::MEMOD_EPHEMERAL)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
