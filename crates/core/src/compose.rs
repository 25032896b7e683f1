// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Parser for the note-creation text mini-format.
//!
//! Free text may carry `Title:`, `Category:`, and `Content:` lines
//! (case-insensitive keys). Non-keyed lines accumulate into the content
//! buffer until an explicit `Content:` line is seen; after that, explicit
//! content wins and further non-keyed lines are ignored. Text with no
//! recognized keys at all is the terse path: it becomes a Quick Notes
//! entry with the title derived from the text.

/// Parsed note-creation input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteDraft {
    /// Explicit title, if a `Title:` line was present.
    pub title: Option<String>,
    /// Explicit category, if a `Category:` line was present.
    pub category: Option<String>,
    /// The content buffer.
    pub content: String,
    /// Whether an explicit `Content:` line was seen.
    pub explicit_content: bool,
}

impl NoteDraft {
    /// True when no recognized key appeared: route to the quick-note flow.
    pub fn is_terse(&self) -> bool {
        self.title.is_none() && self.category.is_none() && !self.explicit_content
    }
}

/// Strips a case-insensitive `key:` prefix from a line, returning the rest.
fn keyed<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let trimmed = line.trim_start();
    // get() rather than split_at: the line may start mid-multibyte.
    let head = trimmed.get(..key.len())?;
    let rest = trimmed.get(key.len()..)?;
    if head.eq_ignore_ascii_case(key) && rest.starts_with(':') {
        Some(rest[1..].trim())
    } else {
        None
    }
}

/// Parses free text into a [`NoteDraft`].
pub fn parse_draft(text: &str) -> NoteDraft {
    let mut draft = NoteDraft::default();
    let mut fallback: Vec<&str> = Vec::new();
    let mut explicit: Vec<String> = Vec::new();

    for line in text.lines() {
        if let Some(value) = keyed(line, "title") {
            draft.title = Some(value.to_string());
        } else if let Some(value) = keyed(line, "category") {
            draft.category = Some(value.to_string());
        } else if let Some(value) = keyed(line, "content") {
            draft.explicit_content = true;
            explicit.push(value.to_string());
        } else if !draft.explicit_content {
            fallback.push(line);
        }
        // Non-keyed line after explicit content: ignored.
    }

    draft.content = if draft.explicit_content {
        explicit.join("\n")
    } else {
        fallback.join("\n").trim().to_string()
    };
    draft
}

#[cfg(test)]
#[path = "compose_tests.rs"]
mod tests;
