// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Filtering, searching, and pagination over a user's notes.

use crate::note::{Note, UserRecord};

/// Category value meaning "no filtering".
pub const ALL_CATEGORIES: &str = "All";

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total page count: `ceil(len / page_size)`, 0 when the input is empty.
    pub total_pages: usize,
    /// The clamped page index actually served.
    pub page: usize,
}

/// All of a user's notes sorted by `created_at` descending.
///
/// Ties are broken by insertion order (stable sort) for determinism.
pub fn list_notes(user: &UserRecord) -> Vec<Note> {
    let mut notes = user.notes.clone();
    notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    notes
}

/// Keeps only the notes matching the category, exact and case-sensitive.
///
/// `None` or `"All"` means no filtering.
pub fn filter_by_category(notes: Vec<Note>, category: Option<&str>) -> Vec<Note> {
    match category {
        None => notes,
        Some(ALL_CATEGORIES) => notes,
        Some(cat) => notes.into_iter().filter(|n| n.category == cat).collect(),
    }
}

/// Case-insensitive substring search over title, content, and category,
/// sorted by `created_at` descending.
///
/// An empty or whitespace-only query returns an empty result set rather
/// than matching everything.
pub fn search(user: &UserRecord, query: &str) -> Vec<Note> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    list_notes(user)
        .into_iter()
        .filter(|n| {
            n.title.to_lowercase().contains(&needle)
                || n.content.to_lowercase().contains(&needle)
                || n.category.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Sorted distinct category strings across the user's current notes.
pub fn categories(user: &UserRecord) -> Vec<String> {
    let mut cats: Vec<String> = user.notes.iter().map(|n| n.category.clone()).collect();
    cats.sort();
    cats.dedup();
    cats
}

/// The pinned subset, in list order.
pub fn pinned_notes(user: &UserRecord) -> Vec<Note> {
    list_notes(user)
        .into_iter()
        .filter(|n| user.pinned.contains(&n.id))
        .collect()
}

/// Slices one page out of `items`.
///
/// The page index is clamped to `[0, total_pages - 1]`; the empty-input
/// case yields `total_pages = 0` and an empty page, which callers
/// short-circuit with an empty-state message. Stable: the same input and
/// index always yield the same slice.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, page_index: usize) -> Page<T> {
    if items.is_empty() || page_size == 0 {
        return Page { items: Vec::new(), total_pages: 0, page: 0 };
    }
    let total_pages = items.len().div_ceil(page_size);
    let page = page_index.min(total_pages - 1);
    let start = page * page_size;
    let end = (start + page_size).min(items.len());
    Page {
        items: items[start..end].to_vec(),
        total_pages,
        page,
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
