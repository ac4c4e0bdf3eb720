//! Note list derivation: search, tag and media filters, sort, pinned split.

use serde::{Deserialize, Serialize};

use crate::models::Note;
use crate::util::{compare_titles, contains_ignore_case};

/// Sort order for note lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteSortMode {
    /// Most recently updated first
    #[default]
    Recent,
    /// Alphabetical by title, ignoring case
    Title,
}

/// Criteria selected on the note list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteQuery {
    pub search_text: String,
    /// Keep only notes carrying this tag (case-insensitive exact match)
    pub selected_tag: Option<String>,
    pub filter_images: bool,
    pub filter_video: bool,
    pub filter_location: bool,
    pub sort_mode: NoteSortMode,
}

/// A filtered list split into its two display groups
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NoteListing {
    pub pinned: Vec<Note>,
    pub others: Vec<Note>,
}

impl NoteListing {
    #[must_use]
    pub fn len(&self) -> usize {
        self.pinned.len() + self.others.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pinned.is_empty() && self.others.is_empty()
    }

    /// Pinned notes followed by the others
    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.pinned.iter().chain(self.others.iter())
    }
}

/// Header counters for the note list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NoteStats {
    pub total: usize,
    pub pinned: usize,
}

impl NoteStats {
    #[must_use]
    pub fn from_notes(notes: &[Note]) -> Self {
        Self {
            total: notes.len(),
            pinned: notes.iter().filter(|note| note.is_pinned).count(),
        }
    }
}

/// Apply search, tag and media filters, then sort.
#[must_use]
pub fn filter_notes(notes: &[Note], query: &NoteQuery) -> Vec<Note> {
    let search = query.search_text.as_str();
    let tag = query.selected_tag.as_deref();

    let mut filtered: Vec<Note> = notes
        .iter()
        .filter(|note| matches_search(note, search))
        .filter(|note| tag.map_or(true, |tag| note.tags.contains(tag)))
        .filter(|note| !query.filter_images || note.has_images())
        .filter(|note| !query.filter_video || note.has_video())
        .filter(|note| !query.filter_location || note.has_location())
        .cloned()
        .collect();

    sort_notes(&mut filtered, query.sort_mode);
    filtered
}

/// Split an already sorted list into pinned and other notes, keeping order.
#[must_use]
pub fn partition_pinned(notes: Vec<Note>) -> NoteListing {
    let (pinned, others) = notes.into_iter().partition(|note| note.is_pinned);
    NoteListing { pinned, others }
}

/// Filter, sort and split in one call.
#[must_use]
pub fn query_notes(notes: &[Note], query: &NoteQuery) -> NoteListing {
    partition_pinned(filter_notes(notes, query))
}

/// Keep notes carrying `tag`. `None` returns the input unchanged.
#[must_use]
pub fn filter_by_tag(notes: &[Note], tag: Option<&str>) -> Vec<Note> {
    match tag {
        None => notes.to_vec(),
        Some(tag) => notes
            .iter()
            .filter(|note| note.tags.contains(tag))
            .cloned()
            .collect(),
    }
}

/// Stable in-place sort.
pub fn sort_notes(notes: &mut [Note], mode: NoteSortMode) {
    match mode {
        NoteSortMode::Recent => notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        NoteSortMode::Title => notes.sort_by(|a, b| compare_titles(&a.title, &b.title)),
    }
}

/// Distinct tags across all notes, ignoring case, in alphabetical order.
///
/// The first spelling seen wins.
#[must_use]
pub fn collect_tags(notes: &[Note]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in notes.iter().flat_map(|note| note.tags.iter()) {
        if !tags.iter().any(|seen| seen.to_lowercase() == tag.to_lowercase()) {
            tags.push(tag.clone());
        }
    }
    tags.sort_by(|a, b| compare_titles(a, b));
    tags
}

fn matches_search(note: &Note, search: &str) -> bool {
    search.is_empty()
        || contains_ignore_case(&note.title, search)
        || contains_ignore_case(&note.description, search)
        || note.tags.iter().any(|tag| contains_ignore_case(tag, search))
}
