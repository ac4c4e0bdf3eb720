//! Note model

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::checklist::{ChecklistItem, ChecklistItemId};
use super::tags::TagSet;
use crate::error::{Error, Result};

/// Longest title the editors accept, in characters.
pub const MAX_TITLE_CHARS: usize = 80;
/// Longest description the editors accept, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

uuid_id!(
    /// A unique identifier for a note, using UUID v7 (time-sortable)
    NoteId
);

/// A geographic point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting out-of-range or non-finite values
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::InvalidInput(format!(
                "Latitude must be between -90 and 90, got {latitude}"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::InvalidInput(format!(
                "Longitude must be between -180 and 180, got {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// A note in the system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier
    pub id: NoteId,
    /// Required title (stored trimmed)
    pub title: String,
    /// Free-form body, may be empty
    pub description: String,
    /// Pinned notes are listed in their own group
    pub is_pinned: bool,
    /// Where the note was taken, if recorded
    pub location: Option<Coordinate>,
    /// Compressed photo bytes in display order
    pub images: Vec<Vec<u8>>,
    /// Locally stored video file
    pub video_path: Option<PathBuf>,
    pub tags: TagSet,
    pub checklist: Vec<ChecklistItem>,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last update timestamp (Unix ms), never earlier than `created_at`
    pub updated_at: i64,
}

impl Note {
    /// Create a note with only a title
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: NoteId::new(),
            title: title.into(),
            description: String::new(),
            is_pinned: false,
            location: None,
            images: Vec::new(),
            video_path: None,
            tags: TagSet::new(),
            checklist: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a note from editor input.
    ///
    /// The title is trimmed and must not be empty. Blank checklist lines are dropped.
    pub fn from_draft(draft: &NoteDraft) -> Result<Self> {
        let title = validate_title(&draft.title)?;
        let mut note = Self::new(title);
        note.description.clone_from(&draft.description);
        note.is_pinned = draft.is_pinned;
        note.location = draft.location;
        note.images = draft
            .images
            .iter()
            .filter(|bytes| !bytes.is_empty())
            .cloned()
            .collect();
        note.video_path.clone_from(&draft.video_path);
        note.tags = draft.tags.iter().collect();
        for line in &draft.checklist {
            note.add_checklist_item(line);
        }
        Ok(note)
    }

    /// Refresh `updated_at`, keeping it at or after `created_at`.
    pub fn touch(&mut self, now_ms: i64) {
        self.updated_at = now_ms.max(self.created_at);
    }

    #[must_use]
    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }

    #[must_use]
    pub const fn has_video(&self) -> bool {
        self.video_path.is_some()
    }

    #[must_use]
    pub const fn has_location(&self) -> bool {
        self.location.is_some()
    }

    /// `(done, total)` checklist counts
    #[must_use]
    pub fn checklist_progress(&self) -> (usize, usize) {
        let done = self.checklist.iter().filter(|item| item.is_done).count();
        (done, self.checklist.len())
    }

    /// Append a checklist item. Blank titles are ignored.
    pub fn add_checklist_item(&mut self, title: &str) -> Option<ChecklistItemId> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let item = ChecklistItem::new(title);
        let id = item.id;
        self.checklist.push(item);
        Some(id)
    }

    /// Flip an item's done state. Returns `false` when the item is unknown.
    pub fn toggle_checklist_item(&mut self, id: &ChecklistItemId) -> bool {
        self.checklist
            .iter_mut()
            .find(|item| item.id == *id)
            .map(ChecklistItem::toggle)
            .is_some()
    }

    pub fn remove_checklist_item(&mut self, id: &ChecklistItemId) -> bool {
        let before = self.checklist.len();
        self.checklist.retain(|item| item.id != *id);
        self.checklist.len() != before
    }

    /// Move the item at `from` so it ends up at index `to`.
    pub fn move_checklist_item(&mut self, from: usize, to: usize) -> bool {
        if from >= self.checklist.len() || to >= self.checklist.len() {
            return false;
        }
        let item = self.checklist.remove(from);
        self.checklist.insert(to, item);
        true
    }
}

/// Editor input for a new note
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteDraft {
    pub title: String,
    pub description: String,
    pub is_pinned: bool,
    pub location: Option<Coordinate>,
    pub images: Vec<Vec<u8>>,
    pub video_path: Option<PathBuf>,
    pub tags: Vec<String>,
    /// Checklist item titles, in order
    pub checklist: Vec<String>,
}

impl NoteDraft {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Field replacements for an existing note. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_pinned: Option<bool>,
    /// `Some(None)` clears the location
    pub location: Option<Option<Coordinate>>,
    pub images: Option<Vec<Vec<u8>>>,
    /// `Some(None)` detaches the video
    pub video_path: Option<Option<PathBuf>>,
    pub tags: Option<Vec<String>>,
    pub checklist: Option<Vec<ChecklistItem>>,
}

impl NotePatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.is_pinned.is_none()
            && self.location.is_none()
            && self.images.is_none()
            && self.video_path.is_none()
            && self.tags.is_none()
            && self.checklist.is_none()
    }

    /// Apply the patch and touch `updated_at`. An empty patch changes nothing.
    pub fn apply_to(&self, note: &mut Note, now_ms: i64) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        if let Some(title) = &self.title {
            note.title = validate_title(title)?;
        }
        if let Some(description) = &self.description {
            note.description.clone_from(description);
        }
        if let Some(is_pinned) = self.is_pinned {
            note.is_pinned = is_pinned;
        }
        if let Some(location) = self.location {
            note.location = location;
        }
        if let Some(images) = &self.images {
            note.images = images
                .iter()
                .filter(|bytes| !bytes.is_empty())
                .cloned()
                .collect();
        }
        if let Some(video_path) = &self.video_path {
            note.video_path.clone_from(video_path);
        }
        if let Some(tags) = &self.tags {
            note.tags = tags.iter().collect();
        }
        if let Some(checklist) = &self.checklist {
            note.checklist.clone_from(checklist);
        }
        note.touch(now_ms);
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::InvalidInput("Note title cannot be empty".to_string()));
    }
    Ok(title.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_id_unique() {
        let id1 = NoteId::new();
        let id2 = NoteId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_note_id_parse() {
        let id = NoteId::new();
        let parsed: NoteId = id.as_str().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_note_new() {
        let note = Note::new("Groceries");
        assert_eq!(note.title, "Groceries");
        assert!(!note.is_pinned);
        assert!(note.created_at > 0);
        assert_eq!(note.created_at, note.updated_at);
    }

    #[test]
    fn from_draft_trims_title_and_builds_children() {
        let draft = NoteDraft {
            title: "  Trip  ".to_string(),
            tags: vec!["travel".to_string(), "Travel".to_string()],
            checklist: vec!["Passport".to_string(), "  ".to_string(), "Tickets".to_string()],
            location: Some(Coordinate::new(48.85, 2.35).unwrap()),
            ..NoteDraft::default()
        };

        let note = Note::from_draft(&draft).unwrap();
        assert_eq!(note.title, "Trip");
        assert_eq!(note.tags.as_slice(), ["travel"]);
        assert_eq!(note.checklist.len(), 2);
        assert!(note.has_location());
    }

    #[test]
    fn from_draft_rejects_blank_title() {
        let err = Note::from_draft(&NoteDraft::new("   ")).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn coordinate_validation() {
        assert!(Coordinate::new(90.0, -180.0).is_ok());
        assert!(Coordinate::new(90.1, 0.0).is_err());
        assert!(Coordinate::new(0.0, 180.5).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn touch_never_moves_before_creation() {
        let mut note = Note::new("Clock skew");
        let created = note.created_at;
        note.touch(created - 10_000);
        assert_eq!(note.updated_at, created);
        note.touch(created + 5);
        assert_eq!(note.updated_at, created + 5);
    }

    #[test]
    fn patch_applies_fields_and_touches() {
        let mut note = Note::new("Old");
        let later = note.created_at + 1_000;
        let patch = NotePatch {
            title: Some("New".to_string()),
            is_pinned: Some(true),
            location: Some(Some(Coordinate::new(1.0, 2.0).unwrap())),
            ..NotePatch::default()
        };

        patch.apply_to(&mut note, later).unwrap();
        assert_eq!(note.title, "New");
        assert!(note.is_pinned);
        assert!(note.has_location());
        assert_eq!(note.updated_at, later);

        let clear = NotePatch {
            location: Some(None),
            ..NotePatch::default()
        };
        clear.apply_to(&mut note, later + 1).unwrap();
        assert!(!note.has_location());
    }

    #[test]
    fn empty_patch_leaves_timestamp_alone() {
        let mut note = Note::new("Same");
        let before = note.updated_at;
        NotePatch::default()
            .apply_to(&mut note, before + 60_000)
            .unwrap();
        assert_eq!(note.updated_at, before);
    }

    #[test]
    fn checklist_editing() {
        let mut note = Note::new("Packing");
        let a = note.add_checklist_item("Socks").unwrap();
        let b = note.add_checklist_item("Shoes").unwrap();
        assert!(note.add_checklist_item(" ").is_none());

        assert!(note.toggle_checklist_item(&a));
        assert_eq!(note.checklist_progress(), (1, 2));

        assert!(note.move_checklist_item(1, 0));
        assert_eq!(note.checklist[0].id, b);
        assert!(!note.move_checklist_item(5, 0));

        assert!(note.remove_checklist_item(&a));
        assert!(!note.toggle_checklist_item(&a));
        assert_eq!(note.checklist_progress(), (0, 1));
    }
}
