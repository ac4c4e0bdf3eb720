//! Checklist items owned by a note

use serde::{Deserialize, Serialize};

uuid_id!(
    /// A unique identifier for a checklist item
    ChecklistItemId
);

/// A single checklist entry. Lives and dies with its parent note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: ChecklistItemId,
    pub title: String,
    pub is_done: bool,
}

impl ChecklistItem {
    /// Create an unchecked item with the given title
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: ChecklistItemId::new(),
            title: title.into(),
            is_done: false,
        }
    }

    /// Flip the done state
    pub fn toggle(&mut self) {
        self.is_done = !self.is_done;
    }
}
