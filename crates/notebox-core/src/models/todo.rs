//! Todo item model

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

uuid_id!(
    /// A unique identifier for a todo item
    TodoId
);

/// A lightweight task, unrelated to notes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: TodoId,
    pub title: String,
    pub is_completed: bool,
    /// Insertion timestamp (Unix ms), used for the default listing order
    pub created_at: i64,
}

impl TodoItem {
    /// Create a todo, rejecting a blank title
    pub fn new(title: &str, is_completed: bool) -> Result<Self> {
        Ok(Self {
            id: TodoId::new(),
            title: validate_todo_title(title)?,
            is_completed,
            created_at: chrono::Utc::now().timestamp_millis(),
        })
    }

    /// Flip the completion state
    pub fn toggle(&mut self) {
        self.is_completed = !self.is_completed;
    }
}

/// Field replacements for an existing todo
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub is_completed: Option<bool>,
}

impl TodoPatch {
    pub fn apply_to(&self, todo: &mut TodoItem) -> Result<()> {
        if let Some(title) = &self.title {
            todo.title = validate_todo_title(title)?;
        }
        if let Some(is_completed) = self.is_completed {
            todo.is_completed = is_completed;
        }
        Ok(())
    }
}

fn validate_todo_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::InvalidInput("Todo title cannot be empty".to_string()));
    }
    Ok(title.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_todo_trims_title() {
        let todo = TodoItem::new("  Call mom ", false).unwrap();
        assert_eq!(todo.title, "Call mom");
        assert!(!todo.is_completed);
    }

    #[test]
    fn new_todo_rejects_blank_title() {
        assert!(TodoItem::new(" ", false).is_err());
    }

    #[test]
    fn double_toggle_is_identity() {
        let original = TodoItem::new("Water plants", false).unwrap();
        let mut todo = original.clone();
        todo.toggle();
        assert!(todo.is_completed);
        todo.toggle();
        assert_eq!(todo, original);
    }

    #[test]
    fn patch_updates_selected_fields() {
        let mut todo = TodoItem::new("Draft", false).unwrap();
        TodoPatch {
            is_completed: Some(true),
            ..TodoPatch::default()
        }
        .apply_to(&mut todo)
        .unwrap();
        assert_eq!(todo.title, "Draft");
        assert!(todo.is_completed);

        let err = TodoPatch {
            title: Some(String::new()),
            ..TodoPatch::default()
        }
        .apply_to(&mut todo)
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
