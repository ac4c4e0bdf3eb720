use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] notebox_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Title cannot be empty")]
    EmptyTitle,
    #[error("ID cannot be empty")]
    EmptyIdentifier,
    #[error("Note not found for id/prefix: {0}")]
    NoteNotFound(String),
    #[error("Todo not found for id/prefix: {0}")]
    TodoNotFound(String),
    #[error("{0}")]
    AmbiguousId(String),
    #[error("Checklist has no item {position} (it has {len})")]
    ChecklistItemNotFound { position: usize, len: usize },
    #[error("Nothing to change; pass at least one field to edit")]
    NothingToEdit,
    #[error("Config already exists at {0} (use --force to replace it)")]
    ConfigExists(String),
}
