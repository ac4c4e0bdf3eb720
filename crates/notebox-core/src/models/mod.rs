//! Data models for notebox

#[macro_use]
mod id;
mod checklist;
mod note;
mod settings;
mod tags;
mod todo;

pub use checklist::{ChecklistItem, ChecklistItemId};
pub use note::{
    Coordinate, Note, NoteDraft, NoteId, NotePatch, MAX_DESCRIPTION_CHARS, MAX_TITLE_CHARS,
};
pub use settings::{
    language_display_name, Language, Preferences, ThemeMode, DEFAULT_FONT_SIZE,
    SUPPORTED_LANGUAGES,
};
pub use tags::TagSet;
pub use todo::{TodoId, TodoItem, TodoPatch};
