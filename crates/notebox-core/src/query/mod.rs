//! In-memory filtering and sorting of notes and todos.
//!
//! Everything here is a pure function over a slice; callers recompute on every
//! refresh.

mod notes;
mod todos;

pub use notes::{
    collect_tags, filter_by_tag, filter_notes, partition_pinned, query_notes, sort_notes,
    NoteListing, NoteQuery, NoteSortMode, NoteStats,
};
pub use todos::{query_todos, TodoCounts, TodoFilter, TodoQuery, TodoSort};
