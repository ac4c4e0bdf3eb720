//! Storage layer for notebox (SQLite via rusqlite)

mod connection;
mod migrations;
mod repository;
mod settings_repository;
mod todo_repository;

pub use connection::Database;
pub use repository::{NoteRepository, SqliteNoteRepository};
pub use settings_repository::{SettingsRepository, SqliteSettingsRepository};
pub use todo_repository::{SqliteTodoRepository, TodoRepository};

/// Keep only characters that can appear in a textual UUID, so a user-supplied
/// prefix is safe to feed into a `LIKE` pattern.
fn sanitize_id_prefix(prefix: &str) -> Option<String> {
    let prefix = prefix.trim().to_ascii_lowercase();
    if prefix.is_empty()
        || !prefix
            .chars()
            .all(|ch| ch.is_ascii_hexdigit() || ch == '-')
    {
        return None;
    }
    Some(prefix)
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_id_prefix_accepts_uuid_characters_only() {
        assert_eq!(sanitize_id_prefix(" 01AB-c "), Some("01ab-c".to_string()));
        assert_eq!(sanitize_id_prefix("01%"), None);
        assert_eq!(sanitize_id_prefix("   "), None);
    }
}
