//! Note repository implementation

use std::path::PathBuf;

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

use super::{sanitize_id_prefix, sql_limit};
use crate::error::{Error, Result};
use crate::models::{ChecklistItem, Coordinate, Note, NoteDraft, NoteId, NotePatch};
use crate::util::now_millis;

/// Trait for note storage operations
pub trait NoteRepository {
    /// Create a new note from editor input
    fn create(&self, draft: &NoteDraft) -> Result<Note>;

    /// Insert a fully built note, keeping its id and timestamps
    fn create_with_note(&self, note: &Note) -> Result<Note>;

    /// Get a note by ID, with tags, images and checklist loaded
    fn get(&self, id: &NoteId) -> Result<Option<Note>>;

    /// List every note, most recently updated first
    fn list(&self) -> Result<Vec<Note>>;

    /// Apply a patch and refresh `updated_at`
    fn update(&self, id: &NoteId, patch: &NotePatch) -> Result<Note>;

    /// Flip the pinned flag and refresh `updated_at`
    fn toggle_pin(&self, id: &NoteId) -> Result<Note>;

    /// Delete a note together with its tags, images and checklist
    fn delete(&self, id: &NoteId) -> Result<()>;

    /// List note IDs starting with the given prefix
    fn list_ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>>;
}

/// `SQLite` implementation of `NoteRepository`
pub struct SqliteNoteRepository<'a> {
    conn: &'a Connection,
}

const NOTE_COLUMNS: &str =
    "id, title, description, is_pinned, latitude, longitude, video_path, created_at, updated_at";

impl<'a> SqliteNoteRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse a note row; children are loaded separately
    fn parse_note(row: &rusqlite::Row<'_>) -> rusqlite::Result<Note> {
        let id: String = row.get(0)?;
        let id = id
            .parse::<NoteId>()
            .map_err(|error| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(error)))?;
        let latitude: Option<f64> = row.get(4)?;
        let longitude: Option<f64> = row.get(5)?;
        let video_path: Option<String> = row.get(6)?;

        Ok(Note {
            id,
            title: row.get(1)?,
            description: row.get(2)?,
            is_pinned: row.get(3)?,
            location: latitude.zip(longitude).map(|(latitude, longitude)| Coordinate {
                latitude,
                longitude,
            }),
            images: Vec::new(),
            video_path: video_path.map(PathBuf::from),
            tags: crate::models::TagSet::new(),
            checklist: Vec::new(),
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    fn load_children(conn: &Connection, note: &mut Note) -> Result<()> {
        let id = note.id.as_str();

        let mut stmt = conn
            .prepare_cached("SELECT name FROM note_tags WHERE note_id = ? ORDER BY position")?;
        note.tags = stmt
            .query_map(params![id], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?
            .into();

        let mut stmt = conn
            .prepare_cached("SELECT data FROM note_images WHERE note_id = ? ORDER BY position")?;
        note.images = stmt
            .query_map(params![id], |row| row.get::<_, Vec<u8>>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare_cached(
            "SELECT id, title, is_done FROM checklist_items WHERE note_id = ? ORDER BY position",
        )?;
        note.checklist = stmt
            .query_map(params![id], |row| {
                let item_id: String = row.get(0)?;
                Ok(ChecklistItem {
                    id: item_id.parse().map_err(|error| {
                        rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(error))
                    })?,
                    title: row.get(1)?,
                    is_done: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(())
    }

    fn fetch(conn: &Connection, id: &NoteId) -> Result<Option<Note>> {
        let note = conn
            .query_row(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?"),
                params![id.as_str()],
                Self::parse_note,
            )
            .optional()?;

        let Some(mut note) = note else {
            return Ok(None);
        };
        Self::load_children(conn, &mut note)?;
        Ok(Some(note))
    }

    fn insert_row(conn: &Connection, note: &Note) -> Result<()> {
        conn.execute(
            &format!("INSERT INTO notes ({NOTE_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"),
            params![
                note.id.as_str(),
                note.title,
                note.description,
                note.is_pinned,
                note.location.map(|location| location.latitude),
                note.location.map(|location| location.longitude),
                video_path_text(note),
                note.created_at,
                note.updated_at,
            ],
        )?;
        Ok(())
    }

    fn update_row(conn: &Connection, note: &Note) -> Result<()> {
        let rows = conn.execute(
            "UPDATE notes
             SET title = ?, description = ?, is_pinned = ?, latitude = ?, longitude = ?,
                 video_path = ?, updated_at = ?
             WHERE id = ?",
            params![
                note.title,
                note.description,
                note.is_pinned,
                note.location.map(|location| location.latitude),
                note.location.map(|location| location.longitude),
                video_path_text(note),
                note.updated_at,
                note.id.as_str(),
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(note.id.to_string()));
        }
        Ok(())
    }

    fn replace_tags(conn: &Connection, note: &Note) -> Result<()> {
        let id = note.id.as_str();
        conn.execute("DELETE FROM note_tags WHERE note_id = ?", params![id])?;
        let mut stmt = conn
            .prepare_cached("INSERT INTO note_tags (note_id, name, position) VALUES (?, ?, ?)")?;
        for (position, tag) in note.tags.iter().enumerate() {
            stmt.execute(params![id, tag, sql_limit(position)])?;
        }
        Ok(())
    }

    fn replace_images(conn: &Connection, note: &Note) -> Result<()> {
        let id = note.id.as_str();
        conn.execute("DELETE FROM note_images WHERE note_id = ?", params![id])?;
        let mut stmt = conn
            .prepare_cached("INSERT INTO note_images (note_id, position, data) VALUES (?, ?, ?)")?;
        for (position, bytes) in note.images.iter().enumerate() {
            stmt.execute(params![id, sql_limit(position), bytes])?;
        }
        Ok(())
    }

    fn replace_checklist(conn: &Connection, note: &Note) -> Result<()> {
        let id = note.id.as_str();
        conn.execute("DELETE FROM checklist_items WHERE note_id = ?", params![id])?;
        let mut stmt = conn.prepare_cached(
            "INSERT INTO checklist_items (id, note_id, position, title, is_done) VALUES (?, ?, ?, ?, ?)",
        )?;
        for (position, item) in note.checklist.iter().enumerate() {
            stmt.execute(params![
                item.id.as_str(),
                id,
                sql_limit(position),
                item.title,
                item.is_done
            ])?;
        }
        Ok(())
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create(&self, draft: &NoteDraft) -> Result<Note> {
        let note = Note::from_draft(draft)?;
        self.create_with_note(&note)
    }

    fn create_with_note(&self, note: &Note) -> Result<Note> {
        if note.title.trim().is_empty() {
            return Err(Error::InvalidInput("Note title cannot be empty".to_string()));
        }

        let tx = self.conn.unchecked_transaction()?;
        Self::insert_row(&tx, note)?;
        Self::replace_tags(&tx, note)?;
        Self::replace_images(&tx, note)?;
        Self::replace_checklist(&tx, note)?;
        tx.commit()?;

        tracing::debug!("Created note {}", note.id);
        Ok(note.clone())
    }

    fn get(&self, id: &NoteId) -> Result<Option<Note>> {
        Self::fetch(self.conn, id)
    }

    fn list(&self) -> Result<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes ORDER BY updated_at DESC, id DESC"
        ))?;

        let mut notes = stmt
            .query_map([], Self::parse_note)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for note in &mut notes {
            Self::load_children(self.conn, note)?;
        }

        Ok(notes)
    }

    fn update(&self, id: &NoteId, patch: &NotePatch) -> Result<Note> {
        let tx = self.conn.unchecked_transaction()?;
        let mut note = Self::fetch(&tx, id)?.ok_or_else(|| Error::NotFound(id.to_string()))?;

        if patch.is_empty() {
            return Ok(note);
        }

        patch.apply_to(&mut note, now_millis())?;
        Self::update_row(&tx, &note)?;
        if patch.tags.is_some() {
            Self::replace_tags(&tx, &note)?;
        }
        if patch.images.is_some() {
            Self::replace_images(&tx, &note)?;
        }
        if patch.checklist.is_some() {
            Self::replace_checklist(&tx, &note)?;
        }
        tx.commit()?;

        Ok(note)
    }

    fn toggle_pin(&self, id: &NoteId) -> Result<Note> {
        let tx = self.conn.unchecked_transaction()?;
        let mut note = Self::fetch(&tx, id)?.ok_or_else(|| Error::NotFound(id.to_string()))?;

        note.is_pinned = !note.is_pinned;
        note.touch(now_millis());
        Self::update_row(&tx, &note)?;
        tx.commit()?;

        Ok(note)
    }

    fn delete(&self, id: &NoteId) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?", params![id.as_str()])?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        Ok(())
    }

    fn list_ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        let Some(prefix) = sanitize_id_prefix(prefix) else {
            return Ok(Vec::new());
        };

        let mut stmt = self
            .conn
            .prepare("SELECT id FROM notes WHERE id LIKE ? || '%' ORDER BY id LIMIT ?")?;
        let ids = stmt
            .query_map(params![prefix, sql_limit(limit)], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        Ok(ids)
    }
}

fn video_path_text(note: &Note) -> Option<String> {
    note.video_path
        .as_ref()
        .map(|path| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn setup() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn draft(title: &str) -> NoteDraft {
        NoteDraft::new(title)
    }

    #[test]
    fn test_create_and_get() {
        let db = setup();
        let repo = SqliteNoteRepository::new(db.connection());

        let created = repo
            .create(&NoteDraft {
                title: "Trip".to_string(),
                description: "Lisbon in May".to_string(),
                location: Some(Coordinate::new(38.72, -9.14).unwrap()),
                images: vec![vec![1, 2, 3], vec![4]],
                video_path: Some(PathBuf::from("/tmp/video-1.mov")),
                tags: vec!["travel".to_string(), "Spring".to_string()],
                checklist: vec!["Passport".to_string(), "Tickets".to_string()],
                ..NoteDraft::default()
            })
            .unwrap();

        let fetched = repo.get(&created.id).unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.tags.as_slice(), ["travel", "Spring"]);
        assert_eq!(fetched.images, vec![vec![1, 2, 3], vec![4]]);
        assert_eq!(fetched.checklist[1].title, "Tickets");
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[test]
    fn test_create_rejects_blank_title() {
        let db = setup();
        let repo = SqliteNoteRepository::new(db.connection());

        let err = repo.create(&draft("  ")).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_get_missing_returns_none() {
        let db = setup();
        let repo = SqliteNoteRepository::new(db.connection());
        assert!(repo.get(&NoteId::new()).unwrap().is_none());
    }

    #[test]
    fn test_list_orders_by_updated_at() {
        let db = setup();
        let repo = SqliteNoteRepository::new(db.connection());

        let mut older = Note::new("Older");
        older.created_at = 1_000;
        older.updated_at = 1_000;
        let mut newer = Note::new("Newer");
        newer.created_at = 500;
        newer.updated_at = 2_000;
        repo.create_with_note(&older).unwrap();
        repo.create_with_note(&newer).unwrap();

        let titles: Vec<_> = repo.list().unwrap().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, ["Newer", "Older"]);
    }

    #[test]
    fn test_update() {
        let db = setup();
        let repo = SqliteNoteRepository::new(db.connection());

        let mut note = Note::new("Original");
        note.created_at = 1_000;
        note.updated_at = 1_000;
        repo.create_with_note(&note).unwrap();

        let updated = repo
            .update(
                &note.id,
                &NotePatch {
                    title: Some("Updated".to_string()),
                    tags: Some(vec!["a".to_string(), "A".to_string(), "b".to_string()]),
                    ..NotePatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.title, "Updated");
        assert!(updated.updated_at > note.updated_at);

        let fetched = repo.get(&note.id).unwrap().unwrap();
        assert_eq!(fetched.title, "Updated");
        assert_eq!(fetched.tags.as_slice(), ["a", "b"]);
    }

    #[test]
    fn test_update_checklist_and_clear_location() {
        let db = setup();
        let repo = SqliteNoteRepository::new(db.connection());

        let note = repo
            .create(&NoteDraft {
                title: "Packing".to_string(),
                location: Some(Coordinate::new(1.0, 1.0).unwrap()),
                checklist: vec!["Socks".to_string()],
                ..NoteDraft::default()
            })
            .unwrap();

        let mut checklist = note.checklist.clone();
        checklist[0].is_done = true;
        checklist.push(ChecklistItem::new("Shoes"));

        repo.update(
            &note.id,
            &NotePatch {
                location: Some(None),
                checklist: Some(checklist),
                ..NotePatch::default()
            },
        )
        .unwrap();

        let fetched = repo.get(&note.id).unwrap().unwrap();
        assert!(fetched.location.is_none());
        assert_eq!(fetched.checklist_progress(), (1, 2));
    }

    #[test]
    fn test_update_missing_note() {
        let db = setup();
        let repo = SqliteNoteRepository::new(db.connection());

        let err = repo
            .update(
                &NoteId::new(),
                &NotePatch {
                    title: Some("x".to_string()),
                    ..NotePatch::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_toggle_pin() {
        let db = setup();
        let repo = SqliteNoteRepository::new(db.connection());

        let note = repo.create(&draft("Pin me")).unwrap();
        let pinned = repo.toggle_pin(&note.id).unwrap();
        assert!(pinned.is_pinned);
        assert!(pinned.updated_at >= note.updated_at);

        let unpinned = repo.toggle_pin(&note.id).unwrap();
        assert!(!unpinned.is_pinned);
        assert!(!repo.get(&note.id).unwrap().unwrap().is_pinned);
    }

    #[test]
    fn test_delete_cascades_checklist() {
        let db = setup();
        let repo = SqliteNoteRepository::new(db.connection());

        let note = repo
            .create(&NoteDraft {
                title: "To delete".to_string(),
                tags: vec!["tmp".to_string()],
                images: vec![vec![9]],
                checklist: vec!["One".to_string(), "Two".to_string()],
                ..NoteDraft::default()
            })
            .unwrap();
        repo.delete(&note.id).unwrap();

        assert!(repo.get(&note.id).unwrap().is_none());
        assert!(repo.list().unwrap().is_empty());

        let orphans: i64 = db
            .connection()
            .query_row(
                "SELECT (SELECT COUNT(*) FROM checklist_items)
                      + (SELECT COUNT(*) FROM note_tags)
                      + (SELECT COUNT(*) FROM note_images)",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn test_delete_missing_note() {
        let db = setup();
        let repo = SqliteNoteRepository::new(db.connection());
        assert!(matches!(
            repo.delete(&NoteId::new()).unwrap_err(),
            Error::NotFound(_)
        ));
    }

    #[test]
    fn test_list_ids_by_prefix() {
        let db = setup();
        let repo = SqliteNoteRepository::new(db.connection());

        let note = repo.create(&draft("Prefix")).unwrap();
        let id = note.id.to_string();

        let matches = repo.list_ids_by_prefix(&id[..8], 5).unwrap();
        assert_eq!(matches, vec![id]);
        assert!(repo.list_ids_by_prefix("%", 5).unwrap().is_empty());
    }
}
