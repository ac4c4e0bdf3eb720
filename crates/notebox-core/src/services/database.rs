//! Shared database service wrapper used by clients.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};

use super::events::{EventBus, StoreEvent};
use super::imports::{ImportOutcome, ImportSequencer, ImportTicket};
use crate::db::{
    Database, NoteRepository, SettingsRepository, SqliteNoteRepository, SqliteSettingsRepository,
    SqliteTodoRepository, TodoRepository,
};
use crate::media::{compress_images, CompressedBatch, ImageCompression};
use crate::models::{
    language_display_name, ChecklistItemId, Note, NoteDraft, NoteId, NotePatch, Preferences,
    TodoId, TodoItem, TodoPatch,
};
use crate::query::{self, NoteListing, NoteQuery, NoteStats, TodoCounts, TodoQuery};
use crate::{Error, Result};

/// Thread-safe service for store operations.
///
/// All reads and writes go through one connection behind an async mutex.
#[derive(Clone)]
pub struct DatabaseService {
    db: Arc<Mutex<Database>>,
    db_path: Option<PathBuf>,
    events: EventBus,
    imports: ImportSequencer,
}

impl DatabaseService {
    /// Open a database service at the given filesystem path.
    pub async fn open_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        let db = Database::open(&db_path)?;
        Ok(Self::from_database(db, Some(db_path)))
    }

    /// Open an in-memory database service (primarily for tests).
    pub async fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self::from_database(db, None))
    }

    fn from_database(db: Database, db_path: Option<PathBuf>) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            db_path,
            events: EventBus::new(),
            imports: ImportSequencer::new(),
        }
    }

    /// Database file backing this service, if any.
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Subscribe to change notifications for every later write.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    // Notes

    /// Create a new note.
    pub async fn create_note(&self, draft: &NoteDraft) -> Result<Note> {
        let note = {
            let db = self.db.lock().await;
            let repo = SqliteNoteRepository::new(db.connection());
            logged("create note", repo.create(draft))?
        };
        self.events.emit(StoreEvent::NoteCreated(note.id));
        Ok(note)
    }

    /// Insert a fully built note, keeping its id and timestamps.
    pub async fn create_note_with_id(&self, note: &Note) -> Result<Note> {
        let note = {
            let db = self.db.lock().await;
            let repo = SqliteNoteRepository::new(db.connection());
            logged("create note", repo.create_with_note(note))?
        };
        self.events.emit(StoreEvent::NoteCreated(note.id));
        Ok(note)
    }

    /// Fetch a note by id.
    pub async fn get_note(&self, id: &NoteId) -> Result<Option<Note>> {
        let db = self.db.lock().await;
        let repo = SqliteNoteRepository::new(db.connection());
        repo.get(id)
    }

    /// List notes, most recently updated first.
    pub async fn list_notes(&self) -> Result<Vec<Note>> {
        let db = self.db.lock().await;
        let repo = SqliteNoteRepository::new(db.connection());
        repo.list()
    }

    /// Update a note.
    pub async fn update_note(&self, id: &NoteId, patch: &NotePatch) -> Result<Note> {
        let note = {
            let db = self.db.lock().await;
            let repo = SqliteNoteRepository::new(db.connection());
            logged("update note", repo.update(id, patch))?
        };
        self.events.emit(StoreEvent::NoteUpdated(note.id));
        Ok(note)
    }

    /// Flip a note's pinned flag.
    pub async fn toggle_pin(&self, id: &NoteId) -> Result<Note> {
        let note = {
            let db = self.db.lock().await;
            let repo = SqliteNoteRepository::new(db.connection());
            logged("toggle pin", repo.toggle_pin(id))?
        };
        self.events.emit(StoreEvent::NoteUpdated(note.id));
        Ok(note)
    }

    /// Delete a note and everything it owns.
    pub async fn delete_note(&self, id: &NoteId) -> Result<()> {
        {
            let db = self.db.lock().await;
            let repo = SqliteNoteRepository::new(db.connection());
            logged("delete note", repo.delete(id))?;
        }
        self.imports.forget(id).await;
        self.events.emit(StoreEvent::NoteDeleted(*id));
        Ok(())
    }

    /// Filter, sort and split the current notes.
    pub async fn query_notes(&self, note_query: &NoteQuery) -> Result<NoteListing> {
        let notes = self.list_notes().await?;
        Ok(query::query_notes(&notes, note_query))
    }

    pub async fn note_stats(&self) -> Result<NoteStats> {
        let notes = self.list_notes().await?;
        Ok(NoteStats::from_notes(&notes))
    }

    /// Distinct tags across all notes.
    pub async fn list_tags(&self) -> Result<Vec<String>> {
        let notes = self.list_notes().await?;
        Ok(query::collect_tags(&notes))
    }

    /// Note IDs starting with `prefix`.
    pub async fn list_note_ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        let db = self.db.lock().await;
        let repo = SqliteNoteRepository::new(db.connection());
        repo.list_ids_by_prefix(prefix, limit)
    }

    /// Append a checklist item to a note.
    pub async fn add_checklist_item(&self, note_id: &NoteId, title: &str) -> Result<Note> {
        self.edit_checklist(note_id, |note| {
            note.add_checklist_item(title)
                .map(|_| ())
                .ok_or_else(|| Error::InvalidInput("Checklist item cannot be empty".to_string()))
        })
        .await
    }

    pub async fn toggle_checklist_item(
        &self,
        note_id: &NoteId,
        item_id: &ChecklistItemId,
    ) -> Result<Note> {
        self.edit_checklist(note_id, |note| {
            if note.toggle_checklist_item(item_id) {
                Ok(())
            } else {
                Err(Error::NotFound(item_id.to_string()))
            }
        })
        .await
    }

    pub async fn remove_checklist_item(
        &self,
        note_id: &NoteId,
        item_id: &ChecklistItemId,
    ) -> Result<Note> {
        self.edit_checklist(note_id, |note| {
            if note.remove_checklist_item(item_id) {
                Ok(())
            } else {
                Err(Error::NotFound(item_id.to_string()))
            }
        })
        .await
    }

    /// Move the checklist item at `from` to index `to`.
    pub async fn move_checklist_item(&self, note_id: &NoteId, from: usize, to: usize) -> Result<Note> {
        self.edit_checklist(note_id, |note| {
            if note.move_checklist_item(from, to) {
                Ok(())
            } else {
                Err(Error::InvalidInput(format!(
                    "Checklist position out of range: {from} -> {to}"
                )))
            }
        })
        .await
    }

    async fn edit_checklist(
        &self,
        note_id: &NoteId,
        edit: impl FnOnce(&mut Note) -> Result<()>,
    ) -> Result<Note> {
        let note = {
            let db = self.db.lock().await;
            let repo = SqliteNoteRepository::new(db.connection());
            let mut note = repo
                .get(note_id)?
                .ok_or_else(|| Error::NotFound(note_id.to_string()))?;
            edit(&mut note)?;
            let patch = NotePatch {
                checklist: Some(note.checklist),
                ..NotePatch::default()
            };
            logged("update checklist", repo.update(note_id, &patch))?
        };
        self.events.emit(StoreEvent::NoteUpdated(note.id));
        Ok(note)
    }

    /// Add a tag. A tag already present (ignoring case) leaves the note untouched.
    pub async fn add_tag(&self, note_id: &NoteId, tag: &str) -> Result<Note> {
        let note = {
            let db = self.db.lock().await;
            let repo = SqliteNoteRepository::new(db.connection());
            let mut note = repo
                .get(note_id)?
                .ok_or_else(|| Error::NotFound(note_id.to_string()))?;

            if tag.trim().is_empty() {
                return Err(Error::InvalidInput("Tag cannot be empty".to_string()));
            }
            if !note.tags.insert(tag) {
                return Ok(note);
            }

            let patch = NotePatch {
                tags: Some(note.tags.iter().cloned().collect()),
                ..NotePatch::default()
            };
            logged("add tag", repo.update(note_id, &patch))?
        };
        self.events.emit(StoreEvent::NoteUpdated(note.id));
        Ok(note)
    }

    /// Remove a tag (ignoring case). Removing an absent tag is a no-op.
    pub async fn remove_tag(&self, note_id: &NoteId, tag: &str) -> Result<Note> {
        let note = {
            let db = self.db.lock().await;
            let repo = SqliteNoteRepository::new(db.connection());
            let mut note = repo
                .get(note_id)?
                .ok_or_else(|| Error::NotFound(note_id.to_string()))?;

            if !note.tags.remove(tag) {
                return Ok(note);
            }

            let patch = NotePatch {
                tags: Some(note.tags.iter().cloned().collect()),
                ..NotePatch::default()
            };
            logged("remove tag", repo.update(note_id, &patch))?
        };
        self.events.emit(StoreEvent::NoteUpdated(note.id));
        Ok(note)
    }

    /// Compress photos off the async runtime and store them on the note.
    ///
    /// When several imports for the same note overlap, only the one that
    /// started last writes; the others report [`ImportOutcome::Superseded`].
    pub async fn import_images(
        &self,
        note_id: &NoteId,
        sources: Vec<Vec<u8>>,
        options: ImageCompression,
    ) -> Result<ImportOutcome> {
        if self.get_note(note_id).await?.is_none() {
            return Err(Error::NotFound(note_id.to_string()));
        }

        let ticket = self.imports.begin(*note_id).await;
        let batch = tokio::task::spawn_blocking(move || compress_images(&sources, options))
            .await
            .map_err(|error| Error::Task(format!("Image compression task failed: {error}")))?;

        self.apply_import(&ticket, batch).await
    }

    pub(crate) async fn apply_import(
        &self,
        ticket: &ImportTicket,
        batch: CompressedBatch,
    ) -> Result<ImportOutcome> {
        let note_id = ticket.note_id();
        {
            let db = self.db.lock().await;
            if !self.imports.is_current(ticket).await {
                tracing::debug!("Discarding superseded image import for note {note_id}");
                return Ok(ImportOutcome::Superseded);
            }

            let repo = SqliteNoteRepository::new(db.connection());
            let patch = NotePatch {
                images: Some(batch.images.clone()),
                ..NotePatch::default()
            };
            logged("store images", repo.update(&note_id, &patch))?;
        }

        self.events.emit(StoreEvent::NoteUpdated(note_id));
        Ok(ImportOutcome::Applied {
            stored: batch.images.len(),
            skipped: batch.skipped,
        })
    }

    // Todos

    pub async fn create_todo(&self, title: &str, is_completed: bool) -> Result<TodoItem> {
        let todo = {
            let db = self.db.lock().await;
            let repo = SqliteTodoRepository::new(db.connection());
            logged("create todo", repo.create(title, is_completed))?
        };
        self.events.emit(StoreEvent::TodoCreated(todo.id));
        Ok(todo)
    }

    pub async fn get_todo(&self, id: &TodoId) -> Result<Option<TodoItem>> {
        let db = self.db.lock().await;
        let repo = SqliteTodoRepository::new(db.connection());
        repo.get(id)
    }

    /// List todos in insertion order.
    pub async fn list_todos(&self) -> Result<Vec<TodoItem>> {
        let db = self.db.lock().await;
        let repo = SqliteTodoRepository::new(db.connection());
        repo.list()
    }

    pub async fn update_todo(&self, id: &TodoId, patch: &TodoPatch) -> Result<TodoItem> {
        let todo = {
            let db = self.db.lock().await;
            let repo = SqliteTodoRepository::new(db.connection());
            logged("update todo", repo.update(id, patch))?
        };
        self.events.emit(StoreEvent::TodoUpdated(todo.id));
        Ok(todo)
    }

    pub async fn toggle_completed(&self, id: &TodoId) -> Result<TodoItem> {
        let todo = {
            let db = self.db.lock().await;
            let repo = SqliteTodoRepository::new(db.connection());
            logged("toggle todo", repo.toggle_completed(id))?
        };
        self.events.emit(StoreEvent::TodoUpdated(todo.id));
        Ok(todo)
    }

    pub async fn delete_todo(&self, id: &TodoId) -> Result<()> {
        {
            let db = self.db.lock().await;
            let repo = SqliteTodoRepository::new(db.connection());
            logged("delete todo", repo.delete(id))?;
        }
        self.events.emit(StoreEvent::TodoDeleted(*id));
        Ok(())
    }

    pub async fn query_todos(&self, todo_query: &TodoQuery) -> Result<Vec<TodoItem>> {
        let todos = self.list_todos().await?;
        Ok(query::query_todos(&todos, todo_query))
    }

    pub async fn todo_counts(&self) -> Result<TodoCounts> {
        let todos = self.list_todos().await?;
        Ok(TodoCounts::from_todos(&todos))
    }

    pub async fn list_todo_ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        let db = self.db.lock().await;
        let repo = SqliteTodoRepository::new(db.connection());
        repo.list_ids_by_prefix(prefix, limit)
    }

    // Preferences

    pub async fn load_preferences(&self) -> Result<Preferences> {
        let db = self.db.lock().await;
        let repo = SqliteSettingsRepository::new(db.connection());
        repo.load()
    }

    pub async fn save_preferences(&self, preferences: &Preferences) -> Result<()> {
        {
            let db = self.db.lock().await;
            let repo = SqliteSettingsRepository::new(db.connection());
            logged("save preferences", repo.save(preferences))?;
        }
        self.events.emit(StoreEvent::PreferencesChanged);
        Ok(())
    }

    pub async fn set_dark_mode(&self, is_dark_mode: bool) -> Result<Preferences> {
        self.update_preferences(|preferences| {
            preferences.is_dark_mode = is_dark_mode;
            Ok(())
        })
        .await
    }

    /// Switch language. The code must be in the supported catalog.
    pub async fn set_language(&self, code: &str) -> Result<Preferences> {
        let name = language_display_name(code)
            .ok_or_else(|| Error::InvalidInput(format!("Unsupported language: {code}")))?;
        let code = code.trim().to_ascii_lowercase();
        self.update_preferences(|preferences| {
            preferences.app_language = code;
            preferences.app_language_display_name = name.to_string();
            Ok(())
        })
        .await
    }

    pub async fn set_font_size(&self, font_size: u32) -> Result<Preferences> {
        self.update_preferences(|preferences| {
            if font_size == 0 {
                return Err(Error::InvalidInput(
                    "Font size must be greater than zero".to_string(),
                ));
            }
            preferences.font_size = font_size;
            Ok(())
        })
        .await
    }

    /// Choose an alternate app icon; `None` restores the primary icon.
    pub async fn set_app_icon(&self, icon: Option<String>) -> Result<Preferences> {
        let icon = crate::util::normalize_text_option(icon);
        self.update_preferences(|preferences| {
            preferences.app_icon = icon;
            Ok(())
        })
        .await
    }

    async fn update_preferences(
        &self,
        change: impl FnOnce(&mut Preferences) -> Result<()>,
    ) -> Result<Preferences> {
        let preferences = {
            let db = self.db.lock().await;
            let repo = SqliteSettingsRepository::new(db.connection());
            let mut preferences = repo.load()?;
            change(&mut preferences)?;
            logged("save preferences", repo.save(&preferences))?;
            preferences
        };
        self.events.emit(StoreEvent::PreferencesChanged);
        Ok(preferences)
    }
}

/// Log storage failures before handing them back to the caller.
fn logged<T>(operation: &str, result: Result<T>) -> Result<T> {
    result.inspect_err(|error| match error {
        Error::NotFound(_) | Error::InvalidInput(_) => {
            tracing::debug!("Failed to {operation}: {error}");
        }
        _ => tracing::error!("Failed to {operation}: {error}"),
    })
}
