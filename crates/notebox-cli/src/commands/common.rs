use std::path::PathBuf;

use chrono::Utc;
use notebox_core::config::AppConfig;
use notebox_core::services::DatabaseService;
use notebox_core::util::{collapse_whitespace, truncate_chars};
use notebox_core::{Coordinate, Note, NoteId, TodoId, TodoItem};
use serde::Serialize;

use crate::error::CliError;

const PREFIX_MATCH_LIMIT: usize = 3;
const SHORT_ID_CHARS: usize = 13;

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: String,
    pub title: String,
    pub preview: String,
    pub pinned: bool,
    pub tags: Vec<String>,
    pub checklist_done: usize,
    pub checklist_total: usize,
    pub has_images: bool,
    pub has_video: bool,
    pub has_location: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub relative_time: String,
}

#[derive(Debug, Serialize)]
pub struct TodoListItem {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: i64,
}

pub async fn open_database(config: &AppConfig) -> Result<DatabaseService, CliError> {
    let db_path = config.db_path();
    tracing::debug!("Opening database at {}", db_path.display());
    Ok(DatabaseService::open_path(db_path).await?)
}

pub fn normalize_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyIdentifier)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn normalize_title(title: &str, max_chars: usize) -> Result<String, CliError> {
    let title = truncate_chars(title.trim(), max_chars);
    if title.is_empty() {
        Err(CliError::EmptyTitle)
    } else {
        Ok(title)
    }
}

/// Resolve a note by full id or unique id prefix.
pub async fn resolve_note(query: &str, db: &DatabaseService) -> Result<Note, CliError> {
    let query = normalize_identifier(query)?;
    if let Ok(note_id) = query.parse::<NoteId>() {
        if let Some(note) = db.get_note(&note_id).await? {
            return Ok(note);
        }
    }

    let matching_ids = db.list_note_ids_by_prefix(&query, PREFIX_MATCH_LIMIT).await?;
    let id = pick_unique_id(&query, &matching_ids)?
        .ok_or_else(|| CliError::NoteNotFound(query.clone()))?;
    let note_id = id
        .parse::<NoteId>()
        .map_err(|_| CliError::NoteNotFound(query.clone()))?;

    db.get_note(&note_id)
        .await?
        .ok_or(CliError::NoteNotFound(query))
}

/// Resolve a todo by full id or unique id prefix.
pub async fn resolve_todo(query: &str, db: &DatabaseService) -> Result<TodoItem, CliError> {
    let query = normalize_identifier(query)?;
    if let Ok(todo_id) = query.parse::<TodoId>() {
        if let Some(todo) = db.get_todo(&todo_id).await? {
            return Ok(todo);
        }
    }

    let matching_ids = db.list_todo_ids_by_prefix(&query, PREFIX_MATCH_LIMIT).await?;
    let id = pick_unique_id(&query, &matching_ids)?
        .ok_or_else(|| CliError::TodoNotFound(query.clone()))?;
    let todo_id = id
        .parse::<TodoId>()
        .map_err(|_| CliError::TodoNotFound(query.clone()))?;

    db.get_todo(&todo_id)
        .await?
        .ok_or(CliError::TodoNotFound(query))
}

fn pick_unique_id<'a>(query: &str, ids: &'a [String]) -> Result<Option<&'a String>, CliError> {
    match ids {
        [] => Ok(None),
        [id] => Ok(Some(id)),
        _ => {
            let options = ids
                .iter()
                .map(|id| short_id(id.as_str()))
                .collect::<Vec<_>>()
                .join(", ");

            Err(CliError::AmbiguousId(format!(
                "ID prefix '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub fn parse_coordinate(
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<Option<Coordinate>, CliError> {
    match (lat, lon) {
        (Some(latitude), Some(longitude)) => Ok(Some(Coordinate::new(latitude, longitude)?)),
        _ => Ok(None),
    }
}

pub fn read_image_files(paths: &[PathBuf]) -> Result<Vec<Vec<u8>>, CliError> {
    paths
        .iter()
        .map(|path| std::fs::read(path).map_err(CliError::from))
        .collect()
}

pub fn short_id(id: &str) -> String {
    id.chars().take(SHORT_ID_CHARS).collect()
}

pub fn note_preview(note: &Note, max_chars: usize) -> String {
    let source = if note.description.trim().is_empty() {
        &note.title
    } else {
        &note.description
    };
    let first_line = source.lines().next().unwrap_or("");
    ellipsize(&collapse_whitespace(first_line), max_chars)
}

fn ellipsize(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut truncated = truncate_chars(text, max_chars.saturating_sub(3));
        truncated.push_str("...");
        truncated
    }
}

pub fn render_tags(note: &Note) -> String {
    note.tags
        .iter()
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn format_note_lines(notes: &[Note]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    notes
        .iter()
        .map(|note| {
            let short_id = short_id(&note.id.to_string());
            let title = ellipsize(&note.title, 30);
            let relative_time = format_relative_time(note.updated_at, now_ms);
            let markers = media_markers(note);
            let tags = render_tags(note);

            let mut line = format!("{short_id:<13}  {title:<30}  {relative_time:<10}");
            if !markers.is_empty() {
                line.push_str("  ");
                line.push_str(&markers);
            }
            if !tags.is_empty() {
                line.push_str("  ");
                line.push_str(&tags);
            }
            line
        })
        .collect()
}

pub fn format_todo_lines(todos: &[TodoItem]) -> Vec<String> {
    todos
        .iter()
        .map(|todo| {
            let mark = if todo.is_completed { 'x' } else { ' ' };
            format!("{}  [{mark}] {}", short_id(&todo.id.to_string()), todo.title)
        })
        .collect()
}

fn media_markers(note: &Note) -> String {
    let mut markers = Vec::new();
    if note.has_images() {
        markers.push(format!("img:{}", note.images.len()));
    }
    if note.has_video() {
        markers.push("video".to_string());
    }
    if note.has_location() {
        markers.push("loc".to_string());
    }
    let (done, total) = note.checklist_progress();
    if total > 0 {
        markers.push(format!("{done}/{total}"));
    }
    markers.join(" ")
}

pub fn note_to_list_item(note: &Note) -> NoteListItem {
    let now_ms = Utc::now().timestamp_millis();
    let (checklist_done, checklist_total) = note.checklist_progress();

    NoteListItem {
        id: note.id.to_string(),
        title: note.title.clone(),
        preview: note_preview(note, 80),
        pinned: note.is_pinned,
        tags: note.tags.iter().cloned().collect(),
        checklist_done,
        checklist_total,
        has_images: note.has_images(),
        has_video: note.has_video(),
        has_location: note.has_location(),
        created_at: note.created_at,
        updated_at: note.updated_at,
        relative_time: format_relative_time(note.updated_at, now_ms),
    }
}

pub fn todo_to_list_item(todo: &TodoItem) -> TodoListItem {
    TodoListItem {
        id: todo.id.to_string(),
        title: todo.title.clone(),
        completed: todo.is_completed,
        created_at: todo.created_at,
    }
}

pub fn format_timestamp(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}
