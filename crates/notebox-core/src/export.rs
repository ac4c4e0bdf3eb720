//! Note and todo export to JSON or Markdown.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::models::{Coordinate, Note, TodoItem};

/// Export output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportChecklistItem {
    pub title: String,
    pub done: bool,
}

/// Serializable note record. Image bytes are reduced to a count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportNote {
    pub id: String,
    pub title: String,
    pub description: String,
    pub pinned: bool,
    pub location: Option<Coordinate>,
    pub tags: Vec<String>,
    pub checklist: Vec<ExportChecklistItem>,
    pub image_count: usize,
    pub video_path: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTodo {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub notes: Vec<ExportNote>,
    pub todos: Vec<ExportTodo>,
}

#[must_use]
pub fn note_to_export_item(note: &Note) -> ExportNote {
    ExportNote {
        id: note.id.to_string(),
        title: note.title.clone(),
        description: note.description.clone(),
        pinned: note.is_pinned,
        location: note.location,
        tags: note.tags.iter().cloned().collect(),
        checklist: note
            .checklist
            .iter()
            .map(|item| ExportChecklistItem {
                title: item.title.clone(),
                done: item.is_done,
            })
            .collect(),
        image_count: note.images.len(),
        video_path: note
            .video_path
            .as_ref()
            .map(|path| path.to_string_lossy().into_owned()),
        created_at: note.created_at,
        updated_at: note.updated_at,
    }
}

#[must_use]
pub fn todo_to_export_item(todo: &TodoItem) -> ExportTodo {
    ExportTodo {
        id: todo.id.to_string(),
        title: todo.title.clone(),
        completed: todo.is_completed,
        created_at: todo.created_at,
    }
}

/// Render notes and todos as one pretty-printed JSON document.
pub fn render_json_export(notes: &[Note], todos: &[TodoItem]) -> serde_json::Result<String> {
    let document = ExportDocument {
        notes: notes.iter().map(note_to_export_item).collect(),
        todos: todos.iter().map(todo_to_export_item).collect(),
    };
    serde_json::to_string_pretty(&document)
}

/// Render notes with frontmatter blocks, followed by a todo checklist.
#[must_use]
pub fn render_markdown_export(notes: &[Note], todos: &[TodoItem]) -> String {
    let mut output = String::new();

    for (index, note) in notes.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }

        let note = note_to_export_item(note);
        let _ = writeln!(output, "---");
        let _ = writeln!(output, "id: {}", note.id);
        let _ = writeln!(output, "title: {}", yaml_string(&note.title));
        let _ = writeln!(output, "pinned: {}", note.pinned);
        let _ = writeln!(output, "created_at: {}", note.created_at);
        let _ = writeln!(output, "updated_at: {}", note.updated_at);
        if let Some(location) = note.location {
            let _ = writeln!(
                output,
                "location: {}, {}",
                location.latitude, location.longitude
            );
        }
        if note.image_count > 0 {
            let _ = writeln!(output, "images: {}", note.image_count);
        }
        if let Some(video_path) = &note.video_path {
            let _ = writeln!(output, "video: {}", yaml_string(video_path));
        }
        let _ = writeln!(output, "tags:");
        for tag in &note.tags {
            let _ = writeln!(output, "  - {}", yaml_string(tag));
        }
        let _ = writeln!(output, "---");
        let _ = writeln!(output);
        let _ = writeln!(output, "# {}", note.title);

        if !note.description.is_empty() {
            let _ = writeln!(output);
            let _ = writeln!(output, "{}", note.description);
        }
        if !note.checklist.is_empty() {
            let _ = writeln!(output);
            for item in &note.checklist {
                let mark = if item.done { 'x' } else { ' ' };
                let _ = writeln!(output, "- [{mark}] {}", item.title);
            }
        }
    }

    if !todos.is_empty() {
        if !output.is_empty() {
            output.push('\n');
        }
        let _ = writeln!(output, "# Todos");
        let _ = writeln!(output);
        for todo in todos {
            let mark = if todo.is_completed { 'x' } else { ' ' };
            let _ = writeln!(output, "- [{mark}] {}", todo.title);
        }
    }

    output
}

/// Double-quoted scalar. JSON string syntax is valid YAML.
fn yaml_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// Render notes and todos in the selected format.
pub fn render_export(
    notes: &[Note],
    todos: &[TodoItem],
    format: ExportFormat,
) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => render_json_export(notes, todos),
        ExportFormat::Markdown => Ok(render_markdown_export(notes, todos)),
    }
}

/// Build a deterministic default file name for exports.
#[must_use]
pub fn suggested_export_file_name(format: ExportFormat, timestamp_ms: i64) -> String {
    format!("notebox-export-{timestamp_ms}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChecklistItem;

    fn sample_note() -> Note {
        let mut note = Note::new("Trip");
        note.id = "cccccccc-cccc-7ccc-8ccc-111111111111".parse().unwrap();
        note.description = "Pack light".to_string();
        note.created_at = 123;
        note.updated_at = 456;
        note.tags = ["travel", "Summer"].iter().collect();
        note.images = vec![vec![1], vec![2]];
        let mut done = ChecklistItem::new("Passport");
        done.toggle();
        note.checklist = vec![done, ChecklistItem::new("Tickets")];
        note
    }

    #[test]
    fn json_export_has_notes_and_todos() {
        let todo = TodoItem::new("Book hotel", true).unwrap();
        let rendered = render_json_export(&[sample_note()], &[todo]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["notes"][0]["title"], "Trip");
        assert_eq!(value["notes"][0]["image_count"], 2);
        assert_eq!(value["notes"][0]["tags"][1], "Summer");
        assert_eq!(value["todos"][0]["completed"], true);
    }

    #[test]
    fn markdown_export_includes_frontmatter_checklist_and_todos() {
        let todo = TodoItem::new("Book hotel", false).unwrap();
        let rendered = render_markdown_export(&[sample_note()], &[todo]);

        assert!(rendered.contains("id: cccccccc-cccc-7ccc-8ccc-111111111111"));
        assert!(rendered.contains("created_at: 123"));
        assert!(rendered.contains("updated_at: 456"));
        assert!(rendered.contains("title: \"Trip\"\n"));
        assert!(rendered.contains("tags:\n  - \"travel\"\n  - \"Summer\""));
        assert!(rendered.contains("# Trip\n\nPack light\n"));
        assert!(rendered.contains("- [x] Passport\n- [ ] Tickets"));
        assert!(rendered.contains("# Todos\n\n- [ ] Book hotel"));
    }

    #[test]
    fn markdown_frontmatter_quotes_yaml_sensitive_values() {
        let mut note = Note::new("# Plan: \"phase\" two");
        note.tags = ["a: b"].iter().collect();
        let rendered = render_markdown_export(&[note], &[]);

        assert!(rendered.contains("title: \"# Plan: \\\"phase\\\" two\"\n"));
        assert!(rendered.contains("  - \"a: b\"\n"));
        assert!(rendered.contains("\n# # Plan: \"phase\" two\n"));
    }

    #[test]
    fn markdown_export_of_nothing_is_empty() {
        assert!(render_markdown_export(&[], &[]).is_empty());
    }

    #[test]
    fn suggested_export_file_name_uses_format_extension() {
        assert_eq!(
            suggested_export_file_name(ExportFormat::Json, 123),
            "notebox-export-123.json"
        );
        assert_eq!(
            suggested_export_file_name(ExportFormat::Markdown, 456),
            "notebox-export-456.md"
        );
    }
}
