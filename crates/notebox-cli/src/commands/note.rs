use std::path::Path;

use notebox_core::config::AppConfig;
use notebox_core::export::note_to_export_item;
use notebox_core::media::{remove_stored_video, store_video};
use notebox_core::models::{NoteDraft, NotePatch, MAX_DESCRIPTION_CHARS, MAX_TITLE_CHARS};
use notebox_core::query::NoteQuery;
use notebox_core::services::{DatabaseService, ImportOutcome};
use notebox_core::util::truncate_chars;
use notebox_core::Note;
use serde::Serialize;

use crate::cli::{NoteAddArgs, NoteEditArgs, NoteListArgs};
use crate::commands::common::{
    format_note_lines, format_timestamp, normalize_title, note_to_list_item, open_database,
    parse_coordinate, read_image_files, render_tags, resolve_note, NoteListItem,
};
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct NoteListOutput {
    pinned: Vec<NoteListItem>,
    others: Vec<NoteListItem>,
}

pub async fn run_note_add(args: NoteAddArgs, config: &AppConfig) -> Result<(), CliError> {
    let title = normalize_title(&args.title, MAX_TITLE_CHARS)?;
    let description = args
        .desc
        .as_deref()
        .map(|desc| truncate_chars(desc.trim(), MAX_DESCRIPTION_CHARS))
        .unwrap_or_default();
    let location = parse_coordinate(args.lat, args.lon)?;
    let images = read_image_files(&args.images)?;

    let db = open_database(config).await?;
    let draft = NoteDraft {
        title,
        description,
        is_pinned: args.pin,
        location,
        images: Vec::new(),
        video_path: None,
        tags: args.tags,
        checklist: args.checklist,
    };
    let note =
        create_note_with_video(&db, draft, args.video.as_deref(), &config.media_dir()).await?;

    if !images.is_empty() {
        let outcome = db
            .import_images(&note.id, images, config.image_compression())
            .await?;
        report_import(&outcome);
    }

    println!("{}", note.id);
    Ok(())
}

/// Copy the video into storage and create the note, removing the copy again
/// when the note cannot be saved.
pub async fn create_note_with_video(
    db: &DatabaseService,
    mut draft: NoteDraft,
    video: Option<&Path>,
    media_dir: &Path,
) -> Result<Note, CliError> {
    let Some(source) = video else {
        return Ok(db.create_note(&draft).await?);
    };

    let stored = store_video(source, media_dir)?;
    draft.video_path = Some(stored.clone());
    match db.create_note(&draft).await {
        Ok(note) => Ok(note),
        Err(error) => {
            if let Err(cleanup) = remove_stored_video(&stored, media_dir) {
                tracing::warn!(
                    "Failed to remove orphaned video {}: {}",
                    stored.display(),
                    cleanup
                );
            }
            Err(error.into())
        }
    }
}

fn report_import(outcome: &ImportOutcome) {
    match outcome {
        ImportOutcome::Applied { skipped, .. } if *skipped > 0 => {
            eprintln!("Skipped {skipped} image(s) that could not be decoded");
        }
        ImportOutcome::Applied { .. } => {}
        ImportOutcome::Superseded => {
            tracing::warn!("Image import was superseded by a newer import");
        }
    }
}

pub async fn run_note_list(args: NoteListArgs, config: &AppConfig) -> Result<(), CliError> {
    let db = open_database(config).await?;
    let query = NoteQuery {
        search_text: args.search.unwrap_or_default(),
        selected_tag: args.tag,
        filter_images: args.images,
        filter_video: args.video,
        filter_location: args.location,
        sort_mode: args.sort.into(),
    };
    let listing = db.query_notes(&query).await?;

    if args.json {
        let output = NoteListOutput {
            pinned: listing.pinned.iter().map(note_to_list_item).collect(),
            others: listing.others.iter().map(note_to_list_item).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if listing.is_empty() {
        println!("No notes found");
        return Ok(());
    }

    if !listing.pinned.is_empty() {
        println!("Pinned");
        for line in format_note_lines(&listing.pinned) {
            println!("  {line}");
        }
    }
    if !listing.others.is_empty() {
        if !listing.pinned.is_empty() {
            println!();
        }
        println!("Others");
        for line in format_note_lines(&listing.others) {
            println!("  {line}");
        }
    }

    Ok(())
}

pub async fn run_note_show(id: &str, json: bool, config: &AppConfig) -> Result<(), CliError> {
    let db = open_database(config).await?;
    let note = resolve_note(id, &db).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&note_to_export_item(&note))?
        );
    } else {
        print!("{}", render_note_details(&note));
    }
    Ok(())
}

pub fn render_note_details(note: &Note) -> String {
    let mut lines = vec![
        format!("{}{}", if note.is_pinned { "* " } else { "" }, note.title),
        format!("id: {}", note.id),
        format!("updated: {}", format_timestamp(note.updated_at)),
    ];
    if let Some(location) = note.location {
        lines.push(format!(
            "location: {:.5}, {:.5}",
            location.latitude, location.longitude
        ));
    }
    if !note.tags.is_empty() {
        lines.push(format!("tags: {}", render_tags(note)));
    }
    if note.has_images() {
        lines.push(format!("images: {}", note.images.len()));
    }
    if let Some(video_path) = &note.video_path {
        lines.push(format!("video: {}", video_path.display()));
    }
    if !note.description.is_empty() {
        lines.push(String::new());
        lines.push(note.description.clone());
    }
    if !note.checklist.is_empty() {
        lines.push(String::new());
        for (index, item) in note.checklist.iter().enumerate() {
            let mark = if item.is_done { 'x' } else { ' ' };
            lines.push(format!("{}. [{mark}] {}", index + 1, item.title));
        }
    }

    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}

pub async fn run_note_edit(args: NoteEditArgs, config: &AppConfig) -> Result<(), CliError> {
    let db = open_database(config).await?;
    let note = resolve_note(&args.id, &db).await?;

    let mut patch = NotePatch::default();
    if let Some(title) = &args.title {
        patch.title = Some(normalize_title(title, MAX_TITLE_CHARS)?);
    }
    if let Some(desc) = &args.desc {
        patch.description = Some(truncate_chars(desc.trim(), MAX_DESCRIPTION_CHARS));
    }
    if args.clear_location {
        patch.location = Some(None);
    } else if let Some(location) = parse_coordinate(args.lat, args.lon)? {
        patch.location = Some(Some(location));
    }

    if patch.is_empty() && args.tag_add.is_empty() && args.tag_remove.is_empty() {
        return Err(CliError::NothingToEdit);
    }

    let mut note = if patch.is_empty() {
        note
    } else {
        db.update_note(&note.id, &patch).await?
    };
    for tag in &args.tag_add {
        note = db.add_tag(&note.id, tag).await?;
    }
    for tag in &args.tag_remove {
        note = db.remove_tag(&note.id, tag).await?;
    }

    println!("{}", note.id);
    Ok(())
}

pub async fn run_note_pin(id: &str, config: &AppConfig) -> Result<(), CliError> {
    let db = open_database(config).await?;
    let note = resolve_note(id, &db).await?;
    let note = db.toggle_pin(&note.id).await?;

    let state = if note.is_pinned { "pinned" } else { "unpinned" };
    println!("{} {state}", note.id);
    Ok(())
}

pub async fn run_note_delete(id: &str, config: &AppConfig) -> Result<(), CliError> {
    let db = open_database(config).await?;
    let note = resolve_note(id, &db).await?;
    db.delete_note(&note.id).await?;

    if let Some(video_path) = &note.video_path {
        if let Err(error) = remove_stored_video(video_path, &config.media_dir()) {
            tracing::warn!("Failed to remove video {}: {error}", video_path.display());
        }
    }

    println!("{}", note.id);
    Ok(())
}

pub async fn run_note_check(id: &str, position: usize, config: &AppConfig) -> Result<(), CliError> {
    let db = open_database(config).await?;
    let note = resolve_note(id, &db).await?;
    let note = toggle_checklist_position(&db, &note, position).await?;

    let (done, total) = note.checklist_progress();
    println!("{} {done}/{total}", note.id);
    Ok(())
}

async fn toggle_checklist_position(
    db: &DatabaseService,
    note: &Note,
    position: usize,
) -> Result<Note, CliError> {
    let item = position
        .checked_sub(1)
        .and_then(|index| note.checklist.get(index))
        .ok_or(CliError::ChecklistItemNotFound {
            position,
            len: note.checklist.len(),
        })?;

    Ok(db.toggle_checklist_item(&note.id, &item.id).await?)
}

pub async fn run_note_tags(config: &AppConfig) -> Result<(), CliError> {
    let db = open_database(config).await?;
    let tags = db.list_tags().await?;

    if tags.is_empty() {
        println!("No tags yet");
    }
    for tag in tags {
        println!("#{tag}");
    }
    Ok(())
}
