use notebox_core::config::AppConfig;
use notebox_core::models::TodoPatch;
use notebox_core::query::TodoQuery;

use crate::cli::{TodoFilterArg, TodoSortArg};
use crate::commands::common::{
    format_todo_lines, normalize_title, open_database, resolve_todo, todo_to_list_item,
};
use crate::error::CliError;

const MAX_TODO_TITLE_CHARS: usize = 200;

pub async fn run_todo_add(title: &[String], done: bool, config: &AppConfig) -> Result<(), CliError> {
    let title = normalize_title(&title.join(" "), MAX_TODO_TITLE_CHARS)?;
    let db = open_database(config).await?;
    let todo = db.create_todo(&title, done).await?;

    println!("{}", todo.id);
    Ok(())
}

pub async fn run_todo_list(
    search: Option<String>,
    filter: TodoFilterArg,
    sort: TodoSortArg,
    json: bool,
    config: &AppConfig,
) -> Result<(), CliError> {
    let db = open_database(config).await?;
    let query = TodoQuery {
        search_text: search.unwrap_or_default(),
        filter: filter.into(),
        sort: sort.into(),
    };
    let todos = db.query_todos(&query).await?;

    if json {
        let items = todos.iter().map(todo_to_list_item).collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    let counts = db.todo_counts().await?;
    println!(
        "{} total, {} active, {} completed",
        counts.total, counts.active, counts.completed
    );
    for line in format_todo_lines(&todos) {
        println!("{line}");
    }
    Ok(())
}

pub async fn run_todo_toggle(id: &str, config: &AppConfig) -> Result<(), CliError> {
    let db = open_database(config).await?;
    let todo = resolve_todo(id, &db).await?;
    let todo = db.toggle_completed(&todo.id).await?;

    let state = if todo.is_completed { "completed" } else { "active" };
    println!("{} {state}", todo.id);
    Ok(())
}

pub async fn run_todo_edit(id: &str, title: &str, config: &AppConfig) -> Result<(), CliError> {
    let title = normalize_title(title, MAX_TODO_TITLE_CHARS)?;
    let db = open_database(config).await?;
    let todo = resolve_todo(id, &db).await?;

    let patch = TodoPatch {
        title: Some(title),
        ..TodoPatch::default()
    };
    let todo = db.update_todo(&todo.id, &patch).await?;
    println!("{}", todo.id);
    Ok(())
}

pub async fn run_todo_delete(id: &str, config: &AppConfig) -> Result<(), CliError> {
    let db = open_database(config).await?;
    let todo = resolve_todo(id, &db).await?;
    db.delete_todo(&todo.id).await?;

    println!("{}", todo.id);
    Ok(())
}
