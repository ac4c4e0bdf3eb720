//! Todo repository implementation

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

use super::{sanitize_id_prefix, sql_limit};
use crate::error::{Error, Result};
use crate::models::{TodoId, TodoItem, TodoPatch};

/// Trait for todo storage operations
pub trait TodoRepository {
    fn create(&self, title: &str, is_completed: bool) -> Result<TodoItem>;

    fn get(&self, id: &TodoId) -> Result<Option<TodoItem>>;

    /// List todos in insertion order
    fn list(&self) -> Result<Vec<TodoItem>>;

    fn update(&self, id: &TodoId, patch: &TodoPatch) -> Result<TodoItem>;

    /// Flip the completion flag
    fn toggle_completed(&self, id: &TodoId) -> Result<TodoItem>;

    fn delete(&self, id: &TodoId) -> Result<()>;

    fn list_ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>>;
}

/// `SQLite` implementation of `TodoRepository`
pub struct SqliteTodoRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteTodoRepository<'a> {
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn parse_todo(row: &rusqlite::Row<'_>) -> rusqlite::Result<TodoItem> {
        let id: String = row.get(0)?;
        Ok(TodoItem {
            id: id.parse().map_err(|error| {
                rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(error))
            })?,
            title: row.get(1)?,
            is_completed: row.get(2)?,
            created_at: row.get(3)?,
        })
    }

    fn save(&self, todo: &TodoItem) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE todos SET title = ?, is_completed = ? WHERE id = ?",
            params![todo.title, todo.is_completed, todo.id.as_str()],
        )?;
        if rows == 0 {
            return Err(Error::NotFound(todo.id.to_string()));
        }
        Ok(())
    }

    fn require(&self, id: &TodoId) -> Result<TodoItem> {
        self.get(id)?.ok_or_else(|| Error::NotFound(id.to_string()))
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn create(&self, title: &str, is_completed: bool) -> Result<TodoItem> {
        let todo = TodoItem::new(title, is_completed)?;

        self.conn.execute(
            "INSERT INTO todos (id, title, is_completed, created_at) VALUES (?, ?, ?, ?)",
            params![
                todo.id.as_str(),
                todo.title,
                todo.is_completed,
                todo.created_at
            ],
        )?;

        tracing::debug!("Created todo {}", todo.id);
        Ok(todo)
    }

    fn get(&self, id: &TodoId) -> Result<Option<TodoItem>> {
        let todo = self
            .conn
            .query_row(
                "SELECT id, title, is_completed, created_at FROM todos WHERE id = ?",
                params![id.as_str()],
                Self::parse_todo,
            )
            .optional()?;
        Ok(todo)
    }

    fn list(&self) -> Result<Vec<TodoItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, is_completed, created_at FROM todos ORDER BY created_at ASC, id ASC",
        )?;
        let todos = stmt
            .query_map([], Self::parse_todo)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(todos)
    }

    fn update(&self, id: &TodoId, patch: &TodoPatch) -> Result<TodoItem> {
        let mut todo = self.require(id)?;
        patch.apply_to(&mut todo)?;
        self.save(&todo)?;
        Ok(todo)
    }

    fn toggle_completed(&self, id: &TodoId) -> Result<TodoItem> {
        let mut todo = self.require(id)?;
        todo.toggle();
        self.save(&todo)?;
        Ok(todo)
    }

    fn delete(&self, id: &TodoId) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM todos WHERE id = ?", params![id.as_str()])?;
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
            .prepare("SELECT id FROM todos WHERE id LIKE ? || '%' ORDER BY id LIMIT ?")?;
        let ids = stmt
            .query_map(params![prefix, sql_limit(limit)], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(ids)
    }
}
