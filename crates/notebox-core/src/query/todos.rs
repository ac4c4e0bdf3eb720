//! Todo list derivation.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::TodoItem;
use crate::util::{compare_titles, contains_ignore_case};

/// Completion filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoFilter {
    #[default]
    All,
    /// Not completed
    Active,
    Completed,
}

impl TodoFilter {
    #[must_use]
    pub const fn matches(self, todo: &TodoItem) -> bool {
        match self {
            Self::All => true,
            Self::Active => !todo.is_completed,
            Self::Completed => todo.is_completed,
        }
    }
}

/// Sort order for todo lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoSort {
    #[default]
    TitleAsc,
    TitleDesc,
    /// Incomplete first, then title ascending
    Status,
}

impl TodoSort {
    fn compare(self, a: &TodoItem, b: &TodoItem) -> Ordering {
        match self {
            Self::TitleAsc => compare_titles(&a.title, &b.title),
            Self::TitleDesc => compare_titles(&b.title, &a.title),
            Self::Status => a
                .is_completed
                .cmp(&b.is_completed)
                .then_with(|| compare_titles(&a.title, &b.title)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoQuery {
    pub search_text: String,
    pub filter: TodoFilter,
    pub sort: TodoSort,
}

/// Counters shown above the todo list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TodoCounts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl TodoCounts {
    #[must_use]
    pub fn from_todos(todos: &[TodoItem]) -> Self {
        let completed = todos.iter().filter(|todo| todo.is_completed).count();
        Self {
            total: todos.len(),
            active: todos.len() - completed,
            completed,
        }
    }
}

/// Filter by search text and completion, then sort.
#[must_use]
pub fn query_todos(todos: &[TodoItem], query: &TodoQuery) -> Vec<TodoItem> {
    let search = query.search_text.as_str();

    let mut filtered: Vec<TodoItem> = todos
        .iter()
        .filter(|todo| contains_ignore_case(&todo.title, search))
        .filter(|todo| query.filter.matches(todo))
        .cloned()
        .collect();

    filtered.sort_by(|a, b| query.sort.compare(a, b));
    filtered
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn todo(title: &str, done: bool) -> TodoItem {
        TodoItem::new(title, done).unwrap()
    }

    fn titles(todos: &[TodoItem]) -> Vec<&str> {
        todos.iter().map(|todo| todo.title.as_str()).collect()
    }

    #[test]
    fn active_filter_keeps_incomplete() {
        let todos = vec![todo("A", false), todo("B", true)];
        let query = TodoQuery {
            filter: TodoFilter::Active,
            ..TodoQuery::default()
        };
        assert_eq!(titles(&query_todos(&todos, &query)), vec!["A"]);
    }

    #[test]
    fn completed_filter_keeps_done() {
        let todos = vec![todo("A", false), todo("B", true)];
        let query = TodoQuery {
            filter: TodoFilter::Completed,
            ..TodoQuery::default()
        };
        assert_eq!(titles(&query_todos(&todos, &query)), vec!["B"]);
    }

    #[test]
    fn search_is_case_insensitive_on_title() {
        let todos = vec![todo("Buy MILK", false), todo("Call bank", false)];
        let query = TodoQuery {
            search_text: "milk".to_string(),
            ..TodoQuery::default()
        };
        assert_eq!(titles(&query_todos(&todos, &query)), vec!["Buy MILK"]);
    }

    #[test]
    fn search_does_not_trim_whitespace() {
        let todos = vec![todo("Buy milk", false), todo("Call bank", false)];
        let padded = TodoQuery {
            search_text: " milk ".to_string(),
            ..TodoQuery::default()
        };
        assert!(query_todos(&todos, &padded).is_empty());

        let blank = TodoQuery {
            search_text: " ".to_string(),
            ..TodoQuery::default()
        };
        assert_eq!(titles(&query_todos(&todos, &blank)), vec!["Buy milk", "Call bank"]);
    }

    #[test]
    fn title_sort_ignores_accents() {
        let todos = vec![todo("Zoo", false), todo("Éclair", false), todo("dinner", false)];
        let asc = query_todos(&todos, &TodoQuery::default());
        assert_eq!(titles(&asc), vec!["dinner", "Éclair", "Zoo"]);
    }

    #[test]
    fn title_sorts() {
        let todos = vec![todo("banana", false), todo("Apple", true), todo("cherry", false)];

        let asc = query_todos(&todos, &TodoQuery::default());
        assert_eq!(titles(&asc), vec!["Apple", "banana", "cherry"]);

        let desc = query_todos(
            &todos,
            &TodoQuery {
                sort: TodoSort::TitleDesc,
                ..TodoQuery::default()
            },
        );
        assert_eq!(titles(&desc), vec!["cherry", "banana", "Apple"]);
    }

    #[test]
    fn status_sort_puts_incomplete_first_then_title() {
        let todos = vec![
            todo("delta", true),
            todo("Charlie", false),
            todo("alpha", true),
            todo("bravo", false),
        ];
        let query = TodoQuery {
            sort: TodoSort::Status,
            ..TodoQuery::default()
        };
        assert_eq!(
            titles(&query_todos(&todos, &query)),
            vec!["bravo", "Charlie", "alpha", "delta"]
        );
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(query_todos(&[], &TodoQuery::default()).is_empty());
        assert_eq!(TodoCounts::from_todos(&[]), TodoCounts::default());
    }

    #[test]
    fn counts() {
        let todos = vec![todo("a", false), todo("b", true), todo("c", false)];
        assert_eq!(
            TodoCounts::from_todos(&todos),
            TodoCounts {
                total: 3,
                active: 2,
                completed: 1
            }
        );
    }

    #[test]
    fn double_toggle_is_identity() {
        let original = todo("Walk", false);
        let mut toggled = original.clone();
        toggled.toggle();
        toggled.toggle();
        assert_eq!(toggled, original);
    }
}
