//! notebox-core - Core library for notebox
//!
//! This crate contains the shared models, storage layer, query layer and
//! services used by every notebox client.

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod location;
pub mod media;
pub mod models;
pub mod query;
pub mod services;
pub mod util;

pub use error::{Error, Result};
pub use models::{ChecklistItem, Coordinate, Note, NoteId, TodoId, TodoItem};
