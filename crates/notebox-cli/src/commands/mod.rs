pub mod common;
pub mod config;
pub mod completions;
pub mod export;
pub mod note;
pub mod settings;
pub mod todo;
