//! Async services shared by clients.

mod database;
mod events;
mod imports;

pub use database::DatabaseService;
pub use events::{EventBus, StoreEvent};
pub use imports::{ImportOutcome, ImportSequencer, ImportTicket};
