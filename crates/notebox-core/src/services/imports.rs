//! Ordering of background image imports.
//!
//! Each import for a note takes a ticket. Only the most recent ticket for that
//! note may write its result; older imports that finish late are discarded.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::models::NoteId;

/// Proof of when an import started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportTicket {
    note_id: NoteId,
    generation: u64,
}

impl ImportTicket {
    #[must_use]
    pub const fn note_id(&self) -> NoteId {
        self.note_id
    }
}

/// How an image import ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The note's images were replaced
    Applied { stored: usize, skipped: usize },
    /// A newer import for the same note started first; nothing was written
    Superseded,
}

/// Per-note generation counters
#[derive(Debug, Clone, Default)]
pub struct ImportSequencer {
    generations: Arc<Mutex<HashMap<NoteId, u64>>>,
}

impl ImportSequencer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an import, invalidating every earlier ticket for the note.
    pub async fn begin(&self, note_id: NoteId) -> ImportTicket {
        let mut generations = self.generations.lock().await;
        let generation = generations.entry(note_id).or_insert(0);
        *generation += 1;
        ImportTicket {
            note_id,
            generation: *generation,
        }
    }

    pub async fn is_current(&self, ticket: &ImportTicket) -> bool {
        let generations = self.generations.lock().await;
        generations.get(&ticket.note_id) == Some(&ticket.generation)
    }

    /// Drop the counter for a deleted note.
    pub async fn forget(&self, note_id: &NoteId) {
        self.generations.lock().await.remove(note_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn latest_ticket_wins() {
        let sequencer = ImportSequencer::new();
        let note = NoteId::new();

        let first = sequencer.begin(note).await;
        assert!(sequencer.is_current(&first).await);

        let second = sequencer.begin(note).await;
        assert!(!sequencer.is_current(&first).await);
        assert!(sequencer.is_current(&second).await);
    }

    #[tokio::test]
    async fn notes_are_sequenced_independently() {
        let sequencer = ImportSequencer::new();
        let a = sequencer.begin(NoteId::new()).await;
        let b = sequencer.begin(NoteId::new()).await;
        assert!(sequencer.is_current(&a).await);
        assert!(sequencer.is_current(&b).await);
    }

    #[tokio::test]
    async fn forgotten_note_invalidates_tickets() {
        let sequencer = ImportSequencer::new();
        let note = NoteId::new();
        let ticket = sequencer.begin(note).await;
        sequencer.forget(&note).await;
        assert!(!sequencer.is_current(&ticket).await);
    }
}
