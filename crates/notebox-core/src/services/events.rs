//! Change notifications emitted after successful writes.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::models::{NoteId, TodoId};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A committed change to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum StoreEvent {
    NoteCreated(NoteId),
    NoteUpdated(NoteId),
    NoteDeleted(NoteId),
    TodoCreated(TodoId),
    TodoUpdated(TodoId),
    TodoDeleted(TodoId),
    PreferencesChanged,
}

/// Fan-out of [`StoreEvent`]s to any number of subscribers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    /// Publish an event. Having no subscribers is fine.
    pub fn emit(&self, event: StoreEvent) {
        tracing::debug!("Store event: {event:?}");
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_without_subscribers_is_silent() {
        EventBus::new().emit(StoreEvent::PreferencesChanged);
    }

    #[tokio::test]
    async fn subscribers_receive_events_in_order() {
        let bus = EventBus::new();
        let mut receiver = bus.subscribe();
        let id = NoteId::new();

        bus.emit(StoreEvent::NoteCreated(id));
        bus.emit(StoreEvent::NoteDeleted(id));

        assert_eq!(receiver.recv().await.unwrap(), StoreEvent::NoteCreated(id));
        assert_eq!(receiver.recv().await.unwrap(), StoreEvent::NoteDeleted(id));
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(StoreEvent::PreferencesChanged).unwrap();
        assert_eq!(json["type"], "preferences_changed");
    }
}
