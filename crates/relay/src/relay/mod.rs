//! WebSocket fan-out state and broadcast.

use tokio::sync::broadcast;

use shared::{ChatMessage, TypingBroadcastPayload};

/// Event to fan out to connected WebSocket clients.
#[derive(Debug, Clone)]
pub enum BroadcastEvent {
    /// A stored chat message. Delivered to every connection, sender included.
    Message(ChatMessage),
    /// A typing indicator. Delivered to every connection except the one that
    /// sent it; the connection task drops events tagged with its own id.
    Typing {
        from: String,
        payload: TypingBroadcastPayload,
    },
}

/// Relay state: broadcast channel shared by all connection tasks.
#[derive(Clone)]
pub struct RelayState {
    tx: broadcast::Sender<BroadcastEvent>,
}

impl RelayState {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BroadcastEvent> {
        self.tx.subscribe()
    }

    pub fn broadcast(&self, event: BroadcastEvent) {
        let _ = self.tx.send(event);
    }

    /// Connections currently subscribed.
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
