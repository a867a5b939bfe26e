//! In-memory message store.

use std::sync::Mutex;

use shared::ChatMessage;

/// Append-only message log. Insertion order is arrival order; unbounded
/// growth is accepted (no eviction, no persistence).
#[derive(Default)]
pub struct MessageStore {
    messages: Mutex<Vec<ChatMessage>>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and run `after_append` while still holding the
    /// store lock. The dispatcher broadcasts from inside the closure so
    /// concurrent appends cannot interleave their append and broadcast
    /// steps; broadcast order always matches append order.
    pub fn append_with<F>(&self, message: ChatMessage, after_append: F) -> ChatMessage
    where
        F: FnOnce(&ChatMessage),
    {
        let mut messages = self.messages.lock().unwrap();
        messages.push(message.clone());
        after_append(&message);
        message
    }

    /// Full history snapshot in insertion order.
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
