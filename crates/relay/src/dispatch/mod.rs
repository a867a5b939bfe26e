//! Broadcast dispatcher: routes client events through the registry and
//! message store and fans results out to connected listeners.

use shared::{ChatMessage, CreateMessagePayload, IdentifyResult, TypingBroadcastPayload};

use crate::registry::{ClientRegistry, ANONYMOUS};
use crate::relay::{BroadcastEvent, RelayState};
use crate::store::MessageStore;

/// Owns the message store, the connection registry, and the fan-out channel.
/// Constructed once at process start and injected into the transport layer;
/// no ambient state, so tests can run independent instances.
pub struct Dispatcher {
    store: MessageStore,
    registry: ClientRegistry,
    relay: RelayState,
}

impl Dispatcher {
    pub fn new(relay: RelayState) -> Self {
        Self {
            store: MessageStore::new(),
            registry: ClientRegistry::new(),
            relay,
        }
    }

    pub fn relay(&self) -> &RelayState {
        &self.relay
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    /// Append the message and broadcast it to every connection, sender
    /// included. The broadcast happens under the store lock so broadcast
    /// order always equals append order, even with concurrent creations.
    /// Returns the stored message as the caller's acknowledgment.
    pub fn create_message(&self, input: CreateMessagePayload) -> ChatMessage {
        let message = ChatMessage {
            name: input.name,
            message: input.message,
        };
        self.store.append_with(message, |stored| {
            self.relay.broadcast(BroadcastEvent::Message(stored.clone()));
        })
    }

    /// Full message history snapshot in insertion order. One-shot reply to
    /// the caller only, not a live subscription.
    pub fn list_messages(&self) -> Vec<ChatMessage> {
        self.store.snapshot()
    }

    /// Record the caller's display name. Despite the name there is no room
    /// partitioning; every connection shares the single global room. The
    /// result goes back to the calling connection only.
    pub fn join_room(&self, name: &str, connection_id: &str) -> IdentifyResult {
        self.registry.identify(name, connection_id)
    }

    /// Broadcast a typing indicator to every connection except the sender.
    /// An unidentified sender degrades to the anonymous label rather than
    /// erroring.
    pub fn typing(&self, is_typing: bool, connection_id: &str) {
        let name = self
            .registry
            .lookup(connection_id)
            .unwrap_or_else(|| ANONYMOUS.to_string());
        self.relay.broadcast(BroadcastEvent::Typing {
            from: connection_id.to_string(),
            payload: TypingBroadcastPayload { name, is_typing },
        });
    }

    /// Forget a disconnected connection so a reused transport id can never
    /// resolve to a stale name.
    pub fn disconnect(&self, connection_id: &str) {
        self.registry.remove(connection_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(RelayState::new(64))
    }

    fn create(name: &str, message: &str) -> CreateMessagePayload {
        CreateMessagePayload {
            name: name.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn create_message_returns_stored_message() {
        let dispatcher = dispatcher();
        let stored = dispatcher.create_message(create("Alice", "hi"));
        assert_eq!(stored.name, "Alice");
        assert_eq!(stored.message, "hi");
    }

    #[test]
    fn list_messages_returns_all_in_call_order() {
        let dispatcher = dispatcher();
        dispatcher.create_message(create("Alice", "one"));
        dispatcher.create_message(create("Bob", "two"));
        dispatcher.create_message(create("Alice", "three"));

        let all = dispatcher.list_messages();
        let bodies: Vec<&str> = all.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(bodies, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn create_message_broadcasts_to_all_subscribers() {
        let dispatcher = dispatcher();
        let mut rx_sender = dispatcher.relay().subscribe();
        let mut rx_other = dispatcher.relay().subscribe();

        dispatcher.create_message(create("Alice", "hi"));

        for rx in [&mut rx_sender, &mut rx_other] {
            match rx.recv().await.unwrap() {
                BroadcastEvent::Message(m) => {
                    assert_eq!(m.name, "Alice");
                    assert_eq!(m.message, "hi");
                }
                other => panic!("unexpected event: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn broadcast_order_matches_append_order() {
        let dispatcher = dispatcher();
        let mut rx = dispatcher.relay().subscribe();

        for i in 0..10 {
            dispatcher.create_message(create("Alice", &format!("msg-{}", i)));
        }

        for i in 0..10 {
            match rx.recv().await.unwrap() {
                BroadcastEvent::Message(m) => assert_eq!(m.message, format!("msg-{}", i)),
                other => panic!("unexpected event: {:?}", other),
            }
        }
        let bodies: Vec<String> = dispatcher
            .list_messages()
            .into_iter()
            .map(|m| m.message)
            .collect();
        assert_eq!(bodies[0], "msg-0");
        assert_eq!(bodies[9], "msg-9");
    }

    #[test]
    fn join_room_echoes_stored_association() {
        let dispatcher = dispatcher();
        let result = dispatcher.join_room("Bob", "conn-y");
        assert_eq!(result.name, "Bob");
        assert_eq!(result.connection_id, "conn-y");
        assert_eq!(dispatcher.registry().lookup("conn-y").as_deref(), Some("Bob"));
    }

    #[tokio::test]
    async fn typing_carries_last_registered_name_and_sender_id() {
        let dispatcher = dispatcher();
        dispatcher.join_room("Bob", "conn-y");
        dispatcher.join_room("Bobby", "conn-y");
        let mut rx = dispatcher.relay().subscribe();

        dispatcher.typing(true, "conn-y");

        match rx.recv().await.unwrap() {
            BroadcastEvent::Typing { from, payload } => {
                assert_eq!(from, "conn-y");
                assert_eq!(payload.name, "Bobby");
                assert!(payload.is_typing);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn typing_from_unidentified_connection_is_anonymous() {
        let dispatcher = dispatcher();
        let mut rx = dispatcher.relay().subscribe();

        dispatcher.typing(true, "conn-unknown");

        match rx.recv().await.unwrap() {
            BroadcastEvent::Typing { payload, .. } => {
                assert_eq!(payload.name, ANONYMOUS);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn disconnect_evicts_registry_entry() {
        let dispatcher = dispatcher();
        dispatcher.join_room("Alice", "conn-x");
        dispatcher.disconnect("conn-x");
        assert_eq!(dispatcher.registry().lookup("conn-x"), None);
    }
}
