//! Connection registry: transport connection id to display name.

use std::collections::HashMap;
use std::sync::RwLock;

use shared::IdentifyResult;

/// Display name used when a connection was never identified. A typing
/// broadcast from such a connection still goes out, just anonymously.
pub const ANONYMOUS: &str = "anonymous";

/// Maps live connection ids to self-reported display names. Names are not
/// unique and not validated; re-identifying a connection overwrites the
/// prior name.
#[derive(Default)]
pub struct ClientRegistry {
    names: RwLock<HashMap<String, String>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `connection_id` is now known as `name`. Last write wins.
    /// Returns the stored association as an acknowledgment for the caller.
    pub fn identify(&self, name: &str, connection_id: &str) -> IdentifyResult {
        let mut names = self.names.write().unwrap();
        names.insert(connection_id.to_string(), name.to_string());
        IdentifyResult {
            name: name.to_string(),
            connection_id: connection_id.to_string(),
        }
    }

    /// Display name for `connection_id`, or `None` if it never identified.
    pub fn lookup(&self, connection_id: &str) -> Option<String> {
        self.names.read().unwrap().get(connection_id).cloned()
    }

    /// Evict a connection's entry. Called on socket close so ids from
    /// disconnected transports cannot resolve to a stale name.
    pub fn remove(&self, connection_id: &str) {
        self.names.write().unwrap().remove(connection_id);
    }
}
