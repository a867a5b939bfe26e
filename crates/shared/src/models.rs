//! Chat domain models and WebSocket payloads.

use serde::{Deserialize, Serialize};

/// A stored chat message. Immutable once created; no id, timestamp, or room
/// field, since all messages live in the single global room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub name: String,
    pub message: String,
}

/// create-message payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMessagePayload {
    pub name: String,
    pub message: String,
}

/// join payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinPayload {
    pub name: String,
}

/// typing payload (client to server).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingPayload {
    pub is_typing: bool,
}

/// typing broadcast (server to every connection except the sender).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingBroadcastPayload {
    pub name: String,
    pub is_typing: bool,
}

/// Acknowledgment for a join: echoes the stored connection-to-name
/// association back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyResult {
    pub name: String,
    pub connection_id: String,
}

// --- WebSocket envelope ---

/// WebSocket message envelope (version 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsEnvelope {
    #[serde(default)]
    pub version: u8,
    pub r#type: String,
    #[serde(default)]
    pub payload: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
}

/// WebSocket event names.
pub mod ws_types {
    // Inbound (client to relay)
    pub const CREATE_MESSAGE: &str = "create-message";
    pub const FIND_ALL_MESSAGES: &str = "find-all-messages";
    pub const JOIN: &str = "join";
    pub const TYPING: &str = "typing";

    // Outbound (relay to clients)
    pub const MESSAGE: &str = "message";
    pub const MESSAGES: &str = "messages";
    pub const JOINED: &str = "joined";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ws_types;

    #[test]
    fn chat_message_serde_roundtrip() {
        let msg = ChatMessage {
            name: "Alice".to_string(),
            message: "hi".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        let parsed: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, msg);
    }

    #[test]
    fn typing_payload_uses_camel_case() {
        let payload = TypingPayload { is_typing: true };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("isTyping"));
        let parsed: TypingPayload = serde_json::from_str(r#"{"isTyping":false}"#).unwrap();
        assert!(!parsed.is_typing);
    }

    #[test]
    fn typing_broadcast_carries_name_and_flag() {
        let payload = TypingBroadcastPayload {
            name: "Bob".to_string(),
            is_typing: true,
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains(r#""name":"Bob""#));
        assert!(json.contains(r#""isTyping":true"#));
    }

    #[test]
    fn ws_envelope_serde_roundtrip() {
        let env = WsEnvelope {
            version: 1,
            r#type: ws_types::CREATE_MESSAGE.to_string(),
            payload: serde_json::json!({"name": "Alice", "message": "hi"}),
            ts: Some("2025-01-01T00:00:00Z".to_string()),
        };
        let json = serde_json::to_string(&env).unwrap();
        let parsed: WsEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.r#type, ws_types::CREATE_MESSAGE);
        assert_eq!(parsed.version, 1);
    }

    #[test]
    fn ws_envelope_payload_defaults_to_null() {
        let parsed: WsEnvelope =
            serde_json::from_str(r#"{"type":"find-all-messages"}"#).unwrap();
        assert_eq!(parsed.r#type, ws_types::FIND_ALL_MESSAGES);
        assert!(parsed.payload.is_null());
    }
}
