//! Shared wire types for the chat relay monorepo.

mod models;

// Explicit re-exports (avoids rust-analyzer issues with `pub use models::*`)
pub use models::ws_types;
pub use models::{
    ChatMessage, CreateMessagePayload, IdentifyResult, JoinPayload, TypingBroadcastPayload,
    TypingPayload, WsEnvelope,
};
