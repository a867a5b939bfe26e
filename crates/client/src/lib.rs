//! Chat relay client — terminal chat over WebSocket.

pub mod chat;
pub mod cli;
