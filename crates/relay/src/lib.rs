//! Chat relay — connection registry, message store, broadcast dispatcher.

pub mod api;
pub mod config;
pub mod dispatch;
pub mod registry;
pub mod relay;
pub mod store;
