//! CLI argument parsing.

use clap::Parser;

#[derive(Parser)]
#[command(name = "client")]
#[command(about = "Chat relay client — terminal chat")]
pub struct Cli {
    /// Display name to join the chat under
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Relay WebSocket URL (overrides RELAY_WS_URL)
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,
}
