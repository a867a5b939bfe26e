//! Chat relay client — terminal chat.

use std::env;

use clap::Parser;
use client::{chat, cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = cli::Cli::parse();

    let ws_url = cli
        .url
        .or_else(|| env::var("RELAY_WS_URL").ok())
        .unwrap_or_else(|| "ws://localhost:8080/ws".to_string());

    chat::run_ws_client(&ws_url, &cli.name).await
}
