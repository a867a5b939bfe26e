//! WebSocket client loop: join, send messages, print broadcasts.

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use tokio::io::AsyncBufReadExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use shared::{ws_types, WsEnvelope};

/// What the user typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Message(String),
    Typing(bool),
    History,
    Quit,
}

/// Slash commands: /typing on|off, /history, /quit. Anything else is a chat
/// message; blank lines are dropped.
pub fn parse_input(line: &str) -> Option<Input> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match line {
        "/typing on" => Some(Input::Typing(true)),
        "/typing off" => Some(Input::Typing(false)),
        "/history" => Some(Input::History),
        "/quit" => Some(Input::Quit),
        _ => Some(Input::Message(line.to_string())),
    }
}

fn frame(r#type: &str, payload: serde_json::Value) -> Message {
    Message::Text(
        serde_json::json!({"version": 1, "type": r#type, "payload": payload}).to_string(),
    )
}

fn print_event(envelope: &WsEnvelope) {
    match envelope.r#type.as_str() {
        ws_types::MESSAGE => {
            let name = envelope.payload["name"].as_str().unwrap_or("?");
            let message = envelope.payload["message"].as_str().unwrap_or("");
            println!("{}: {}", name, message);
        }
        ws_types::MESSAGES => {
            if let Some(history) = envelope.payload.as_array() {
                println!("--- history ({} messages) ---", history.len());
                for m in history {
                    println!(
                        "{}: {}",
                        m["name"].as_str().unwrap_or("?"),
                        m["message"].as_str().unwrap_or("")
                    );
                }
            }
        }
        ws_types::TYPING => {
            let name = envelope.payload["name"].as_str().unwrap_or("?");
            if envelope.payload["isTyping"].as_bool().unwrap_or(false) {
                println!("* {} is typing...", name);
            } else {
                println!("* {} stopped typing", name);
            }
        }
        ws_types::JOINED => {
            println!(
                "joined as {}",
                envelope.payload["name"].as_str().unwrap_or("?")
            );
        }
        other => {
            tracing::debug!(r#type = other, "ignoring unknown event");
        }
    }
}

pub async fn run_ws_client(ws_url: &str, name: &str) -> Result<()> {
    let url = ws_url.to_string();
    loop {
        match connect_async(&url).await {
            Ok((ws, _)) => {
                tracing::info!("Connected to relay");
                match handle_connection(ws, name).await {
                    Ok(false) => return Ok(()),
                    Ok(true) => {}
                    Err(e) => tracing::warn!("Connection error: {}", e),
                }
            }
            Err(e) => {
                tracing::warn!("Connect failed: {}, retrying in 5s", e);
            }
        }
        tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
    }
}

/// Returns Ok(true) to reconnect (relay dropped us), Ok(false) to exit
/// (user quit or stdin closed).
async fn handle_connection(
    ws: tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    name: &str,
) -> Result<bool> {
    let (mut ws_tx, mut ws_rx) = ws.split();

    ws_tx
        .send(frame(ws_types::JOIN, serde_json::json!({"name": name})))
        .await?;
    ws_tx
        .send(frame(ws_types::FIND_ALL_MESSAGES, serde_json::json!({})))
        .await?;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { return Ok(false) };
                match parse_input(&line) {
                    None => {}
                    Some(Input::Quit) => return Ok(false),
                    Some(Input::History) => {
                        ws_tx
                            .send(frame(ws_types::FIND_ALL_MESSAGES, serde_json::json!({})))
                            .await?;
                    }
                    Some(Input::Typing(is_typing)) => {
                        ws_tx
                            .send(frame(
                                ws_types::TYPING,
                                serde_json::json!({"isTyping": is_typing}),
                            ))
                            .await?;
                    }
                    Some(Input::Message(message)) => {
                        ws_tx
                            .send(frame(
                                ws_types::CREATE_MESSAGE,
                                serde_json::json!({"name": name, "message": message}),
                            ))
                            .await?;
                    }
                }
            }
            msg = ws_rx.next() => {
                let msg = match msg {
                    Some(Ok(Message::Text(t))) => t,
                    Some(Ok(Message::Close(_))) | None => return Ok(true),
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return Err(e.into()),
                };
                match serde_json::from_str::<WsEnvelope>(&msg) {
                    Ok(envelope) => print_event(&envelope),
                    Err(_) => continue,
                }
            }
        }
    }
}
