//! WebSocket route handler.

use axum::extract::{
    ws::{Message, WebSocket, WebSocketUpgrade},
    State,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use shared::{ws_types, CreateMessagePayload, JoinPayload, TypingPayload, WsEnvelope};

use crate::api::AppState;
use crate::relay::BroadcastEvent;

fn envelope(r#type: &str, payload: serde_json::Value) -> String {
    serde_json::to_string(&WsEnvelope {
        version: 1,
        r#type: r#type.to_string(),
        payload,
        ts: Some(chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()),
    })
    .unwrap_or_default()
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> axum::response::Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// One task per connection reads inbound events; a writer task owns the sink
/// and merges direct replies, fan-out events, and keepalive pings. Typing
/// events tagged with this connection's id are dropped so a client never
/// sees its own typing echo; message events go to everyone, sender included.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection_id = Uuid::new_v4().to_string();
    tracing::info!(conn = %connection_id, "client connected");

    let (mut ws_tx, mut ws_rx) = socket.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();

    let mut rx = state.dispatcher.relay().subscribe();
    let mut ping_interval = tokio::time::interval(tokio::time::Duration::from_secs(30));
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let writer_conn_id = connection_id.clone();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                reply = out_rx.recv() => {
                    let Some(json) = reply else { break };
                    if ws_tx.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                recv = rx.recv() => {
                    let event = match recv {
                        Ok(e) => e,
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(conn = %writer_conn_id, skipped, "slow consumer, dropped events");
                            continue;
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    };
                    let json = match &event {
                        BroadcastEvent::Message(m) => {
                            Some(envelope(ws_types::MESSAGE, serde_json::to_value(m).unwrap()))
                        }
                        BroadcastEvent::Typing { from, payload } if *from != writer_conn_id => {
                            Some(envelope(ws_types::TYPING, serde_json::to_value(payload).unwrap()))
                        }
                        // Own typing echo
                        BroadcastEvent::Typing { .. } => None,
                    };
                    if let Some(j) = json {
                        if ws_tx.send(Message::Text(j.into())).await.is_err() {
                            break;
                        }
                    }
                }
                _ = ping_interval.tick() => {
                    if ws_tx.send(Message::Ping(axum::body::Bytes::new())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    while let Some(msg) = ws_rx.next().await {
        let text = match msg {
            Ok(Message::Text(t)) => t,
            Ok(Message::Close(_)) => break,
            Err(_) => break,
            _ => continue,
        };

        let inbound: WsEnvelope = match serde_json::from_str(&text) {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!(conn = %connection_id, err = %e, "ignoring malformed frame");
                continue;
            }
        };

        match inbound.r#type.as_str() {
            ws_types::CREATE_MESSAGE => {
                if let Ok(payload) =
                    serde_json::from_value::<CreateMessagePayload>(inbound.payload)
                {
                    state.dispatcher.create_message(payload);
                }
            }
            ws_types::FIND_ALL_MESSAGES => {
                let all = state.dispatcher.list_messages();
                let _ = out_tx.send(envelope(
                    ws_types::MESSAGES,
                    serde_json::to_value(&all).unwrap(),
                ));
            }
            ws_types::JOIN => {
                if let Ok(payload) = serde_json::from_value::<JoinPayload>(inbound.payload) {
                    let result = state.dispatcher.join_room(&payload.name, &connection_id);
                    let _ = out_tx.send(envelope(
                        ws_types::JOINED,
                        serde_json::to_value(&result).unwrap(),
                    ));
                }
            }
            ws_types::TYPING => {
                if let Ok(payload) = serde_json::from_value::<TypingPayload>(inbound.payload) {
                    state.dispatcher.typing(payload.is_typing, &connection_id);
                }
            }
            other => {
                tracing::debug!(conn = %connection_id, r#type = other, "ignoring unknown event");
            }
        }
    }

    // out_tx drops here, which stops the writer task.
    state.dispatcher.disconnect(&connection_id);
    tracing::info!(conn = %connection_id, "client disconnected");
}
