//! Chat relay — WebSocket broadcast backend.
//!
//! Optional env: HOST, PORT, BROADCAST_CAPACITY

use std::sync::Arc;

use relay::{api, config, dispatch, relay as fanout};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Arc::new(config::Config::from_env());

    let relay_state = fanout::RelayState::new(config.broadcast_capacity);
    let dispatcher = Arc::new(dispatch::Dispatcher::new(relay_state));

    let addr: std::net::SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid bind address: {}", e))?;

    let state = api::AppState { dispatcher, config };
    let app = api::router(state);

    tracing::info!("Chat relay listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
