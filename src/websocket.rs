use axum::{
    extract::{ws::Message, State, WebSocketUpgrade},
    response::Response,
};
use axum::extract::ws::WebSocket;
use serde_json::json;
use tracing::{info, error};
use futures_util::{SinkExt, StreamExt};

use crate::handlers;
use crate::language::Language;
use crate::session::{SessionState, MAX_INPUT_CHARS};
use crate::state::AppState;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let client_uid = state.generate_client_uid();
    info!("New WebSocket connection: {}", client_uid);

    state
        .sessions
        .insert(client_uid.clone(), SessionState::new());

    let (mut sink, mut receiver) = socket.split();

    // Outbound messages funnel through one channel so the translation task
    // can push state updates without owning the socket.
    let (sender, mut outbound) = tokio::sync::mpsc::unbounded_channel::<String>();
    let writer = tokio::spawn(async move {
        while let Some(text) = outbound.recv().await {
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    let initial_message = json!({
        "type": "session-ready",
        "client_uid": client_uid,
        "languages": Language::catalog(),
        "max_input_chars": MAX_INPUT_CHARS,
        "state": handlers::state_snapshot(&state, &client_uid),
    });
    if sender.send(initial_message.to_string()).is_err() {
        error!("Failed to send initial message to {}", client_uid);
    }

    // Handle incoming messages
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if let Err(e) =
                    handlers::handle_message(&state, &client_uid, &text, &sender).await
                {
                    error!("Error handling message: {}", e);
                }
            }
            Ok(Message::Close(_)) => {
                info!("Client {} disconnected", client_uid);
                break;
            }
            Err(e) => {
                error!("WebSocket error: {}", e);
                break;
            }
            _ => {}
        }
    }

    // Cleanup
    state.sessions.remove(&client_uid);
    if let Some((_, handle)) = state.translation_tasks.remove(&client_uid) {
        handle.abort();
    }
    writer.abort();

    info!("Cleaned up client {}", client_uid);
}
