//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    domain::{ClientCommand, ConnectionId, RelayEvent, ValueObjectError},
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
};

/// Reasons an inbound frame is rejected before reaching the use cases.
#[derive(Debug, Error)]
enum FrameError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    Invalid(#[from] ValueObjectError),

    #[error("binary frames are not supported")]
    Binary,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains the connection's outbound queue into the WebSocket.
///
/// This is the only place that awaits on the socket for writes, so a slow
/// client only ever backs up its own queue.
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::channel(state.outbound_buffer);

    let connection_id = match state.connect_usecase.execute(tx).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to register connection: {}", e);
            return;
        }
    };
    tracing::info!("Connection '{}' established", connection_id);

    // Spawn a task to push queued events to this client
    let mut send_task = pusher_loop(rx, sender);

    // Spawn a task to receive frames from this client
    let recv_state = state.clone();
    let recv_connection_id = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", recv_connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", recv_connection_id, text.as_str());
                    let result = parse_command(text.as_str());
                    dispatch(&recv_state, &recv_connection_id, result).await;
                }
                Message::Binary(_) => {
                    dispatch(&recv_state, &recv_connection_id, Err(FrameError::Binary)).await;
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", recv_connection_id);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                Message::Ping(_) | Message::Pong(_) => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Runs for clean closes, protocol errors and dropped sockets alike
    state.disconnect_usecase.execute(&connection_id).await;
}

fn parse_command(text: &str) -> Result<ClientCommand, FrameError> {
    let event: ClientEvent = serde_json::from_str(text)?;
    Ok(ClientCommand::try_from(event)?)
}

async fn dispatch(
    state: &AppState,
    connection_id: &ConnectionId,
    command: Result<ClientCommand, FrameError>,
) {
    let command = match command {
        Ok(command) => command,
        Err(e) => {
            tracing::warn!("Rejected frame from '{}': {}", connection_id, e);
            let rejection = RelayEvent::Rejected {
                reason: e.to_string(),
            };
            if let Err(e) = state.message_pusher.push_to(connection_id, &rejection).await {
                tracing::debug!("Could not report rejection to '{}': {}", connection_id, e);
            }
            return;
        }
    };

    match command {
        ClientCommand::JoinRoom { room_id } => {
            state
                .join_room_usecase
                .execute(connection_id, room_id)
                .await;
        }
        ClientCommand::LeaveRoom { room_id } => {
            state
                .leave_room_usecase
                .execute(connection_id, &room_id)
                .await;
        }
        ClientCommand::SendMessage {
            room_id,
            username,
            body,
        } => {
            state
                .broadcast_message_usecase
                .execute(room_id, connection_id, username, body)
                .await;
        }
        ClientCommand::Typing {
            room_id,
            username,
            is_typing,
        } => {
            state
                .broadcast_typing_usecase
                .execute(room_id, connection_id, username, is_typing)
                .await;
        }
    }
}
