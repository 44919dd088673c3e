//! WebSocket endpoint: one socket per player
//!
//! Outbound traffic goes through an unbounded channel so room broadcasts
//! (which happen under the rooms lock) never block on a slow socket. A
//! dedicated writer task drains the channel onto the wire.

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::{JoinOutcome, ServerState};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<ServerState>) {
    let conn_id = state.allocate_conn_id();
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ServerMessage>();

    let writer = tokio::spawn(async move {
        while let Some(message) = out_rx.recv().await {
            let Ok(text) = serde_json::to_string(&message) else {
                continue;
            };
            if ws_tx.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    tracing::debug!(conn_id, "socket connected");
    let _ = out_tx.send(ServerMessage::Connected { player_id: conn_id });

    while let Some(Ok(message)) = ws_rx.next().await {
        let Message::Text(text) = message else {
            if matches!(message, Message::Close(_)) {
                break;
            }
            continue;
        };
        match serde_json::from_str::<ClientMessage>(&text) {
            Ok(client_message) => {
                handle_client_message(&state, conn_id, &out_tx, client_message)
            }
            Err(err) => {
                tracing::debug!(conn_id, %err, "unparseable message");
                let _ = out_tx.send(ServerMessage::Error {
                    message: "unrecognized message".to_string(),
                });
            }
        }
    }

    state.remove_connection(conn_id);
    writer.abort();
    tracing::debug!(conn_id, "socket closed");
}

fn handle_client_message(
    state: &ServerState,
    conn_id: u64,
    out_tx: &mpsc::UnboundedSender<ServerMessage>,
    message: ClientMessage,
) {
    match message {
        ClientMessage::CreateRoom => {
            let room_id = state.create_room(conn_id, out_tx.clone());
            let _ = out_tx.send(ServerMessage::RoomCreated {
                room_id: room_id.clone(),
                player_color: hive_core::Color::White,
            });
            state.broadcast_roster(&room_id);
        }
        ClientMessage::JoinRoom { room_id } => match state.join_room(&room_id, conn_id, out_tx.clone()) {
            JoinOutcome::Joined { color, state: room_state } => {
                let _ = out_tx.send(ServerMessage::RoomJoined {
                    room_id: room_id.clone(),
                    player_color: color,
                });
                // catch the joiner up on any game already in progress
                if let Some(snapshot) = room_state {
                    let _ = out_tx.send(ServerMessage::GameStateUpdate { state: snapshot });
                }
                state.broadcast_roster(&room_id);
            }
            JoinOutcome::RoomFull => {
                let _ = out_tx.send(ServerMessage::Error {
                    message: "room is full".to_string(),
                });
            }
            JoinOutcome::NoSuchRoom => {
                let _ = out_tx.send(ServerMessage::Error {
                    message: "room not found".to_string(),
                });
            }
        },
        ClientMessage::Move { room_id, state: snapshot } => {
            if !state.apply_move(&room_id, conn_id, snapshot) {
                let _ = out_tx.send(ServerMessage::Error {
                    message: "room not found".to_string(),
                });
            }
        }
        ClientMessage::RequestUpdate { room_id } => {
            if let Some(snapshot) = state.current_state(&room_id) {
                let _ = out_tx.send(ServerMessage::GameStateUpdate { state: snapshot });
            }
        }
        ClientMessage::RestartGame { room_id } => {
            if !state.restart_game(&room_id) {
                let _ = out_tx.send(ServerMessage::Error {
                    message: "room not found".to_string(),
                });
            }
        }
    }
}
