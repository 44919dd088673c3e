//! WebSocket message protocol
//!
//! Clients are authoritative over game logic; the server relays full-state
//! snapshots between the two players of a room without re-validating moves.
//! Every message is a JSON object tagged by `type`.

use hive_core::{Color, GameStateSnapshot};
use serde::{Deserialize, Serialize};

/// Messages a client may send
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    CreateRoom,
    #[serde(rename_all = "camelCase")]
    JoinRoom { room_id: String },
    /// A confirmed move: the sender's full post-move state
    #[serde(rename_all = "camelCase")]
    Move {
        room_id: String,
        #[serde(flatten)]
        state: GameStateSnapshot,
    },
    #[serde(rename_all = "camelCase")]
    RequestUpdate { room_id: String },
    #[serde(rename_all = "camelCase")]
    RestartGame { room_id: String },
}

/// Messages the server sends back
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Greeting on socket open
    #[serde(rename_all = "camelCase")]
    Connected { player_id: u64 },
    #[serde(rename_all = "camelCase")]
    RoomCreated { room_id: String, player_color: Color },
    #[serde(rename_all = "camelCase")]
    RoomJoined { room_id: String, player_color: Color },
    /// Current roster, broadcast whenever it changes
    #[serde(rename_all = "camelCase")]
    RoomState {
        room_id: String,
        players: Vec<Color>,
        can_start: bool,
    },
    /// Authoritative state pushed to the other player (or on request)
    #[serde(rename_all = "camelCase")]
    GameStateUpdate {
        #[serde(flatten)]
        state: GameStateSnapshot,
    },
    /// Both players receive a fresh game
    #[serde(rename_all = "camelCase")]
    GameRestarted {
        #[serde(flatten)]
        state: GameStateSnapshot,
    },
    #[serde(rename_all = "camelCase")]
    Error { message: String },
}
