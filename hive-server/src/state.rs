//! Server state management
//!
//! Rooms map a short code to at most two connected players and the last
//! snapshot seen. The server never interprets game state; it stores and
//! relays whatever the clients confirm.

use crate::protocol::ServerMessage;
use hive_core::{Color, Game, GameStateSnapshot};
use rand::Rng;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use tokio::sync::mpsc::UnboundedSender;

const ROOM_CODE_LEN: usize = 6;
const ROOM_CODE_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// One connected player in a room
pub struct PlayerHandle {
    pub conn_id: u64,
    pub color: Color,
    pub sender: UnboundedSender<ServerMessage>,
}

/// A two-player room and the last authoritative snapshot
#[derive(Default)]
pub struct Room {
    pub players: Vec<PlayerHandle>,
    pub state: Option<GameStateSnapshot>,
}

impl Room {
    fn color_for_next_player(&self) -> Option<Color> {
        match self.players.len() {
            0 => Some(Color::White),
            1 => Some(self.players[0].color.opponent()),
            _ => None,
        }
    }
}

/// What a join attempt produced
pub enum JoinOutcome {
    Joined {
        color: Color,
        state: Option<GameStateSnapshot>,
    },
    RoomFull,
    NoSuchRoom,
}

/// Server-wide shared state
pub struct ServerState {
    rooms: RwLock<FxHashMap<String, Room>>,
    next_conn_id: AtomicU64,
}

impl ServerState {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(FxHashMap::default()),
            next_conn_id: AtomicU64::new(1),
        }
    }

    pub fn allocate_conn_id(&self) -> u64 {
        self.next_conn_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Create a room with a fresh code; the creator plays white
    pub fn create_room(&self, conn_id: u64, sender: UnboundedSender<ServerMessage>) -> String {
        let mut rooms = self.rooms.write().unwrap();
        let room_id = loop {
            let candidate = random_room_code();
            if !rooms.contains_key(&candidate) {
                break candidate;
            }
        };
        let mut room = Room::default();
        room.players.push(PlayerHandle {
            conn_id,
            color: Color::White,
            sender,
        });
        rooms.insert(room_id.clone(), room);
        tracing::info!(room_id = %room_id, conn_id, "room created");
        room_id
    }

    /// Join an existing room; the second player takes the remaining color
    pub fn join_room(
        &self,
        room_id: &str,
        conn_id: u64,
        sender: UnboundedSender<ServerMessage>,
    ) -> JoinOutcome {
        let mut rooms = self.rooms.write().unwrap();
        let Some(room) = rooms.get_mut(room_id) else {
            return JoinOutcome::NoSuchRoom;
        };
        let Some(color) = room.color_for_next_player() else {
            return JoinOutcome::RoomFull;
        };
        room.players.push(PlayerHandle {
            conn_id,
            color,
            sender,
        });
        tracing::info!(room_id, conn_id, color = color.name(), "player joined");
        JoinOutcome::Joined {
            color,
            state: room.state.clone(),
        }
    }

    /// Tell everyone in the room who is present
    pub fn broadcast_roster(&self, room_id: &str) {
        let rooms = self.rooms.read().unwrap();
        let Some(room) = rooms.get(room_id) else {
            return;
        };
        let players: Vec<Color> = room.players.iter().map(|player| player.color).collect();
        let can_start = players.len() == 2;
        for player in &room.players {
            let _ = player.sender.send(ServerMessage::RoomState {
                room_id: room_id.to_string(),
                players: players.clone(),
                can_start,
            });
        }
    }

    /// Store the snapshot and relay it to everyone else in the room.
    /// False if the room does not exist.
    pub fn apply_move(&self, room_id: &str, from_conn: u64, state: GameStateSnapshot) -> bool {
        let mut rooms = self.rooms.write().unwrap();
        let Some(room) = rooms.get_mut(room_id) else {
            return false;
        };
        room.state = Some(state.clone());
        for player in &room.players {
            if player.conn_id != from_conn {
                let _ = player.sender.send(ServerMessage::GameStateUpdate {
                    state: state.clone(),
                });
            }
        }
        true
    }

    /// The stored snapshot, if any move has been relayed yet
    pub fn current_state(&self, room_id: &str) -> Option<GameStateSnapshot> {
        let rooms = self.rooms.read().unwrap();
        rooms.get(room_id).and_then(|room| room.state.clone())
    }

    /// Reset the room to a fresh game and tell both players
    pub fn restart_game(&self, room_id: &str) -> bool {
        let mut rooms = self.rooms.write().unwrap();
        let Some(room) = rooms.get_mut(room_id) else {
            return false;
        };
        let fresh = Game::new().snapshot();
        room.state = Some(fresh.clone());
        for player in &room.players {
            let _ = player
                .sender
                .send(ServerMessage::GameRestarted { state: fresh.clone() });
        }
        tracing::info!(room_id, "game restarted");
        true
    }

    /// Drop a disconnected player; empty rooms are removed
    pub fn remove_connection(&self, conn_id: u64) {
        let mut rooms = self.rooms.write().unwrap();
        rooms.retain(|room_id, room| {
            let before = room.players.len();
            room.players.retain(|player| player.conn_id != conn_id);
            if room.players.len() != before {
                tracing::info!(room_id = %room_id, conn_id, "player disconnected");
            }
            !room.players.is_empty()
        });
    }

    #[cfg(test)]
    pub fn room_count(&self) -> usize {
        self.rooms.read().unwrap().len()
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

fn random_room_code() -> String {
    let mut rng = rand::thread_rng();
    (0..ROOM_CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..ROOM_CODE_CHARSET.len());
            ROOM_CODE_CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn test_create_then_join_assigns_colors() {
        let state = ServerState::new();
        let (tx_a, _rx_a) = unbounded_channel();
        let (tx_b, _rx_b) = unbounded_channel();

        let a = state.allocate_conn_id();
        let b = state.allocate_conn_id();
        let room_id = state.create_room(a, tx_a);
        assert_eq!(room_id.len(), ROOM_CODE_LEN);

        match state.join_room(&room_id, b, tx_b) {
            JoinOutcome::Joined { color, state } => {
                assert_eq!(color, Color::Black);
                assert!(state.is_none());
            }
            _ => panic!("join should succeed"),
        }
    }

    #[test]
    fn test_third_player_is_rejected() {
        let state = ServerState::new();
        let (tx, _rx) = unbounded_channel();
        let room_id = state.create_room(1, tx);

        let (tx_b, _rx_b) = unbounded_channel();
        let (tx_c, _rx_c) = unbounded_channel();
        assert!(matches!(
            state.join_room(&room_id, 2, tx_b),
            JoinOutcome::Joined { .. }
        ));
        assert!(matches!(
            state.join_room(&room_id, 3, tx_c),
            JoinOutcome::RoomFull
        ));
    }

    #[test]
    fn test_join_unknown_room() {
        let state = ServerState::new();
        let (tx, _rx) = unbounded_channel();
        assert!(matches!(
            state.join_room("NOSUCH", 1, tx),
            JoinOutcome::NoSuchRoom
        ));
    }

    #[test]
    fn test_move_relays_to_other_player_only() {
        let state = ServerState::new();
        let (tx_a, mut rx_a) = unbounded_channel();
        let (tx_b, mut rx_b) = unbounded_channel();
        let room_id = state.create_room(1, tx_a);
        state.join_room(&room_id, 2, tx_b);

        let snapshot = Game::new().snapshot();
        assert!(state.apply_move(&room_id, 1, snapshot.clone()));

        assert!(rx_a.try_recv().is_err());
        match rx_b.try_recv().unwrap() {
            ServerMessage::GameStateUpdate { state } => assert_eq!(state, snapshot),
            other => panic!("unexpected message: {other:?}"),
        }
        assert_eq!(state.current_state(&room_id), Some(snapshot));
    }

    #[test]
    fn test_restart_notifies_both_players() {
        let state = ServerState::new();
        let (tx_a, mut rx_a) = unbounded_channel();
        let (tx_b, mut rx_b) = unbounded_channel();
        let room_id = state.create_room(1, tx_a);
        state.join_room(&room_id, 2, tx_b);

        assert!(state.restart_game(&room_id));
        assert!(matches!(
            rx_a.try_recv().unwrap(),
            ServerMessage::GameRestarted { .. }
        ));
        assert!(matches!(
            rx_b.try_recv().unwrap(),
            ServerMessage::GameRestarted { .. }
        ));
    }

    #[test]
    fn test_disconnect_removes_empty_room() {
        let state = ServerState::new();
        let (tx, _rx) = unbounded_channel();
        let room_id = state.create_room(7, tx);
        assert_eq!(state.room_count(), 1);

        state.remove_connection(7);
        assert_eq!(state.room_count(), 0);
        assert!(state.current_state(&room_id).is_none());
    }
}
