//! Sync adapter boundary: full-state snapshots exchanged with the transport
//!
//! The engine sends the entire post-move state after every confirm and
//! replaces its own state wholesale when an authoritative snapshot arrives
//! (last snapshot wins). Coordinates travel as "q,r" keys on the wire;
//! internally everything is a structured [`Hex`](crate::board::Hex).

use crate::game::MoveRecord;
use crate::pieces::{Color, Piece, PieceKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-piece view of one occupied cell
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    #[serde(rename = "type")]
    pub kind: PieceKind,
    pub color: Color,
    pub height: usize,
}

/// The full logical game state. `board_pieces` is the top-piece view the
/// display layer reads; `stacked_pieces` carries whole stacks so a receiver
/// can reconstruct buried pieces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateSnapshot {
    pub current_player: Color,
    pub board_pieces: BTreeMap<String, CellView>,
    pub stacked_pieces: BTreeMap<String, Vec<Piece>>,
    pub move_history: Vec<MoveRecord>,
    pub game_won: bool,
    pub game_winner: Option<Color>,
}

impl GameStateSnapshot {
    /// Snapshot of a game that has not started
    pub fn empty() -> Self {
        Self {
            current_player: Color::White,
            board_pieces: BTreeMap::new(),
            stacked_pieces: BTreeMap::new(),
            move_history: Vec::new(),
            game_won: false,
            game_winner: None,
        }
    }
}
