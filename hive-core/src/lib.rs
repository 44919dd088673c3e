//! hive-core: rule engine for the board game Hive
//!
//! Pure game logic with no I/O: hex topology, the sparse stacked board,
//! placement and movement validation (one-hive, freedom of movement,
//! per-bug move shapes), the turn state machine with staged confirm/undo,
//! and the full-state snapshot format used to sync games over a transport.

pub mod board;
pub mod game;
pub mod pieces;
pub mod rules;
pub mod state;
pub mod sync;

pub use board::{Hex, DIRECTIONS, ORIGIN};
pub use game::{check_win, Game, GameStatus, MoveRecord, RecordPiece, RuleViolation};
pub use pieces::{Color, Inventory, Piece, PieceKind};
pub use state::BoardState;
pub use sync::{CellView, GameStateSnapshot};
