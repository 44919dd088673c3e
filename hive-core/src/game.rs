//! Game state, the staged move/turn state machine, and win detection
//!
//! All mutation funnels through [`Game`]: a selection stages a candidate
//! move, targeting commits it to the board and history, and the player then
//! either confirms (win check, turn passes, snapshot emitted) or undoes
//! (exact prior state restored). Illegal input is declined with a
//! [`RuleViolation`] and never mutates anything.

use crate::board::{Hex, ORIGIN};
use crate::pieces::{Color, Inventory, Piece, PieceKind};
use crate::rules;
use crate::state::BoardState;
use crate::sync::{CellView, GameStateSnapshot};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// HISTORY
// ============================================================================

/// What a history entry recorded: the kind of a placed piece, or a movement
/// of a piece already on the board. Serialized as the lowercase piece name
/// or the literal "movement".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordPiece {
    Queen,
    Beetle,
    Grasshopper,
    Spider,
    Ant,
    Movement,
}

impl RecordPiece {
    /// The placed kind, or None for a movement record
    pub fn placed_kind(self) -> Option<PieceKind> {
        match self {
            RecordPiece::Queen => Some(PieceKind::Queen),
            RecordPiece::Beetle => Some(PieceKind::Beetle),
            RecordPiece::Grasshopper => Some(PieceKind::Grasshopper),
            RecordPiece::Spider => Some(PieceKind::Spider),
            RecordPiece::Ant => Some(PieceKind::Ant),
            RecordPiece::Movement => None,
        }
    }
}

impl From<PieceKind> for RecordPiece {
    fn from(kind: PieceKind) -> Self {
        match kind {
            PieceKind::Queen => RecordPiece::Queen,
            PieceKind::Beetle => RecordPiece::Beetle,
            PieceKind::Grasshopper => RecordPiece::Grasshopper,
            PieceKind::Spider => RecordPiece::Spider,
            PieceKind::Ant => RecordPiece::Ant,
        }
    }
}

/// One committed move; the history is append-only (truncated by one on undo)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    pub player: Color,
    pub piece: RecordPiece,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Hex>,
    pub to: Hex,
    pub seq: usize,
}

// ============================================================================
// STATUS AND ERRORS
// ============================================================================

/// Whose turn it is and whether the game is decided
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatus {
    pub current_player: Color,
    pub game_won: bool,
    pub game_winner: Option<Color>,
}

impl GameStatus {
    fn initial() -> Self {
        Self {
            current_player: Color::White,
            game_won: false,
            game_winner: None,
        }
    }
}

/// Why the engine declined a selection or target. Advisory only: the game
/// state is exactly what it was before the call, except where noted on
/// [`Game::target`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("the game is already over")]
    GameOver,
    #[error("confirm or undo the staged move first")]
    MovePending,
    #[error("another selection is in progress")]
    SelectionPending,
    #[error("no selection is active")]
    NothingSelected,
    #[error("no move is staged")]
    NothingStaged,
    #[error("no {} left to place", .0.name())]
    OutOfPieces(PieceKind),
    #[error("the queen must be placed by the fourth piece")]
    QueenRequired,
    #[error("pieces cannot move until the queen is placed")]
    QueenNotPlaced,
    #[error("no piece of the current player at that cell")]
    NotYourPiece,
    #[error("that piece has no legal moves")]
    NoLegalMoves,
    #[error("not a legal target; selection cancelled")]
    IllegalTarget,
}

// ============================================================================
// PENDING MOVE STATE MACHINE
// ============================================================================

/// The staging overlay: at most one live pending move at any time
#[derive(Clone, Debug, PartialEq)]
enum Pending {
    Idle,
    Placement { kind: PieceKind, targets: Vec<Hex> },
    Movement { from: Hex, kind: PieceKind, targets: Vec<Hex> },
    Staged(Staged),
}

/// A committed-but-unconfirmed move, carrying everything undo needs to
/// restore the exact prior state (stack order matters for beetle climbs).
#[derive(Clone, Debug, PartialEq)]
enum Staged {
    Placement {
        at: Hex,
        kind: PieceKind,
    },
    Movement {
        from: Hex,
        to: Hex,
        prior_from: Vec<Piece>,
        prior_to: Vec<Piece>,
    },
}

// ============================================================================
// GAME
// ============================================================================

/// The full game aggregate: board, history, inventories, status, and the
/// single pending-move slot.
#[derive(Clone, Debug, PartialEq)]
pub struct Game {
    board: BoardState,
    history: Vec<MoveRecord>,
    white_inventory: Inventory,
    black_inventory: Inventory,
    status: GameStatus,
    pending: Pending,
}

impl Game {
    pub fn new() -> Self {
        Self {
            board: BoardState::new(),
            history: Vec::new(),
            white_inventory: Inventory::full(),
            black_inventory: Inventory::full(),
            status: GameStatus::initial(),
            pending: Pending::Idle,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn current_player(&self) -> Color {
        self.status.current_player
    }

    pub fn inventory(&self, color: Color) -> &Inventory {
        match color {
            Color::White => &self.white_inventory,
            Color::Black => &self.black_inventory,
        }
    }

    fn inventory_mut(&mut self, color: Color) -> &mut Inventory {
        match color {
            Color::White => &mut self.white_inventory,
            Color::Black => &mut self.black_inventory,
        }
    }

    /// Highlighted legal targets for the live selection; empty when idle or
    /// when a staged move awaits confirm/undo.
    pub fn legal_targets(&self) -> &[Hex] {
        match &self.pending {
            Pending::Placement { targets, .. } | Pending::Movement { targets, .. } => targets,
            Pending::Idle | Pending::Staged(_) => &[],
        }
    }

    /// True once a move is committed and waiting on confirm or undo
    pub fn awaiting_confirm(&self) -> bool {
        matches!(self.pending, Pending::Staged(_))
    }

    // ========================================================================
    // SELECTION
    // ========================================================================

    /// Select an unplaced piece for placement. Supersedes a previous
    /// placement selection; returns the legal placement cells.
    pub fn select_inventory_piece(
        &mut self,
        kind: PieceKind,
    ) -> Result<&[Hex], RuleViolation> {
        self.guard_active()?;
        match self.pending {
            Pending::Idle | Pending::Placement { .. } => {}
            Pending::Movement { .. } => return Err(RuleViolation::SelectionPending),
            Pending::Staged(_) => return Err(RuleViolation::MovePending),
        }

        let player = self.status.current_player;
        if self.inventory(player).remaining(kind) == 0 {
            return Err(RuleViolation::OutOfPieces(kind));
        }
        if kind != PieceKind::Queen && rules::must_place_queen(&self.history, player) {
            return Err(RuleViolation::QueenRequired);
        }

        let targets = if self.board.is_empty() {
            vec![ORIGIN]
        } else {
            rules::candidate_placements(&self.board)
                .into_iter()
                .filter(|&hex| rules::can_place(&self.board, &self.history, hex, player))
                .collect()
        };

        self.pending = Pending::Placement { kind, targets };
        Ok(self.legal_targets())
    }

    /// Select a board piece of the current player for movement. Supersedes a
    /// previous movement selection; returns the legal destinations. A piece
    /// with no legal destination cancels straight back to idle.
    pub fn select_board_piece(&mut self, at: Hex) -> Result<&[Hex], RuleViolation> {
        self.guard_active()?;
        match self.pending {
            Pending::Idle | Pending::Movement { .. } => {}
            Pending::Placement { .. } => return Err(RuleViolation::SelectionPending),
            Pending::Staged(_) => return Err(RuleViolation::MovePending),
        }

        let player = self.status.current_player;
        let piece = self
            .board
            .top_piece(at)
            .filter(|piece| piece.color == player)
            .ok_or(RuleViolation::NotYourPiece)?;
        if !rules::queen_placed(&self.history, player) {
            return Err(RuleViolation::QueenNotPlaced);
        }

        let targets: Vec<Hex> = rules::candidate_destinations(&self.board)
            .into_iter()
            .filter(|&to| rules::can_move(&self.board, at, to, piece.kind))
            .collect();
        if targets.is_empty() {
            self.pending = Pending::Idle;
            return Err(RuleViolation::NoLegalMoves);
        }

        self.pending = Pending::Movement {
            from: at,
            kind: piece.kind,
            targets,
        };
        Ok(self.legal_targets())
    }

    // ========================================================================
    // TARGET / CONFIRM / UNDO
    // ========================================================================

    /// Target a cell for the live selection. A legal target commits the move
    /// to the board and history and stages it for confirm/undo. An illegal
    /// target cancels the selection without touching the board.
    pub fn target(&mut self, at: Hex) -> Result<(), RuleViolation> {
        self.guard_active()?;
        match std::mem::replace(&mut self.pending, Pending::Idle) {
            Pending::Idle => Err(RuleViolation::NothingSelected),
            Pending::Staged(staged) => {
                self.pending = Pending::Staged(staged);
                Err(RuleViolation::MovePending)
            }
            Pending::Placement { kind, targets } => {
                if !targets.contains(&at) {
                    return Err(RuleViolation::IllegalTarget);
                }
                self.commit_placement(kind, at);
                Ok(())
            }
            Pending::Movement { from, targets, .. } => {
                if !targets.contains(&at) {
                    return Err(RuleViolation::IllegalTarget);
                }
                self.commit_movement(from, at);
                Ok(())
            }
        }
    }

    fn commit_placement(&mut self, kind: PieceKind, at: Hex) {
        let player = self.status.current_player;
        self.board.push(at, Piece::new(kind, player));
        self.inventory_mut(player).take(kind);
        self.append_record(player, kind.into(), None, at);
        self.pending = Pending::Staged(Staged::Placement { at, kind });
    }

    fn commit_movement(&mut self, from: Hex, to: Hex) {
        let player = self.status.current_player;
        let prior_from = self.board.stack(from).to_vec();
        let prior_to = self.board.stack(to).to_vec();
        if let Some(piece) = self.board.pop(from) {
            self.board.push(to, piece);
        }
        self.append_record(player, RecordPiece::Movement, Some(from), to);
        self.pending = Pending::Staged(Staged::Movement {
            from,
            to,
            prior_from,
            prior_to,
        });
    }

    fn append_record(&mut self, player: Color, piece: RecordPiece, from: Option<Hex>, to: Hex) {
        let seq = self.history.len();
        self.history.push(MoveRecord {
            player,
            piece,
            from,
            to,
            seq,
        });
    }

    /// Confirm the staged move: run win detection, pass the turn, and emit
    /// the snapshot to hand to the transport.
    pub fn confirm(&mut self) -> Result<GameStateSnapshot, RuleViolation> {
        if !matches!(self.pending, Pending::Staged(_)) {
            return Err(RuleViolation::NothingStaged);
        }

        if let Some(winner) = check_win(&self.board) {
            self.status.game_won = true;
            self.status.game_winner = Some(winner);
        }
        self.status.current_player = self.status.current_player.opponent();
        self.pending = Pending::Idle;
        Ok(self.snapshot())
    }

    /// Undo the staged move: exact prior stacks, inventory, and history
    /// length are restored and the turn does not pass.
    pub fn undo(&mut self) -> Result<(), RuleViolation> {
        let staged = match std::mem::replace(&mut self.pending, Pending::Idle) {
            Pending::Staged(staged) => staged,
            other => {
                self.pending = other;
                return Err(RuleViolation::NothingStaged);
            }
        };

        match staged {
            Staged::Placement { at, kind } => {
                self.board.pop(at);
                let player = self.status.current_player;
                self.inventory_mut(player).put_back(kind);
            }
            Staged::Movement {
                from,
                to,
                prior_from,
                prior_to,
            } => {
                self.board.set_stack(from, prior_from);
                self.board.set_stack(to, prior_to);
            }
        }
        self.history.pop();
        Ok(())
    }

    /// Reset to a fresh game
    pub fn restart(&mut self) {
        *self = Game::new();
    }

    fn guard_active(&self) -> Result<(), RuleViolation> {
        if self.status.game_won {
            Err(RuleViolation::GameOver)
        } else {
            Ok(())
        }
    }

    // ========================================================================
    // SYNC BOUNDARY
    // ========================================================================

    /// Full logical snapshot for the transport
    pub fn snapshot(&self) -> GameStateSnapshot {
        let mut board_pieces = std::collections::BTreeMap::new();
        let mut stacked_pieces = std::collections::BTreeMap::new();
        for hex in self.board.occupied() {
            let Some(top) = self.board.top_piece(hex) else {
                continue;
            };
            board_pieces.insert(
                hex.key(),
                CellView {
                    kind: top.kind,
                    color: top.color,
                    height: self.board.height(hex),
                },
            );
            stacked_pieces.insert(hex.key(), self.board.stack(hex).to_vec());
        }
        GameStateSnapshot {
            current_player: self.status.current_player,
            board_pieces,
            stacked_pieces,
            move_history: self.history.clone(),
            game_won: self.status.game_won,
            game_winner: self.status.game_winner,
        }
    }

    /// Apply an authoritative snapshot wholesale: board, history, and status
    /// are replaced, any pending move is discarded, and inventories are
    /// recomputed from the placement records.
    pub fn apply_snapshot(&mut self, snapshot: GameStateSnapshot) {
        self.board.clear();
        for (key, stack) in snapshot.stacked_pieces {
            if let Some(hex) = Hex::parse_key(&key) {
                self.board.set_stack(hex, stack);
            }
        }
        self.history = snapshot.move_history;
        self.status = GameStatus {
            current_player: snapshot.current_player,
            game_won: snapshot.game_won,
            game_winner: snapshot.game_winner,
        };
        self.pending = Pending::Idle;

        let mut white = Inventory::full();
        let mut black = Inventory::full();
        for record in &self.history {
            if let Some(kind) = record.piece.placed_kind() {
                match record.player {
                    Color::White => white.take(kind),
                    Color::Black => black.take(kind),
                };
            }
        }
        self.white_inventory = white;
        self.black_inventory = black;
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// WIN DETECTION
// ============================================================================

/// Scan for a fully surrounded queen on top of a stack; the surrounded
/// queen's opponent wins. First surround found decides.
pub fn check_win(board: &BoardState) -> Option<Color> {
    for hex in board.occupied() {
        let Some(piece) = board.top_piece(hex) else {
            continue;
        };
        if piece.kind != PieceKind::Queen {
            continue;
        }
        if hex.neighbors().iter().all(|&n| board.is_occupied(n)) {
            return Some(piece.color.opponent());
        }
    }
    None
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Place a piece for the current player and confirm the turn
    fn place(game: &mut Game, kind: PieceKind, at: Hex) {
        game.select_inventory_piece(kind).unwrap();
        game.target(at).unwrap();
        game.confirm().unwrap();
    }

    /// Move a piece for the current player and confirm the turn
    fn shift(game: &mut Game, from: Hex, to: Hex) {
        game.select_board_piece(from).unwrap();
        game.target(to).unwrap();
        game.confirm().unwrap();
    }

    /// Opening with both queens down: white (0,0), black (1,0)
    fn opened_game() -> Game {
        let mut game = Game::new();
        place(&mut game, PieceKind::Queen, Hex::new(0, 0));
        place(&mut game, PieceKind::Queen, Hex::new(1, 0));
        game
    }

    #[test]
    fn test_first_placement_targets_origin() {
        let mut game = Game::new();
        let targets = game.select_inventory_piece(PieceKind::Ant).unwrap();
        assert_eq!(targets, [ORIGIN]);
    }

    #[test]
    fn test_turn_alternates_on_confirm() {
        let mut game = Game::new();
        assert_eq!(game.current_player(), Color::White);
        place(&mut game, PieceKind::Queen, Hex::new(0, 0));
        assert_eq!(game.current_player(), Color::Black);
        place(&mut game, PieceKind::Queen, Hex::new(1, 0));
        assert_eq!(game.current_player(), Color::White);
    }

    #[test]
    fn test_target_requires_selection_and_confirm_requires_stage() {
        let mut game = Game::new();
        assert_eq!(
            game.target(Hex::new(0, 0)),
            Err(RuleViolation::NothingSelected)
        );
        assert_eq!(game.confirm().unwrap_err(), RuleViolation::NothingStaged);
        assert_eq!(game.undo(), Err(RuleViolation::NothingStaged));
    }

    #[test]
    fn test_invalid_target_cancels_selection() {
        let mut game = opened_game();
        game.select_inventory_piece(PieceKind::Ant).unwrap();
        assert!(!game.legal_targets().is_empty());

        // (2,0) touches the black queen: illegal for white
        assert_eq!(
            game.target(Hex::new(2, 0)),
            Err(RuleViolation::IllegalTarget)
        );
        assert!(game.legal_targets().is_empty());
        assert_eq!(game.board().len(), 2);
    }

    #[test]
    fn test_selection_superseded_same_phase_only() {
        let mut game = opened_game();
        game.select_inventory_piece(PieceKind::Ant).unwrap();
        // same phase: re-selection allowed
        game.select_inventory_piece(PieceKind::Spider).unwrap();
        // cross-phase: rejected while a placement selection is live
        assert_eq!(
            game.select_board_piece(Hex::new(0, 0)),
            Err(RuleViolation::SelectionPending)
        );
    }

    #[test]
    fn test_staged_move_blocks_new_selection() {
        let mut game = opened_game();
        game.select_inventory_piece(PieceKind::Ant).unwrap();
        game.target(Hex::new(-1, 0)).unwrap();
        assert!(game.awaiting_confirm());

        assert_eq!(
            game.select_inventory_piece(PieceKind::Spider),
            Err(RuleViolation::MovePending)
        );
        assert_eq!(
            game.select_board_piece(Hex::new(0, 0)),
            Err(RuleViolation::MovePending)
        );
        assert_eq!(game.target(Hex::new(-1, 1)), Err(RuleViolation::MovePending));
    }

    #[test]
    fn test_queen_deadline_blocks_fourth_non_queen() {
        let mut game = Game::new();
        place(&mut game, PieceKind::Ant, Hex::new(0, 0));
        place(&mut game, PieceKind::Queen, Hex::new(1, 0));
        place(&mut game, PieceKind::Ant, Hex::new(-1, 0));
        place(&mut game, PieceKind::Beetle, Hex::new(2, 0));
        place(&mut game, PieceKind::Ant, Hex::new(-2, 0));
        place(&mut game, PieceKind::Beetle, Hex::new(3, 0));

        // white has placed three non-queen pieces
        assert_eq!(
            game.select_inventory_piece(PieceKind::Spider),
            Err(RuleViolation::QueenRequired)
        );
        // the queen itself is accepted
        assert!(game.select_inventory_piece(PieceKind::Queen).is_ok());
    }

    #[test]
    fn test_movement_gated_on_queen() {
        let mut game = Game::new();
        place(&mut game, PieceKind::Ant, Hex::new(0, 0));
        place(&mut game, PieceKind::Queen, Hex::new(1, 0));

        // white queen not placed yet
        assert_eq!(
            game.select_board_piece(Hex::new(0, 0)),
            Err(RuleViolation::QueenNotPlaced)
        );
    }

    #[test]
    fn test_cannot_select_opponent_or_empty_cell() {
        let mut game = opened_game();
        assert_eq!(
            game.select_board_piece(Hex::new(1, 0)),
            Err(RuleViolation::NotYourPiece)
        );
        assert_eq!(
            game.select_board_piece(Hex::new(5, 5)),
            Err(RuleViolation::NotYourPiece)
        );
    }

    #[test]
    fn test_out_of_pieces() {
        let mut game = opened_game();
        assert_eq!(
            game.select_inventory_piece(PieceKind::Queen),
            Err(RuleViolation::OutOfPieces(PieceKind::Queen))
        );
    }

    #[test]
    fn test_pinned_piece_cancels_to_idle() {
        let mut game = Game::new();
        place(&mut game, PieceKind::Queen, Hex::new(0, 0));
        place(&mut game, PieceKind::Queen, Hex::new(1, 0));
        place(&mut game, PieceKind::Ant, Hex::new(-1, 0));
        place(&mut game, PieceKind::Ant, Hex::new(2, 0));

        // white queen at (0,0) is a cut vertex of the chain
        assert_eq!(
            game.select_board_piece(Hex::new(0, 0)),
            Err(RuleViolation::NoLegalMoves)
        );
        assert!(game.legal_targets().is_empty());
    }

    #[test]
    fn test_undo_placement_round_trip() {
        let mut game = opened_game();
        let before = game.clone();

        game.select_inventory_piece(PieceKind::Ant).unwrap();
        game.target(Hex::new(-1, 0)).unwrap();
        assert_eq!(game.history().len(), 3);
        assert_eq!(game.inventory(Color::White).remaining(PieceKind::Ant), 2);

        game.undo().unwrap();
        assert_eq!(game, before);
    }

    #[test]
    fn test_undo_beetle_climb_restores_stack_order() {
        let mut game = opened_game();
        place(&mut game, PieceKind::Beetle, Hex::new(-1, 0));
        place(&mut game, PieceKind::Ant, Hex::new(2, 0));
        let before = game.clone();

        // white beetle climbs onto the white queen
        game.select_board_piece(Hex::new(-1, 0)).unwrap();
        game.target(Hex::new(0, 0)).unwrap();
        assert_eq!(game.board().height(Hex::new(0, 0)), 2);
        assert_eq!(
            game.board().top_piece(Hex::new(0, 0)),
            Some(Piece::new(PieceKind::Beetle, Color::White))
        );

        game.undo().unwrap();
        assert_eq!(game, before);
        assert_eq!(
            game.board().top_piece(Hex::new(0, 0)),
            Some(Piece::new(PieceKind::Queen, Color::White))
        );
    }

    #[test]
    fn test_beetle_stacks_and_uncovers() {
        let mut game = opened_game();
        place(&mut game, PieceKind::Beetle, Hex::new(-1, 0));
        place(&mut game, PieceKind::Ant, Hex::new(2, 0));

        shift(&mut game, Hex::new(-1, 0), Hex::new(0, 0));
        assert_eq!(game.board().height(Hex::new(0, 0)), 2);

        // black moves, then white lifts the beetle off again
        shift(&mut game, Hex::new(2, 0), Hex::new(2, -1));
        shift(&mut game, Hex::new(0, 0), Hex::new(-1, 0));
        assert_eq!(game.board().height(Hex::new(0, 0)), 1);
        assert_eq!(
            game.board().top_piece(Hex::new(0, 0)),
            Some(Piece::new(PieceKind::Queen, Color::White))
        );
    }

    #[test]
    fn test_inventory_tracks_history() {
        let mut game = Game::new();
        place(&mut game, PieceKind::Queen, Hex::new(0, 0));
        place(&mut game, PieceKind::Queen, Hex::new(1, 0));
        place(&mut game, PieceKind::Ant, Hex::new(-1, 0));
        place(&mut game, PieceKind::Spider, Hex::new(2, 0));

        for color in [Color::White, Color::Black] {
            for kind in PieceKind::ALL {
                let placed = game
                    .history()
                    .iter()
                    .filter(|r| r.player == color && r.piece.placed_kind() == Some(kind))
                    .count() as u8;
                assert_eq!(
                    game.inventory(color).remaining(kind),
                    kind.starting_count() - placed
                );
            }
        }
    }

    #[test]
    fn test_win_detection_surrounded_queen() {
        let mut board = BoardState::new();
        board.push(Hex::new(0, 0), Piece::new(PieceKind::Queen, Color::White));
        for neighbor in Hex::new(0, 0).neighbors() {
            board.push(neighbor, Piece::new(PieceKind::Ant, Color::Black));
        }
        assert_eq!(check_win(&board), Some(Color::Black));
    }

    #[test]
    fn test_no_win_with_open_neighbor() {
        let mut board = BoardState::new();
        board.push(Hex::new(0, 0), Piece::new(PieceKind::Queen, Color::White));
        let neighbors = Hex::new(0, 0).neighbors();
        for neighbor in &neighbors[..5] {
            board.push(*neighbor, Piece::new(PieceKind::Ant, Color::Black));
        }
        assert_eq!(check_win(&board), None);
    }

    #[test]
    fn test_buried_queen_is_not_scanned() {
        // A beetle on top hides the queen from the surround scan
        let mut board = BoardState::new();
        board.push(Hex::new(0, 0), Piece::new(PieceKind::Queen, Color::White));
        board.push(Hex::new(0, 0), Piece::new(PieceKind::Beetle, Color::Black));
        for neighbor in Hex::new(0, 0).neighbors() {
            board.push(neighbor, Piece::new(PieceKind::Ant, Color::Black));
        }
        assert_eq!(check_win(&board), None);
    }

    #[test]
    fn test_surround_wins_and_freezes_the_game() {
        // White walls in three sides of its own queen; black queens the
        // fourth and walks two ants onto the last two ring cells.
        let mut game = Game::new();
        place(&mut game, PieceKind::Queen, Hex::new(0, 0));
        place(&mut game, PieceKind::Queen, Hex::new(1, 0)); // ring
        place(&mut game, PieceKind::Ant, Hex::new(-1, 0)); // ring
        place(&mut game, PieceKind::Ant, Hex::new(2, 0));
        place(&mut game, PieceKind::Ant, Hex::new(0, -1)); // ring
        shift(&mut game, Hex::new(2, 0), Hex::new(1, -1)); // ring
        place(&mut game, PieceKind::Ant, Hex::new(-1, 1)); // ring
        place(&mut game, PieceKind::Ant, Hex::new(2, -1));
        place(&mut game, PieceKind::Spider, Hex::new(-2, 0)); // filler

        // black's ant slides around the south side onto the last ring cell
        game.select_board_piece(Hex::new(2, -1)).unwrap();
        game.target(Hex::new(0, 1)).unwrap();
        let snapshot = game.confirm().unwrap();

        assert!(snapshot.game_won);
        assert_eq!(snapshot.game_winner, Some(Color::Black));
        assert!(game.status().game_won);
        assert_eq!(game.status().game_winner, Some(Color::Black));

        // a decided game declines every further action
        assert_eq!(
            game.select_inventory_piece(PieceKind::Ant),
            Err(RuleViolation::GameOver)
        );
        assert_eq!(
            game.select_board_piece(Hex::new(1, 0)),
            Err(RuleViolation::GameOver)
        );
        assert_eq!(game.target(Hex::new(3, 3)), Err(RuleViolation::GameOver));
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut game = opened_game();
        game.restart();
        assert_eq!(game, Game::new());
        assert!(game.inventory(Color::White).is_full());
    }

    #[test]
    fn test_snapshot_apply_round_trip() {
        let mut game = opened_game();
        place(&mut game, PieceKind::Beetle, Hex::new(-1, 0));
        place(&mut game, PieceKind::Ant, Hex::new(2, 0));
        shift(&mut game, Hex::new(-1, 0), Hex::new(0, 0)); // beetle climb

        let snapshot = game.snapshot();
        let mut replica = Game::new();
        replica.apply_snapshot(snapshot);

        assert_eq!(replica.board(), game.board());
        assert_eq!(replica.history(), game.history());
        assert_eq!(replica.status(), game.status());
        assert_eq!(replica.inventory(Color::White), game.inventory(Color::White));
        assert_eq!(replica.inventory(Color::Black), game.inventory(Color::Black));
    }

    #[test]
    fn test_inbound_snapshot_discards_pending_selection() {
        let mut game = opened_game();
        let authoritative = game.snapshot();

        game.select_inventory_piece(PieceKind::Ant).unwrap();
        assert!(!game.legal_targets().is_empty());

        game.apply_snapshot(authoritative);
        assert!(game.legal_targets().is_empty());
        assert!(!game.awaiting_confirm());
    }
}
