//! Placement and movement legality
//!
//! All checks here are pure predicates over the board and the move history;
//! nothing is mutated. The turn manager in `game` decides what to do with a
//! rejection.

use crate::board::{Hex, DIRECTIONS};
use crate::game::MoveRecord;
use crate::pieces::{Color, PieceKind};
use crate::state::BoardState;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// Placement legality for a new piece of `color` at `hex`.
///
/// First piece goes anywhere, the second must touch the first, and from then
/// on a placement must touch at least one friendly top piece and no opposing
/// top piece. The queen deadline is checked separately by
/// [`must_place_queen`] since it depends on the piece being placed.
pub fn can_place(board: &BoardState, history: &[MoveRecord], hex: Hex, color: Color) -> bool {
    if board.is_occupied(hex) {
        return false;
    }
    if history.is_empty() {
        return true;
    }
    if history.len() == 1 {
        return hex.neighbors().iter().any(|&n| board.is_occupied(n));
    }

    let mut has_own_neighbor = false;
    for neighbor in hex.neighbors() {
        match board.top_piece(neighbor) {
            Some(piece) if piece.color == color => has_own_neighbor = true,
            Some(_) => return false,
            None => {}
        }
    }
    has_own_neighbor
}

/// Queen deadline: once `color` has placed three pieces without its queen,
/// only a queen placement remains legal for that color.
pub fn must_place_queen(history: &[MoveRecord], color: Color) -> bool {
    let mut placements = 0;
    for record in history.iter().filter(|r| r.player == color) {
        match record.piece.placed_kind() {
            Some(PieceKind::Queen) => return false,
            Some(_) => placements += 1,
            None => {}
        }
    }
    placements >= 3
}

/// Whether `color` has a queen placement in the history (movement gate)
pub fn queen_placed(history: &[MoveRecord], color: Color) -> bool {
    history.iter().any(|record| {
        record.player == color && record.piece.placed_kind() == Some(PieceKind::Queen)
    })
}

/// Movement legality for the top piece at `from`, dispatched by kind.
///
/// Shared preconditions: the origin is occupied, the destination differs,
/// and lifting the origin keeps the hive in one component.
pub fn can_move(board: &BoardState, from: Hex, to: Hex, kind: PieceKind) -> bool {
    if from == to {
        return false;
    }
    if board.top_piece(from).is_none() {
        return false;
    }
    if !board.is_connected_excluding(from) {
        return false;
    }

    match kind {
        PieceKind::Queen => queen_move(board, from, to),
        PieceKind::Beetle => from.is_adjacent(to),
        PieceKind::Grasshopper => grasshopper_move(board, from, to),
        PieceKind::Spider => slide_path_exact(board, from, to, 3),
        PieceKind::Ant => slide_reachable(board, from, to),
    }
}

/// Queen: one slide step to an adjacent empty cell
fn queen_move(board: &BoardState, from: Hex, to: Hex) -> bool {
    from.is_adjacent(to) && !board.is_occupied(to) && slide_step(board, from, from, to)
}

/// Grasshopper: jump a straight axial line over at least one contiguous
/// occupied cell, landing on the first empty cell past the run.
fn grasshopper_move(board: &BoardState, from: Hex, to: Hex) -> bool {
    for &(dq, dr) in &DIRECTIONS {
        let mut current = Hex::new(from.q + dq, from.r + dr);
        if !board.is_occupied(current) {
            continue;
        }
        while board.is_occupied(current) {
            current = Hex::new(current.q + dq, current.r + dr);
        }
        if current == to {
            return true;
        }
    }
    false
}

/// Freedom-of-movement test for a single slide step from `current` to an
/// adjacent `target`. `origin` is the cell the moving piece is vacating: it
/// does not block the target and does not count as hive contact. The step is
/// legal when some other neighbor of the target keeps body contact.
fn slide_step(board: &BoardState, origin: Hex, current: Hex, target: Hex) -> bool {
    if !current.is_adjacent(target) {
        return false;
    }
    if board.is_occupied(target) && target != origin {
        return false;
    }
    target
        .neighbors()
        .iter()
        .any(|&n| n != origin && n != current && board.is_occupied(n))
}

/// Spider: a slide path of exactly `steps` steps. Depth-bounded DFS with an
/// explicit stack; the visited set is copied per branch so one candidate
/// path cannot poison another.
fn slide_path_exact(board: &BoardState, from: Hex, to: Hex, steps: u8) -> bool {
    let mut initial_visited = FxHashSet::default();
    initial_visited.insert(from);

    let mut stack = vec![(from, 0u8, initial_visited)];
    while let Some((current, depth, visited)) = stack.pop() {
        if depth == steps {
            if current == to {
                return true;
            }
            continue;
        }
        for neighbor in current.neighbors() {
            if visited.contains(&neighbor) {
                continue;
            }
            if !slide_step(board, from, current, neighbor) {
                continue;
            }
            let mut next_visited = visited.clone();
            next_visited.insert(neighbor);
            stack.push((neighbor, depth + 1, next_visited));
        }
    }
    false
}

/// Ant: any number of slide steps. Plain BFS with one global visited set;
/// reachability is all that matters.
fn slide_reachable(board: &BoardState, from: Hex, to: Hex) -> bool {
    let mut visited = FxHashSet::default();
    visited.insert(from);
    let mut queue = VecDeque::from([from]);

    while let Some(current) = queue.pop_front() {
        if current == to {
            return true;
        }
        for neighbor in current.neighbors() {
            if !visited.contains(&neighbor) && slide_step(board, from, current, neighbor) {
                visited.insert(neighbor);
                queue.push_back(neighbor);
            }
        }
    }
    false
}

/// Cells worth testing as placements: every empty neighbor of an occupied
/// cell. Deduplicated, unordered.
pub fn candidate_placements(board: &BoardState) -> Vec<Hex> {
    let mut candidates = FxHashSet::default();
    for hex in board.occupied() {
        for neighbor in hex.neighbors() {
            if !board.is_occupied(neighbor) {
                candidates.insert(neighbor);
            }
        }
    }
    candidates.into_iter().collect()
}

/// Cells worth testing as movement destinations: every occupied cell (beetle
/// climbs) plus every neighbor of an occupied cell.
pub fn candidate_destinations(board: &BoardState) -> Vec<Hex> {
    let mut candidates = FxHashSet::default();
    for hex in board.occupied() {
        candidates.insert(hex);
        for neighbor in hex.neighbors() {
            candidates.insert(neighbor);
        }
    }
    candidates.into_iter().collect()
}
