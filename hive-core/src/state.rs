//! Sparse board state: coordinate -> stack of pieces
//!
//! Only occupied coordinates are stored; an absent key is an empty cell.
//! Stacks are ordered bottom to top, and only the top piece is visible to
//! adjacency-based rules.

use crate::board::Hex;
use crate::pieces::Piece;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

/// Board occupancy, owned by the turn manager and mutated only through the
/// placement/movement primitives here.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoardState {
    cells: FxHashMap<Hex, Vec<Piece>>,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of occupied coordinates (not pieces)
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_occupied(&self, hex: Hex) -> bool {
        self.cells.contains_key(&hex)
    }

    /// The stack at `hex`, bottom to top; empty slice for a vacant cell
    pub fn stack(&self, hex: Hex) -> &[Piece] {
        self.cells.get(&hex).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn top_piece(&self, hex: Hex) -> Option<Piece> {
        self.cells.get(&hex).and_then(|stack| stack.last().copied())
    }

    pub fn height(&self, hex: Hex) -> usize {
        self.cells.get(&hex).map(Vec::len).unwrap_or(0)
    }

    /// Iterate occupied coordinates
    pub fn occupied(&self) -> impl Iterator<Item = Hex> + '_ {
        self.cells.keys().copied()
    }

    /// Push a piece on top of the stack at `hex`
    pub fn push(&mut self, hex: Hex, piece: Piece) {
        self.cells.entry(hex).or_default().push(piece);
    }

    /// Pop the top piece at `hex`; the cell is removed when its stack empties
    pub fn pop(&mut self, hex: Hex) -> Option<Piece> {
        let stack = self.cells.get_mut(&hex)?;
        let piece = stack.pop();
        if stack.is_empty() {
            self.cells.remove(&hex);
        }
        piece
    }

    /// Replace the entire stack at `hex`; an empty stack vacates the cell.
    /// Undo needs this to restore exact stack order after a beetle climb.
    pub fn set_stack(&mut self, hex: Hex, stack: Vec<Piece>) {
        if stack.is_empty() {
            self.cells.remove(&hex);
        } else {
            self.cells.insert(hex, stack);
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// One-hive check with one coordinate ignored: BFS over the remaining
    /// occupied cells. Empty or singleton sets are trivially connected.
    pub fn is_connected_excluding(&self, excluded: Hex) -> bool {
        let remaining: FxHashSet<Hex> = self
            .cells
            .keys()
            .copied()
            .filter(|&hex| hex != excluded)
            .collect();

        let Some(&start) = remaining.iter().next() else {
            return true;
        };
        if remaining.len() == 1 {
            return true;
        }

        let mut visited = FxHashSet::default();
        visited.insert(start);
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            for neighbor in current.neighbors() {
                if remaining.contains(&neighbor) && visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        visited.len() == remaining.len()
    }
}
