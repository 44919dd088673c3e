//! Piece kinds, colors, and per-player inventories

use serde::{Deserialize, Serialize};

/// Player color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

/// The five bug kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Queen,
    Beetle,
    Grasshopper,
    Spider,
    Ant,
}

impl PieceKind {
    pub const ALL: [PieceKind; 5] = [
        PieceKind::Queen,
        PieceKind::Beetle,
        PieceKind::Grasshopper,
        PieceKind::Spider,
        PieceKind::Ant,
    ];

    /// How many of this kind each player starts with
    pub const fn starting_count(self) -> u8 {
        match self {
            PieceKind::Queen => 1,
            PieceKind::Beetle => 2,
            PieceKind::Grasshopper => 3,
            PieceKind::Spider => 2,
            PieceKind::Ant => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PieceKind::Queen => "queen",
            PieceKind::Beetle => "beetle",
            PieceKind::Grasshopper => "grasshopper",
            PieceKind::Spider => "spider",
            PieceKind::Ant => "ant",
        }
    }

    pub fn parse(name: &str) -> Option<PieceKind> {
        PieceKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name.to_ascii_lowercase())
    }

    const fn index(self) -> usize {
        match self {
            PieceKind::Queen => 0,
            PieceKind::Beetle => 1,
            PieceKind::Grasshopper => 2,
            PieceKind::Spider => 3,
            PieceKind::Ant => 4,
        }
    }
}

/// A piece on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    #[serde(rename = "type")]
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }
}

/// Unplaced pieces remaining for one player. Only ever mutated alongside a
/// committed history entry, so it can be rebuilt from placement records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inventory {
    counts: [u8; 5],
}

impl Inventory {
    /// The full starting multiset: 1 queen, 2 beetles, 3 grasshoppers,
    /// 2 spiders, 3 ants.
    pub fn full() -> Self {
        let mut counts = [0; 5];
        for kind in PieceKind::ALL {
            counts[kind.index()] = kind.starting_count();
        }
        Self { counts }
    }

    pub fn remaining(&self, kind: PieceKind) -> u8 {
        self.counts[kind.index()]
    }

    /// Remove one piece of `kind`; false if none left
    pub fn take(&mut self, kind: PieceKind) -> bool {
        let count = &mut self.counts[kind.index()];
        if *count == 0 {
            return false;
        }
        *count -= 1;
        true
    }

    /// Return one piece of `kind` (undo path)
    pub fn put_back(&mut self, kind: PieceKind) {
        let count = &mut self.counts[kind.index()];
        if *count < kind.starting_count() {
            *count += 1;
        }
    }

    pub fn is_full(&self) -> bool {
        *self == Inventory::full()
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::full()
    }
}
