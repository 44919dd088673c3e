//! Hex board geometry with axial coordinates

use serde::{Deserialize, Serialize};

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

impl Hex {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The six neighboring cells, in direction order
    pub fn neighbors(&self) -> [Hex; 6] {
        let mut out = [*self; 6];
        for (i, &(dq, dr)) in DIRECTIONS.iter().enumerate() {
            out[i] = Hex::new(self.q + dq, self.r + dr);
        }
        out
    }

    /// Get neighbor in direction (0-5)
    pub fn neighbor(&self, direction: usize) -> Hex {
        let (dq, dr) = DIRECTIONS[direction % 6];
        Hex::new(self.q + dq, self.r + dr)
    }

    pub fn is_adjacent(&self, other: Hex) -> bool {
        self.neighbors().contains(&other)
    }

    /// "q,r" key used on the wire
    pub fn key(&self) -> String {
        format!("{},{}", self.q, self.r)
    }

    /// Parse a "q,r" wire key back into a coordinate
    pub fn parse_key(key: &str) -> Option<Hex> {
        let (q, r) = key.split_once(',')?;
        Some(Hex::new(
            q.trim().parse().ok()?,
            r.trim().parse().ok()?,
        ))
    }
}

/// Direction vectors in axial coordinates (dq, dr)
pub const DIRECTIONS: [(i32, i32); 6] = [
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
];

/// Where the first piece of a game goes
pub const ORIGIN: Hex = Hex::new(0, 0);
