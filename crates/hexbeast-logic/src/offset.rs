//! Offset and doubled coordinates for rectangular maps.
//!
//! Cube coordinates are the canonical form; these exist for building
//! rectangular maps and for interop with row/column based storage.

use serde::{Deserialize, Serialize};

use crate::hex::Hex;

/// Which rows (or columns) are shoved by half a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OffsetParity {
    Even,
    Odd,
}

impl OffsetParity {
    fn sign(self) -> i32 {
        match self {
            OffsetParity::Even => 1,
            OffsetParity::Odd => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OffsetCoord {
    pub col: i32,
    pub row: i32,
}

impl OffsetCoord {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

/// Columns shoved (flat-top layouts).
pub fn qoffset_from_cube(parity: OffsetParity, h: Hex) -> OffsetCoord {
    let col = h.q;
    let row = h.r + (h.q + parity.sign() * (h.q & 1)) / 2;
    OffsetCoord { col, row }
}

pub fn qoffset_to_cube(parity: OffsetParity, c: OffsetCoord) -> Hex {
    let q = c.col;
    let r = c.row - (c.col + parity.sign() * (c.col & 1)) / 2;
    Hex::new(q, r)
}

/// Rows shoved (pointy-top layouts).
pub fn roffset_from_cube(parity: OffsetParity, h: Hex) -> OffsetCoord {
    let col = h.q + (h.r + parity.sign() * (h.r & 1)) / 2;
    let row = h.r;
    OffsetCoord { col, row }
}

pub fn roffset_to_cube(parity: OffsetParity, c: OffsetCoord) -> Hex {
    let q = c.col - (c.row + parity.sign() * (c.row & 1)) / 2;
    let r = c.row;
    Hex::new(q, r)
}

/// Doubled coordinates: one axis counts in steps of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DoubledCoord {
    pub col: i32,
    pub row: i32,
}

impl DoubledCoord {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    pub fn qdoubled_from_cube(h: Hex) -> Self {
        Self {
            col: h.q,
            row: 2 * h.r + h.q,
        }
    }

    pub fn qdoubled_to_cube(self) -> Hex {
        Hex::new(self.col, (self.row - self.col) / 2)
    }

    pub fn rdoubled_from_cube(h: Hex) -> Self {
        Self {
            col: 2 * h.q + h.r,
            row: h.r,
        }
    }

    pub fn rdoubled_to_cube(self) -> Hex {
        Hex::new((self.col - self.row) / 2, self.row)
    }
}
