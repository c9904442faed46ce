//! Settled 3×5 symbol grid

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::reel::VISIBLE_ROWS;
use crate::symbols::{SymbolAlphabet, SymbolId};

/// Number of reels (grid columns)
pub const REEL_COUNT: usize = 5;

/// Number of grid rows
pub const ROW_COUNT: usize = VISIBLE_ROWS;

/// A grid cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    /// 0 = top
    pub row: u8,
    /// 0 = leftmost reel
    pub reel: u8,
}

impl GridPos {
    pub fn new(row: u8, reel: u8) -> Self {
        Self { row, reel }
    }
}

/// Row-major snapshot of the visible symbols after a spin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: [[SymbolId; REEL_COUNT]; ROW_COUNT],
}

impl Grid {
    /// Build from per-reel visible symbols (top to bottom)
    pub fn from_columns(columns: &[[SymbolId; ROW_COUNT]; REEL_COUNT]) -> Self {
        Self {
            cells: std::array::from_fn(|row| {
                std::array::from_fn(|reel| columns[reel][row].clone())
            }),
        }
    }

    /// Build from external row data, checking dimensions
    pub fn from_rows<R, S>(rows: &[R]) -> SlotResult<Self>
    where
        R: AsRef<[S]>,
        S: Clone + Into<SymbolId>,
    {
        if rows.len() != ROW_COUNT {
            return Err(SlotError::MalformedGrid(format!(
                "expected {ROW_COUNT} rows, got {}",
                rows.len()
            )));
        }
        for (i, row) in rows.iter().enumerate() {
            let len = row.as_ref().len();
            if len != REEL_COUNT {
                return Err(SlotError::MalformedGrid(format!(
                    "row {i}: expected {REEL_COUNT} cells, got {len}"
                )));
            }
        }

        Ok(Self {
            cells: std::array::from_fn(|row| {
                std::array::from_fn(|reel| rows[row].as_ref()[reel].clone().into())
            }),
        })
    }

    pub fn get(&self, pos: GridPos) -> Option<&SymbolId> {
        self.cells
            .get(pos.row as usize)
            .and_then(|r| r.get(pos.reel as usize))
    }

    pub fn rows(&self) -> &[[SymbolId; REEL_COUNT]; ROW_COUNT] {
        &self.cells
    }

    /// First cell holding a symbol the alphabet does not know
    pub fn find_unknown(&self, alphabet: &SymbolAlphabet) -> Option<(GridPos, &SymbolId)> {
        self.cells.iter().enumerate().find_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .find(|(_, id)| !alphabet.contains(id))
                .map(|(reel, id)| (GridPos::new(row as u8, reel as u8), id))
        })
    }
}
