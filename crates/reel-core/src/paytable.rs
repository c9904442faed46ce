//! Paylines and win calculation

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::grid::{Grid, GridPos, REEL_COUNT};
use crate::symbols::{SymbolAlphabet, SymbolId};

/// Minimum run length that pays
pub const MIN_MATCH: usize = 3;

/// A payline definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payline {
    /// Payline index (0-based)
    pub index: u8,
    /// Short shape name
    pub name: String,
    /// Row position for each reel (e.g., [1, 0, 0, 0, 1] for a "dip")
    pub positions: [u8; REEL_COUNT],
}

impl Payline {
    pub fn new(index: u8, name: impl Into<String>, positions: [u8; REEL_COUNT]) -> Self {
        Self {
            index,
            name: name.into(),
            positions,
        }
    }

    /// Create a straight line (same row across all reels)
    pub fn straight(index: u8, row: u8) -> Self {
        Self::new(index, format!("row {row}"), [row; REEL_COUNT])
    }

    /// Cell visited on reel `reel`
    pub fn cell(&self, reel: usize) -> GridPos {
        GridPos::new(self.positions[reel], reel as u8)
    }
}

/// The seven payline patterns of the 5×3 cabinet
pub fn standard_paylines() -> Vec<Payline> {
    vec![
        // Straight lines
        Payline::straight(0, 0),
        Payline::straight(1, 1),
        Payline::straight(2, 2),
        // V shapes
        Payline::new(3, "descending", [0, 1, 2, 1, 0]),
        Payline::new(4, "ascending", [2, 1, 0, 1, 2]),
        // Flat U shapes
        Payline::new(5, "dip", [1, 0, 0, 0, 1]),
        Payline::new(6, "rise", [1, 2, 2, 2, 1]),
    ]
}

/// Payout factors for 3, 4 and 5 matching cells
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayTiers(pub [f64; 3]);

impl PayTiers {
    /// Factor for a match count (0.0 below three)
    pub fn factor(&self, match_count: usize) -> f64 {
        if match_count < MIN_MATCH {
            return 0.0;
        }
        let idx = (match_count - MIN_MATCH).min(self.0.len() - 1);
        self.0[idx]
    }

    pub fn validate(&self) -> SlotResult<()> {
        if self.0.iter().any(|f| !f.is_finite() || *f < 0.0) {
            return Err(SlotError::Config(format!(
                "pay_tiers must be non-negative numbers, got {:?}",
                self.0
            )));
        }
        Ok(())
    }
}

impl Default for PayTiers {
    fn default() -> Self {
        Self([1.0, 2.0, 4.5])
    }
}

/// A win on a single payline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinningLine {
    /// Payline index
    pub line_index: u8,
    /// Winning symbol ID
    pub symbol: SymbolId,
    /// Number of matching cells (3..=5)
    pub match_count: u8,
    /// Matched cells, left to right
    pub positions: Vec<GridPos>,
    /// Win amount (roll price × multiplier × tier factor)
    pub win_amount: f64,
}

/// How loudly a result should be celebrated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinClass {
    None,
    Small,
    Big,
}

/// Result of evaluating a grid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpinResult {
    /// Sum of all line wins
    pub total: f64,
    /// Line wins, in payline order
    pub lines: Vec<WinningLine>,
}

impl SpinResult {
    pub fn is_win(&self) -> bool {
        self.total > 0.0
    }

    /// Classify against the big win threshold
    pub fn win_class(&self, big_win_threshold: f64) -> WinClass {
        match self.total {
            t if t >= big_win_threshold => WinClass::Big,
            t if t > 0.0 => WinClass::Small,
            _ => WinClass::None,
        }
    }

    pub fn win_count(&self) -> usize {
        self.lines.len()
    }
}

/// Evaluates paylines against a settled grid
#[derive(Debug, Clone)]
pub struct PaylineEngine {
    alphabet: Arc<SymbolAlphabet>,
    paylines: Vec<Payline>,
    roll_price: f64,
    tiers: PayTiers,
}

impl PaylineEngine {
    /// Engine with the standard paylines
    pub fn new(alphabet: Arc<SymbolAlphabet>, roll_price: f64, tiers: PayTiers) -> Self {
        Self {
            alphabet,
            paylines: standard_paylines(),
            roll_price,
            tiers,
        }
    }

    /// Evaluate every payline; lines are independent and their wins add up
    pub fn evaluate(&self, grid: &Grid) -> SlotResult<SpinResult> {
        let mut lines = Vec::new();
        for payline in &self.paylines {
            if let Some(win) = self.evaluate_line(grid, payline)? {
                lines.push(win);
            }
        }

        let total = lines.iter().map(|w| w.win_amount).sum();
        Ok(SpinResult { total, lines })
    }

    fn evaluate_line(&self, grid: &Grid, payline: &Payline) -> SlotResult<Option<WinningLine>> {
        let mut symbols = Vec::with_capacity(REEL_COUNT);
        for reel in 0..REEL_COUNT {
            let pos = payline.cell(reel);
            let id = grid.get(pos).ok_or_else(|| {
                SlotError::MalformedGrid(format!(
                    "payline {} leaves the grid at {:?}",
                    payline.index, pos
                ))
            })?;
            symbols.push(id);
        }

        // Count consecutive matches from the left
        let first = symbols[0];
        let match_count = symbols.iter().take_while(|&&s| s == first).count();
        if match_count < MIN_MATCH {
            return Ok(None);
        }

        let multiplier = self.alphabet.multiplier(first)?;
        let win_amount = self.roll_price * multiplier * self.tiers.factor(match_count);

        Ok(Some(WinningLine {
            line_index: payline.index,
            symbol: first.clone(),
            match_count: match_count as u8,
            positions: (0..match_count).map(|reel| payline.cell(reel)).collect(),
            win_amount,
        }))
    }

    pub fn paylines(&self) -> &[Payline] {
        &self.paylines
    }

    pub fn roll_price(&self) -> f64 {
        self.roll_price
    }

    pub fn tiers(&self) -> &PayTiers {
        &self.tiers
    }
}
