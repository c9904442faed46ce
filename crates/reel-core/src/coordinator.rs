//! Spin coordinator: owns the reels and the shared draw

use std::sync::Arc;
use std::time::Duration;

use crate::draw::WeightedDraw;
use crate::error::{SlotError, SlotResult};
use crate::grid::{Grid, REEL_COUNT};
use crate::reel::{ReelGeometry, ReelState};
use crate::symbols::SymbolAlphabet;
use crate::timing::SpinTiming;

/// Drives all reels through one spin
#[derive(Debug, Clone)]
pub struct SpinCoordinator {
    reels: Vec<ReelState>,
    draw: WeightedDraw,
}

impl SpinCoordinator {
    /// Create `REEL_COUNT` idle reels filled from `draw`
    pub fn new(geometry: ReelGeometry, mut draw: WeightedDraw) -> Self {
        let reels = (0..REEL_COUNT)
            .map(|i| ReelState::new(i, geometry, &mut draw))
            .collect();
        Self { reels, draw }
    }

    /// Start every reel, reel `i` lasting `base + i * increment`
    ///
    /// Nothing is started if any reel is still spinning.
    pub fn start_all(&mut self, base: Duration, increment: Duration) -> SlotResult<()> {
        if let Some(reel) = self.reels.iter().find(|r| r.is_spinning()) {
            return Err(SlotError::AlreadySpinning { reel: reel.index() });
        }

        let mut duration = base;
        for reel in &mut self.reels {
            reel.start_spinning(duration, &mut self.draw)?;
            duration += increment;
        }
        Ok(())
    }

    /// Start every reel using a timing profile
    pub fn start_with(&mut self, timing: &SpinTiming) -> SlotResult<()> {
        self.start_all(timing.base_duration(), timing.duration_increment())
    }

    /// Advance all reels by `dt`, in reel order
    ///
    /// Returns the indices of reels that stopped during this tick.
    pub fn tick(&mut self, dt: Duration) -> Vec<usize> {
        let mut stopped = Vec::new();
        for reel in &mut self.reels {
            if reel.advance(dt, &mut self.draw) {
                stopped.push(reel.index());
            }
        }
        stopped
    }

    pub fn all_stopped(&self) -> bool {
        self.reels.iter().all(|r| !r.is_spinning())
    }

    /// Read the visible window of every reel into a grid
    pub fn settle(&self) -> SlotResult<Grid> {
        if let Some(reel) = self.reels.iter().find(|r| r.is_spinning()) {
            return Err(SlotError::NotSettled { reel: reel.index() });
        }

        let columns = std::array::from_fn(|i| self.reels[i].visible_symbols());
        Ok(Grid::from_columns(&columns))
    }

    pub fn reels(&self) -> &[ReelState] {
        &self.reels
    }

    pub fn alphabet(&self) -> &Arc<SymbolAlphabet> {
        self.draw.alphabet()
    }

    pub fn draw_mut(&mut self) -> &mut WeightedDraw {
        &mut self.draw
    }
}
