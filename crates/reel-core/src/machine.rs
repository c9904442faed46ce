//! Slot machine session: balance, spin requests and per-frame driving

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::SlotConfig;
use crate::coordinator::SpinCoordinator;
use crate::draw::WeightedDraw;
use crate::error::{SlotError, SlotResult};
use crate::grid::Grid;
use crate::paytable::{PaylineEngine, SpinResult, WinClass};
use crate::presentation::{FrameSnapshot, Layout, ReelFrame};
use crate::signal::SlotSignal;
use crate::symbols::SymbolAlphabet;

/// Outcome of a spin request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinRequest {
    /// Roll price debited, reels started
    Accepted,
    /// Balance below roll price
    InsufficientFunds,
    /// Previous spin still animating
    SpinInProgress,
}

impl SpinRequest {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Session statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub total_bet: f64,
    pub total_win: f64,
    pub wins: u64,
    pub losses: u64,
    pub big_wins: u64,
    pub max_win: f64,
}

impl SessionStats {
    /// Calculate RTP
    pub fn rtp(&self) -> f64 {
        if self.total_bet > 0.0 {
            (self.total_win / self.total_bet) * 100.0
        } else {
            0.0
        }
    }

    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }

    fn record(&mut self, result: &SpinResult, class: WinClass) {
        self.total_win += result.total;
        self.max_win = self.max_win.max(result.total);
        match class {
            WinClass::None => self.losses += 1,
            WinClass::Small => self.wins += 1,
            WinClass::Big => {
                self.wins += 1;
                self.big_wins += 1;
            }
        }
    }
}

/// A playable machine: reels, paytable and the player's balance
pub struct SlotMachine {
    config: SlotConfig,
    coordinator: SpinCoordinator,
    engine: PaylineEngine,
    balance: f64,
    /// A spin was accepted and its result is not yet applied
    spin_pending: bool,
    last_grid: Option<Grid>,
    last_result: Option<SpinResult>,
    signals: Vec<SlotSignal>,
    stats: SessionStats,
}

impl SlotMachine {
    /// Build a machine from a validated config
    pub fn new(config: SlotConfig) -> SlotResult<Self> {
        config.validate()?;

        let alphabet = Arc::new(config.alphabet()?);
        let draw = WeightedDraw::new(Arc::clone(&alphabet), config.seed)?;
        let coordinator = SpinCoordinator::new(config.reel, draw);
        let engine = PaylineEngine::new(alphabet, config.roll_price, config.pay_tiers);

        log::info!(
            "Slot machine ready: {} symbols, {} paylines, roll price {}",
            config.symbols.len(),
            engine.paylines().len(),
            config.roll_price
        );

        Ok(Self {
            balance: config.starting_balance,
            config,
            coordinator,
            engine,
            spin_pending: false,
            last_grid: None,
            last_result: None,
            signals: Vec::new(),
            stats: SessionStats::default(),
        })
    }

    /// Machine with default config and a fixed seed
    pub fn seeded(seed: u64) -> SlotResult<Self> {
        Self::new(SlotConfig::seeded(seed))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN CONTROL
    // ═══════════════════════════════════════════════════════════════════════════

    /// Ask for a spin
    ///
    /// Accepted only when idle and the balance covers the roll price. On
    /// acceptance the roll price is debited before the reels start.
    pub fn request_spin(&mut self) -> SlotResult<SpinRequest> {
        if self.is_spinning() {
            log::warn!("Spin rejected: spin in progress");
            return Ok(SpinRequest::SpinInProgress);
        }
        let price = self.config.roll_price;
        if self.balance < price {
            log::warn!("Spin rejected: balance {:.2} < roll price {:.2}", self.balance, price);
            return Ok(SpinRequest::InsufficientFunds);
        }

        self.coordinator.start_with(&self.config.timing)?;
        self.balance -= price;
        self.spin_pending = true;
        self.last_result = None;
        self.stats.total_spins += 1;
        self.stats.total_bet += price;
        self.signals.push(SlotSignal::ReelSpinStarted);

        log::info!("Spin accepted, balance {:.2}", self.balance);
        Ok(SpinRequest::Accepted)
    }

    /// Advance one frame
    ///
    /// When the last reel stops, the grid is settled and evaluated exactly
    /// once and the win is credited.
    pub fn tick(&mut self, dt: Duration) -> SlotResult<()> {
        for reel_index in self.coordinator.tick(dt) {
            self.signals.push(SlotSignal::ReelStopped { reel_index });
        }

        if self.spin_pending && self.coordinator.all_stopped() {
            self.spin_pending = false;
            self.finish_spin()?;
        }
        Ok(())
    }

    fn finish_spin(&mut self) -> SlotResult<()> {
        let grid = self.coordinator.settle()?;
        let result = self.engine.evaluate(&grid)?;
        let class = result.win_class(self.config.big_win_threshold);

        self.balance += result.total;
        self.stats.record(&result, class);

        if let Some(signal) = SlotSignal::for_win(class, result.total) {
            self.signals.push(signal);
        }
        self.signals.push(SlotSignal::ReelSpinStopped);

        if result.is_win() {
            log::info!(
                "Won {:.2} on {} line(s), balance {:.2}",
                result.total,
                result.win_count(),
                self.balance
            );
        } else {
            log::debug!("No win, balance {:.2}", self.balance);
        }

        self.last_grid = Some(grid);
        self.last_result = Some(result);
        Ok(())
    }

    /// Tick with a fixed frame delta until the current spin is settled
    ///
    /// Returns the number of frames used.
    pub fn run_until_settled(&mut self, frame: Duration) -> SlotResult<u64> {
        if frame.is_zero() && self.is_spinning() {
            return Err(SlotError::ZeroFrameDelta);
        }
        let mut frames = 0;
        while self.is_spinning() {
            self.tick(frame)?;
            frames += 1;
        }
        Ok(frames)
    }

    /// Take all queued signals
    pub fn drain_signals(&mut self) -> Vec<SlotSignal> {
        std::mem::take(&mut self.signals)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // STATE
    // ═══════════════════════════════════════════════════════════════════════════

    /// True from an accepted request until its result is applied
    pub fn is_spinning(&self) -> bool {
        self.spin_pending
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Add funds (e.g., a top-up from the host)
    pub fn deposit(&mut self, amount: f64) {
        if amount.is_finite() && amount > 0.0 {
            self.balance += amount;
        }
    }

    pub fn can_afford_spin(&self) -> bool {
        self.balance >= self.config.roll_price
    }

    pub fn last_result(&self) -> Option<&SpinResult> {
        self.last_result.as_ref()
    }

    pub fn last_grid(&self) -> Option<&Grid> {
        self.last_grid.as_ref()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    pub fn coordinator(&self) -> &SpinCoordinator {
        &self.coordinator
    }

    pub fn engine(&self) -> &PaylineEngine {
        &self.engine
    }

    pub fn alphabet(&self) -> &Arc<SymbolAlphabet> {
        self.coordinator.alphabet()
    }

    /// Restart the random stream (replays, tests)
    pub fn reseed(&mut self, seed: u64) {
        self.coordinator.draw_mut().reseed(seed);
    }

    /// Snapshot for the renderer
    pub fn frame(&self, layout: &Layout) -> FrameSnapshot {
        FrameSnapshot {
            reels: self
                .coordinator
                .reels()
                .iter()
                .map(|reel| ReelFrame::capture(reel, layout))
                .collect(),
            winning_lines: self
                .last_result
                .as_ref()
                .map(|r| r.lines.clone())
                .unwrap_or_default(),
            balance: self.balance,
            last_win: self.last_result.as_ref().map_or(0.0, |r| r.total),
        }
    }

    /// Layout of the reel window at the given origin
    pub fn layout_at(&self, origin_x: f64, origin_y: f64) -> Layout {
        Layout::new(origin_x, origin_y, &self.config.reel)
    }
}
