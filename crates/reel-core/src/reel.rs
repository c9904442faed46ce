//! Per-reel animation state machine
//!
//! A reel holds `VISIBLE_ROWS + 1` symbols: slot 0 is the lookahead entry
//! just above the window, slots 1..=3 are visible. Scrolling moves symbols
//! downward; each time the offset passes a full symbol height the bottom
//! symbol is dropped and a freshly drawn one is pushed in at the top.

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::draw::WeightedDraw;
use crate::error::{SlotError, SlotResult};
use crate::symbols::SymbolId;
use crate::timing::{ease_in_out_cosine, progress};

/// Visible symbols per reel
pub const VISIBLE_ROWS: usize = 3;

/// Loaded symbols per reel (visible window plus one lookahead)
pub const BUFFER_LEN: usize = VISIBLE_ROWS + 1;

/// Upper bound for `base_scroll_symbols + extra_scroll_symbols`
pub const MAX_SCROLL_SYMBOLS: u32 = 1_000;

/// Upper bound for symbol cell width and height (px)
pub const MAX_SYMBOL_SIZE: f64 = 4_096.0;

/// Reel dimensions and scroll parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReelGeometry {
    /// Symbol cell width (px)
    pub symbol_width: f64,
    /// Symbol cell height (px), one scroll step
    pub symbol_height: f64,
    /// Minimum symbols scrolled per spin
    pub base_scroll_symbols: u32,
    /// Width of the uniform jitter added to `base_scroll_symbols`
    pub extra_scroll_symbols: u32,
    /// Upper bound for the nominal scroll speed (px/s)
    pub max_scroll_speed: f64,
}

impl ReelGeometry {
    pub fn validate(&self) -> SlotResult<()> {
        for (name, value) in [
            ("symbol_width", self.symbol_width),
            ("symbol_height", self.symbol_height),
            ("max_scroll_speed", self.max_scroll_speed),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SlotError::Config(format!(
                    "reel.{name} must be positive, got {value}"
                )));
            }
        }
        for (name, value) in [
            ("symbol_width", self.symbol_width),
            ("symbol_height", self.symbol_height),
        ] {
            if value > MAX_SYMBOL_SIZE {
                return Err(SlotError::Config(format!(
                    "reel.{name} must be at most {MAX_SYMBOL_SIZE}, got {value}"
                )));
            }
        }

        let scroll = self
            .base_scroll_symbols
            .checked_add(self.extra_scroll_symbols)
            .filter(|&n| n <= MAX_SCROLL_SYMBOLS);
        if scroll.is_none() {
            return Err(SlotError::Config(format!(
                "reel.base_scroll_symbols + reel.extra_scroll_symbols must be at most \
                 {MAX_SCROLL_SYMBOLS}, got {} + {}",
                self.base_scroll_symbols, self.extra_scroll_symbols
            )));
        }
        Ok(())
    }
}

impl Default for ReelGeometry {
    fn default() -> Self {
        Self {
            symbol_width: 140.0,
            symbol_height: 140.0,
            base_scroll_symbols: 10,
            extra_scroll_symbols: 5,
            max_scroll_speed: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReelPhase {
    Idle,
    Spinning,
}

/// One vertical reel
#[derive(Debug, Clone)]
pub struct ReelState {
    index: usize,
    geometry: ReelGeometry,
    buffer: VecDeque<SymbolId>,
    phase: ReelPhase,
    /// Scroll offset in px, within (-symbol_height, 0] while spinning
    offset: f64,
    duration: Duration,
    elapsed: Duration,
    target_symbols: u32,
    scrolled_symbols: u32,
    total_distance: f64,
    speed: f64,
}

impl ReelState {
    /// Create an idle reel with a random initial fill
    pub fn new(index: usize, geometry: ReelGeometry, draw: &mut WeightedDraw) -> Self {
        let buffer = (0..BUFFER_LEN).map(|_| draw.draw()).collect();

        Self {
            index,
            geometry,
            buffer,
            phase: ReelPhase::Idle,
            offset: 0.0,
            duration: Duration::ZERO,
            elapsed: Duration::ZERO,
            target_symbols: 0,
            scrolled_symbols: 0,
            total_distance: 0.0,
            speed: 0.0,
        }
    }

    /// Begin a spin lasting `duration`
    ///
    /// Rejected with `AlreadySpinning` while a spin is in flight.
    pub fn start_spinning(
        &mut self,
        duration: Duration,
        draw: &mut WeightedDraw,
    ) -> SlotResult<()> {
        if self.is_spinning() {
            return Err(SlotError::AlreadySpinning { reel: self.index });
        }

        let h = self.geometry.symbol_height;
        let extra = draw.scroll_extra(self.geometry.extra_scroll_symbols);
        self.target_symbols = self.geometry.base_scroll_symbols.saturating_add(extra);
        self.total_distance = f64::from(self.target_symbols) * h;

        let secs = duration.as_secs_f64();
        self.speed = if secs > 0.0 {
            (self.total_distance / secs).min(self.geometry.max_scroll_speed)
        } else {
            self.geometry.max_scroll_speed
        };

        self.duration = duration;
        self.elapsed = Duration::ZERO;
        self.scrolled_symbols = 0;
        self.offset = 0.0;
        self.phase = ReelPhase::Spinning;

        log::debug!(
            "Reel {} spinning: {} symbols over {:.3}s",
            self.index,
            self.target_symbols,
            secs
        );
        Ok(())
    }

    /// Advance the animation by `dt`
    ///
    /// Returns `true` when the reel came to rest during this call. No-op while idle.
    pub fn advance(&mut self, dt: Duration, draw: &mut WeightedDraw) -> bool {
        if !self.is_spinning() {
            return false;
        }

        self.elapsed += dt;
        let h = self.geometry.symbol_height;
        let eased = ease_in_out_cosine(progress(self.elapsed, self.duration));

        let recycled = f64::from(self.scrolled_symbols) * h;
        self.offset = (recycled - self.total_distance * eased).min(0.0);
        while self.offset <= -h && self.scrolled_symbols < self.target_symbols {
            self.offset += h;
            self.recycle(draw);
        }

        if self.elapsed >= self.duration {
            // settle on exactly `target_symbols` steps, whatever the tick size was
            while self.scrolled_symbols < self.target_symbols {
                self.recycle(draw);
            }
            self.offset = 0.0;
            self.phase = ReelPhase::Idle;
            log::debug!("Reel {} stopped on {:?}", self.index, self.visible_symbols());
            return true;
        }

        false
    }

    fn recycle(&mut self, draw: &mut WeightedDraw) {
        self.buffer.pop_back();
        self.buffer.push_front(draw.draw());
        self.scrolled_symbols += 1;
    }

    /// The three symbols in the display window, top to bottom
    pub fn visible_symbols(&self) -> [SymbolId; VISIBLE_ROWS] {
        std::array::from_fn(|row| self.buffer[row + 1].clone())
    }

    /// All loaded symbols, lookahead first
    pub fn buffer(&self) -> impl ExactSizeIterator<Item = &SymbolId> {
        self.buffer.iter()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn phase(&self) -> ReelPhase {
        self.phase
    }

    pub fn is_spinning(&self) -> bool {
        self.phase == ReelPhase::Spinning
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Nominal scroll speed of the current spin (px/s, clamped)
    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Normalized progress of the current or last spin
    pub fn progress(&self) -> f64 {
        progress(self.elapsed, self.duration)
    }

    /// Symbols the current or last spin scrolls through
    pub fn target_symbols(&self) -> u32 {
        self.target_symbols
    }

    /// Symbols recycled so far in the current or last spin
    pub fn scrolled_symbols(&self) -> u32 {
        self.scrolled_symbols
    }

    pub fn geometry(&self) -> &ReelGeometry {
        &self.geometry
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::symbols::SymbolAlphabet;

    fn seeded_draw(seed: u64) -> WeightedDraw {
        WeightedDraw::new(Arc::new(SymbolAlphabet::classic()), Some(seed)).unwrap()
    }

    fn spin_to_rest(reel: &mut ReelState, draw: &mut WeightedDraw, dt: Duration) -> usize {
        let mut ticks = 0;
        while reel.is_spinning() {
            reel.advance(dt, draw);
            ticks += 1;
            assert!(ticks < 1_000_000, "reel never stopped");
        }
        ticks
    }

    #[test]
    fn test_new_reel_is_idle() {
        let mut draw = seeded_draw(1);
        let reel = ReelState::new(0, ReelGeometry::default(), &mut draw);
        assert_eq!(reel.phase(), ReelPhase::Idle);
        assert_eq!(reel.buffer().len(), BUFFER_LEN);
        assert_eq!(reel.offset(), 0.0);
    }

    #[test]
    fn test_advance_while_idle_is_noop() {
        let mut draw = seeded_draw(2);
        let mut reel = ReelState::new(0, ReelGeometry::default(), &mut draw);
        let before: Vec<_> = reel.buffer().cloned().collect();

        assert!(!reel.advance(Duration::from_millis(500), &mut draw));
        let after: Vec<_> = reel.buffer().cloned().collect();
        assert_eq!(before, after);
        assert_eq!(reel.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_restart_while_spinning_is_rejected() {
        let mut draw = seeded_draw(3);
        let mut reel = ReelState::new(2, ReelGeometry::default(), &mut draw);
        reel.start_spinning(Duration::from_secs(1), &mut draw).unwrap();
        reel.advance(Duration::from_millis(100), &mut draw);

        let err = reel.start_spinning(Duration::from_secs(1), &mut draw).unwrap_err();
        assert_eq!(err, SlotError::AlreadySpinning { reel: 2 });
        assert_eq!(reel.elapsed(), Duration::from_millis(100));
    }

    #[test]
    fn test_target_and_speed_clamp() {
        let mut draw = seeded_draw(4);
        let mut reel = ReelState::new(0, ReelGeometry::default(), &mut draw);
        for _ in 0..20 {
            reel.start_spinning(Duration::from_millis(100), &mut draw).unwrap();
            assert!((10..15).contains(&reel.target_symbols()));
            assert_eq!(reel.speed(), 50.0);
            spin_to_rest(&mut reel, &mut draw, Duration::from_millis(16));
        }
    }

    #[test]
    fn test_spin_ends_idle_with_zero_offset() {
        let mut draw = seeded_draw(5);
        let mut reel = ReelState::new(0, ReelGeometry::default(), &mut draw);
        reel.start_spinning(Duration::from_millis(700), &mut draw).unwrap();

        let h = reel.geometry().symbol_height;
        while reel.is_spinning() {
            reel.advance(Duration::from_micros(16_667), &mut draw);
            assert!(reel.offset() <= 0.0 && reel.offset() > -h);
            assert_eq!(reel.buffer().len(), BUFFER_LEN);
        }

        assert_eq!(reel.phase(), ReelPhase::Idle);
        assert_eq!(reel.offset(), 0.0);
        assert_eq!(reel.scrolled_symbols(), reel.target_symbols());
        assert_eq!(reel.visible_symbols().len(), VISIBLE_ROWS);
    }

    #[test]
    fn test_net_shift_is_target_symbols() {
        let mut draw = seeded_draw(6);
        let mut reel = ReelState::new(0, ReelGeometry::default(), &mut draw);

        let mut replay = draw.clone();
        let target = 10 + replay.scroll_extra(5) as usize;
        let drawn: Vec<_> = (0..target).map(|_| replay.draw()).collect();

        reel.start_spinning(Duration::from_millis(1300), &mut draw).unwrap();
        spin_to_rest(&mut reel, &mut draw, Duration::from_millis(10));

        assert_eq!(reel.target_symbols() as usize, target);
        let buffer: Vec<_> = reel.buffer().cloned().collect();
        let expected: Vec<_> = drawn.iter().rev().take(BUFFER_LEN).cloned().collect();
        assert_eq!(buffer, expected);
    }

    #[test]
    fn test_tick_granularity_does_not_change_outcome() {
        let geometry = ReelGeometry::default();
        let duration = Duration::from_millis(1900);

        let mut coarse_draw = seeded_draw(77);
        let mut coarse = ReelState::new(0, geometry, &mut coarse_draw);
        coarse.start_spinning(duration, &mut coarse_draw).unwrap();
        let coarse_ticks = spin_to_rest(&mut coarse, &mut coarse_draw, Duration::from_secs(5));

        let mut fine_draw = seeded_draw(77);
        let mut fine = ReelState::new(0, geometry, &mut fine_draw);
        fine.start_spinning(duration, &mut fine_draw).unwrap();
        let fine_ticks = spin_to_rest(&mut fine, &mut fine_draw, Duration::from_micros(4_167));

        assert_eq!(coarse_ticks, 1);
        assert!(fine_ticks > 400);
        assert_eq!(coarse.visible_symbols(), fine.visible_symbols());
        assert_eq!(coarse.offset(), 0.0);
        assert_eq!(fine.offset(), 0.0);
    }

    #[test]
    fn test_zero_duration_spin_stops_on_first_advance() {
        let mut draw = seeded_draw(8);
        let mut reel = ReelState::new(0, ReelGeometry::default(), &mut draw);
        reel.start_spinning(Duration::ZERO, &mut draw).unwrap();

        assert!(reel.advance(Duration::ZERO, &mut draw));
        assert!(!reel.is_spinning());
        assert_eq!(reel.scrolled_symbols(), reel.target_symbols());
    }

    #[test]
    fn test_geometry_validation() {
        assert!(ReelGeometry::default().validate().is_ok());
        let bad = ReelGeometry {
            symbol_height: 0.0,
            ..ReelGeometry::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_geometry_rejects_oversized_values() {
        let overflowing = ReelGeometry {
            base_scroll_symbols: u32::MAX,
            ..ReelGeometry::default()
        };
        assert!(matches!(overflowing.validate(), Err(SlotError::Config(_))));

        let too_long = ReelGeometry {
            base_scroll_symbols: MAX_SCROLL_SYMBOLS,
            extra_scroll_symbols: 1,
            ..ReelGeometry::default()
        };
        assert!(too_long.validate().is_err());

        let huge_cell = ReelGeometry {
            symbol_height: 1.0e300,
            ..ReelGeometry::default()
        };
        assert!(huge_cell.validate().is_err());

        let at_limit = ReelGeometry {
            base_scroll_symbols: MAX_SCROLL_SYMBOLS - 5,
            extra_scroll_symbols: 5,
            ..ReelGeometry::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_unvalidated_scroll_count_saturates() {
        let geometry = ReelGeometry {
            base_scroll_symbols: u32::MAX,
            extra_scroll_symbols: 5,
            ..ReelGeometry::default()
        };
        let mut draw = seeded_draw(9);
        let mut reel = ReelState::new(0, geometry, &mut draw);
        reel.start_spinning(Duration::from_secs(1), &mut draw).unwrap();
        assert_eq!(reel.target_symbols(), u32::MAX);
    }
}
