//! Weighted symbol draw
//!
//! Owns the single pseudo-random source of a session. Reels borrow the draw
//! mutably for the duration of their own `advance`, so every random decision
//! (symbol picks and scroll-length jitter) comes from one seeded stream.

use std::sync::Arc;

use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::error::{SlotError, SlotResult};
use crate::symbols::{SymbolAlphabet, SymbolId};

/// Categorical draw over a symbol alphabet
#[derive(Debug, Clone)]
pub struct WeightedDraw {
    alphabet: Arc<SymbolAlphabet>,
    distribution: WeightedIndex<u32>,
    rng: ChaCha8Rng,
}

impl WeightedDraw {
    /// Create a draw with optional seed (None = OS entropy)
    pub fn new(alphabet: Arc<SymbolAlphabet>, seed: Option<u64>) -> SlotResult<Self> {
        let rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self::with_rng(alphabet, rng)
    }

    /// Create a draw over an explicit generator
    pub fn with_rng(alphabet: Arc<SymbolAlphabet>, rng: ChaCha8Rng) -> SlotResult<Self> {
        let distribution = WeightedIndex::new(alphabet.iter().map(|s| s.weight))
            .map_err(|e| SlotError::Config(format!("invalid symbol weights: {e}")))?;

        Ok(Self {
            alphabet,
            distribution,
            rng,
        })
    }

    /// Draw one symbol, proportional to its weight
    pub fn draw(&mut self) -> SymbolId {
        let idx = self.distribution.sample(&mut self.rng);
        self.alphabet.symbols()[idx].id.clone()
    }

    /// Uniform integer in `0..range` (0 when range is 0)
    pub fn scroll_extra(&mut self, range: u32) -> u32 {
        if range == 0 {
            return 0;
        }
        self.rng.random_range(0..range)
    }

    /// Reseed the underlying generator
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    pub fn alphabet(&self) -> &Arc<SymbolAlphabet> {
        &self.alphabet
    }
}
