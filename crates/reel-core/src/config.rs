//! Slot machine configuration
//!
//! Plain data loaded once at startup (JSON or YAML) and validated before any
//! component is built from it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::paytable::PayTiers;
use crate::reel::ReelGeometry;
use crate::symbols::{Symbol, SymbolAlphabet, classic_symbols};
use crate::timing::SpinTiming;

/// Complete machine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotConfig {
    /// Symbol alphabet, in display/paytable order
    pub symbols: Vec<Symbol>,
    /// Cost of one spin
    pub roll_price: f64,
    /// Balance at session start
    pub starting_balance: f64,
    /// Reel stop staggering
    pub timing: SpinTiming,
    /// Reel dimensions and scroll parameters
    pub reel: ReelGeometry,
    /// Payout factors for 3, 4, 5 matches
    pub pay_tiers: PayTiers,
    /// Total win at or above which a win counts as big
    pub big_win_threshold: f64,
    /// RNG seed (None = OS entropy)
    pub seed: Option<u64>,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            symbols: classic_symbols(),
            roll_price: 1.0,
            starting_balance: 1000.0,
            timing: SpinTiming::classic(),
            reel: ReelGeometry::default(),
            pay_tiers: PayTiers::default(),
            big_win_threshold: 10.0,
            seed: None,
        }
    }
}

impl SlotConfig {
    /// Deterministic config for tests and replays
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Parse and validate JSON
    pub fn from_json(json: &str) -> SlotResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SlotError::Config(format!("JSON parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate YAML
    pub fn from_yaml(yaml: &str) -> SlotResult<Self> {
        let config: Self = serde_yml::from_str(yaml)
            .map_err(|e| SlotError::Config(format!("YAML parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: impl AsRef<Path>) -> SlotResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SlotError::Config(format!("cannot read {}: {e}", path.display())))?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&text),
            Some("yaml" | "yml") => Self::from_yaml(&text),
            other => Err(SlotError::Config(format!(
                "unsupported config extension {:?} for {}",
                other,
                path.display()
            ))),
        }
    }

    /// Export as pretty JSON
    pub fn to_json(&self) -> SlotResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SlotError::Config(format!("JSON export error: {e}")))
    }

    /// Check every field; the alphabet is validated by building it
    pub fn validate(&self) -> SlotResult<()> {
        self.alphabet()?;
        self.timing.validate()?;
        self.reel.validate()?;
        self.pay_tiers.validate()?;

        if !self.roll_price.is_finite() || self.roll_price <= 0.0 {
            return Err(SlotError::Config(format!(
                "roll_price must be positive, got {}",
                self.roll_price
            )));
        }
        if !self.starting_balance.is_finite() || self.starting_balance < 0.0 {
            return Err(SlotError::Config(format!(
                "starting_balance must be non-negative, got {}",
                self.starting_balance
            )));
        }
        if !self.big_win_threshold.is_finite() || self.big_win_threshold <= 0.0 {
            return Err(SlotError::Config(format!(
                "big_win_threshold must be positive, got {}",
                self.big_win_threshold
            )));
        }
        Ok(())
    }

    /// Build the validated alphabet
    pub fn alphabet(&self) -> SlotResult<SymbolAlphabet> {
        SymbolAlphabet::new(self.symbols.clone())
    }
}
