//! Symbol definitions and the validated alphabet

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};

/// Symbol identifier (e.g., "c", "v")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(String);

impl SymbolId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SymbolId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SymbolId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A symbol definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    /// Unique symbol ID
    pub id: SymbolId,
    /// Relative draw probability
    pub weight: u32,
    /// Payout factor for a 3-of-a-kind line
    pub multiplier: f64,
}

impl Symbol {
    pub fn new(id: impl Into<SymbolId>, weight: u32, multiplier: f64) -> Self {
        Self {
            id: id.into(),
            weight,
            multiplier,
        }
    }
}

/// Immutable, validated symbol table
///
/// Built once at startup and shared (behind an `Arc`) by the draw and the
/// payline engine. Lookups go through an id → index map.
#[derive(Debug, Clone)]
pub struct SymbolAlphabet {
    symbols: Vec<Symbol>,
    index: HashMap<SymbolId, usize>,
    total_weight: u64,
}

impl SymbolAlphabet {
    /// Validate and build an alphabet
    pub fn new(symbols: Vec<Symbol>) -> SlotResult<Self> {
        if symbols.is_empty() {
            return Err(SlotError::Config("symbol alphabet is empty".into()));
        }

        let mut seen = HashMap::with_capacity(symbols.len());

        for (i, symbol) in symbols.iter().enumerate() {
            if symbol.id.as_str().is_empty() {
                return Err(SlotError::Config(format!("symbol #{i} has an empty id")));
            }
            if symbol.weight == 0 {
                return Err(SlotError::Config(format!(
                    "symbol '{}' has zero weight",
                    symbol.id
                )));
            }
            if !symbol.multiplier.is_finite() || symbol.multiplier <= 0.0 {
                return Err(SlotError::Config(format!(
                    "symbol '{}' has invalid multiplier {}",
                    symbol.id, symbol.multiplier
                )));
            }
            if seen.insert(&symbol.id, i).is_some() {
                return Err(SlotError::Config(format!(
                    "duplicate symbol id '{}'",
                    symbol.id
                )));
            }
        }

        Ok(Self::build(symbols))
    }

    /// Classic six-symbol set (c, g, h, f, d, v)
    pub fn classic() -> Self {
        Self::build(classic_symbols())
    }

    fn build(symbols: Vec<Symbol>) -> Self {
        let index = symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();
        let total_weight = symbols.iter().map(|s| u64::from(s.weight)).sum();

        Self {
            symbols,
            index,
            total_weight,
        }
    }

    /// Get symbol by ID
    pub fn get(&self, id: &SymbolId) -> Option<&Symbol> {
        self.index.get(id).map(|&i| &self.symbols[i])
    }

    /// Position of a symbol in the alphabet order
    pub fn position(&self, id: &SymbolId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &SymbolId) -> bool {
        self.index.contains_key(id)
    }

    /// Payout multiplier for a symbol
    pub fn multiplier(&self, id: &SymbolId) -> SlotResult<f64> {
        self.get(id)
            .map(|s| s.multiplier)
            .ok_or_else(|| SlotError::UnknownSymbol(id.clone()))
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Sum of all weights
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }
}

/// Default weights and multipliers, low paying first
pub fn classic_symbols() -> Vec<Symbol> {
    vec![
        Symbol::new("c", 30, 1.0),
        Symbol::new("g", 25, 1.5),
        Symbol::new("h", 20, 2.0),
        Symbol::new("f", 15, 3.0),
        Symbol::new("d", 10, 4.0),
        Symbol::new("v", 5, 10.0),
    ]
}
