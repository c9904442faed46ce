//! Error types for the slot core

use thiserror::Error;

use crate::symbols::SymbolId;

/// Core error type
///
/// Every variant is a configuration fault or a caller misuse. Ordinary
/// gameplay outcomes (no win, insufficient funds) are never reported here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Reel {reel} is still spinning, grid cannot be settled")]
    NotSettled { reel: usize },

    #[error("Unknown symbol: {0}")]
    UnknownSymbol(SymbolId),

    #[error("Malformed grid: {0}")]
    MalformedGrid(String),

    #[error("Reel {reel} is already spinning")]
    AlreadySpinning { reel: usize },

    #[error("Frame delta must be non-zero")]
    ZeroFrameDelta,
}

/// Result type alias
pub type SlotResult<T> = Result<T, SlotError>;
