//! # reel-core: Five-reel slot machine core
//!
//! Reel animation and payline evaluation for a 5×3 slot cabinet. Rendering,
//! audio playback and input handling live in the host; the core hands them
//! per-frame snapshots and signals.
//!
//! ## Architecture
//!
//! ```text
//! SlotMachine (balance, spin requests)
//!     │
//!     ├── SpinCoordinator ── 5 × ReelState (easing, symbol recycling)
//!     │        └── WeightedDraw (shared seeded RNG)
//!     │                 └── SymbolAlphabet (weights, multipliers)
//!     │
//!     └── PaylineEngine (7 paylines, 3/4/5 tiers)
//!              │
//!              v
//!     SpinResult → Vec<SlotSignal> + FrameSnapshot
//! ```

pub mod config;
pub mod coordinator;
pub mod draw;
pub mod error;
pub mod grid;
pub mod machine;
pub mod paytable;
pub mod presentation;
pub mod reel;
pub mod signal;
pub mod symbols;
pub mod timing;

pub use config::*;
pub use coordinator::*;
pub use draw::*;
pub use error::*;
pub use grid::*;
pub use machine::*;
pub use paytable::*;
pub use presentation::*;
pub use reel::*;
pub use signal::*;
pub use symbols::*;
pub use timing::*;
