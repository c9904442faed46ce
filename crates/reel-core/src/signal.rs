//! Signals for the audio and presentation collaborators
//!
//! The core never plays sounds itself. It queues signals, and the host
//! drains them once per frame and maps each to a cue.

use serde::{Deserialize, Serialize};

use crate::paytable::WinClass;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlotSignal {
    /// Reels started moving (start the spin loop)
    ReelSpinStarted,
    /// One reel came to rest
    ReelStopped { reel_index: usize },
    /// All reels at rest (stop the spin loop)
    ReelSpinStopped,
    /// `0 < total < big_win_threshold`
    SmallWin { amount: f64 },
    /// `total >= big_win_threshold`
    BigWin { amount: f64 },
}

impl SlotSignal {
    /// Win signal for a classified total, if any
    pub fn for_win(class: WinClass, amount: f64) -> Option<Self> {
        match class {
            WinClass::None => None,
            WinClass::Small => Some(Self::SmallWin { amount }),
            WinClass::Big => Some(Self::BigWin { amount }),
        }
    }

    /// Stable signal name for cue lookup
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::ReelSpinStarted => "reel_spin_started",
            Self::ReelStopped { .. } => "reel_stopped",
            Self::ReelSpinStopped => "reel_spin_stopped",
            Self::SmallWin { .. } => "small_win",
            Self::BigWin { .. } => "big_win",
        }
    }

    pub fn is_win(&self) -> bool {
        matches!(self, Self::SmallWin { .. } | Self::BigWin { .. })
    }
}
