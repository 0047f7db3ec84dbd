//! Ledger lifecycle state.
//!
//! ```text
//!          fund            fund
//!   ┌───────┐──────▶┌───────────┐◀──┐
//!   │ EMPTY │       │ ACCEPTING │───┘
//!   └───────┘◀──────└───────────┘
//!     ▲  │  settlement
//!     └──┘ settlement (zero-effect)
//! ```

use serde::{Deserialize, Serialize};

/// Whether the ledger currently custodies any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerState {
    /// Nothing held. Initial state, and the state after every settlement.
    Empty,
    /// Held balance is positive.
    Accepting,
}

impl LedgerState {
    /// State implied by a held balance.
    #[must_use]
    pub fn from_held(held: u128) -> Self {
        if held == 0 { Self::Empty } else { Self::Accepting }
    }
}

impl std::fmt::Display for LedgerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "EMPTY"),
            Self::Accepting => write!(f, "ACCEPTING"),
        }
    }
}
