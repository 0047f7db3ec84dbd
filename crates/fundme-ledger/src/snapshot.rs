//! Canonical copy of ledger state.
//!
//! A [`LedgerSnapshot`] serves two purposes:
//! - **Rollback**: settlement takes one before mutating and restores it if
//!   the payout fails, so no partial settlement is ever observable.
//! - **Comparison**: [`LedgerSnapshot::state_root`] hashes the state in a
//!   canonical order, so two ledgers with the same history produce the same
//!   root regardless of `HashMap` iteration order.

use std::collections::BTreeMap;

use fundme_types::{Address, Wei};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Point-in-time copy of a ledger's mutable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Contributor → cumulative amount (non-zero entries only).
    pub records: BTreeMap<Address, Wei>,
    /// Contributor order list, duplicates included.
    pub funders: Vec<Address>,
    /// Value held in custody.
    pub held_balance: Wei,
}

impl LedgerSnapshot {
    /// SHA-256 over the canonical encoding:
    /// `"fundme:ledger_state:v1:" || held || len(funders) || funders || len(records) || (addr || amount)*`
    #[must_use]
    pub fn state_root(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(b"fundme:ledger_state:v1:");
        hasher.update(self.held_balance.to_le_bytes());

        hasher.update((self.funders.len() as u64).to_le_bytes());
        for funder in &self.funders {
            hasher.update(funder.as_bytes());
        }

        hasher.update((self.records.len() as u64).to_le_bytes());
        for (addr, amount) in &self.records {
            hasher.update(addr.as_bytes());
            hasher.update(amount.to_le_bytes());
        }

        let result = hasher.finalize();
        let mut root = [0u8; 32];
        root.copy_from_slice(&result);
        root
    }

    /// Hex form of [`Self::state_root`].
    #[must_use]
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root())
    }

    /// Sum of all records, or `None` on overflow.
    #[must_use]
    pub fn recorded_total(&self) -> Option<Wei> {
        self.records
            .values()
            .try_fold(0u128, |acc, amount| acc.checked_add(*amount))
    }

    /// Whether the snapshot describes a freshly settled (or new) ledger.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.held_balance == 0 && self.funders.is_empty() && self.records.is_empty()
    }
}
