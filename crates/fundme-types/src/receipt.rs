//! Settlement strategy and receipt types.
//!
//! Every successful settlement returns a [`SettlementReceipt`] recording
//! what was paid out, to whom, and how many storage accesses it took.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Address, SettlementId, Wei};

/// How the settlement loop walks the contributor order list.
///
/// Both strategies produce the same end state; they differ only in how
/// many times they touch ledger storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlementStrategy {
    /// Re-read the list length and each entry from storage on every step.
    DirectStorage,
    /// Copy the list into memory once, then iterate the copy.
    CachedCopy,
}

impl SettlementStrategy {
    /// Name of the caller-facing entry point that uses this strategy.
    #[must_use]
    pub fn entry_point(&self) -> &'static str {
        match self {
            Self::DirectStorage => "withdraw",
            Self::CachedCopy => "cheaperWithdraw",
        }
    }
}

impl std::fmt::Display for SettlementStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectStorage => write!(f, "DIRECT_STORAGE"),
            Self::CachedCopy => write!(f, "CACHED_COPY"),
        }
    }
}

/// Proof that a settlement completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementReceipt {
    pub id: SettlementId,
    pub strategy: SettlementStrategy,
    /// Recipient of the payout (always the owner).
    pub owner: Address,
    /// Amount transferred. Zero for a settlement on an empty ledger.
    pub amount: Wei,
    /// Order-list entries walked, duplicates included.
    pub funders_cleared: usize,
    /// Storage reads performed by the settlement loop.
    pub storage_reads: u64,
    /// Storage writes performed by the settlement loop.
    pub storage_writes: u64,
    pub settled_at: DateTime<Utc>,
}

impl SettlementReceipt {
    /// Total storage accesses.
    #[must_use]
    pub fn storage_cost(&self) -> u64 {
        self.storage_reads + self.storage_writes
    }
}
