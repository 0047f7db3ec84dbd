//! # fundme-settlement
//!
//! **Settlement Engine**: owner-restricted withdrawal of the whole held
//! balance, with the contribution ledger reset in the same atomic step.
//!
//! ## Architecture
//!
//! A settlement:
//! 1. Checks the caller is the owner (`NotOwner` otherwise, nothing touched)
//! 2. Snapshots the ledger for rollback
//! 3. Walks the contributor order list and zeroes each record, using the
//!    chosen [`SettlementStrategy`]
//! 4. Clears the order list and takes the held balance
//! 5. Pays the owner through [`Payout`]. This is the last effect. On failure the
//!    snapshot is restored
//! 6. Returns a [`SettlementReceipt`]
//!
//! ## Strategies
//!
//! - **DirectStorage** (`withdraw`): re-reads list length and entries from
//!   storage on every iteration
//! - **CachedCopy** (`cheaperWithdraw`): copies the list once, iterates the
//!   copy
//!
//! Both leave identical state and pay identical amounts; only the storage
//! access counts in the receipt differ.
//!
//! [`SettlementStrategy`]: fundme_types::SettlementStrategy
//! [`SettlementReceipt`]: fundme_types::SettlementReceipt

pub mod fund_me;
pub mod meter;
pub mod payout;
pub mod settler;
pub mod supply_conservation;

pub use fund_me::FundMe;
pub use meter::StorageMeter;
pub use payout::{Payout, Wallets};
pub use settler::{cheaper_withdraw, settle, withdraw};
pub use supply_conservation::SupplyConservation;
