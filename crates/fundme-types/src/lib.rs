//! # fundme-types
//!
//! Shared types, errors, and configuration for the **FundMe** contribution
//! ledger.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`SettlementId`]
//! - **Oracle model**: [`PriceData`]
//! - **Ledger model**: [`LedgerState`]
//! - **Settlement model**: [`SettlementStrategy`], [`SettlementReceipt`]
//! - **Configuration**: [`LedgerConfig`]
//! - **Errors**: [`FundMeError`] with `FM_ERR_` prefix codes
//! - **Constants**: thresholds, decimals, and mock-feed defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod price;
pub mod receipt;
pub mod state;

// Re-export all primary types at crate root for ergonomic imports:
//   use fundme_types::{Address, FundMeError, PriceData, ...};

pub use config::*;
pub use error::*;
pub use ids::*;
pub use price::*;
pub use receipt::*;
pub use state::*;

// Constants are accessed via `fundme_types::constants::FOO`
// (not re-exported to avoid name collisions).

/// Amount in the smallest native currency unit (e.g. wei).
pub type Wei = u128;
