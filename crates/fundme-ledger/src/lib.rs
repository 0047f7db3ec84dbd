//! # fundme-ledger
//!
//! **Contribution Ledger**: oracle-gated funding, per-contributor records,
//! and the contributor order list.
//!
//! ## Architecture
//!
//! 1. **PriceOracle**: read-only capability returning the latest [`PriceData`]
//! 2. **Conversion**: native amount → USD value with 18 decimals
//! 3. **ContributionLedger**: enforces the minimum, records contributions,
//!    and exposes the reset primitives the settlement engine drives
//! 4. **LedgerSnapshot**: canonical copy of ledger state, used for rollback
//!    and for state-root comparison
//!
//! ## Fund Flow
//!
//! ```text
//! fund(contributor, amount)
//!     → PriceOracle.latest_price() → freshness check → usd_value()
//!     → minimum check → record += amount, funders.push, held += amount
//! ```
//!
//! [`PriceData`]: fundme_types::PriceData

pub mod conversion;
pub mod ledger;
pub mod oracle;
pub mod snapshot;

pub use conversion::usd_value;
pub use ledger::ContributionLedger;
pub use oracle::{PriceOracle, fetch_fresh_price};
pub use snapshot::LedgerSnapshot;

#[cfg(any(test, feature = "test-helpers"))]
pub use oracle::MockPriceFeed;
