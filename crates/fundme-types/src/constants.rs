//! System-wide constants for the FundMe contribution ledger.

/// Decimal places used for USD values compared against the minimum.
pub const USD_DECIMALS: u32 = 18;

/// `10^USD_DECIMALS`.
pub const USD_SCALE: u128 = 1_000_000_000_000_000_000;

/// Default minimum contribution in whole USD.
pub const DEFAULT_MINIMUM_USD: u64 = 50;

/// Smallest native units per whole native coin (1 ether = 10^18 wei).
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Largest oracle `decimals` for which `10^decimals` fits in a `u128`.
pub const MAX_PRICE_DECIMALS: u8 = 38;

/// Decimals reported by the in-memory mock aggregator.
pub const MOCK_PRICE_DECIMALS: u8 = 8;

/// Initial answer of the mock aggregator: 2000 USD with 8 decimals.
pub const MOCK_INITIAL_ANSWER: i128 = 200_000_000_000;

/// Version reported by the mock aggregator.
pub const MOCK_AGGREGATOR_VERSION: u64 = 0;
