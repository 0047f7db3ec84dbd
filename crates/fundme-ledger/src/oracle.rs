//! Price oracle capability.
//!
//! The ledger never caches prices: every `fund` call goes through
//! [`fetch_fresh_price`], which queries the oracle and rejects unusable
//! rounds (errors, non-positive answers, unsupported decimals, stale data).

use std::{rc::Rc, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use fundme_types::{Address, FundMeError, PriceData, Result};

/// Read-only source of the native-coin/USD price.
pub trait PriceOracle {
    /// Address of the feed. Fixed for the feed's lifetime.
    fn address(&self) -> Address;

    /// Latest published round.
    ///
    /// # Errors
    /// `OracleUnavailable` if the feed cannot be read.
    fn latest_price(&self) -> Result<PriceData>;

    /// Feed implementation version.
    fn version(&self) -> u64;
}

impl<T: PriceOracle + ?Sized> PriceOracle for &T {
    fn address(&self) -> Address {
        (**self).address()
    }

    fn latest_price(&self) -> Result<PriceData> {
        (**self).latest_price()
    }

    fn version(&self) -> u64 {
        (**self).version()
    }
}

impl<T: PriceOracle + ?Sized> PriceOracle for Rc<T> {
    fn address(&self) -> Address {
        (**self).address()
    }

    fn latest_price(&self) -> Result<PriceData> {
        (**self).latest_price()
    }

    fn version(&self) -> u64 {
        (**self).version()
    }
}

impl<T: PriceOracle + ?Sized> PriceOracle for Arc<T> {
    fn address(&self) -> Address {
        (**self).address()
    }

    fn latest_price(&self) -> Result<PriceData> {
        (**self).latest_price()
    }

    fn version(&self) -> u64 {
        (**self).version()
    }
}

/// Query `oracle` and validate the round it returns.
///
/// # Errors
/// `OracleUnavailable` if the query fails, the answer is not positive, the
/// decimals are unsupported, or the round is older than `max_age`.
pub fn fetch_fresh_price<O: PriceOracle + ?Sized>(
    oracle: &O,
    max_age: Option<Duration>,
    now: DateTime<Utc>,
) -> Result<PriceData> {
    let price = oracle.latest_price()?;
    price.positive_answer()?;
    price.scale()?;

    if let Some(max_age) = max_age {
        let age = price.age(now);
        if age > max_age {
            return Err(FundMeError::OracleUnavailable {
                reason: format!(
                    "stale price: updated {}s ago, limit {}s",
                    age.num_seconds(),
                    max_age.num_seconds()
                ),
            });
        }
    }

    Ok(price)
}

// ---------------------------------------------------------------------------
// Mock feed
// ---------------------------------------------------------------------------

#[cfg(any(test, feature = "test-helpers"))]
pub use mock::MockPriceFeed;

#[cfg(any(test, feature = "test-helpers"))]
mod mock {
    use std::cell::Cell;

    use chrono::{DateTime, Utc};
    use fundme_types::{Address, FundMeError, PriceData, Result, constants};

    use super::PriceOracle;

    /// In-memory aggregator with a settable answer.
    ///
    /// Share it through an `Rc` to keep updating the answer after handing
    /// it to a ledger.
    #[derive(Debug)]
    pub struct MockPriceFeed {
        address: Address,
        round: Cell<PriceData>,
        available: Cell<bool>,
    }

    impl MockPriceFeed {
        #[must_use]
        pub fn new(address: Address, decimals: u8, initial_answer: i128) -> Self {
            Self {
                address,
                round: Cell::new(PriceData::new(initial_answer, decimals, Utc::now())),
                available: Cell::new(true),
            }
        }

        /// 8 decimals, 2000 USD.
        #[must_use]
        pub fn with_defaults(address: Address) -> Self {
            Self::new(
                address,
                constants::MOCK_PRICE_DECIMALS,
                constants::MOCK_INITIAL_ANSWER,
            )
        }

        /// Publish a new answer stamped with the current time.
        pub fn update_answer(&self, answer: i128) {
            self.update_round(answer, Utc::now());
        }

        /// Publish a new answer with an explicit timestamp.
        pub fn update_round(&self, answer: i128, updated_at: DateTime<Utc>) {
            let mut round = self.round.get();
            round.answer = answer;
            round.updated_at = updated_at;
            self.round.set(round);
        }

        /// Make subsequent queries fail (or succeed again).
        pub fn set_available(&self, available: bool) {
            self.available.set(available);
        }
    }

    impl PriceOracle for MockPriceFeed {
        fn address(&self) -> Address {
            self.address
        }

        fn latest_price(&self) -> Result<PriceData> {
            if !self.available.get() {
                return Err(FundMeError::OracleUnavailable {
                    reason: format!("feed {} not responding", self.address),
                });
            }
            Ok(self.round.get())
        }

        fn version(&self) -> u64 {
            constants::MOCK_AGGREGATOR_VERSION
        }
    }
}
