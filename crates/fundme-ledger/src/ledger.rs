//! The contribution ledger.
//!
//! Owns the contributor → amount map, the contributor order list, and the
//! held balance. All mutations are atomic: every check (oracle, minimum,
//! overflow) runs before the first write, so a failed `fund` leaves the
//! ledger untouched.
//!
//! The reset primitives (`clear_contribution`, `clear_funders`,
//! `take_held_balance`, `restore`) exist for the settlement engine, which
//! owns the authorization check and the rollback.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use fundme_types::{
    Address, FundMeError, LedgerConfig, LedgerState, PriceData, Result, Wei,
};

use crate::conversion::usd_value;
use crate::oracle::{PriceOracle, fetch_fresh_price};
use crate::snapshot::LedgerSnapshot;

/// Oracle-gated record of who contributed how much.
///
/// Invariant: `held_balance == Σ address_to_amount_funded`.
pub struct ContributionLedger<O: PriceOracle> {
    /// Sole settlement authority. Never reassigned.
    owner: Address,
    /// Price source, bound at construction.
    price_feed: O,
    /// Minimum contribution in USD with 18 decimals.
    minimum_usd: u128,
    /// Oldest acceptable oracle round, if limited.
    max_price_age: Option<Duration>,
    /// Contributor → cumulative amount.
    address_to_amount_funded: HashMap<Address, Wei>,
    /// One entry per successful `fund`, in call order.
    funders: Vec<Address>,
    /// Value currently in custody.
    held_balance: Wei,
}

impl<O: PriceOracle> ContributionLedger<O> {
    /// Create an empty ledger bound to `price_feed`.
    ///
    /// # Errors
    /// `Configuration` if `config` fails validation.
    pub fn new(config: &LedgerConfig, price_feed: O) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            owner: config.owner,
            minimum_usd: config.minimum_usd_scaled()?,
            max_price_age: config.max_price_age(),
            price_feed,
            address_to_amount_funded: HashMap::new(),
            funders: Vec::new(),
            held_balance: 0,
        })
    }

    // =================================================================
    // Funding
    // =================================================================

    /// Accept `amount` from `contributor`.
    ///
    /// # Errors
    /// - `OracleUnavailable` if no usable price can be read
    /// - `InsufficientContribution` if the USD value is below the minimum
    /// - `ArithmeticOverflow` if conversion or accumulation overflows
    pub fn fund(&mut self, contributor: Address, amount: Wei) -> Result<()> {
        let price = self.fresh_price().inspect_err(|err| {
            tracing::warn!(
                contributor = %contributor,
                feed = %self.price_feed.address(),
                error = %err,
                "Contribution rejected: oracle unavailable"
            );
        })?;

        let usd = usd_value(amount, &price)?;
        if usd < self.minimum_usd {
            tracing::warn!(
                contributor = %contributor,
                amount,
                usd_value = usd,
                minimum = self.minimum_usd,
                "Contribution rejected: below minimum"
            );
            return Err(FundMeError::InsufficientContribution {
                usd_value: usd,
                minimum: self.minimum_usd,
            });
        }

        let previous = self.amount_funded(&contributor);
        let record = previous
            .checked_add(amount)
            .ok_or(FundMeError::ArithmeticOverflow {
                operation: "contribution record",
            })?;
        let held = self
            .held_balance
            .checked_add(amount)
            .ok_or(FundMeError::ArithmeticOverflow {
                operation: "held balance",
            })?;

        // Commit. Nothing below can fail.
        self.address_to_amount_funded.insert(contributor, record);
        self.funders.push(contributor);
        self.held_balance = held;

        tracing::debug!(
            contributor = %contributor,
            amount,
            usd_value = usd,
            total = record,
            held = held,
            "Contribution accepted"
        );
        Ok(())
    }

    fn fresh_price(&self) -> Result<PriceData> {
        fetch_fresh_price(&self.price_feed, self.max_price_age, Utc::now())
    }

    // =================================================================
    // Read accessors
    // =================================================================

    #[must_use]
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Address of the bound price feed.
    #[must_use]
    pub fn price_feed(&self) -> Address {
        self.price_feed.address()
    }

    #[must_use]
    pub fn price_feed_version(&self) -> u64 {
        self.price_feed.version()
    }

    /// Cumulative amount funded by `addr`. Zero for unknown addresses.
    #[must_use]
    pub fn amount_funded(&self, addr: &Address) -> Wei {
        self.address_to_amount_funded
            .get(addr)
            .copied()
            .unwrap_or(0)
    }

    /// Contributor at position `index` of the order list.
    ///
    /// # Errors
    /// `IndexOutOfRange` if `index >= funder_count()`.
    pub fn funder(&self, index: usize) -> Result<Address> {
        self.funders
            .get(index)
            .copied()
            .ok_or(FundMeError::IndexOutOfRange {
                index,
                len: self.funders.len(),
            })
    }

    #[must_use]
    pub fn funder_count(&self) -> usize {
        self.funders.len()
    }

    #[must_use]
    pub fn funders(&self) -> &[Address] {
        &self.funders
    }

    #[must_use]
    pub fn held_balance(&self) -> Wei {
        self.held_balance
    }

    /// Minimum contribution in USD with 18 decimals.
    #[must_use]
    pub fn minimum_usd(&self) -> u128 {
        self.minimum_usd
    }

    #[must_use]
    pub fn state(&self) -> LedgerState {
        LedgerState::from_held(self.held_balance)
    }

    /// Sum of all contributor records, or `None` on overflow.
    #[must_use]
    pub fn recorded_total(&self) -> Option<Wei> {
        self.address_to_amount_funded
            .values()
            .try_fold(0u128, |acc, amount| acc.checked_add(*amount))
    }

    // =================================================================
    // Reset primitives (driven by the settlement engine)
    // =================================================================

    /// Zero the record of `addr`.
    pub fn clear_contribution(&mut self, addr: &Address) {
        self.address_to_amount_funded.remove(addr);
    }

    /// Empty the contributor order list.
    pub fn clear_funders(&mut self) {
        self.funders.clear();
    }

    /// Set the held balance to zero and return what it was.
    pub fn take_held_balance(&mut self) -> Wei {
        std::mem::take(&mut self.held_balance)
    }

    /// Copy the mutable state.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            records: self
                .address_to_amount_funded
                .iter()
                .filter(|(_, amount)| **amount > 0)
                .map(|(addr, amount)| (*addr, *amount))
                .collect(),
            funders: self.funders.clone(),
            held_balance: self.held_balance,
        }
    }

    /// Replace the mutable state with `snapshot`.
    pub fn restore(&mut self, snapshot: LedgerSnapshot) {
        self.address_to_amount_funded = snapshot.records.into_iter().collect();
        self.funders = snapshot.funders;
        self.held_balance = snapshot.held_balance;
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use fundme_types::constants::{USD_SCALE, WEI_PER_ETHER};

    use super::*;
    use crate::oracle::MockPriceFeed;

    const ONE_ETHER: Wei = WEI_PER_ETHER;

    fn owner() -> Address {
        Address::from_low_u64(0)
    }

    fn feed_addr() -> Address {
        Address::from_low_u64(0xfeed)
    }

    fn setup() -> (ContributionLedger<Rc<MockPriceFeed>>, Rc<MockPriceFeed>) {
        let feed = Rc::new(MockPriceFeed::with_defaults(feed_addr()));
        let ledger =
            ContributionLedger::new(&LedgerConfig::new(owner()), Rc::clone(&feed)).unwrap();
        (ledger, feed)
    }

    #[test]
    fn constructor_binds_price_feed_and_owner() {
        let (ledger, _) = setup();
        assert_eq!(ledger.price_feed(), feed_addr());
        assert_eq!(ledger.owner(), owner());
        assert_eq!(ledger.price_feed_version(), 0);
        assert_eq!(ledger.minimum_usd(), 50 * USD_SCALE);
        assert_eq!(ledger.state(), LedgerState::Empty);
    }

    #[test]
    fn invalid_config_rejected() {
        let feed = MockPriceFeed::with_defaults(feed_addr());
        let err = ContributionLedger::new(&LedgerConfig::new(Address::ZERO), feed)
            .err()
            .unwrap();
        assert!(matches!(err, FundMeError::Configuration(_)));
    }

    #[test]
    fn zero_value_fund_fails() {
        let (mut ledger, _) = setup();
        let err = ledger.fund(owner(), 0).unwrap_err();
        assert!(matches!(err, FundMeError::InsufficientContribution { .. }));
        assert_eq!(ledger.held_balance(), 0);
        assert_eq!(ledger.funder_count(), 0);
    }

    #[test]
    fn fund_updates_amount_funded() {
        let (mut ledger, _) = setup();
        ledger.fund(owner(), ONE_ETHER).unwrap();
        assert_eq!(ledger.amount_funded(&owner()), ONE_ETHER);
        assert_eq!(ledger.held_balance(), ONE_ETHER);
        assert_eq!(ledger.state(), LedgerState::Accepting);
    }

    #[test]
    fn fund_appends_funder() {
        let (mut ledger, _) = setup();
        ledger.fund(owner(), ONE_ETHER).unwrap();
        assert_eq!(ledger.funder(0).unwrap(), owner());
    }

    #[test]
    fn repeat_funder_accumulates_and_duplicates() {
        let (mut ledger, _) = setup();
        let alice = Address::from_low_u64(1);
        ledger.fund(alice, ONE_ETHER).unwrap();
        ledger.fund(alice, 2 * ONE_ETHER).unwrap();
        assert_eq!(ledger.amount_funded(&alice), 3 * ONE_ETHER);
        assert_eq!(ledger.funders(), &[alice, alice]);
        assert_eq!(ledger.recorded_total(), Some(3 * ONE_ETHER));
    }

    #[test]
    fn threshold_is_inclusive() {
        let (mut ledger, _) = setup();
        // 50 USD at 2000 USD/ETH = 0.025 ETH
        let exact = ONE_ETHER / 40;
        let err = ledger.fund(owner(), exact - 1).unwrap_err();
        assert!(matches!(err, FundMeError::InsufficientContribution { .. }));
        ledger.fund(owner(), exact).unwrap();
        assert_eq!(ledger.held_balance(), exact);
    }

    #[test]
    fn threshold_tracks_latest_price() {
        let (mut ledger, feed) = setup();
        let amount = ONE_ETHER / 40; // 50 USD at 2000

        // Price halves: the same amount is now worth 25 USD.
        feed.update_answer(100_000_000_000);
        assert!(ledger.fund(owner(), amount).is_err());

        feed.update_answer(200_000_000_000);
        assert!(ledger.fund(owner(), amount).is_ok());
    }

    #[test]
    fn unavailable_oracle_fails_without_state_change() {
        let (mut ledger, feed) = setup();
        feed.set_available(false);
        let err = ledger.fund(owner(), ONE_ETHER).unwrap_err();
        assert!(matches!(err, FundMeError::OracleUnavailable { .. }));
        assert_eq!(ledger.held_balance(), 0);
        assert!(ledger.funder(0).is_err());
    }

    #[test]
    fn stale_oracle_fails_when_limit_configured() {
        let feed = Rc::new(MockPriceFeed::with_defaults(feed_addr()));
        let cfg = LedgerConfig::new(owner()).with_max_price_age_secs(60);
        let mut ledger = ContributionLedger::new(&cfg, Rc::clone(&feed)).unwrap();

        feed.update_round(200_000_000_000, Utc::now() - Duration::seconds(3600));
        let err = ledger.fund(owner(), ONE_ETHER).unwrap_err();
        assert!(matches!(err, FundMeError::OracleUnavailable { .. }));

        feed.update_answer(200_000_000_000);
        ledger.fund(owner(), ONE_ETHER).unwrap();
    }

    #[test]
    fn overflow_leaves_state_unchanged() {
        let feed = MockPriceFeed::new(feed_addr(), 0, 1);
        let cfg = LedgerConfig::new(owner()).with_minimum_usd(rust_decimal::Decimal::new(1, 18));
        let mut ledger = ContributionLedger::new(&cfg, feed).unwrap();

        ledger.fund(owner(), u128::MAX - 5).unwrap();
        let err = ledger.fund(owner(), 10).unwrap_err();
        assert!(matches!(err, FundMeError::ArithmeticOverflow { .. }));
        assert_eq!(ledger.held_balance(), u128::MAX - 5);
        assert_eq!(ledger.funder_count(), 1);
    }

    #[test]
    fn funder_out_of_range() {
        let (ledger, _) = setup();
        let err = ledger.funder(0).unwrap_err();
        assert!(matches!(
            err,
            FundMeError::IndexOutOfRange { index: 0, len: 0 }
        ));
    }

    #[test]
    fn unknown_address_has_zero_funded() {
        let (ledger, _) = setup();
        assert_eq!(ledger.amount_funded(&Address::from_low_u64(99)), 0);
    }

    #[test]
    fn snapshot_restore_roundtrip() {
        let (mut ledger, _) = setup();
        let alice = Address::from_low_u64(1);
        ledger.fund(alice, ONE_ETHER).unwrap();
        let before = ledger.snapshot();

        ledger.clear_contribution(&alice);
        ledger.clear_funders();
        assert_eq!(ledger.take_held_balance(), ONE_ETHER);
        assert!(ledger.snapshot().is_empty());

        ledger.restore(before.clone());
        assert_eq!(ledger.snapshot(), before);
        assert_eq!(ledger.amount_funded(&alice), ONE_ETHER);
        assert_eq!(ledger.funder(0).unwrap(), alice);
    }
}
