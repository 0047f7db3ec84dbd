//! The caller-facing FundMe aggregate.
//!
//! Bundles the contribution ledger, the payout target, and the supply
//! conservation tracker behind the external interface: `fund`, `receive`,
//! `withdraw`, `cheaper_withdraw`, and the read accessors.

use fundme_ledger::{ContributionLedger, LedgerSnapshot, PriceOracle};
use fundme_types::{
    Address, LedgerConfig, LedgerState, Result, SettlementReceipt, SettlementStrategy, Wei,
};

use crate::payout::Payout;
use crate::settler;
use crate::supply_conservation::SupplyConservation;

/// A single ledger instance with its oracle and payout bound at
/// construction.
pub struct FundMe<O: PriceOracle, P: Payout> {
    ledger: ContributionLedger<O>,
    payout: P,
    supply: SupplyConservation,
}

impl<O: PriceOracle, P: Payout> FundMe<O, P> {
    /// # Errors
    /// `Configuration` if `config` fails validation.
    pub fn new(config: &LedgerConfig, price_feed: O, payout: P) -> Result<Self> {
        let ledger = ContributionLedger::new(config, price_feed)?;
        tracing::info!(
            owner = %ledger.owner(),
            price_feed = %ledger.price_feed(),
            minimum_usd = %config.minimum_usd,
            "FundMe ledger created"
        );
        Ok(Self {
            ledger,
            payout,
            supply: SupplyConservation::new(),
        })
    }

    // =================================================================
    // Operations
    // =================================================================

    /// Contribute `amount` on behalf of `contributor`.
    ///
    /// # Errors
    /// `InsufficientContribution`, `OracleUnavailable`, `ArithmeticOverflow`,
    /// or `ReconciliationFailed` if the books had already drifted.
    pub fn fund(&mut self, contributor: Address, amount: Wei) -> Result<()> {
        self.verify_reconciliation()?;
        self.ledger.fund(contributor, amount)?;
        self.supply.record_deposit(amount);
        Ok(())
    }

    /// A plain value transfer with no call data. Treated exactly like
    /// [`Self::fund`].
    ///
    /// # Errors
    /// Same as [`Self::fund`].
    pub fn receive(&mut self, contributor: Address, amount: Wei) -> Result<()> {
        self.fund(contributor, amount)
    }

    /// Owner settlement, naive strategy.
    ///
    /// # Errors
    /// `NotOwner`, `TransferFailed`, or `ReconciliationFailed`.
    pub fn withdraw(&mut self, caller: Address) -> Result<SettlementReceipt> {
        self.settle(caller, SettlementStrategy::DirectStorage)
    }

    /// Owner settlement, cached-copy strategy.
    ///
    /// # Errors
    /// `NotOwner`, `TransferFailed`, or `ReconciliationFailed`.
    pub fn cheaper_withdraw(&mut self, caller: Address) -> Result<SettlementReceipt> {
        self.settle(caller, SettlementStrategy::CachedCopy)
    }

    fn settle(&mut self, caller: Address, strategy: SettlementStrategy) -> Result<SettlementReceipt> {
        if caller == self.ledger.owner() {
            self.verify_reconciliation()?;
        }
        let receipt = settler::settle(&mut self.ledger, caller, &mut self.payout, strategy)?;
        self.supply.record_withdrawal(receipt.amount);
        Ok(receipt)
    }

    // =================================================================
    // Read accessors
    // =================================================================

    #[must_use]
    pub fn owner(&self) -> Address {
        self.ledger.owner()
    }

    #[must_use]
    pub fn price_feed(&self) -> Address {
        self.ledger.price_feed()
    }

    #[must_use]
    pub fn price_feed_version(&self) -> u64 {
        self.ledger.price_feed_version()
    }

    #[must_use]
    pub fn address_to_amount_funded(&self, addr: &Address) -> Wei {
        self.ledger.amount_funded(addr)
    }

    /// # Errors
    /// `IndexOutOfRange` if `index` is past the end of the order list.
    pub fn funder(&self, index: usize) -> Result<Address> {
        self.ledger.funder(index)
    }

    #[must_use]
    pub fn held_balance(&self) -> Wei {
        self.ledger.held_balance()
    }

    #[must_use]
    pub fn state(&self) -> LedgerState {
        self.ledger.state()
    }

    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.ledger.snapshot()
    }

    #[must_use]
    pub fn ledger(&self) -> &ContributionLedger<O> {
        &self.ledger
    }

    #[must_use]
    pub fn payout(&self) -> &P {
        &self.payout
    }

    pub fn payout_mut(&mut self) -> &mut P {
        &mut self.payout
    }

    #[must_use]
    pub fn supply(&self) -> &SupplyConservation {
        &self.supply
    }

    /// Check `held == Σ records == deposits - withdrawals`.
    ///
    /// # Errors
    /// `ReconciliationFailed` on mismatch.
    pub fn verify_reconciliation(&self) -> Result<()> {
        self.supply
            .verify(self.ledger.held_balance(), self.ledger.recorded_total())
            .inspect_err(|err| {
                tracing::error!(error = %err, "Supply conservation violated");
            })
    }
}

#[cfg(test)]
mod tests {
    use fundme_ledger::MockPriceFeed;
    use fundme_types::{FundMeError, constants::WEI_PER_ETHER};
    use rust_decimal::Decimal;

    use super::*;
    use crate::payout::Wallets;

    fn owner() -> Address {
        Address::from_low_u64(0)
    }

    fn fund_me() -> FundMe<MockPriceFeed, Wallets> {
        let feed = MockPriceFeed::with_defaults(Address::from_low_u64(0xfeed));
        FundMe::new(&LedgerConfig::new(owner()), feed, Wallets::new()).unwrap()
    }

    #[test]
    fn receive_routes_to_fund() {
        let mut fm = fund_me();
        let alice = Address::from_low_u64(1);
        fm.receive(alice, WEI_PER_ETHER).unwrap();
        assert_eq!(fm.address_to_amount_funded(&alice), WEI_PER_ETHER);
        assert_eq!(fm.funder(0).unwrap(), alice);

        let err = fm.receive(alice, 1).unwrap_err();
        assert!(matches!(err, FundMeError::InsufficientContribution { .. }));
    }

    #[test]
    fn supply_totals_follow_operations() {
        let mut fm = fund_me();
        fm.fund(Address::from_low_u64(1), WEI_PER_ETHER).unwrap();
        fm.fund(Address::from_low_u64(2), WEI_PER_ETHER).unwrap();
        assert!(fm.fund(Address::from_low_u64(3), 0).is_err());
        assert_eq!(fm.supply().total_deposits(), 2 * WEI_PER_ETHER);
        fm.verify_reconciliation().unwrap();

        fm.withdraw(owner()).unwrap();
        assert_eq!(fm.supply().total_withdrawals(), 2 * WEI_PER_ETHER);
        assert_eq!(fm.supply().expected_held(), Some(0));
        fm.verify_reconciliation().unwrap();
    }

    #[test]
    fn rejected_settlement_leaves_totals_untouched() {
        let mut fm = fund_me();
        fm.fund(Address::from_low_u64(1), WEI_PER_ETHER).unwrap();

        assert!(fm.withdraw(Address::from_low_u64(1)).is_err());
        fm.payout_mut().reject_transfers_to(owner());
        assert!(fm.cheaper_withdraw(owner()).is_err());

        assert_eq!(fm.supply().total_withdrawals(), 0);
        assert_eq!(fm.held_balance(), WEI_PER_ETHER);
        fm.verify_reconciliation().unwrap();
    }

    /// One-unit feed and a one-wei USD minimum, so any non-zero amount
    /// clears the threshold.
    fn unit_priced_fund_me() -> FundMe<MockPriceFeed, Wallets> {
        let feed = MockPriceFeed::new(Address::from_low_u64(0xfeed), 0, 1);
        let cfg = LedgerConfig::new(owner()).with_minimum_usd(Decimal::new(1, 18));
        FundMe::new(&cfg, feed, Wallets::new()).unwrap()
    }

    #[test]
    fn refund_after_settlement_with_huge_amounts() {
        let mut fm = unit_priced_fund_me();
        let alice = Address::from_low_u64(1);
        let big = u128::MAX / 2 + 1;

        for round in 0..3 {
            fm.fund(alice, big).unwrap();
            assert_eq!(fm.state(), LedgerState::Accepting, "round {round}");
            let receipt = if round % 2 == 0 {
                fm.withdraw(owner()).unwrap()
            } else {
                fm.cheaper_withdraw(owner()).unwrap()
            };
            assert_eq!(receipt.amount, big);
            assert_eq!(fm.state(), LedgerState::Empty);
            fm.verify_reconciliation().unwrap();
        }
        fm.fund(alice, big).unwrap();
        assert_eq!(fm.held_balance(), big);
    }

    #[test]
    fn large_history_keeps_error_precedence() {
        let mut fm = unit_priced_fund_me();
        let alice = Address::from_low_u64(1);
        let big = u128::MAX / 2 + 1;
        fm.fund(alice, big).unwrap();
        fm.withdraw(owner()).unwrap();
        fm.fund(alice, big).unwrap();

        let err = fm.withdraw(alice).unwrap_err();
        assert!(matches!(err, FundMeError::NotOwner { caller } if caller == alice));

        let err = fm.fund(alice, 0).unwrap_err();
        assert!(matches!(err, FundMeError::InsufficientContribution { .. }));

        // Only the ledger's own held balance can overflow now.
        let err = fm.fund(Address::from_low_u64(2), big).unwrap_err();
        assert!(matches!(
            err,
            FundMeError::ArithmeticOverflow { operation: "held balance" }
        ));
        assert_eq!(fm.held_balance(), big);
        fm.verify_reconciliation().unwrap();
    }

    #[test]
    fn accessors_expose_construction_bindings() {
        let fm = fund_me();
        assert_eq!(fm.owner(), owner());
        assert_eq!(fm.price_feed(), Address::from_low_u64(0xfeed));
        assert_eq!(fm.price_feed_version(), 0);
        assert_eq!(fm.state(), LedgerState::Empty);
        assert!(fm.snapshot().is_empty());
        assert_eq!(fm.ledger().funder_count(), 0);
        assert_eq!(fm.payout().balance_of(&owner()), 0);
    }
}
