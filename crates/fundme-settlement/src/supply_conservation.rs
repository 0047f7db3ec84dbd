//! Supply conservation invariant checker.
//!
//! Invariant enforced before every fund and settlement:
//! ```text
//! held_balance == Σ records == Σ(deposits) - Σ(withdrawals)
//! ```
//!
//! If this ever breaks, the ledger's bookkeeping has drifted from the value
//! it actually custodies and the operation is refused.

use fundme_types::{FundMeError, Result, Wei};

/// Net value in custody, plus lifetime totals for reporting.
#[derive(Debug, Clone)]
pub struct SupplyConservation {
    /// Deposits minus withdrawals. `None` once an update under- or
    /// overflowed, which can only happen after the books drifted.
    custody: Option<Wei>,
    /// Total accepted by `fund` since construction. Saturates.
    deposits: Wei,
    /// Total paid out by settlements since construction. Saturates.
    withdrawals: Wei,
}

impl Default for SupplyConservation {
    fn default() -> Self {
        Self {
            custody: Some(0),
            deposits: 0,
            withdrawals: 0,
        }
    }
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted contribution. Never fails: an impossible net
    /// balance surfaces in the next [`Self::verify`].
    pub fn record_deposit(&mut self, amount: Wei) {
        self.custody = self.custody.and_then(|held| held.checked_add(amount));
        self.deposits = self.deposits.saturating_add(amount);
    }

    /// Record a settlement payout.
    pub fn record_withdrawal(&mut self, amount: Wei) {
        self.custody = self.custody.and_then(|held| held.checked_sub(amount));
        self.withdrawals = self.withdrawals.saturating_add(amount);
    }

    /// Value that should be in custody, or `None` if the running balance
    /// left the `u128` range.
    #[must_use]
    pub fn expected_held(&self) -> Option<Wei> {
        self.custody
    }

    /// Verify the held balance against the records and the running balance.
    ///
    /// `recorded` is `None` when the record sum overflowed.
    ///
    /// # Errors
    /// Returns [`FundMeError::ReconciliationFailed`] on any mismatch.
    pub fn verify(&self, held: Wei, recorded: Option<Wei>) -> Result<()> {
        let expected = self.custody;
        if recorded != Some(held) || expected != Some(held) {
            return Err(FundMeError::ReconciliationFailed {
                reason: format!(
                    "held {held}, recorded {recorded:?}, expected {expected:?} \
                     (deposits={}, withdrawals={})",
                    self.deposits, self.withdrawals,
                ),
            });
        }
        Ok(())
    }

    /// Lifetime deposits, saturating at `u128::MAX`.
    #[must_use]
    pub fn total_deposits(&self) -> Wei {
        self.deposits
    }

    /// Lifetime withdrawals, saturating at `u128::MAX`.
    #[must_use]
    pub fn total_withdrawals(&self) -> Wei {
        self.withdrawals
    }
}
