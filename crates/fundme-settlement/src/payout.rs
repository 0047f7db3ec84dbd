//! Value transfer out of custody.
//!
//! [`Payout`] is the capability settlement uses to move the held balance to
//! the owner. [`Wallets`] is an in-memory implementation tracking external
//! balances, with the option to reject transfers to chosen recipients.

use std::collections::{HashMap, HashSet};

use fundme_types::{Address, FundMeError, Result, Wei};

/// Moves value to an external account.
pub trait Payout {
    /// Credit `amount` to `to`.
    ///
    /// # Errors
    /// `TransferFailed` if the recipient cannot accept the value. A failed
    /// transfer must leave the payout state unchanged.
    fn transfer(&mut self, to: Address, amount: Wei) -> Result<()>;
}

impl<T: Payout + ?Sized> Payout for &mut T {
    fn transfer(&mut self, to: Address, amount: Wei) -> Result<()> {
        (**self).transfer(to, amount)
    }
}

/// External account balances.
#[derive(Debug, Default)]
pub struct Wallets {
    balances: HashMap<Address, Wei>,
    rejecting: HashSet<Address>,
}

impl Wallets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an external balance.
    pub fn set_balance(&mut self, addr: Address, amount: Wei) {
        self.balances.insert(addr, amount);
    }

    /// External balance of `addr`. Zero for unknown addresses.
    #[must_use]
    pub fn balance_of(&self, addr: &Address) -> Wei {
        self.balances.get(addr).copied().unwrap_or(0)
    }

    /// Make transfers to `addr` fail from now on.
    pub fn reject_transfers_to(&mut self, addr: Address) {
        self.rejecting.insert(addr);
    }

    /// Accept transfers to `addr` again.
    pub fn accept_transfers_to(&mut self, addr: &Address) {
        self.rejecting.remove(addr);
    }
}

impl Payout for Wallets {
    fn transfer(&mut self, to: Address, amount: Wei) -> Result<()> {
        if self.rejecting.contains(&to) {
            return Err(FundMeError::TransferFailed {
                to,
                amount,
                reason: "recipient rejected the transfer".into(),
            });
        }
        let current = self.balance_of(&to);
        let updated = current
            .checked_add(amount)
            .ok_or_else(|| FundMeError::TransferFailed {
                to,
                amount,
                reason: "recipient balance overflow".into(),
            })?;
        self.balances.insert(to, updated);
        Ok(())
    }
}
