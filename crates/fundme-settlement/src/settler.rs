//! Owner-only settlement.
//!
//! One routine, parameterized by [`SettlementStrategy`]:
//! 1. Authorize (`caller == owner`)
//! 2. Snapshot the ledger
//! 3. Zero every record named in the order list, then clear the list
//! 4. Take the held balance
//! 5. Pay the owner (skipped for a zero amount)
//! 6. On any failure in 3–5, restore the snapshot

use chrono::Utc;
use fundme_ledger::{ContributionLedger, PriceOracle};
use fundme_types::{
    Address, FundMeError, Result, SettlementId, SettlementReceipt, SettlementStrategy,
};

use crate::meter::StorageMeter;
use crate::payout::Payout;

/// Settle with the naive strategy (`withdraw`).
///
/// # Errors
/// See [`settle`].
pub fn withdraw<O: PriceOracle, P: Payout + ?Sized>(
    ledger: &mut ContributionLedger<O>,
    caller: Address,
    payout: &mut P,
) -> Result<SettlementReceipt> {
    settle(ledger, caller, payout, SettlementStrategy::DirectStorage)
}

/// Settle with the cached-copy strategy (`cheaperWithdraw`).
///
/// # Errors
/// See [`settle`].
pub fn cheaper_withdraw<O: PriceOracle, P: Payout + ?Sized>(
    ledger: &mut ContributionLedger<O>,
    caller: Address,
    payout: &mut P,
) -> Result<SettlementReceipt> {
    settle(ledger, caller, payout, SettlementStrategy::CachedCopy)
}

/// Transfer the whole held balance to the owner and reset the ledger.
///
/// Settling an empty ledger succeeds with a zero-amount receipt.
///
/// # Errors
/// - `NotOwner` if `caller` is not the ledger owner (ledger untouched)
/// - `TransferFailed` if the payout fails (ledger restored)
pub fn settle<O: PriceOracle, P: Payout + ?Sized>(
    ledger: &mut ContributionLedger<O>,
    caller: Address,
    payout: &mut P,
    strategy: SettlementStrategy,
) -> Result<SettlementReceipt> {
    let owner = ledger.owner();
    if caller != owner {
        tracing::warn!(
            caller = %caller,
            entry_point = strategy.entry_point(),
            "Settlement rejected: caller is not the owner"
        );
        return Err(FundMeError::NotOwner { caller });
    }

    let snapshot = ledger.snapshot();
    match execute(ledger, owner, payout, strategy) {
        Ok(receipt) => {
            tracing::info!(
                settlement = %receipt.id,
                strategy = %strategy,
                owner = %owner,
                amount = receipt.amount,
                funders_cleared = receipt.funders_cleared,
                storage_reads = receipt.storage_reads,
                storage_writes = receipt.storage_writes,
                "Settlement complete"
            );
            Ok(receipt)
        }
        Err(err) => {
            tracing::error!(
                strategy = %strategy,
                owner = %owner,
                held = snapshot.held_balance,
                error = %err,
                "Settlement failed, ledger restored"
            );
            ledger.restore(snapshot);
            Err(err)
        }
    }
}

fn execute<O: PriceOracle, P: Payout + ?Sized>(
    ledger: &mut ContributionLedger<O>,
    owner: Address,
    payout: &mut P,
    strategy: SettlementStrategy,
) -> Result<SettlementReceipt> {
    let mut meter = StorageMeter::new();

    let funders_cleared = match strategy {
        SettlementStrategy::DirectStorage => reset_direct(ledger, &mut meter)?,
        SettlementStrategy::CachedCopy => reset_cached(ledger, &mut meter),
    };

    meter.read();
    meter.write();
    let amount = ledger.take_held_balance();

    // Value leaves custody last.
    if amount > 0 {
        payout.transfer(owner, amount)?;
    }

    Ok(SettlementReceipt {
        id: SettlementId::new(),
        strategy,
        owner,
        amount,
        funders_cleared,
        storage_reads: meter.reads(),
        storage_writes: meter.writes(),
        settled_at: Utc::now(),
    })
}

/// Walk the order list in storage: length and entry re-read every step.
fn reset_direct<O: PriceOracle>(
    ledger: &mut ContributionLedger<O>,
    meter: &mut StorageMeter,
) -> Result<usize> {
    let mut index = 0;
    loop {
        meter.read();
        if index >= ledger.funder_count() {
            break;
        }
        meter.read();
        let funder = ledger.funder(index)?;
        meter.write();
        ledger.clear_contribution(&funder);
        index += 1;
    }
    meter.write();
    ledger.clear_funders();
    Ok(index)
}

/// Copy the order list once, then walk the copy.
fn reset_cached<O: PriceOracle>(
    ledger: &mut ContributionLedger<O>,
    meter: &mut StorageMeter,
) -> usize {
    meter.read();
    let funders = ledger.funders().to_vec();
    meter.read_n(funders.len());

    for funder in &funders {
        meter.write();
        ledger.clear_contribution(funder);
    }
    meter.write();
    ledger.clear_funders();
    funders.len()
}
