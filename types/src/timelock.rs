//! Timelock expiry rule used to decide which transactions are withdrawable.

use crate::TrackedTransaction;

/// Whether an output locked for `lock_length` blocks after being confirmed at
/// `confirmation_height` can be spent in the block following `best_height`.
pub fn is_timelock_expired(confirmation_height: u32, lock_length: u16, best_height: u32) -> bool {
    // The spending transaction can only land in the next block.
    let next_height = i64::from(best_height) + 1;
    next_height - i64::from(confirmation_height) - i64::from(lock_length) >= 0
}

/// Withdrawable filter over a tracked transaction.
///
/// An unconfirmed staking transaction is never withdrawable. Once unbonding is
/// confirmed the unbonding output's lock applies, otherwise the staking
/// output's lock does.
pub fn is_withdrawable(tx: &TrackedTransaction, best_height: u32) -> bool {
    let Some(staking) = tx.staking_confirmation else {
        return false;
    };

    let (confirmation_height, lock_length) = match &tx.unbonding {
        Some(unbonding) => match unbonding.confirmation {
            Some(confirmed) => (confirmed.height, unbonding.unbonding_time),
            None => (staking.height, tx.staking_time),
        },
        None => (staking.height, tx.staking_time),
    };

    is_timelock_expired(confirmation_height, lock_length, best_height)
}
