//! State transitions applied to a stored record.
//!
//! The set is closed: every way a tracked transaction can change after
//! insertion is one of these variants, applied inside a single write.

use staker_types::{ConfirmationInfo, CovenantSignature, TrackedTransaction};

use crate::StoreError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Staking transaction confirmed on Bitcoin. Overwrites any earlier
    /// confirmation.
    StakingConfirmed(ConfirmationInfo),
    /// Delegation became active on the remote chain and the staking
    /// transaction is confirmed on Bitcoin.
    DelegationActiveAndConfirmed(ConfirmationInfo),
    /// Covenant committee signed the unbonding transaction.
    UnbondingSignaturesReceived(Vec<CovenantSignature>),
    /// Unbonding transaction confirmed on Bitcoin. Overwrites any earlier
    /// confirmation.
    UnbondingConfirmed(ConfirmationInfo),
}

impl Transition {
    pub fn name(&self) -> &'static str {
        match self {
            Transition::StakingConfirmed(_) => "staking_confirmed",
            Transition::DelegationActiveAndConfirmed(_) => "delegation_active_and_confirmed",
            Transition::UnbondingSignaturesReceived(_) => "unbonding_signatures_received",
            Transition::UnbondingConfirmed(_) => "unbonding_confirmed",
        }
    }

    /// Apply to a decoded record. On error the record is left untouched.
    pub fn apply(self, tx: &mut TrackedTransaction) -> Result<(), StoreError> {
        match self {
            Transition::StakingConfirmed(info) | Transition::DelegationActiveAndConfirmed(info) => {
                tx.staking_confirmation = Some(info);
            }
            Transition::UnbondingSignaturesReceived(signatures) => {
                let txid = tx.staking_txid();
                let unbonding = tx
                    .unbonding
                    .as_mut()
                    .ok_or(StoreError::UnbondingDataNotFound(txid))?;
                if unbonding.has_covenant_signatures() {
                    return Err(StoreError::UnbondingAlreadySet(txid));
                }
                if signatures.is_empty() {
                    return Err(StoreError::InvalidInput(
                        "covenant signature set must not be empty".to_string(),
                    ));
                }
                unbonding.covenant_signatures = signatures;
            }
            Transition::UnbondingConfirmed(info) => {
                let txid = tx.staking_txid();
                let unbonding = tx
                    .unbonding
                    .as_mut()
                    .ok_or(StoreError::UnbondingDataNotFound(txid))?;
                unbonding.confirmation = Some(info);
            }
        }
        Ok(())
    }
}
