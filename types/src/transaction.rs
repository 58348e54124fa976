//! Tracked staking transactions and their nested unbonding data.

use bitcoin::{Address, OutPoint, Transaction, Txid};

use crate::{is_withdrawable, ConfirmationInfo, CovenantSignature, StakingState};

/// One staking attempt persisted by the ledger.
///
/// `index` is assigned by the store on insertion (starting at 1) and never
/// changes afterwards. Records are never deleted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackedTransaction {
    pub index: u64,
    pub staking_tx: Transaction,
    pub staking_output_index: u32,
    /// Relative lock of the staking output, in blocks.
    pub staking_time: u16,
    /// Encoded staker address. Kept as a string so reading a record never
    /// requires knowing which network it was created on.
    pub staker_address: String,
    /// `None` until the staking transaction is confirmed on Bitcoin.
    pub staking_confirmation: Option<ConfirmationInfo>,
    /// `None` until an unbonding request exists.
    pub unbonding: Option<UnbondingData>,
    /// Identifier of the matching delegation on the remote chain.
    pub delegation_reference: String,
}

/// Unbonding transaction attached to a tracked staking transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnbondingData {
    pub unbonding_tx: Transaction,
    /// Relative lock of the unbonding output, in blocks.
    pub unbonding_time: u16,
    /// Empty until the covenant committee signs; set at most once.
    pub covenant_signatures: Vec<CovenantSignature>,
    pub confirmation: Option<ConfirmationInfo>,
}

impl UnbondingData {
    pub fn new(unbonding_tx: Transaction, unbonding_time: u16) -> Self {
        Self {
            unbonding_tx,
            unbonding_time,
            covenant_signatures: Vec::new(),
            confirmation: None,
        }
    }

    pub fn has_covenant_signatures(&self) -> bool {
        !self.covenant_signatures.is_empty()
    }
}

impl TrackedTransaction {
    /// Hash of the staking transaction; the record's external identity.
    pub fn staking_txid(&self) -> Txid {
        self.staking_tx.compute_txid()
    }

    /// True only once the staking transaction is confirmed on Bitcoin.
    pub fn is_staking_confirmed(&self) -> bool {
        self.staking_confirmation.is_some()
    }

    /// True only once the unbonding transaction is confirmed on Bitcoin.
    pub fn is_unbonding_confirmed(&self) -> bool {
        self.unbonding
            .as_ref()
            .is_some_and(|u| u.confirmation.is_some())
    }

    /// Lifecycle state derived from the persisted fields.
    pub fn state(&self) -> StakingState {
        StakingState::of(self)
    }

    /// Whether the currently locked output can be spent in the block after
    /// `best_height`.
    pub fn is_withdrawable(&self, best_height: u32) -> bool {
        is_withdrawable(self, best_height)
    }
}

/// Everything the caller supplies when a staking transaction is first tracked.
#[derive(Clone, Debug)]
pub struct NewStakingTransaction {
    pub staking_tx: Transaction,
    pub staking_output_index: u32,
    pub staking_time: u16,
    pub staker_address: Address,
    pub unbonding: Option<(Transaction, u16)>,
    pub delegation_reference: String,
}

impl NewStakingTransaction {
    pub fn new(
        staking_tx: Transaction,
        staking_output_index: u32,
        staking_time: u16,
        staker_address: Address,
        delegation_reference: impl Into<String>,
    ) -> Self {
        Self {
            staking_tx,
            staking_output_index,
            staking_time,
            staker_address,
            unbonding: None,
            delegation_reference: delegation_reference.into(),
        }
    }

    /// Attach the pre-signed unbonding transaction and its lock length.
    pub fn with_unbonding(mut self, unbonding_tx: Transaction, unbonding_time: u16) -> Self {
        self.unbonding = Some((unbonding_tx, unbonding_time));
        self
    }

    pub fn staking_txid(&self) -> Txid {
        self.staking_tx.compute_txid()
    }

    /// Every previous output consumed by the staking transaction.
    pub fn spent_outpoints(&self) -> impl Iterator<Item = OutPoint> + '_ {
        self.staking_tx.input.iter().map(|input| input.previous_output)
    }

    /// Build the record that will be persisted under `index`.
    pub fn into_tracked(self, index: u64) -> TrackedTransaction {
        TrackedTransaction {
            index,
            staking_tx: self.staking_tx,
            staking_output_index: self.staking_output_index,
            staking_time: self.staking_time,
            staker_address: self.staker_address.to_string(),
            staking_confirmation: None,
            unbonding: self
                .unbonding
                .map(|(tx, time)| UnbondingData::new(tx, time)),
            delegation_reference: self.delegation_reference,
        }
    }
}
