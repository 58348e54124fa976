//! Tracked transaction storage trait.

use bitcoin::{BlockHash, OutPoint, Txid};

use staker_types::{ConfirmationInfo, CovenantSignature, NewStakingTransaction, TrackedTransaction};

use crate::{QueryResult, StoreError, TransactionQuery, Transition};

/// Persistent ledger of staking transactions.
///
/// Every mutation runs in exactly one atomic write: either all of its
/// effects (record, hash index, outpoint index, counter) become visible or
/// none do. Reads run against a consistent snapshot.
pub trait TrackedTransactionStore {
    /// Track a new staking transaction and return its assigned index.
    ///
    /// Fails with [`StoreError::DuplicateTransaction`] if the staking
    /// transaction hash is already tracked. Every input of the staking
    /// transaction is recorded in the outpoint index.
    fn add_transaction(&self, new: NewStakingTransaction) -> Result<u64, StoreError>;

    /// Look up a record by staking transaction hash.
    fn get_transaction(&self, txid: &Txid) -> Result<TrackedTransaction, StoreError>;

    /// Read-modify-write a record through one of the built-in transitions.
    fn apply_transition(&self, txid: &Txid, transition: Transition) -> Result<(), StoreError>;

    /// One page of records and the unfiltered total.
    fn query_transactions(&self, query: &TransactionQuery) -> Result<QueryResult, StoreError>;

    /// Visit every record in ascending index order, stopping at the first
    /// error returned by `visitor`.
    fn scan_transactions<E, F>(&self, visitor: F) -> Result<(), E>
    where
        E: From<StoreError>,
        F: FnMut(TrackedTransaction) -> Result<(), E>;

    /// Whether any tracked staking transaction spends `outpoint`.
    fn outpoint_used(&self, outpoint: &OutPoint) -> Result<bool, StoreError>;

    /// Number of tracked transactions.
    fn transaction_count(&self) -> Result<u64, StoreError>;

    /// Record the staking confirmation. No precondition; overwrites any earlier one.
    fn set_staking_confirmed(
        &self,
        txid: &Txid,
        block_hash: BlockHash,
        height: u32,
    ) -> Result<(), StoreError> {
        let info = ConfirmationInfo::new(height, block_hash);
        self.apply_transition(txid, Transition::StakingConfirmed(info))
    }

    /// Same as [`Self::set_staking_confirmed`], issued once the delegation is active.
    fn set_delegation_active_and_confirmed(
        &self,
        txid: &Txid,
        block_hash: BlockHash,
        height: u32,
    ) -> Result<(), StoreError> {
        let info = ConfirmationInfo::new(height, block_hash);
        self.apply_transition(txid, Transition::DelegationActiveAndConfirmed(info))
    }

    /// Store covenant signatures once. Fails with
    /// [`StoreError::UnbondingDataNotFound`] without unbonding data and
    /// [`StoreError::UnbondingAlreadySet`] if signatures are already present.
    fn set_unbonding_signatures_received(
        &self,
        txid: &Txid,
        signatures: Vec<CovenantSignature>,
    ) -> Result<(), StoreError> {
        self.apply_transition(txid, Transition::UnbondingSignaturesReceived(signatures))
    }

    /// Record the unbonding confirmation, overwriting any earlier one. Fails
    /// with [`StoreError::UnbondingDataNotFound`] without unbonding data.
    fn set_unbonding_confirmed(
        &self,
        txid: &Txid,
        block_hash: BlockHash,
        height: u32,
    ) -> Result<(), StoreError> {
        let info = ConfirmationInfo::new(height, block_hash);
        self.apply_transition(txid, Transition::UnbondingConfirmed(info))
    }

    /// Every record in ascending index order.
    fn all_transactions(&self) -> Result<Vec<TrackedTransaction>, StoreError> {
        Ok(self.query_transactions(&TransactionQuery::all())?.transactions)
    }
}
