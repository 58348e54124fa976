//! JSON views printed by the subcommands.

use serde::Serialize;
use staker_store::{QueryResult, TransactionQuery};
use staker_types::{ConfirmationInfo, StakingState, TrackedTransaction, UnbondingData};

/// Summary of one tracked staking transaction.
#[derive(Debug, Serialize)]
pub struct StakingDetails {
    pub staking_txid: String,
    pub staker_address: String,
    pub state: StakingState,
    pub index: u64,
}

impl From<&TrackedTransaction> for StakingDetails {
    fn from(tx: &TrackedTransaction) -> Self {
        Self {
            staking_txid: tx.staking_txid().to_string(),
            staker_address: tx.staker_address.clone(),
            state: tx.state(),
            index: tx.index,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConfirmationView {
    pub height: u32,
    pub block_hash: String,
}

impl From<ConfirmationInfo> for ConfirmationView {
    fn from(info: ConfirmationInfo) -> Self {
        Self {
            height: info.height,
            block_hash: info.block_hash.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UnbondingView {
    pub unbonding_txid: String,
    pub unbonding_time: u16,
    pub covenant_signatures: usize,
    pub confirmation: Option<ConfirmationView>,
}

impl From<&UnbondingData> for UnbondingView {
    fn from(unbonding: &UnbondingData) -> Self {
        Self {
            unbonding_txid: unbonding.unbonding_tx.compute_txid().to_string(),
            unbonding_time: unbonding.unbonding_time,
            covenant_signatures: unbonding.covenant_signatures.len(),
            confirmation: unbonding.confirmation.map(ConfirmationView::from),
        }
    }
}

/// Everything stored about one transaction, for `get`.
#[derive(Debug, Serialize)]
pub struct TransactionDetails {
    #[serde(flatten)]
    pub summary: StakingDetails,
    pub staking_output_index: u32,
    pub staking_time: u16,
    pub delegation_reference: String,
    pub staking_confirmation: Option<ConfirmationView>,
    pub unbonding: Option<UnbondingView>,
}

impl From<&TrackedTransaction> for TransactionDetails {
    fn from(tx: &TrackedTransaction) -> Self {
        Self {
            summary: StakingDetails::from(tx),
            staking_output_index: tx.staking_output_index,
            staking_time: tx.staking_time,
            delegation_reference: tx.delegation_reference.clone(),
            staking_confirmation: tx.staking_confirmation.map(ConfirmationView::from),
            unbonding: tx.unbonding.as_ref().map(UnbondingView::from),
        }
    }
}

/// One page of a listing.
#[derive(Debug, Serialize)]
pub struct PageView {
    pub transactions: Vec<StakingDetails>,
    pub total: u64,
    /// Highest index on the page, 0 when empty.
    pub last_index: u64,
    /// Pass as `--offset` with the same flags to continue after this page.
    pub next_offset: u64,
}

impl PageView {
    pub fn new(result: &QueryResult, query: &TransactionQuery) -> Self {
        Self {
            transactions: result.transactions.iter().map(StakingDetails::from).collect(),
            total: result.total,
            last_index: result.last_index(),
            next_offset: result.resume_offset(query),
        }
    }
}
