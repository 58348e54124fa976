use bitcoin::Txid;
use thiserror::Error;

use staker_types::InputError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transaction {0} is already tracked")]
    DuplicateTransaction(Txid),

    #[error("transaction {0} not found")]
    TransactionNotFound(Txid),

    #[error("tracked transaction store is corrupted: {0}")]
    CorruptedStore(String),

    #[error("transaction {0} has no unbonding data")]
    UnbondingDataNotFound(Txid),

    #[error("unbonding signatures of transaction {0} are already set")]
    UnbondingAlreadySet(Txid),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Fatal errors that point at a damaged or mismatched database rather
    /// than at the caller's input.
    pub fn is_corruption(&self) -> bool {
        matches!(self, StoreError::CorruptedStore(_))
    }
}

impl From<InputError> for StoreError {
    fn from(e: InputError) -> Self {
        StoreError::InvalidInput(e.to_string())
    }
}
