//! Bitcoin confirmation info attached to staking and unbonding transactions.

use bitcoin::BlockHash;

/// The block in which a tracked transaction was included.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConfirmationInfo {
    pub height: u32,
    pub block_hash: BlockHash,
}

impl ConfirmationInfo {
    pub fn new(height: u32, block_hash: BlockHash) -> Self {
        Self { height, block_hash }
    }
}
