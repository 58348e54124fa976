//! Lifecycle state of a tracked staking transaction.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::TrackedTransaction;

/// Where a tracked transaction is in its lifecycle.
///
/// Never persisted; always derived from the record's optional fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakingState {
    /// Submitted but not yet confirmed on Bitcoin.
    Submitted,
    /// Staking output confirmed on Bitcoin.
    StakingConfirmed,
    /// Covenant committee signed the unbonding transaction.
    UnbondingSignaturesReceived,
    /// Unbonding transaction confirmed on Bitcoin.
    UnbondingConfirmed,
}

impl StakingState {
    pub fn of(tx: &TrackedTransaction) -> Self {
        match &tx.unbonding {
            Some(u) if u.confirmation.is_some() => StakingState::UnbondingConfirmed,
            Some(u) if u.has_covenant_signatures() => StakingState::UnbondingSignaturesReceived,
            _ if tx.is_staking_confirmed() => StakingState::StakingConfirmed,
            _ => StakingState::Submitted,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StakingState::Submitted => "submitted",
            StakingState::StakingConfirmed => "staking_confirmed",
            StakingState::UnbondingSignaturesReceived => "unbonding_signatures_received",
            StakingState::UnbondingConfirmed => "unbonding_confirmed",
        }
    }
}

impl fmt::Display for StakingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
