//! Fundamental types for the staking transaction ledger.
//!
//! This crate defines the records shared by every other crate in the workspace:
//! tracked staking transactions, their unbonding data, confirmation info,
//! covenant signatures, the derived lifecycle state, and the timelock rule
//! used to decide whether funds can be withdrawn.

pub mod confirmation;
pub mod covenant;
pub mod error;
pub mod hash;
pub mod state;
pub mod timelock;
pub mod transaction;

pub use confirmation::ConfirmationInfo;
pub use covenant::CovenantSignature;
pub use error::InputError;
pub use hash::{parse_outpoint, parse_txid};
pub use state::StakingState;
pub use timelock::{is_timelock_expired, is_withdrawable};
pub use transaction::{NewStakingTransaction, TrackedTransaction, UnbondingData};
