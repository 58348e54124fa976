//! Storage layer for the staking transaction ledger.
//!
//! Backends (LMDB today) implement [`TrackedTransactionStore`]; everything
//! that is independent of the key-value engine lives here: the persisted
//! record codec, the key encodings shared by all backends, the closed set of
//! state transitions, and the pagination engine used for listing.

pub mod codec;
pub mod error;
pub mod keys;
pub mod paginate;
pub mod query;
pub mod transaction;
pub mod transition;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use codec::CodecError;
pub use error::StoreError;
pub use paginate::Paginator;
pub use query::{PageLimits, PageParams, QueryResult, TransactionQuery};
pub use transaction::TrackedTransactionStore;
pub use transition::Transition;
