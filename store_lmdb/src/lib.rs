//! LMDB storage backend for the staking transaction ledger.
//!
//! Implements [`staker_store::TrackedTransactionStore`] using the `heed` LMDB
//! bindings. The ledger lives in three named databases inside one
//! environment; every mutation is a single LMDB write transaction.

pub mod environment;
pub mod error;
pub mod integrity;
pub mod transactions;

pub use environment::{LmdbConfig, LmdbEnvironment};
pub use error::LmdbError;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
pub use transactions::LmdbTrackedTransactionStore;
