//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};
use serde::{Deserialize, Serialize};

use crate::{LmdbError, LmdbTrackedTransactionStore};

/// Primary records: `index_be(8)` → encoded record.
pub const TRANSACTIONS_DB: &str = "transactions";
/// Hash index: `txid(32)` → `index_be(8)`, plus the next-index counter.
pub const TRANSACTION_INDEX_DB: &str = "transaction_index";
/// Outpoint index: `prev_txid(32) ++ vout_be(4)` → `txid(32)`.
pub const INPUTS_DB: &str = "inputs";

pub(crate) const DATABASE_NAMES: &[&str] = &[TRANSACTIONS_DB, TRANSACTION_INDEX_DB, INPUTS_DB];

/// Tunables for the LMDB environment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LmdbConfig {
    /// Maximum size of the memory map, in bytes.
    #[serde(default = "default_map_size")]
    pub map_size: usize,
}

fn default_map_size() -> usize {
    1 << 30
}

impl Default for LmdbConfig {
    fn default() -> Self {
        Self {
            map_size: default_map_size(),
        }
    }
}

/// Wraps the LMDB environment and the ledger's database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    pub(crate) transactions_db: Database<Bytes, Bytes>,
    pub(crate) tx_index_db: Database<Bytes, Bytes>,
    pub(crate) inputs_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at `path` and create the ledger
    /// databases if they do not exist yet.
    pub fn open(path: &Path, config: &LmdbConfig) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per path by this process
        // and the map is never accessed outside heed.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(config.map_size)
                .max_dbs(DATABASE_NAMES.len() as u32)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let transactions_db = env.create_database(&mut wtxn, Some(TRANSACTIONS_DB))?;
        let tx_index_db = env.create_database(&mut wtxn, Some(TRANSACTION_INDEX_DB))?;
        let inputs_db = env.create_database(&mut wtxn, Some(INPUTS_DB))?;
        wtxn.commit()?;

        tracing::info!(
            path = %path.display(),
            map_size = config.map_size,
            "opened tracked transaction environment"
        );

        Ok(Self {
            env: Arc::new(env),
            transactions_db,
            tx_index_db,
            inputs_db,
        })
    }

    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }

    pub fn tracked_transaction_store(&self) -> LmdbTrackedTransactionStore {
        LmdbTrackedTransactionStore {
            env: Arc::clone(&self.env),
            transactions_db: self.transactions_db,
            tx_index_db: self.tx_index_db,
            inputs_db: self.inputs_db,
        }
    }
}
