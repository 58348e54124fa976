//! LMDB implementation of TrackedTransactionStore.
//!
//! Three databases:
//! - `transactions_db`: `index_be_u64(8)` → encoded record. Big-endian keys
//!   sort by index, so cursor order is insertion order.
//! - `tx_index_db`: `txid(32)` → `index_be_u64(8)`, plus the reserved
//!   `NEXT_INDEX_KEY` → `index_be_u64(8)` counter.
//! - `inputs_db`: `prev_txid(32) ++ vout_be_u32(4)` → `txid(32)`. Entries are
//!   never removed.

use std::ops::Bound;
use std::sync::Arc;

use bitcoin::{OutPoint, Txid};
use heed::types::Bytes;
use heed::{Database, Env, RoTxn};

use staker_store::keys::{self, FIRST_INDEX, NEXT_INDEX_KEY};
use staker_store::{codec, QueryResult, StoreError, TrackedTransactionStore, TransactionQuery, Transition};
use staker_types::{NewStakingTransaction, TrackedTransaction};

use crate::LmdbError;

#[derive(Clone)]
pub struct LmdbTrackedTransactionStore {
    pub(crate) env: Arc<Env>,
    pub(crate) transactions_db: Database<Bytes, Bytes>,
    pub(crate) tx_index_db: Database<Bytes, Bytes>,
    pub(crate) inputs_db: Database<Bytes, Bytes>,
}

fn backend(e: heed::Error) -> StoreError {
    StoreError::from(LmdbError::from(e))
}

/// Decode a stored record; undecodable bytes mean the store is corrupted.
fn decode_record(index: u64, bytes: &[u8]) -> Result<TrackedTransaction, StoreError> {
    codec::decode(bytes).map_err(|e| {
        tracing::warn!(index, error = %e, "stored transaction does not decode");
        StoreError::CorruptedStore(format!("record {index} does not decode: {e}"))
    })
}

/// Decode one `(key, value)` cursor entry of `transactions_db`.
fn decode_entry(entry: heed::Result<(&[u8], &[u8])>) -> Result<TrackedTransaction, StoreError> {
    let (key, val) = entry.map_err(backend)?;
    let index = keys::index_from_bytes(key).ok_or_else(|| {
        StoreError::CorruptedStore(format!("primary key of {} bytes", key.len()))
    })?;
    decode_record(index, val)
}

impl LmdbTrackedTransactionStore {
    /// Next index to assign. Absent on a fresh store.
    fn next_index(&self, rtxn: &RoTxn<'_>) -> Result<u64, StoreError> {
        match self.tx_index_db.get(rtxn, NEXT_INDEX_KEY).map_err(backend)? {
            Some(bytes) => keys::index_from_bytes(bytes).ok_or_else(|| {
                StoreError::CorruptedStore("next index counter has unexpected length".to_string())
            }),
            None => Ok(FIRST_INDEX),
        }
    }

    fn count(&self, rtxn: &RoTxn<'_>) -> Result<u64, StoreError> {
        self.next_index(rtxn)?
            .checked_sub(FIRST_INDEX)
            .ok_or_else(|| StoreError::CorruptedStore("next index counter is zero".to_string()))
    }

    /// Resolve `txid` through the hash index and load its record.
    fn load(&self, rtxn: &RoTxn<'_>, txid: &Txid) -> Result<(u64, TrackedTransaction), StoreError> {
        let key = self
            .tx_index_db
            .get(rtxn, keys::txid_key(txid).as_slice())
            .map_err(backend)?
            .ok_or(StoreError::TransactionNotFound(*txid))?;
        let index = keys::index_from_bytes(key).ok_or_else(|| {
            StoreError::CorruptedStore(format!("hash index entry of {txid} is malformed"))
        })?;

        let Some(bytes) = self.transactions_db.get(rtxn, key).map_err(backend)? else {
            tracing::warn!(%txid, index, "hash index points at a missing record");
            return Err(StoreError::CorruptedStore(format!(
                "transaction {txid} is indexed at {index} but the record is missing"
            )));
        };
        Ok((index, decode_record(index, bytes)?))
    }
}

impl TrackedTransactionStore for LmdbTrackedTransactionStore {
    fn add_transaction(&self, new: NewStakingTransaction) -> Result<u64, StoreError> {
        let txid = new.staking_txid();
        let txid_key = *keys::txid_key(&txid);
        let spent: Vec<[u8; 36]> = new.spent_outpoints().map(|op| keys::outpoint_key(&op)).collect();

        // Dropping `wtxn` on any early return aborts the whole insert.
        let mut wtxn = self.env.write_txn().map_err(backend)?;

        if self
            .tx_index_db
            .get(&wtxn, &txid_key[..])
            .map_err(backend)?
            .is_some()
        {
            return Err(StoreError::DuplicateTransaction(txid));
        }

        let index = self.next_index(&wtxn)?;
        let record = new.into_tracked(index);
        let bytes =
            codec::encode(&record).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let key = keys::index_key(index);

        self.transactions_db
            .put(&mut wtxn, &key[..], &bytes)
            .map_err(backend)?;
        self.tx_index_db
            .put(&mut wtxn, &txid_key[..], &key[..])
            .map_err(backend)?;
        for outpoint in &spent {
            self.inputs_db
                .put(&mut wtxn, &outpoint[..], &txid_key[..])
                .map_err(backend)?;
        }
        self.tx_index_db
            .put(&mut wtxn, NEXT_INDEX_KEY, &keys::index_key(index + 1)[..])
            .map_err(backend)?;

        wtxn.commit().map_err(backend)?;
        tracing::debug!(%txid, index, inputs = spent.len(), "tracked staking transaction");
        Ok(index)
    }

    fn get_transaction(&self, txid: &Txid) -> Result<TrackedTransaction, StoreError> {
        let rtxn = self.env.read_txn().map_err(backend)?;
        let (_, record) = self.load(&rtxn, txid)?;
        Ok(record)
    }

    fn apply_transition(&self, txid: &Txid, transition: Transition) -> Result<(), StoreError> {
        let name = transition.name();
        let mut wtxn = self.env.write_txn().map_err(backend)?;

        let (index, mut record) = self.load(&wtxn, txid)?;
        transition.apply(&mut record)?;
        let bytes =
            codec::encode(&record).map_err(|e| StoreError::Serialization(e.to_string()))?;

        self.transactions_db
            .put(&mut wtxn, &keys::index_key(index)[..], &bytes)
            .map_err(backend)?;
        wtxn.commit().map_err(backend)?;

        tracing::debug!(%txid, index, transition = name, "applied transition");
        Ok(())
    }

    fn query_transactions(&self, query: &TransactionQuery) -> Result<QueryResult, StoreError> {
        let rtxn = self.env.read_txn().map_err(backend)?;
        let total = self.count(&rtxn)?;
        let paginator = query.paginator();

        let Some(window) = paginator.window(total) else {
            return Ok(QueryResult {
                transactions: Vec::new(),
                total,
            });
        };

        let start = keys::index_key(*window.start());
        let end = keys::index_key(*window.end());
        let bounds = (Bound::Included(&start[..]), Bound::Included(&end[..]));
        let accept = |tx: &TrackedTransaction| query.accepts(tx);

        let transactions = if paginator.is_reversed() {
            let iter = self.transactions_db.rev_range(&rtxn, &bounds).map_err(backend)?;
            paginator.collect(iter.map(decode_entry), accept)?
        } else {
            let iter = self.transactions_db.range(&rtxn, &bounds).map_err(backend)?;
            paginator.collect(iter.map(decode_entry), accept)?
        };

        Ok(QueryResult {
            transactions,
            total,
        })
    }

    fn scan_transactions<E, F>(&self, mut visitor: F) -> Result<(), E>
    where
        E: From<StoreError>,
        F: FnMut(TrackedTransaction) -> Result<(), E>,
    {
        let rtxn = self.env.read_txn().map_err(backend)?;
        let iter = self.transactions_db.iter(&rtxn).map_err(backend)?;
        for entry in iter {
            visitor(decode_entry(entry)?)?;
        }
        Ok(())
    }

    fn outpoint_used(&self, outpoint: &OutPoint) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(backend)?;
        let key = keys::outpoint_key(outpoint);
        let used = self.inputs_db.get(&rtxn, &key[..]).map_err(backend)?.is_some();
        Ok(used)
    }

    fn transaction_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(backend)?;
        self.count(&rtxn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LmdbConfig, LmdbEnvironment};
    use staker_store::test_utils::{
        block_hash, covenant_signature, new_staking, new_staking_with_unbonding, parent_txid,
        staking_tx,
    };
    use staker_types::StakingState;

    fn open_test_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().unwrap();
        let config = LmdbConfig { map_size: 1 << 24 };
        let env = LmdbEnvironment::open(dir.path(), &config).unwrap();
        (dir, env)
    }

    fn insert(store: &LmdbTrackedTransactionStore, seed: u8) -> Txid {
        let new = new_staking_with_unbonding(seed);
        let txid = new.staking_txid();
        store.add_transaction(new).unwrap();
        txid
    }

    fn indices(result: &QueryResult) -> Vec<u64> {
        result.transactions.iter().map(|tx| tx.index).collect()
    }

    #[test]
    fn add_and_get_transaction() {
        let (_dir, env) = open_test_env();
        let store = env.tracked_transaction_store();
        let new = new_staking_with_unbonding(1);
        let txid = new.staking_txid();
        let expected = new.clone().into_tracked(1);

        assert_eq!(store.add_transaction(new).unwrap(), 1);
        let stored = store.get_transaction(&txid).unwrap();
        assert_eq!(stored, expected);
        assert_eq!(stored.state(), StakingState::Submitted);
    }

    #[test]
    fn missing_transaction_is_not_found() {
        let (_dir, env) = open_test_env();
        let store = env.tracked_transaction_store();
        let err = store.get_transaction(&parent_txid(9)).unwrap_err();
        assert!(matches!(err, StoreError::TransactionNotFound(_)));
    }

    #[test]
    fn duplicate_insert_leaves_store_unchanged() {
        let (_dir, env) = open_test_env();
        let store = env.tracked_transaction_store();
        let txid = insert(&store, 1);
        insert(&store, 2);

        let err = store
            .add_transaction(new_staking_with_unbonding(1))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateTransaction(dup) if dup == txid));
        assert_eq!(store.transaction_count().unwrap(), 2);
        assert_eq!(store.get_transaction(&txid).unwrap().index, 1);

        // The counter did not move, so the next insert still gets index 3.
        assert_eq!(store.add_transaction(new_staking(3)).unwrap(), 3);
    }

    #[test]
    fn sequential_inserts_assign_contiguous_indices() {
        let (_dir, env) = open_test_env();
        let store = env.tracked_transaction_store();
        for seed in 1..=20u8 {
            assert_eq!(store.add_transaction(new_staking(seed)).unwrap(), u64::from(seed));
        }

        let mut seen = Vec::new();
        store
            .scan_transactions(|tx| {
                seen.push(tx.index);
                Ok::<_, StoreError>(())
            })
            .unwrap();
        assert_eq!(seen, (1..=20).collect::<Vec<u64>>());
        assert_eq!(store.transaction_count().unwrap(), 20);
    }

    #[test]
    fn concurrent_writers_never_share_an_index() {
        let (_dir, env) = open_test_env();
        let handles: Vec<_> = (0..4u8)
            .map(|worker| {
                let store = env.tracked_transaction_store();
                std::thread::spawn(move || {
                    for i in 0..5u8 {
                        store.add_transaction(new_staking(worker * 10 + i + 1)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let store = env.tracked_transaction_store();
        let all = store.all_transactions().unwrap();
        assert_eq!(all.iter().map(|tx| tx.index).collect::<Vec<_>>(), (1..=20).collect::<Vec<u64>>());
    }

    #[test]
    fn staking_confirmation_is_persisted() {
        let (_dir, env) = open_test_env();
        let store = env.tracked_transaction_store();
        let txid = insert(&store, 1);

        store.set_staking_confirmed(&txid, block_hash(1), 800).unwrap();
        let tx = store.get_transaction(&txid).unwrap();
        assert_eq!(tx.staking_confirmation.unwrap().height, 800);
        assert_eq!(tx.state(), StakingState::StakingConfirmed);

        // Re-confirmation after a reorg simply overwrites.
        store
            .set_delegation_active_and_confirmed(&txid, block_hash(2), 799)
            .unwrap();
        let tx = store.get_transaction(&txid).unwrap();
        assert_eq!(tx.staking_confirmation.unwrap().block_hash, block_hash(2));
        assert_eq!(tx.staking_confirmation.unwrap().height, 799);
    }

    #[test]
    fn transition_on_unknown_transaction_fails() {
        let (_dir, env) = open_test_env();
        let store = env.tracked_transaction_store();
        let err = store
            .set_staking_confirmed(&parent_txid(3), block_hash(1), 1)
            .unwrap_err();
        assert!(matches!(err, StoreError::TransactionNotFound(_)));
    }

    #[test]
    fn unbonding_signatures_without_unbonding_data() {
        let (_dir, env) = open_test_env();
        let store = env.tracked_transaction_store();
        let new = new_staking(1);
        let txid = new.staking_txid();
        store.add_transaction(new).unwrap();

        let err = store
            .set_unbonding_signatures_received(&txid, vec![covenant_signature(1)])
            .unwrap_err();
        assert!(matches!(err, StoreError::UnbondingDataNotFound(_)));

        let err = store
            .set_unbonding_confirmed(&txid, block_hash(1), 10)
            .unwrap_err();
        assert!(matches!(err, StoreError::UnbondingDataNotFound(_)));
    }

    #[test]
    fn unbonding_signatures_set_exactly_once() {
        let (_dir, env) = open_test_env();
        let store = env.tracked_transaction_store();
        let txid = insert(&store, 1);
        let first = vec![covenant_signature(1), covenant_signature(2)];

        store
            .set_unbonding_signatures_received(&txid, first.clone())
            .unwrap();

        for second in [first.clone(), vec![covenant_signature(3)]] {
            let err = store
                .set_unbonding_signatures_received(&txid, second)
                .unwrap_err();
            assert!(matches!(err, StoreError::UnbondingAlreadySet(_)));
        }

        let tx = store.get_transaction(&txid).unwrap();
        assert_eq!(tx.unbonding.unwrap().covenant_signatures, first);
    }

    #[test]
    fn unbonding_confirmation_is_persisted() {
        let (_dir, env) = open_test_env();
        let store = env.tracked_transaction_store();
        let txid = insert(&store, 1);

        store.set_staking_confirmed(&txid, block_hash(1), 100).unwrap();
        store
            .set_unbonding_signatures_received(&txid, vec![covenant_signature(1)])
            .unwrap();
        store.set_unbonding_confirmed(&txid, block_hash(2), 150).unwrap();

        let tx = store.get_transaction(&txid).unwrap();
        assert!(tx.is_unbonding_confirmed());
        assert_eq!(tx.state(), StakingState::UnbondingConfirmed);
    }

    #[test]
    fn query_pages_forward() {
        let (_dir, env) = open_test_env();
        let store = env.tracked_transaction_store();
        for seed in 1..=4 {
            insert(&store, seed);
        }

        let first = store
            .query_transactions(&TransactionQuery {
                offset: 0,
                limit: 2,
                ..TransactionQuery::default()
            })
            .unwrap();
        let second = store
            .query_transactions(&TransactionQuery {
                offset: 2,
                limit: 2,
                ..TransactionQuery::default()
            })
            .unwrap();

        assert_eq!(indices(&first), vec![1, 2]);
        assert_eq!(indices(&second), vec![3, 4]);
        assert_eq!(first.total, 4);
        assert_eq!(second.total, 4);
    }

    #[test]
    fn query_reversed_returns_ascending_order() {
        let (_dir, env) = open_test_env();
        let store = env.tracked_transaction_store();
        for seed in 1..=4 {
            insert(&store, seed);
        }

        let all = store
            .query_transactions(&TransactionQuery::default().reversed())
            .unwrap();
        assert_eq!(indices(&all), vec![1, 2, 3, 4]);

        let newest = store
            .query_transactions(&TransactionQuery {
                limit: 2,
                ..TransactionQuery::default().reversed()
            })
            .unwrap();
        assert_eq!(indices(&newest), vec![3, 4]);

        let skipped = store
            .query_transactions(&TransactionQuery {
                offset: 1,
                limit: 2,
                ..TransactionQuery::default().reversed()
            })
            .unwrap();
        assert_eq!(indices(&skipped), vec![2, 3]);
    }

    #[test]
    fn query_on_empty_store() {
        let (_dir, env) = open_test_env();
        let store = env.tracked_transaction_store();
        let result = store.query_transactions(&TransactionQuery::default()).unwrap();
        assert!(result.transactions.is_empty());
        assert_eq!(result.total, 0);
    }

    #[test]
    fn query_offset_past_end_is_empty_but_counts_total() {
        let (_dir, env) = open_test_env();
        let store = env.tracked_transaction_store();
        insert(&store, 1);
        let result = store
            .query_transactions(&TransactionQuery {
                offset: 5,
                ..TransactionQuery::default()
            })
            .unwrap();
        assert!(result.transactions.is_empty());
        assert_eq!(result.total, 1);
    }

    #[test]
    fn withdrawable_filter_skips_without_consuming_limit() {
        let (_dir, env) = open_test_env();
        let store = env.tracked_transaction_store();
        // staking_time is 100 and unbonding_time 50 in the fixtures.
        let a = insert(&store, 1); // unconfirmed: never withdrawable
        let b = insert(&store, 2); // staking confirmed at 10: unlocks at 109
        let c = insert(&store, 3); // staking confirmed at 500: still locked
        let d = insert(&store, 4); // unbonding confirmed at 60: unlocks at 109
        let e = insert(&store, 5); // staking confirmed at 0: unlocks at 99
        let _ = a;

        store.set_staking_confirmed(&b, block_hash(1), 10).unwrap();
        store.set_staking_confirmed(&c, block_hash(1), 500).unwrap();
        store.set_staking_confirmed(&d, block_hash(1), 5).unwrap();
        store.set_unbonding_confirmed(&d, block_hash(2), 60).unwrap();
        store.set_staking_confirmed(&e, block_hash(1), 0).unwrap();

        let at = |best: u32, offset: u64, limit: u64| {
            store
                .query_transactions(&TransactionQuery {
                    offset,
                    limit,
                    ..TransactionQuery::default().withdrawable(best)
                })
                .unwrap()
        };

        assert_eq!(indices(&at(108, 0, 10)), vec![5]);
        assert_eq!(indices(&at(109, 0, 10)), vec![2, 4, 5]);

        let page = at(109, 0, 2);
        assert_eq!(indices(&page), vec![2, 4]);
        assert_eq!(page.total, 5);

        // Resuming after the page yields the remainder.
        let next = page.resume_offset(&TransactionQuery::default().withdrawable(109));
        assert_eq!(next, 4);
        assert_eq!(indices(&at(109, next, 2)), vec![5]);
    }

    #[test]
    fn withdrawable_filter_reversed_takes_newest() {
        let (_dir, env) = open_test_env();
        let store = env.tracked_transaction_store();
        for seed in 1..=4 {
            let txid = insert(&store, seed);
            store.set_staking_confirmed(&txid, block_hash(1), 1).unwrap();
        }
        let result = store
            .query_transactions(&TransactionQuery {
                limit: 3,
                ..TransactionQuery::default().reversed().withdrawable(1_000)
            })
            .unwrap();
        assert_eq!(indices(&result), vec![2, 3, 4]);
    }

    #[test]
    fn outpoints_are_marked_used() {
        let (_dir, env) = open_test_env();
        let store = env.tracked_transaction_store();
        let new = NewStakingTransaction::new(
            staking_tx(7, 3),
            0,
            10,
            staker_store::test_utils::regtest_address(),
            "delegation",
        );
        store.add_transaction(new).unwrap();

        for vout in 0..3 {
            assert!(store.outpoint_used(&OutPoint::new(parent_txid(7), vout)).unwrap());
        }
        assert!(!store.outpoint_used(&OutPoint::new(parent_txid(7), 3)).unwrap());
        assert!(!store.outpoint_used(&OutPoint::new(parent_txid(8), 0)).unwrap());

        insert(&store, 20);
        insert(&store, 21);
        assert!(store.outpoint_used(&OutPoint::new(parent_txid(7), 2)).unwrap());
    }

    #[test]
    fn scan_stops_at_first_visitor_error() {
        #[derive(Debug)]
        enum VisitError {
            Stop(u64),
            Store(StoreError),
        }
        impl From<StoreError> for VisitError {
            fn from(e: StoreError) -> Self {
                VisitError::Store(e)
            }
        }

        let (_dir, env) = open_test_env();
        let store = env.tracked_transaction_store();
        for seed in 1..=5 {
            insert(&store, seed);
        }

        let mut visited = 0;
        let err = store
            .scan_transactions(|tx| {
                visited += 1;
                if tx.index == 3 {
                    return Err(VisitError::Stop(tx.index));
                }
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, VisitError::Stop(3)));
        assert_eq!(visited, 3);

        // Store failures reach the visitor's error type through `From`.
        let mut wtxn = env.env().write_txn().unwrap();
        env.transactions_db
            .put(&mut wtxn, &keys::index_key(2)[..], &[0xff_u8; 4][..])
            .unwrap();
        wtxn.commit().unwrap();

        let mut visited = 0;
        let err = store
            .scan_transactions(|_| {
                visited += 1;
                Ok::<_, VisitError>(())
            })
            .unwrap_err();
        match err {
            VisitError::Store(e) => assert!(e.is_corruption(), "{e}"),
            VisitError::Stop(index) => panic!("visitor did not stop at {index}"),
        }
        assert_eq!(visited, 1);
    }

    /// A staking transaction whose record needs its own overflow page.
    fn large_staking(seed: u8) -> NewStakingTransaction {
        let mut tx = staking_tx(seed, 1);
        tx.output[0].script_pubkey = bitcoin::ScriptBuf::from(vec![0x6a; 3000]);
        NewStakingTransaction::new(
            tx,
            0,
            100,
            staker_store::test_utils::regtest_address(),
            format!("delegation-{seed}"),
        )
    }

    #[test]
    fn insert_failing_inside_the_write_leaves_no_trace() {
        let dir = tempfile::tempdir().unwrap();
        let small = LmdbConfig { map_size: 1 << 16 };

        let (inserted, failed) = {
            let env = LmdbEnvironment::open(dir.path(), &small).unwrap();
            let store = env.tracked_transaction_store();
            let mut inserted = 0u64;
            let failed = loop {
                assert!(inserted < 64, "map never filled up");
                let new = large_staking(inserted as u8 + 1);
                match store.add_transaction(new.clone()) {
                    Ok(index) => {
                        inserted += 1;
                        assert_eq!(index, inserted);
                    }
                    Err(err) => {
                        assert!(matches!(err, StoreError::Backend(_)), "{err}");
                        break new;
                    }
                }
            };

            let txid = failed.staking_txid();
            assert_eq!(store.transaction_count().unwrap(), inserted);
            assert!(matches!(
                store.get_transaction(&txid),
                Err(StoreError::TransactionNotFound(_))
            ));
            for outpoint in failed.spent_outpoints() {
                assert!(!store.outpoint_used(&outpoint).unwrap());
            }
            (inserted, failed)
        };

        // With room to grow, the same insert takes the next contiguous index.
        let env = LmdbEnvironment::open(dir.path(), &LmdbConfig { map_size: 1 << 24 }).unwrap();
        let store = env.tracked_transaction_store();
        assert_eq!(store.transaction_count().unwrap(), inserted);
        assert_eq!(store.add_transaction(failed).unwrap(), inserted + 1);
        assert!(crate::check_integrity(&env).unwrap().is_healthy());
    }

    #[test]
    fn reversed_pages_resume_below_the_previous_page() {
        let (_dir, env) = open_test_env();
        let store = env.tracked_transaction_store();
        for seed in 1..=6 {
            insert(&store, seed);
        }

        let mut query = TransactionQuery {
            limit: 2,
            ..TransactionQuery::default().reversed()
        };
        let mut pages = Vec::new();
        loop {
            let page = store.query_transactions(&query).unwrap();
            if page.transactions.is_empty() {
                break;
            }
            pages.push(indices(&page));
            query.offset = page.resume_offset(&query);
        }
        assert_eq!(pages, vec![vec![5, 6], vec![3, 4], vec![1, 2]]);
    }

    #[test]
    fn reversed_filtered_pages_resume_below_the_previous_page() {
        let (_dir, env) = open_test_env();
        let store = env.tracked_transaction_store();
        for seed in 1..=6 {
            let txid = insert(&store, seed);
            // Odd records unlock long before even ones.
            let height = if seed % 2 == 1 { 1 } else { 5_000 };
            store.set_staking_confirmed(&txid, block_hash(1), height).unwrap();
        }

        let mut query = TransactionQuery {
            limit: 2,
            ..TransactionQuery::default().reversed().withdrawable(1_000)
        };
        let first = store.query_transactions(&query).unwrap();
        assert_eq!(indices(&first), vec![3, 5]);

        query.offset = first.resume_offset(&query);
        assert_eq!(query.offset, 4);
        let second = store.query_transactions(&query).unwrap();
        assert_eq!(indices(&second), vec![1]);
    }

    #[test]
    fn failed_transition_does_not_write() {
        let (_dir, env) = open_test_env();
        let store = env.tracked_transaction_store();
        let txid = insert(&store, 1);
        store
            .set_unbonding_signatures_received(&txid, vec![covenant_signature(1)])
            .unwrap();
        let before = store.get_transaction(&txid).unwrap();

        assert!(store
            .set_unbonding_signatures_received(&txid, vec![covenant_signature(2)])
            .is_err());
        assert_eq!(store.get_transaction(&txid).unwrap(), before);
    }

    #[test]
    fn missing_record_behind_index_is_corruption() {
        let (_dir, env) = open_test_env();
        let store = env.tracked_transaction_store();
        let txid = insert(&store, 1);

        let mut wtxn = env.env().write_txn().unwrap();
        env.transactions_db
            .delete(&mut wtxn, &keys::index_key(1)[..])
            .unwrap();
        wtxn.commit().unwrap();

        let err = store.get_transaction(&txid).unwrap_err();
        assert!(err.is_corruption());
        let err = store
            .set_staking_confirmed(&txid, block_hash(1), 1)
            .unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn undecodable_record_is_corruption() {
        let (_dir, env) = open_test_env();
        let store = env.tracked_transaction_store();
        let txid = insert(&store, 1);
        insert(&store, 2);

        let mut wtxn = env.env().write_txn().unwrap();
        env.transactions_db
            .put(&mut wtxn, &keys::index_key(1)[..], &[0xde_u8, 0xad][..])
            .unwrap();
        wtxn.commit().unwrap();

        assert!(store.get_transaction(&txid).unwrap_err().is_corruption());
        assert!(store
            .query_transactions(&TransactionQuery::default())
            .unwrap_err()
            .is_corruption());
        let scan = store.scan_transactions(|_| Ok::<_, StoreError>(()));
        assert!(scan.unwrap_err().is_corruption());
    }
}
