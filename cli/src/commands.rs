//! Read-only requests against a ledger, independent of the backend.

use serde::Serialize;
use staker_store::{PageLimits, StoreError, TrackedTransactionStore, TransactionQuery};
use staker_types::{parse_outpoint, parse_txid};

use crate::view::{PageView, TransactionDetails};

/// Raw paging flags as typed by the operator.
#[derive(Clone, Copy, Debug, Default)]
pub struct PageRequest {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub reversed: bool,
}

impl PageRequest {
    pub fn query(&self, limits: &PageLimits) -> Result<TransactionQuery, StoreError> {
        let query = TransactionQuery::page(limits.page(self.offset, self.limit)?);
        Ok(if self.reversed { query.reversed() } else { query })
    }
}

#[derive(Debug, Serialize)]
pub struct OutpointStatus {
    pub outpoint: String,
    pub used: bool,
}

#[derive(Debug, Serialize)]
pub struct CountView {
    pub total: u64,
}

pub fn list<S: TrackedTransactionStore>(
    store: &S,
    limits: &PageLimits,
    page: PageRequest,
) -> Result<PageView, StoreError> {
    let query = page.query(limits)?;
    let result = store.query_transactions(&query)?;
    Ok(PageView::new(&result, &query))
}

/// Records whose timelock has expired at `best_height`.
pub fn withdrawable<S: TrackedTransactionStore>(
    store: &S,
    limits: &PageLimits,
    page: PageRequest,
    best_height: u32,
) -> Result<PageView, StoreError> {
    let query = page.query(limits)?.withdrawable(best_height);
    let result = store.query_transactions(&query)?;
    tracing::debug!(
        best_height,
        found = result.transactions.len(),
        "listed withdrawable transactions"
    );
    Ok(PageView::new(&result, &query))
}

pub fn get<S: TrackedTransactionStore>(store: &S, txid: &str) -> Result<TransactionDetails, StoreError> {
    let txid = parse_txid(txid)?;
    let tx = store.get_transaction(&txid)?;
    Ok(TransactionDetails::from(&tx))
}

pub fn outpoint_used<S: TrackedTransactionStore>(
    store: &S,
    outpoint: &str,
) -> Result<OutpointStatus, StoreError> {
    let outpoint = parse_outpoint(outpoint)?;
    Ok(OutpointStatus {
        outpoint: outpoint.to_string(),
        used: store.outpoint_used(&outpoint)?,
    })
}

pub fn count<S: TrackedTransactionStore>(store: &S) -> Result<CountView, StoreError> {
    Ok(CountView {
        total: store.transaction_count()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::OutPoint;
    use staker_store::test_utils::{block_hash, new_staking, parent_txid};
    use staker_store_lmdb::{LmdbConfig, LmdbEnvironment, LmdbTrackedTransactionStore};

    fn store_with(seeds: &[u8]) -> (tempfile::TempDir, LmdbTrackedTransactionStore) {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), &LmdbConfig { map_size: 1 << 24 }).unwrap();
        let store = env.tracked_transaction_store();
        for &seed in seeds {
            store.add_transaction(new_staking(seed)).unwrap();
        }
        (dir, store)
    }

    #[test]
    fn negative_paging_flags_are_rejected() {
        let (_dir, store) = store_with(&[1]);
        let page = PageRequest {
            offset: Some(-1),
            ..PageRequest::default()
        };
        let err = list(&store, &PageLimits::default(), page).unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));
    }

    #[test]
    fn list_clamps_limit() {
        let (_dir, store) = store_with(&[1, 2, 3]);
        let limits = PageLimits {
            default_limit: 1,
            max_limit: 2,
        };
        let page = list(&store, &limits, PageRequest::default()).unwrap();
        assert_eq!(page.transactions.len(), 1);

        let page = list(
            &store,
            &limits,
            PageRequest {
                limit: Some(50),
                ..PageRequest::default()
            },
        )
        .unwrap();
        assert_eq!(page.transactions.len(), 2);
        assert_eq!(page.total, 3);
        assert_eq!(page.last_index, 2);
        assert_eq!(page.next_offset, 2);
    }

    #[test]
    fn withdrawable_applies_the_timelock() {
        let (_dir, store) = store_with(&[1, 2]);
        // Staking time in the fixtures is 100 blocks.
        let txid = new_staking(2).staking_txid();
        store.set_staking_confirmed(&txid, block_hash(1), 10).unwrap();

        let limits = PageLimits::default();
        let early = withdrawable(&store, &limits, PageRequest::default(), 108).unwrap();
        assert!(early.transactions.is_empty());
        let ready = withdrawable(&store, &limits, PageRequest::default(), 109).unwrap();
        assert_eq!(ready.transactions.len(), 1);
        assert_eq!(ready.transactions[0].index, 2);
    }

    #[test]
    fn get_parses_display_txid() {
        let (_dir, store) = store_with(&[4]);
        let txid = new_staking(4).staking_txid();
        let details = get(&store, &txid.to_string()).unwrap();
        assert_eq!(details.summary.index, 1);

        assert!(matches!(get(&store, "zz"), Err(StoreError::InvalidInput(_))));
        let missing = parent_txid(9).to_string();
        assert!(matches!(
            get(&store, &missing),
            Err(StoreError::TransactionNotFound(_))
        ));
    }

    #[test]
    fn outpoint_lookup() {
        let (_dir, store) = store_with(&[5]);
        let spent = OutPoint::new(parent_txid(5), 0).to_string();
        assert!(outpoint_used(&store, &spent).unwrap().used);
        let unspent = OutPoint::new(parent_txid(5), 1).to_string();
        assert!(!outpoint_used(&store, &unspent).unwrap().used);
        assert!(outpoint_used(&store, "not-an-outpoint").is_err());
    }

    #[test]
    fn reversed_listing_resumes_with_next_offset() {
        let (_dir, store) = store_with(&[1, 2, 3, 4, 5, 6]);
        let limits = PageLimits::default();
        let first = PageRequest {
            limit: Some(2),
            reversed: true,
            ..PageRequest::default()
        };

        let page = list(&store, &limits, first).unwrap();
        let seen: Vec<u64> = page.transactions.iter().map(|tx| tx.index).collect();
        assert_eq!(seen, vec![5, 6]);

        let next = PageRequest {
            offset: Some(page.next_offset as i64),
            ..first
        };
        let page = list(&store, &limits, next).unwrap();
        let seen: Vec<u64> = page.transactions.iter().map(|tx| tx.index).collect();
        assert_eq!(seen, vec![3, 4]);
    }

    #[test]
    fn count_reports_total() {
        let (_dir, store) = store_with(&[1, 2, 3, 4]);
        assert_eq!(count(&store).unwrap().total, 4);
    }
}
