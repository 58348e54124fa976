//! Listing queries and page parameters.

use serde::{Deserialize, Serialize};

use staker_types::TrackedTransaction;

use crate::{Paginator, StoreError};

pub const DEFAULT_PAGE_LIMIT: u64 = 50;
pub const MAX_PAGE_LIMIT: u64 = 100;

/// A listing request over the tracked transactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransactionQuery {
    /// Number of records to skip, counted over the unfiltered ordering.
    pub offset: u64,
    /// Maximum number of records to return.
    pub limit: u64,
    /// Scan from the newest record backwards. Pages are still returned in
    /// ascending index order.
    pub reversed: bool,
    /// Only return records whose timelock has expired at this best height.
    pub withdrawable_at: Option<u32>,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
            reversed: false,
            withdrawable_at: None,
        }
    }
}

impl TransactionQuery {
    /// Every record, in ascending order.
    pub fn all() -> Self {
        Self {
            limit: u64::MAX,
            ..Self::default()
        }
    }

    pub fn page(page: PageParams) -> Self {
        Self {
            offset: page.offset,
            limit: page.limit,
            ..Self::default()
        }
    }

    pub fn reversed(mut self) -> Self {
        self.reversed = true;
        self
    }

    pub fn withdrawable(mut self, best_height: u32) -> Self {
        self.withdrawable_at = Some(best_height);
        self
    }

    pub fn paginator(&self) -> Paginator {
        Paginator::new(self.offset, self.limit, self.reversed)
    }

    /// Predicate applied to each scanned record.
    pub fn accepts(&self, tx: &TrackedTransaction) -> bool {
        match self.withdrawable_at {
            Some(best_height) => tx.is_withdrawable(best_height),
            None => true,
        }
    }
}

/// One page of records plus the unfiltered record count.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryResult {
    pub transactions: Vec<TrackedTransaction>,
    pub total: u64,
}

impl QueryResult {
    /// Index of the last (highest) record on the page, or 0 when empty.
    pub fn last_index(&self) -> u64 {
        self.transactions.last().map_or(0, |tx| tx.index)
    }

    /// Offset that continues `query` after this page, in the query's own
    /// direction. Forward offsets count keys skipped from index 1, so they
    /// resume after the highest index; reverse offsets count keys skipped
    /// from the top, so they resume below the lowest. An empty page yields
    /// `total`, past which every query is empty.
    pub fn resume_offset(&self, query: &TransactionQuery) -> u64 {
        let (Some(first), Some(last)) = (self.transactions.first(), self.transactions.last()) else {
            return self.total;
        };
        if query.reversed {
            (self.total + 1).saturating_sub(first.index)
        } else {
            last.index
        }
    }
}

/// Validated offset/limit pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageParams {
    pub offset: u64,
    pub limit: u64,
}

/// Defaults and bounds applied to caller-supplied page parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLimits {
    #[serde(default = "default_page_limit")]
    pub default_limit: u64,
    #[serde(default = "max_page_limit")]
    pub max_limit: u64,
}

fn default_page_limit() -> u64 {
    DEFAULT_PAGE_LIMIT
}

fn max_page_limit() -> u64 {
    MAX_PAGE_LIMIT
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_LIMIT,
            max_limit: MAX_PAGE_LIMIT,
        }
    }
}

impl PageLimits {
    /// Normalise optional, possibly negative request values: negatives are
    /// rejected, a missing limit takes the default and limits are clamped.
    pub fn page(&self, offset: Option<i64>, limit: Option<i64>) -> Result<PageParams, StoreError> {
        let limit = match limit {
            None => self.default_limit,
            Some(l) => u64::try_from(l)
                .map_err(|_| StoreError::InvalidInput("limit cannot be negative".to_string()))?,
        };
        let offset = match offset {
            None => 0,
            Some(o) => u64::try_from(o)
                .map_err(|_| StoreError::InvalidInput("offset cannot be negative".to_string()))?,
        };
        Ok(PageParams {
            offset,
            limit: limit.min(self.max_limit),
        })
    }
}
