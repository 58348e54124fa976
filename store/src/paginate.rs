//! Offset/limit pagination over the primary record index.
//!
//! Primary keys are the contiguous indices `1..=total`, so an ordinal offset
//! maps directly to a key to seek to. The backend positions a cursor over
//! [`Paginator::window`] (walked backwards when reversed) and feeds the decoded
//! entries to [`Paginator::collect`].

use std::ops::RangeInclusive;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paginator {
    offset: u64,
    limit: u64,
    reversed: bool,
}

impl Paginator {
    pub fn new(offset: u64, limit: u64, reversed: bool) -> Self {
        Self {
            offset,
            limit,
            reversed,
        }
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Range of keys the scan may visit, or `None` when the page is empty.
    ///
    /// Forward scans start at the `(offset + 1)`-th smallest key; reverse
    /// scans skip the `offset` largest keys and walk down towards 1.
    pub fn window(&self, total: u64) -> Option<RangeInclusive<u64>> {
        if self.limit == 0 || self.offset >= total {
            return None;
        }
        if self.reversed {
            Some(1..=total - self.offset)
        } else {
            Some(self.offset + 1..=total)
        }
    }

    /// Accumulate accepted entries until `limit` is reached.
    ///
    /// Entries rejected by `accept` do not consume the limit. The first error
    /// aborts the scan. The page is always returned in ascending key order.
    pub fn collect<T, E, I, F>(&self, entries: I, mut accept: F) -> Result<Vec<T>, E>
    where
        I: IntoIterator<Item = Result<T, E>>,
        F: FnMut(&T) -> bool,
    {
        let mut page = Vec::new();
        if self.limit == 0 {
            return Ok(page);
        }
        for entry in entries {
            let item = entry?;
            if !accept(&item) {
                continue;
            }
            page.push(item);
            if page.len() as u64 >= self.limit {
                break;
            }
        }
        if self.reversed {
            page.reverse();
        }
        Ok(page)
    }
}
