//! Binary key layout shared by every backend.
//!
//! - primary records: `index_be_u64(8)`; big-endian so keys sort by index.
//! - hash index: `txid(32)` → `index_be_u64(8)`, plus [`NEXT_INDEX_KEY`]
//!   holding the next index to assign.
//! - outpoint index: `prev_txid(32) ++ vout_be_u32(4)` → `txid(32)`.

use bitcoin::hashes::Hash;
use bitcoin::{OutPoint, Txid};

/// Reserved hash-index key for the next-available-index counter. Shorter than
/// a transaction hash, so it can never collide with one.
pub const NEXT_INDEX_KEY: &[u8] = b"next_index";

/// Indices start at 1; the counter is absent on a fresh store.
pub const FIRST_INDEX: u64 = 1;

pub fn index_key(index: u64) -> [u8; 8] {
    index.to_be_bytes()
}

/// Decode an 8-byte big-endian index, rejecting any other length.
pub fn index_from_bytes(bytes: &[u8]) -> Option<u64> {
    let arr: [u8; 8] = bytes.try_into().ok()?;
    Some(u64::from_be_bytes(arr))
}

pub fn txid_key(txid: &Txid) -> &[u8; 32] {
    txid.as_byte_array()
}

pub fn txid_from_bytes(bytes: &[u8]) -> Option<Txid> {
    let arr: [u8; 32] = bytes.try_into().ok()?;
    Some(Txid::from_byte_array(arr))
}

/// Build the 36-byte outpoint key `prev_txid ++ vout_be_u32`.
pub fn outpoint_key(outpoint: &OutPoint) -> [u8; 36] {
    let mut key = [0u8; 36];
    key[..32].copy_from_slice(outpoint.txid.as_byte_array());
    key[32..].copy_from_slice(&outpoint.vout.to_be_bytes());
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_keys_sort_numerically() {
        assert!(index_key(255) < index_key(256));
        assert!(index_key(1) < index_key(u64::MAX));
    }

    #[test]
    fn index_from_bytes_rejects_wrong_length() {
        assert_eq!(index_from_bytes(&index_key(42)), Some(42));
        assert_eq!(index_from_bytes(NEXT_INDEX_KEY), None);
        assert_eq!(index_from_bytes(&[0u8; 7]), None);
    }

    #[test]
    fn outpoint_key_layout() {
        let txid = Txid::from_byte_array([0xab; 32]);
        let key = outpoint_key(&OutPoint::new(txid, 0x0102_0304));
        assert_eq!(&key[..32], &[0xab; 32]);
        assert_eq!(&key[32..], &[1, 2, 3, 4]);
    }

    #[test]
    fn counter_key_cannot_collide_with_txid() {
        assert_ne!(NEXT_INDEX_KEY.len(), 32);
        assert!(txid_from_bytes(NEXT_INDEX_KEY).is_none());
    }
}
