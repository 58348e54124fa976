//! Parsing of transaction hashes and outpoints supplied as strings.

use std::str::FromStr;

use bitcoin::{OutPoint, Txid};

use crate::InputError;

/// Parse a transaction hash in the usual display (reversed hex) order.
pub fn parse_txid(s: &str) -> Result<Txid, InputError> {
    Txid::from_str(s.trim()).map_err(|e| InputError::InvalidHash {
        input: s.to_string(),
        reason: e.to_string(),
    })
}

/// Parse an outpoint written as `<txid>:<vout>`.
pub fn parse_outpoint(s: &str) -> Result<OutPoint, InputError> {
    OutPoint::from_str(s.trim()).map_err(|e| InputError::InvalidOutpoint {
        input: s.to_string(),
        reason: e.to_string(),
    })
}
