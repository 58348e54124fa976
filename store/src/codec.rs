//! Persisted encoding of tracked transactions.
//!
//! Records are serialised with `bincode` from a versioned schema struct.
//! Bitcoin transactions are embedded as opaque consensus wire bytes and are
//! never re-interpreted here. Lock lengths are widened to 32 bits on disk and
//! range-checked back to 16 bits on decode. Optional sub-records use explicit
//! `Option` presence rather than sentinel values.

use bitcoin::consensus::encode;
use bitcoin::hashes::Hash;
use bitcoin::secp256k1::schnorr::Signature;
use bitcoin::secp256k1::XOnlyPublicKey;
use bitcoin::{BlockHash, Transaction};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use staker_types::{ConfirmationInfo, CovenantSignature, TrackedTransaction, UnbondingData};

/// Schema version written into every record.
pub const RECORD_VERSION: u8 = 1;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("unsupported record version {0}, expected {expected}", expected = RECORD_VERSION)]
    UnsupportedVersion(u8),

    #[error("malformed {field} transaction: {source}")]
    Transaction {
        field: &'static str,
        source: encode::Error,
    },

    #[error("{field} {value} exceeds the maximum of {max}", max = u16::MAX)]
    LockOutOfRange { field: &'static str, value: u32 },

    #[error("malformed covenant public key: {0}")]
    PublicKey(bitcoin::secp256k1::Error),

    #[error("malformed covenant signature: {0}")]
    Signature(bitcoin::secp256k1::Error),
}

#[derive(Serialize, Deserialize)]
struct StoredRecord {
    version: u8,
    index: u64,
    staking_tx: Vec<u8>,
    staking_output_index: u32,
    staking_time: u32,
    staker_address: String,
    staking_confirmation: Option<StoredConfirmation>,
    unbonding: Option<StoredUnbonding>,
    delegation_reference: String,
}

#[derive(Serialize, Deserialize)]
struct StoredConfirmation {
    height: u32,
    block_hash: [u8; 32],
}

#[derive(Serialize, Deserialize)]
struct StoredUnbonding {
    unbonding_tx: Vec<u8>,
    unbonding_time: u32,
    covenant_signatures: Vec<StoredCovenantSignature>,
    confirmation: Option<StoredConfirmation>,
}

#[derive(Serialize, Deserialize)]
struct StoredCovenantSignature {
    public_key: [u8; 32],
    signature: Vec<u8>,
}

/// Encode a record for storage.
pub fn encode(tx: &TrackedTransaction) -> Result<Vec<u8>, CodecError> {
    let record = StoredRecord {
        version: RECORD_VERSION,
        index: tx.index,
        staking_tx: encode::serialize(&tx.staking_tx),
        staking_output_index: tx.staking_output_index,
        staking_time: u32::from(tx.staking_time),
        staker_address: tx.staker_address.clone(),
        staking_confirmation: tx.staking_confirmation.as_ref().map(confirmation_to_stored),
        unbonding: tx.unbonding.as_ref().map(|u| StoredUnbonding {
            unbonding_tx: encode::serialize(&u.unbonding_tx),
            unbonding_time: u32::from(u.unbonding_time),
            covenant_signatures: u
                .covenant_signatures
                .iter()
                .map(|sig| StoredCovenantSignature {
                    public_key: sig.public_key.serialize(),
                    signature: sig.signature.serialize().to_vec(),
                })
                .collect(),
            confirmation: u.confirmation.as_ref().map(confirmation_to_stored),
        }),
        delegation_reference: tx.delegation_reference.clone(),
    };
    Ok(bincode::serialize(&record)?)
}

/// Decode a stored record. Any failure means the bytes were not written by a
/// compatible encoder.
pub fn decode(bytes: &[u8]) -> Result<TrackedTransaction, CodecError> {
    let record: StoredRecord = bincode::deserialize(bytes)?;
    if record.version != RECORD_VERSION {
        return Err(CodecError::UnsupportedVersion(record.version));
    }

    let unbonding = record.unbonding.map(decode_unbonding).transpose()?;

    Ok(TrackedTransaction {
        index: record.index,
        staking_tx: decode_tx("staking", &record.staking_tx)?,
        staking_output_index: record.staking_output_index,
        staking_time: narrow_lock("staking time", record.staking_time)?,
        staker_address: record.staker_address,
        staking_confirmation: record.staking_confirmation.map(confirmation_from_stored),
        unbonding,
        delegation_reference: record.delegation_reference,
    })
}

fn decode_unbonding(stored: StoredUnbonding) -> Result<UnbondingData, CodecError> {
    let covenant_signatures = stored
        .covenant_signatures
        .iter()
        .map(|sig| {
            let public_key =
                XOnlyPublicKey::from_slice(&sig.public_key).map_err(CodecError::PublicKey)?;
            let signature = Signature::from_slice(&sig.signature).map_err(CodecError::Signature)?;
            Ok(CovenantSignature::new(public_key, signature))
        })
        .collect::<Result<Vec<_>, CodecError>>()?;

    Ok(UnbondingData {
        unbonding_tx: decode_tx("unbonding", &stored.unbonding_tx)?,
        unbonding_time: narrow_lock("unbonding time", stored.unbonding_time)?,
        covenant_signatures,
        confirmation: stored.confirmation.map(confirmation_from_stored),
    })
}

fn decode_tx(field: &'static str, bytes: &[u8]) -> Result<Transaction, CodecError> {
    encode::deserialize(bytes).map_err(|source| CodecError::Transaction { field, source })
}

fn narrow_lock(field: &'static str, value: u32) -> Result<u16, CodecError> {
    u16::try_from(value).map_err(|_| CodecError::LockOutOfRange { field, value })
}

fn confirmation_to_stored(info: &ConfirmationInfo) -> StoredConfirmation {
    StoredConfirmation {
        height: info.height,
        block_hash: info.block_hash.to_byte_array(),
    }
}

fn confirmation_from_stored(stored: StoredConfirmation) -> ConfirmationInfo {
    ConfirmationInfo::new(stored.height, BlockHash::from_byte_array(stored.block_hash))
}
