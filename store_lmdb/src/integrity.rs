//! Ledger integrity checks.
//!
//! Run before serving queries to detect corruption early. Every problem is
//! collected into the report; only backend failures abort the check.

use std::collections::HashSet;
use std::path::Path;

use heed::RoTxn;
use serde::Serialize;
use staker_store::codec;
use staker_store::keys::{self, FIRST_INDEX, NEXT_INDEX_KEY};

use crate::{LmdbEnvironment, LmdbError};

/// Summary of an integrity check run.
#[derive(Debug, Default, Serialize)]
pub struct IntegrityReport {
    pub records_checked: u64,
    pub index_entries: u64,
    pub outpoint_entries: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Cross-check the three ledger databases against each other.
///
/// Verifies that primary keys are exactly `1..=N` with `N` matching the
/// next-index counter, that every record decodes and sits under its own
/// index, that the hash index and primary records agree in both directions,
/// and that every outpoint entry names a tracked transaction.
pub fn check_integrity(env: &LmdbEnvironment) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport::default();
    let rtxn = env.env().read_txn()?;

    let tracked = check_records(env, &rtxn, &mut report)?;
    check_hash_index(env, &rtxn, &mut report)?;
    check_outpoints(env, &rtxn, &tracked, &mut report)?;

    if report.is_healthy() {
        tracing::info!(
            records = report.records_checked,
            outpoints = report.outpoint_entries,
            "ledger integrity check passed"
        );
    } else {
        tracing::warn!(errors = report.errors.len(), "ledger integrity check failed");
    }
    Ok(report)
}

/// Walk the primary records, returning the txid keys of all decodable ones.
fn check_records(
    env: &LmdbEnvironment,
    rtxn: &RoTxn<'_>,
    report: &mut IntegrityReport,
) -> Result<HashSet<[u8; 32]>, LmdbError> {
    let mut tracked = HashSet::new();
    let mut expected = FIRST_INDEX;

    for entry in env.transactions_db.iter(rtxn)? {
        let (key, val) = entry?;
        report.records_checked += 1;

        let Some(index) = keys::index_from_bytes(key) else {
            report
                .errors
                .push(format!("primary key of {} bytes", key.len()));
            continue;
        };
        if index != expected {
            report
                .errors
                .push(format!("expected record {expected}, found {index}"));
        }
        expected = index.saturating_add(1);

        let record = match codec::decode(val) {
            Ok(record) => record,
            Err(e) => {
                report.errors.push(format!("record {index} does not decode: {e}"));
                continue;
            }
        };
        if record.index != index {
            report.errors.push(format!(
                "record stored at {index} carries index {}",
                record.index
            ));
        }

        let txid = record.staking_txid();
        let txid_key = *keys::txid_key(&txid);
        match env.tx_index_db.get(rtxn, &txid_key[..])? {
            Some(bytes) if keys::index_from_bytes(bytes) == Some(index) => {}
            Some(_) => report
                .errors
                .push(format!("hash index of {txid} does not point at record {index}")),
            None => report
                .errors
                .push(format!("record {index} ({txid}) is missing from the hash index")),
        }
        tracked.insert(txid_key);
    }

    let counter = match env.tx_index_db.get(rtxn, NEXT_INDEX_KEY)? {
        Some(bytes) => keys::index_from_bytes(bytes),
        None => Some(FIRST_INDEX),
    };
    match counter {
        Some(next) if next.checked_sub(FIRST_INDEX) == Some(report.records_checked) => {}
        Some(next) => report.errors.push(format!(
            "next index is {next} but {} records are stored",
            report.records_checked
        )),
        None => report
            .errors
            .push("next index counter has unexpected length".to_string()),
    }

    Ok(tracked)
}

/// Every hash index entry must resolve to a stored record.
fn check_hash_index(
    env: &LmdbEnvironment,
    rtxn: &RoTxn<'_>,
    report: &mut IntegrityReport,
) -> Result<(), LmdbError> {
    for entry in env.tx_index_db.iter(rtxn)? {
        let (key, val) = entry?;
        if key == NEXT_INDEX_KEY {
            continue;
        }
        report.index_entries += 1;

        let Some(txid) = keys::txid_from_bytes(key) else {
            report
                .errors
                .push(format!("hash index key of {} bytes", key.len()));
            continue;
        };
        if keys::index_from_bytes(val).is_none() {
            report
                .errors
                .push(format!("hash index entry of {txid} is malformed"));
            continue;
        }
        if env.transactions_db.get(rtxn, val)?.is_none() {
            report
                .errors
                .push(format!("{txid} is indexed but its record is missing"));
        }
    }
    Ok(())
}

fn check_outpoints(
    env: &LmdbEnvironment,
    rtxn: &RoTxn<'_>,
    tracked: &HashSet<[u8; 32]>,
    report: &mut IntegrityReport,
) -> Result<(), LmdbError> {
    for entry in env.inputs_db.iter(rtxn)? {
        let (key, val) = entry?;
        report.outpoint_entries += 1;

        let spender: Option<[u8; 32]> = val.try_into().ok();
        if key.len() != 36 || !spender.is_some_and(|txid| tracked.contains(&txid)) {
            report.errors.push(format!(
                "outpoint entry {} does not name a tracked transaction",
                report.outpoint_entries
            ));
        }
    }
    Ok(())
}

/// Check that the data directory looks like an LMDB environment before
/// opening it.
///
/// A missing or empty directory is a fresh start. A directory with other
/// contents but no `data.mdb` suggests misconfiguration.
pub fn check_data_dir(path: &Path) -> Result<(), LmdbError> {
    if !path.exists() {
        return Ok(());
    }
    if !path.is_dir() {
        return Err(LmdbError::DataDir(format!(
            "{} exists but is not a directory",
            path.display()
        )));
    }
    if path.join("data.mdb").exists() {
        return Ok(());
    }
    if std::fs::read_dir(path)?.next().is_none() {
        return Ok(());
    }
    Err(LmdbError::DataDir(format!(
        "{} is not empty but data.mdb is missing",
        path.display()
    )))
}
