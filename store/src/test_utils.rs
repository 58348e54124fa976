//! Fixtures for building transactions, addresses and signatures in tests.

use bitcoin::absolute::LockTime;
use bitcoin::hashes::Hash;
use bitcoin::secp256k1::{Keypair, Message, Secp256k1};
use bitcoin::transaction::Version;
use bitcoin::{
    Address, Amount, BlockHash, Network, OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut,
    Txid, Witness,
};

use staker_types::{CovenantSignature, NewStakingTransaction};

/// A transaction spending `inputs` outputs of the fake parent `[seed; 32]`.
pub fn staking_tx(seed: u8, inputs: u32) -> Transaction {
    Transaction {
        version: Version::TWO,
        lock_time: LockTime::ZERO,
        input: (0..inputs)
            .map(|vout| TxIn {
                previous_output: OutPoint::new(parent_txid(seed), vout),
                script_sig: ScriptBuf::new(),
                sequence: Sequence::MAX,
                witness: Witness::new(),
            })
            .collect(),
        output: vec![TxOut {
            value: Amount::from_sat(100_000),
            script_pubkey: ScriptBuf::new(),
        }],
    }
}

pub fn parent_txid(seed: u8) -> Txid {
    Txid::from_byte_array([seed; 32])
}

pub fn block_hash(seed: u8) -> BlockHash {
    BlockHash::from_byte_array([seed; 32])
}

pub fn regtest_address() -> Address {
    Address::p2wsh(&ScriptBuf::new(), Network::Regtest)
}

/// Staking transaction with one input and no unbonding data.
pub fn new_staking(seed: u8) -> NewStakingTransaction {
    NewStakingTransaction::new(
        staking_tx(seed, 1),
        0,
        100,
        regtest_address(),
        format!("delegation-{seed}"),
    )
}

/// Staking transaction with a pre-signed unbonding transaction attached.
pub fn new_staking_with_unbonding(seed: u8) -> NewStakingTransaction {
    new_staking(seed).with_unbonding(staking_tx(seed.wrapping_add(128), 1), 50)
}

/// A valid BIP-340 signature by a deterministic key derived from `seed`.
pub fn covenant_signature(seed: u8) -> CovenantSignature {
    let secp = Secp256k1::new();
    let mut secret = [0u8; 32];
    secret[31] = seed.max(1);
    let keypair = Keypair::from_seckey_slice(&secp, &secret).expect("non-zero secret below order");
    let msg = Message::from_digest([seed; 32]);
    let signature = secp.sign_schnorr_no_aux_rand(&msg, &keypair);
    let (public_key, _parity) = keypair.x_only_public_key();
    CovenantSignature::new(public_key, signature)
}
