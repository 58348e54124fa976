//! Covenant committee signatures over an unbonding transaction.

use bitcoin::secp256k1::schnorr::Signature;
use bitcoin::secp256k1::XOnlyPublicKey;

/// A (public key, signature) pair from one covenant committee member.
///
/// Both halves use fixed-width BIP-340 encodings: a 32-byte x-only public key
/// and a 64-byte Schnorr signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CovenantSignature {
    pub public_key: XOnlyPublicKey,
    pub signature: Signature,
}

impl CovenantSignature {
    pub fn new(public_key: XOnlyPublicKey, signature: Signature) -> Self {
        Self {
            public_key,
            signature,
        }
    }
}
