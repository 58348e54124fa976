//! Errors raised while parsing caller-supplied values at the boundary.

use thiserror::Error;

/// Malformed input rejected before it reaches the store.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("invalid transaction hash '{input}': {reason}")]
    InvalidHash { input: String, reason: String },

    #[error("invalid outpoint '{input}': {reason}")]
    InvalidOutpoint { input: String, reason: String },
}
