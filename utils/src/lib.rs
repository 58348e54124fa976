//! Shared utilities for the staking transaction ledger.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingError};
