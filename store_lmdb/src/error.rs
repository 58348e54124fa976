use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(#[from] heed::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid data directory: {0}")]
    DataDir(String),
}

impl From<LmdbError> for staker_store::StoreError {
    fn from(e: LmdbError) -> Self {
        staker_store::StoreError::Backend(e.to_string())
    }
}
