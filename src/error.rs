use std::collections::TryReserveError;

/// Failures surfaced by table construction and symbol creation.
///
/// Absence is not an error: lookups return `Option`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("bucket array must have at least one bucket")]
    ZeroBuckets,

    #[error("key contains a NUL byte at offset {position}")]
    KeyContainsNul { position: usize },

    #[error("key is {len} bytes, limit is {max}")]
    KeyTooLong { len: usize, max: usize },

    #[error("out of memory while storing a symbol: {0}")]
    OutOfMemory(#[from] TryReserveError),
}
