//! Construction parameters for [`SymbolTable`](crate::SymbolTable).

use crate::error::TableError;

/// Bucket count of a default table.
pub const DEFAULT_BUCKETS: usize = 97;

/// Longest key accepted by default, in bytes.
pub const DEFAULT_MAX_KEY_LEN: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    /// Length of the first-level array. Should be prime.
    pub buckets: usize,
    /// Keys longer than this are rejected on creation.
    pub max_key_len: usize,
}

impl TableConfig {
    pub fn new(buckets: usize) -> Self {
        Self {
            buckets,
            ..Self::default()
        }
    }

    pub fn with_max_key_len(mut self, max_key_len: usize) -> Self {
        self.max_key_len = max_key_len;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), TableError> {
        if self.buckets == 0 {
            return Err(TableError::ZeroBuckets);
        }
        Ok(())
    }

    /// Check a key against the limits a stored key must satisfy.
    pub fn check_key(&self, key: &[u8]) -> Result<(), TableError> {
        if key.len() > self.max_key_len {
            return Err(TableError::KeyTooLong {
                len: key.len(),
                max: self.max_key_len,
            });
        }
        if let Some(position) = key.iter().position(|&b| b == 0) {
            return Err(TableError::KeyContainsNul { position });
        }
        Ok(())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            buckets: DEFAULT_BUCKETS,
            max_key_len: DEFAULT_MAX_KEY_LEN,
        }
    }
}
