//! bucket-symtab: a symbol table mixing a fixed hash array with a binary
//! search tree in every bucket.
//!
//! Internal Design:
//!
//! Summary
//! - First level: the `hashpjw` fold picks one of a fixed number of
//!   buckets (`hash % buckets`). The bucket count should be prime.
//! - Second level: instead of a list, each bucket holds a binary search
//!   tree ordered by `(tag, key bytes)`. The tag is the low byte of the
//!   full hash, taken before the modulo.
//! - Ordering on the tag first scrambles the insertion order of keys that
//!   arrive sorted, so those trees end up about as deep as trees built
//!   from random keys. Single-byte keys are the exception: their hash is
//!   the byte itself, so their tags sort like the keys.
//!
//! Layers
//! - `hash`: the fold and the tag.
//! - `SymbolTable<V>`: bucket roots plus an arena (`SlotMap`) owning every
//!   entry; children are arena keys, so dropping the table frees each
//!   entry exactly once. Key bytes live in one contiguous name pool.
//! - `Symbol`: a small `Copy` handle to an entry. It resolves to the
//!   payload (`value`, `value_mut`) and back to the key (`name_of`).
//!   Each table takes a process-unique id at construction and stamps it
//!   on its handles; a handle from another table resolves to `None`.
//! - `TableStats`: element count, bucket count, maximum and mean depth.
//!
//! Constraints
//! - Entries are never removed or rebalanced; trees only grow.
//! - Lookups take `&self` and creation takes `&mut self`; the table holds
//!   no lock. It is `Send + Sync` when `V` is, so shared use goes through
//!   an external `RwLock`.
//! - A missing key is `None`, never an error. Creation fails only on a
//!   malformed key (NUL byte, over the length limit) or when the key
//!   storage cannot be reserved.
//! - Zero buckets are rejected at construction. A non-prime count is
//!   accepted with a warning.
//!
//! Logging goes through `tracing`; the library never installs a
//! subscriber.

mod config;
mod error;
pub mod hash;
pub mod primes;
mod stats;
pub mod symbol_table;
mod symbol_table_proptest;

// Public surface
pub use config::{TableConfig, DEFAULT_BUCKETS, DEFAULT_MAX_KEY_LEN};
pub use error::TableError;
pub use stats::TableStats;
pub use symbol_table::{Symbol, SymbolTable};
