//! SymbolTable: fixed hash array whose buckets hold binary search trees.
//!
//! Each bucket root starts a tree ordered by `(tag, key bytes)`, where the
//! tag is the low byte of the full hash. Ordering on the tag first makes
//! keys inserted in sorted order land in a tree about as deep as one built
//! from random keys.

use crate::config::TableConfig;
use crate::error::TableError;
use crate::hash::{pjw_hash, tie_break_tag};
use crate::primes::is_prime;
use crate::stats::TableStats;
use core::cmp::Ordering;
use core::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};
use slotmap::{new_key_type, SlotMap};
use tracing::{debug, trace, warn};

new_key_type! {
    /// Arena index of one entry.
    struct SymbolKey;
}

// Source of table identities; 0 is never handed out.
static NEXT_TABLE_ID: AtomicU32 = AtomicU32::new(1);

fn next_table_id() -> u32 {
    NEXT_TABLE_ID.fetch_add(1, AtomicOrdering::Relaxed)
}

/// Reference to one stored symbol. It resolves only against the table
/// that returned it; any other table answers `None`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Symbol {
    key: SymbolKey,
    owner: u32,
}

impl Symbol {
    pub fn name<'a, V>(&self, table: &'a SymbolTable<V>) -> Option<&'a [u8]> {
        table.name_of(*self)
    }

    pub fn value<'a, V>(&self, table: &'a SymbolTable<V>) -> Option<&'a V> {
        table.value(*self)
    }

    pub fn value_mut<'a, V>(&self, table: &'a mut SymbolTable<V>) -> Option<&'a mut V> {
        table.value_mut(*self)
    }
}

#[derive(Debug)]
struct Entry<V> {
    left: Option<SymbolKey>,
    right: Option<SymbolKey>,
    tag: u8,
    // span of the key inside `SymbolTable::names`
    name_start: usize,
    name_len: usize,
    value: V,
}

/// The edge a new entry would hang from.
#[derive(Copy, Clone, Debug)]
enum Edge {
    Root(usize),
    Left(SymbolKey),
    Right(SymbolKey),
}

enum Probe {
    Found(SymbolKey),
    Vacant(Edge),
}

#[derive(Debug)]
pub struct SymbolTable<V> {
    id: u32,
    config: TableConfig,
    roots: Box<[Option<SymbolKey>]>,
    entries: SlotMap<SymbolKey, Entry<V>>, // owns every node; children are keys into it
    names: Vec<u8>,
}

fn log_created(config: &TableConfig) {
    if !is_prime(config.buckets) {
        warn!(
            buckets = config.buckets,
            "bucket count is not prime; keys may spread unevenly"
        );
    }
    debug!(
        buckets = config.buckets,
        max_key_len = config.max_key_len,
        "symbol table created"
    );
}

impl<V> Default for SymbolTable<V> {
    fn default() -> Self {
        let config = TableConfig::default();
        log_created(&config);
        Self::from_valid(config)
    }
}

/// Iterator over stored symbols, in arena order.
pub struct Iter<'a, V> {
    it: slotmap::basic::Iter<'a, SymbolKey, Entry<V>>,
    names: &'a [u8],
    owner: u32,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Symbol, &'a [u8], &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (names, owner) = (self.names, self.owner);
        self.it.next().map(|(key, e)| {
            (
                Symbol { key, owner },
                &names[e.name_start..e.name_start + e.name_len],
                &e.value,
            )
        })
    }
}

/// Iterator over stored symbols with mutable payloads.
pub struct IterMut<'a, V> {
    it: slotmap::basic::IterMut<'a, SymbolKey, Entry<V>>,
    names: &'a [u8],
    owner: u32,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (Symbol, &'a [u8], &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (names, owner) = (self.names, self.owner);
        self.it.next().map(|(key, e)| {
            (
                Symbol { key, owner },
                &names[e.name_start..e.name_start + e.name_len],
                &mut e.value,
            )
        })
    }
}

/// Pre-order walk yielding the depth of every node.
struct DepthWalk<'a, V> {
    table: &'a SymbolTable<V>,
    next_bucket: usize,
    stack: Vec<(SymbolKey, u32)>,
}

impl<'a, V> Iterator for DepthWalk<'a, V> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        loop {
            if let Some((k, depth)) = self.stack.pop() {
                let e = &self.table.entries[k];
                self.stack.extend(e.right.map(|r| (r, depth + 1)));
                self.stack.extend(e.left.map(|l| (l, depth + 1)));
                return Some(depth);
            }
            let root = self.table.roots.get(self.next_bucket)?;
            self.next_bucket += 1;
            self.stack.extend((*root).map(|r| (r, 1)));
        }
    }
}

impl<V> SymbolTable<V> {
    /// Table with `buckets` first-level slots. Fails on zero.
    pub fn new(buckets: usize) -> Result<Self, TableError> {
        Self::with_config(TableConfig::new(buckets))
    }

    pub fn with_config(config: TableConfig) -> Result<Self, TableError> {
        config.validate()?;
        log_created(&config);
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: TableConfig) -> Self {
        Self {
            id: next_table_id(),
            roots: vec![None; config.buckets].into_boxed_slice(),
            config,
            entries: SlotMap::with_key(),
            names: Vec::new(),
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn bucket_count(&self) -> usize {
        self.roots.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    fn bucket_of(&self, hash: u32) -> usize {
        hash as usize % self.roots.len()
    }

    #[inline]
    fn symbol(&self, key: SymbolKey) -> Symbol {
        Symbol {
            key,
            owner: self.id,
        }
    }

    /// Entry behind `sym`, if `sym` was issued by this table.
    #[inline]
    fn resolve(&self, sym: Symbol) -> Option<&Entry<V>> {
        if sym.owner != self.id {
            return None;
        }
        self.entries.get(sym.key)
    }

    #[inline]
    fn entry_name(&self, e: &Entry<V>) -> &[u8] {
        &self.names[e.name_start..e.name_start + e.name_len]
    }

    fn probe(&self, key: &[u8], hash: u32) -> Probe {
        let tag = tie_break_tag(hash);
        let bucket = self.bucket_of(hash);
        let mut edge = Edge::Root(bucket);
        let mut cur = self.roots[bucket];
        while let Some(k) = cur {
            let e = &self.entries[k];
            match tag.cmp(&e.tag).then_with(|| key.cmp(self.entry_name(e))) {
                Ordering::Equal => return Probe::Found(k),
                Ordering::Less => {
                    edge = Edge::Left(k);
                    cur = e.left;
                }
                Ordering::Greater => {
                    edge = Edge::Right(k);
                    cur = e.right;
                }
            }
        }
        Probe::Vacant(edge)
    }

    fn link(&mut self, edge: Edge, k: SymbolKey) {
        let slot = match edge {
            Edge::Root(b) => &mut self.roots[b],
            Edge::Left(parent) => &mut self.entries[parent].left,
            Edge::Right(parent) => &mut self.entries[parent].right,
        };
        debug_assert!(slot.is_none(), "linking into an occupied edge");
        *slot = Some(k);
    }

    /// Look up a key. Keys that could never be stored are just absent.
    pub fn find<Q>(&self, key: &Q) -> Option<Symbol>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        let key = key.as_ref();
        if key.len() > self.config.max_key_len {
            return None;
        }
        match self.probe(key, pjw_hash(key)) {
            Probe::Found(k) => Some(self.symbol(k)),
            Probe::Vacant(_) => None,
        }
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        self.find(key).is_some()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        self.find(key).and_then(|s| self.value(s))
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        let s = self.find(key)?;
        self.value_mut(s)
    }

    /// Return the symbol for `key`, creating it with `make()` if absent.
    ///
    /// `make` runs only when a new entry is created. The key bytes are
    /// reserved fallibly; the entry arena grows through `SlotMap`, which
    /// follows the global allocator's failure policy.
    pub fn get_or_insert_with<Q, F>(&mut self, key: &Q, make: F) -> Result<Symbol, TableError>
    where
        Q: AsRef<[u8]> + ?Sized,
        F: FnOnce() -> V,
    {
        let key = key.as_ref();
        let hash = pjw_hash(key);
        let edge = match self.probe(key, hash) {
            Probe::Found(k) => return Ok(self.symbol(k)),
            Probe::Vacant(edge) => edge,
        };

        self.config.check_key(key)?;
        if let Err(err) = self.names.try_reserve(key.len()) {
            warn!(
                key_len = key.len(),
                symbols = self.entries.len(),
                "symbol storage exhausted"
            );
            return Err(err.into());
        }

        let value = make();
        let name_start = self.names.len();
        self.names.extend_from_slice(key);
        let tag = tie_break_tag(hash);
        let k = self.entries.insert(Entry {
            left: None,
            right: None,
            tag,
            name_start,
            name_len: key.len(),
            value,
        });
        self.link(edge, k);
        trace!(
            bucket = self.bucket_of(hash),
            tag,
            key_len = key.len(),
            "symbol created"
        );
        Ok(self.symbol(k))
    }

    /// Key bytes stored for `sym`.
    pub fn name_of(&self, sym: Symbol) -> Option<&[u8]> {
        self.resolve(sym).map(|e| self.entry_name(e))
    }

    /// Key of `sym` as text, if it is valid UTF-8.
    pub fn name_str(&self, sym: Symbol) -> Option<&str> {
        self.name_of(sym).and_then(|b| core::str::from_utf8(b).ok())
    }

    pub fn value(&self, sym: Symbol) -> Option<&V> {
        self.resolve(sym).map(|e| &e.value)
    }

    pub fn value_mut(&mut self, sym: Symbol) -> Option<&mut V> {
        if sym.owner != self.id {
            return None;
        }
        self.entries.get_mut(sym.key).map(|e| &mut e.value)
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            it: self.entries.iter(),
            names: &self.names,
            owner: self.id,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            it: self.entries.iter_mut(),
            names: &self.names,
            owner: self.id,
        }
    }

    /// Check the `(tag, key)` search-tree order in every bucket.
    #[cfg(test)]
    pub(crate) fn assert_tree_order(&self) {
        type Bound<'b> = Option<(u8, &'b [u8])>;
        fn walk<W>(t: &SymbolTable<W>, k: SymbolKey, lo: Bound<'_>, hi: Bound<'_>) {
            let e = &t.entries[k];
            let me = (e.tag, t.entry_name(e));
            if let Some(lo) = lo {
                assert!(lo < me, "left bound violated");
            }
            if let Some(hi) = hi {
                assert!(me < hi, "right bound violated");
            }
            if let Some(l) = e.left {
                walk(t, l, lo, Some(me));
            }
            if let Some(r) = e.right {
                walk(t, r, Some(me), hi);
            }
        }
        for (b, root) in self.roots.iter().enumerate() {
            if let Some(r) = *root {
                let e = &self.entries[r];
                let h = pjw_hash(self.entry_name(e));
                assert_eq!(self.bucket_of(h), b, "entry stored in the wrong bucket");
                walk(self, r, None, None);
            }
        }
    }

    /// Walk every bucket and summarise the tree shapes.
    pub fn stat(&self) -> TableStats {
        let walk = DepthWalk {
            table: self,
            next_bucket: 0,
            stack: Vec::new(),
        };
        let st = TableStats::from_depths(self.roots.len(), walk);
        debug!(
            elements = st.elements,
            buckets = st.buckets,
            max_depth = st.max_depth,
            mean_depth_milli = st.mean_depth_milli,
            "symbol table stats"
        );
        st
    }
}

impl<V: Default> SymbolTable<V> {
    /// Return the symbol for `key`, creating it with a default payload.
    ///
    /// Calling this again with the same key returns the same symbol and
    /// leaves the table unchanged. Only the key bytes are reserved
    /// fallibly (`TableError::OutOfMemory`); growth of the entry arena
    /// follows the global allocator's failure policy.
    pub fn get_or_create<Q>(&mut self, key: &Q) -> Result<Symbol, TableError>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        self.get_or_insert_with(key, V::default)
    }
}
