#![cfg(test)]

// Property tests for SymbolTable kept inside the crate so they can check
// the tree order through internal helpers.

use crate::symbol_table::{Symbol, SymbolTable};
use proptest::prelude::*;
use std::cell::Cell;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Create(usize),
    CreateWith(usize, i32),
    Find(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
    Stat,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z0-9]{0,6}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            idx.clone().prop_map(OpI::Create),
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::CreateWith(i, v)),
            idx.clone().prop_map(OpI::Find),
            prop_oneof![contains_pool, "[a-z0-9]{0,6}".prop_map(|s| s)].prop_map(OpI::Contains),
            (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            Just(OpI::Iterate),
            Just(OpI::Stat),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// State-machine equivalence against std::collections::HashMap:
// - get-or-create is idempotent and returns the handle seen before.
// - the constructor runs exactly once per new key.
// - find/contains parity with the model; names resolve back to keys.
// - iteration yields the model's key set.
// - stats count every key once and the tree order holds after each op.
fn run_state_machine(buckets: usize, pool: Vec<String>, ops: Vec<OpI>) -> Result<(), TestCaseError> {
    let mut sut: SymbolTable<i32> = SymbolTable::new(buckets).unwrap();
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut live: HashMap<String, Symbol> = HashMap::new();
    let calls = Cell::new(0usize);

    for op in ops {
        match op {
            OpI::Create(i) => {
                let k = &pool[i];
                let already = model.contains_key(k);
                let s = sut.get_or_create(k).unwrap();
                if already {
                    prop_assert_eq!(Some(&s), live.get(k));
                } else {
                    prop_assert_eq!(sut.value(s), Some(&0));
                    live.insert(k.clone(), s);
                    model.insert(k.clone(), 0);
                }
            }
            OpI::CreateWith(i, v) => {
                let k = &pool[i];
                let already = model.contains_key(k);
                let before = calls.get();
                let s = sut
                    .get_or_insert_with(k, || {
                        calls.set(calls.get() + 1);
                        v
                    })
                    .unwrap();
                if already {
                    prop_assert_eq!(calls.get(), before, "constructor ran for an existing key");
                    prop_assert_eq!(Some(&s), live.get(k));
                } else {
                    prop_assert_eq!(calls.get(), before + 1);
                    live.insert(k.clone(), s);
                    model.insert(k.clone(), v);
                }
            }
            OpI::Find(i) => {
                let k = &pool[i];
                let s = sut.find(k);
                prop_assert_eq!(s.is_some(), model.contains_key(k));
                if let Some(s) = s {
                    prop_assert_eq!(Some(&s), live.get(k));
                    prop_assert_eq!(sut.name_of(s), Some(k.as_bytes()));
                    prop_assert_eq!(sut.value(s), model.get(k));
                }
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains(&s), model.contains_key(&s));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(&s) = live.get(k) {
                    let vr = sut.value_mut(s);
                    prop_assert!(vr.is_some(), "live handle should resolve");
                    if let Some(vr) = vr {
                        *vr = vr.saturating_add(d);
                    }
                    if let Some(mv) = model.get_mut(k) {
                        *mv = mv.saturating_add(d);
                    }
                }
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<Vec<u8>> = sut.iter().map(|(_, n, _)| n.to_vec()).collect();
                let m_keys: BTreeSet<Vec<u8>> = model.keys().map(|k| k.as_bytes().to_vec()).collect();
                prop_assert_eq!(s_keys, m_keys);
            }
            OpI::Stat => {
                let st = sut.stat();
                prop_assert_eq!(st.elements, model.len());
                prop_assert_eq!(st.buckets, buckets);
                prop_assert_eq!(st.max_depth >= 1, !model.is_empty());
                prop_assert!(st.max_depth as usize <= model.len());
                if model.is_empty() {
                    prop_assert_eq!(st.mean_depth_milli, 0);
                } else {
                    prop_assert!(st.mean_depth_milli >= 1000);
                    prop_assert!(st.mean_depth_milli <= u64::from(st.max_depth) * 1000);
                }
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        sut.assert_tree_order();
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_state_machine(11, pool, ops)?;
    }

    // Single bucket: every key shares one tree, stressing the tag/name order.
    #[test]
    fn prop_state_machine_single_bucket((pool, ops) in arb_scenario()) {
        run_state_machine(1, pool, ops)?;
    }
}
