// SymbolTable property tests over the public surface.
//
// Property 1: hash determinism.
//  - pjw_hash is pure and never zero for any byte string.
//
// Property 2: lookup agrees with a set model.
//  - Model: HashSet of the keys created so far.
//  - Invariant: find(k).is_some() == model.contains(k) for created and
//    probe keys; name_of(find(k)) == k; stat().elements == model.len().
use bucket_symtab::hash::pjw_hash;
use bucket_symtab::SymbolTable;
use proptest::prelude::*;
use std::collections::HashSet;

proptest! {
    #[test]
    fn prop_hash_deterministic_nonzero(key in proptest::collection::vec(any::<u8>(), 0..64)) {
        let h = pjw_hash(&key);
        prop_assert_ne!(h, 0);
        prop_assert_eq!(h, pjw_hash(&key.clone()));
    }

    #[test]
    fn prop_lookup_matches_model(
        buckets in 1usize..=40,
        keys in proptest::collection::vec(proptest::collection::vec(1u8..=255u8, 0..10), 0..60),
        probes in proptest::collection::vec(proptest::collection::vec(1u8..=255u8, 0..10), 0..20),
    ) {
        let mut t: SymbolTable<u16> = SymbolTable::new(buckets).unwrap();
        let mut model: HashSet<Vec<u8>> = HashSet::new();

        for k in &keys {
            let s = t.get_or_create(k).unwrap();
            model.insert(k.clone());
            prop_assert_eq!(t.name_of(s), Some(k.as_slice()));
            prop_assert_eq!(t.len(), model.len());
        }

        for k in keys.iter().chain(probes.iter()) {
            let found = t.find(k);
            prop_assert_eq!(found.is_some(), model.contains(k));
            if let Some(s) = found {
                prop_assert_eq!(s.name(&t), Some(k.as_slice()));
            }
        }

        let st = t.stat();
        prop_assert_eq!(st.elements, model.len());
        prop_assert_eq!(st.max_depth >= 1, !model.is_empty());
    }
}
