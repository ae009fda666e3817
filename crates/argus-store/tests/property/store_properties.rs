//! Property tests: self-search identity, ordering, truncation, and
//! batch atomicity on dimension mismatch.

use proptest::prelude::*;

use argus_core::traits::{IVectorTransport, SearchParams};
use argus_store::LocalStore;

fn vector_strategy(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-100.0f32..100.0, dim..=dim)
}

proptest! {
    #[test]
    fn prop_self_search_returns_own_id_first(
        vector in vector_strategy(8),
        distractors in prop::collection::vec(vector_strategy(8), 0..16),
    ) {
        let store = LocalStore::in_memory();
        store
            .insert("c", &[vector.clone()], Some(&["self".to_string()]), None)
            .unwrap();
        if !distractors.is_empty() {
            store.insert("c", &distractors, None, None).unwrap();
        }

        let results = store
            .search("c", &[vector], 1 + distractors.len(), &SearchParams::default())
            .unwrap();
        let top = &results[0][0];
        // The inserted vector itself is always the closest hit.
        prop_assert!(top.distance.abs() < 1e-3);
        prop_assert!(results[0].iter().any(|r| r.id == "self" && r.distance.abs() < 1e-3));
    }

    #[test]
    fn prop_results_sorted_ascending_and_truncated(
        vectors in prop::collection::vec(vector_strategy(4), 1..32),
        top_k in 1usize..8,
    ) {
        let store = LocalStore::in_memory();
        store.insert("c", &vectors, None, None).unwrap();

        let results = store
            .search("c", &[vec![0.0; 4]], top_k, &SearchParams::default())
            .unwrap();
        let list = &results[0];
        prop_assert!(list.len() <= top_k);
        prop_assert!(list.len() == top_k.min(vectors.len()));
        for pair in list.windows(2) {
            prop_assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[test]
    fn prop_mismatched_batch_never_partially_applies(
        good in prop::collection::vec(vector_strategy(4), 1..8),
        bad_dim in (1usize..8).prop_filter("must differ", |d| *d != 4),
    ) {
        let store = LocalStore::in_memory();
        store.insert("c", &good, None, None).unwrap();
        let before = store.stats("c").unwrap().count;

        let mut batch = good.clone();
        batch.push(vec![0.0; bad_dim]);
        prop_assert!(store.insert("c", &batch, None, None).is_err());
        prop_assert_eq!(store.stats("c").unwrap().count, before);
    }

    #[test]
    fn prop_scores_stay_in_unit_interval(
        vectors in prop::collection::vec(vector_strategy(4), 1..16),
        query in vector_strategy(4),
    ) {
        let store = LocalStore::in_memory();
        store.insert("c", &vectors, None, None).unwrap();

        let results = store
            .search("c", &[query], vectors.len(), &SearchParams::default())
            .unwrap();
        for hit in &results[0] {
            let score = hit.score();
            prop_assert!(score > 0.0 && score <= 1.0);
        }
    }
}
