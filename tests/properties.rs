// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the invariants in the design doc's testable
//! properties section. Keys and values are drawn from a restricted byte
//! alphabet so proptest's shrinker stays useful while still exercising
//! multi-byte branching in the trie.

use proptest::collection::vec as pvec;
use proptest::prelude::*;
use tempfile::NamedTempFile;

use shelfdb::Store;

fn byte_string() -> impl Strategy<Value = Vec<u8>> {
    pvec(prop::sample::select(vec![b'a', b'b', b'c', b'd', 0u8, 1u8, 0xffu8]), 1..8)
}

fn open_store() -> (NamedTempFile, Store) {
    let file = NamedTempFile::new().unwrap();
    let store = Store::open(file.path()).unwrap();
    (file, store)
}

proptest! {
    // Property 1: round-trip.
    #[test]
    fn prop_insert_then_get_round_trips(key in byte_string(), value in byte_string()) {
        let (_file, store) = open_store();
        store.insert(&key, &value).unwrap();
        prop_assert_eq!(store.get(&key), Some(value));
    }

    // Property 2: idempotent delete.
    #[test]
    fn prop_double_delete_matches_single_delete(key in byte_string()) {
        let (_file, store) = open_store();
        store.insert(&key, b"v").unwrap();

        store.delete(&key).unwrap();
        let after_one = store.get(&key);
        store.delete(&key).unwrap();
        let after_two = store.get(&key);

        prop_assert_eq!(after_one, after_two);
        prop_assert_eq!(store.get(&key), None);
    }

    // Property 3: last-write-wins survives a reopen.
    #[test]
    fn prop_reopen_preserves_final_state(
        keys in pvec(byte_string(), 1..6),
        values in pvec(byte_string(), 1..6),
    ) {
        let file = NamedTempFile::new().unwrap();
        let n = keys.len().min(values.len());

        {
            let store = Store::open(file.path()).unwrap();
            for i in 0..n {
                // insert-or-update so arbitrary key repeats are legal.
                if store.get(&keys[i]).is_some() {
                    store.update(&keys[i], &values[i]).unwrap();
                } else {
                    store.insert(&keys[i], &values[i]).unwrap();
                }
            }
            store.close().unwrap();
        }

        let reference = {
            let mut m = std::collections::HashMap::new();
            for i in 0..n {
                m.insert(keys[i].clone(), values[i].clone());
            }
            m
        };

        let store = Store::open(file.path()).unwrap();
        for (key, value) in &reference {
            prop_assert_eq!(store.get(key), Some(value.clone()));
        }
    }

    // Property 4: conflict symmetry.
    #[test]
    fn prop_insert_conflicts_iff_key_already_present(key in byte_string()) {
        let (_file, store) = open_store();
        prop_assert!(store.get(&key).is_none());
        prop_assert!(store.insert(&key, b"first").is_ok());

        let was_present = store.get(&key).is_some();
        let second = store.insert(&key, b"second");
        prop_assert_eq!(was_present, second.is_err());
    }

    // Property 5: prefix containment.
    #[test]
    fn prop_keys_under_prefix_matches_the_present_set(
        prefix in byte_string(),
        suffixes in pvec(byte_string(), 0..6),
        unrelated in pvec(byte_string(), 0..6),
    ) {
        let (_file, store) = open_store();
        let mut all_keys = std::collections::BTreeSet::new();

        for suffix in &suffixes {
            let mut key = prefix.clone();
            key.extend_from_slice(suffix);
            all_keys.insert(key);
        }
        for key in &unrelated {
            all_keys.insert(key.clone());
        }
        for key in &all_keys {
            store.insert(key, b"v").unwrap();
        }

        let expected: std::collections::BTreeSet<Vec<u8>> = all_keys
            .iter()
            .filter(|k| k.starts_with(&prefix))
            .cloned()
            .collect();

        let got: std::collections::BTreeSet<Vec<u8>> =
            store.keys(Some(&prefix)).collect();

        prop_assert_eq!(got, expected);
    }
}

// Property 6 & 7: subscription delivery and isolation, checked directly
// rather than through proptest (channel ordering makes shrinking noisy).
#[test]
fn prop_subscription_delivers_only_matching_keys_in_order() {
    let (_file, store) = open_store();
    let sub = store.subscribe(b"ab");

    let mutated = ["a", "ab", "abx", "aby", "zz"];
    for key in mutated {
        store.insert(key.as_bytes(), b"v").unwrap();
    }

    let mut received = Vec::new();
    for _ in 0..3 {
        received.push(sub.recv().unwrap().key);
    }

    assert_eq!(
        received,
        vec![b"ab".to_vec(), b"abx".to_vec(), b"aby".to_vec()]
    );
}
