// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The lazy, lock-holding key iterator returned by [`crate::Store::keys`].

use std::sync::RwLockReadGuard;

use crate::trie::{self, Trie};

use super::State;

/// Iterator over full keys in a store, optionally restricted to a prefix.
///
/// Holds the store's shared lock for its entire lifetime, so the keys it
/// yields are a consistent point-in-time snapshot — but a live `Keys`
/// blocks every writer until it is dropped or exhausted. Callers that need
/// to mutate the store concurrently should `.collect()` promptly instead
/// of holding the iterator open.
pub struct Keys<'a> {
    // Declared before `guard` so it is dropped first: `inner` borrows
    // through `guard`, and field drop order is declaration order.
    inner: trie::Keys<'a, Vec<u8>>,
    #[allow(dead_code)]
    guard: RwLockReadGuard<'a, State>,
}

impl<'a> Keys<'a> {
    pub(crate) fn new(guard: RwLockReadGuard<'a, State>, prefix: Option<&[u8]>) -> Self {
        // SAFETY: `RwLockReadGuard::deref` hands back a reference whose
        // lifetime is tied to the *call*, not to the guard's own `'a` —
        // even though the data it points to really is valid for `'a` (the
        // guard holds the lock for exactly that long, and a shared lock
        // guarantees the trie is not mutated while it is held). We recover
        // the true `'a` through a raw-pointer reborrow so `inner` can
        // outlive the local borrow above while the guard itself is stored
        // alongside it in this struct and kept alive for just as long.
        let trie_ptr: *const Trie<Vec<u8>> = &guard.trie as *const _;
        let trie_ref: &'a Trie<Vec<u8>> = unsafe { &*trie_ptr };

        let inner = match prefix {
            Some(p) => trie_ref.keys_under(p),
            None => trie_ref.keys(),
        };

        Self { inner, guard }
    }
}

impl<'a> Iterator for Keys<'a> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}
