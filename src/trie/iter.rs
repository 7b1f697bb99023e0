// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Key enumeration over a trie subtree.
//!
//! Walks every present node reachable from a given root, stack-based so
//! that deeply nested keys (arbitrary byte sequences, not bounded by call
//! stack depth) enumerate safely.
//!
//! ## Algorithm
//!
//! Depth-first, explicit stack of `(node, key-prefix-so-far)` pairs. Each
//! pop checks whether the node itself is present (yield its key) before
//! pushing its children for later. Enumeration order across children is
//! unspecified — it falls out of `HashMap` iteration order.
//!
//! ## Memory Usage
//!
//! Each stacked frame owns a `Vec<u8>` copy of the key prefix down to that
//! node; this trades some allocation for never holding a borrow across the
//! life of the iterator, so the iterator can outlive a single lock scope
//! boundary within the store (the store still holds its own lock around
//! the whole iteration; see `Store::keys`).

use super::node::Node;

/// Iterator over all present keys reachable from a trie root.
///
/// Abandoning iteration early (dropping the iterator, or stopping a `for`
/// loop with `break`) is always safe — there is nothing to finalize.
pub struct Keys<'a, T> {
    stack: Vec<(&'a Node<T>, Vec<u8>)>,
}

impl<'a, T> Keys<'a, T> {
    pub(crate) fn new(root: &'a Node<T>, prefix: Vec<u8>) -> Self {
        Self {
            stack: vec![(root, prefix)],
        }
    }

    /// An iterator that yields no keys, used when a prefix has no subtree.
    pub(crate) fn new_empty() -> Self {
        Self { stack: Vec::new() }
    }
}

impl<'a, T> Iterator for Keys<'a, T> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, key)) = self.stack.pop() {
            for (&byte, child) in node.children.iter() {
                let mut child_key = Vec::with_capacity(key.len() + 1);
                child_key.extend_from_slice(&key);
                child_key.push(byte);
                self.stack.push((child, child_key));
            }

            if node.is_present() {
                return Some(key);
            }
        }

        None
    }
}
