// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The subscription bus: a second trie, keyed by subscriber prefix, whose
//! payload at each node is the list of subscribers registered there.
//!
//! Publication walks this trie along a mutated key from root to leaf and
//! enqueues the event into every matching subscriber's channel. The bus
//! itself holds no lock — it is always reached through [`crate::store`]'s
//! single reader-writer lock, which already serializes every call here
//! with respect to mutation and cancellation.

use std::sync::mpsc::{sync_channel, Receiver, SyncSender};

use uuid::Uuid;

use super::types::ChangeEvent;
use crate::trie::Trie;

/// One registered subscriber: an id for matching against `cancel()`, and
/// the sending half of its bounded event channel. Dropping a handle drops
/// the sender, which is what turns a subscriber's consumer-side iterator
/// into an end-of-stream signal.
struct SubscriberHandle {
    id: Uuid,
    sender: SyncSender<ChangeEvent>,
}

/// Subscriber lists indexed by registered prefix.
pub(crate) struct SubscriptionBus {
    trie: Trie<Vec<SubscriberHandle>>,
}

impl SubscriptionBus {
    pub(crate) fn new() -> Self {
        Self { trie: Trie::new() }
    }

    /// Registers a new subscriber at `prefix` with the given bounded queue
    /// `capacity`. Returns the subscriber's id (used later by
    /// [`SubscriptionBus::unregister`]) and the receiving half of its
    /// channel.
    pub(crate) fn register(&mut self, prefix: &[u8], capacity: usize) -> (Uuid, Receiver<ChangeEvent>) {
        let id = Uuid::new_v4();
        let (sender, receiver) = sync_channel(capacity.max(1));

        let slot = self.trie.entry(prefix);
        slot.get_or_insert_with(Vec::new).push(SubscriberHandle { id, sender });

        (id, receiver)
    }

    /// Removes the subscriber `id` from its `prefix` list, pruning the
    /// list's trie node if it becomes empty.
    ///
    /// Panics if `prefix` has no list or `id` is not in it — either
    /// indicates the bus's own bookkeeping is broken, not a caller
    /// mistake, since every live `Subscription` names a prefix/id pair
    /// this bus itself handed out.
    pub(crate) fn unregister(&mut self, prefix: &[u8], id: Uuid) {
        let now_empty = {
            let slot = self.trie.entry(prefix);
            let list = slot
                .as_mut()
                .expect("cancel() on a prefix with no subscriber list");
            let pos = list
                .iter()
                .position(|handle| handle.id == id)
                .expect("cancel() for a subscriber id missing from its own prefix list");
            list.remove(pos);
            list.is_empty()
        };

        if now_empty {
            self.trie.delete(prefix);
        }
    }

    /// Delivers `event` to every subscriber whose registered prefix is a
    /// prefix of `event.key`, in root-to-leaf (shortest-prefix-first)
    /// order. Blocks on any subscriber whose queue is full — this is the
    /// documented backpressure policy; see `Store::subscribe`.
    pub(crate) fn publish(&self, event: &ChangeEvent) {
        let _: Result<(), ()> = self.trie.walk(&event.key, |handles| {
            for handle in handles {
                if handle.sender.send(event.clone()).is_err() {
                    log::debug!(
                        "subscriber {} dropped its receiver without calling cancel(); dropping event",
                        handle.id
                    );
                }
            }
            Ok(())
        });
    }

    /// Drops every registered subscriber, closing all of their channels.
    /// Used by `Store::close` so active subscriptions observe end-of-stream
    /// rather than hanging forever on a store that will never mutate
    /// again.
    pub(crate) fn close_all(&mut self) {
        self.trie = Trie::new();
    }
}
