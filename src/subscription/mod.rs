// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Prefix-keyed change notifications.
//!
//! A [`Subscription`] is returned by [`crate::Store::subscribe`]; it is a
//! consumer-side handle onto a bounded channel that the store's publisher
//! fills as matching mutations occur. See [`bus`] for how subscribers are
//! indexed and matched.

mod bus;
mod types;

pub(crate) use bus::SubscriptionBus;
pub use types::{ChangeEvent, ChangeKind};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use uuid::Uuid;

use crate::store::Inner;

/// A live registration on a key prefix.
///
/// Consume it as a blocking [`Iterator`] of [`ChangeEvent`], or call
/// [`Subscription::recv`] directly. The channel closes — the iterator
/// ends, `recv` returns `None` — when [`Subscription::cancel`] runs, or
/// when the owning store is closed, whichever happens first.
///
/// Dropping a `Subscription` without calling `cancel()` cancels it
/// implicitly: this is an ordinary Rust resource-cleanup guarantee, not
/// something a caller needs to do by hand.
pub struct Subscription {
    id: Uuid,
    prefix: Vec<u8>,
    receiver: Receiver<ChangeEvent>,
    inner: Arc<Inner>,
    cancelled: AtomicBool,
}

impl Subscription {
    pub(crate) fn new(id: Uuid, prefix: Vec<u8>, receiver: Receiver<ChangeEvent>, inner: Arc<Inner>) -> Self {
        Self {
            id,
            prefix,
            receiver,
            inner,
            cancelled: AtomicBool::new(false),
        }
    }

    /// The prefix this subscription was registered under.
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// Blocks until the next matching change event arrives, or returns
    /// `None` once the subscription has been cancelled (explicitly, via
    /// [`Subscription::cancel`], or implicitly by the store closing).
    pub fn recv(&self) -> Option<ChangeEvent> {
        self.receiver.recv().ok()
    }

    /// Removes this subscription from the bus and closes its channel.
    ///
    /// Idempotent: a second call (including the implicit one `Drop`
    /// performs) is a no-op. Safe to call after the owning store has
    /// already closed all subscriptions itself.
    pub fn cancel(&self) {
        if self.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }

        let mut state = self.inner.state.write().expect("store lock poisoned");
        if state.closed {
            // `Store::close` already dropped every subscriber handle.
            return;
        }
        state.bus.unregister(&self.prefix, self.id);
    }
}

impl Iterator for Subscription {
    type Item = ChangeEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
