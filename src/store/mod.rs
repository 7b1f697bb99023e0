// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The store engine: binds a value-trie to an append-only log and fans
//! mutations out through a [`crate::subscription::SubscriptionBus`].
//!
//! ## Durability
//!
//! Every mutation encodes a record, writes it through a [`BufWriter`], and
//! flushes before touching the in-memory trie — so a record is always
//! handed to the kernel before the in-memory state agrees with it. By
//! default this crate does not additionally call `fsync` on every write
//! (see [`StoreOptions::fsync_every_write`]); a record that has only
//! reached the page cache can still be lost if the OS itself crashes
//! before the page is written back, though a crash of this process alone
//! cannot lose it. This mirrors the reference implementation's tradeoff of
//! throughput over OS-crash durability.
//!
//! ## Concurrency
//!
//! A single [`std::sync::RwLock`] guards the trie, the log writer, and the
//! subscription bus together. Reads (`get`, the body of `keys`) take the
//! shared side; every mutation and subscription-lifecycle call takes the
//! exclusive side. See [`Store::keys`] for the lock-scope tradeoff that
//! choice implies for prefix iteration.

mod keys;
mod options;

pub use keys::Keys;
pub use options::StoreOptions;

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, RwLock};

use crate::error::{Error, Result};
use crate::log::{decode_next, encode_delete, encode_set, LogRecord};
use crate::subscription::{ChangeEvent, Subscription, SubscriptionBus};
use crate::trie::Trie;

/// Store-internal state guarded by [`Inner::state`].
///
/// `pub(crate)` throughout: [`crate::subscription::Subscription::cancel`]
/// reaches back into `bus` and `closed` directly, which is the
/// "cancellation token" design described for this crate — a subscription
/// holds a cheap `Arc` into the same state the store itself locks, rather
/// than a borrow of the store with a lifetime.
pub(crate) struct State {
    trie: Trie<Vec<u8>>,
    log: BufWriter<File>,
    pub(crate) bus: SubscriptionBus,
    pub(crate) closed: bool,
}

/// Shared store internals, reachable from both [`Store`] and every
/// [`Subscription`] it has handed out.
pub(crate) struct Inner {
    pub(crate) state: RwLock<State>,
    options: StoreOptions,
}

/// An open, single-process key-value store.
///
/// Opened with [`Store::open`] or [`Store::open_with_options`]; release it
/// with [`Store::close`], which consumes the handle so reuse after close
/// is a compile error rather than a runtime one.
pub struct Store {
    inner: Arc<Inner>,
}

impl Store {
    /// Opens (creating if necessary) the log file at `path` with default
    /// [`StoreOptions`], replaying it into a fresh in-memory trie.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, StoreOptions::default())
    }

    /// Opens the log file at `path` with the given `options`.
    ///
    /// If the file does not exist it is created empty. Either way the log
    /// is replayed start to end before this call returns: each `Set`
    /// record is applied as a `put`, each `Delete` as a `delete`, with the
    /// log's last write for a key winning. A truncated record partway
    /// through the file fails the whole open with
    /// [`Error::OperationFailed`] — see the crate-level docs on
    /// corruption policy.
    pub fn open_with_options(path: impl AsRef<Path>, options: StoreOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)
            .map_err(|e| Error::OperationFailed {
                operation: "open".to_string(),
                reason: e.to_string(),
            })?;

        let trie = Self::replay(file.try_clone().map_err(Error::from)?)?;
        log::debug!("replayed log at {}", path.display());

        let state = State {
            trie,
            log: BufWriter::new(file),
            bus: SubscriptionBus::new(),
            closed: false,
        };

        Ok(Self {
            inner: Arc::new(Inner {
                state: RwLock::new(state),
                options,
            }),
        })
    }

    fn replay(file: File) -> Result<Trie<Vec<u8>>> {
        let mut reader = BufReader::new(file);
        let mut trie = Trie::new();
        let mut applied = 0u64;

        while let Some(record) = decode_next(&mut reader)? {
            match record {
                LogRecord::Set { key, value } => {
                    trie.put(&key, value);
                }
                LogRecord::Delete { key } => {
                    trie.delete(&key);
                }
            }
            applied += 1;
        }

        log::debug!("applied {} log records on replay", applied);
        Ok(trie)
    }

    /// Returns a fresh copy of the value stored at `key`, or `None` if no
    /// value is present. The returned buffer is independent of the store —
    /// mutating it has no effect on what is stored.
    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        let state = self.inner.state.read().expect("store lock poisoned");
        state.trie.get(key).cloned()
    }

    /// Stores `value` at `key`, which must not already be present.
    ///
    /// # Errors
    /// - [`Error::InvalidKey`] if `key` is empty.
    /// - [`Error::Conflict`] if `key` is already present.
    /// - [`Error::OperationFailed`] if the log write fails; the trie is
    ///   left unmodified and no event is published.
    pub fn insert(&self, key: &[u8], value: &[u8]) -> Result<()> {
        if key.is_empty() {
            return Err(Error::InvalidKey);
        }
        let value = value.to_vec();

        let mut state = self.inner.state.write().expect("store lock poisoned");
        if state.trie.get(key).is_some() {
            return Err(Error::Conflict { key: key.to_vec() });
        }

        self.append_set(&mut state, key, &value, "insert")?;
        state.trie.put(key, value.clone());
        state.bus.publish(&ChangeEvent::inserted(key.to_vec(), value));
        Ok(())
    }

    /// Overwrites the value stored at `key`, which must already be
    /// present.
    ///
    /// # Errors
    /// - [`Error::InvalidKey`] if `key` is empty.
    /// - [`Error::NotFound`] if `key` is absent.
    /// - [`Error::OperationFailed`] if the log write fails; the trie is
    ///   left unmodified and no event is published.
    pub fn update(&self, key: &[u8], value: &[u8]) -> Result<()> {
        if key.is_empty() {
            return Err(Error::InvalidKey);
        }
        let value = value.to_vec();

        let mut state = self.inner.state.write().expect("store lock poisoned");
        if state.trie.get(key).is_none() {
            return Err(Error::NotFound { key: key.to_vec() });
        }

        self.append_set(&mut state, key, &value, "update")?;
        state.trie.put(key, value.clone());
        state.bus.publish(&ChangeEvent::updated(key.to_vec(), value));
        Ok(())
    }

    /// Removes `key` if present. A missing key is a successful no-op: no
    /// log entry is written and no event is published.
    ///
    /// # Errors
    /// - [`Error::OperationFailed`] if the log write fails; the trie is
    ///   left unmodified and no event is published.
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        let mut state = self.inner.state.write().expect("store lock poisoned");
        if state.trie.get(key).is_none() {
            return Ok(());
        }

        encode_delete(key, &mut state.log).map_err(|e| {
            log::error!("log append failed during delete: {}", e);
            Error::OperationFailed {
                operation: "delete".to_string(),
                reason: e.to_string(),
            }
        })?;
        Self::commit(&mut state, self.inner.options.fsync_every_write)?;

        state.trie.delete(key);
        state.bus.publish(&ChangeEvent::deleted(key.to_vec()));
        Ok(())
    }

    /// Returns every key in the store (`prefix = None`) or every key that
    /// begins with `prefix` (yielded as full keys, prefix included).
    ///
    /// The shared lock is held for the entire lifetime of the returned
    /// iterator — it observes a stable snapshot, but blocks concurrent
    /// writers until it is dropped or exhausted. Prefer `.collect()`
    /// promptly over holding it open across other work.
    pub fn keys(&self, prefix: Option<&[u8]>) -> Keys<'_> {
        let guard = self.inner.state.read().expect("store lock poisoned");
        Keys::new(guard, prefix)
    }

    /// Registers a subscriber on `prefix`. See
    /// [`crate::subscription::Subscription`] for its lifecycle and
    /// [`StoreOptions::queue_capacity`] for the bound on its event queue.
    ///
    /// An empty `prefix` subscribes to every mutation in the store —
    /// unlike `insert`/`update`, a prefix is not a stored key and has no
    /// non-empty requirement.
    pub fn subscribe(&self, prefix: &[u8]) -> Subscription {
        let mut state = self.inner.state.write().expect("store lock poisoned");
        let (id, receiver) = state.bus.register(prefix, self.inner.options.queue_capacity);
        Subscription::new(id, prefix.to_vec(), receiver, Arc::clone(&self.inner))
    }

    /// Flushes the log, closes every active subscription, and discards
    /// in-memory state. Consumes `self`: there is no way to call a store
    /// method on a closed handle.
    pub fn close(self) -> Result<()> {
        let mut state = self.inner.state.write().expect("store lock poisoned");
        state.bus.close_all();
        state.closed = true;
        state.log.flush().map_err(Error::from)?;
        log::debug!("store closed");
        Ok(())
    }

    fn append_set(&self, state: &mut State, key: &[u8], value: &[u8], operation: &str) -> Result<()> {
        encode_set(key, value, &mut state.log).map_err(|e| {
            log::error!("log append failed during {}: {}", operation, e);
            Error::OperationFailed {
                operation: operation.to_string(),
                reason: e.to_string(),
            }
        })?;
        Self::commit(state, self.inner.options.fsync_every_write)
    }

    /// Hands the just-written record to the kernel (`flush`) and, if
    /// configured, blocks until it is durable on disk (`fsync`).
    fn commit(state: &mut State, fsync: bool) -> Result<()> {
        state.log.flush().map_err(Error::from)?;
        if fsync {
            state.log.get_ref().sync_all().map_err(Error::from)?;
        }
        Ok(())
    }
}
