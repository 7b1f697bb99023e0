// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! shelfdb - an embedded, single-process key-value store.
//!
//! A byte-trie index sits in front of a single append-only log: every
//! mutation is appended to the log, applied to the trie, and fanned out to
//! any subscriber registered on a prefix of the mutated key. Opening a
//! store replays its log from the start, so the trie is always rebuilt
//! rather than persisted directly.
//!
//! This crate ships no network listener, no CLI, and no typed schema —
//! keys and values are opaque bytes. It is meant to sit underneath an
//! application's own adapters (an HTTP API, a CLI, a domain service),
//! which are deliberately out of scope here.
//!
//! ## Quick Start
//!
//! ```rust
//! use shelfdb::Store;
//!
//! let file = tempfile::NamedTempFile::new()?;
//! let store = Store::open(file.path())?;
//!
//! store.insert(b"key", b"hello, world")?;
//! assert_eq!(store.get(b"key"), Some(b"hello, world".to_vec()));
//!
//! let sub = store.subscribe(b"key");
//! store.update(b"key", b"goodbye")?;
//! let event = sub.recv().expect("store is still open");
//! assert_eq!(event.key, b"key");
//! # Ok::<(), shelfdb::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - **[`trie`]**: the ordered, branch-on-byte index shared by the value
//!   store and the subscription bus.
//! - **[`log`]**: the append-only wire format and its codec.
//! - **[`store`]**: the engine that binds a value-trie to the log,
//!   serializes mutations under a single reader-writer lock, and recovers
//!   state by replaying the log on open.
//! - **[`subscription`]**: prefix-keyed change notification, delivered
//!   over bounded per-subscriber channels.
//!
//! ## Concurrency and durability
//!
//! See [`Store`] for the locking model (one `RwLock` shared by readers,
//! writers, and the subscription bus) and [`StoreOptions`] for the
//! durability and backpressure knobs this crate exposes.

pub mod error;
pub mod log;
pub mod store;
pub mod subscription;
pub mod trie;

pub use error::{Error, Result};
pub use store::{Store, StoreOptions};
pub use subscription::{ChangeEvent, ChangeKind, Subscription};
pub use trie::Trie;
