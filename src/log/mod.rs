// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Append-only log encoding for store mutations.
//!
//! The log is the durability mechanism underneath [`crate::store::Store`]:
//! every successful mutation is first encoded as one record here, appended
//! to the log file, and only then applied to the in-memory trie. Replaying
//! the log from the start rebuilds the trie exactly — last write for a key
//! wins.

mod decoder;
mod encoder;
mod types;

pub use decoder::decode_next;
pub use encoder::{encode_delete, encode_set};
pub use types::LogRecord;
