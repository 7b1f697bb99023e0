// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Encoding of log records to the append-only wire format.
//!
//! ## Wire Format
//!
//! ```text
//! SET := 0x01 | len_key:int64LE | key:bytes[len_key] | len_val:int64LE | val:bytes[len_val]
//! DEL := 0x00 | len_key:int64LE | key:bytes[len_key]
//! ```
//!
//! Lengths are signed 64-bit little-endian, matching the on-disk contract
//! bit-for-bit so that a log file written by one version of this crate
//! replays identically in another.

use std::io::{self, Write};

use super::types::OpCode;

/// Writes a Set record for `key`/`value` to `writer`.
///
/// ## Input
/// - `key`: non-empty key bytes
/// - `value`: value bytes (may be empty)
/// - `writer`: append-only sink
///
/// ## Output
/// - `io::Result<()>`: Ok once all bytes have been handed to `writer`
///
/// ## Error Conditions
/// - Any I/O error from `writer` is propagated unchanged.
///
/// ## Example Usage
/// ```
/// use shelfdb::log::encode_set;
///
/// let mut buf = Vec::new();
/// encode_set(b"key", b"hello, world", &mut buf).unwrap();
/// assert_eq!(buf.len(), 1 + 8 + 3 + 8 + 12);
/// ```
pub fn encode_set(key: &[u8], value: &[u8], writer: &mut impl Write) -> io::Result<()> {
    writer.write_all(&[OpCode::Set as u8])?;
    write_len(writer, key.len())?;
    writer.write_all(key)?;
    write_len(writer, value.len())?;
    writer.write_all(value)?;
    Ok(())
}

/// Writes a Delete record for `key` to `writer`.
///
/// ## Example Usage
/// ```
/// use shelfdb::log::encode_delete;
///
/// let mut buf = Vec::new();
/// encode_delete(b"key", &mut buf).unwrap();
/// assert_eq!(buf.len(), 1 + 8 + 3);
/// ```
pub fn encode_delete(key: &[u8], writer: &mut impl Write) -> io::Result<()> {
    writer.write_all(&[OpCode::Delete as u8])?;
    write_len(writer, key.len())?;
    writer.write_all(key)?;
    Ok(())
}

fn write_len(writer: &mut impl Write, len: usize) -> io::Result<()> {
    writer.write_all(&(len as i64).to_le_bytes())
}
