// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Decoding of log records from the append-only wire format.

use std::io::{self, Read};

use super::types::{LogRecord, OpCode};
use crate::error::{Error, Result};

/// Reads the next record from `reader`.
///
/// ## Output
/// - `Ok(Some(record))`: one decoded Set or Delete record
/// - `Ok(None)`: clean end-of-stream at an opcode boundary — normal
///   termination, not an error
/// - `Err(Error::OperationFailed { .. })`: a short read partway through a
///   record; the log is truncated mid-write and the tail is unrecoverable
///
/// ## Example Usage
/// ```
/// use shelfdb::log::{decode_next, encode_set};
///
/// let mut buf = Vec::new();
/// encode_set(b"key", b"value", &mut buf).unwrap();
///
/// let mut cursor = std::io::Cursor::new(buf);
/// let record = decode_next(&mut cursor).unwrap();
/// assert!(record.is_some());
/// assert!(decode_next(&mut cursor).unwrap().is_none());
/// ```
pub fn decode_next(reader: &mut impl Read) -> Result<Option<LogRecord>> {
    let mut opcode_buf = [0u8; 1];
    match read_exact_or_eof(reader, &mut opcode_buf)? {
        ReadOutcome::Eof => return Ok(None),
        ReadOutcome::Full => {}
    }

    let opcode = OpCode::from_byte(opcode_buf[0]).ok_or_else(|| Error::OperationFailed {
        operation: "decode_next".to_string(),
        reason: format!("unknown opcode byte {:#04x}", opcode_buf[0]),
    })?;

    let key = read_length_prefixed(reader, "key")?;

    match opcode {
        OpCode::Delete => Ok(Some(LogRecord::Delete { key })),
        OpCode::Set => {
            let value = read_length_prefixed(reader, "value")?;
            Ok(Some(LogRecord::Set { key, value }))
        }
    }
}

enum ReadOutcome {
    Full,
    Eof,
}

/// Reads exactly `buf.len()` bytes, distinguishing a clean EOF at the very
/// first byte from a short read partway through.
fn read_exact_or_eof(reader: &mut impl Read, buf: &mut [u8]) -> Result<ReadOutcome> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                if filled == 0 {
                    return Ok(ReadOutcome::Eof);
                }
                return Err(Error::OperationFailed {
                    operation: "decode_next".to_string(),
                    reason: "truncated record: unexpected end of stream".to_string(),
                });
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(ReadOutcome::Full)
}

fn read_length_prefixed(reader: &mut impl Read, what: &str) -> Result<Vec<u8>> {
    let mut len_buf = [0u8; 8];
    match read_exact_or_eof(reader, &mut len_buf)? {
        ReadOutcome::Eof => {
            return Err(Error::OperationFailed {
                operation: "decode_next".to_string(),
                reason: format!("truncated record: missing {} length", what),
            })
        }
        ReadOutcome::Full => {}
    }

    let len = i64::from_le_bytes(len_buf);
    if len < 0 {
        return Err(Error::OperationFailed {
            operation: "decode_next".to_string(),
            reason: format!("negative {} length {}", what, len),
        });
    }

    let mut data = vec![0u8; len as usize];
    match read_exact_or_eof(reader, &mut data)? {
        ReadOutcome::Eof if len > 0 => {
            return Err(Error::OperationFailed {
                operation: "decode_next".to_string(),
                reason: format!("truncated record: short {} bytes", what),
            })
        }
        _ => {}
    }

    Ok(data)
}
