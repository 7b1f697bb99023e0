// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Wire types for the append-only log.

/// One decoded log record.
///
/// `Set` carries both key and value; `Delete` carries only the key. This
/// mirrors the on-disk layout exactly — there is no richer in-memory
/// representation to keep replay a straight one-to-one translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRecord {
    Set { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

/// Opcode byte written at the start of every record.
///
/// `0x01` for Set, `0x00` for Delete. Values are part of the wire format —
/// changing them breaks compatibility with existing log files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OpCode {
    Delete = 0x00,
    Set = 0x01,
}

impl OpCode {
    pub(crate) fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x00 => Some(OpCode::Delete),
            0x01 => Some(OpCode::Set),
            _ => None,
        }
    }
}
