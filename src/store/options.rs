// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Tunable knobs for [`crate::Store`].

/// Configuration accepted by [`crate::Store::open_with_options`].
///
/// The defaults match the reference behavior this crate is built against:
/// a four-slot subscriber queue and no `fsync` on every write.
#[derive(Debug, Clone, Copy)]
pub struct StoreOptions {
    /// Capacity of each subscriber's bounded event queue. A full queue
    /// blocks the publisher (see [`crate::Store::subscribe`]) until the
    /// subscriber drains it, so raising this trades memory for slack
    /// against bursty writers.
    pub queue_capacity: usize,

    /// When `true`, every mutation calls `File::sync_all` after the log
    /// write, guaranteeing the record survives an OS crash at the cost of
    /// one extra syscall per mutation. When `false` (the default), the
    /// record is only guaranteed to have reached the kernel's page cache
    /// — durable across a process crash, not an OS crash.
    pub fsync_every_write: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            queue_capacity: 4,
            fsync_every_write: false,
        }
    }
}
