//! Bounded in-memory buffer for visits that could not be persisted
//!
//! Process-local and non-durable. When full, appending drops the oldest
//! record. There is no retry into the durable store.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::model::VisitRecord;

pub const DEFAULT_CAPACITY: usize = 1000;

/// Point-in-time view of the buffer taken under a single lock
#[derive(Debug, Clone)]
pub struct BufferSnapshot {
    pub len: usize,
    /// Most recently appended first
    pub recent: Vec<VisitRecord>,
}

#[derive(Debug)]
pub struct FallbackBuffer {
    capacity: usize,
    records: Mutex<VecDeque<VisitRecord>>,
}

impl FallbackBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            records: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends a record, evicting the oldest one on overflow
    ///
    /// Returns the evicted record, if any.
    pub fn append(&self, record: VisitRecord) -> Option<VisitRecord> {
        let mut records = self.lock();
        records.push_back(record);

        if records.len() > self.capacity {
            records.pop_front()
        } else {
            None
        }
    }

    /// Length and the `recent` newest records, newest first
    pub fn snapshot(&self, recent: usize) -> BufferSnapshot {
        let records = self.lock();
        BufferSnapshot {
            len: records.len(),
            recent: records.iter().rev().take(recent).cloned().collect(),
        }
    }

    // A panic while holding the lock cannot leave the deque half-updated.
    fn lock(&self) -> MutexGuard<'_, VecDeque<VisitRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for FallbackBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
