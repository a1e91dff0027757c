// src/acquisition/history_buffer.rs
//! Bounded FIFO history for retrospective queries

use std::collections::VecDeque;
use thiserror::Error;

/// History buffer error types
#[derive(Debug, PartialEq, Error)]
pub enum HistoryBufferError {
    #[error("Invalid buffer capacity (must be at least 1)")]
    InvalidCapacity,
}

/// Fixed-capacity buffer that evicts the oldest entry once full.
///
/// Readers only ever receive snapshots; the buffer itself is never handed
/// out mutably beyond its owner.
#[derive(Debug, Clone)]
pub struct HistoryBuffer<T> {
    entries: VecDeque<T>,
    capacity: usize,
    evicted: u64,
}

impl<T> HistoryBuffer<T> {
    pub fn new(capacity: usize) -> Result<Self, HistoryBufferError> {
        if capacity == 0 {
            return Err(HistoryBufferError::InvalidCapacity);
        }

        Ok(Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            evicted: 0,
        })
    }

    /// Append `item`, returning the evicted oldest entry when full
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.entries.len() == self.capacity {
            self.evicted += 1;
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(item);
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total entries dropped to make room since creation
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    pub fn oldest(&self) -> Option<&T> {
        self.entries.front()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Current fill level (0.0 to 1.0)
    pub fn utilization(&self) -> f32 {
        self.entries.len() as f32 / self.capacity as f32
    }
}

impl<T: Clone> HistoryBuffer<T> {
    /// Copy of every entry, oldest first
    pub fn snapshot(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }

    /// Copy of the entries matching `keep`, oldest first
    pub fn snapshot_where<F>(&self, mut keep: F) -> Vec<T>
    where
        F: FnMut(&T) -> bool,
    {
        self.entries.iter().filter(|item| keep(item)).cloned().collect()
    }
}
