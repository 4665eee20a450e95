//! Moving-average smoothing over a bounded FIFO window.

use std::collections::VecDeque;

/// Last `capacity` raw densities; the oldest is evicted first.
#[derive(Debug, Clone)]
pub struct SmoothingWindow {
    buf: VecDeque<f32>,
    capacity: usize,
}

impl SmoothingWindow {
    /// A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buf: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append `value`, evict the oldest entry if over capacity, and return the
    /// arithmetic mean of the current contents.
    pub fn push(&mut self, value: f32) -> f32 {
        if self.buf.len() == self.capacity {
            self.buf.pop_front();
        }
        self.buf.push_back(value);
        debug_assert!(!self.buf.is_empty() && self.buf.len() <= self.capacity);
        // Summed in f64 from the contents each time; no running total to drift.
        let sum: f64 = self.buf.iter().map(|&v| f64::from(v)).sum();
        (sum / self.buf.len() as f64) as f32
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Window contents, oldest first.
    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.buf.iter().copied()
    }
}
