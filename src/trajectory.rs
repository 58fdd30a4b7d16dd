//! Bounded trajectory history

use std::collections::VecDeque;

use crate::types::Sample;

/// Default number of samples retained in a trail
pub const DEFAULT_CAPACITY: usize = 1000;

/// Fixed-capacity history of samples with strict FIFO eviction.
///
/// After every [`append`](Self::append) the length is at most the capacity;
/// once full, the buffer holds exactly the most recent `capacity` samples in
/// arrival order. A capacity of zero retains nothing.
///
/// The buffer is owned by the consumer side and is never shared with the
/// reader, so it carries no synchronization of its own.
#[derive(Debug, Clone)]
pub struct TrajectoryBuffer {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl Default for TrajectoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl TrajectoryBuffer {
    /// Create an empty buffer holding at most `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        // Large capacities are grown on demand rather than reserved up front
        let reserve = capacity.min(DEFAULT_CAPACITY);
        Self { samples: VecDeque::with_capacity(reserve), capacity }
    }

    /// Append a sample, evicting the oldest entries beyond capacity.
    pub fn append(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        self.evict();
    }

    /// Current contents in arrival order, as plotted positions.
    pub fn positions(&self) -> impl ExactSizeIterator<Item = (f64, f64)> + '_ {
        self.samples.iter().map(Sample::position)
    }

    /// Current contents in arrival order.
    pub fn samples(&self) -> impl ExactSizeIterator<Item = &Sample> + '_ {
        self.samples.iter()
    }

    /// Most recently appended sample still retained.
    pub fn latest(&self) -> Option<Sample> {
        self.samples.back().copied()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Change capacity for subsequent appends.
    ///
    /// Shrinking trims eagerly so `len() <= capacity()` always holds.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.evict();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.capacity
    }

    fn evict(&mut self) {
        let excess = self.samples.len().saturating_sub(self.capacity);
        if excess > 0 {
            self.samples.drain(..excess);
        }
    }
}

impl Extend<Sample> for TrajectoryBuffer {
    fn extend<I: IntoIterator<Item = Sample>>(&mut self, iter: I) {
        for sample in iter {
            self.append(sample);
        }
    }
}
