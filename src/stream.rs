/// Sliding-window sample buffer for one sensor channel
use std::collections::VecDeque;

/// Default window size for each sample channel
pub const DEFAULT_STREAM_SAMPLES: usize = 8;

/// Fixed-capacity window over the most recent samples of a channel
///
/// Once full, every new sample evicts the oldest one. The average is only
/// defined while at least one sample is held.
#[derive(Debug, Clone)]
pub struct SampleStream {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl SampleStream {
    /// Create an empty stream holding at most `capacity` samples
    ///
    /// A zero capacity is bumped to one so a fed stream always has an average.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        SampleStream {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: f32) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Arithmetic mean of the held samples, `None` when the stream is empty
    pub fn average(&self) -> Option<f32> {
        if self.samples.is_empty() {
            return None;
        }

        let sum: f32 = self.samples.iter().sum();
        Some(sum / self.samples.len() as f32)
    }

    /// Drop every held sample, used when the upstream sensor reports an error
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for SampleStream {
    fn default() -> Self {
        SampleStream::new(DEFAULT_STREAM_SAMPLES)
    }
}
