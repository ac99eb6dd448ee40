//! Sample History
//!
//! The cyclic-prefix correlation looks one full symbol into the past, so the
//! estimator needs random access to recent samples relative to the sample
//! just received. [`SampleWindow`] is that capability; [`SampleHistory`] is
//! a fixed-capacity ring that provides it for drivers that push one sample
//! at a time.
//!
//! Offsets are relative to the current sample: `0` is the newest sample,
//! `-1` the one before it, and so on.
//!
//! ## Example
//!
//! ```rust
//! use ofdm_ffe::history::{SampleHistory, SampleWindow};
//! use num_complex::Complex64;
//!
//! let mut history = SampleHistory::new(3);
//! for i in 1..=4 {
//!     history.push(Complex64::new(i as f64, 0.0));
//! }
//! assert_eq!(history.sample(0).re, 4.0);
//! assert_eq!(history.sample(-2).re, 2.0);
//! ```

use crate::types::IQSample;

/// Random access to the recent past of a sample stream.
pub trait SampleWindow {
    /// Number of addressable samples, current sample included.
    /// Valid offsets are `-(depth - 1) ..= 0`.
    fn depth(&self) -> usize;

    /// Sample at `offset` relative to the current sample.
    ///
    /// # Panics
    ///
    /// May panic if `offset > 0` or `-offset >= depth()`.
    fn sample(&self, offset: isize) -> IQSample;
}

/// A slice is a window whose last element is the current sample.
impl SampleWindow for [IQSample] {
    fn depth(&self) -> usize {
        self.len()
    }

    #[inline]
    fn sample(&self, offset: isize) -> IQSample {
        let back = offset.unsigned_abs();
        assert!(offset <= 0 && back < self.len(), "offset {offset} outside window");
        self[self.len() - 1 - back]
    }
}

impl SampleWindow for Vec<IQSample> {
    fn depth(&self) -> usize {
        self.len()
    }

    #[inline]
    fn sample(&self, offset: isize) -> IQSample {
        self.as_slice().sample(offset)
    }
}

/// Fixed-capacity ring of the most recent samples.
///
/// Starts zero-filled, so it always reports full depth; positions not yet
/// written read back as zero.
#[derive(Debug, Clone)]
pub struct SampleHistory {
    buffer: Vec<IQSample>,
    /// Slot the next push writes to.
    head: usize,
    /// Total samples pushed since creation or last clear.
    pushed: u64,
}

impl SampleHistory {
    /// Create a history holding `capacity` samples (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![IQSample::new(0.0, 0.0); capacity.max(1)],
            head: 0,
            pushed: 0,
        }
    }

    /// Append the newest sample, evicting the oldest.
    #[inline]
    pub fn push(&mut self, sample: IQSample) {
        self.buffer[self.head] = sample;
        self.head = (self.head + 1) % self.buffer.len();
        self.pushed += 1;
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Samples pushed so far.
    pub fn samples_pushed(&self) -> u64 {
        self.pushed
    }

    /// True once every slot holds a real sample.
    pub fn is_primed(&self) -> bool {
        self.pushed >= self.buffer.len() as u64
    }

    /// Zero the contents.
    pub fn clear(&mut self) {
        self.buffer.fill(IQSample::new(0.0, 0.0));
        self.head = 0;
        self.pushed = 0;
    }
}

impl SampleWindow for SampleHistory {
    fn depth(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    fn sample(&self, offset: isize) -> IQSample {
        let cap = self.buffer.len();
        let back = offset.unsigned_abs();
        assert!(offset <= 0 && back < cap, "offset {offset} outside history of {cap}");
        self.buffer[(self.head + cap - 1 - back) % cap]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64) -> IQSample {
        IQSample::new(re, 0.0)
    }

    #[test]
    fn test_zero_filled_until_primed() {
        let mut h = SampleHistory::new(4);
        assert_eq!(h.depth(), 4);
        assert!(!h.is_primed());
        h.push(c(1.0));
        assert_eq!(h.sample(0), c(1.0));
        assert_eq!(h.sample(-3), c(0.0));
        for i in 2..=4 {
            h.push(c(i as f64));
        }
        assert!(h.is_primed());
        assert_eq!(h.sample(-3), c(1.0));
    }

    #[test]
    fn test_wraparound() {
        let mut h = SampleHistory::new(3);
        for i in 0..10 {
            h.push(c(i as f64));
        }
        assert_eq!(h.sample(0), c(9.0));
        assert_eq!(h.sample(-1), c(8.0));
        assert_eq!(h.sample(-2), c(7.0));
        assert_eq!(h.samples_pushed(), 10);
    }

    #[test]
    fn test_slice_window_matches_history() {
        let data: Vec<IQSample> = (0..6).map(|i| c(i as f64)).collect();
        let mut h = SampleHistory::new(6);
        for &s in &data {
            h.push(s);
        }
        for off in -5..=0 {
            assert_eq!(data.as_slice().sample(off), h.sample(off));
        }
    }

    #[test]
    #[should_panic]
    fn test_offset_out_of_range() {
        let h = SampleHistory::new(2);
        h.sample(-2);
    }

    #[test]
    fn test_clear() {
        let mut h = SampleHistory::new(2);
        h.push(c(5.0));
        h.clear();
        assert_eq!(h.sample(0), c(0.0));
        assert_eq!(h.samples_pushed(), 0);
    }
}
