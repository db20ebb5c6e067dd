//! A trailing window of per-second outcome counts.
//!
//! `Window` splits the last `capacity` seconds into one bucket per second,
//! kept in a circular buffer. Every recorded outcome lands in the bucket of the
//! current second and in a cached running total, so reading the aggregate never
//! rescans the buffer.
//!
//! Buckets are rotated lazily, only when `record` or a read observes that the
//! clock has moved past the most recent bucket. A rotation subtracts the
//! evicted bucket from the totals before the bucket is reused, and never walks
//! more than `capacity` buckets no matter how long the window sat idle.
//!
//! ## Example
//! ```rust
//! use outcome_window::{Outcome, Window};
//!
//! let window = Window::new(10).unwrap();
//! window.record(Outcome::Success);
//! window.record(Outcome::TimeoutError);
//! let totals = window.totals(); // outcomes seen in the last 10 seconds
//! assert_eq!(totals.error, 1);
//! ```

use log::{debug, warn};
use parking_lot::Mutex;

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::outcome::{Counts, Outcome};
use crate::Config;

/// Counts for the one second starting at `start_time`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub counts: Counts,
    pub start_time: i64,
}

impl Bucket {
    /// Clears the counts and makes the bucket represent `epoch_second`.
    #[inline]
    pub fn reset(&mut self, epoch_second: i64) {
        self.counts = Counts::default();
        self.start_time = epoch_second;
    }
}

/// A consistent view of the window as of its most recent second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub totals: Counts,
    /// First epoch second covered by the window.
    pub start_time: i64,
    /// Epoch second of the most recent bucket.
    pub end_time: i64,
}

#[derive(Debug)]
struct Ring {
    buckets: Box<[Bucket]>,
    end_index: usize,
    // sum of all buckets
    totals: Counts,
}

impl Ring {
    fn new(capacity: usize) -> Self {
        Ring {
            buckets: vec![Bucket::default(); capacity].into_boxed_slice(),
            end_index: 0,
            totals: Counts::default(),
        }
    }

    /// Rotates the ring forward to `now` and returns the index of the bucket
    /// that receives events for that second.
    fn advance(&mut self, now: i64) -> usize {
        let elapsed = now - self.buckets[self.end_index].start_time;
        if elapsed == 0 {
            return self.end_index;
        }

        if elapsed < 0 {
            warn!(
                "clock moved backward by {}s, keeping the bucket at {}",
                -elapsed, self.buckets[self.end_index].start_time
            );
            return self.end_index;
        }

        let capacity = self.buckets.len();
        let steps = elapsed.min(capacity as i64) as usize;
        if steps == capacity {
            debug!("idle for {}s, flushing all {} buckets", elapsed, capacity);
        }

        for remaining in (0..steps).rev() {
            self.end_index = (self.end_index + 1) % capacity;
            let bucket = &mut self.buckets[self.end_index];
            self.totals.subtract(&bucket.counts);
            bucket.reset(now - remaining as i64);
        }
        self.end_index
    }

    #[inline]
    fn last(&self) -> &Bucket {
        &self.buckets[self.end_index]
    }
}

/// A fixed-capacity, per-second bucketed outcome counter.
///
/// All operations are serialized by a single mutex; callers on any number of
/// threads may share one window behind an `Arc`.
#[derive(Debug)]
pub struct Window<C = SystemClock> {
    capacity: usize,
    clock: C,
    ring: Mutex<Ring>,
}

impl Window<SystemClock> {
    /// Creates a window covering the last `capacity` seconds of wall-clock time.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_clock(capacity, SystemClock)
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(cfg.capacity)
    }
}

impl<C: Clock> Window<C> {
    /// Creates a window that reads the current second from `clock`.
    pub fn with_clock(capacity: usize, clock: C) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }
        Ok(Window {
            capacity,
            clock,
            ring: Mutex::new(Ring::new(capacity)),
        })
    }

    /// Window length in seconds, also the number of buckets.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Counts `outcome` in the bucket of the current second.
    #[inline]
    pub fn record(&self, outcome: Outcome) {
        let mut ring = self.ring.lock();
        let idx = ring.advance(self.clock.now());
        ring.buckets[idx].counts.apply(outcome);
        ring.totals.apply(outcome);
    }

    /// Counts a numeric outcome code; unknown codes only add to the total.
    #[inline]
    pub fn record_code(&self, code: u32) {
        if Outcome::from_code(code).is_none() {
            debug!("unknown outcome code {}, counting it towards the total only", code);
        }
        let mut ring = self.ring.lock();
        let idx = ring.advance(self.clock.now());
        ring.buckets[idx].counts.apply_code(code);
        ring.totals.apply_code(code);
    }

    /// Returns the outcome counts of the trailing window.
    #[inline]
    pub fn totals(&self) -> Counts {
        let mut ring = self.ring.lock();
        ring.advance(self.clock.now());
        ring.totals
    }

    /// Returns a copy of every bucket, in slot order.
    pub fn buckets(&self) -> Vec<Bucket> {
        let mut ring = self.ring.lock();
        ring.advance(self.clock.now());
        ring.buckets.to_vec()
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut ring = self.ring.lock();
        ring.advance(self.clock.now());
        let end_time = ring.last().start_time;
        Snapshot {
            totals: ring.totals,
            start_time: end_time - self.capacity as i64 + 1,
            end_time,
        }
    }

    /// Average number of outcomes per second over the window.
    #[inline]
    pub fn rate_per_second(&self) -> f64 {
        self.totals().total as f64 / self.capacity as f64
    }
}
