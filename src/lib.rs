//! Per-second bucketed counters of success, error and timeout outcomes over a
//! trailing window, for circuit breakers, adaptive limiters and health checks.

pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::error::{Error, Result};
pub use crate::outcome::{Counts, Outcome};
pub use crate::registry::WindowRegistry;
pub use crate::window::{Bucket, Snapshot, Window};

mod clock;
mod error;
mod outcome;
mod registry;
mod window;

#[derive(Debug, Clone)]
pub struct Config {
    //Window length in seconds, one bucket per second
    pub capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { capacity: 10 }
    }
}
