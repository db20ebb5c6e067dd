use std::sync::Arc;

use log::debug;

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::outcome::Outcome;
use crate::window::Window;
use crate::Config;

type DashMap<K, V> = dashmap::DashMap<K, V, ahash::RandomState>;

/// Outcome windows keyed by name, e.g. one per remote endpoint.
///
/// Windows are created lazily with the registry's `Config` and shared through
/// `Arc`, so a handle stays usable after the entry is removed.
pub struct WindowRegistry<C = SystemClock> {
    windows: DashMap<String, Arc<Window<C>>>,
    clock: C,
    cfg: Config,
}

impl WindowRegistry<SystemClock> {
    pub fn new(cfg: Config) -> Result<Self> {
        Self::with_clock(cfg, SystemClock)
    }
}

impl<C: Clock + Clone> WindowRegistry<C> {
    /// Creates a registry whose windows all read time from `clock`.
    ///
    /// Fails when `cfg.capacity` is not a valid window capacity.
    pub fn with_clock(cfg: Config, clock: C) -> Result<Self> {
        if cfg.capacity == 0 {
            return Err(Error::InvalidCapacity(cfg.capacity));
        }
        Ok(Self {
            windows: DashMap::default(),
            clock,
            cfg,
        })
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Returns the window for `key`, creating it on first use.
    #[inline]
    pub fn window(&self, key: &str) -> Arc<Window<C>> {
        if let Some(w) = self.windows.get(key) {
            return w.value().clone();
        }
        self.windows
            .entry(key.to_owned())
            .or_insert_with(|| {
                debug!(
                    "creating outcome window for {}, capacity: {}s",
                    key, self.cfg.capacity
                );
                Arc::new(self.new_window())
            })
            .clone()
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<Arc<Window<C>>> {
        self.windows.get(key).map(|w| w.value().clone())
    }

    #[inline]
    pub fn record(&self, key: &str, outcome: Outcome) {
        self.window(key).record(outcome);
    }

    #[inline]
    pub fn remove(&self, key: &str) -> Option<Arc<Window<C>>> {
        self.windows.remove(key).map(|(_, w)| w)
    }

    #[inline]
    pub fn keys(&self) -> Vec<String> {
        self.windows.iter().map(|e| e.key().clone()).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    fn new_window(&self) -> Window<C> {
        // capacity was validated in `with_clock`
        Window::with_clock(self.cfg.capacity, self.clock.clone())
            .unwrap_or_else(|e| unreachable!("{}", e))
    }
}
