//! Time-gated zoom ratio cache.
//!
//! Querying the live zoom state of a camera is comparatively expensive and the value
//! changes slowly relative to the frame rate, so the mapper re-reads it at most once
//! per refresh interval and serves the cached value in between.

use anglemap_camera::DEFAULT_ZOOM_RATIO;
use std::fmt;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Monotonic time source.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Last fetched zoom ratio and when it was fetched.
#[derive(Debug, Clone)]
pub struct ZoomCache {
    interval: Duration,
    min_ratio: f64,
    last_refreshed: Option<Instant>,
    ratio: f64,
}

impl ZoomCache {
    pub fn new(interval: Duration, min_ratio: f64) -> Self {
        Self {
            interval,
            min_ratio,
            last_refreshed: None,
            ratio: DEFAULT_ZOOM_RATIO,
        }
    }

    /// Returns the zoom ratio at `now`, calling `fetch` only if the cached value is
    /// older than the refresh interval (or was never fetched).
    ///
    /// A fetched value below the minimum is clamped up to it; a missing value yields
    /// [`DEFAULT_ZOOM_RATIO`].
    pub fn ratio(&mut self, now: Instant, fetch: impl FnOnce() -> Option<f64>) -> f64 {
        let stale = self
            .last_refreshed
            .is_none_or(|at| now.saturating_duration_since(at) >= self.interval);
        if stale {
            self.ratio = fetch().map_or(DEFAULT_ZOOM_RATIO, |r| r.max(self.min_ratio));
            self.last_refreshed = Some(now);
        }
        self.ratio
    }

    /// Forces the next read to fetch.
    pub fn invalidate(&mut self) {
        self.last_refreshed = None;
    }
}
