//! Clock abstraction for the display model
//!
//! The model never reads the clock directly; it asks a [`TimeSource`] so
//! smoothing intervals and staleness checks can run against a controlled
//! clock in tests. Offsets are what matter here, not wall time, so the
//! standard source is anchored to an arbitrary origin and only promises to
//! be monotonic.

/// Timestamp in milliseconds since the time source's origin.
pub type Timestamp = u64;

/// How long a sensor-backed reading stays presentable without a fresh
/// sample behind it.
pub const STALE_AFTER_MS: u64 = 250;

/// Source of time for the model.
pub trait TimeSource {
    /// Current timestamp in milliseconds.
    fn now(&self) -> Timestamp;
}

/// Monotonic time source anchored at construction.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct MonotonicTime {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicTime {
    /// Start a clock reading zero now.
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for MonotonicTime {
    fn now(&self) -> Timestamp {
        self.origin.elapsed().as_millis() as Timestamp
    }
}

/// Hand-driven time source for tests.
///
/// Clones share one underlying instant, so a test can keep a handle while
/// the model owns another and step both at once:
///
/// ```
/// use airball_core::time::{FixedTime, TimeSource};
///
/// let clock = FixedTime::new(1000);
/// let handle = clock.clone();
/// handle.advance(250);
/// assert_eq!(clock.now(), 1250);
/// ```
#[cfg(feature = "std")]
#[derive(Debug, Clone, Default)]
pub struct FixedTime {
    now_ms: std::sync::Arc<std::sync::atomic::AtomicU64>,
}

#[cfg(feature = "std")]
impl FixedTime {
    /// Create a clock reading `timestamp`.
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            now_ms: std::sync::Arc::new(std::sync::atomic::AtomicU64::new(timestamp)),
        }
    }

    /// Jump the clock to `timestamp`.
    pub fn set(&self, timestamp: Timestamp) {
        self.now_ms
            .store(timestamp, std::sync::atomic::Ordering::Relaxed);
    }

    /// Step the clock forward by `ms`.
    pub fn advance(&self, ms: u64) {
        self.now_ms
            .fetch_add(ms, std::sync::atomic::Ordering::Relaxed);
    }
}

#[cfg(feature = "std")]
impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.now_ms.load(std::sync::atomic::Ordering::Relaxed)
    }
}
