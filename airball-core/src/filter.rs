//! Sliding-window rate estimation
//!
//! Climb rate is the slope of recent altitude, not the difference of the
//! last two samples; differencing a barometric signal amplifies exactly
//! the noise we are trying to hide. [`LinearRateFilter`] keeps a fixed
//! window of the newest samples and fits an ordinary least squares line
//! through them against sample position, so one noisy reading moves the
//! estimate by its leverage, not by its full value.
//!
//! The returned rate is per sample. Callers that want units per second
//! multiply by their sample rate.

use heapless::Deque;

/// Upper bound on the window, sized for the slowest configurable
/// averaging interval at the probe's sample rate (5.0 s at 20 Hz, with
/// headroom).
pub const MAX_RATE_WINDOW: usize = 128;

/// Ordinary least squares slope over a sliding window.
///
/// The window starts filled with zeros, so early estimates are dragged
/// toward zero until real samples displace the fill. That matches the
/// display's startup behavior: a climb needle that rises from rest rather
/// than jumping.
pub struct LinearRateFilter {
    window: Deque<f64, MAX_RATE_WINDOW>,
    size: usize,
    rate: f64,
}

impl LinearRateFilter {
    /// Create a filter over the last `size` samples.
    ///
    /// `size` is clamped into `1..=MAX_RATE_WINDOW`.
    pub fn new(size: usize) -> Self {
        let size = size.clamp(1, MAX_RATE_WINDOW);
        let mut window = Deque::new();
        for _ in 0..size {
            window.push_back(0.0).ok();
        }
        let mut filter = Self {
            window,
            size,
            rate: 0.0,
        };
        filter.compute_rate();
        filter
    }

    /// Push the newest sample, dropping the oldest, and refit the slope.
    pub fn put(&mut self, y: f64) {
        self.window.pop_front();
        self.window.push_back(y).ok();
        self.compute_rate();
    }

    /// Slope of the fitted line, in units per sample.
    ///
    /// A window of one sample has no slope and reads `0.0`.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Window length in samples.
    pub fn size(&self) -> usize {
        self.size
    }

    fn compute_rate(&mut self) {
        // x is implicitly 0..size, so its mean is closed-form.
        let n = self.size as f64;
        let x_mean = (n - 1.0) / 2.0;
        let y_mean = self.window.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for (i, y) in self.window.iter().enumerate() {
            let dx = i as f64 - x_mean;
            numerator += dx * (y - y_mean);
            denominator += dx * dx;
        }

        self.rate = if denominator == 0.0 {
            0.0
        } else {
            numerator / denominator
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn starts_flat() {
        assert_eq!(LinearRateFilter::new(5).rate(), 0.0);
    }

    #[test]
    fn recovers_a_linear_ramp_exactly() {
        let mut filter = LinearRateFilter::new(5);
        for i in 0..5 {
            filter.put(2.0 * i as f64 + 7.0);
        }
        assert!(close(filter.rate(), 2.0));
    }

    #[test]
    fn recovers_a_descent() {
        let mut filter = LinearRateFilter::new(4);
        for i in 0..4 {
            filter.put(100.0 - 3.0 * i as f64);
        }
        assert!(close(filter.rate(), -3.0));
    }

    #[test]
    fn constant_input_reads_zero() {
        let mut filter = LinearRateFilter::new(6);
        for _ in 0..10 {
            filter.put(42.0);
        }
        assert!(close(filter.rate(), 0.0));
    }

    #[test]
    fn partial_fill_blends_with_the_zero_history() {
        let mut filter = LinearRateFilter::new(3);
        filter.put(3.0);
        // Window is [0, 0, 3]: slope of the best-fit line is 1.5.
        assert!(close(filter.rate(), 1.5));
    }

    #[test]
    fn single_sample_window_has_no_slope() {
        let mut filter = LinearRateFilter::new(1);
        filter.put(5.0);
        filter.put(100.0);
        assert_eq!(filter.rate(), 0.0);
    }

    #[test]
    fn degenerate_sizes_are_clamped() {
        assert_eq!(LinearRateFilter::new(0).size(), 1);
        assert_eq!(LinearRateFilter::new(10_000).size(), MAX_RATE_WINDOW);
    }
}
