//! Airdata Fusion
//!
//! ## Overview
//!
//! This is the state machine behind the display: every completed probe
//! sample passes through [`Airdata::update`], which derives speeds and
//! altitudes, smooths the flight state, and maintains the recent-history
//! trail the renderer draws behind the ball.
//!
//! ```text
//! RawSample ──► derive (ias, tas)          tuning (from settings)
//!                  │                            │
//!                  ▼                            ▼
//!            NaN quarantine ──► exponential smoothing ──► smooth ball
//!                  │
//!                  ├──► raw trail (newest first, 20 deep)
//!                  │
//!                  └──► barometric altitudes ──► climb filter ──► climb rate
//! ```
//!
//! ## Smoothing
//!
//! Channels are low-passed with a time-constant form of exponential
//! smoothing: `factor = exp(-dt / tc)`, `smoothed = (1 - factor) * new +
//! factor * old`. Writing the factor in terms of the measured `dt` keeps
//! the filter's time constant honest when the link hiccups; a late sample
//! moves the ball further because more time has genuinely passed. The
//! first sample after startup is assigned directly so the ball does not
//! sweep in from zero.
//!
//! ## NaN quarantine
//!
//! A probe channel that cannot measure (iced port, unplugged sensor)
//! reports NaN. Arithmetic would smear that NaN into every later smoothed
//! value, so each channel falls back to its previous smoothed value for
//! the affected sample. The sample still marks the state invalid when
//! alpha or beta was unmeasured; quarantine keeps the *other* channels
//! alive, it does not pretend the ball is trustworthy.
//!
//! ## Validity
//!
//! `valid()` is the renderer's gate: the last sample must have carried
//! real alpha and beta, and it must have arrived within the staleness
//! window. Expiry is checked at read time, so a silent link flips the
//! display to its no-data state without any timer wiring.

use heapless::Deque;

use super::{Ball, RawSample};
use crate::aero::{pressure_to_altitude, q_to_ias, q_to_tas, QNH_STANDARD_PA};
use crate::filter::LinearRateFilter;
use crate::time::{TimeSource, Timestamp, STALE_AFTER_MS};

/// Probe sample rate. The climb filter window and the rate scaling both
/// assume samples arrive at this cadence.
pub const SAMPLES_PER_SECOND: f64 = 20.0;

/// How many raw balls the display trail keeps.
pub const RAW_BALL_COUNT: usize = 20;

/// The settings-driven inputs to one fusion step, read fresh from the
/// settings catalog for every sample so edits take effect immediately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionTuning {
    /// Altimeter reference pressure in pascals.
    pub qnh_pa: f64,
    /// Ball smoothing time constant in seconds. Zero disables smoothing.
    pub ball_time_constant: f64,
    /// Climb averaging interval in seconds.
    pub vsi_time_constant: f64,
    /// Multiplier applied to dynamic pressure before speed derivation,
    /// correcting probe placement error.
    pub q_correction_factor: f64,
}

impl Default for FusionTuning {
    fn default() -> Self {
        Self {
            qnh_pa: QNH_STANDARD_PA,
            ball_time_constant: 0.5,
            vsi_time_constant: 1.0,
            q_correction_factor: 1.0,
        }
    }
}

/// The fused display state. One instance per display, updated by the
/// model thread only.
pub struct Airdata {
    clock: Box<dyn TimeSource + Send>,
    smooth_ball: Ball,
    raw_balls: Deque<Ball, RAW_BALL_COUNT>,
    pressure_altitude: f64,
    altitude: f64,
    climb_filter: LinearRateFilter,
    climb_rate: f64,
    valid: bool,
    last_update: Option<Timestamp>,
}

fn quarantine(value: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value
    }
}

fn smoothing_factor(dt_seconds: f64, time_constant: f64) -> f64 {
    if time_constant <= 0.0 {
        0.0
    } else {
        libm::exp(-dt_seconds / time_constant)
    }
}

fn smooth(current: f64, new_value: f64, factor: f64) -> f64 {
    (1.0 - factor) * new_value + factor * current
}

fn climb_window(vsi_time_constant: f64) -> usize {
    libm::round(vsi_time_constant * SAMPLES_PER_SECOND) as usize
}

impl Airdata {
    /// Fresh state: zero ball, empty trail, nothing valid yet.
    pub fn new(clock: Box<dyn TimeSource + Send>) -> Self {
        Self {
            clock,
            smooth_ball: Ball::default(),
            raw_balls: Deque::new(),
            pressure_altitude: 0.0,
            altitude: 0.0,
            climb_filter: LinearRateFilter::new(climb_window(
                FusionTuning::default().vsi_time_constant,
            )),
            climb_rate: 0.0,
            valid: false,
            last_update: None,
        }
    }

    /// Fold one assembled sample into the display state.
    pub fn update(&mut self, sample: &RawSample, tuning: &FusionTuning) {
        let now = self.clock.now();

        let q = sample.q * tuning.q_correction_factor;
        let measured = Ball {
            alpha: sample.alpha,
            beta: sample.beta,
            ias: q_to_ias(q),
            tas: q_to_tas(q, sample.p, sample.t),
        };
        let guarded = Ball {
            alpha: quarantine(measured.alpha, self.smooth_ball.alpha),
            beta: quarantine(measured.beta, self.smooth_ball.beta),
            ias: quarantine(measured.ias, self.smooth_ball.ias),
            tas: quarantine(measured.tas, self.smooth_ball.tas),
        };

        self.smooth_ball = match self.last_update {
            None => guarded,
            Some(previous) => {
                let dt_seconds = now.saturating_sub(previous) as f64 / 1000.0;
                let factor = smoothing_factor(dt_seconds, tuning.ball_time_constant);
                Ball {
                    alpha: smooth(self.smooth_ball.alpha, guarded.alpha, factor),
                    beta: smooth(self.smooth_ball.beta, guarded.beta, factor),
                    ias: smooth(self.smooth_ball.ias, guarded.ias, factor),
                    tas: smooth(self.smooth_ball.tas, guarded.tas, factor),
                }
            }
        };

        if self.raw_balls.is_full() {
            self.raw_balls.pop_back();
        }
        self.raw_balls.push_front(guarded).ok();

        // The climb source is altitude against the standard atmosphere,
        // so dialing the altimeter cannot fake a climb.
        self.pressure_altitude = pressure_to_altitude(sample.t, sample.p, QNH_STANDARD_PA);
        let window = climb_window(tuning.vsi_time_constant);
        if self.climb_filter.size() != window {
            // A fresh window starts level at the current altitude, not at
            // zero; editing the averaging interval must not read as a climb.
            self.climb_filter = LinearRateFilter::new(window);
            for _ in 0..window {
                self.climb_filter.put(self.pressure_altitude);
            }
        }
        self.climb_filter.put(self.pressure_altitude);
        self.climb_rate = self.climb_filter.rate() * SAMPLES_PER_SECOND;

        self.altitude = pressure_to_altitude(sample.t, sample.p, tuning.qnh_pa);

        self.valid = !sample.alpha.is_nan() && !sample.beta.is_nan();
        self.last_update = Some(now);
    }

    /// The smoothed ball the display centers on.
    pub fn smooth_ball(&self) -> Ball {
        self.smooth_ball
    }

    /// Recent unsmoothed balls, newest first.
    pub fn raw_balls(&self) -> impl Iterator<Item = &Ball> {
        self.raw_balls.iter()
    }

    /// Altitude in meters against the dialed QNH reference.
    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    /// Climb rate in m/s, positive up.
    pub fn climb_rate(&self) -> f64 {
        self.climb_rate
    }

    /// Whether the state is presentable: the last sample measured both
    /// flight angles and arrived within the staleness window.
    pub fn valid(&self) -> bool {
        match self.last_update {
            Some(at) => self.valid && self.clock.now().saturating_sub(at) < STALE_AFTER_MS,
            None => false,
        }
    }
}
