//! Airdata path: probe fields in, display state out
//!
//! The probe reports each sample as five separately-delivered fields
//! stamped with one sequence number. [`assembler`] regroups those fields
//! into a [`RawSample`]; [`fusion`] turns the stream of samples into the
//! smoothed, validity-checked state the display paints.
//!
//! Angles are in radians and speeds in m/s everywhere past the wire
//! boundary; the assembler converts as fields come off the link.

pub mod assembler;
pub mod fusion;

pub use assembler::AirdataAssembler;
pub use fusion::{Airdata, FusionTuning};

/// One complete probe sample, as measured. Immutable once assembled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    /// Probe-assigned sequence number that grouped the fields.
    pub sequence: u32,
    /// Angle of attack in radians.
    pub alpha: f64,
    /// Yaw angle in radians.
    pub beta: f64,
    /// Dynamic pressure in pascals.
    pub q: f64,
    /// Static pressure in pascals.
    pub p: f64,
    /// Outside air temperature in degrees celsius.
    pub t: f64,
}

/// The flight state drawn as one ball on the display: where the relative
/// wind is, and how fast.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Ball {
    /// Angle of attack in radians.
    pub alpha: f64,
    /// Yaw angle in radians.
    pub beta: f64,
    /// Indicated airspeed in m/s.
    pub ias: f64,
    /// True airspeed in m/s.
    pub tas: f64,
}

/// The five fields that make up one airdata sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTag {
    /// Angle of attack.
    Alpha,
    /// Yaw angle.
    Beta,
    /// Dynamic pressure.
    DynamicPressure,
    /// Static pressure.
    StaticPressure,
    /// Outside air temperature.
    Temperature,
}
