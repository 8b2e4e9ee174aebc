//! Core model for the airball angle-of-attack display
//!
//! Fuses raw probe telemetry into the smoothed flight state the panel
//! renders, and keeps the persisted settings catalog in sync across
//! the knob, the settings file, and peer panels.
//!
//! Key constraints:
//! - All model state mutates on one thread; input sources only post
//!   events
//! - The probe cycles at 20 Hz; fused state expires 250 ms after the
//!   last sample
//! - Settings writes survive power cuts mid-write (dual-bank store)
//!
//! ```no_run
//! use airball_core::airdata::{Airdata, AirdataAssembler, FieldTag, FusionTuning};
//! use airball_core::time::MonotonicTime;
//!
//! let mut assembler = AirdataAssembler::new();
//! let mut airdata = Airdata::new(Box::new(MonotonicTime::new()));
//!
//! // Five fields of one probe cycle; the fifth completes the sample.
//! for (tag, value) in [
//!     (FieldTag::Alpha, 0.087),
//!     (FieldTag::Beta, 0.01),
//!     (FieldTag::DynamicPressure, 551.0),
//!     (FieldTag::StaticPressure, 101_325.0),
//!     (FieldTag::Temperature, 15.0),
//! ] {
//!     if let Some(sample) = assembler.submit(7, tag, value) {
//!         airdata.update(&sample, &FusionTuning::default());
//!     }
//! }
//! assert!(airdata.valid());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod aero;
pub mod filter;
pub mod time;

#[cfg(feature = "std")]
pub mod airdata;
#[cfg(feature = "std")]
pub mod battery;
#[cfg(feature = "std")]
pub mod events;
#[cfg(feature = "std")]
pub mod model;
#[cfg(feature = "std")]
pub mod queue;
#[cfg(feature = "std")]
pub mod settings;
#[cfg(feature = "std")]
pub mod storage;
#[cfg(feature = "std")]
pub mod telemetry;
#[cfg(feature = "std")]
pub mod timer;

// Public API
pub use filter::LinearRateFilter;
pub use time::{TimeSource, Timestamp};

#[cfg(feature = "std")]
pub use airdata::{Airdata, AirdataAssembler, Ball, FusionTuning, RawSample};
#[cfg(feature = "std")]
pub use events::{ButtonEvent, ModelEvent};
#[cfg(feature = "std")]
pub use model::AirballModel;
#[cfg(feature = "std")]
pub use queue::EventQueue;
#[cfg(feature = "std")]
pub use settings::Settings;

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
