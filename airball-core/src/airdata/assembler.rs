//! Sample assembly from per-field messages
//!
//! The probe sends one message per field, all stamped with the sequence
//! number of the sample they came from. Transports are allowed to drop
//! and reorder within a sample, so assembly is by sequence id, not by
//! arrival order:
//!
//! - fields for the pending sequence fill their slot, first write wins;
//! - a field for any other sequence abandons the pending sample and
//!   starts fresh (the link never goes backwards, and a half-filled stale
//!   sample is worthless);
//! - the fifth distinct field completes the sample and clears the slate.
//!
//! NaN is a legitimate field value here. A probe that cannot measure a
//! channel still completes the sample; the fusion layer quarantines the
//! NaN per channel instead of losing the other four.

use airball_wire::{ids, Message};

use super::{FieldTag, RawSample};
use crate::aero::degrees_to_radians;

/// Accumulates fields for one sequence id until all five are present.
#[derive(Debug, Default)]
struct PendingAssembly {
    sequence: u32,
    alpha: Option<f64>,
    beta: Option<f64>,
    q: Option<f64>,
    p: Option<f64>,
    t: Option<f64>,
}

impl PendingAssembly {
    fn new(sequence: u32) -> Self {
        Self {
            sequence,
            ..Self::default()
        }
    }

    fn slot(&mut self, tag: FieldTag) -> &mut Option<f64> {
        match tag {
            FieldTag::Alpha => &mut self.alpha,
            FieldTag::Beta => &mut self.beta,
            FieldTag::DynamicPressure => &mut self.q,
            FieldTag::StaticPressure => &mut self.p,
            FieldTag::Temperature => &mut self.t,
        }
    }

    fn sample(&self) -> Option<RawSample> {
        Some(RawSample {
            sequence: self.sequence,
            alpha: self.alpha?,
            beta: self.beta?,
            q: self.q?,
            p: self.p?,
            t: self.t?,
        })
    }
}

/// Regroups field messages into whole [`RawSample`]s.
#[derive(Debug, Default)]
pub struct AirdataAssembler {
    pending: Option<PendingAssembly>,
}

impl AirdataAssembler {
    /// An assembler with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer one field. Returns the completed sample when this field was
    /// the last one missing.
    pub fn submit(&mut self, sequence: u32, tag: FieldTag, value: f64) -> Option<RawSample> {
        let stale = self
            .pending
            .as_ref()
            .map_or(true, |p| p.sequence != sequence);
        if stale {
            self.pending = Some(PendingAssembly::new(sequence));
        }

        let pending = self.pending.get_or_insert_with(|| PendingAssembly::new(sequence));
        let slot = pending.slot(tag);
        if slot.is_none() {
            *slot = Some(value);
        }

        let complete = pending.sample();
        if complete.is_some() {
            self.pending = None;
        }
        complete
    }

    /// Offer one wire message.
    ///
    /// Non-airdata ids are ignored and do not disturb the pending sample.
    /// Angle fields arrive in degrees and are converted here, so samples
    /// leave the assembler in model units.
    pub fn submit_message(&mut self, msg: &Message) -> Option<RawSample> {
        let tag = match msg.id {
            ids::AIRDATA_ALPHA => FieldTag::Alpha,
            ids::AIRDATA_BETA => FieldTag::Beta,
            ids::AIRDATA_DYNAMIC_PRESSURE => FieldTag::DynamicPressure,
            ids::AIRDATA_STATIC_PRESSURE => FieldTag::StaticPressure,
            ids::AIRDATA_TEMPERATURE => FieldTag::Temperature,
            _ => return None,
        };
        let (sequence, value) = msg.field_payload();
        let value = match tag {
            FieldTag::Alpha | FieldTag::Beta => degrees_to_radians(value as f64),
            _ => value as f64,
        };
        self.submit(sequence, tag, value)
    }
}
