//! Probe battery status
//!
//! The probe is battery powered and reports its supply state alongside
//! airdata. Unlike airdata there is nothing to fuse: fields are
//! last-write-wins, and the only judgment made here is freshness, with
//! the same staleness window the airdata state uses. The display decides
//! whether to show any of it (`show_probe_battery_status`).

use airball_wire::{ids, Message};

use crate::time::{TimeSource, Timestamp, STALE_AFTER_MS};

/// Most recent probe battery readings.
pub struct BatteryStatus {
    clock: Box<dyn TimeSource + Send>,
    voltage: f64,
    current: f64,
    capacity_pct: f64,
    last_update: Option<Timestamp>,
}

impl BatteryStatus {
    /// No readings yet; `valid()` is false until the probe reports.
    pub fn new(clock: Box<dyn TimeSource + Send>) -> Self {
        Self {
            clock,
            voltage: 0.0,
            current: 0.0,
            capacity_pct: 0.0,
            last_update: None,
        }
    }

    /// Record a whole battery sample, as carried by a `$BA` sentence.
    pub fn update(&mut self, voltage: f64, current: f64, capacity_pct: f64) {
        self.voltage = voltage;
        self.current = current;
        self.capacity_pct = capacity_pct;
        self.last_update = Some(self.clock.now());
    }

    /// Record one battery field from the envelope encoding.
    ///
    /// Returns whether the message was a battery field; anything else is
    /// left for other consumers.
    pub fn apply_message(&mut self, msg: &Message) -> bool {
        let (_, value) = msg.field_payload();
        let value = value as f64;
        match msg.id {
            ids::BATTERY_VOLTAGE => self.voltage = value,
            ids::BATTERY_CURRENT => self.current = value,
            ids::BATTERY_CAPACITY => self.capacity_pct = value,
            _ => return false,
        }
        self.last_update = Some(self.clock.now());
        true
    }

    /// Terminal voltage in volts.
    pub fn voltage(&self) -> f64 {
        self.voltage
    }

    /// Drain current in amperes.
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Remaining capacity in percent.
    pub fn capacity_pct(&self) -> f64 {
        self.capacity_pct
    }

    /// Whether the readings are fresh enough to show.
    pub fn valid(&self) -> bool {
        match self.last_update {
            Some(at) => self.clock.now().saturating_sub(at) < STALE_AFTER_MS,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::FixedTime;

    fn rig() -> (BatteryStatus, FixedTime) {
        let clock = FixedTime::new(0);
        (BatteryStatus::new(Box::new(clock.clone())), clock)
    }

    #[test]
    fn fresh_status_is_invalid() {
        let (battery, _clock) = rig();
        assert!(!battery.valid());
    }

    #[test]
    fn whole_samples_record_and_expire() {
        let (mut battery, clock) = rig();
        battery.update(12.6, 0.4, 87.0);
        assert!(battery.valid());
        assert_eq!(battery.voltage(), 12.6);
        assert_eq!(battery.capacity_pct(), 87.0);

        clock.advance(250);
        assert!(!battery.valid());
    }

    #[test]
    fn fields_apply_individually() {
        let (mut battery, _clock) = rig();
        assert!(battery.apply_message(&Message::field(ids::BATTERY_VOLTAGE, 1, 12.5)));
        assert!(battery.apply_message(&Message::field(ids::BATTERY_CAPACITY, 1, 87.0)));
        assert_eq!(battery.voltage(), 12.5);
        assert_eq!(battery.current(), 0.0);
        assert!(battery.valid());
    }

    #[test]
    fn foreign_messages_are_left_alone() {
        let (mut battery, _clock) = rig();
        assert!(!battery.apply_message(&Message::field(ids::AIRDATA_ALPHA, 1, 5.0)));
        assert!(!battery.valid());
    }
}
