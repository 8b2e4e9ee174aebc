//! Stable message id catalog
//!
//! Both ends of the probe link are flashed independently, so ids are part
//! of the protocol and never renumbered. The space is split into families:
//!
//! ```text
//! 0x0001            control (settings request)
//! 0x0010 - 0x0014   airdata fields, sequenced f32 payloads
//! 0x0020 - 0x0022   probe battery fields, sequenced f32 payloads
//! 0x0100 - 0x011d   settings parameters, one id per catalog entry
//! ```
//!
//! Settings ids are `SETTING_BASE + catalog index`, so the parameter
//! catalog order is itself part of the protocol.

/// Ask the settings leader to rebroadcast every parameter. Empty payload.
pub const SETTINGS_REQUEST: u16 = 0x0001;

/// Angle of attack, in degrees on the wire (the model converts to radians).
pub const AIRDATA_ALPHA: u16 = 0x0010;

/// Yaw angle, in degrees on the wire (the model converts to radians).
pub const AIRDATA_BETA: u16 = 0x0011;

/// Dynamic pressure `q`, in pascals.
pub const AIRDATA_DYNAMIC_PRESSURE: u16 = 0x0012;

/// Static pressure `p`, in pascals.
pub const AIRDATA_STATIC_PRESSURE: u16 = 0x0013;

/// Outside air temperature, in degrees celsius.
pub const AIRDATA_TEMPERATURE: u16 = 0x0014;

/// Probe battery terminal voltage, in volts.
pub const BATTERY_VOLTAGE: u16 = 0x0020;

/// Probe battery drain current, in amperes.
pub const BATTERY_CURRENT: u16 = 0x0021;

/// Probe battery remaining capacity, in percent.
pub const BATTERY_CAPACITY: u16 = 0x0022;

/// First settings parameter id; the rest follow in catalog order.
pub const SETTING_BASE: u16 = 0x0100;

/// Number of settings parameters in the catalog.
pub const SETTING_COUNT: u16 = 30;

/// Id of the settings parameter at `index` in the catalog.
pub const fn setting(index: u16) -> u16 {
    SETTING_BASE + index
}

/// Whether `id` belongs to the airdata field family.
pub const fn is_airdata(id: u16) -> bool {
    id >= AIRDATA_ALPHA && id <= AIRDATA_TEMPERATURE
}

/// Whether `id` belongs to the battery field family.
pub const fn is_battery(id: u16) -> bool {
    id >= BATTERY_VOLTAGE && id <= BATTERY_CAPACITY
}

/// Whether `id` belongs to the settings parameter family.
pub const fn is_setting(id: u16) -> bool {
    id >= SETTING_BASE && id < SETTING_BASE + SETTING_COUNT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn families_do_not_overlap() {
        for id in 0..=u16::MAX {
            let families = [is_airdata(id), is_battery(id), is_setting(id)];
            assert!(families.iter().filter(|f| **f).count() <= 1);
        }
    }

    #[test]
    fn setting_ids_stay_in_family() {
        assert!(is_setting(setting(0)));
        assert!(is_setting(setting(SETTING_COUNT - 1)));
        assert!(!is_setting(setting(SETTING_COUNT)));
    }
}
