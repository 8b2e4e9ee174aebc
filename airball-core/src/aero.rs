//! Aerodynamic constants and unit conversions
//!
//! Pure functions shared by the fusion model and the settings surface.
//! Inputs are SI unless a name says otherwise: pressures in pascals,
//! temperatures in degrees celsius, speeds in meters per second, angles in
//! radians once inside the model.
//!
//! None of these guard their domain. A negative dynamic pressure from a
//! misbehaving probe turns into NaN here and is quarantined by the fusion
//! layer, which is the one place that policy belongs.

// ===== ATMOSPHERE =====

/// Air density at the standard sea-level atmosphere (kg/m³).
///
/// Indicated airspeed is defined against this fixed density, whatever the
/// air outside is doing.
///
/// Source: International Standard Atmosphere
pub const RHO_STANDARD: f64 = 1.225;

/// Specific gas constant of dry air (J/(kg·K)).
///
/// Source: ICAO Doc 7488, Manual of the ICAO Standard Atmosphere
pub const R_DRY_AIR: f64 = 287.058;

/// Standard sea-level pressure (Pa), the altimeter reference when no
/// local QNH is dialed in.
pub const QNH_STANDARD_PA: f64 = 101.3e3;

/// Offset between the celsius and kelvin scales.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Pascals per inch of mercury, the unit pilots dial QNH in.
///
/// Source: NIST Special Publication 811
pub const PASCALS_PER_INHG: f64 = 3386.389;

/// Temperature lapse rate in the troposphere (K/m).
const LAPSE_RATE_K_PER_M: f64 = 0.0065;

/// Exponent of the barometric altitude formula.
const BARO_EXPONENT: f64 = 1.0 / 5.257;

// ===== ANGLES AND TEMPERATURES =====

/// Degrees to radians.
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * core::f64::consts::PI / 180.0
}

/// Radians to degrees.
pub fn radians_to_degrees(radians: f64) -> f64 {
    radians * 180.0 / core::f64::consts::PI
}

/// Celsius to kelvin.
pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}

// ===== AIRSPEED =====

/// Meters per second in one knot, for speed readouts dialed to knots.
///
/// Source: NIST Special Publication 811
pub const METERS_PER_SECOND_PER_KNOT: f64 = 1852.0 / 3600.0;

/// Density of dry air (kg/m³) at static pressure `p` (Pa) and temperature
/// `t` (°C), by the ideal gas law.
pub fn dry_air_density(p: f64, t: f64) -> f64 {
    p / (R_DRY_AIR * celsius_to_kelvin(t))
}

/// Indicated airspeed (m/s) for dynamic pressure `q` (Pa).
pub fn q_to_ias(q: f64) -> f64 {
    libm::sqrt(2.0 * q / RHO_STANDARD)
}

/// Dynamic pressure (Pa) at indicated airspeed `ias` (m/s).
pub fn ias_to_q(ias: f64) -> f64 {
    0.5 * RHO_STANDARD * ias * ias
}

/// True airspeed (m/s) for dynamic pressure `q` (Pa) in air at static
/// pressure `p` (Pa) and temperature `t` (°C).
pub fn q_to_tas(q: f64, p: f64, t: f64) -> f64 {
    libm::sqrt(2.0 * q / dry_air_density(p, t))
}

// ===== ALTITUDE =====

/// Barometric altitude (m) above the `qnh` (Pa) reference level, for
/// static pressure `p` (Pa) and outside air temperature `t` (°C).
pub fn pressure_to_altitude(t: f64, p: f64, qnh: f64) -> f64 {
    (libm::pow(qnh / p, BARO_EXPONENT) - 1.0) * celsius_to_kelvin(t) / LAPSE_RATE_K_PER_M
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    #[test]
    fn degree_radian_round_trip() {
        assert!(close(
            degrees_to_radians(180.0),
            core::f64::consts::PI,
            1e-12
        ));
        assert!(close(radians_to_degrees(degrees_to_radians(5.0)), 5.0, 1e-12));
    }

    #[test]
    fn ias_inverts_q() {
        let q = ias_to_q(30.0);
        assert!(close(q, 551.25, 1e-9));
        assert!(close(q_to_ias(q), 30.0, 1e-9));
    }

    #[test]
    fn tas_equals_ias_in_standard_air() {
        // 101325 Pa at 15°C is within a fraction of a percent of the
        // defining 1.225 kg/m³.
        let q = ias_to_q(40.0);
        let tas = q_to_tas(q, 101_325.0, 15.0);
        assert!(close(tas, 40.0, 0.05));
    }

    #[test]
    fn tas_exceeds_ias_in_thin_air() {
        let q = ias_to_q(40.0);
        assert!(q_to_tas(q, 70_000.0, -10.0) > 40.0);
    }

    #[test]
    fn standard_density_at_sea_level() {
        assert!(close(dry_air_density(101_325.0, 15.0), 1.225, 0.002));
    }

    #[test]
    fn altitude_is_zero_at_the_reference() {
        assert!(close(
            pressure_to_altitude(15.0, QNH_STANDARD_PA, QNH_STANDARD_PA),
            0.0,
            1e-9
        ));
    }

    #[test]
    fn altitude_rises_as_pressure_falls() {
        let low = pressure_to_altitude(15.0, 100_000.0, QNH_STANDARD_PA);
        let high = pressure_to_altitude(15.0, 90_000.0, QNH_STANDARD_PA);
        assert!(high > low);
        assert!(low > 0.0);
    }

    #[test]
    fn altitude_tracks_the_qnh_reference() {
        // Dialing a higher QNH at fixed static pressure reads higher.
        let p = 99_000.0;
        let std_ref = pressure_to_altitude(15.0, p, QNH_STANDARD_PA);
        let high_ref = pressure_to_altitude(15.0, p, 102_300.0);
        assert!(high_ref > std_ref);
    }

    #[test]
    fn negative_q_propagates_nan() {
        assert!(q_to_ias(-10.0).is_nan());
        assert!(q_to_tas(-10.0, 101_325.0, 15.0).is_nan());
    }
}
