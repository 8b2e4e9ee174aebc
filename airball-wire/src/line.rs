//! Line-oriented text codec
//!
//! Serial-style transports frame the link as newline-terminated sentences
//! with a `$`-prefixed type tag and comma-separated fields:
//!
//! ```text
//! $AR,<sequence>,<alpha_deg>,<beta_deg>,<q_pa>,<p_pa>,<t_celsius>
//! $BA,<sequence>,<voltage>,<current>,<capacity_pct>
//! $SR
//! $CS,<base64 zlib settings snapshot>
//! ```
//!
//! The receive loop must survive anything a flaky serial line can produce,
//! so [`parse`] never fails: unrecognized tags and malformed sentences
//! decode to [`Sentence::Unknown`], an unparseable numeric field decodes to
//! NaN (the fusion layer quarantines NaN per channel), and a bad sequence
//! field decodes to zero.

#[cfg(not(feature = "std"))]
use alloc::{
    format,
    string::{String, ToString},
};

/// One parsed line of link traffic.
#[derive(Debug, Clone, PartialEq)]
pub enum Sentence {
    /// A complete airdata sample. Angles are in degrees here; the model
    /// converts to radians when the sample is assembled.
    Airdata {
        /// Probe-assigned sample sequence number.
        sequence: u32,
        /// Angle of attack in degrees.
        alpha: f64,
        /// Yaw angle in degrees.
        beta: f64,
        /// Dynamic pressure in pascals.
        q: f64,
        /// Static pressure in pascals.
        p: f64,
        /// Outside air temperature in degrees celsius.
        t: f64,
    },
    /// A probe battery status sample.
    Battery {
        /// Probe-assigned sample sequence number.
        sequence: u32,
        /// Battery terminal voltage in volts.
        voltage: f64,
        /// Battery drain current in amperes.
        current: f64,
        /// Remaining capacity in percent.
        capacity_pct: f64,
    },
    /// A follower asking the settings leader to rebroadcast.
    SettingsRequest,
    /// A full settings snapshot, compressed and base64-wrapped
    /// (see [`crate::blob`]).
    CompressedSettings(String),
    /// Anything this end of the link does not understand. Ignored, never
    /// an error.
    Unknown,
}

const AIRDATA_TAG: &str = "$AR";
const BATTERY_TAG: &str = "$BA";
const SETTINGS_REQUEST_TAG: &str = "$SR";
const COMPRESSED_SETTINGS_TAG: &str = "$CS";

fn next_f64<'a>(fields: &mut impl Iterator<Item = &'a str>) -> f64 {
    fields
        .next()
        .and_then(|f| f.parse().ok())
        .unwrap_or(f64::NAN)
}

fn next_u32<'a>(fields: &mut impl Iterator<Item = &'a str>) -> u32 {
    fields.next().and_then(|f| f.parse().ok()).unwrap_or(0)
}

/// Decode one line. Trailing CR/LF is tolerated.
pub fn parse(line: &str) -> Sentence {
    let mut fields = line.trim_end_matches(['\r', '\n']).split(',');
    match fields.next() {
        Some(AIRDATA_TAG) => Sentence::Airdata {
            sequence: next_u32(&mut fields),
            alpha: next_f64(&mut fields),
            beta: next_f64(&mut fields),
            q: next_f64(&mut fields),
            p: next_f64(&mut fields),
            t: next_f64(&mut fields),
        },
        Some(BATTERY_TAG) => Sentence::Battery {
            sequence: next_u32(&mut fields),
            voltage: next_f64(&mut fields),
            current: next_f64(&mut fields),
            capacity_pct: next_f64(&mut fields),
        },
        Some(SETTINGS_REQUEST_TAG) => Sentence::SettingsRequest,
        Some(COMPRESSED_SETTINGS_TAG) => match fields.next() {
            Some(blob) => Sentence::CompressedSettings(blob.to_string()),
            None => Sentence::Unknown,
        },
        _ => Sentence::Unknown,
    }
}

/// Encode one sentence, without the trailing newline.
///
/// [`Sentence::Unknown`] has no wire form and encodes to an empty string.
pub fn marshal(sentence: &Sentence) -> String {
    match sentence {
        Sentence::Airdata {
            sequence,
            alpha,
            beta,
            q,
            p,
            t,
        } => format!("{AIRDATA_TAG},{sequence},{alpha},{beta},{q},{p},{t}"),
        Sentence::Battery {
            sequence,
            voltage,
            current,
            capacity_pct,
        } => format!("{BATTERY_TAG},{sequence},{voltage},{current},{capacity_pct}"),
        Sentence::SettingsRequest => SETTINGS_REQUEST_TAG.to_string(),
        Sentence::CompressedSettings(blob) => {
            format!("{COMPRESSED_SETTINGS_TAG},{blob}")
        }
        Sentence::Unknown => String::new(),
    }
}
