//! One named, typed, bounded, persisted, wire-addressable setting.
//!
//! Every parameter knows its wire id, its JSON key, and how to move
//! itself in response to a knob click. Numeric edits land on a step
//! grid: the candidate value is floored to the nearest lower multiple
//! of the step and then clamped into range, so a parameter that starts
//! off-grid (say from a hand-edited file) snaps onto it at the first
//! click. A step of zero marks the parameter fixed; clicks do nothing.

use airball_wire::Message;
use serde_json::{Map, Value};

/// Decoration applied after the formatted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Unit {
    /// Bare value.
    None,
    /// Angle; rendered with a degree sign.
    Degrees,
    /// Airspeed; rendered with the currently selected speed units.
    Speed,
}

/// The typed payload of a parameter.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ParamKind {
    /// Bounded floating-point value with fixed display formatting.
    F64 {
        value: f64,
        min: f64,
        max: f64,
        step: f64,
        width: usize,
        decimals: usize,
    },
    /// Bounded integer value.
    I16 {
        value: i16,
        min: i16,
        max: i16,
        step: i16,
    },
    /// On/off flag. Increment asserts it, decrement clears it; neither
    /// toggles.
    Bool { value: bool },
    /// Selection from a fixed option list. Edits saturate at the ends
    /// rather than wrapping. `index` is always within `options`.
    Choice {
        options: &'static [&'static str],
        index: u16,
    },
}

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Parameter {
    id: u16,
    key: &'static str,
    name: &'static str,
    unit: Unit,
    kind: ParamKind,
}

impl Parameter {
    pub(crate) const fn speed(
        index: u16,
        key: &'static str,
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
        step: f64,
    ) -> Self {
        Self {
            id: airball_wire::ids::setting(index),
            key,
            name,
            unit: Unit::Speed,
            kind: ParamKind::F64 {
                value,
                min,
                max,
                step,
                width: 3,
                decimals: 0,
            },
        }
    }

    pub(crate) const fn angle(
        index: u16,
        key: &'static str,
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
        step: f64,
    ) -> Self {
        Self {
            id: airball_wire::ids::setting(index),
            key,
            name,
            unit: Unit::Degrees,
            kind: ParamKind::F64 {
                value,
                min,
                max,
                step,
                width: 4,
                decimals: 1,
            },
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) const fn number(
        index: u16,
        key: &'static str,
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
        step: f64,
        width: usize,
        decimals: usize,
    ) -> Self {
        Self {
            id: airball_wire::ids::setting(index),
            key,
            name,
            unit: Unit::None,
            kind: ParamKind::F64 {
                value,
                min,
                max,
                step,
                width,
                decimals,
            },
        }
    }

    pub(crate) const fn integer(
        index: u16,
        key: &'static str,
        name: &'static str,
        value: i16,
        min: i16,
        max: i16,
        step: i16,
    ) -> Self {
        Self {
            id: airball_wire::ids::setting(index),
            key,
            name,
            unit: Unit::None,
            kind: ParamKind::I16 {
                value,
                min,
                max,
                step,
            },
        }
    }

    pub(crate) const fn boolean(
        index: u16,
        key: &'static str,
        name: &'static str,
        value: bool,
    ) -> Self {
        Self {
            id: airball_wire::ids::setting(index),
            key,
            name,
            unit: Unit::None,
            kind: ParamKind::Bool { value },
        }
    }

    pub(crate) const fn choice(
        index: u16,
        key: &'static str,
        name: &'static str,
        options: &'static [&'static str],
        initial: u16,
    ) -> Self {
        Self {
            id: airball_wire::ids::setting(index),
            key,
            name,
            unit: Unit::None,
            kind: ParamKind::Choice {
                options,
                index: initial,
            },
        }
    }

    pub(crate) fn id(&self) -> u16 {
        self.id
    }

    pub(crate) fn key(&self) -> &'static str {
        self.key
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn kind(&self) -> &ParamKind {
        &self.kind
    }

    /// Take this parameter's value from a settings document, if present.
    ///
    /// Values are accepted verbatim; a choice naming no known option is
    /// ignored.
    pub(crate) fn load(&mut self, doc: &Map<String, Value>) {
        let Some(stored) = doc.get(self.key) else {
            return;
        };
        match &mut self.kind {
            ParamKind::F64 { value, .. } => {
                if let Some(v) = stored.as_f64() {
                    *value = v;
                }
            }
            ParamKind::I16 { value, .. } => {
                if let Some(v) = stored.as_i64().and_then(|v| i16::try_from(v).ok()) {
                    *value = v;
                }
            }
            ParamKind::Bool { value } => {
                if let Some(v) = stored.as_bool() {
                    *value = v;
                }
            }
            ParamKind::Choice { options, index } => {
                if let Some(found) = stored
                    .as_str()
                    .and_then(|s| options.iter().position(|o| *o == s))
                {
                    *index = found as u16;
                }
            }
        }
    }

    /// Write this parameter's value into a settings document.
    pub(crate) fn save(&self, doc: &mut Map<String, Value>) {
        let value = match &self.kind {
            ParamKind::F64 { value, .. } => Value::from(*value),
            ParamKind::I16 { value, .. } => Value::from(i64::from(*value)),
            ParamKind::Bool { value } => Value::Bool(*value),
            ParamKind::Choice { options, index } => {
                Value::String(options[*index as usize].to_string())
            }
        };
        doc.insert(self.key.to_string(), value);
    }

    /// This parameter's current value as a wire message.
    pub(crate) fn to_message(&self) -> Message {
        match &self.kind {
            ParamKind::F64 { value, .. } => Message::from_f64(self.id, *value),
            ParamKind::I16 { value, .. } => Message::from_i16(self.id, *value),
            ParamKind::Bool { value } => Message::from_bool(self.id, *value),
            ParamKind::Choice { index, .. } => Message::from_index(self.id, *index),
        }
    }

    /// Take this parameter's value from a wire message. Returns whether
    /// the message was addressed to this parameter.
    pub(crate) fn apply_message(&mut self, message: &Message) -> bool {
        if message.id != self.id {
            return false;
        }
        match &mut self.kind {
            ParamKind::F64 { value, .. } => *value = message.as_f64(),
            ParamKind::I16 { value, .. } => *value = message.as_i16(),
            ParamKind::Bool { value } => *value = message.as_bool(),
            ParamKind::Choice { options, index } => {
                // A peer could send any index; keep ours in bounds.
                *index = message.as_index().min(options.len() as u16 - 1);
            }
        }
        true
    }

    pub(crate) fn increment(&mut self) {
        self.nudge(1.0);
    }

    pub(crate) fn decrement(&mut self) {
        self.nudge(-1.0);
    }

    fn nudge(&mut self, direction: f64) {
        match &mut self.kind {
            ParamKind::F64 {
                value,
                min,
                max,
                step,
                ..
            } => {
                if *step == 0.0 {
                    return;
                }
                let moved = *value + direction * *step;
                // The quotient carries float noise; without the epsilon
                // an on-grid value floors back onto itself and the knob
                // sticks.
                let grid = libm::floor(moved / *step + 1e-9);
                *value = (grid * *step).clamp(*min, *max);
            }
            ParamKind::I16 {
                value,
                min,
                max,
                step,
            } => {
                if *step == 0 {
                    return;
                }
                let moved = value.saturating_add(if direction > 0.0 { *step } else { -*step });
                let aligned = (moved / *step) * *step;
                *value = aligned.clamp(*min, *max);
            }
            ParamKind::Bool { value } => *value = direction > 0.0,
            ParamKind::Choice { options, index } => {
                if direction > 0.0 {
                    *index = (*index + 1).min(options.len() as u16 - 1);
                } else {
                    *index = index.saturating_sub(1);
                }
            }
        }
    }

    /// The value formatted for the adjustment overlay. `speed_units` is
    /// the option string of the speed-units parameter, appended to
    /// airspeed values.
    pub(crate) fn display_value(&self, speed_units: &str) -> String {
        let body = match &self.kind {
            ParamKind::F64 {
                value,
                width,
                decimals,
                ..
            } => {
                let (value, width, decimals) = (*value, *width, *decimals);
                format!("{value:>width$.decimals$}")
            }
            ParamKind::I16 { value, .. } => value.to_string(),
            ParamKind::Bool { value } => if *value { "yes" } else { "no" }.to_string(),
            ParamKind::Choice { options, index } => options[*index as usize].to_string(),
        };
        match self.unit {
            Unit::None => body,
            Unit::Degrees => format!("{body} °"),
            Unit::Speed => format!("{body} {speed_units}"),
        }
    }
}
