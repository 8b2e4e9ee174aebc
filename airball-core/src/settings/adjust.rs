//! Adjustment session state.
//!
//! The knob edits one parameter at a time, drawn from one of two groups:
//! a short *shallow* list of in-flight settings (altimeter, brightness,
//! volume) and a *deep* list holding the full configuration reached by
//! holding the mode key. [`Adjustment`] is the whole session: which
//! group, which slot, or nothing at all.

/// What the knob is currently pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Adjustment {
    /// No adjustment in progress.
    #[default]
    Idle,
    /// Editing slot `i` of the shallow group.
    Shallow(usize),
    /// Editing slot `i` of the deep group.
    Deep(usize),
}

impl Adjustment {
    /// Whether no adjustment session is open.
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// A short press of the mode key: open the shallow group, or step to
    /// the next slot of whichever group is open, wrapping at the end.
    #[must_use]
    pub fn advanced(self, shallow_len: usize, deep_len: usize) -> Self {
        match self {
            Self::Idle => Self::Shallow(0),
            Self::Shallow(i) => Self::Shallow((i + 1) % shallow_len),
            Self::Deep(i) => Self::Deep((i + 1) % deep_len),
        }
    }

    /// A long press of the mode key: jump into the deep group from
    /// anywhere else, or back out to the shallow group from deep.
    #[must_use]
    pub fn toggled_group(self) -> Self {
        match self {
            Self::Deep(_) => Self::Shallow(0),
            Self::Idle | Self::Shallow(_) => Self::Deep(0),
        }
    }

    /// The inactivity timeout. Only a shallow session auto-closes; a
    /// pilot who deliberately opened the deep group keeps it until they
    /// leave it themselves.
    #[must_use]
    pub fn cancelled(self) -> Self {
        match self {
            Self::Shallow(_) => Self::Idle,
            other => other,
        }
    }
}

/// Whether the adjustment knob device is present.
///
/// The instance with a connected knob is the settings leader; an
/// instance without one follows whatever the leader broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KnobState {
    /// Not yet determined (startup).
    #[default]
    Unknown,
    /// The input device is open and delivering events.
    Connected,
    /// The input device is absent or unreadable.
    Disconnected,
}
