//! Events for the Model Thread
//!
//! ## Overview
//!
//! Every input to the display model arrives as one of these events:
//! telemetry from the probe link, button activity from the adjustment
//! knob, timer expirations, and settings-file changes. Source threads
//! construct events and post them to the [`crate::queue::EventQueue`];
//! only the model thread consumes them, so all model state mutates on
//! one thread regardless of how many sources feed it.
//!
//! ```text
//! link rx thread ──► Telemetry / Sentence ──┐
//! knob thread ─────► Button / Knob ─────────┤
//! timer worker ────► *TimerFired ───────────┼──► queue ──► model thread
//! file watcher ────► SettingsFileChanged ───┘
//! ```
//!
//! Events are plain data rather than queued closures so the queue can be
//! logged, inspected in tests, and kept free of cross-thread lifetime
//! knots.

use airball_wire::{Message, Sentence};

use crate::settings::adjust::KnobState;

/// Semantic input from the adjustment knob.
///
/// The knob thread does the raw key decoding (see
/// [`crate::settings::hid`]); by the time an event reaches the model it
/// already means something.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    /// The increment key was released.
    Increment,
    /// The decrement key was released.
    Decrement,
    /// The mode key went down.
    AdjustPressed,
    /// The mode key came back up.
    AdjustReleased,
}

/// One unit of input for [`crate::model::AirballModel::handle`].
#[derive(Debug, Clone, PartialEq)]
pub enum ModelEvent {
    /// A binary envelope from the probe link.
    Telemetry(Message),
    /// A parsed line from a text transport.
    Sentence(Sentence),
    /// Knob button activity.
    Button(ButtonEvent),
    /// The knob device appeared or disappeared.
    Knob(KnobState),
    /// The adjustment inactivity timer expired.
    CancelTimerFired,
    /// The mode key was held long enough to switch setting groups.
    LongPressTimerFired,
    /// The settings file changed on disk behind our back.
    SettingsFileChanged,
}
