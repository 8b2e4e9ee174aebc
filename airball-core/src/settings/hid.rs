//! Adjustment knob input.
//!
//! The knob is a stock USB media controller: volume up/down for the
//! rotary ring, play/pause for the push button. Events arrive as raw
//! `input_event` records from the evdev node; this module decodes them
//! into [`ButtonEvent`]s and runs the reader thread that feeds the
//! model queue.
//!
//! The reader also owns the two session timers. Any knob activity
//! restarts the inactivity timer; pressing the mode key additionally
//! arms the long-press timer, and releasing it disarms it before it can
//! fire. The timers post their expirations to the same queue as the
//! buttons, so ordering stays sane.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::events::{ButtonEvent, ModelEvent};
use crate::queue::EventQueue;
use crate::settings::adjust::KnobState;
use crate::timer::{RestartableTimer, TimerService};

/// Knob inactivity before an open shallow session closes.
pub const CANCEL_DELAY: Duration = Duration::from_millis(5000);

/// How long the mode key must be held to switch setting groups.
pub const LONG_PRESS_DELAY: Duration = Duration::from_millis(2000);

/// Pause between attempts to open a missing knob device.
pub const REOPEN_DELAY: Duration = Duration::from_millis(5000);

/// Size of one evdev `input_event` record on 64-bit targets.
pub const EVENT_LEN: usize = 24;

// ===== EVDEV CONSTANTS =====
// Source: linux/input-event-codes.h

const EV_KEY: u16 = 1;
const KEY_VOLUMEDOWN: u16 = 114;
const KEY_VOLUMEUP: u16 = 115;
const KEY_PLAYPAUSE: u16 = 164;

const KEY_RELEASED: i32 = 0;
const KEY_PRESSED: i32 = 1;

/// Decode one raw `input_event` record. Returns `None` for anything
/// that is not a key action the knob produces (sync reports, key
/// repeats, other keys).
///
/// Layout on 64-bit: 16 bytes of timestamp, then type, code, and value,
/// all little-endian.
pub fn classify(event: &[u8; EVENT_LEN]) -> Option<ButtonEvent> {
    let kind = u16::from_le_bytes([event[16], event[17]]);
    if kind != EV_KEY {
        return None;
    }
    let code = u16::from_le_bytes([event[18], event[19]]);
    let value = i32::from_le_bytes([event[20], event[21], event[22], event[23]]);
    match (code, value) {
        (KEY_VOLUMEUP, KEY_RELEASED) => Some(ButtonEvent::Increment),
        (KEY_VOLUMEDOWN, KEY_RELEASED) => Some(ButtonEvent::Decrement),
        (KEY_PLAYPAUSE, KEY_PRESSED) => Some(ButtonEvent::AdjustPressed),
        (KEY_PLAYPAUSE, KEY_RELEASED) => Some(ButtonEvent::AdjustReleased),
        _ => None,
    }
}

/// Run the knob reader for the life of the process.
///
/// Posts [`ModelEvent::Knob`] on every connect/disconnect observation
/// (the facade dedups transitions) and [`ModelEvent::Button`] for every
/// decoded key action. A missing device is retried forever.
pub fn spawn_knob_reader(
    device: PathBuf,
    queue: Arc<EventQueue>,
    timers: Arc<TimerService>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let cancel = RestartableTimer::new(Arc::clone(&timers));
        let long_press = RestartableTimer::new(timers);
        loop {
            let mut file = match File::open(&device) {
                Ok(file) => file,
                Err(_) => {
                    queue.post(ModelEvent::Knob(KnobState::Disconnected));
                    std::thread::sleep(REOPEN_DELAY);
                    continue;
                }
            };
            queue.post(ModelEvent::Knob(KnobState::Connected));
            log::info!("adjustment knob present at {}", device.display());

            let mut raw = [0u8; EVENT_LEN];
            while file.read_exact(&mut raw).is_ok() {
                let Some(button) = classify(&raw) else {
                    continue;
                };
                queue.post(ModelEvent::Button(button));
                arm_timers(button, &cancel, &long_press, &queue);
            }
            // Device went away mid-read; fall through and reopen.
        }
    })
}

fn arm_timers(
    button: ButtonEvent,
    cancel: &RestartableTimer,
    long_press: &RestartableTimer,
    queue: &Arc<EventQueue>,
) {
    let q = Arc::clone(queue);
    cancel.restart(CANCEL_DELAY, move || q.post(ModelEvent::CancelTimerFired));
    match button {
        ButtonEvent::AdjustPressed => {
            let q = Arc::clone(queue);
            long_press.restart(LONG_PRESS_DELAY, move || {
                q.post(ModelEvent::LongPressTimerFired);
            });
        }
        ButtonEvent::AdjustReleased => long_press.stop(),
        ButtonEvent::Increment | ButtonEvent::Decrement => {}
    }
}
