//! End-to-end flows through the display model
//!
//! The unit tests pin each module alone; these scenarios wire the
//! public pieces together the way the panel binary does: a transport
//! feeding the event queue, the model pumping it, settings edits
//! steering fusion, and the watcher closing the file-reload loop.

#![cfg(feature = "std")]

use std::sync::Arc;
use std::time::Duration;

use airball_core::aero;
use airball_core::airdata::Airdata;
use airball_core::battery::BatteryStatus;
use airball_core::settings::adjust::KnobState;
use airball_core::settings::watch::{spawn_watcher, POLL_INTERVAL};
use airball_core::settings::Settings;
use airball_core::storage::AtomicStore;
use airball_core::telemetry::{spawn_receiver, LoopbackTelemetry, MemorySink, Telemetry};
use airball_core::time::{FixedTime, STALE_AFTER_MS};
use airball_core::{AirballModel, ButtonEvent, EventQueue, ModelEvent};
use airball_wire::{ids, Message};

fn rig(dir: &tempfile::TempDir) -> (AirballModel, FixedTime, MemorySink) {
    let clock = FixedTime::new(1_000);
    let sink = MemorySink::new();
    let airdata = Airdata::new(Box::new(clock.clone()));
    let battery = BatteryStatus::new(Box::new(clock.clone()));
    let settings = Settings::new(dir.path().join("settings.store"), Box::new(sink.clone()));
    (
        AirballModel::new(airdata, battery, settings),
        clock,
        sink,
    )
}

/// One complete probe cycle at 30 m/s in standard air, alpha dialed in
/// degrees as it travels on the wire.
fn probe_cycle(sequence: u32, alpha_degrees: f32) -> [Message; 5] {
    [
        Message::field(ids::AIRDATA_ALPHA, sequence, alpha_degrees),
        Message::field(ids::AIRDATA_BETA, sequence, 1.0),
        Message::field(ids::AIRDATA_DYNAMIC_PRESSURE, sequence, 551.25),
        Message::field(ids::AIRDATA_STATIC_PRESSURE, sequence, 101_300.0),
        Message::field(ids::AIRDATA_TEMPERATURE, sequence, 15.0),
    ]
}

#[test]
fn probe_traffic_reaches_the_display_over_a_live_transport() {
    let dir = tempfile::tempdir().unwrap();
    let (mut model, _clock, _sink) = rig(&dir);
    let queue = Arc::new(EventQueue::new());

    let (panel_end, mut probe_end) = LoopbackTelemetry::pair();
    let worker = spawn_receiver(panel_end, Arc::clone(&queue));

    for message in probe_cycle(12, 5.0) {
        Telemetry::send(&mut probe_end, message);
    }
    Telemetry::send(&mut probe_end, Message::field(ids::BATTERY_VOLTAGE, 12, 12.6));
    drop(probe_end);
    worker.join().unwrap();

    model.pump(&queue);
    assert!(queue.is_empty());
    assert!(model.airdata().valid());
    assert!((model.airdata().smooth_ball().ias - 30.0).abs() < 0.01);
    assert!(model.battery().valid());
    assert!((model.battery().voltage() - 12.6).abs() < 1e-6);
}

#[test]
fn a_steady_flight_converges_then_expires_when_the_link_drops() {
    let dir = tempfile::tempdir().unwrap();
    let (mut model, clock, _sink) = rig(&dir);

    // The first sample is assigned directly.
    for message in probe_cycle(1, 2.0) {
        model.handle(ModelEvent::Telemetry(message));
    }
    let snapped = model.airdata().smooth_ball().alpha;
    assert!((snapped - aero::degrees_to_radians(2.0)).abs() < 1e-9);

    // Five seconds of 20 Hz samples at a new attitude is ten time
    // constants; the ball must have settled there.
    for sequence in 2..102 {
        clock.advance(50);
        for message in probe_cycle(sequence, 6.0) {
            model.handle(ModelEvent::Telemetry(message));
        }
    }
    let settled = model.airdata().smooth_ball().alpha;
    assert!((settled - aero::degrees_to_radians(6.0)).abs() < 1e-4);
    assert!(model.airdata().valid());

    // Silence ages the state out at read time, no timer involved.
    clock.advance(STALE_AFTER_MS);
    assert!(!model.airdata().valid());

    // The next sample brings the display straight back.
    for message in probe_cycle(102, 6.0) {
        model.handle(ModelEvent::Telemetry(message));
    }
    assert!(model.airdata().valid());
}

#[test]
fn fleet_sync_replays_the_catalog_to_a_panel_without_a_knob() {
    let leader_dir = tempfile::tempdir().unwrap();
    let follower_dir = tempfile::tempdir().unwrap();
    let (mut leader, _clock, leader_sink) = rig(&leader_dir);
    let (mut follower, _clock, follower_sink) = rig(&follower_dir);

    // The leader owns the knob and has dialed the altimeter up two
    // clicks since its last broadcast.
    leader.handle(ModelEvent::Knob(KnobState::Connected));
    leader.handle(ModelEvent::Button(ButtonEvent::AdjustPressed));
    leader.handle(ModelEvent::Button(ButtonEvent::Increment));
    leader.handle(ModelEvent::Button(ButtonEvent::Increment));
    leader_sink.clear();

    // A panel that boots without a knob asks the fleet.
    follower.handle(ModelEvent::Knob(KnobState::Disconnected));
    let requests = follower_sink.sent();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].id, ids::SETTINGS_REQUEST);
    for message in requests {
        leader.handle(ModelEvent::Telemetry(message));
    }

    // The leader answers with its whole catalog and the follower adopts
    // the edited value.
    let replies = leader_sink.sent();
    assert_eq!(replies.len(), 30);
    assert!(replies.iter().all(|m| ids::is_setting(m.id)));
    for message in replies {
        follower.handle(ModelEvent::Telemetry(message));
    }
    assert!((follower.settings().store().baro_setting() - 29.94).abs() < 1e-9);

    // Synced values live in memory only; the follower's own file still
    // boots to defaults.
    drop(follower);
    let (rebooted, _clock, _sink) = rig(&follower_dir);
    assert!((rebooted.settings().store().baro_setting() - 29.92).abs() < 1e-9);
}

#[test]
fn smoothing_follows_the_dialed_time_constant_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let (mut model, clock, _sink) = rig(&dir);

    for message in probe_cycle(1, 2.0) {
        model.handle(ModelEvent::Telemetry(message));
    }

    // Hold for the deep group, step to the ball time constant, and
    // dial it to zero.
    model.handle(ModelEvent::LongPressTimerFired);
    for _ in 0..14 {
        model.handle(ModelEvent::Button(ButtonEvent::AdjustPressed));
    }
    assert_eq!(model.settings().adjustment_display_name(), "BALL T");
    for _ in 0..5 {
        model.handle(ModelEvent::Button(ButtonEvent::Decrement));
    }
    assert_eq!(model.settings().adjustment_display_value(), "0.00");

    // A zero time constant disables smoothing, starting with the very
    // next sample.
    clock.advance(50);
    for message in probe_cycle(2, 6.0) {
        model.handle(ModelEvent::Telemetry(message));
    }
    let alpha = model.airdata().smooth_ball().alpha;
    assert!((alpha - aero::degrees_to_radians(6.0)).abs() < 1e-9);
}

#[test]
fn dialing_the_altimeter_moves_altitude_but_never_fakes_a_climb() {
    let dir = tempfile::tempdir().unwrap();
    let (mut model, clock, _sink) = rig(&dir);

    // Level flight long enough to fill the one-second climb window.
    for sequence in 1..=25 {
        clock.advance(50);
        for message in probe_cycle(sequence, 5.0) {
            model.handle(ModelEvent::Telemetry(message));
        }
    }
    let level_altitude = model.airdata().altitude();
    assert!(model.airdata().climb_rate().abs() < 1e-9);

    // One click of QNH is a hundredth of an inch of mercury, about
    // three meters at sea level.
    model.handle(ModelEvent::Button(ButtonEvent::AdjustPressed));
    assert_eq!(model.settings().adjustment_display_name(), "BARO");
    model.handle(ModelEvent::Button(ButtonEvent::Increment));

    clock.advance(50);
    for message in probe_cycle(26, 5.0) {
        model.handle(ModelEvent::Telemetry(message));
    }
    let dialed_altitude = model.airdata().altitude();
    assert!(dialed_altitude - level_altitude > 2.0);
    assert!(dialed_altitude - level_altitude < 4.0);
    assert!(model.airdata().climb_rate().abs() < 1e-9);
}

#[test]
fn an_external_rewrite_reaches_the_live_model_through_the_watcher() {
    let dir = tempfile::tempdir().unwrap();
    let (mut model, _clock, _sink) = rig(&dir);
    let path = dir.path().join("settings.store");

    let queue = Arc::new(EventQueue::new());
    let _watcher = spawn_watcher(path.clone(), Arc::clone(&queue));

    // The store rewrite keeps the file length fixed, so the watcher can
    // only see the mtime move; leave a whole second for coarse
    // filesystem clocks.
    std::thread::sleep(Duration::from_millis(1_100));
    AtomicStore::new(&path)
        .write_payload(br#"{"baro_setting":31.0}"#)
        .unwrap();
    std::thread::sleep(POLL_INTERVAL + Duration::from_millis(300));

    model.pump(&queue);
    assert!((model.settings().store().baro_setting() - 31.0).abs() < 1e-9);
}
