//! Property tests for the model's load-bearing invariants
//!
//! Assembly order independence, rate fit correctness, knob-session
//! range safety, and store round-tripping all hold for whole families
//! of inputs, not just the corners the unit tests pin. These exercise
//! the families.

#![cfg(feature = "std")]

use proptest::prelude::*;

use airball_core::airdata::{AirdataAssembler, FieldTag};
use airball_core::filter::{LinearRateFilter, MAX_RATE_WINDOW};
use airball_core::settings::adjust::Adjustment;
use airball_core::settings::store::{DEEP, SHALLOW};
use airball_core::settings::Settings;
use airball_core::storage::AtomicStore;
use airball_core::telemetry::MemorySink;

const TAGS: [FieldTag; 5] = [
    FieldTag::Alpha,
    FieldTag::Beta,
    FieldTag::DynamicPressure,
    FieldTag::StaticPressure,
    FieldTag::Temperature,
];

proptest! {
    #[test]
    fn assembly_is_order_independent(
        sequence in any::<u32>(),
        values in prop::collection::vec(-1.0e6f64..1.0e6, 5),
        order in Just(vec![0usize, 1, 2, 3, 4]).prop_shuffle(),
    ) {
        let mut assembler = AirdataAssembler::new();
        let mut sample = None;
        for (arrival, &slot) in order.iter().enumerate() {
            let emitted = assembler.submit(sequence, TAGS[slot], values[slot]);
            if arrival < 4 {
                prop_assert!(emitted.is_none());
            } else {
                sample = emitted;
            }
        }

        prop_assert!(sample.is_some(), "fifth distinct field did not complete the sample");
        let sample = sample.unwrap();
        prop_assert_eq!(sample.sequence, sequence);
        prop_assert_eq!(sample.alpha, values[0]);
        prop_assert_eq!(sample.beta, values[1]);
        prop_assert_eq!(sample.q, values[2]);
        prop_assert_eq!(sample.p, values[3]);
        prop_assert_eq!(sample.t, values[4]);
    }

    #[test]
    fn rate_filter_recovers_any_ramp(
        slope in -1.0e4f64..1.0e4,
        intercept in -1.0e6f64..1.0e6,
        size in 2usize..=MAX_RATE_WINDOW,
    ) {
        let mut filter = LinearRateFilter::new(size);
        for i in 0..size {
            filter.put(slope * i as f64 + intercept);
        }
        prop_assert!(
            (filter.rate() - slope).abs() <= 1e-6 * (1.0 + slope.abs()),
            "fitted {} for a ramp of slope {}",
            filter.rate(),
            slope,
        );
    }
}

proptest! {
    // These hit the filesystem on every case, so run fewer of them.
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn knob_sessions_never_leave_the_catalog_ranges(actions in prop::collection::vec(0u8..6, 0..40)) {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::new(
            dir.path().join("settings.store"),
            Box::new(MemorySink::new()),
        );

        for action in actions {
            match action {
                0 => settings.hid_increment(),
                1 => settings.hid_decrement(),
                2 => settings.hid_adjust_pressed(),
                3 => settings.hid_adjust_released(),
                4 => settings.long_press_timer_fired(),
                _ => settings.cancel_timer_fired(),
            }

            match settings.adjustment() {
                Adjustment::Idle => prop_assert!(!settings.adjusting()),
                Adjustment::Shallow(i) => prop_assert!(i < SHALLOW.len()),
                Adjustment::Deep(i) => prop_assert!(i < DEEP.len()),
            }
            if settings.adjusting() {
                prop_assert!(!settings.adjustment_display_name().is_empty());
                prop_assert!(!settings.adjustment_display_value().is_empty());
            }
        }

        let store = settings.store();
        prop_assert!((25.0..=35.0).contains(&store.baro_setting()));
        prop_assert!((0.0..=1.0).contains(&store.screen_brightness()));
        prop_assert!((0.0..=1.0).contains(&store.audio_volume()));
        prop_assert!((0.0..=1.0).contains(&store.ball_time_constant()));
        prop_assert!((0.1..=5.0).contains(&store.vsi_time_constant()));
        prop_assert!((0.5..=1.5).contains(&store.q_correction_factor()));
        prop_assert!((-10.0..=30.0).contains(&store.alpha_ref()));
        prop_assert!((0.0..=300.0).contains(&store.ias_full_scale()));
    }

    #[test]
    fn volume_edits_stay_on_the_knob_grid(down in 0usize..30, up in 0usize..30) {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::new(
            dir.path().join("settings.store"),
            Box::new(MemorySink::new()),
        );

        // The first press opens on the altimeter; two more walk past
        // brightness to the volume: full scale by default, 0.05 per detent.
        settings.hid_adjust_pressed();
        settings.hid_adjust_pressed();
        settings.hid_adjust_pressed();
        prop_assert_eq!(settings.adjustment_display_name(), "VOL");

        for _ in 0..down {
            settings.hid_decrement();
        }
        let lowered = (1.0 - 0.05 * down as f64).max(0.0);
        prop_assert!((settings.store().audio_volume() - lowered).abs() < 1e-9);

        for _ in 0..up {
            settings.hid_increment();
        }
        let raised = (lowered + 0.05 * up as f64).min(1.0);
        prop_assert!((settings.store().audio_volume() - raised).abs() < 1e-9);
    }

    #[test]
    fn store_payloads_round_trip_at_any_size(
        payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..=252), 1..5),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let store = AtomicStore::new(dir.path().join("prop.store"));
        store.initialize(64, 256).unwrap();

        for payload in &payloads {
            store.write_payload(payload).unwrap();
            prop_assert_eq!(&store.read_payload().unwrap(), payload);
        }

        // A payload past the bank capacity is refused and must not
        // disturb what was last committed.
        prop_assert!(store.write_payload(&[0; 253]).is_err());
        prop_assert_eq!(&store.read_payload().unwrap(), payloads.last().unwrap());
    }
}
