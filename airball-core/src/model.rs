//! The display model: the single place all state mutates.
//!
//! Source threads never touch the airdata, battery, or settings
//! objects; they post [`ModelEvent`]s and the application loop feeds
//! them through [`AirballModel::handle`] on one thread. That one rule
//! is the whole concurrency story for the data model.
//!
//! Telemetry dispatch is by id family: airdata fields go through the
//! assembler and, when a sample completes, into fusion under the
//! tuning the settings catalog currently dictates; battery fields into
//! the battery status; settings traffic into the settings facade.
//! Unknown ids drop silently, which is what keeps old panels
//! compatible with newer probes.

use airball_wire::{ids, Message, Sentence};

use crate::aero;
use crate::airdata::{Airdata, AirdataAssembler, RawSample};
use crate::battery::BatteryStatus;
use crate::events::{ButtonEvent, ModelEvent};
use crate::queue::EventQueue;
use crate::settings::Settings;

/// Everything the renderer reads, mutated only via [`handle`](Self::handle).
pub struct AirballModel {
    assembler: AirdataAssembler,
    airdata: Airdata,
    battery: BatteryStatus,
    settings: Settings,
}

impl AirballModel {
    /// Assemble a model from its three state objects.
    pub fn new(airdata: Airdata, battery: BatteryStatus, settings: Settings) -> Self {
        Self {
            assembler: AirdataAssembler::new(),
            airdata,
            battery,
            settings,
        }
    }

    /// Fused airdata state.
    pub fn airdata(&self) -> &Airdata {
        &self.airdata
    }

    /// Probe battery state.
    pub fn battery(&self) -> &BatteryStatus {
        &self.battery
    }

    /// Settings subsystem.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Apply one event to the model.
    pub fn handle(&mut self, event: ModelEvent) {
        match event {
            ModelEvent::Telemetry(message) => self.handle_message(&message),
            ModelEvent::Sentence(sentence) => self.handle_sentence(sentence),
            ModelEvent::Button(button) => match button {
                ButtonEvent::Increment => self.settings.hid_increment(),
                ButtonEvent::Decrement => self.settings.hid_decrement(),
                ButtonEvent::AdjustPressed => self.settings.hid_adjust_pressed(),
                ButtonEvent::AdjustReleased => self.settings.hid_adjust_released(),
            },
            ModelEvent::Knob(state) => self.settings.set_knob_state(state),
            ModelEvent::CancelTimerFired => self.settings.cancel_timer_fired(),
            ModelEvent::LongPressTimerFired => self.settings.long_press_timer_fired(),
            ModelEvent::SettingsFileChanged => self.settings.load_from_file(),
        }
    }

    /// Drain the queue and apply everything in order. The application
    /// loop calls this once per frame.
    pub fn pump(&mut self, queue: &EventQueue) {
        for event in queue.drain() {
            self.handle(event);
        }
    }

    fn handle_message(&mut self, message: &Message) {
        if ids::is_airdata(message.id) {
            if let Some(sample) = self.assembler.submit_message(message) {
                self.fuse(&sample);
            }
        } else if ids::is_battery(message.id) {
            self.battery.apply_message(message);
        } else if ids::is_setting(message.id) || message.id == ids::SETTINGS_REQUEST {
            self.settings.accept_message(message);
        }
    }

    fn handle_sentence(&mut self, sentence: Sentence) {
        match sentence {
            Sentence::Airdata {
                sequence,
                alpha,
                beta,
                q,
                p,
                t,
            } => {
                // Line transports carry whole samples; no assembly step.
                let sample = RawSample {
                    sequence,
                    alpha: aero::degrees_to_radians(alpha),
                    beta: aero::degrees_to_radians(beta),
                    q,
                    p,
                    t,
                };
                self.fuse(&sample);
            }
            Sentence::Battery {
                voltage,
                current,
                capacity_pct,
                ..
            } => self.battery.update(voltage, current, capacity_pct),
            Sentence::SettingsRequest => {
                self.settings
                    .accept_message(&Message::new(ids::SETTINGS_REQUEST));
            }
            Sentence::CompressedSettings(snapshot) => {
                if let Err(err) = self.settings.apply_compressed(&snapshot) {
                    log::warn!("ignoring undecodable settings snapshot: {err}");
                }
            }
            Sentence::Unknown => {}
        }
    }

    fn fuse(&mut self, sample: &RawSample) {
        let tuning = self.settings.store().fusion_tuning();
        self.airdata.update(sample, &tuning);
    }
}
