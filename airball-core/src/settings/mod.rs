//! Settings, adjustment, and fleet synchronization.
//!
//! ## Overview
//!
//! One [`Settings`] value owns the catalog, the adjustment session, and
//! the persistence path, and it is only ever touched from the model
//! thread. Input sources (the HID knob reader, the file watcher, timer
//! expirations, the telemetry link) post events; the model turns them
//! into calls here.
//!
//! ```text
//!                 ┌──────────────────────────────┐
//!  knob events ──►│          Settings            │──► settings file
//!  timer fires ──►│  SettingsStore (catalog)     │    (dual-bank store)
//!  wire msgs  ───►│  Adjustment (knob session)   │──► MessageSink
//!  file change ──►│  KnobState (leader role)     │    (peer broadcast)
//!                 └──────────────────────────────┘
//! ```
//!
//! ## Leader and follower
//!
//! Several panels can share one aircraft. The panel whose adjustment
//! knob is physically connected is the settings leader: every local
//! edit is rebroadcast as wire messages so follower panels track it.
//! A panel that discovers its knob is missing asks the rest of the
//! fleet for settings instead. Both reactions fire once per
//! connectivity transition, not per poll.
//!
//! ## Persistence
//!
//! Every knob click writes through to the dual-bank store. Writing is
//! gated on one successful load having happened first; a panel that
//! never managed to read its file must not overwrite it with defaults.

pub mod adjust;
pub mod hid;
mod parameter;
pub mod store;
pub mod watch;

use std::path::PathBuf;

use airball_wire::blob::{self, BlobError};
use airball_wire::{ids, Message};
use serde_json::{Map, Value};

use crate::settings::adjust::{Adjustment, KnobState};
use crate::settings::parameter::Parameter;
use crate::settings::store::{SettingId, SettingsStore, DEEP, SHALLOW};
use crate::storage::{AtomicStore, StoreError, DEFAULT_BANK_SIZE, DEFAULT_PAGE_SIZE};
use crate::telemetry::MessageSink;

/// The settings subsystem: catalog, adjustment session, persistence,
/// and peer synchronization.
pub struct Settings {
    path: PathBuf,
    store: SettingsStore,
    sink: Box<dyn MessageSink>,
    loaded: bool,
    adjustment: Adjustment,
    knob: KnobState,
}

impl Settings {
    /// Settings persisted at `path`, broadcasting through `sink`.
    /// Loads the file immediately; a missing store is created, an
    /// unreadable one leaves catalog defaults in place.
    pub fn new(path: impl Into<PathBuf>, sink: Box<dyn MessageSink>) -> Self {
        let mut settings = Self {
            path: path.into(),
            store: SettingsStore::new(),
            sink,
            loaded: false,
            adjustment: Adjustment::Idle,
            knob: KnobState::Unknown,
        };
        settings.load_from_file();
        settings
    }

    /// Read-only view of the catalog.
    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    /// Re-read the settings file, keeping current values on any
    /// failure. Also the reaction to a file-changed event.
    pub fn load_from_file(&mut self) {
        match self.try_load() {
            Ok(()) => self.loaded = true,
            Err(err) => log::warn!(
                "settings load from {} failed, keeping current values: {err}",
                self.path.display()
            ),
        }
    }

    /// Persist the catalog. A no-op until one load has succeeded, so a
    /// panel that could not read its file never clobbers it with
    /// defaults.
    pub fn save_to_file(&self) {
        if !self.loaded {
            return;
        }
        if let Err(err) = self.try_save() {
            log::warn!("settings save to {} failed: {err}", self.path.display());
        }
    }

    fn try_load(&mut self) -> Result<(), StoreError> {
        let disk = AtomicStore::new(&self.path);
        if !disk.is_initialized() {
            disk.initialize(DEFAULT_PAGE_SIZE, DEFAULT_BANK_SIZE)?;
        }
        let payload = disk.read_payload()?;
        self.load_slice(&payload);
        Ok(())
    }

    fn try_save(&self) -> Result<(), StoreError> {
        let disk = AtomicStore::new(&self.path);
        if !disk.is_initialized() {
            disk.initialize(DEFAULT_PAGE_SIZE, DEFAULT_BANK_SIZE)?;
        }
        disk.write_payload(self.document_string().as_bytes())
    }

    fn load_slice(&mut self, payload: &[u8]) {
        // A freshly initialized store reads back empty.
        if payload.is_empty() {
            return;
        }
        match serde_json::from_slice::<Map<String, Value>>(payload) {
            Ok(doc) => self.store.load_document(&doc),
            Err(err) => {
                log::warn!("settings document is garbled, keeping current values: {err}");
            }
        }
    }

    fn document_string(&self) -> String {
        serde_json::to_string(&self.store.save_document()).unwrap_or_else(|err| {
            log::error!("settings serialization failed: {err}");
            String::new()
        })
    }

    /// Record whether the adjustment knob is present. On the transition
    /// to disconnected this panel asks the fleet for settings; on the
    /// transition to connected it broadcasts its own.
    pub fn set_knob_state(&mut self, state: KnobState) {
        if state == self.knob {
            return;
        }
        self.knob = state;
        match state {
            KnobState::Disconnected => self.sink.send(Message::new(ids::SETTINGS_REQUEST)),
            _ => self.maybe_send_settings(),
        }
    }

    /// React to one inbound wire message: a settings request triggers a
    /// leader rebroadcast, a parameter message updates the catalog (but
    /// is not persisted; only local edits write the file).
    pub fn accept_message(&mut self, message: &Message) {
        if message.id == ids::SETTINGS_REQUEST {
            self.maybe_send_settings();
        } else {
            self.store.apply_message(message);
        }
    }

    fn maybe_send_settings(&mut self) {
        if self.knob != KnobState::Connected {
            return;
        }
        for message in self.store.messages() {
            self.sink.send(message);
        }
    }

    /// The whole catalog as a compressed, line-safe snapshot blob.
    pub fn compressed_snapshot(&self) -> String {
        blob::compress_settings(&self.document_string())
    }

    /// Adopt a snapshot received from a peer. Values apply to the live
    /// catalog only, like any wire update.
    pub fn apply_compressed(&mut self, snapshot: &str) -> Result<(), BlobError> {
        let json = blob::expand_settings(snapshot)?;
        self.load_slice(json.as_bytes());
        Ok(())
    }

    /// The increment key: open a shallow session if none is open, step
    /// the current parameter up, persist, and broadcast.
    pub fn hid_increment(&mut self) {
        self.edit_current(Parameter::increment);
    }

    /// The decrement key; mirror of [`hid_increment`](Self::hid_increment).
    pub fn hid_decrement(&mut self) {
        self.edit_current(Parameter::decrement);
    }

    fn edit_current(&mut self, edit: impl FnOnce(&mut Parameter)) {
        if self.adjustment.is_idle() {
            self.adjustment = Adjustment::Shallow(0);
        }
        if let Some(id) = self.current_id() {
            edit(self.store.param_mut(id));
        }
        self.save_to_file();
        self.maybe_send_settings();
    }

    /// The mode key went down: open the shallow group or step to the
    /// next parameter of the open group.
    pub fn hid_adjust_pressed(&mut self) {
        self.adjustment = self.adjustment.advanced(SHALLOW.len(), DEEP.len());
    }

    /// The mode key came back up. State is unaffected; release matters
    /// only to the timers, which live with the HID source.
    pub fn hid_adjust_released(&mut self) {}

    /// The inactivity timer expired; a shallow session closes.
    pub fn cancel_timer_fired(&mut self) {
        self.adjustment = self.adjustment.cancelled();
    }

    /// The mode key was held down long enough; switch groups.
    pub fn long_press_timer_fired(&mut self) {
        self.adjustment = self.adjustment.toggled_group();
    }

    /// The current adjustment session.
    pub fn adjustment(&self) -> Adjustment {
        self.adjustment
    }

    /// Whether an adjustment session is open (the overlay should draw).
    pub fn adjusting(&self) -> bool {
        !self.adjustment.is_idle()
    }

    fn current_id(&self) -> Option<SettingId> {
        match self.adjustment {
            Adjustment::Idle => None,
            Adjustment::Shallow(i) => SHALLOW.get(i).copied(),
            Adjustment::Deep(i) => DEEP.get(i).copied(),
        }
    }

    /// Label of the parameter under adjustment, or empty when idle.
    pub fn adjustment_display_name(&self) -> String {
        self.current_id()
            .map(|id| self.store.param(id).name().to_string())
            .unwrap_or_default()
    }

    /// Formatted value of the parameter under adjustment, or empty when
    /// idle.
    pub fn adjustment_display_value(&self) -> String {
        self.current_id()
            .map(|id| {
                self.store
                    .param(id)
                    .display_value(self.store.speed_units())
            })
            .unwrap_or_default()
    }
}
