//! The settings catalog.
//!
//! Every persisted panel setting lives here: thirty parameters with
//! fixed wire ids, JSON keys, defaults, bounds, and step sizes. The
//! catalog never grows or shrinks at runtime; a [`SettingId`] names an
//! entry and the store hands out typed values.
//!
//! Two overlapping views serve the adjustment knob: [`SHALLOW`] holds
//! the handful of settings a pilot touches in flight, [`DEEP`] the full
//! configuration reached by a long press. Entries in neither list (the
//! screen geometry, screen rotation) change only via the settings file
//! or the wire.

use airball_wire::Message;
use serde_json::{Map, Value};

use crate::aero;
use crate::airdata::FusionTuning;
use crate::settings::parameter::{ParamKind, Parameter};

/// Number of catalog entries.
pub(crate) const CATALOG_LEN: usize = 30;

/// Names one entry of the settings catalog, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingId {
    /// Airspeed tape full-scale value.
    IasFullScale,
    /// Rotation speed marker.
    VR,
    /// Maximum flap-extended speed marker.
    VFe,
    /// Maximum structural cruising speed marker.
    VNo,
    /// Never-exceed speed marker.
    VNe,
    /// Critical angle of attack.
    AlphaStall,
    /// Stall warning angle of attack.
    AlphaStallWarning,
    /// Bottom of the displayed alpha range.
    AlphaMin,
    /// Top of the displayed alpha range.
    AlphaMax,
    /// Best-performance climb alpha.
    AlphaX,
    /// Best-rate climb alpha.
    AlphaY,
    /// Reference approach alpha.
    AlphaRef,
    /// Sideslip full-scale value.
    BetaFullScale,
    /// Fixed sideslip offset for probe mounting error.
    BetaBias,
    /// Altimeter setting in inches of mercury.
    BaroSetting,
    /// Ball smoothing time constant in seconds.
    BallTimeConstant,
    /// Climb rate averaging interval in seconds.
    VsiTimeConstant,
    /// Display width in pixels. Fixed per panel hardware.
    ScreenWidth,
    /// Display height in pixels. Fixed per panel hardware.
    ScreenHeight,
    /// Whether the altimeter strip is drawn.
    ShowAltimeter,
    /// Whether the link status indicator is drawn.
    ShowLinkStatus,
    /// Whether the probe battery indicator is drawn.
    ShowProbeBatteryStatus,
    /// Reduced-clutter display mode.
    Declutter,
    /// Which audio scheme sounds alpha cues.
    SoundScheme,
    /// Audio output level, 0 to 1.
    AudioVolume,
    /// Units used for displayed speeds.
    SpeedUnits,
    /// Whether the display is mounted upside down.
    RotateScreen,
    /// Backlight level, 0 to 1.
    ScreenBrightness,
    /// Whether the numeric airspeed readout is drawn.
    ShowNumericAirspeed,
    /// Multiplier correcting dynamic pressure for probe placement.
    QCorrectionFactor,
}

impl SettingId {
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// Settings reachable by a plain knob turn in flight.
pub const SHALLOW: [SettingId; 5] = [
    SettingId::BaroSetting,
    SettingId::ScreenBrightness,
    SettingId::AudioVolume,
    SettingId::ShowAltimeter,
    SettingId::ShowNumericAirspeed,
];

/// The full configuration group, reached by holding the mode key.
pub const DEEP: [SettingId; 20] = [
    SettingId::IasFullScale,
    SettingId::VR,
    SettingId::VFe,
    SettingId::VNo,
    SettingId::VNe,
    SettingId::AlphaStall,
    SettingId::AlphaStallWarning,
    SettingId::AlphaMin,
    SettingId::AlphaMax,
    SettingId::AlphaX,
    SettingId::AlphaY,
    SettingId::AlphaRef,
    SettingId::BetaFullScale,
    SettingId::BetaBias,
    SettingId::BallTimeConstant,
    SettingId::VsiTimeConstant,
    SettingId::Declutter,
    SettingId::SoundScheme,
    SettingId::SpeedUnits,
    SettingId::QCorrectionFactor,
];

fn catalog() -> [Parameter; CATALOG_LEN] {
    [
        Parameter::speed(0, "ias_full_scale", "V_FS", 100.0, 0.0, 300.0, 1.0),
        Parameter::speed(1, "v_r", "V_R", 50.0, 0.0, 300.0, 1.0),
        Parameter::speed(2, "v_fe", "V_FE", 75.0, 0.0, 300.0, 1.0),
        Parameter::speed(3, "v_no", "V_NO", 100.0, 0.0, 300.0, 1.0),
        Parameter::speed(4, "v_ne", "V_NE", 100.0, 0.0, 300.0, 1.0),
        Parameter::angle(5, "alpha_stall", "α_CRIT", 15.0, -10.0, 30.0, 0.1),
        Parameter::angle(6, "alpha_stall_warning", "α_CRIT_W", 14.0, -10.0, 30.0, 0.1),
        Parameter::angle(7, "alpha_min", "α_MIN", -10.0, -10.0, 30.0, 0.1),
        Parameter::angle(8, "alpha_max", "α_MAX", 20.0, -10.0, 30.0, 0.1),
        Parameter::angle(9, "alpha_x", "α_X", 12.0, -10.0, 30.0, 0.1),
        Parameter::angle(10, "alpha_y", "α_Y", 10.0, -10.0, 30.0, 0.1),
        Parameter::angle(11, "alpha_ref", "α_REF", 14.0, -10.0, 30.0, 0.1),
        Parameter::angle(12, "beta_full_scale", "β_FS", 20.0, 0.0, 30.0, 5.0),
        Parameter::angle(13, "beta_bias", "β BIAS", 0.0, 0.0, 30.0, 0.1),
        Parameter::number(14, "baro_setting", "BARO", 29.92, 25.0, 35.0, 0.01, 5, 2),
        Parameter::number(15, "ball_time_constant", "BALL T", 0.5, 0.0, 1.0, 0.1, 4, 2),
        Parameter::number(16, "vsi_time_constant", "VSI T", 1.0, 0.1, 5.0, 0.1, 3, 1),
        Parameter::integer(17, "screen_width", "DO_NOT_DISPLAY", 272, 272, 272, 0),
        Parameter::integer(18, "screen_height", "DO_NOT_DISPLAY", 480, 480, 480, 0),
        Parameter::boolean(19, "show_altimeter", "ALT?", true),
        Parameter::boolean(20, "show_link_status", "LINK?", true),
        Parameter::boolean(21, "show_probe_battery_status", "BAT?", true),
        Parameter::boolean(22, "declutter", "DCLTR?", false),
        Parameter::choice(23, "sound_scheme", "SND", &["stallfence", "flyonspeed"], 0),
        Parameter::number(24, "audio_volume", "VOL", 1.0, 0.0, 1.0, 0.05, 4, 2),
        Parameter::choice(25, "speed_units", "SPD", &["knots", "mph"], 0),
        Parameter::boolean(26, "rotate_screen", "DO_NOT_DISPLAY", false),
        Parameter::number(27, "screen_brightness", "BRT", 1.0, 0.0, 1.0, 0.05, 4, 2),
        Parameter::boolean(28, "show_numeric_airspeed", "SPD?", true),
        Parameter::number(29, "q_correction_factor", "Q_COR", 1.0, 0.5, 1.5, 0.05, 4, 2),
    ]
}

/// The live catalog: thirty parameters at their current values.
pub struct SettingsStore {
    params: [Parameter; CATALOG_LEN],
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self { params: catalog() }
    }
}

impl SettingsStore {
    /// A store holding catalog defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn param(&self, id: SettingId) -> &Parameter {
        &self.params[id.index()]
    }

    pub(crate) fn param_mut(&mut self, id: SettingId) -> &mut Parameter {
        &mut self.params[id.index()]
    }

    /// Take values from a parsed settings document. Keys the catalog
    /// does not know are ignored; entries the document does not mention
    /// keep their values.
    pub(crate) fn load_document(&mut self, doc: &Map<String, Value>) {
        for param in &mut self.params {
            param.load(doc);
        }
    }

    /// The whole catalog as a settings document.
    pub(crate) fn save_document(&self) -> Map<String, Value> {
        let mut doc = Map::new();
        for param in &self.params {
            param.save(&mut doc);
        }
        doc
    }

    /// Offer a wire message to the catalog. Returns whether some
    /// parameter claimed it.
    pub(crate) fn apply_message(&mut self, message: &Message) -> bool {
        self.params
            .iter_mut()
            .any(|param| param.apply_message(message))
    }

    /// The whole catalog as wire messages, in catalog order.
    pub(crate) fn messages(&self) -> Vec<Message> {
        self.params.iter().map(Parameter::to_message).collect()
    }

    fn value(&self, id: SettingId) -> f64 {
        match self.param(id).kind() {
            ParamKind::F64 { value, .. } => *value,
            _ => 0.0,
        }
    }

    fn integer_value(&self, id: SettingId) -> i16 {
        match self.param(id).kind() {
            ParamKind::I16 { value, .. } => *value,
            _ => 0,
        }
    }

    fn flag(&self, id: SettingId) -> bool {
        match self.param(id).kind() {
            ParamKind::Bool { value } => *value,
            _ => false,
        }
    }

    fn selection(&self, id: SettingId) -> &'static str {
        match self.param(id).kind() {
            ParamKind::Choice { options, index } => options[*index as usize],
            _ => "",
        }
    }

    /// Airspeed tape full-scale value.
    pub fn ias_full_scale(&self) -> f64 {
        self.value(SettingId::IasFullScale)
    }

    /// Rotation speed marker.
    pub fn v_r(&self) -> f64 {
        self.value(SettingId::VR)
    }

    /// Maximum flap-extended speed marker.
    pub fn v_fe(&self) -> f64 {
        self.value(SettingId::VFe)
    }

    /// Maximum structural cruising speed marker.
    pub fn v_no(&self) -> f64 {
        self.value(SettingId::VNo)
    }

    /// Never-exceed speed marker.
    pub fn v_ne(&self) -> f64 {
        self.value(SettingId::VNe)
    }

    /// Critical angle of attack, degrees.
    pub fn alpha_stall(&self) -> f64 {
        self.value(SettingId::AlphaStall)
    }

    /// Stall warning angle of attack, degrees.
    pub fn alpha_stall_warning(&self) -> f64 {
        self.value(SettingId::AlphaStallWarning)
    }

    /// Bottom of the displayed alpha range, degrees.
    pub fn alpha_min(&self) -> f64 {
        self.value(SettingId::AlphaMin)
    }

    /// Top of the displayed alpha range, degrees.
    pub fn alpha_max(&self) -> f64 {
        self.value(SettingId::AlphaMax)
    }

    /// Best-performance climb alpha, degrees.
    pub fn alpha_x(&self) -> f64 {
        self.value(SettingId::AlphaX)
    }

    /// Best-rate climb alpha, degrees.
    pub fn alpha_y(&self) -> f64 {
        self.value(SettingId::AlphaY)
    }

    /// Reference approach alpha, degrees.
    pub fn alpha_ref(&self) -> f64 {
        self.value(SettingId::AlphaRef)
    }

    /// Sideslip full-scale value, degrees.
    pub fn beta_full_scale(&self) -> f64 {
        self.value(SettingId::BetaFullScale)
    }

    /// Fixed sideslip offset, degrees.
    pub fn beta_bias(&self) -> f64 {
        self.value(SettingId::BetaBias)
    }

    /// Altimeter setting, inches of mercury.
    pub fn baro_setting(&self) -> f64 {
        self.value(SettingId::BaroSetting)
    }

    /// Ball smoothing time constant, seconds.
    pub fn ball_time_constant(&self) -> f64 {
        self.value(SettingId::BallTimeConstant)
    }

    /// Climb rate averaging interval, seconds.
    pub fn vsi_time_constant(&self) -> f64 {
        self.value(SettingId::VsiTimeConstant)
    }

    /// Display width in pixels.
    pub fn screen_width(&self) -> i16 {
        self.integer_value(SettingId::ScreenWidth)
    }

    /// Display height in pixels.
    pub fn screen_height(&self) -> i16 {
        self.integer_value(SettingId::ScreenHeight)
    }

    /// Whether the altimeter strip is drawn.
    pub fn show_altimeter(&self) -> bool {
        self.flag(SettingId::ShowAltimeter)
    }

    /// Whether the link status indicator is drawn.
    pub fn show_link_status(&self) -> bool {
        self.flag(SettingId::ShowLinkStatus)
    }

    /// Whether the probe battery indicator is drawn.
    pub fn show_probe_battery_status(&self) -> bool {
        self.flag(SettingId::ShowProbeBatteryStatus)
    }

    /// Reduced-clutter display mode.
    pub fn declutter(&self) -> bool {
        self.flag(SettingId::Declutter)
    }

    /// Selected audio scheme name.
    pub fn sound_scheme(&self) -> &'static str {
        self.selection(SettingId::SoundScheme)
    }

    /// Audio output level, 0 to 1.
    pub fn audio_volume(&self) -> f64 {
        self.value(SettingId::AudioVolume)
    }

    /// Selected speed units name.
    pub fn speed_units(&self) -> &'static str {
        self.selection(SettingId::SpeedUnits)
    }

    /// Whether the display is mounted upside down.
    pub fn rotate_screen(&self) -> bool {
        self.flag(SettingId::RotateScreen)
    }

    /// Backlight level, 0 to 1.
    pub fn screen_brightness(&self) -> f64 {
        self.value(SettingId::ScreenBrightness)
    }

    /// Whether the numeric airspeed readout is drawn.
    pub fn show_numeric_airspeed(&self) -> bool {
        self.flag(SettingId::ShowNumericAirspeed)
    }

    /// Multiplier applied to dynamic pressure before speed derivation.
    pub fn q_correction_factor(&self) -> f64 {
        self.value(SettingId::QCorrectionFactor)
    }

    /// The fusion knobs this catalog currently dictates, with the
    /// altimeter setting converted from inches of mercury to pascals.
    pub fn fusion_tuning(&self) -> FusionTuning {
        FusionTuning {
            qnh_pa: self.baro_setting() * aero::PASCALS_PER_INHG,
            ball_time_constant: self.ball_time_constant(),
            vsi_time_constant: self.vsi_time_constant(),
            q_correction_factor: self.q_correction_factor(),
        }
    }
}
