//! Web control-panel subsystem.
//!
//! [`WebPanel`] brings the configuration panel up once the device is
//! reachable (station connected or access point started) and funnels widget
//! changes back into the settings store. The widget library itself lives
//! outside this crate behind [`ControlPanel`]; this subsystem only decides
//! which controls exist, which settings keys they map to, and who hears
//! about changes.

use heapless::Vec;

use crate::message::{Address, Message, MessageId};
use crate::settings::{
    CLOCK_MODE_NAMES, DEFAULT_CLOCK_IT_IS, DEFAULT_CLOCK_MODE, DEFAULT_CLOCK_SINGLE_MINUTES,
    DEFAULT_COLOR_BACKGROUND, DEFAULT_COLOR_TIME, DEFAULT_LED_BRIGHTNESS,
    DEFAULT_NIGHT_BRIGHTNESS, DEFAULT_NIGHT_MODE_END, DEFAULT_NIGHT_MODE_START,
    DEFAULT_NTP_SERVER, DEFAULT_TIMEZONE, DEFAULT_USE_NIGHT_MODE, KEY_CLOCK_IT_IS,
    KEY_CLOCK_MODE, KEY_CLOCK_SINGLE_MINUTES, KEY_COLOR_BACKGROUND, KEY_COLOR_TIME,
    KEY_LED_BRIGHTNESS, KEY_NIGHT_BRIGHTNESS, KEY_NIGHT_MODE_END, KEY_NIGHT_MODE_START,
    KEY_NTP_SERVER, KEY_TIMEZONE, KEY_USE_NIGHT_MODE, Key, NTP_SERVERS, SettingsStore,
    TIMEZONE_NAMES,
};
use crate::task::{TaskHandler, TaskObjects};

/// Title shown at the top of the panel.
pub const PANEL_TITLE: &str = "WordClock";

/// Controls the panel can host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlKind {
    Switch,
    Select,
    Slider,
    Color,
    TimeOfDay,
}

/// One control of the panel: widget kind, label, the settings key it edits,
/// and its current value. `options` lists the choices of a `Select` and is
/// empty otherwise.
#[derive(Clone, Copy, Debug)]
pub struct ControlSpec {
    pub kind: ControlKind,
    pub label: &'static str,
    pub key: Key,
    pub value: u32,
    pub options: &'static [&'static str],
}

/// The platform's widget library.
pub trait ControlPanel {
    /// Bring the panel up with the given controls. Called at most once.
    fn start(&mut self, title: &str, controls: &[ControlSpec]);
}

const CONTROL_COUNT: usize = 12;

/// The control-panel subsystem.
pub struct WebPanel<P: ControlPanel, S: SettingsStore> {
    panel: P,
    store: S,
    objects: TaskObjects,
    started: bool,
}

impl<P: ControlPanel, S: SettingsStore> WebPanel<P, S> {
    /// New panel, idle until the device becomes reachable.
    pub const fn new(panel: P, store: S, objects: TaskObjects) -> Self {
        Self {
            panel,
            store,
            objects,
            started: false,
        }
    }

    /// Whether the panel has been started.
    pub const fn is_started(&self) -> bool {
        self.started
    }

    /// Persist a widget change and tell the display to reload.
    ///
    /// This is the explicit callback handle the widget library invokes; the
    /// panel never registers itself anywhere.
    pub fn handle_control_change(&mut self, key: Key, value: u32) {
        debug!("web: control {:x} changed to {}", key.raw(), value);
        let stored = match key {
            KEY_CLOCK_IT_IS | KEY_CLOCK_SINGLE_MINUTES | KEY_USE_NIGHT_MODE => {
                self.store.set_bool(key, value != 0)
            }
            KEY_CLOCK_MODE | KEY_LED_BRIGHTNESS | KEY_NIGHT_BRIGHTNESS | KEY_NTP_SERVER
            | KEY_TIMEZONE => self.store.set_u8(key, value as u8),
            _ => self.store.set_u32(key, value),
        };
        if !stored {
            error!("web: persisting control {:x} failed", key.raw());
            return;
        }
        let message = Message::new(Address::Web, Address::Display, MessageId::SettingsChanged);
        self.objects.bus.send(&message);
    }

    fn start_panel(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        info!("web: starting control panel");
        let controls = self.build_controls();
        self.panel.start(PANEL_TITLE, &controls);
    }

    fn build_controls(&self) -> Vec<ControlSpec, CONTROL_COUNT> {
        let store = &self.store;
        let mut controls = Vec::new();
        let entries = [
            ControlSpec {
                kind: ControlKind::Select,
                label: "Clock mode",
                key: KEY_CLOCK_MODE,
                value: u32::from(store.get_u8(KEY_CLOCK_MODE, DEFAULT_CLOCK_MODE)),
                options: &CLOCK_MODE_NAMES,
            },
            ControlSpec {
                kind: ControlKind::Switch,
                label: "Show 'it is'",
                key: KEY_CLOCK_IT_IS,
                value: u32::from(store.get_bool(KEY_CLOCK_IT_IS, DEFAULT_CLOCK_IT_IS)),
                options: &[],
            },
            ControlSpec {
                kind: ControlKind::Switch,
                label: "Show single minutes",
                key: KEY_CLOCK_SINGLE_MINUTES,
                value: u32::from(
                    store.get_bool(KEY_CLOCK_SINGLE_MINUTES, DEFAULT_CLOCK_SINGLE_MINUTES),
                ),
                options: &[],
            },
            ControlSpec {
                kind: ControlKind::Color,
                label: "Time color",
                key: KEY_COLOR_TIME,
                value: store.get_u32(KEY_COLOR_TIME, DEFAULT_COLOR_TIME),
                options: &[],
            },
            ControlSpec {
                kind: ControlKind::Color,
                label: "Background color",
                key: KEY_COLOR_BACKGROUND,
                value: store.get_u32(KEY_COLOR_BACKGROUND, DEFAULT_COLOR_BACKGROUND),
                options: &[],
            },
            ControlSpec {
                kind: ControlKind::Slider,
                label: "Brightness",
                key: KEY_LED_BRIGHTNESS,
                value: u32::from(store.get_u8(KEY_LED_BRIGHTNESS, DEFAULT_LED_BRIGHTNESS)),
                options: &[],
            },
            ControlSpec {
                kind: ControlKind::Switch,
                label: "Night mode",
                key: KEY_USE_NIGHT_MODE,
                value: u32::from(store.get_bool(KEY_USE_NIGHT_MODE, DEFAULT_USE_NIGHT_MODE)),
                options: &[],
            },
            ControlSpec {
                kind: ControlKind::Slider,
                label: "Night brightness",
                key: KEY_NIGHT_BRIGHTNESS,
                value: u32::from(store.get_u8(KEY_NIGHT_BRIGHTNESS, DEFAULT_NIGHT_BRIGHTNESS)),
                options: &[],
            },
            ControlSpec {
                kind: ControlKind::TimeOfDay,
                label: "Night mode start",
                key: KEY_NIGHT_MODE_START,
                value: store.get_u32(KEY_NIGHT_MODE_START, DEFAULT_NIGHT_MODE_START),
                options: &[],
            },
            ControlSpec {
                kind: ControlKind::TimeOfDay,
                label: "Night mode end",
                key: KEY_NIGHT_MODE_END,
                value: store.get_u32(KEY_NIGHT_MODE_END, DEFAULT_NIGHT_MODE_END),
                options: &[],
            },
            ControlSpec {
                kind: ControlKind::Select,
                label: "NTP server",
                key: KEY_NTP_SERVER,
                value: u32::from(store.get_u8(KEY_NTP_SERVER, DEFAULT_NTP_SERVER)),
                options: &NTP_SERVERS,
            },
            ControlSpec {
                kind: ControlKind::Select,
                label: "Timezone",
                key: KEY_TIMEZONE,
                value: u32::from(store.get_u8(KEY_TIMEZONE, DEFAULT_TIMEZONE)),
                options: &TIMEZONE_NAMES,
            },
        ];
        for control in entries {
            let _ = controls.push(control);
        }
        controls
    }
}

impl<P: ControlPanel, S: SettingsStore> TaskHandler for WebPanel<P, S> {
    fn on_message(&mut self, message: &Message) {
        match message.id {
            MessageId::WifiStaConnected | MessageId::WifiApStarted => self.start_panel(),
            _ => {}
        }
    }
}
