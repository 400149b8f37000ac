//! Persistent settings: key generation, the store abstraction, and the
//! defaults that apply on first boot.
//!
//! The store itself (flash-backed preferences) lives outside this crate;
//! integrators implement [`SettingsStore`] on whatever their platform
//! provides. Everything here is about naming settings consistently and
//! agreeing on their defaults.

use crate::datetime::Time;
use crate::message::Address;

/// Key region for configurable parameters.
pub const REGION_PARAMS: u8 = 0x00;
/// Key region for monotonically increasing counters.
pub const REGION_COUNTERS: u8 = 0x01;

/// Packed settings key: `region` in bits 24..32, `group` (the owning
/// subsystem's [`Address`]) in bits 16..24, `id` in bits 0..16.
///
/// Two keys collide only if all three parts match, so each subsystem
/// numbers its own ids independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Key(u32);

impl Key {
    /// Build a key from its parts.
    pub const fn new(region: u8, group: Address, id: u16) -> Self {
        Self((region as u32) << 24 | (group as u32) << 16 | id as u32)
    }

    /// The packed 32-bit value, for stores that key on integers.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// The persistent preference store a platform supplies.
///
/// Getters take a default that is returned when the key has never been
/// written; setters report whether the write stuck. Implementations are
/// expected to be synchronous and cheap enough to call from dispatch.
pub trait SettingsStore {
    /// Whether the key has ever been written.
    fn has_key(&self, key: Key) -> bool;

    /// Read a 32-bit value, falling back to `default`.
    fn get_u32(&self, key: Key, default: u32) -> u32;
    /// Write a 32-bit value.
    fn set_u32(&mut self, key: Key, value: u32) -> bool;

    /// Read a byte value, falling back to `default`.
    fn get_u8(&self, key: Key, default: u8) -> u8;
    /// Write a byte value.
    fn set_u8(&mut self, key: Key, value: u8) -> bool;

    /// Read a flag, falling back to `default`.
    fn get_bool(&self, key: Key, default: bool) -> bool;
    /// Write a flag.
    fn set_bool(&mut self, key: Key, value: bool) -> bool;

    /// Add one to a counter key, treating a never-written key as zero.
    fn increase_counter(&mut self, key: Key) {
        let next = self.get_u32(key, 0).wrapping_add(1);
        self.set_u32(key, next);
    }
}

/// Reset-cause counters, bumped once per boot by the integrator.
pub const KEY_COUNTER_RESET_POWER_ON: Key = Key::new(REGION_COUNTERS, Address::Application, 0x00);
pub const KEY_COUNTER_RESET_SOFTWARE: Key = Key::new(REGION_COUNTERS, Address::Application, 0x01);
pub const KEY_COUNTER_RESET_WATCHDOG: Key = Key::new(REGION_COUNTERS, Address::Application, 0x02);
pub const KEY_COUNTER_RESET_PANIC: Key = Key::new(REGION_COUNTERS, Address::Application, 0x03);
pub const KEY_COUNTER_RESET_BROWNOUT: Key = Key::new(REGION_COUNTERS, Address::Application, 0x04);

/// Word-selection mode of the clock face.
pub const KEY_CLOCK_MODE: Key = Key::new(REGION_PARAMS, Address::Display, 0x00);
/// Whether the "it is" lead-in words are lit.
pub const KEY_CLOCK_IT_IS: Key = Key::new(REGION_PARAMS, Address::Display, 0x01);
/// Whether the single-minute correction words are lit.
pub const KEY_CLOCK_SINGLE_MINUTES: Key = Key::new(REGION_PARAMS, Address::Display, 0x02);
/// Color of lit time words, packed 0xRRGGBB.
pub const KEY_COLOR_TIME: Key = Key::new(REGION_PARAMS, Address::Display, 0x10);
/// Color of unlit cells, packed 0xRRGGBB.
pub const KEY_COLOR_BACKGROUND: Key = Key::new(REGION_PARAMS, Address::Display, 0x11);
/// Daytime brightness, percent.
pub const KEY_LED_BRIGHTNESS: Key = Key::new(REGION_PARAMS, Address::Display, 0x20);
/// Whether night dimming is active.
pub const KEY_USE_NIGHT_MODE: Key = Key::new(REGION_PARAMS, Address::Display, 0x21);
/// Night brightness, percent.
pub const KEY_NIGHT_BRIGHTNESS: Key = Key::new(REGION_PARAMS, Address::Display, 0x22);
/// Night interval start, packed hour/minute dword.
pub const KEY_NIGHT_MODE_START: Key = Key::new(REGION_PARAMS, Address::Display, 0x23);
/// Night interval end, packed hour/minute dword.
pub const KEY_NIGHT_MODE_END: Key = Key::new(REGION_PARAMS, Address::Display, 0x24);

/// Index into [`NTP_SERVERS`].
pub const KEY_NTP_SERVER: Key = Key::new(REGION_PARAMS, Address::Time, 0x00);
/// Seconds between sync rounds.
pub const KEY_NTP_SYNC_PERIOD: Key = Key::new(REGION_PARAMS, Address::Time, 0x01);
/// Milliseconds before a sync round is abandoned.
pub const KEY_NTP_SYNC_TIMEOUT: Key = Key::new(REGION_PARAMS, Address::Time, 0x02);
/// Index into [`TIMEZONE_NAMES`].
pub const KEY_TIMEZONE: Key = Key::new(REGION_PARAMS, Address::Time, 0x10);

pub const DEFAULT_CLOCK_MODE: u8 = 1; // Rhein-Ruhr
pub const DEFAULT_CLOCK_IT_IS: bool = true;
pub const DEFAULT_CLOCK_SINGLE_MINUTES: bool = true;
pub const DEFAULT_COLOR_TIME: u32 = 0x00FF00;
pub const DEFAULT_COLOR_BACKGROUND: u32 = 0x000000;
pub const DEFAULT_LED_BRIGHTNESS: u8 = 100;
pub const DEFAULT_USE_NIGHT_MODE: bool = true;
pub const DEFAULT_NIGHT_BRIGHTNESS: u8 = 20;

/// 21:30, packed.
pub const DEFAULT_NIGHT_MODE_START: u32 =
    Time { hour: 21, minute: 30, second: 0 }.to_hm_dword();
/// 06:30, packed.
pub const DEFAULT_NIGHT_MODE_END: u32 =
    Time { hour: 6, minute: 30, second: 0 }.to_hm_dword();

pub const DEFAULT_NTP_SERVER: u8 = 0; // pool.ntp.org
pub const DEFAULT_NTP_SYNC_PERIOD: u32 = 600;
pub const DEFAULT_NTP_SYNC_TIMEOUT: u32 = 5000;
pub const DEFAULT_TIMEZONE: u8 = 6; // CET

/// Selectable word-mode names, indexed by the clock-mode setting.
pub const CLOCK_MODE_NAMES: [&str; 2] = ["Wessi", "Rhein-Ruhr"];

/// Selectable sync servers, indexed by the NTP-server setting.
pub const NTP_SERVERS: [&str; 10] = [
    "pool.ntp.org",
    "europe.pool.ntp.org",
    "north-america.pool.ntp.org",
    "asia.pool.ntp.org",
    "ru.pool.ntp.org",
    "time.google.com",
    "time.android.com",
    "time.windows.com",
    "time.aws.com",
    "amazon.pool.ntp.org",
];

/// Selectable timezone names, indexed by the timezone setting.
pub const TIMEZONE_NAMES: [&str; 16] = [
    "Australia Eastern Standard Time",
    "Australia Central Standard Time",
    "Afghanistan Time",
    "Alaska Standard Time",
    "Atlantic Standard Time",
    "Central Africa Time",
    "Central European Time",
    "Central Standard Time",
    "East Africa Time",
    "Eastern European Time",
    "Eastern Standard Time",
    "Moscow Standard Time",
    "Mountain Standard Time",
    "Pacific Standard Time",
    "Coordinated Universal Time",
    "India Standard Time",
];
